//! Card list component renderer.
//!
//! Renders the visible window of cards as a three-column table: category, card
//! text and creation date. A flipped card shows its answer in `flipped_fg`.

use crate::app::view::{CATEGORY_COLUMN_WIDTH, DATE_COLUMN_WIDTH};
use crate::ui::helpers::{self, char_len, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::DisplayItem;

/// Renders the column headers at `row` and returns the next free row.
pub fn render_card_headers(row: usize, theme: &Theme, cols: usize) -> usize {
    let text_width = cols.saturating_sub(CATEGORY_COLUMN_WIDTH + DATE_COLUMN_WIDTH);

    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    print!(
        "{:<cat$}{:<text$}{:>date$}",
        "CATEGORY",
        "QUESTION / ANSWER",
        "CREATED",
        cat = CATEGORY_COLUMN_WIDTH,
        text = text_width,
        date = DATE_COLUMN_WIDTH
    );
    print!("{}", Theme::reset());
    row + 1
}

/// Renders every card row starting at `row` and returns the next free row.
pub fn render_card_rows(row: usize, items: &[DisplayItem], theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;
    for item in items {
        current_row = render_card_row(current_row, item, theme, cols);
    }
    current_row
}

/// Renders one card row, padded to the full pane width.
///
/// Styling precedence: selection colors, then search highlights, then the
/// category, flipped and normal text colors.
fn render_card_row(row: usize, item: &DisplayItem, theme: &Theme, cols: usize) -> usize {
    let text_fg = if item.is_flipped {
        &theme.colors.flipped_fg
    } else {
        &theme.colors.text_normal
    };

    position_cursor(row, 1);

    if item.is_selected {
        print!("{}", Theme::fg(&theme.colors.selection_fg));
        print!("{}", Theme::bg(&theme.colors.selection_bg));
    } else {
        print!("{}", Theme::fg(&theme.colors.category_fg));
    }

    let category_len = char_len(&item.category);
    print!("{}", item.category);
    print!("{}", " ".repeat(CATEGORY_COLUMN_WIDTH.saturating_sub(category_len)));

    if !item.is_selected {
        print!("{}", Theme::fg(text_fg));
    }

    helpers::render_highlighted_text(&item.text, &item.highlight_ranges, theme, item.is_selected);

    if !item.is_selected {
        print!("{}", Theme::fg(text_fg));
    }

    let text_width = cols.saturating_sub(CATEGORY_COLUMN_WIDTH + DATE_COLUMN_WIDTH);
    print!("{}", " ".repeat(text_width.saturating_sub(char_len(&item.text))));

    if !item.is_selected {
        print!("{}", Theme::fg(&theme.colors.text_dim));
    }
    let created = helpers::truncate_chars(&item.created, DATE_COLUMN_WIDTH);
    print!("{created:>width$}", width = DATE_COLUMN_WIDTH);

    print!("{}", Theme::reset());
    row + 1
}
