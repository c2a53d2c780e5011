//! Composable UI component renderers.
//!
//! # Components
//!
//! - `header`: Title bar with card counts and category filter
//! - `search`: Search input box
//! - `cards`: Card list with category, text and date columns
//! - `empty`: Message shown when no card is visible
//! - `form`: Editor overlay for the working draft
//! - `confirm`: Delete confirmation overlay
//! - `status`: Error and validation line
//! - `footer`: Keybinding hints
//!
//! # Layout
//!
//! ```text
//! [blank line]
//! [Header]
//! [Border]
//! [Search Bar - 3 lines, search mode only]
//! [Column Headers]
//! [Card Rows | Empty State]      <- form / confirm overlays drawn on top
//! [Status]
//! [Border]
//! [Footer]
//! ```

mod cards;
mod confirm;
mod empty;
mod footer;
mod form;
mod header;
mod search;
mod status;

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::UIViewModel;

use cards::{render_card_headers, render_card_rows};
use confirm::render_confirm;
use empty::render_empty_state;
use footer::render_footer;
use form::render_form;
use header::render_header;
use search::render_search_bar;
use status::render_status;

/// Renders a horizontal border line at `row` and returns the next free row.
fn render_border(row: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", "─".repeat(cols));
    print!("{}", Theme::reset());
    row + 1
}

/// Renders the full plugin layout for `vm`.
pub fn render_layout(vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    let mut current_row = 2;

    current_row = render_header(current_row, &vm.header, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);
    if let Some(search) = &vm.search_bar {
        current_row = render_search_bar(current_row, search, theme, cols);
    }
    current_row = render_card_headers(current_row, theme, cols);
    let list_start = current_row;

    if let Some(empty) = &vm.empty_state {
        render_empty_state(list_start + 2, empty, theme, cols);
    } else {
        render_card_rows(list_start, &vm.display_items, theme, cols);
    }

    if let Some(form) = &vm.form {
        render_form(list_start + 1, form, theme, cols);
    }
    if let Some(confirm) = &vm.confirm {
        render_confirm(list_start + 1, confirm, theme, cols);
    }

    let footer_row = rows.saturating_sub(1);
    let border_row = footer_row.saturating_sub(1);
    let status_row = border_row.saturating_sub(1);

    render_status(status_row, vm.status.as_deref(), theme, cols);
    render_border(border_row, &theme.colors.border, cols);
    render_footer(footer_row, &vm.footer, theme, cols);
}
