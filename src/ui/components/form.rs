//! Editor form overlay renderer.

use crate::ui::helpers::{char_len, position_cursor, tail_chars, truncate_chars};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::FormInfo;

/// Horizontal margin between the pane edge and the form frame.
const FORM_MARGIN: usize = 4;

/// Width of the field label column inside the frame.
const LABEL_WIDTH: usize = 11;

const FORM_HINT: &str = "Enter: save  Tab: next field  ESC: cancel";

/// Draws the form frame over the card list starting at `row`.
///
/// ```text
/// ┌ New flashcard ──────────────┐
/// │                             │
/// │ Question:  2+2?_            │
/// │ Answer:    4                │
/// │ Category:  math             │
/// │                             │
/// │ Enter: save  Tab: next ...  │
/// └─────────────────────────────┘
/// ```
///
/// The focused field is bold with a trailing cursor and shows the end of its
/// value when it does not fit.
pub fn render_form(row: usize, form: &FormInfo, theme: &Theme, cols: usize) -> usize {
    let box_width = cols.saturating_sub(FORM_MARGIN * 2).max(LABEL_WIDTH + 6);
    let inner_width = box_width.saturating_sub(2);
    let value_width = inner_width.saturating_sub(LABEL_WIDTH + 2);
    let mut current_row = row;

    let title = truncate_chars(&format!(" {} ", form.title), inner_width.saturating_sub(1));
    position_cursor(current_row, 1);
    print!("{}", " ".repeat(FORM_MARGIN));
    print!("{}", Theme::fg(&theme.colors.form_border));
    print!("┌─{title}{}┐", "─".repeat(inner_width.saturating_sub(char_len(&title) + 1)));
    print!("{}", Theme::reset());
    current_row += 1;

    current_row = render_form_line(current_row, "", theme, inner_width, false);

    for field in &form.fields {
        let value = if field.is_focused {
            format!("{}_", tail_chars(&field.value, value_width.saturating_sub(1)))
        } else {
            truncate_chars(&field.value, value_width)
        };
        let line = format!(" {:<label$}{value}", format!("{}:", field.label), label = LABEL_WIDTH);
        current_row = render_form_line(current_row, &line, theme, inner_width, field.is_focused);
    }

    current_row = render_form_line(current_row, "", theme, inner_width, false);
    let hint = truncate_chars(&format!(" {FORM_HINT}"), inner_width);
    current_row = render_form_line(current_row, &hint, theme, inner_width, false);

    position_cursor(current_row, 1);
    print!("{}", " ".repeat(FORM_MARGIN));
    print!("{}", Theme::fg(&theme.colors.form_border));
    print!("└{}┘", "─".repeat(inner_width));
    print!("{}", Theme::reset());

    current_row + 1
}

fn render_form_line(row: usize, text: &str, theme: &Theme, inner_width: usize, emphasized: bool) -> usize {
    position_cursor(row, 1);
    print!("{}", " ".repeat(FORM_MARGIN));
    print!("{}", Theme::fg(&theme.colors.form_border));
    print!("│");
    if emphasized {
        print!("{}", Theme::bold());
    }
    print!("{}", Theme::fg(&theme.colors.text_normal));
    print!("{text}");
    print!("{}", " ".repeat(inner_width.saturating_sub(char_len(text))));
    print!("{}", Theme::reset());
    print!("{}", Theme::fg(&theme.colors.form_border));
    print!("│");
    print!("{}", Theme::reset());
    row + 1
}
