//! Status line renderer.

use crate::ui::helpers::{char_len, position_cursor, truncate_chars};
use crate::ui::theme::Theme;

/// Renders `message` in `error_fg` at `row`, or clears the row when there is none.
pub fn render_status(row: usize, message: Option<&str>, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    match message {
        Some(message) => {
            let text = truncate_chars(&format!(" {message}"), cols);
            print!("{}", Theme::fg(&theme.colors.error_fg));
            print!("{text}");
            print!("{}", " ".repeat(cols.saturating_sub(char_len(&text))));
            print!("{}", Theme::reset());
        }
        None => print!("{}", " ".repeat(cols)),
    }
    row + 1
}
