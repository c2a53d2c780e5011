//! Delete confirmation overlay renderer.

use crate::ui::helpers::{char_len, position_cursor, truncate_chars};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::ConfirmInfo;

const CONFIRM_MARGIN: usize = 8;

/// Draws the confirmation box at `row` and returns the next free row.
pub fn render_confirm(row: usize, confirm: &ConfirmInfo, theme: &Theme, cols: usize) -> usize {
    let inner_width = cols.saturating_sub(CONFIRM_MARGIN * 2 + 2);

    let mut lines = vec![String::new(), format!(" {}", confirm.prompt)];
    if let Some(detail) = &confirm.detail {
        lines.push(format!(" \"{detail}\""));
    }
    lines.push(String::new());
    lines.push(" y/Enter: delete   n/ESC: keep".to_string());
    lines.push(String::new());

    position_cursor(row, 1);
    print!("{}", " ".repeat(CONFIRM_MARGIN));
    print!("{}", Theme::fg(&theme.colors.error_fg));
    print!("┌{}┐", "─".repeat(inner_width));

    let mut current_row = row + 1;
    for line in &lines {
        let text = truncate_chars(line, inner_width);
        position_cursor(current_row, 1);
        print!("{}", " ".repeat(CONFIRM_MARGIN));
        print!("{}", Theme::fg(&theme.colors.error_fg));
        print!("│");
        print!("{}", Theme::fg(&theme.colors.text_normal));
        print!("{text}");
        print!("{}", " ".repeat(inner_width.saturating_sub(char_len(&text))));
        print!("{}", Theme::fg(&theme.colors.error_fg));
        print!("│");
        current_row += 1;
    }

    position_cursor(current_row, 1);
    print!("{}", " ".repeat(CONFIRM_MARGIN));
    print!("└{}┘", "─".repeat(inner_width));
    print!("{}", Theme::reset());

    current_row + 1
}
