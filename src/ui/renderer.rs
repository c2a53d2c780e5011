//! Top-level rendering coordinator.
//!
//! Rendering is a two-step process: compute a [`UIViewModel`] from state, then
//! hand it to the component layout. Output goes to stdout as ANSI sequences,
//! which is what the Zellij host expects from a plugin's `render`.

use crate::app::AppState;
use crate::ui::components;
use crate::ui::viewmodel::UIViewModel;

/// Renders the plugin UI for a pane of `rows` by `cols` cells.
pub fn render(state: &AppState, rows: usize, cols: usize) {
    let viewmodel: UIViewModel = state.compute_viewmodel(rows, cols);

    components::render_layout(&viewmodel, &state.theme, cols, rows);
}
