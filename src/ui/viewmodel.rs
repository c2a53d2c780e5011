//! View model types representing renderable UI state.
//!
//! View models are computed from `AppState` by `compute_viewmodel()` and consumed
//! by the renderer. They hold display-ready strings and flags only.

/// Complete UI view model for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UIViewModel {
    /// Card rows in the visible window.
    pub display_items: Vec<DisplayItem>,

    /// Index of the selected row within `display_items`.
    pub selected_index: usize,

    pub header: HeaderInfo,

    pub footer: FooterInfo,

    /// Message shown instead of the card list when nothing is visible.
    pub empty_state: Option<EmptyState>,

    /// Present while search mode is active.
    pub search_bar: Option<SearchBarInfo>,

    /// Present while the editor form is open.
    pub form: Option<FormInfo>,

    /// Present while a delete awaits confirmation.
    pub confirm: Option<ConfirmInfo>,

    /// Last error or validation message.
    pub status: Option<String>,
}

/// Display information for a single card row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    pub category: String,

    /// Question, or the answer when the card is flipped.
    pub text: String,

    /// Formatted creation date, empty when unknown.
    pub created: String,

    pub is_selected: bool,

    pub is_flipped: bool,

    /// Character ranges of `text` to highlight for search matches.
    ///
    /// Each tuple is `(start_index, end_index)` in character indices.
    pub highlight_ranges: Vec<(usize, usize)>,
}

/// Header display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
}

/// Footer display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    /// Keybinding help text for the current mode.
    pub keybindings: String,
}

/// Empty state message display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    /// Primary message (e.g., "No flashcards found").
    pub message: String,

    /// Secondary explanatory text.
    pub subtitle: String,
}

/// Search bar display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    pub query: String,

    /// Whether typed characters currently go to the query.
    pub is_typing: bool,
}

/// Editor form overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormInfo {
    /// "New flashcard" or "Edit flashcard".
    pub title: String,

    /// Fields in form order.
    pub fields: Vec<FormFieldInfo>,
}

/// One labelled input of the editor form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFieldInfo {
    pub label: &'static str,
    pub value: String,
    pub is_focused: bool,
}

/// Delete confirmation overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmInfo {
    pub prompt: String,

    /// Question of the card about to be deleted, if it is in the list.
    pub detail: Option<String>,
}
