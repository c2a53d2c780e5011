//! Input and form state types for the application.
//!
//! These enums form the small state machines that decide which keybindings are
//! active and which overlay the renderer draws.
//!
//! # State Machines
//!
//! Input handling for the list:
//! - **Normal**: Navigation and card commands
//! - **Search**: Active search with typing or result navigation focus
//!
//! The editor form:
//!
//! ```text
//! Hidden --start_create--> CreatingNew --submit ok / cancel--> Hidden
//! Hidden --start_edit(c)--> Editing(c) --submit ok / cancel--> Hidden
//! ```

use crate::domain::Flashcard;

/// Focus state within search mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFocus {
    /// User is typing in the search input field.
    Typing,

    /// User is navigating through filtered results.
    ///
    /// Accepts j/k for movement, space to flip and / to return to Typing.
    Navigating,
}

/// Current input handling mode for the card list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Default navigation and command mode.
    ///
    /// Available keybindings: j/k (navigate), space (flip), n (new), e (edit),
    /// d (delete), c (category), r (reload), / (search), q (quit).
    Normal,

    /// Active search mode with focus state.
    Search(SearchFocus),
}

/// Visibility and purpose of the editor form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormState {
    /// No form is shown.
    #[default]
    Hidden,

    /// The form edits a brand-new card.
    CreatingNew,

    /// The form edits a copy of a persisted card.
    ///
    /// The held card is the edit target, detached from the list entry it was
    /// copied from.
    Editing(Flashcard),
}

impl FormState {
    /// Returns `true` unless the form is hidden.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::Hidden)
    }

    /// Returns the edit target, if the form is editing a persisted card.
    #[must_use]
    pub const fn edit_target(&self) -> Option<&Flashcard> {
        match self {
            Self::Editing(card) => Some(card),
            Self::Hidden | Self::CreatingNew => None,
        }
    }
}
