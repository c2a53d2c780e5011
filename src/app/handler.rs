//! Event handling and state transition logic.
//!
//! [`handle_event`] is the only entry point through which the plugin shim
//! changes state. It pattern-matches the event, calls the controller methods on
//! [`AppState`] and collects the resulting actions.
//!
//! # Event Types
//!
//! - **Navigation**: `KeyDown`, `KeyUp`, `CycleCategory`
//! - **Search**: `SearchMode`, `FocusSearchBar`, `FocusResults`, `ExitSearch`
//! - **Input**: `Char`, `Backspace`
//! - **Cards**: `FlipSelected`, `NewCard`, `EditSelected`, `DeleteSelected`, `Reload`
//! - **Form**: `NextField`, `PrevField`, `Submit`, `CancelForm`
//! - **Confirmation**: `ConfirmDelete`, `CancelDelete`
//! - **Host**: `PermissionsResult`, `ApiResponse`
//!
//! # Example
//!
//! ```
//! use flashdeck::app::{handle_event, Action, AppState, Event};
//! use flashdeck::ui::Theme;
//!
//! let mut state = AppState::new(Theme::default());
//! let (render, actions) = handle_event(&mut state, &Event::PermissionsResult { granted: true })?;
//! assert!(!render);
//! assert!(matches!(actions.as_slice(), [Action::Request(_)]));
//! # Ok::<(), flashdeck::FlashdeckError>(())
//! ```

use super::modes::{InputMode, SearchFocus};
use crate::api::ApiResponse;
use crate::app::{Action, AppState};
use crate::domain::error::Result;

/// Events triggered by user input or by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Moves selection cursor down by one position (wraps to top).
    KeyDown,
    /// Moves selection cursor up by one position (wraps to bottom).
    KeyUp,
    /// Closes the floating pane and hides the plugin UI.
    CloseFocus,
    /// Enters search mode with typing focus.
    SearchMode,
    /// Focuses the search input field (from navigating mode).
    FocusSearchBar,
    /// Focuses the search results list (from typing mode).
    FocusResults,
    /// Exits search mode and clears the query.
    ExitSearch,
    /// Types a character into the form or the search query.
    Char(char),
    /// Deletes the last character of the form field or the search query.
    Backspace,

    /// Advances the category filter.
    CycleCategory,
    /// Re-fetches the card list.
    Reload,
    /// Flips or unflips the selected card.
    FlipSelected,
    /// Opens the form for a new card.
    NewCard,
    /// Opens the form for the selected card.
    EditSelected,
    /// Asks for confirmation to delete the selected card.
    DeleteSelected,
    /// Deletes the card awaiting confirmation.
    ConfirmDelete,
    /// Keeps the card awaiting confirmation.
    CancelDelete,

    /// Moves form focus to the next field.
    NextField,
    /// Moves form focus to the previous field.
    PrevField,
    /// Submits the working draft.
    Submit,
    /// Closes the form without saving.
    CancelForm,

    /// Reports whether the host granted web access.
    PermissionsResult {
        granted: bool,
    },

    /// Delivers the outcome of a data access request.
    ApiResponse(ApiResponse),
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// # Returns
///
/// `(should_render, actions)`. Actions are executed in order by the plugin shim.
///
/// # Errors
///
/// Reserved for failures inside state transitions. Data access failures are
/// never returned: they are recorded on the state and logged.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::KeyDown => {
            state.move_selection_down();
            Ok((true, vec![]))
        }
        Event::KeyUp => {
            state.move_selection_up();
            Ok((true, vec![]))
        }
        Event::CloseFocus => Ok((false, vec![Action::CloseFocus])),
        Event::SearchMode => {
            tracing::debug!("entering search mode");
            state.input_mode = InputMode::Search(SearchFocus::Typing);
            state.search_query = String::new();
            state.apply_filters();
            Ok((true, vec![]))
        }
        Event::FocusSearchBar => {
            state.input_mode = InputMode::Search(SearchFocus::Typing);
            Ok((true, vec![]))
        }
        Event::FocusResults => {
            if state.search_query.trim().is_empty() {
                state.input_mode = InputMode::Normal;
                state.search_query = String::new();
                state.apply_filters();
                return Ok((true, vec![]));
            }

            state.input_mode = InputMode::Search(SearchFocus::Navigating);
            Ok((true, vec![]))
        }
        Event::ExitSearch => {
            tracing::debug!(query = %state.search_query, "exiting search mode");
            state.input_mode = InputMode::Normal;
            state.search_query = String::new();
            state.apply_filters();
            Ok((true, vec![]))
        }
        Event::Char(c) => {
            if state.form.is_open() {
                state.form_input(*c);
                return Ok((true, vec![]));
            }

            if state.input_mode != InputMode::Search(SearchFocus::Typing) {
                return Ok((false, vec![]));
            }

            state.search_query.push(*c);
            tracing::trace!(query = %state.search_query, char = %c, "search query updated");
            state.apply_filters();
            Ok((true, vec![]))
        }
        Event::Backspace => {
            if state.form.is_open() {
                state.form_backspace();
                return Ok((true, vec![]));
            }

            if state.input_mode != InputMode::Search(SearchFocus::Typing) {
                return Ok((false, vec![]));
            }

            state.search_query.pop();
            state.apply_filters();
            Ok((true, vec![]))
        }
        Event::CycleCategory => {
            state.cycle_category();
            Ok((true, vec![]))
        }
        Event::Reload => Ok((false, vec![state.load_all()])),
        Event::FlipSelected => {
            let Some(id) = state.selected_id() else {
                tracing::debug!("no persisted card selected to flip");
                return Ok((false, vec![]));
            };
            state.toggle_flip(id);
            Ok((true, vec![]))
        }
        Event::NewCard => {
            state.start_create();
            Ok((true, vec![]))
        }
        Event::EditSelected => {
            let Some(card) = state.selected_card().cloned() else {
                tracing::debug!("no card selected to edit");
                return Ok((false, vec![]));
            };
            state.start_edit(&card);
            Ok((true, vec![]))
        }
        Event::DeleteSelected => {
            let Some(id) = state.selected_id() else {
                tracing::debug!("no persisted card selected to delete");
                return Ok((false, vec![]));
            };
            state.remove(id);
            Ok((true, vec![]))
        }
        Event::ConfirmDelete => {
            let actions: Vec<Action> = state.confirm_remove().into_iter().collect();
            Ok((true, actions))
        }
        Event::CancelDelete => {
            state.cancel_remove();
            Ok((true, vec![]))
        }
        Event::NextField => {
            state.focus_next_field();
            Ok((true, vec![]))
        }
        Event::PrevField => {
            state.focus_prev_field();
            Ok((true, vec![]))
        }
        Event::Submit => {
            let actions: Vec<Action> = state.submit().into_iter().collect();
            Ok((true, actions))
        }
        Event::CancelForm => {
            state.cancel();
            Ok((true, vec![]))
        }
        Event::PermissionsResult { granted } => {
            if *granted {
                tracing::debug!("web access granted, loading cards");
                Ok((false, vec![state.load_all()]))
            } else {
                tracing::warn!("web access denied, flashcards cannot be loaded");
                state.status = Some("Web access was denied; flashcards cannot be loaded".to_string());
                Ok((true, vec![]))
            }
        }
        Event::ApiResponse(response) => Ok(apply_response(state, response)),
    }
}

/// Applies the outcome of a data access request.
///
/// Successful writes end in exactly one full refresh; create and update also
/// close the form. Failures leave list, form and draft as they were.
fn apply_response(state: &mut AppState, response: &ApiResponse) -> (bool, Vec<Action>) {
    let _span = tracing::info_span!("apply_response", request = response.kind().as_str()).entered();

    match response {
        ApiResponse::Loaded { cards } => {
            tracing::debug!(count = cards.len(), "cards loaded");
            state.replace_cards(cards.clone());
            state.status = None;
            (true, vec![])
        }
        ApiResponse::Created { card } => {
            tracing::info!(card_id = ?card.as_ref().and_then(|c| c.id), "flashcard created");
            let refresh = state.load_all();
            state.cancel();
            (true, vec![refresh])
        }
        ApiResponse::Updated { id, .. } => {
            tracing::info!(card_id = id, "flashcard updated");
            let refresh = state.load_all();
            state.cancel();
            (true, vec![refresh])
        }
        ApiResponse::Deleted { id } => {
            tracing::info!(card_id = id, "flashcard deleted");
            if state.flipped == Some(*id) {
                state.flipped = None;
            }
            (false, vec![state.load_all()])
        }
        ApiResponse::Failed { request, id, message } => {
            tracing::debug!(card_id = ?id, "request failed");
            state.record_failure(*request, message);
            (true, vec![])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiRequest, RequestKind};
    use crate::domain::Flashcard;
    use crate::ui::Theme;

    fn card(id: i64, question: &str) -> Flashcard {
        Flashcard {
            id: Some(id),
            ..Flashcard::new(question, "answer", "deck")
        }
    }

    #[test]
    fn typing_goes_to_form_before_search() {
        let mut state = AppState::new(Theme::default());
        handle_event(&mut state, &Event::SearchMode).unwrap();
        handle_event(&mut state, &Event::NewCard).unwrap();

        handle_event(&mut state, &Event::Char('x')).unwrap();

        assert_eq!(state.draft.question, "x");
        assert!(state.search_query.is_empty());
    }

    #[test]
    fn characters_are_ignored_in_normal_mode() {
        let mut state = AppState::new(Theme::default());
        let (render, actions) = handle_event(&mut state, &Event::Char('j')).unwrap();

        assert!(!render);
        assert!(actions.is_empty());
    }

    #[test]
    fn focus_results_with_empty_query_leaves_search() {
        let mut state = AppState::new(Theme::default());
        handle_event(&mut state, &Event::SearchMode).unwrap();
        handle_event(&mut state, &Event::FocusResults).unwrap();

        assert_eq!(state.input_mode, InputMode::Normal);
    }

    #[test]
    fn denied_permission_is_reported() {
        let mut state = AppState::new(Theme::default());
        let (_, actions) =
            handle_event(&mut state, &Event::PermissionsResult { granted: false }).unwrap();

        assert!(actions.is_empty());
        assert!(state.status.is_some());
    }

    #[test]
    fn delete_success_refreshes_without_touching_form() {
        let mut state = AppState::new(Theme::default());
        state.replace_cards(vec![card(1, "a"), card(2, "b")]);
        state.start_create();
        state.form_input('q');

        let (_, actions) = handle_event(
            &mut state,
            &Event::ApiResponse(ApiResponse::Deleted { id: 2 }),
        )
        .unwrap();

        assert!(matches!(
            actions.as_slice(),
            [Action::Request(ApiRequest::FetchAll { .. })]
        ));
        assert_eq!(state.cards.len(), 2);
        assert_eq!(state.draft.question, "q");
    }

    #[test]
    fn failed_refresh_keeps_previous_list() {
        let mut state = AppState::new(Theme::default());
        state.replace_cards(vec![card(1, "a")]);

        handle_event(
            &mut state,
            &Event::ApiResponse(ApiResponse::Failed {
                request: RequestKind::FetchAll,
                id: None,
                message: "Request failed: HTTP 503: down".to_string(),
            }),
        )
        .unwrap();

        assert_eq!(state.cards, vec![card(1, "a")]);
        assert_eq!(
            state.status.as_deref(),
            Some("Could not load flashcards: Request failed: HTTP 503: down")
        );
    }

    #[test]
    fn successful_load_clears_status() {
        let mut state = AppState::new(Theme::default());
        state.status = Some("old error".to_string());

        handle_event(
            &mut state,
            &Event::ApiResponse(ApiResponse::Loaded { cards: vec![card(4, "d")] }),
        )
        .unwrap();

        assert_eq!(state.status, None);
        assert_eq!(state.filtered_cards.len(), 1);
    }
}
