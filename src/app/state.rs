//! Application state and the flashcard view-state controller.
//!
//! [`AppState`] is the single source of truth for everything the plugin shows:
//! the card list as last fetched, the derived visible subset, the selection
//! cursor, the editor form with its working draft, the flipped card and the
//! pending delete confirmation.
//!
//! # Controller Operations
//!
//! The controller methods never perform I/O. Operations that need the backend
//! return an [`Action`] carrying an [`ApiRequest`]; the outcome arrives later
//! through [`handle_event`](crate::app::handle_event).
//!
//! - [`AppState::load_all`]: request the full list
//! - [`AppState::start_create`] / [`AppState::start_edit`]: open the form
//! - [`AppState::submit`]: validate the draft and request create or update
//! - [`AppState::remove`] / [`AppState::confirm_remove`] / [`AppState::cancel_remove`]:
//!   the delete confirmation gate
//! - [`AppState::toggle_flip`]: show the answer of a card, or hide it again
//! - [`AppState::cancel`]: close the form and drop the draft
//!
//! The list is never patched locally: [`AppState::replace_cards`] swaps it
//! wholesale whenever a fetch succeeds.
//!
//! # Example
//!
//! ```
//! use flashdeck::app::AppState;
//! use flashdeck::ui::Theme;
//!
//! let mut state = AppState::new(Theme::default());
//! state.toggle_flip(5);
//! assert_eq!(state.flipped, Some(5));
//! state.toggle_flip(5);
//! assert_eq!(state.flipped, None);
//! ```

use super::actions::Action;
use super::modes::{FormState, InputMode};
use crate::api::{ApiRequest, RequestKind};
use crate::domain::{Field, Flashcard};
use crate::ui::theme::Theme;
use fuzzy_matcher::skim::SkimMatcherV2;

/// Display format for creation timestamps when none is configured.
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Central application state container.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Cards exactly as returned by the last successful fetch, in backend order.
    pub cards: Vec<Flashcard>,

    /// Cards matching the category filter and search query.
    ///
    /// Recomputed by `apply_filters()`. Keeps backend order.
    pub filtered_cards: Vec<Flashcard>,

    /// Zero-based index of the selected card within `filtered_cards`.
    pub selected_index: usize,

    /// Editor form state, including the edit target while editing.
    pub form: FormState,

    /// Working draft bound to the form fields.
    ///
    /// Always an owned copy; never shares storage with an entry of `cards`.
    pub draft: Flashcard,

    /// Form field receiving typed characters.
    pub form_focus: Field,

    /// Id of the card currently showing its answer.
    pub flipped: Option<i64>,

    /// Id of the card awaiting delete confirmation.
    pub pending_delete: Option<i64>,

    /// Current input handling mode for the list.
    pub input_mode: InputMode,

    /// Current search query string.
    pub search_query: String,

    /// Category the list is restricted to, if any.
    pub category_filter: Option<String>,

    /// Last error or validation message shown above the footer.
    pub status: Option<String>,

    /// Color scheme for UI rendering.
    pub theme: Theme,

    /// chrono format string used for creation timestamps.
    pub date_format: String,
}

impl AppState {
    /// Creates an empty state with the form hidden and nothing flipped.
    #[must_use]
    pub fn new(theme: Theme) -> Self {
        Self {
            cards: vec![],
            filtered_cards: vec![],
            selected_index: 0,
            form: FormState::Hidden,
            draft: Flashcard::empty(),
            form_focus: Field::Question,
            flipped: None,
            pending_delete: None,
            input_mode: InputMode::Normal,
            search_query: String::new(),
            category_filter: None,
            status: None,
            theme,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    /// Sets the timestamp display format.
    #[must_use]
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Requests the full current list from the backend.
    ///
    /// The list is replaced once the response arrives; until then the previous
    /// list stays displayed.
    #[must_use]
    pub fn load_all(&self) -> Action {
        tracing::debug!(current_cards = self.cards.len(), "requesting full card list");
        Action::Request(ApiRequest::fetch_all())
    }

    /// Replaces the in-memory list with a freshly fetched one.
    ///
    /// Selection follows the previously selected card when it is still visible.
    /// A flipped card that no longer exists is unflipped.
    pub fn replace_cards(&mut self, cards: Vec<Flashcard>) {
        let selected_id = self.selected_card().and_then(|card| card.id);

        self.cards = cards;

        if let Some(flipped) = self.flipped {
            if !self.cards.iter().any(|card| card.id == Some(flipped)) {
                self.flipped = None;
            }
        }

        self.apply_filters();

        if let Some(id) = selected_id {
            if let Some(index) = self.filtered_cards.iter().position(|c| c.id == Some(id)) {
                self.selected_index = index;
            }
        }

        tracing::debug!(
            total = self.cards.len(),
            visible = self.filtered_cards.len(),
            "card list replaced"
        );
    }

    /// Opens the form for a new card with an empty draft.
    pub fn start_create(&mut self) {
        self.form = FormState::CreatingNew;
        self.draft = Flashcard::empty();
        self.form_focus = Field::Question;
        self.status = None;
        tracing::debug!("form opened for new card");
    }

    /// Opens the form for editing `card`.
    ///
    /// Both the edit target and the draft are independent copies, so typing in
    /// the form never changes the displayed list entry.
    pub fn start_edit(&mut self, card: &Flashcard) {
        self.form = FormState::Editing(card.clone());
        self.draft = card.clone();
        self.form_focus = Field::Question;
        self.status = None;
        tracing::debug!(card_id = ?card.id, "form opened for editing");
    }

    /// Submits the working draft.
    ///
    /// With an edit target that has an id, an update is requested for that id;
    /// otherwise the draft is created as a new card. The draft is left untouched
    /// so that a failed request keeps the user's input.
    ///
    /// # Returns
    ///
    /// - `None` if the form is hidden or the draft fails validation (the reason
    ///   goes to the status line)
    /// - `Some(Action::Request(..))` otherwise
    pub fn submit(&mut self) -> Option<Action> {
        if !self.form.is_open() {
            return None;
        }

        if let Err(e) = self.draft.validate() {
            tracing::debug!(error = %e, "draft rejected by validation");
            self.status = Some(e.to_string());
            return None;
        }

        self.status = None;

        let request = match self.form.edit_target().and_then(|target| target.id) {
            Some(id) => {
                let mut card = self.draft.clone();
                card.id = Some(id);
                tracing::debug!(card_id = id, "submitting card update");
                ApiRequest::update(id, card)
            }
            None => {
                let mut card = self.draft.clone();
                card.id = None;
                tracing::debug!("submitting new card");
                ApiRequest::create(card)
            }
        };

        Some(Action::Request(request))
    }

    /// Arms the delete confirmation for `id`. Nothing is sent yet.
    pub fn remove(&mut self, id: i64) {
        tracing::debug!(card_id = id, "delete awaiting confirmation");
        self.pending_delete = Some(id);
        self.status = None;
    }

    /// Confirms the armed delete and returns the request for it.
    ///
    /// Returns `None` when no delete is armed.
    pub fn confirm_remove(&mut self) -> Option<Action> {
        let id = self.pending_delete.take()?;
        tracing::debug!(card_id = id, "delete confirmed");
        Some(Action::Request(ApiRequest::delete(id)))
    }

    /// Disarms a pending delete confirmation.
    pub fn cancel_remove(&mut self) {
        if let Some(id) = self.pending_delete.take() {
            tracing::debug!(card_id = id, "delete declined");
        }
    }

    /// Flips the card `id`, or unflips it if it is already flipped.
    ///
    /// At most one card is flipped at a time.
    pub fn toggle_flip(&mut self, id: i64) {
        self.flipped = if self.flipped == Some(id) { None } else { Some(id) };
    }

    /// Hides the form, clears the edit target and resets the draft.
    pub fn cancel(&mut self) {
        self.form = FormState::Hidden;
        self.draft = Flashcard::empty();
        self.form_focus = Field::Question;
    }

    /// Records a failed data access call.
    ///
    /// The failure is logged at error level and shown on the status line. No other
    /// state changes.
    pub fn record_failure(&mut self, request: RequestKind, message: &str) {
        let _span = tracing::info_span!("record_failure", request = request.as_str()).entered();
        tracing::error!(
            request = request.as_str(),
            error = %message,
            "failed to {}",
            request.describe()
        );
        self.status = Some(format!("Could not {}: {message}", request.describe()));
    }

    /// Appends a character to the focused form field.
    pub fn form_input(&mut self, c: char) {
        self.draft.field_mut(self.form_focus).push(c);
    }

    /// Removes the last character of the focused form field.
    pub fn form_backspace(&mut self) {
        self.draft.field_mut(self.form_focus).pop();
    }

    /// Moves form focus to the next field, wrapping around.
    pub fn focus_next_field(&mut self) {
        self.form_focus = self.form_focus.next();
    }

    /// Moves form focus to the previous field, wrapping around.
    pub fn focus_prev_field(&mut self) {
        self.form_focus = self.form_focus.prev();
    }

    /// Moves selection cursor down by one position, wrapping to top if at end.
    pub fn move_selection_down(&mut self) {
        if self.filtered_cards.is_empty() {
            return;
        }
        self.selected_index = (self.selected_index + 1) % self.filtered_cards.len();
    }

    /// Moves selection cursor up by one position, wrapping to bottom if at start.
    pub fn move_selection_up(&mut self) {
        if self.filtered_cards.is_empty() {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = self.filtered_cards.len() - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    /// Returns the currently selected card, if any.
    #[must_use]
    pub fn selected_card(&self) -> Option<&Flashcard> {
        self.filtered_cards.get(self.selected_index)
    }

    /// Returns the id of the currently selected card, if it has one.
    #[must_use]
    pub fn selected_id(&self) -> Option<i64> {
        self.selected_card().and_then(|card| card.id)
    }

    /// Distinct non-empty categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for card in &self.cards {
            if !card.category.is_empty() && !seen.contains(&card.category) {
                seen.push(card.category.clone());
            }
        }
        seen
    }

    /// Advances the category filter: all, then each category, then all again.
    pub fn cycle_category(&mut self) {
        let categories = self.categories();

        self.category_filter = match &self.category_filter {
            None => categories.first().cloned(),
            Some(current) => categories
                .iter()
                .position(|c| c == current)
                .and_then(|i| categories.get(i + 1))
                .cloned(),
        };

        tracing::debug!(category = ?self.category_filter, "category filter changed");
        self.apply_filters();
    }

    /// Applies the category filter and search query to the card list.
    ///
    /// The query is split on whitespace; every token must fuzzy-match the
    /// question, the answer or the category. Updates `filtered_cards` and clamps
    /// `selected_index` to valid bounds.
    pub fn apply_filters(&mut self) {
        use fuzzy_matcher::FuzzyMatcher;

        let _span = tracing::debug_span!(
            "apply_filters",
            total_cards = self.cards.len(),
            query_len = self.search_query.len(),
            category = ?self.category_filter
        )
        .entered();

        let tokens: Vec<String> = self
            .search_query
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();

        let matcher = if tokens.is_empty() {
            None
        } else {
            Some(SkimMatcherV2::default())
        };

        let filtered_iter = self.cards.iter().filter(|card| {
            let passes_category = self
                .category_filter
                .as_ref()
                .map_or(true, |category| &card.category == category);

            if !passes_category {
                return false;
            }

            matcher.as_ref().map_or(true, |m| {
                let haystacks = [
                    card.question.to_lowercase(),
                    card.answer.to_lowercase(),
                    card.category.to_lowercase(),
                ];
                tokens.iter().all(|token| {
                    haystacks
                        .iter()
                        .any(|text| m.fuzzy_match(text, token).is_some())
                })
            })
        });

        self.filtered_cards = filtered_iter.cloned().collect();

        if self.filtered_cards.is_empty() {
            self.selected_index = 0;
        } else {
            self.selected_index = self.selected_index.min(self.filtered_cards.len() - 1);
        }

        tracing::debug!(filtered_count = self.filtered_cards.len(), "filters applied");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: i64, question: &str, answer: &str, category: &str) -> Flashcard {
        Flashcard {
            id: Some(id),
            ..Flashcard::new(question, answer, category)
        }
    }

    fn loaded(cards: Vec<Flashcard>) -> AppState {
        let mut state = AppState::new(Theme::default());
        state.replace_cards(cards);
        state
    }

    #[test]
    fn start_create_resets_draft_after_editing() {
        let mut state = loaded(vec![card(1, "q", "a", "c")]);
        let first = state.cards[0].clone();
        state.start_edit(&first);
        state.form_input('!');

        state.start_create();

        assert_eq!(state.form, FormState::CreatingNew);
        assert_eq!(state.draft, Flashcard::new("", "", ""));
    }

    #[test]
    fn submit_with_invalid_draft_reports_and_sends_nothing() {
        let mut state = AppState::new(Theme::default());
        state.start_create();
        state.draft.question = "only a question".to_string();

        assert_eq!(state.submit(), None);
        assert_eq!(state.status.as_deref(), Some("Answer is required"));
        assert_eq!(state.form, FormState::CreatingNew);
        assert_eq!(state.draft.question, "only a question");
    }

    #[test]
    fn submit_on_hidden_form_is_a_no_op() {
        let mut state = AppState::new(Theme::default());
        assert_eq!(state.submit(), None);
    }

    #[test]
    fn submit_while_editing_targets_the_edited_id() {
        let mut state = loaded(vec![card(3, "capital of France?", "Paris", "geo")]);
        let target = state.cards[0].clone();
        state.start_edit(&target);
        state.draft.answer = "Paris, France".to_string();

        let Some(Action::Request(ApiRequest::Update { id, card, .. })) = state.submit() else {
            panic!("expected update request");
        };
        assert_eq!(id, 3);
        assert_eq!(card.answer, "Paris, France");
    }

    #[test]
    fn confirm_without_armed_delete_sends_nothing() {
        let mut state = loaded(vec![card(1, "q", "a", "c")]);
        assert_eq!(state.confirm_remove(), None);

        state.remove(1);
        state.cancel_remove();
        assert_eq!(state.confirm_remove(), None);
    }

    #[test]
    fn selection_wraps_in_both_directions() {
        let mut state = loaded(vec![card(1, "a", "a", "x"), card(2, "b", "b", "x")]);

        state.move_selection_up();
        assert_eq!(state.selected_id(), Some(2));
        state.move_selection_down();
        assert_eq!(state.selected_id(), Some(1));
    }

    #[test]
    fn replace_cards_keeps_selection_on_same_card() {
        let mut state = loaded(vec![card(1, "a", "a", "x"), card(2, "b", "b", "x")]);
        state.move_selection_down();

        state.replace_cards(vec![card(9, "new", "n", "x"), card(1, "a", "a", "x"), card(2, "b", "b", "x")]);

        assert_eq!(state.selected_id(), Some(2));
    }

    #[test]
    fn replace_cards_unflips_vanished_card() {
        let mut state = loaded(vec![card(1, "a", "a", "x"), card(2, "b", "b", "x")]);
        state.toggle_flip(2);

        state.replace_cards(vec![card(1, "a", "a", "x")]);

        assert_eq!(state.flipped, None);
    }

    #[test]
    fn search_matches_question_answer_or_category() {
        let mut state = loaded(vec![
            card(1, "What is Rust?", "A language", "programming"),
            card(2, "Capital of Peru?", "Lima", "geography"),
        ]);

        state.search_query = "lima".to_string();
        state.apply_filters();
        assert_eq!(state.filtered_cards.len(), 1);
        assert_eq!(state.filtered_cards[0].id, Some(2));

        state.search_query = "program rust".to_string();
        state.apply_filters();
        assert_eq!(state.filtered_cards.len(), 1);
        assert_eq!(state.filtered_cards[0].id, Some(1));
    }

    #[test]
    fn category_filter_cycles_through_first_seen_order() {
        let mut state = loaded(vec![
            card(1, "a", "a", "math"),
            card(2, "b", "b", "geo"),
            card(3, "c", "c", "math"),
        ]);

        state.cycle_category();
        assert_eq!(state.category_filter.as_deref(), Some("math"));
        assert_eq!(state.filtered_cards.len(), 2);

        state.cycle_category();
        assert_eq!(state.category_filter.as_deref(), Some("geo"));

        state.cycle_category();
        assert_eq!(state.category_filter, None);
        assert_eq!(state.filtered_cards.len(), 3);
    }

    #[test]
    fn form_input_goes_to_focused_field() {
        let mut state = AppState::new(Theme::default());
        state.start_create();

        state.form_input('q');
        state.focus_next_field();
        state.form_input('a');
        state.focus_next_field();
        state.form_input('c');
        state.form_input('x');
        state.form_backspace();

        assert_eq!(state.draft, Flashcard::new("q", "a", "c"));
    }
}
