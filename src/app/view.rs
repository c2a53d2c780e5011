//! View model computation for [`AppState`].
//!
//! The renderer never reads controller state directly. Every frame is derived
//! from a fresh [`UIViewModel`] built here, which handles windowing around the
//! selection, flip state, search highlighting and the overlays.

use super::modes::{FormState, InputMode, SearchFocus};
use super::state::AppState;
use crate::domain::{Field, Flashcard};
use crate::ui::helpers::truncate_chars;
use crate::ui::viewmodel::{
    ConfirmInfo, DisplayItem, EmptyState, FooterInfo, FormFieldInfo, FormInfo, HeaderInfo,
    SearchBarInfo, UIViewModel,
};
use fuzzy_matcher::skim::SkimMatcherV2;

/// Rows taken by margins, header, borders, column headers, status line and footer.
const NORMAL_CHROME_ROWS: usize = 8;

/// Extra rows taken by the search box.
const SEARCH_BAR_ROWS: usize = 3;

/// Width of the category column, separator included.
pub const CATEGORY_COLUMN_WIDTH: usize = 18;

/// Width of the right-aligned creation date column.
pub const DATE_COLUMN_WIDTH: usize = 12;

impl AppState {
    /// Computes a renderable view model for a pane of `rows` by `cols` cells.
    ///
    /// Only the window of cards that fits is included; the window is centered on
    /// the selection and pulled back near the ends of the list. Card text is
    /// truncated to the width left over by the category and date columns.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        let mut vm = UIViewModel {
            display_items: vec![],
            selected_index: 0,
            header: self.compute_header(),
            footer: self.compute_footer(),
            empty_state: None,
            search_bar: self.compute_search_bar(),
            form: self.compute_form(),
            confirm: self.compute_confirm(),
            status: self.status.clone(),
        };

        if self.filtered_cards.is_empty() {
            vm.empty_state = Some(self.compute_empty_state());
            return vm;
        }

        let available_rows = self.calculate_available_rows(rows).max(1);

        let mut visible_start = self.selected_index.saturating_sub(available_rows / 2);
        let visible_end = (visible_start + available_rows).min(self.filtered_cards.len());

        let actual_count = visible_end - visible_start;
        if actual_count < available_rows && self.filtered_cards.len() >= available_rows {
            visible_start = visible_end.saturating_sub(available_rows);
        }

        let matcher = if matches!(self.input_mode, InputMode::Search(_))
            && !self.search_query.trim().is_empty()
        {
            Some(SkimMatcherV2::default())
        } else {
            None
        };

        vm.display_items = self.filtered_cards[visible_start..visible_end]
            .iter()
            .enumerate()
            .map(|(relative_idx, card)| {
                self.compute_display_item(card, visible_start + relative_idx, cols, matcher.as_ref())
            })
            .collect();
        vm.selected_index = self.selected_index.saturating_sub(visible_start);

        vm
    }

    fn compute_display_item(
        &self,
        card: &Flashcard,
        absolute_idx: usize,
        cols: usize,
        matcher: Option<&SkimMatcherV2>,
    ) -> DisplayItem {
        let is_flipped = card.id.is_some() && card.id == self.flipped;
        let raw = if is_flipped { &card.answer } else { &card.question };
        let max_text_width = cols.saturating_sub(CATEGORY_COLUMN_WIDTH + DATE_COLUMN_WIDTH + 1);
        let text = truncate_chars(&single_line(raw), max_text_width);
        let text_len = text.chars().count();

        let highlight_ranges = matcher.map_or_else(Vec::new, |m| {
            self.compute_highlight_ranges(&text, m)
                .into_iter()
                .filter(|&(start, _)| start < text_len)
                .map(|(start, end)| (start, end.min(text_len)))
                .collect()
        });

        DisplayItem {
            category: truncate_chars(&card.category, CATEGORY_COLUMN_WIDTH - 2),
            text,
            created: card
                .created_display(&self.date_format)
                .map(|created| truncate_chars(&single_line(&created), DATE_COLUMN_WIDTH))
                .unwrap_or_default(),
            is_selected: absolute_idx == self.selected_index,
            is_flipped,
            highlight_ranges,
        }
    }

    /// Coalesces fuzzy match indices into contiguous `(start, end)` ranges.
    fn compute_highlight_ranges(&self, text: &str, matcher: &SkimMatcherV2) -> Vec<(usize, usize)> {
        use fuzzy_matcher::FuzzyMatcher;

        let Some((_score, indices)) = matcher.fuzzy_indices(text, self.search_query.trim()) else {
            return vec![];
        };

        let mut ranges: Vec<(usize, usize)> = Vec::new();
        for idx in indices {
            match ranges.last_mut() {
                Some((_, end)) if *end == idx => *end = idx + 1,
                _ => ranges.push((idx, idx + 1)),
            }
        }
        ranges
    }

    fn compute_header(&self) -> HeaderInfo {
        let counts = format!("{}/{}", self.filtered_cards.len(), self.cards.len());
        let title = match &self.category_filter {
            Some(category) => format!(" Flashcards ({counts}) · {category} "),
            None => format!(" Flashcards ({counts}) "),
        };
        HeaderInfo { title }
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = if self.pending_delete.is_some() {
            "y/Enter: delete  n/ESC: keep"
        } else if self.form.is_open() {
            "Enter: save  Tab/Shift+Tab: field  ESC: cancel"
        } else {
            match self.input_mode {
                InputMode::Search(SearchFocus::Typing) => {
                    "ESC: exit search  Enter: results  Ctrl+n/p: navigate  Type to filter"
                }
                InputMode::Search(SearchFocus::Navigating) => {
                    "ESC: exit search  /: edit query  j/k: navigate  Space: flip  e: edit  d: delete"
                }
                InputMode::Normal => {
                    "j/k: navigate  Space: flip  n: new  e: edit  d: delete  c: category  /: search  r: reload  q: quit"
                }
            }
        };

        FooterInfo {
            keybindings: keybindings.to_string(),
        }
    }

    fn compute_search_bar(&self) -> Option<SearchBarInfo> {
        match self.input_mode {
            InputMode::Search(focus) => Some(SearchBarInfo {
                query: self.search_query.clone(),
                is_typing: focus == SearchFocus::Typing,
            }),
            InputMode::Normal => None,
        }
    }

    fn compute_form(&self) -> Option<FormInfo> {
        let title = match &self.form {
            FormState::Hidden => return None,
            FormState::CreatingNew => "New flashcard".to_string(),
            FormState::Editing(target) => match target.id {
                Some(id) => format!("Edit flashcard #{id}"),
                None => "Edit flashcard".to_string(),
            },
        };

        let fields = Field::ALL
            .iter()
            .map(|&field| FormFieldInfo {
                label: field.label(),
                value: single_line(self.draft.field(field)),
                is_focused: field == self.form_focus,
            })
            .collect();

        Some(FormInfo { title, fields })
    }

    fn compute_confirm(&self) -> Option<ConfirmInfo> {
        let id = self.pending_delete?;
        let detail = self
            .cards
            .iter()
            .find(|card| card.id == Some(id))
            .map(|card| single_line(&card.question));

        Some(ConfirmInfo {
            prompt: format!("Delete flashcard #{id}? This cannot be undone."),
            detail,
        })
    }

    fn compute_empty_state(&self) -> EmptyState {
        if self.cards.is_empty() {
            EmptyState {
                message: "No flashcards found".to_string(),
                subtitle: "Press n to create your first flashcard".to_string(),
            }
        } else {
            EmptyState {
                message: "No matching flashcards".to_string(),
                subtitle: "Change the search or press c to switch category".to_string(),
            }
        }
    }

    const fn calculate_available_rows(&self, total_rows: usize) -> usize {
        match self.input_mode {
            InputMode::Normal => total_rows.saturating_sub(NORMAL_CHROME_ROWS),
            InputMode::Search(_) => total_rows.saturating_sub(NORMAL_CHROME_ROWS + SEARCH_BAR_ROWS),
        }
    }
}

/// Replaces line breaks and tabs so multi-line card text fits a single row.
fn single_line(text: &str) -> String {
    text.replace(['\r', '\n', '\t'], " ")
}
