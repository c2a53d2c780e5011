//! End-to-end controller flows: events in, HTTP calls out, host results back in.

use std::collections::BTreeMap;

use crate::api::{parse_base_url, ApiClient, HttpRequest, Method, Transport};
use crate::app::{handle_event, Action, AppState, Event, FormState};
use crate::domain::Flashcard;
use crate::ui::Theme;

#[derive(Debug, Default)]
struct Recorder {
    sent: Vec<HttpRequest>,
}

impl Transport for Recorder {
    fn send(&mut self, request: HttpRequest) {
        self.sent.push(request);
    }
}

/// The plugin shim, minus Zellij: executes actions and feeds results back.
struct Harness {
    state: AppState,
    client: ApiClient<Recorder>,
    closed: bool,
}

impl Harness {
    fn new() -> Self {
        Self {
            state: AppState::new(Theme::default()),
            client: ApiClient::new(
                parse_base_url("http://localhost:8080/api/flashcard").unwrap(),
                Recorder::default(),
            ),
            closed: false,
        }
    }

    fn send(&mut self, event: &Event) -> usize {
        let (_, actions) = handle_event(&mut self.state, event).unwrap();
        let count = actions.len();
        for action in actions {
            match action {
                Action::CloseFocus => self.closed = true,
                Action::Request(request) => self.client.dispatch(&request).unwrap(),
            }
        }
        count
    }

    fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.send(&Event::Char(c));
        }
    }

    fn sent(&self) -> &[HttpRequest] {
        &self.client.transport().sent
    }

    fn last_sent(&self) -> HttpRequest {
        self.sent().last().cloned().unwrap()
    }

    /// Answers the most recent call and returns how many new calls that caused.
    fn respond(&mut self, status: u16, body: &str) -> usize {
        let request = self.last_sent();
        let before = self.sent().len();
        let response = self
            .client
            .receive(status, body.as_bytes(), &request.context)
            .unwrap();
        self.send(&Event::ApiResponse(response));
        self.sent().len() - before
    }

    fn load(&mut self, body: &str) {
        self.send(&Event::PermissionsResult { granted: true });
        assert_eq!(self.last_sent().method, Method::Get);
        self.respond(200, body);
    }
}

const TWO_CARDS: &str = r#"[
    {"id": 1, "question": "Capital of France?", "answer": "Paris", "category": "geo", "createdAt": "2024-01-02T10:00:00"},
    {"id": 2, "question": "2+3?", "answer": "5", "category": "math"}
]"#;

#[test]
fn create_posts_without_id_then_refreshes_once() {
    let mut h = Harness::new();
    h.load("[]");

    h.send(&Event::NewCard);
    assert_eq!(h.state.draft, Flashcard::empty());

    h.type_text("2+2?");
    h.send(&Event::NextField);
    h.type_text("4");
    h.send(&Event::NextField);
    h.type_text("math");
    h.send(&Event::Submit);

    let post = h.last_sent();
    assert_eq!(post.method, Method::Post);
    assert_eq!(post.url, "http://localhost:8080/api/flashcard");
    let body: serde_json::Value = serde_json::from_slice(&post.body).unwrap();
    assert_eq!(
        body,
        serde_json::json!({"question": "2+2?", "answer": "4", "category": "math"})
    );

    let new_calls = h.respond(
        201,
        r#"{"id": 3, "question": "2+2?", "answer": "4", "category": "math"}"#,
    );
    assert_eq!(new_calls, 1);
    assert_eq!(h.last_sent().method, Method::Get);
    assert_eq!(h.state.form, FormState::Hidden);

    h.respond(
        200,
        r#"[{"id": 3, "question": "2+2?", "answer": "4", "category": "math"}]"#,
    );
    assert_eq!(h.state.cards.len(), 1);
    assert_eq!(h.state.cards[0].id, Some(3));
}

#[test]
fn failed_create_keeps_form_and_draft() {
    let mut h = Harness::new();
    h.load("[]");

    h.send(&Event::NewCard);
    h.type_text("q");
    h.send(&Event::NextField);
    h.type_text("a");
    h.send(&Event::NextField);
    h.type_text("c");
    h.send(&Event::Submit);

    let new_calls = h.respond(500, "boom");

    assert_eq!(new_calls, 0);
    assert_eq!(h.state.form, FormState::CreatingNew);
    assert_eq!(h.state.draft, Flashcard::new("q", "a", "c"));
    assert_eq!(
        h.state.status.as_deref(),
        Some("Could not create flashcard: Request failed: HTTP 500: boom")
    );
}

#[test]
fn invalid_draft_sends_nothing() {
    let mut h = Harness::new();
    h.load("[]");
    let before = h.sent().len();

    h.send(&Event::NewCard);
    h.type_text("   ");
    h.send(&Event::Submit);

    assert_eq!(h.sent().len(), before);
    assert_eq!(h.state.form, FormState::CreatingNew);
    assert!(h.state.status.is_some());
}

#[test]
fn edit_then_cancel_leaves_list_untouched() {
    let mut h = Harness::new();
    h.load(TWO_CARDS);
    let before = h.sent().len();
    let original = h.state.cards.clone();

    h.send(&Event::EditSelected);
    h.send(&Event::NextField);
    for _ in 0.."Paris".len() {
        h.send(&Event::Backspace);
    }
    h.type_text("Lyon");
    assert_eq!(h.state.draft.answer, "Lyon");
    assert_eq!(h.state.cards[0].answer, "Paris");

    h.send(&Event::CancelForm);

    assert_eq!(h.sent().len(), before);
    assert_eq!(h.state.cards, original);
    assert_eq!(h.state.form, FormState::Hidden);
}

#[test]
fn edit_submit_puts_to_item_url() {
    let mut h = Harness::new();
    h.load(TWO_CARDS);

    h.send(&Event::KeyDown);
    h.send(&Event::EditSelected);
    h.send(&Event::NextField);
    h.send(&Event::Backspace);
    h.type_text("five");
    h.send(&Event::Submit);

    let put = h.last_sent();
    assert_eq!(put.method, Method::Put);
    assert_eq!(put.url, "http://localhost:8080/api/flashcard/2");
    let body: Flashcard = serde_json::from_slice(&put.body).unwrap();
    assert_eq!(body.answer, "five");

    assert_eq!(h.respond(200, ""), 1);
    assert_eq!(h.state.form, FormState::Hidden);
}

#[test]
fn failed_update_keeps_edit_target_and_draft() {
    let mut h = Harness::new();
    h.load(TWO_CARDS);
    let original = h.state.cards.clone();
    let target = original[0].clone();

    h.send(&Event::EditSelected);
    h.send(&Event::NextField);
    for _ in 0.."Paris".len() {
        h.send(&Event::Backspace);
    }
    h.type_text("Lyon");
    h.send(&Event::Submit);
    assert_eq!(h.last_sent().method, Method::Put);

    let new_calls = h.respond(409, "stale");

    assert_eq!(new_calls, 0);
    assert_eq!(h.state.form, FormState::Editing(target.clone()));
    assert_eq!(
        h.state.draft,
        Flashcard {
            answer: "Lyon".to_string(),
            ..target
        }
    );
    assert_eq!(h.state.cards, original);
    assert_eq!(
        h.state.status.as_deref(),
        Some("Could not update flashcard: Request failed: HTTP 409: stale")
    );
}

#[test]
fn failed_delete_keeps_list_and_does_not_refresh() {
    let mut h = Harness::new();
    h.load(TWO_CARDS);
    let original = h.state.cards.clone();

    h.send(&Event::DeleteSelected);
    h.send(&Event::ConfirmDelete);
    assert_eq!(h.last_sent().method, Method::Delete);
    assert_eq!(h.state.pending_delete, None);

    let new_calls = h.respond(500, "");

    assert_eq!(new_calls, 0);
    assert_eq!(h.state.cards, original);
    assert_eq!(h.state.pending_delete, None);
    assert_eq!(
        h.state.status.as_deref(),
        Some("Could not delete flashcard: Request failed: HTTP 500: no response body")
    );
}

#[test]
fn delete_needs_confirmation() {
    let mut h = Harness::new();
    h.load(TWO_CARDS);
    let before = h.sent().len();

    h.send(&Event::DeleteSelected);
    assert_eq!(h.state.pending_delete, Some(1));
    h.send(&Event::CancelDelete);
    assert_eq!(h.sent().len(), before);
    assert_eq!(h.state.cards.len(), 2);

    h.send(&Event::DeleteSelected);
    h.send(&Event::ConfirmDelete);
    let delete = h.last_sent();
    assert_eq!(delete.method, Method::Delete);
    assert_eq!(delete.url, "http://localhost:8080/api/flashcard/1");
    assert!(delete.body.is_empty());

    assert_eq!(h.respond(204, ""), 1);
    h.respond(200, r#"[{"id": 2, "question": "2+3?", "answer": "5", "category": "math"}]"#);
    assert_eq!(h.state.cards.len(), 1);
}

#[test]
fn flipping_twice_restores_question() {
    let mut h = Harness::new();
    h.load(TWO_CARDS);

    h.send(&Event::FlipSelected);
    let vm = h.state.compute_viewmodel(24, 80);
    assert_eq!(vm.display_items[0].text, "Paris");

    h.send(&Event::FlipSelected);
    let vm = h.state.compute_viewmodel(24, 80);
    assert_eq!(vm.display_items[0].text, "Capital of France?");
    assert_eq!(h.state.flipped, None);
}

#[test]
fn foreign_results_are_ignored() {
    let h = Harness::new();
    let mut context = BTreeMap::new();
    context.insert("other_plugin".to_string(), "1".to_string());

    assert!(h.client.receive(200, b"[]", &context).is_none());
}

#[test]
fn close_is_forwarded_to_the_host() {
    let mut h = Harness::new();
    h.send(&Event::CloseFocus);
    assert!(h.closed);
}
