//! Zellij plugin wrapper and entry point.
//!
//! This module is the thin integration layer between the Flashdeck library and
//! the Zellij plugin system. It translates Zellij events into library events,
//! executes the resulting actions, and carries HTTP calls to the backend through
//! the host's `web_request` facility.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │      Zellij Main Thread      │
//! │  ┌────────────────────────┐  │
//! │  │     State (plugin)     │  │  ← UI state, event handling
//! │  └────────────────────────┘  │
//! │       │ web_request ▲        │
//! │       ▼             │ WebRequestResult
//! │  ┌────────────────────────┐  │
//! │  │   Zellij host (HTTP)   │  │  ← Backend calls
//! │  └────────────────────────┘  │
//! └──────────────────────────────┘
//! ```
//!
//! # Plugin Lifecycle
//!
//! 1. **Load**: Parse config, initialize tracing, create `AppState`
//! 2. **Permissions**: Request `WebAccess`
//! 3. **Initial Fetch**: Load all cards once access is granted
//! 4. **Update**: Handle events, delegate to library layer
//! 5. **Render**: Call library render function
//!
//! # Keybindings
//!
//! Global (list modes):
//! - `Ctrl+n`: Move down
//! - `Ctrl+p`: Move up
//!
//! In normal mode:
//! - `j`/`Down`, `k`/`Up`: Move selection
//! - `Space`: Flip card
//! - `n`: New card
//! - `e`: Edit card
//! - `d`: Delete card (asks for confirmation)
//! - `c`: Cycle category filter
//! - `r`: Reload
//! - `/`: Search
//! - `q`/`Esc`: Close plugin
//!
//! In the editor form:
//! - `Tab`/`Down`, `Shift+Tab`/`Up`: Move between fields
//! - `Enter`: Save
//! - `Esc`: Cancel
//!
//! While a delete is pending:
//! - `y`/`Enter`: Delete
//! - `n`/`Esc`: Keep

#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use zellij_tile::prelude::*;

use flashdeck::api::{ApiClient, HttpRequest, Method, Transport};
use flashdeck::{handle_event, Action, Config, Event, FlashdeckError, InputMode, SearchFocus};

register_plugin!(State);

/// Sends HTTP calls through the Zellij host.
///
/// Results arrive later as `WebRequestResult` events carrying the request context.
#[derive(Debug, Default)]
struct ZellijTransport;

impl Transport for ZellijTransport {
    fn send(&mut self, request: HttpRequest) {
        web_request(
            request.url,
            http_verb(request.method),
            request.headers,
            request.body,
            request.context,
        );
    }
}

const fn http_verb(method: Method) -> HttpVerb {
    match method {
        Method::Get => HttpVerb::Get,
        Method::Post => HttpVerb::Post,
        Method::Put => HttpVerb::Put,
        Method::Delete => HttpVerb::Delete,
    }
}

/// Plugin state wrapper.
///
/// Wraps the library's `AppState` with the client that talks to the backend.
struct State {
    /// Core application state from library layer.
    app: flashdeck::AppState,

    /// Data access client bound to the configured collection.
    ///
    /// Set during `load`; `None` only if no usable collection URL exists.
    client: Option<ApiClient<ZellijTransport>>,
}

impl Default for State {
    fn default() -> Self {
        let default_config = Config::default();
        Self {
            app: flashdeck::initialize(&default_config),
            client: None,
        }
    }
}

impl ZellijPlugin for State {
    /// Initializes the plugin on load.
    ///
    /// Parses configuration, initializes tracing and application state, requests
    /// web access and subscribes to events. The first fetch waits for the
    /// permission result.
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let config = Config::from_zellij(&configuration);
        flashdeck::observability::init_tracing(&config);

        let span = tracing::debug_span!("plugin_load");
        let _guard = span.entered();

        let config = config.sanitized();
        tracing::debug!(api_url = %config.api_url, date_format = %config.date_format, "parsed configuration");

        self.app = flashdeck::initialize(&config);
        self.client = match config.api_base() {
            Ok(base) => Some(ApiClient::new(base, ZellijTransport)),
            Err(e) => {
                tracing::error!(error = %e, "no usable api_url");
                self.app.status = Some(e.to_string());
                None
            }
        };

        request_permission(&[PermissionType::WebAccess]);
        subscribe(&[
            EventType::Key,
            EventType::WebRequestResult,
            EventType::PermissionRequestResult,
        ]);

        tracing::debug!("plugin load complete - waiting for permissions");
    }

    /// Handles incoming Zellij events.
    ///
    /// Returns `true` if the UI should re-render.
    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let event_name = Self::get_event_name(&event);
        let span_name = format!("plugin_update::{event_name}");
        let span = tracing::debug_span!("plugin_update_event", otel.name = %span_name, event_type = %event_name);
        let _guard = span.entered();

        let our_event = match event {
            zellij_tile::prelude::Event::Key(ref key) => match self.map_key_event(key) {
                Some(event) => event,
                None => return false,
            },
            zellij_tile::prelude::Event::WebRequestResult(status, _headers, body, context) => {
                let response = self
                    .client
                    .as_ref()
                    .and_then(|client| client.receive(status, &body, &context));
                match response {
                    Some(response) => Event::ApiResponse(response),
                    None => {
                        tracing::debug!(status = status, "ignoring web request result without flashdeck context");
                        return false;
                    }
                }
            }
            zellij_tile::prelude::Event::PermissionRequestResult(permissions) => {
                Event::PermissionsResult {
                    granted: matches!(permissions, PermissionStatus::Granted),
                }
            }
            _ => return false,
        };

        match handle_event(&mut self.app, &our_event) {
            Ok((should_render, actions)) => {
                let executed = !actions.is_empty();
                for a in actions {
                    self.execute_action(&a);
                }
                should_render || executed
            }
            Err(e) => {
                tracing::debug!(error = %e, "error handling event");
                false
            }
        }
    }

    fn render(&mut self, rows: usize, cols: usize) {
        flashdeck::ui::render(&self.app, rows, cols);
    }
}

impl State {
    /// Gets a string name for a Zellij event for logging purposes.
    fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::WebRequestResult(status, ..) => {
                format!("WebRequestResult({status})")
            }
            zellij_tile::prelude::Event::PermissionRequestResult(..) => {
                "PermissionRequestResult".to_string()
            }
            _ => "Other".to_string(),
        }
    }

    /// Maps keyboard events to application events for the current mode.
    fn map_key_event(&self, key: &KeyWithModifier) -> Option<Event> {
        tracing::debug!(bare_key = ?key.bare_key, "key event");

        if self.app.pending_delete.is_some() {
            return match key.bare_key {
                BareKey::Char('y') | BareKey::Enter => Some(Event::ConfirmDelete),
                BareKey::Char('n') | BareKey::Esc => Some(Event::CancelDelete),
                _ => None,
            };
        }

        if self.app.form.is_open() {
            let shifted = key.has_modifiers(&[KeyModifier::Shift]);
            return Some(match key.bare_key {
                BareKey::Tab if shifted => Event::PrevField,
                BareKey::Tab | BareKey::Down => Event::NextField,
                BareKey::Up => Event::PrevField,
                BareKey::Enter => Event::Submit,
                BareKey::Esc => Event::CancelForm,
                BareKey::Backspace => Event::Backspace,
                BareKey::Char(c) => Event::Char(c),
                _ => return None,
            });
        }

        if key.bare_key == BareKey::Char('n') && key.has_modifiers(&[KeyModifier::Ctrl]) {
            return Some(Event::KeyDown);
        }
        if key.bare_key == BareKey::Char('p') && key.has_modifiers(&[KeyModifier::Ctrl]) {
            return Some(Event::KeyUp);
        }

        Some(match self.app.input_mode {
            InputMode::Search(SearchFocus::Typing) => match key.bare_key {
                BareKey::Down => Event::KeyDown,
                BareKey::Up => Event::KeyUp,
                BareKey::Enter => Event::FocusResults,
                BareKey::Esc => Event::ExitSearch,
                BareKey::Backspace => Event::Backspace,
                BareKey::Char(c) => Event::Char(c),
                _ => return None,
            },
            InputMode::Search(SearchFocus::Navigating) => match key.bare_key {
                BareKey::Down | BareKey::Char('j') => Event::KeyDown,
                BareKey::Up | BareKey::Char('k') => Event::KeyUp,
                BareKey::Char(' ') => Event::FlipSelected,
                BareKey::Char('e') | BareKey::Enter => Event::EditSelected,
                BareKey::Char('d') => Event::DeleteSelected,
                BareKey::Char('/') => Event::FocusSearchBar,
                BareKey::Esc => Event::ExitSearch,
                _ => return None,
            },
            InputMode::Normal => match key.bare_key {
                BareKey::Down | BareKey::Char('j') => Event::KeyDown,
                BareKey::Up | BareKey::Char('k') => Event::KeyUp,
                BareKey::Char(' ') => Event::FlipSelected,
                BareKey::Char('n') => Event::NewCard,
                BareKey::Char('e') | BareKey::Enter => Event::EditSelected,
                BareKey::Char('d') => Event::DeleteSelected,
                BareKey::Char('c') => Event::CycleCategory,
                BareKey::Char('r') => Event::Reload,
                BareKey::Char('/') => Event::SearchMode,
                BareKey::Char('q') | BareKey::Esc => Event::CloseFocus,
                _ => return None,
            },
        })
    }

    /// Executes an action returned from event handling.
    ///
    /// - `CloseFocus`: Hide the plugin pane
    /// - `Request`: Send the call to the backend through the host
    #[tracing::instrument(level = "debug", skip(self))]
    fn execute_action(&mut self, action: &Action) {
        match action {
            Action::CloseFocus => {
                tracing::debug!("closing plugin focus");
                hide_self();
            }
            Action::Request(ref request) => {
                let result = match self.client.as_mut() {
                    Some(client) => client.dispatch(request),
                    None => Err(FlashdeckError::Config("api_url is not configured".to_string())),
                };
                if let Err(e) = result {
                    self.app.record_failure(request.kind(), &e.to_string());
                }
            }
        }
    }
}
