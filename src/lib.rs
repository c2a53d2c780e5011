//! Flashdeck: a Zellij plugin for studying and managing flashcards.
//!
//! Flashdeck lists the flashcards kept by a REST backend, flips them to reveal
//! answers, and creates, edits and deletes them from a floating pane:
//! - Fuzzy search across question, answer and category
//! - Category filter cycling
//! - Inline editor form with client-side validation
//! - Confirmation before every delete
//! - Full list refresh after every successful write

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← View-state controller
//! │  - Event handling                                   │
//! │  - Action emission                                  │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                                      │
//! ┌───────────────────────┐          ┌───────────────────────┐
//! │ UI Layer (ui/)        │          │ Data Access (api/)    │
//! │ - Rendering           │          │ - Request/response    │
//! │ - Theming             │          │ - HTTP mapping        │
//! │ - Components          │          │ - Trace propagation   │
//! └───────────────────────┘          └───────────────────────┘
//!         │                                      │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain & Infrastructure                            │
//! │  - Flashcard model, validation (domain/)            │
//! │  - Error types (domain/error)                       │
//! │  - Sandbox paths (infrastructure/)                  │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - OpenTelemetry tracing, file-based OTLP export    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/flashdeck.wasm" {
//!         api_url "http://localhost:8080/api/flashcard"
//!         theme "catppuccin-mocha"
//!         date_format "%d/%m/%Y"
//!         trace_level "info"
//!     }
//! }
//! ```
//!
//! # Example
//!
//! ```
//! use flashdeck::api::ApiResponse;
//! use flashdeck::{handle_event, initialize, Action, Config, Event, Flashcard};
//!
//! let mut state = initialize(&Config::default());
//!
//! handle_event(&mut state, &Event::NewCard)?;
//! for c in "2+2?".chars() {
//!     handle_event(&mut state, &Event::Char(c))?;
//! }
//! handle_event(&mut state, &Event::NextField)?;
//! handle_event(&mut state, &Event::Char('4'))?;
//! handle_event(&mut state, &Event::NextField)?;
//! for c in "math".chars() {
//!     handle_event(&mut state, &Event::Char(c))?;
//! }
//!
//! let (_, actions) = handle_event(&mut state, &Event::Submit)?;
//! assert!(matches!(actions.as_slice(), [Action::Request(_)]));
//!
//! let created = Flashcard { id: Some(1), ..Flashcard::new("2+2?", "4", "math") };
//! let (_, actions) = handle_event(
//!     &mut state,
//!     &Event::ApiResponse(ApiResponse::Created { card: Some(created) }),
//! )?;
//! assert_eq!(actions.len(), 1);
//! assert!(!state.form.is_open());
//! # Ok::<(), flashdeck::FlashdeckError>(())
//! ```

pub mod api;
pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod ui;

pub use app::{handle_event, Action, AppState, Event, FormState, InputMode, SearchFocus};
pub use domain::{Field, Flashcard, FlashdeckError, Result};
pub use ui::Theme;

use chrono::format::{Item, StrftimeItems};
use std::collections::BTreeMap;
use url::Url;

/// Backend collection used when `api_url` is not configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/flashcard";

/// Tracing directive used when `trace_level` is not configured.
pub const DEFAULT_TRACE_LEVEL: &str = "info";

/// Plugin configuration parsed from Zellij's configuration system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the flashcard collection.
    ///
    /// Cards are fetched from and created at this URL; single cards live at
    /// `{api_url}/{id}`. Default: [`DEFAULT_API_URL`]
    pub api_url: String,

    /// Built-in theme name. Ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file; `~` refers to the sandbox's `/host`.
    pub theme_file: Option<String>,

    /// `EnvFilter` directive for tracing. Default: `"info"`
    pub trace_level: String,

    /// chrono format string for creation dates. Default: `"%d/%m/%Y"`
    pub date_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            theme_name: None,
            theme_file: None,
            trace_level: DEFAULT_TRACE_LEVEL.to_string(),
            date_format: app::state::DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl Config {
    /// Parses configuration from Zellij's configuration map.
    ///
    /// Values are trimmed; missing or blank values take their defaults. Values
    /// are not checked here, see [`Config::validate`] and [`Config::sanitized`].
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use flashdeck::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("api_url".to_string(), "https://cards.example.com/api/flashcard/".to_string());
    /// map.insert("theme".to_string(), "catppuccin-latte".to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.api_url, "https://cards.example.com/api/flashcard/");
    /// assert_eq!(config.theme_name.as_deref(), Some("catppuccin-latte"));
    /// assert_eq!(config.date_format, "%d/%m/%Y");
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let value = |key: &str| {
            config
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        let defaults = Self::default();

        Self {
            api_url: value("api_url").unwrap_or(defaults.api_url),
            theme_name: value("theme"),
            theme_file: value("theme_file"),
            trace_level: value("trace_level").unwrap_or(defaults.trace_level),
            date_format: value("date_format").unwrap_or(defaults.date_format),
        }
    }

    /// Checks the values that would otherwise fail at request or render time.
    ///
    /// # Errors
    ///
    /// Returns [`FlashdeckError::Config`] if `api_url` is not an `http://` or
    /// `https://` URL with a host, or if `date_format` contains an invalid
    /// chrono specifier.
    pub fn validate(&self) -> Result<()> {
        self.api_base()?;
        validate_date_format(&self.date_format)?;
        Ok(())
    }

    /// Returns the parsed collection URL.
    ///
    /// # Errors
    ///
    /// See [`api::parse_base_url`].
    pub fn api_base(&self) -> Result<Url> {
        api::parse_base_url(&self.api_url)
    }

    /// Replaces every invalid value with its default, logging each replacement.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        if let Err(e) = self.api_base() {
            tracing::warn!(error = %e, fallback = DEFAULT_API_URL, "ignoring api_url");
            self.api_url = DEFAULT_API_URL.to_string();
        }
        if let Err(e) = validate_date_format(&self.date_format) {
            tracing::warn!(error = %e, fallback = app::state::DEFAULT_DATE_FORMAT, "ignoring date_format");
            self.date_format = app::state::DEFAULT_DATE_FORMAT.to_string();
        }
        self
    }
}

fn validate_date_format(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(FlashdeckError::Config(format!("invalid date_format: {format}")));
    }
    Ok(())
}

/// Builds the initial application state for `config`.
///
/// The theme comes from `theme_file`, then `theme`, then the default; a theme
/// that cannot be loaded is logged and replaced by the default. The card list
/// starts empty until the first fetch completes.
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(api_url = %config.api_url, "initializing flashdeck plugin");

    let theme = if let Some(theme_file) = &config.theme_file {
        let path = infrastructure::expand_tilde(theme_file);
        Theme::from_file(&path).unwrap_or_else(|e| {
            tracing::warn!(theme_file = %path, error = %e, "failed to load theme file, using default");
            Theme::default()
        })
    } else if let Some(theme_name) = &config.theme_name {
        Theme::from_name(theme_name).unwrap_or_else(|| {
            tracing::warn!(theme_name = %theme_name, "unknown theme, using default");
            Theme::default()
        })
    } else {
        Theme::default()
    };

    AppState::new(theme).with_date_format(config.date_format.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn blank_values_take_defaults() {
        let config = Config::from_zellij(&map(&[("api_url", "  "), ("trace_level", "")]));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn validate_rejects_bad_scheme_and_missing_host() {
        let mut config = Config {
            api_url: "ftp://cards".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(FlashdeckError::Config(_))));

        config.api_url = "https://".to_string();
        assert!(config.validate().is_err());

        config.api_url = "https://cards.example.com".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn sanitized_drops_malformed_urls() {
        for raw in [
            "http://exa mple.com/api",
            "http://host:notaport/api",
            "https://[::1/api",
            "http://?/x",
        ] {
            let config = Config {
                api_url: raw.to_string(),
                ..Config::default()
            };
            assert!(config.validate().is_err(), "{raw} should be rejected");
            assert_eq!(config.sanitized().api_url, DEFAULT_API_URL);
        }
    }

    #[test]
    fn validate_rejects_broken_date_format() {
        let config = Config {
            date_format: "%Q".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn sanitized_replaces_only_invalid_values() {
        let config = Config {
            api_url: "localhost:8080".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            ..Config::default()
        }
        .sanitized();

        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.date_format, "%Y-%m-%d");
    }

    #[test]
    fn initialize_prefers_theme_file_over_name() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let contents = include_str!("../themes/catppuccin-frappe.toml").replace("catppuccin-frappe", "mine");
        file.write_all(contents.as_bytes()).unwrap();

        let config = Config {
            theme_name: Some("catppuccin-latte".to_string()),
            theme_file: Some(file.path().to_string_lossy().into_owned()),
            ..Config::default()
        };

        assert_eq!(initialize(&config).theme.name, "mine");
    }

    #[test]
    fn initialize_falls_back_on_unknown_theme() {
        let config = Config {
            theme_name: Some("neon".to_string()),
            date_format: "%Y".to_string(),
            ..Config::default()
        };

        let state = initialize(&config);
        assert_eq!(state.theme.name, "catppuccin-mocha");
        assert_eq!(state.date_format, "%Y");
    }
}
