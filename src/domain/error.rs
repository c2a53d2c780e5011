//! Error types for the Flashdeck plugin.
//!
//! This module defines the centralized error type [`FlashdeckError`] and a type alias
//! [`Result`] used throughout the plugin. All errors are implemented using the
//! `thiserror` crate for automatic `Error` trait implementation.
//!
//! Data access failures are deliberately collapsed into a single [`FlashdeckError::Request`]
//! kind: the controller does not distinguish network errors from 4xx or 5xx responses.

use thiserror::Error;

/// The main error type for Flashdeck plugin operations.
///
/// # Examples
///
/// ```
/// use flashdeck::FlashdeckError;
///
/// let err = FlashdeckError::Request("HTTP 503".to_string());
/// assert_eq!(err.to_string(), "Request failed: HTTP 503");
/// ```
#[derive(Debug, Error)]
pub enum FlashdeckError {
    /// A call to the flashcard backend failed.
    ///
    /// Covers transport failures and non-success HTTP statuses alike. The string
    /// carries the status and whatever the backend returned, for logging only.
    #[error("Request failed: {0}")]
    Request(String),

    /// A backend payload could not be decoded into flashcards.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The working draft did not pass the client-side validation gate.
    ///
    /// The string names the offending field and is shown to the user verbatim.
    #[error("{0}")]
    Validation(String),

    /// Filesystem or I/O operation failed.
    ///
    /// Wraps errors from standard library I/O operations. Automatically converts
    /// from `std::io::Error` using the `#[from]` attribute.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Theme parsing or application failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Configuration is invalid or missing.
    ///
    /// Occurs when required configuration values are missing or malformed.
    /// The string describes the specific configuration problem.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A specialized `Result` type for Flashdeck operations.
pub type Result<T> = std::result::Result<T, FlashdeckError>;
