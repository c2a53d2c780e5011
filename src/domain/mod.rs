//! Domain layer for the Flashdeck plugin.
//!
//! This module contains the core domain types, independent of Zellij-specific APIs
//! or the HTTP transport.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`flashcard`]: Flashcard model, validation and draft field handling

pub mod error;
pub mod flashcard;

pub use error::{FlashdeckError, Result};
pub use flashcard::{Field, Flashcard};
