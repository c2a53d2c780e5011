//! Data access layer for the remote flashcard collection.
//!
//! The controller never performs I/O itself. It emits [`ApiRequest`]s, the plugin
//! shim resolves them into HTTP calls through [`ApiClient`], the Zellij host performs
//! the calls asynchronously, and the results come back as [`ApiResponse`]s.
//!
//! # Architecture
//!
//! - `messages`: Request/response types with trace context propagation
//! - `client`: HTTP mapping of the collection contract and the [`Transport`] seam

pub mod client;
pub mod messages;

pub use client::{parse_base_url, ApiClient, HttpRequest, Method, Transport};
pub use messages::{ApiRequest, ApiResponse, RequestKind, TraceContext};
