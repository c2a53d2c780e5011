//! Actions representing side effects to be executed by the plugin runtime.
//!
//! The event handler returns a `Vec<Action>` after processing each event. The
//! controller itself never talks to the network: every data access call leaves
//! it as an [`Action::Request`] and its outcome comes back later as an
//! [`Event::ApiResponse`](crate::app::Event::ApiResponse).
//!
//! # Example
//!
//! ```
//! use flashdeck::api::ApiRequest;
//! use flashdeck::app::Action;
//!
//! let actions = vec![Action::Request(ApiRequest::fetch_all())];
//! assert_eq!(actions.len(), 1);
//! ```

use crate::api::ApiRequest;

/// Commands representing side effects to be executed by the plugin runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Closes the focused floating pane, hiding the plugin UI.
    CloseFocus,

    /// Hands a request to the data access capability.
    ///
    /// Executed asynchronously by the host; the result arrives as a separate event.
    Request(ApiRequest),
}
