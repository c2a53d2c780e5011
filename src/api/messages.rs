//! Request and response types exchanged with the flashcard backend.
//!
//! Requests leave the controller as [`ApiRequest`] values inside an
//! [`Action`](crate::app::Action) and come back, after the host has performed the HTTP
//! call, as [`ApiResponse`] values inside an [`Event`](crate::app::Event). Both ends of
//! the round trip can be linked in the trace through the captured [`TraceContext`].

use crate::domain::Flashcard;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Context key carrying the OpenTelemetry trace id of the issuing span.
pub const CONTEXT_TRACE_ID: &str = "flashdeck_trace_id";

/// Context key carrying the span id of the issuing span.
pub const CONTEXT_PARENT_SPAN_ID: &str = "flashdeck_parent_span_id";

/// Distributed tracing context for linking a request to its response.
///
/// Captures the current trace and span IDs from OpenTelemetry when a request is
/// built. The ids travel in the request context map and are re-attached when the
/// host hands the result back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across the round trip.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Creates a trace context from the current tracing span.
    ///
    /// Returns `None` if the current span context is invalid, which is always the
    /// case when no OpenTelemetry layer is installed.
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let span = tracing::Span::current();

        let otel_context = span.context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if span_context.is_valid() {
            Some(Self {
                trace_id: format!("{:032x}", span_context.trace_id()),
                parent_span_id: format!("{:016x}", span_context.span_id()),
            })
        } else {
            None
        }
    }

    /// Writes the ids into a request context map.
    pub fn write_to(&self, context: &mut BTreeMap<String, String>) {
        context.insert(CONTEXT_TRACE_ID.to_string(), self.trace_id.clone());
        context.insert(CONTEXT_PARENT_SPAN_ID.to_string(), self.parent_span_id.clone());
    }

    /// Reads the ids back from a context map echoed by the host.
    #[must_use]
    pub fn read_from(context: &BTreeMap<String, String>) -> Option<Self> {
        Some(Self {
            trace_id: context.get(CONTEXT_TRACE_ID)?.clone(),
            parent_span_id: context.get(CONTEXT_PARENT_SPAN_ID)?.clone(),
        })
    }

    /// Attaches this context as the remote parent of spans created on this thread.
    ///
    /// The returned guard must be held for as long as the linked spans are open.
    /// Returns `None` when the ids are not valid hex.
    #[must_use]
    pub fn attach(&self) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{
            SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState,
        };

        let trace_id = TraceId::from_hex(&self.trace_id).ok()?;
        let span_id = SpanId::from_hex(&self.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        Some(
            opentelemetry::Context::current()
                .with_remote_span_context(span_context)
                .attach(),
        )
    }
}

/// The four data access operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestKind {
    FetchAll,
    Create,
    Update,
    Delete,
}

impl RequestKind {
    /// Stable name used in the request context map and in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FetchAll => "fetch_all",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Parses a name produced by [`RequestKind::as_str`].
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "fetch_all" => Some(Self::FetchAll),
            "create" => Some(Self::Create),
            "update" => Some(Self::Update),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }

    /// Wording used in user-facing failure messages.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::FetchAll => "load flashcards",
            Self::Create => "create flashcard",
            Self::Update => "update flashcard",
            Self::Delete => "delete flashcard",
        }
    }
}

/// Generates constructors for `ApiRequest` variants that attach the current
/// trace context automatically.
macro_rules! api_request_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl ApiRequest {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " request with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

api_request_builders! {
    fetch_all(FetchAll {}),
    create(Create { card: Flashcard }),
    update(Update { id: i64, card: Flashcard }),
    delete(Delete { id: i64 }),
}

/// Requests issued by the controller to the backend collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiRequest {
    /// Fetch the whole collection.
    FetchAll {
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Persist a new card. The card carries no `id`.
    Create {
        card: Flashcard,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Replace the fields of an existing card.
    Update {
        id: i64,
        card: Flashcard,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Remove a card.
    Delete {
        id: i64,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl ApiRequest {
    /// Returns which of the four operations this request performs.
    #[must_use]
    pub const fn kind(&self) -> RequestKind {
        match self {
            Self::FetchAll { .. } => RequestKind::FetchAll,
            Self::Create { .. } => RequestKind::Create,
            Self::Update { .. } => RequestKind::Update,
            Self::Delete { .. } => RequestKind::Delete,
        }
    }

    /// Returns the targeted card id for update and delete requests.
    #[must_use]
    pub const fn target_id(&self) -> Option<i64> {
        match self {
            Self::Update { id, .. } | Self::Delete { id, .. } => Some(*id),
            Self::FetchAll { .. } | Self::Create { .. } => None,
        }
    }

    /// Returns the trace context captured when the request was built.
    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::FetchAll { trace_context }
            | Self::Create { trace_context, .. }
            | Self::Update { trace_context, .. }
            | Self::Delete { trace_context, .. } => trace_context.as_ref(),
        }
    }
}

/// Results of backend calls, delivered back to the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiResponse {
    /// The collection was fetched. Order is exactly as returned by the backend.
    Loaded {
        cards: Vec<Flashcard>,
    },

    /// A card was created. `card` is `None` when the body could not be decoded.
    Created {
        card: Option<Flashcard>,
    },

    /// A card was updated. `card` is `None` when the body could not be decoded.
    Updated {
        id: i64,
        card: Option<Flashcard>,
    },

    /// A card was deleted.
    Deleted {
        id: i64,
    },

    /// Any of the four operations failed.
    Failed {
        request: RequestKind,
        id: Option<i64>,
        message: String,
    },
}

impl ApiResponse {
    /// Returns the operation this response answers.
    #[must_use]
    pub const fn kind(&self) -> RequestKind {
        match self {
            Self::Loaded { .. } => RequestKind::FetchAll,
            Self::Created { .. } => RequestKind::Create,
            Self::Updated { .. } => RequestKind::Update,
            Self::Deleted { .. } => RequestKind::Delete,
            Self::Failed { request, .. } => *request,
        }
    }
}
