//! HTTP mapping for the flashcard collection.
//!
//! [`ApiClient`] turns [`ApiRequest`]s into concrete [`HttpRequest`]s following the
//! resource-oriented contract of the backend, and turns the host's raw results back
//! into [`ApiResponse`]s:
//!
//! ```text
//! fetch all  GET    {base}
//! create     POST   {base}
//! update     PUT    {base}/{id}
//! delete     DELETE {base}/{id}
//! ```
//!
//! The actual network call is performed by a [`Transport`], which in the plugin is the
//! Zellij host. The request kind, target id and a sequence number travel in the
//! request context map so that results can be matched when they come back.

use super::messages::{ApiRequest, ApiResponse, RequestKind, TraceContext};
use crate::domain::error::{FlashdeckError, Result};
use crate::domain::Flashcard;
use std::collections::BTreeMap;
use url::Url;

/// Context key naming the operation of an outstanding request.
pub const CONTEXT_REQUEST: &str = "flashdeck_request";

/// Context key carrying the targeted card id of update/delete requests.
pub const CONTEXT_ID: &str = "flashdeck_id";

/// Context key carrying the per-plugin request sequence number.
pub const CONTEXT_SEQ: &str = "flashdeck_seq";

/// Longest response excerpt kept in failure messages.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// HTTP methods used by the collection contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// A fully resolved HTTP call, ready for a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub method: Method,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
    /// Opaque map echoed back by the host together with the result.
    pub context: BTreeMap<String, String>,
}

/// Something that can perform an HTTP call and later report its result.
///
/// Implementations must not block: the result is expected to come back through
/// [`ApiClient::receive`] once the call completes.
pub trait Transport {
    /// Starts the call described by `request`.
    fn send(&mut self, request: HttpRequest);
}

/// Parses and checks the collection URL.
///
/// The URL must be absolute, use `http` or `https` and name a host. A trailing
/// `/` on the path is dropped, so `{base}/{id}` never contains `//`.
///
/// ```
/// use flashdeck::api::parse_base_url;
///
/// let base = parse_base_url("https://cards.example.com/api/flashcard/")?;
/// assert_eq!(base.as_str(), "https://cards.example.com/api/flashcard");
///
/// assert!(parse_base_url("ftp://cards.example.com").is_err());
/// assert!(parse_base_url("http://host:notaport/api").is_err());
/// # Ok::<(), flashdeck::FlashdeckError>(())
/// ```
///
/// # Errors
///
/// Returns [`FlashdeckError::Config`] if the URL does not parse, has another
/// scheme or has no host.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw)
        .map_err(|e| FlashdeckError::Config(format!("invalid api_url {raw:?}: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(FlashdeckError::Config(format!(
            "api_url must use http or https, got {raw:?}"
        )));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(FlashdeckError::Config(format!("api_url has no host: {raw:?}")));
    }

    let path = url.path().trim_end_matches('/').to_string();
    url.set_path(&path);
    Ok(url)
}

/// Maps data access requests onto the backend collection and decodes results.
#[derive(Debug)]
pub struct ApiClient<T: Transport> {
    base_url: Url,
    transport: T,
    next_seq: u64,
}

impl<T: Transport> ApiClient<T> {
    /// Creates a client for the collection at `base_url`, as returned by
    /// [`parse_base_url`].
    pub const fn new(base_url: Url, transport: T) -> Self {
        Self {
            base_url,
            transport,
            next_seq: 1,
        }
    }

    /// Returns the underlying transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Builds the HTTP call for `request` and hands it to the transport.
    ///
    /// # Errors
    ///
    /// Returns [`FlashdeckError::Request`] if the card payload cannot be encoded.
    /// Nothing is sent in that case.
    pub fn dispatch(&mut self, request: &ApiRequest) -> Result<()> {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);

        let http = self.build(request, seq)?;

        tracing::debug!(
            request = request.kind().as_str(),
            seq = seq,
            url = %http.url,
            "dispatching request"
        );

        self.transport.send(http);
        Ok(())
    }

    /// Resolves `request` into URL, method, headers, body and context.
    fn build(&self, request: &ApiRequest, seq: u64) -> Result<HttpRequest> {
        let (method, url, body) = match request {
            ApiRequest::FetchAll { .. } => (Method::Get, self.base_url.to_string(), Vec::new()),
            ApiRequest::Create { card, .. } => {
                (Method::Post, self.base_url.to_string(), encode_card(card)?)
            }
            ApiRequest::Update { id, card, .. } => {
                (Method::Put, self.item_url(*id)?, encode_card(card)?)
            }
            ApiRequest::Delete { id, .. } => (Method::Delete, self.item_url(*id)?, Vec::new()),
        };

        let mut headers = BTreeMap::new();
        headers.insert("Accept".to_string(), "application/json".to_string());
        if !body.is_empty() {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }

        let mut context = BTreeMap::new();
        context.insert(CONTEXT_REQUEST.to_string(), request.kind().as_str().to_string());
        context.insert(CONTEXT_SEQ.to_string(), seq.to_string());
        if let Some(id) = request.target_id() {
            context.insert(CONTEXT_ID.to_string(), id.to_string());
        }
        if let Some(trace) = request.trace_context() {
            trace.write_to(&mut context);
        }

        Ok(HttpRequest {
            url,
            method,
            headers,
            body,
            context,
        })
    }

    fn item_url(&self, id: i64) -> Result<String> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| FlashdeckError::Request(format!("{} cannot hold card ids", self.base_url)))?
            .pop_if_empty()
            .push(&id.to_string());
        Ok(url.to_string())
    }

    /// Decodes a completed call reported by the host.
    ///
    /// # Returns
    ///
    /// - `None` if the context does not belong to a request issued by this client
    /// - `Some(ApiResponse::Failed { .. })` for statuses outside `200..300` and for
    ///   collection bodies that do not decode
    /// - the matching success variant otherwise
    #[must_use]
    pub fn receive(
        &self,
        status: u16,
        body: &[u8],
        context: &BTreeMap<String, String>,
    ) -> Option<ApiResponse> {
        let kind = context.get(CONTEXT_REQUEST).and_then(|name| RequestKind::parse(name))?;
        let id = context.get(CONTEXT_ID).and_then(|raw| raw.parse::<i64>().ok());

        let _trace_guard = TraceContext::read_from(context).and_then(|trace| trace.attach());
        let _span = tracing::info_span!(
            "receive_response",
            request = kind.as_str(),
            status = status,
            seq = context.get(CONTEXT_SEQ).map_or("?", String::as_str)
        )
        .entered();

        Some(decode_response(kind, id, status, body))
    }
}

/// Maps a raw status and body onto the response for `kind`.
///
/// Success bodies of create and update are decoded best-effort: the controller
/// re-fetches the whole list afterwards, so a body it cannot read is not a failure.
#[must_use]
pub fn decode_response(kind: RequestKind, id: Option<i64>, status: u16, body: &[u8]) -> ApiResponse {
    if !(200..300).contains(&status) {
        let err = FlashdeckError::Request(format!("HTTP {status}: {}", body_excerpt(body)));
        tracing::debug!(request = kind.as_str(), error = %err, "backend rejected request");
        return ApiResponse::Failed {
            request: kind,
            id,
            message: err.to_string(),
        };
    }

    match kind {
        RequestKind::FetchAll => match serde_json::from_slice::<Vec<Flashcard>>(body) {
            Ok(cards) => ApiResponse::Loaded { cards },
            Err(e) => {
                let err = FlashdeckError::Decode(format!("flashcard list: {e}"));
                ApiResponse::Failed {
                    request: kind,
                    id,
                    message: err.to_string(),
                }
            }
        },
        RequestKind::Create => ApiResponse::Created {
            card: decode_card(body),
        },
        RequestKind::Update => match id {
            Some(id) => ApiResponse::Updated {
                id,
                card: decode_card(body),
            },
            None => missing_id(kind),
        },
        RequestKind::Delete => match id {
            Some(id) => ApiResponse::Deleted { id },
            None => missing_id(kind),
        },
    }
}

fn missing_id(kind: RequestKind) -> ApiResponse {
    ApiResponse::Failed {
        request: kind,
        id: None,
        message: FlashdeckError::Request("response context lost the card id".to_string())
            .to_string(),
    }
}

fn encode_card(card: &Flashcard) -> Result<Vec<u8>> {
    serde_json::to_vec(card)
        .map_err(|e| FlashdeckError::Request(format!("failed to encode flashcard: {e}")))
}

fn decode_card(body: &[u8]) -> Option<Flashcard> {
    match serde_json::from_slice::<Flashcard>(body) {
        Ok(card) => Some(card),
        Err(e) => {
            tracing::debug!(error = %e, "ignoring undecodable card body");
            None
        }
    }
}

fn body_excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return "no response body".to_string();
    }
    if trimmed.chars().count() > MAX_ERROR_BODY_CHARS {
        let cut: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
        format!("{cut}...")
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Recorder {
        sent: Vec<HttpRequest>,
    }

    impl Transport for Recorder {
        fn send(&mut self, request: HttpRequest) {
            self.sent.push(request);
        }
    }

    fn client() -> ApiClient<Recorder> {
        let base = parse_base_url("http://localhost:8080/api/flashcard/").unwrap();
        ApiClient::new(base, Recorder::default())
    }

    #[test]
    fn malformed_base_urls_are_rejected() {
        for raw in [
            "http://exa mple.com/api",
            "http://host:notaport/api",
            "https://[::1/api",
            "http://?/x",
            "localhost:8080/api",
            "ftp://cards.example.com",
            "file:///srv/cards",
        ] {
            assert!(
                matches!(parse_base_url(raw), Err(FlashdeckError::Config(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn item_urls_keep_query_out_of_the_path() {
        let base = parse_base_url("http://localhost:8080/api/flashcard?deck=1").unwrap();
        let mut client = ApiClient::new(base, Recorder::default());
        client.dispatch(&ApiRequest::delete(9)).unwrap();

        assert_eq!(
            client.transport().sent[0].url,
            "http://localhost:8080/api/flashcard/9?deck=1"
        );
    }

    #[test]
    fn bare_host_base_gets_root_path() {
        let base = parse_base_url("http://localhost:8080").unwrap();
        let mut client = ApiClient::new(base, Recorder::default());
        client.dispatch(&ApiRequest::fetch_all()).unwrap();
        client.dispatch(&ApiRequest::delete(4)).unwrap();

        let urls: Vec<&str> = client.transport().sent.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["http://localhost:8080/", "http://localhost:8080/4"]);
    }

    #[test]
    fn maps_each_operation_onto_the_collection_contract() {
        let mut client = client();
        let card = Flashcard::new("2+2?", "4", "math");

        client.dispatch(&ApiRequest::fetch_all()).unwrap();
        client.dispatch(&ApiRequest::create(card.clone())).unwrap();
        client.dispatch(&ApiRequest::update(7, card)).unwrap();
        client.dispatch(&ApiRequest::delete(7)).unwrap();

        let sent: Vec<(Method, &str)> = client
            .transport()
            .sent
            .iter()
            .map(|r| (r.method, r.url.as_str()))
            .collect();
        assert_eq!(
            sent,
            vec![
                (Method::Get, "http://localhost:8080/api/flashcard"),
                (Method::Post, "http://localhost:8080/api/flashcard"),
                (Method::Put, "http://localhost:8080/api/flashcard/7"),
                (Method::Delete, "http://localhost:8080/api/flashcard/7"),
            ]
        );
    }

    #[test]
    fn create_body_has_no_id_and_json_headers() {
        let mut client = client();
        client
            .dispatch(&ApiRequest::create(Flashcard::new("2+2?", "4", "math")))
            .unwrap();

        let sent = &client.transport().sent[0];
        let body: serde_json::Value = serde_json::from_slice(&sent.body).unwrap();
        assert_eq!(body, serde_json::json!({ "question": "2+2?", "answer": "4", "category": "math" }));
        assert_eq!(sent.headers.get("Content-Type").map(String::as_str), Some("application/json"));
        assert_eq!(sent.context.get(CONTEXT_REQUEST).map(String::as_str), Some("create"));
        assert!(!sent.context.contains_key(CONTEXT_ID));
    }

    #[test]
    fn get_requests_carry_no_content_type() {
        let mut client = client();
        client.dispatch(&ApiRequest::fetch_all()).unwrap();

        let sent = &client.transport().sent[0];
        assert!(sent.body.is_empty());
        assert!(!sent.headers.contains_key("Content-Type"));
    }

    #[test]
    fn sequence_numbers_increase_per_dispatch() {
        let mut client = client();
        client.dispatch(&ApiRequest::fetch_all()).unwrap();
        client.dispatch(&ApiRequest::fetch_all()).unwrap();

        let seqs: Vec<&str> = client
            .transport()
            .sent
            .iter()
            .filter_map(|r| r.context.get(CONTEXT_SEQ).map(String::as_str))
            .collect();
        assert_eq!(seqs, vec!["1", "2"]);
    }

    #[test]
    fn receive_ignores_foreign_contexts() {
        let client = client();
        let mut context = BTreeMap::new();
        context.insert("other_plugin".to_string(), "x".to_string());

        assert_eq!(client.receive(200, b"[]", &context), None);
    }

    #[test]
    fn receive_decodes_list_in_backend_order() {
        let client = client();
        let mut context = BTreeMap::new();
        context.insert(CONTEXT_REQUEST.to_string(), "fetch_all".to_string());

        let body = br#"[{"id":2,"question":"b","answer":"b","category":"x"},{"id":1,"question":"a","answer":"a","category":"x"}]"#;
        let Some(ApiResponse::Loaded { cards }) = client.receive(200, body, &context) else {
            panic!("expected loaded response");
        };
        let ids: Vec<Option<i64>> = cards.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![Some(2), Some(1)]);
    }

    #[test]
    fn non_success_status_is_a_failure() {
        let response = decode_response(RequestKind::Delete, Some(3), 500, b"boom");
        assert_eq!(
            response,
            ApiResponse::Failed {
                request: RequestKind::Delete,
                id: Some(3),
                message: "Request failed: HTTP 500: boom".to_string(),
            }
        );
    }

    #[test]
    fn undecodable_list_is_a_failure_but_undecodable_card_is_not() {
        assert!(matches!(
            decode_response(RequestKind::FetchAll, None, 200, b"<html>"),
            ApiResponse::Failed { request: RequestKind::FetchAll, .. }
        ));
        assert_eq!(
            decode_response(RequestKind::Create, None, 201, b""),
            ApiResponse::Created { card: None }
        );
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let body = "e".repeat(MAX_ERROR_BODY_CHARS + 50);
        let excerpt = body_excerpt(body.as_bytes());
        assert_eq!(excerpt.chars().count(), MAX_ERROR_BODY_CHARS + 3);
        assert!(excerpt.ends_with("..."));
    }
}
