//! Tracing subscriber setup.

use super::file_writer::RotationPolicy;
use super::tracer;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use std::path::PathBuf;
use tracing::Subscriber;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Service and instrumentation scope name reported in every trace.
pub const SERVICE_NAME: &str = "Flashdeck";

/// Installs the global subscriber: `EnvFilter` from `config.trace_level`, then
/// an OpenTelemetry layer exporting to the rotating trace file.
///
/// Tracing is best effort. If the data directory cannot be created, nothing is
/// installed and `false` is returned. Later calls are no-ops once a global
/// subscriber exists.
pub fn init_tracing(config: &Config) -> bool {
    let data_dir = crate::infrastructure::get_data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return false;
    }

    build_subscriber(
        &config.trace_level,
        crate::infrastructure::trace_file_path(),
        RotationPolicy::default(),
    )
    .try_init()
    .is_ok()
}

/// Builds the filtered subscriber that exports spans to `file_path`.
///
/// Events are only exported as part of an enabled span, so code that must
/// leave a record at the default level opens an `info` span first.
fn build_subscriber(
    trace_level: &str,
    file_path: PathBuf,
    policy: RotationPolicy,
) -> impl Subscriber + Send + Sync + 'static {
    let resource = Resource::new(vec![
        opentelemetry::KeyValue::new("service.name", SERVICE_NAME),
        opentelemetry::KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);

    let provider = tracer::create_tracer_provider(file_path, policy, resource, SERVICE_NAME);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    tracing_subscriber::registry()
        .with(EnvFilter::new(trace_level))
        .with(otel_layer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiResponse, RequestKind};
    use crate::app::{handle_event, AppState, Event};
    use crate::ui::Theme;
    use crate::DEFAULT_TRACE_LEVEL;
    use std::fs;

    fn failed(request: RequestKind, message: &str) -> Event {
        Event::ApiResponse(ApiResponse::Failed {
            request,
            id: None,
            message: message.to_string(),
        })
    }

    #[test]
    fn failures_are_exported_at_default_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("traces.jsonl");
        let subscriber = build_subscriber(DEFAULT_TRACE_LEVEL, path.clone(), RotationPolicy::default());

        let mut state = AppState::new(Theme::default());
        tracing::subscriber::with_default(subscriber, || {
            handle_event(
                &mut state,
                &failed(RequestKind::FetchAll, "Request failed: HTTP 503: backend-down-503"),
            )
            .unwrap();
        });

        let traces = fs::read_to_string(&path).unwrap();
        assert!(traces.contains("backend-down-503"));
        assert!(traces.contains("record_failure"));
        assert!(state.status.is_some());
    }

    #[test]
    fn dispatch_failures_outside_any_span_are_exported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("traces.jsonl");
        let subscriber = build_subscriber(DEFAULT_TRACE_LEVEL, path.clone(), RotationPolicy::default());

        let mut state = AppState::new(Theme::default());
        tracing::subscriber::with_default(subscriber, || {
            state.record_failure(RequestKind::Delete, "encode-failure-marker");
        });

        assert!(fs::read_to_string(&path).unwrap().contains("encode-failure-marker"));
    }

    #[test]
    fn debug_detail_stays_out_at_default_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("traces.jsonl");
        let subscriber = build_subscriber(DEFAULT_TRACE_LEVEL, path.clone(), RotationPolicy::default());

        let mut state = AppState::new(Theme::default());
        tracing::subscriber::with_default(subscriber, || {
            handle_event(&mut state, &Event::KeyDown).unwrap();
        });

        let traces = fs::read_to_string(&path).unwrap_or_default();
        assert!(!traces.contains("handle_event"));
    }
}
