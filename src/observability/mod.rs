//! OpenTelemetry-based observability with file-based trace export.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → OpenTelemetry SDK → FileSpanExporter → JSON lines
//! ```
//!
//! Traces land in `~/.local/share/zellij/flashdeck/flashdeck-otlp.jsonl`
//! (through the sandbox's `/host` mount), one OTLP document per line. The file
//! rotates at 10 MiB and three backups are kept.
//!
//! The level comes from the `trace_level` plugin option and accepts any
//! `EnvFilter` directive, e.g. `debug` or `flashdeck::api=trace,info`.

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use file_writer::{FileWriter, RotationPolicy};
pub use init::{init_tracing, SERVICE_NAME};
