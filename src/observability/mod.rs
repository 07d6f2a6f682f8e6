//! OpenTelemetry-based observability with a local span log.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → OpenTelemetry SDK → FileSpanExporter → JSON lines
//! ```
//!
//! The span log lives at `<data dir>/paneflow-spans.jsonl`, one JSON object per
//! finished span, rotated at 5 MiB with three numbered backups.
//!
//! Trace level comes from the `trace_level` config option and defaults to
//! `"info"`.
//!
//! # Modules
//!
//! - [`init`]: subscriber setup
//! - [`exporter`]: span exporter writing one JSON line per span
//! - [`file_writer`]: size-rotated line writer

mod exporter;
mod file_writer;
mod init;

pub use init::{init_tracing, SPAN_FILE_NAME};
