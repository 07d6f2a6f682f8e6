//! File span exporter.
//!
//! Each finished span becomes one flat JSON object on its own line:
//!
//! ```json
//! {"service":"paneflow","traceId":"…","spanId":"…","parentSpanId":"",
//!  "name":"create_pane","kind":"internal","startUnixNano":"…","durationMicros":42,
//!  "attributes":{"type_id":"crm"},"events":[],"status":"unset"}
//! ```
//!
//! The line format is greppable and `jq`-friendly, which matters more for a
//! local span log than OTLP batch compatibility.

use super::file_writer::FileWriter;
use futures_util::future::BoxFuture;
use opentelemetry::trace::{SpanId, SpanKind, Status, TraceError};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use serde_json::{json, Map, Value as JsonValue};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub(crate) struct FileSpanExporter {
    writer: FileWriter,
    service: String,
    is_shutdown: AtomicBool,
}

impl FileSpanExporter {
    pub(crate) fn new(writer: FileWriter, resource: &Resource) -> Self {
        let service = resource
            .get(opentelemetry::Key::new("service.name"))
            .map_or_else(|| "paneflow".to_string(), |v| v.to_string());
        Self {
            writer,
            service,
            is_shutdown: AtomicBool::new(false),
        }
    }

    fn format_span(&self, span: &SpanData) -> JsonValue {
        let parent = if span.parent_span_id == SpanId::INVALID {
            String::new()
        } else {
            format!("{:016x}", span.parent_span_id)
        };
        let duration = span.end_time.duration_since(span.start_time).unwrap_or(Duration::ZERO);
        let events: Vec<JsonValue> = span
            .events
            .iter()
            .map(|event| {
                json!({
                    "name": event.name,
                    "timeUnixNano": unix_nanos(event.timestamp),
                    "attributes": attribute_map(&event.attributes),
                })
            })
            .collect();

        json!({
            "service": self.service,
            "traceId": format!("{:032x}", span.span_context.trace_id()),
            "spanId": format!("{:016x}", span.span_context.span_id()),
            "parentSpanId": parent,
            "name": span.name,
            "kind": kind_name(&span.span_kind),
            "startUnixNano": unix_nanos(span.start_time),
            "durationMicros": u64::try_from(duration.as_micros()).unwrap_or(u64::MAX),
            "attributes": attribute_map(&span.attributes),
            "events": events,
            "status": status_json(&span.status),
        })
    }
}

impl SpanExporter for FileSpanExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        if self.is_shutdown.load(Ordering::SeqCst) {
            return Box::pin(std::future::ready(Err(TraceError::from("exporter is shut down"))));
        }

        for span in &batch {
            let line = self.format_span(span).to_string();
            if let Err(e) = self.writer.write_line(&line) {
                return Box::pin(std::future::ready(Err(TraceError::from(e.to_string()))));
            }
        }
        Box::pin(std::future::ready(Ok(())))
    }

    fn shutdown(&mut self) {
        self.is_shutdown.store(true, Ordering::SeqCst);
    }

    fn set_resource(&mut self, res: &Resource) {
        if let Some(name) = res.get(opentelemetry::Key::new("service.name")) {
            self.service = name.to_string();
        }
    }
}

impl std::fmt::Debug for FileSpanExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSpanExporter")
            .field("writer", &self.writer)
            .field("service", &self.service)
            .field("is_shutdown", &self.is_shutdown)
            .finish()
    }
}

/// Creates a tracer provider exporting every span to `file_path` as it ends.
pub(crate) fn create_tracer_provider(file_path: PathBuf, resource: Resource) -> TracerProvider {
    let exporter = FileSpanExporter::new(FileWriter::new(file_path), &resource);

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}

fn unix_nanos(time: SystemTime) -> String {
    time.duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO).as_nanos().to_string()
}

const fn kind_name(kind: &SpanKind) -> &'static str {
    match kind {
        SpanKind::Internal => "internal",
        SpanKind::Server => "server",
        SpanKind::Client => "client",
        SpanKind::Producer => "producer",
        SpanKind::Consumer => "consumer",
    }
}

fn status_json(status: &Status) -> JsonValue {
    match status {
        Status::Unset => json!("unset"),
        Status::Ok => json!("ok"),
        Status::Error { description } => json!({ "error": description.to_string() }),
    }
}

fn attribute_map(attributes: &[KeyValue]) -> JsonValue {
    let map: Map<String, JsonValue> = attributes
        .iter()
        .map(|kv| (kv.key.to_string(), attribute_value(&kv.value)))
        .collect();
    JsonValue::Object(map)
}

fn attribute_value(value: &Value) -> JsonValue {
    match value {
        Value::Bool(b) => json!(b),
        Value::I64(i) => json!(i),
        Value::F64(f) => json!(f),
        Value::String(s) => json!(s.as_str()),
        Value::Array(_) => json!(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_flatten_to_an_object() {
        let attrs = vec![
            KeyValue::new("pane_id", "crm"),
            KeyValue::new("count", 3_i64),
            KeyValue::new("degraded", false),
        ];
        assert_eq!(
            attribute_map(&attrs),
            json!({ "pane_id": "crm", "count": 3, "degraded": false })
        );
    }

    #[test]
    fn status_and_kind_names() {
        assert_eq!(status_json(&Status::Ok), json!("ok"));
        assert_eq!(status_json(&Status::error("boom")), json!({ "error": "boom" }));
        assert_eq!(kind_name(&SpanKind::Internal), "internal");
        assert_eq!(unix_nanos(UNIX_EPOCH + Duration::from_nanos(1500)), "1500");
    }
}
