//! Tracing subscriber setup.

use super::exporter;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name of the span log inside the data directory.
pub const SPAN_FILE_NAME: &str = "paneflow-spans.jsonl";

/// Installs the global tracing subscriber.
///
/// Spans are filtered by `config.trace_level` (default `"info"`) and exported to
/// `paneflow-spans.jsonl` in the data directory, rotated at 5 MiB with three
/// backups.
///
/// Observability is optional: if the data directory cannot be created nothing
/// is installed. Only the first call takes effect.
///
/// ```rust
/// use paneflow::observability::init_tracing;
/// use paneflow::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let level = config.trace_level.clone().unwrap_or_else(|| "info".to_string());

    let data_dir = crate::infrastructure::paths::get_data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let resource = Resource::new(vec![
        opentelemetry::KeyValue::new("service.name", "paneflow"),
        opentelemetry::KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);

    let provider = exporter::create_tracer_provider(data_dir.join(SPAN_FILE_NAME), resource);
    let tracer = provider.tracer("paneflow");

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(OpenTelemetryLayer::new(tracer));

    let _ = subscriber.try_init();
}
