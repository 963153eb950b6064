//! Logging and OpenTelemetry bootstrap.
//!
//! The composition root calls [`init_telemetry`] once at startup. With the
//! `telemetry` feature and an OTLP endpoint configured, spans (including the
//! `db.query` spans of an instrumented database handle) are exported to the
//! collector; otherwise only the console subscriber is installed.

#[cfg(feature = "telemetry")]
use opentelemetry::trace::TracerProvider;
#[cfg(feature = "telemetry")]
use opentelemetry::KeyValue;
#[cfg(feature = "telemetry")]
use opentelemetry_otlp::WithExportConfig;
#[cfg(feature = "telemetry")]
use opentelemetry_sdk::{runtime, Resource};
#[cfg(feature = "telemetry")]
use opentelemetry_semantic_conventions::resource::SERVICE_NAME;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{StoreError, StoreResult};

/// Log filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info,userstore=debug,sqlx=warn";

/// Service name used when none is configured.
pub const DEFAULT_SERVICE_NAME: &str = "userstore";

/// Telemetry configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name reported on the trace resource.
    pub service_name: String,

    /// OTLP endpoint; spans are exported only when set.
    pub otlp_endpoint: Option<String>,

    /// Whether to write events to stderr.
    pub console_output: bool,
}

impl TelemetryConfig {
    /// Returns true if spans are exported.
    #[must_use]
    pub fn exports_spans(&self) -> bool {
        self.otlp_endpoint.is_some()
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            otlp_endpoint: None,
            console_output: true,
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Console layer; stdout is left to command output.
fn console_layer<S>() -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
}

/// Initialize the global subscriber.
///
/// Fails if a global subscriber is already installed or the exporter cannot
/// be built.
#[cfg(feature = "telemetry")]
pub fn init_telemetry(config: &TelemetryConfig) -> StoreResult<()> {
    let Some(endpoint) = &config.otlp_endpoint else {
        return init_basic_tracing(config.console_output);
    };

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .map_err(|e| StoreError::Telemetry(format!("Failed to create OTLP exporter: {}", e)))?;

    let tracer_provider = opentelemetry_sdk::trace::TracerProvider::builder()
        .with_batch_exporter(exporter, runtime::Tokio)
        .with_resource(Resource::new(vec![KeyValue::new(
            SERVICE_NAME,
            config.service_name.clone(),
        )]))
        .build();

    let tracer = tracer_provider.tracer(DEFAULT_SERVICE_NAME);
    opentelemetry::global::set_tracer_provider(tracer_provider);

    let console = config.console_output.then(console_layer);
    tracing_subscriber::registry()
        .with(env_filter())
        .with(console)
        .with(tracing_opentelemetry::layer().with_tracer(tracer))
        .try_init()
        .map_err(|e| StoreError::Telemetry(e.to_string()))?;

    tracing::info!(
        service_name = %config.service_name,
        otlp_endpoint = %endpoint,
        "Telemetry initialized"
    );

    Ok(())
}

/// Initialize the console subscriber only.
///
/// Built without the `telemetry` feature, so spans are never exported.
#[cfg(not(feature = "telemetry"))]
pub fn init_telemetry(config: &TelemetryConfig) -> StoreResult<()> {
    init_basic_tracing(config.console_output)?;
    if config.exports_spans() {
        tracing::warn!("Telemetry requested but the `telemetry` feature is disabled");
    }
    Ok(())
}

fn init_basic_tracing(console_output: bool) -> StoreResult<()> {
    if !console_output {
        return Ok(());
    }

    tracing_subscriber::registry()
        .with(env_filter())
        .with(console_layer())
        .try_init()
        .map_err(|e| StoreError::Telemetry(e.to_string()))
}

/// Shutdown telemetry, flushing any pending spans.
#[cfg(feature = "telemetry")]
pub fn shutdown_telemetry() {
    opentelemetry::global::shutdown_tracer_provider();
    tracing::info!("Telemetry shutdown complete");
}

/// No-op without the `telemetry` feature.
#[cfg(not(feature = "telemetry"))]
pub fn shutdown_telemetry() {}
