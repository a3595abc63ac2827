//! Logging and OpenTelemetry wiring
//!
//! `tracing` events go to two places: a stdout `fmt` layer (plain or JSON)
//! and an OTLP/gRPC log exporter tagged with the configured service name.

use opentelemetry::KeyValue;
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::{LogExporter, WithExportConfig};
use opentelemetry_sdk::{logs::SdkLoggerProvider, Resource};
use plex_bridge_api::BridgeConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Used when `RUST_LOG` is not set
const DEFAULT_LOG_FILTER: &str =
    "plex_bridge_service=info,plex_bridge_api=info,plex_bridge_core=info,tower_http=info";

/// Export filter. The exporter's own transport stack must not feed back into itself.
///
/// Directives match target prefixes, so `tower_http` is re-enabled explicitly
/// after `tower` is switched off.
const EXPORT_FILTER: &str = "info,h2=off,hyper=off,hyper_util=off,tonic=off,tower=off,tower_http=info,reqwest=off,opentelemetry=off,opentelemetry_sdk=off,opentelemetry_otlp=off";

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Failed to build OTLP log exporter: {message}")]
    Exporter { message: String },

    #[error("Failed to install tracing subscriber: {message}")]
    Subscriber { message: String },
}

/// Keeps the log pipeline alive; call [`TelemetryGuard::shutdown`] before exit
/// to flush batched records.
pub struct TelemetryGuard {
    logger_provider: SdkLoggerProvider,
}

impl TelemetryGuard {
    pub fn shutdown(self) {
        if let Err(e) = self.logger_provider.shutdown() {
            eprintln!("Failed to flush telemetry: {}", e);
        }
    }
}

/// Install the global subscriber. Must run inside the Tokio runtime.
pub fn init(config: &BridgeConfig) -> Result<TelemetryGuard, TelemetryError> {
    let exporter = LogExporter::builder()
        .with_tonic()
        .with_endpoint(config.otel_exporter_otlp_endpoint.clone())
        .build()
        .map_err(|e| TelemetryError::Exporter {
            message: e.to_string(),
        })?;

    let resource = Resource::builder()
        .with_service_name(config.otel_service_name.clone())
        .with_attribute(KeyValue::new("service.version", env!("CARGO_PKG_VERSION")))
        .build();

    let logger_provider = SdkLoggerProvider::builder()
        .with_resource(resource)
        .with_batch_exporter(exporter)
        .build();

    let otel_layer =
        OpenTelemetryTracingBridge::new(&logger_provider).with_filter(EnvFilter::new(EXPORT_FILTER));

    let json = config.log_json;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .with(otel_layer)
        .try_init()
        .map_err(|e| TelemetryError::Subscriber {
            message: e.to_string(),
        })?;

    Ok(TelemetryGuard { logger_provider })
}

#[cfg(test)]
#[path = "telemetry_tests.rs"]
mod tests;
