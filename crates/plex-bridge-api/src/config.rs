//! Configuration types for the HTTP service

use crate::errors::ConfigError;
use serde::Deserialize;
use std::{fmt, time::Duration};

/// Service configuration
///
/// Built once at startup and shared read-only with every request. Field
/// names match the environment variables the service reads, lowercased.
#[derive(Clone, Deserialize)]
pub struct BridgeConfig {
    /// Discord incoming webhook that receives the notifications
    pub discord_webhook_url: String,

    /// OTLP gRPC collector for exported logs
    #[serde(default = "default_otlp_endpoint")]
    pub otel_exporter_otlp_endpoint: String,

    /// Service identity reported to telemetry
    #[serde(default = "default_service_name")]
    pub otel_service_name: String,

    /// Port to listen on
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Timeout for the outbound Discord POST in seconds
    #[serde(default = "default_delivery_timeout_seconds")]
    pub delivery_timeout_seconds: u64,

    /// Bound on reading the inbound multipart body in seconds
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,

    /// Maximum request size in bytes
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    /// Enable JSON structured logging on stdout
    #[serde(default)]
    pub log_json: bool,
}

fn default_otlp_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_service_name() -> String {
    "plex-discord-bridge".to_string()
}

fn default_listen_port() -> u16 {
    8080
}

fn default_delivery_timeout_seconds() -> u64 {
    5
}

fn default_request_timeout_seconds() -> u64 {
    30
}

fn default_max_body_size() -> usize {
    10 * 1024 * 1024 // 10MB
}

impl BridgeConfig {
    /// Configuration with defaults for everything except the webhook URL.
    pub fn new(discord_webhook_url: impl Into<String>) -> Self {
        Self {
            discord_webhook_url: discord_webhook_url.into(),
            otel_exporter_otlp_endpoint: default_otlp_endpoint(),
            otel_service_name: default_service_name(),
            listen_port: default_listen_port(),
            delivery_timeout_seconds: default_delivery_timeout_seconds(),
            request_timeout_seconds: default_request_timeout_seconds(),
            max_body_size: default_max_body_size(),
            log_json: false,
        }
    }

    pub fn delivery_timeout(&self) -> Duration {
        Duration::from_secs(self.delivery_timeout_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Check values that deserialization alone cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.discord_webhook_url.trim().is_empty() {
            return Err(ConfigError::Missing {
                key: "DISCORD_WEBHOOK_URL".to_string(),
            });
        }

        let webhook_url =
            url::Url::parse(&self.discord_webhook_url).map_err(|e| ConfigError::Invalid {
                message: format!("DISCORD_WEBHOOK_URL is not a valid URL: {}", e),
            })?;
        if !matches!(webhook_url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                message: format!(
                    "DISCORD_WEBHOOK_URL must use http or https, got {}",
                    webhook_url.scheme()
                ),
            });
        }

        if self.otel_service_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "OTEL_SERVICE_NAME must not be empty".to_string(),
            });
        }

        if self.delivery_timeout_seconds == 0 {
            return Err(ConfigError::Invalid {
                message: "DELIVERY_TIMEOUT_SECONDS must be greater than zero".to_string(),
            });
        }

        if self.request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid {
                message: "REQUEST_TIMEOUT_SECONDS must be greater than zero".to_string(),
            });
        }

        if self.max_body_size == 0 {
            return Err(ConfigError::Invalid {
                message: "MAX_BODY_SIZE must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

impl fmt::Debug for BridgeConfig {
    // The webhook URL embeds the channel token
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeConfig")
            .field("discord_webhook_url", &"<redacted>")
            .field(
                "otel_exporter_otlp_endpoint",
                &self.otel_exporter_otlp_endpoint,
            )
            .field("otel_service_name", &self.otel_service_name)
            .field("listen_port", &self.listen_port)
            .field("delivery_timeout_seconds", &self.delivery_timeout_seconds)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("max_body_size", &self.max_body_size)
            .field("log_json", &self.log_json)
            .finish()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
