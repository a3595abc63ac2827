//! Error types for the HTTP service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use plex_bridge_core::SchemaError;
use tracing::warn;

use crate::payload::PayloadError;

/// Webhook handler errors with HTTP status code mapping
///
/// Every variant is a client error. The body returned to Plex is a short
/// fixed string; the detailed cause is only written to the log.
///
/// Delivery failures are not represented here: they never change the
/// response.
#[derive(Debug, thiserror::Error)]
pub enum WebhookHandlerError {
    /// Body is not multipart, no `payload` part was found, or the body is
    /// over the size limit
    ///
    /// Maps to: `400 Bad Request`, or `413 Payload Too Large` for the limit
    #[error(transparent)]
    Payload(#[from] PayloadError),

    /// The `payload` part is not a valid Plex event
    ///
    /// Maps to: `400 Bad Request`
    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] SchemaError),

    /// Reading the multipart body took longer than the configured bound
    ///
    /// Maps to: `408 Request Timeout`
    #[error("Request timeout after {seconds}s")]
    Timeout { seconds: u64 },
}

impl WebhookHandlerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Payload(PayloadError::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Payload(_) | Self::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            Self::Timeout { .. } => StatusCode::REQUEST_TIMEOUT,
        }
    }

    /// Short diagnostic returned to the caller.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Payload(PayloadError::MalformedRequest { .. }) => "expected multipart form data",
            Self::Payload(PayloadError::MissingPayload) => "missing payload part",
            Self::Payload(PayloadError::TooLarge { .. }) => "payload too large",
            Self::InvalidPayload(_) => "invalid payload",
            Self::Timeout { .. } => "request timeout",
        }
    }
}

impl IntoResponse for WebhookHandlerError {
    fn into_response(self) -> Response {
        match &self {
            Self::InvalidPayload(e) => {
                warn!(reason = e.reason(), error = %e, "Rejected invalid payload");
            }
            Self::Timeout { seconds } => {
                warn!(timeout_seconds = seconds, "Request timeout");
            }
            Self::Payload(e) => {
                warn!(error = %e, "Rejected webhook request");
            }
        }

        (self.status_code(), self.public_message()).into_response()
    }
}

/// Service-level errors
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Failed to bind to address {address}: {message}")]
    BindFailed { address: String, message: String },

    #[error("Server failed: {message}")]
    ServerFailed { message: String },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

impl ServiceError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::BindFailed { .. } => 1,
            Self::ServerFailed { .. } => 2,
            Self::Configuration(_) => 3,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {key}")]
    Missing { key: String },
}
