//! # Payload Extraction
//!
//! Plex posts webhooks as `multipart/form-data`: a `payload` part holding
//! the JSON event, and for some events a `thumb` part with a JPEG poster.
//! Only the first `payload` part is read; parts before it are skipped
//! without buffering and parts after it are never touched.

use axum::{
    extract::multipart::{Multipart, MultipartError, MultipartRejection},
    http::StatusCode,
};

/// Name of the form field carrying the JSON event
pub const PAYLOAD_FIELD: &str = "payload";

/// Failure to obtain the payload text from the request body
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    /// The body is not a readable multipart envelope
    #[error("Malformed multipart request: {message}")]
    MalformedRequest { message: String },

    /// The body exceeded the configured size limit while being read
    #[error("Request body exceeds the size limit: {message}")]
    TooLarge { message: String },

    /// The envelope was read to the end without a `payload` part
    #[error("No 'payload' part in multipart request")]
    MissingPayload,
}

impl From<MultipartRejection> for PayloadError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::MalformedRequest {
            message: rejection.body_text(),
        }
    }
}

impl From<MultipartError> for PayloadError {
    fn from(error: MultipartError) -> Self {
        if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Self::TooLarge {
                message: error.body_text(),
            };
        }

        Self::MalformedRequest {
            message: error.body_text(),
        }
    }
}

/// Scan the multipart body and return the text of the first `payload` part.
pub async fn extract_payload(multipart: &mut Multipart) -> Result<String, PayloadError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(PAYLOAD_FIELD) {
            return Ok(field.text().await?);
        }
    }

    Err(PayloadError::MissingPayload)
}

#[cfg(test)]
#[path = "payload_tests.rs"]
mod tests;
