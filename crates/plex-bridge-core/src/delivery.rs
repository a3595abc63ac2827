//! # Delivery Client
//!
//! Posts formatted messages to a Discord incoming webhook.
//!
//! Delivery is fire-and-forget: exactly one attempt is made per message and
//! the outcome is reported as a [`DeliveryError`] for the caller to log.
//! Nothing here retries.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument};

// ============================================================================
// Configuration
// ============================================================================

/// Settings for the outbound HTTP client
///
/// # Examples
///
/// ```
/// use plex_bridge_core::DeliveryConfig;
/// use std::time::Duration;
///
/// let config = DeliveryConfig::default().with_timeout(Duration::from_secs(2));
/// assert_eq!(config.timeout, Duration::from_secs(2));
/// ```
#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    /// Upper bound on a single POST, connect time included
    pub timeout: Duration,

    /// User agent sent to Discord
    pub user_agent: String,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            user_agent: format!("plex-discord-bridge/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl DeliveryConfig {
    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Failure to hand a message to Discord
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// Discord answered with a non-success status
    #[error("Webhook responded {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The request never produced a response (connect error, timeout, ...)
    #[error("Webhook unreachable: {message}")]
    Unreachable { message: String },

    #[error("Failed to construct HTTP client: {message}")]
    ClientConstruction { message: String },
}

// ============================================================================
// Sink abstraction
// ============================================================================

/// Destination for formatted notifications
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver a single message. Called at most once per forwarded event.
    async fn deliver(&self, message: &str) -> Result<(), DeliveryError>;
}

/// JSON body accepted by Discord incoming webhooks
#[derive(Debug, Serialize)]
struct DiscordMessage<'a> {
    content: &'a str,
}

/// [`NotificationSink`] backed by a Discord incoming webhook URL
#[derive(Debug, Clone)]
pub struct DiscordWebhookClient {
    client: reqwest::Client,
    webhook_url: String,
}

impl DiscordWebhookClient {
    /// Build a client for `webhook_url`.
    pub fn new(
        webhook_url: impl Into<String>,
        config: DeliveryConfig,
    ) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| DeliveryError::ClientConstruction {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            webhook_url: webhook_url.into(),
        })
    }
}

#[async_trait]
impl NotificationSink for DiscordWebhookClient {
    #[instrument(skip_all)]
    async fn deliver(&self, message: &str) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&DiscordMessage { content: message })
            .send()
            .await
            .map_err(|e| DeliveryError::Unreachable {
                // The URL carries the webhook token, keep it out of the logs
                message: e.without_url().to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => format!("<failed to read response body: {}>", e.without_url()),
            };
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = status.as_u16(), "Discord accepted message");
        Ok(())
    }
}

#[cfg(test)]
#[path = "delivery_tests.rs"]
mod tests;
