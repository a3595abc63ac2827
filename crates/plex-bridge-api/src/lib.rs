//! # Plex Bridge HTTP Service
//!
//! HTTP server that receives Plex webhooks and relays the interesting ones to
//! Discord.
//!
//! This service provides:
//! - `POST /` webhook endpoint accepting Plex's multipart payloads
//! - `GET /health` liveness endpoint
//!
//! Each request runs the full pipeline on its own: extract the `payload`
//! part, validate it, log it, filter it, format the message and deliver it.
//! Delivery failures are logged and never change the response sent to Plex.

pub mod config;
pub mod errors;
pub mod payload;

pub use config::BridgeConfig;
pub use errors::{ConfigError, ServiceError, WebhookHandlerError};
pub use payload::{extract_payload, PayloadError};

use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    middleware,
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use plex_bridge_core::{
    filter::{self, FilterDecision},
    message, NotificationSink, WebhookEvent,
};
use serde::Serialize;
use std::{net::SocketAddr, sync::Arc};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument, warn};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration for the service
    pub config: Arc<BridgeConfig>,

    /// Destination for formatted notifications
    pub sink: Arc<dyn NotificationSink>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: BridgeConfig, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            config: Arc::new(config),
            sink,
        }
    }
}

// ============================================================================
// HTTP Server
// ============================================================================

/// Create HTTP router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_size;

    Router::new()
        .route("/", post(handle_webhook))
        .route("/health", get(handle_health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_logging_middleware))
                .layer(DefaultBodyLimit::max(body_limit))
                .into_inner(),
        )
        .with_state(state)
}

/// Start HTTP server
pub async fn start_server(
    config: BridgeConfig,
    sink: Arc<dyn NotificationSink>,
) -> Result<(), ServiceError> {
    config.validate()?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.listen_port));
    let app = create_router(AppState::new(config, sink));

    let listener =
        tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServiceError::BindFailed {
                address: addr.to_string(),
                message: e.to_string(),
            })?;

    info!("Starting HTTP server on {}", addr);

    // In-flight requests, including their Discord delivery, finish before exit
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServiceError::ServerFailed {
            message: e.to_string(),
        })?;

    info!("HTTP server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        },
    }
}

// ============================================================================
// Webhook Handler
// ============================================================================

/// Handle a Plex webhook
///
/// 1. Extract the `payload` part (400 on failure)
/// 2. Validate it as a Plex event (400 on failure)
/// 3. Log the validated event
/// 4. Drop events that are not forwarded (200)
/// 5. Format and log the message
/// 6. Deliver it, logging any failure
/// 7. Respond 200
#[instrument(skip_all)]
pub async fn handle_webhook(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<WebhookResponse>, WebhookHandlerError> {
    let mut multipart = multipart.map_err(PayloadError::from)?;

    let timeout = state.config.request_timeout();
    let payload_text = tokio::time::timeout(timeout, extract_payload(&mut multipart))
        .await
        .map_err(|_| WebhookHandlerError::Timeout {
            seconds: timeout.as_secs(),
        })??;

    let event = WebhookEvent::from_json(&payload_text)?;

    info!(
        event = %serde_json::to_string(&event).unwrap_or_default(),
        "Plex webhook received"
    );

    Ok(Json(relay_event(state.sink.as_ref(), &event).await))
}

/// Filter, format and deliver a validated event.
pub async fn relay_event(sink: &dyn NotificationSink, event: &WebhookEvent) -> WebhookResponse {
    if filter::evaluate(event) != FilterDecision::Forward {
        return WebhookResponse::ignored();
    }

    let text = message::format_message(event);
    info!(message = %text, "Discord message");

    if let Err(e) = sink.deliver(&text).await {
        error!(error = %e, event_type = %event.event_type, "Failed to post to Discord");
    }

    WebhookResponse::forwarded()
}

// ============================================================================
// Health Check
// ============================================================================

/// Basic liveness endpoint
async fn handle_health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Middleware
// ============================================================================

/// Request logging middleware with correlation ID tracking
///
/// Reuses an incoming `x-correlation-id` header or generates one, echoes it
/// on the response and logs completion at a level matching the status class.
#[instrument(skip(request, next), fields(
    method = %request.method(),
    uri = %request.uri(),
    correlation_id
))]
async fn request_logging_middleware(
    mut request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    let start = std::time::Instant::now();

    let correlation_id = request
        .headers()
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    tracing::Span::current().record("correlation_id", correlation_id.as_str());
    request.extensions_mut().insert(correlation_id.clone());

    let mut response = next.run(request).await;
    let duration = start.elapsed();

    if let Ok(header_value) = correlation_id.parse() {
        response
            .headers_mut()
            .insert(CORRELATION_ID_HEADER, header_value);
    }

    let status = response.status();
    if status.is_server_error() {
        error!(
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed with server error"
        );
    } else if status.is_client_error() {
        warn!(
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed with client error"
        );
    } else {
        info!(
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed successfully"
        );
    }

    response
}

/// Header carrying the per-request correlation ID
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

// ============================================================================
// Response Types
// ============================================================================

/// Acknowledgement returned to Plex on success
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookResponse {
    /// `forwarded` or `ignored`
    pub status: String,
}

impl WebhookResponse {
    pub fn forwarded() -> Self {
        Self {
            status: "forwarded".to_string(),
        }
    }

    pub fn ignored() -> Self {
        Self {
            status: "ignored".to_string(),
        }
    }

    pub fn is_forwarded(&self) -> bool {
        self.status == "forwarded"
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
