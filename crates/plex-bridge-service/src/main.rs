//! # Plex Discord Bridge Service
//!
//! Binary entry point for the bridge.
//!
//! This executable:
//! - Loads configuration from files and environment
//! - Initializes logging and OpenTelemetry log export
//! - Creates the Discord webhook client
//! - Starts the HTTP server from plex-bridge-api
//!
//! Exit codes: 1 bind failure, 2 server failure, 3 configuration error,
//! 4 telemetry or HTTP client initialisation failure.

mod settings;
mod telemetry;

use plex_bridge_api::start_server;
use plex_bridge_core::{DeliveryConfig, DiscordWebhookClient};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging depends on the configured service name, so a configuration
    // failure can only go to stderr.
    let config = match settings::load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}. Fix the configuration and restart.", e);
            std::process::exit(3);
        }
    };

    let telemetry = match telemetry::init(&config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Telemetry initialisation failed: {}", e);
            std::process::exit(4);
        }
    };

    info!(
        service = %config.otel_service_name,
        otlp_endpoint = %config.otel_exporter_otlp_endpoint,
        port = config.listen_port,
        "Starting Plex Discord bridge"
    );

    let delivery_config = DeliveryConfig::default().with_timeout(config.delivery_timeout());
    let discord = match DiscordWebhookClient::new(config.discord_webhook_url.clone(), delivery_config)
    {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to create Discord client; aborting");
            telemetry.shutdown();
            std::process::exit(4);
        }
    };

    let result = start_server(config, Arc::new(discord)).await;

    if let Err(e) = result {
        error!("Failed to start server: {}", e);
        telemetry.shutdown();
        std::process::exit(e.exit_code());
    }

    telemetry.shutdown();
    Ok(())
}
