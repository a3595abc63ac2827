//! Configuration loading
//!
//! Sources (applied in order, later sources override earlier ones):
//!  1. /etc/plex-discord-bridge/bridge.yaml   system-wide defaults
//!  2. ./config/bridge.yaml                   deployment-local override
//!  3. Path given by BRIDGE_CONFIG_FILE       operator-specified file
//!  4. Environment variables, unprefixed and case-insensitive
//!     e.g. DISCORD_WEBHOOK_URL sets discord_webhook_url
//!
//! Every field except the Discord webhook URL has a default, so a bare
//! environment with only DISCORD_WEBHOOK_URL set is a valid configuration.

use config::{Config, Environment, File, FileFormat};
use plex_bridge_api::{BridgeConfig, ConfigError};

/// Environment variable naming an explicit configuration file
pub const CONFIG_FILE_ENV: &str = "BRIDGE_CONFIG_FILE";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// Load configuration from the standard files and the process environment.
pub fn load_config() -> Result<BridgeConfig, SettingsError> {
    load_config_from(
        Environment::default(),
        std::env::var(CONFIG_FILE_ENV).ok(),
    )
}

pub(crate) fn load_config_from(
    environment: Environment,
    explicit_path: Option<String>,
) -> Result<BridgeConfig, SettingsError> {
    let mut builder = Config::builder()
        .add_source(
            File::with_name("/etc/plex-discord-bridge/bridge")
                .required(false)
                .format(FileFormat::Yaml),
        )
        .add_source(
            File::with_name("config/bridge")
                .required(false)
                .format(FileFormat::Yaml),
        );

    if let Some(path) = explicit_path.filter(|path| !path.is_empty()) {
        builder = builder.add_source(
            File::with_name(&path)
                .required(true)
                .format(FileFormat::Yaml),
        );
    }

    let config: BridgeConfig = builder.add_source(environment).build()?.try_deserialize()?;
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
