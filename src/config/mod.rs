mod settings;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

pub use settings::{DeliverySettings, IdentifierScope, LoggingSettings, Settings};

/// Loads the configuration from the default file and environment variables
/// Merges the configuration with default values
/// Returns a `Settings` struct containing the delivery and logging configurations
///
/// Environment variables use the `MQTT_` prefix and `__` between sections,
/// for example `MQTT_DELIVERY__IDENTIFIER_SCOPE=global`. A `.env` file in the
/// working directory is loaded first when present.
pub fn load_config() -> Result<Settings, ConfigError> {
    let _ = dotenvy::dotenv();

    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            Environment::with_prefix("MQTT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    // Merge with defaults
    let default = Settings::default();

    Ok(Settings {
        delivery: DeliverySettings {
            identifier_scope: partial
                .delivery
                .as_ref()
                .and_then(|d| d.identifier_scope)
                .unwrap_or(default.delivery.identifier_scope),
            warn_on_unmatched_release: partial
                .delivery
                .as_ref()
                .and_then(|d| d.warn_on_unmatched_release)
                .unwrap_or(default.delivery.warn_on_unmatched_release),
        },
        logging: LoggingSettings {
            level: partial
                .logging
                .as_ref()
                .and_then(|l| l.level.clone())
                .unwrap_or(default.logging.level),
        },
    })
}

#[cfg(test)]
mod tests;
