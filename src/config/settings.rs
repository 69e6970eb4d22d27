use serde::Deserialize;

/// Top-level configuration settings for the application.
///
/// Includes settings for the delivery engine and for logging.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    pub delivery: DeliverySettings,
    pub logging: LoggingSettings,
}

/// Configuration settings for the delivery engine.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DeliverySettings {
    /// Scope key handed to the identifier source on every publish.
    pub identifier_scope: IdentifierScope,
    /// Emit a `warn` event (instead of `debug`) when a PublishRelease arrives
    /// for an identifier that was never received.
    pub warn_on_unmatched_release: bool,
}

/// How message identifiers are scoped when drawn from the identifier source.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierScope {
    /// One counter per publish topic.
    #[default]
    Topic,
    /// A single counter shared by every topic.
    Global,
}

/// Configuration settings for tracing output.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub delivery: Option<PartialDeliverySettings>,
    pub logging: Option<PartialLoggingSettings>,
}

/// Partial delivery settings.
#[derive(Debug, Deserialize)]
pub struct PartialDeliverySettings {
    pub identifier_scope: Option<IdentifierScope>,
    pub warn_on_unmatched_release: Option<bool>,
}

/// Partial logging settings.
#[derive(Debug, Deserialize)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
}

impl Default for DeliverySettings {
    fn default() -> Self {
        Self {
            identifier_scope: IdentifierScope::Topic,
            warn_on_unmatched_release: true,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Provides default values for `Settings`.
///
/// Ensures the application has sensible defaults if no configuration is provided.
impl Default for Settings {
    fn default() -> Self {
        Self {
            delivery: DeliverySettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}
