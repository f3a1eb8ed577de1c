//! Configuration error types.

use thiserror::Error;

use crate::domain::foundation::WizardError;

/// Errors raised while loading or validating static configuration.
///
/// All of these fail fast at startup; none reaches a live session.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid catalog configuration: {0}")]
    Invalid(String),

    #[error("Unknown locale '{0}'")]
    UnknownLocale(String),
}

impl From<WizardError> for ConfigError {
    fn from(err: WizardError) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}
