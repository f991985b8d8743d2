//! Configuration error types

use thiserror::Error;

/// Errors raised while loading or validating [`Settings`](super::Settings).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly selected configuration file does not exist
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// The merged sources could not be deserialized into settings
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// A setting is missing or out of range
    #[error("Invalid configuration for '{field}': {message}")]
    Invalid { field: String, message: String },

    /// `ESTIMATES_APP_ENV` names no known environment
    #[error("Unknown environment '{value}'. Valid values are: development, test, staging, production")]
    UnknownEnvironment { value: String },

    /// Two configuration sources were selected that cannot be combined
    #[error("Conflicting configuration sources: {0}")]
    ConflictingSources(String),

    #[error("Configuration source error: {0}")]
    Source(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        ConfigError::FileNotFound(path.into())
    }

    pub fn conflicting_sources(message: impl Into<String>) -> Self {
        ConfigError::ConflictingSources(message.into())
    }

    /// The offending setting, for validation failures.
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::Invalid { field, .. } => Some(field),
            _ => None,
        }
    }
}
