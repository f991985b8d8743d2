//! Configuration validation logic
//!
//! Validation runs once after loading; anything that would leave the process
//! with a client that cannot reach the store is rejected here.

use crate::config::error::ConfigError;
use crate::config::settings::{BackendConfig, CacheConfig, LoggerSettings, Settings};

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

impl BackendConfig {
    /// Validate backend configuration
    ///
    /// # Validation Rules
    /// - URL must not be empty and must be http(s) with a host
    /// - API key must not be empty
    /// - Both timeouts must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::invalid(
                "backend.url",
                "Backend URL is required. Set ESTIMATES_BACKEND__URL or [backend] url.",
            ));
        }

        if !self.is_valid_url() {
            return Err(ConfigError::invalid(
                "backend.url",
                "Invalid backend URL format. Expected format: http(s)://host[:port]",
            ));
        }

        if self.api_key.trim().is_empty() {
            return Err(ConfigError::invalid(
                "backend.api_key",
                "Backend API key is required. Set ESTIMATES_BACKEND__API_KEY or [backend] api_key.",
            ));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::invalid(
                "backend.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        if self.connect_timeout == 0 {
            return Err(ConfigError::invalid(
                "backend.connect_timeout",
                "Connect timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }

    fn is_valid_url(&self) -> bool {
        match reqwest::Url::parse(self.url.trim()) {
            Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
            Err(_) => false,
        }
    }
}

impl CacheConfig {
    /// Validate cache configuration
    ///
    /// Size and TTL only matter when the cache is enabled.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }

        if self.max_size == 0 {
            return Err(ConfigError::invalid(
                "cache.max_size",
                "Cache max_size must be greater than 0 when the cache is enabled.",
            ));
        }

        if self.ttl_seconds == 0 {
            return Err(ConfigError::invalid(
                "cache.ttl_seconds",
                "Cache ttl_seconds must be greater than 0 when the cache is enabled.",
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.level.trim().is_empty() {
            return Err(ConfigError::invalid(
                "logger.level",
                "Log level must not be empty.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid {
                field: "logger.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl Settings {
    /// Validate all configuration sections
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.backend.validate()?;
        self.cache.validate()?;
        self.logger.validate()?;
        Ok(())
    }
}
