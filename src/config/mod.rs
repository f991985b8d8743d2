//! Configuration management module for repair-estimates
//!
//! # Configuration Priority (lowest to highest)
//! 1. `default.toml` - Base default configuration
//! 2. `{environment}.toml` - Environment-specific configuration
//! 3. `local.toml` - Local overrides (not committed to version control)
//! 4. `ESTIMATES_*` environment variables
//!
//! The two values the process cannot run without are the backend URL and API
//! key, usually supplied as `ESTIMATES_BACKEND__URL` and
//! `ESTIMATES_BACKEND__API_KEY`.

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{BackendConfig, CacheConfig, LoggerSettings, Settings};

/// Serializes tests that read or write process environment variables.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
