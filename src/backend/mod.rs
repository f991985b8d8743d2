//! Remote store access.
//!
//! Every accessor goes through a [`Backend`]: it receives a declarative
//! [`Query`] and answers with a `{data, error}` pair. The production
//! implementation speaks PostgREST over HTTP; [`InMemoryBackend`] keeps rows
//! in process for tests and offline use.

mod memory;
mod query;
mod response;
mod rest;

pub use memory::{InMemoryBackend, SINGLE_ROW_VIOLATION};
pub use query::{Filter, Operation, Query};
pub use response::{BackendFailure, BackendResponse};
pub use rest::RestBackend;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::settings::BackendConfig;
use crate::error::{AppError, AppResult};

/// A handle to the remote store.
///
/// Implementations never return a Rust error: transport failures, HTTP
/// errors and undecodable bodies are all reported through
/// [`BackendResponse::error`].
#[async_trait]
pub trait Backend: Send + Sync {
    async fn execute(&self, query: Query) -> BackendResponse;

    /// Short name for logging.
    fn name(&self) -> &'static str;
}

/// Build the process-wide backend handle from configuration.
///
/// Fails fast when the endpoint or API key is missing or malformed instead of
/// producing a client that cannot reach anything.
pub fn init_backend(config: &BackendConfig) -> AppResult<Arc<dyn Backend>> {
    config.validate().map_err(|e| AppError::Configuration {
        key: "backend".to_string(),
        source: e.into(),
    })?;
    let backend = RestBackend::new(config)?;
    tracing::info!(url = %config.url, "backend client initialized");
    Ok(Arc::new(backend))
}
