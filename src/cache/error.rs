//! Cache error types.

use thiserror::Error;

/// Failures of the cache store itself. Callers treat any of these as a miss.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache store lock poisoned: {0}")]
    Poisoned(String),
}
