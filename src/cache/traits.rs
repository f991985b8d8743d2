//! AppCache trait definition.

use serde_json::Value;

use crate::cache::{CacheError, QueryKey};

/// Storage behind the query cache.
///
/// Values are the raw payloads returned by the backend, so a hit decodes
/// exactly like a fresh response.
pub trait AppCache: Send + Sync {
    /// Get a value from the cache.
    fn get(&self, key: &QueryKey) -> Result<Option<Value>, CacheError>;

    /// Store a value, replacing any previous entry for the key.
    fn set(&self, key: QueryKey, value: Value) -> Result<(), CacheError>;

    /// Remove a value from the cache.
    fn remove(&self, key: &QueryKey) -> Result<(), CacheError>;

    /// Clear all values from the cache.
    fn clear(&self) -> Result<(), CacheError>;
}
