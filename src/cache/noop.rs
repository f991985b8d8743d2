//! NoOp cache implementation.
//!
//! Used when caching is disabled: every read goes to the backend.

use serde_json::Value;

use crate::cache::{AppCache, CacheError, QueryKey};

/// A no-operation cache that doesn't store anything.
pub struct NoOpCache;

impl AppCache for NoOpCache {
    fn get(&self, _key: &QueryKey) -> Result<Option<Value>, CacheError> {
        Ok(None)
    }

    fn set(&self, _key: QueryKey, _value: Value) -> Result<(), CacheError> {
        Ok(())
    }

    fn remove(&self, _key: &QueryKey) -> Result<(), CacheError> {
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        Ok(())
    }
}
