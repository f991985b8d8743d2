//! Query cache that dispatches to the configured store.

use std::sync::Arc;

use serde_json::Value;

use crate::cache::memory::MemoryCache;
use crate::cache::noop::NoOpCache;
use crate::cache::{AppCache, QueryKey};
use crate::config::settings::CacheConfig;
use crate::models::Table;

/// Transient cache of read results.
///
/// A failing store never fails a read: errors are logged and treated as a
/// miss. Cloning shares the same store.
#[derive(Clone)]
pub struct QueryCache {
    store: Arc<dyn AppCache>,
    config: CacheConfig,
}

impl QueryCache {
    /// Create a query cache with the given configuration.
    ///
    /// If caching is disabled, a NoOpCache is used.
    pub fn new(config: CacheConfig) -> Self {
        let store: Arc<dyn AppCache> = if config.enabled {
            Arc::new(MemoryCache::new(&config))
        } else {
            Arc::new(NoOpCache)
        };
        Self { store, config }
    }

    pub fn disabled() -> Self {
        Self::new(CacheConfig {
            enabled: false,
            ..Default::default()
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn get(&self, key: &QueryKey) -> Option<Value> {
        match self.store.get(key) {
            Ok(hit) => {
                if hit.is_some() {
                    tracing::trace!(%key, "cache hit");
                }
                hit
            }
            Err(e) => {
                tracing::warn!(%key, error = %e, "cache read failed");
                None
            }
        }
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.get(key).is_some()
    }

    pub fn put(&self, key: QueryKey, value: Value) {
        if let Err(e) = self.store.set(key, value) {
            tracing::warn!(%key, error = %e, "cache write failed");
        }
    }

    /// Mark the table's list as stale so the next list read refetches.
    ///
    /// Row entries for the table are left alone; a row read after a
    /// mutation can return the previous value until it expires or is
    /// refreshed.
    pub fn invalidate(&self, table: Table) {
        let key = QueryKey::List(table);
        match self.store.remove(&key) {
            Ok(()) => tracing::debug!(%key, "invalidated"),
            Err(e) => tracing::warn!(%key, error = %e, "cache invalidation failed"),
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "cache clear failed");
        }
    }
}
