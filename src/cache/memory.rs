//! Memory cache implementation using cached::TimedSizedCache.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use cached::{Cached, TimedSizedCache};
use serde_json::Value;

use crate::cache::{AppCache, CacheError, QueryKey};
use crate::config::settings::CacheConfig;

/// In-memory cache with size limit and TTL.
pub struct MemoryCache {
    store: Mutex<TimedSizedCache<QueryKey, Value>>,
}

impl MemoryCache {
    /// A `max_size` of zero is treated as one entry; the store cannot be
    /// built with no capacity.
    pub fn new(config: &CacheConfig) -> Self {
        let store = TimedSizedCache::with_size_and_lifespan(
            config.max_size.max(1),
            Duration::from_secs(config.ttl_seconds),
        );
        Self {
            store: Mutex::new(store),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, TimedSizedCache<QueryKey, Value>>, CacheError> {
        self.store
            .lock()
            .map_err(|e| CacheError::Poisoned(e.to_string()))
    }
}

impl AppCache for MemoryCache {
    fn get(&self, key: &QueryKey) -> Result<Option<Value>, CacheError> {
        let mut store = self.lock()?;
        Ok(store.cache_get(key).cloned())
    }

    fn set(&self, key: QueryKey, value: Value) -> Result<(), CacheError> {
        let mut store = self.lock()?;
        store.cache_set(key, value);
        Ok(())
    }

    fn remove(&self, key: &QueryKey) -> Result<(), CacheError> {
        let mut store = self.lock()?;
        store.cache_remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        let mut store = self.lock()?;
        store.cache_clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Table;
    use serde_json::json;

    #[test]
    fn test_zero_max_size_still_builds() {
        let config = CacheConfig {
            max_size: 0,
            ..CacheConfig::default()
        };
        let cache = MemoryCache::new(&config);

        cache.set(QueryKey::List(Table::Users), json!([])).unwrap();
        assert_eq!(cache.get(&QueryKey::List(Table::Users)).unwrap(), Some(json!([])));

        // Capacity of one: the next entry evicts the first
        cache.set(QueryKey::Row(Table::Users, 1), json!({"id": 1})).unwrap();
        assert!(cache.get(&QueryKey::List(Table::Users)).unwrap().is_none());
    }

    #[test]
    fn test_remove_and_clear() {
        let cache = MemoryCache::new(&CacheConfig::default());
        cache.set(QueryKey::List(Table::Customers), json!([1])).unwrap();
        cache.set(QueryKey::Row(Table::Customers, 1), json!({"id": 1})).unwrap();

        cache.remove(&QueryKey::List(Table::Customers)).unwrap();
        assert!(cache.get(&QueryKey::List(Table::Customers)).unwrap().is_none());
        assert!(cache.get(&QueryKey::Row(Table::Customers, 1)).unwrap().is_some());

        cache.clear().unwrap();
        assert!(cache.get(&QueryKey::Row(Table::Customers, 1)).unwrap().is_none());
    }
}
