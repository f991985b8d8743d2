//! Process-wide state: one backend handle, one query cache, and the
//! repositories built over them.

use std::sync::Arc;

use crate::backend::{Backend, init_backend};
use crate::cache::QueryCache;
use crate::config::settings::{CacheConfig, Settings};
use crate::error::AppResult;
use crate::repositories::Repositories;

/// Application state shared by every caller.
///
/// Cloning is cheap: the backend and cache are behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn Backend>,
    pub cache: QueryCache,
    pub repositories: Repositories,
}

impl AppState {
    /// Build the state from validated settings, constructing the REST
    /// backend once.
    pub fn from_settings(settings: &Settings) -> AppResult<Self> {
        let backend = init_backend(&settings.backend)?;
        Ok(Self::new(backend, settings.cache.clone()))
    }

    /// Build the state over an existing backend, e.g. an in-memory one.
    pub fn new(backend: Arc<dyn Backend>, cache_config: CacheConfig) -> Self {
        let cache = QueryCache::new(cache_config);
        let repositories = Repositories::new(backend.clone(), cache.clone());
        Self {
            backend,
            cache,
            repositories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;
    use crate::config::settings::BackendConfig;
    use crate::error::AppError;
    use crate::models::{NewCustomer, Table};

    #[test]
    fn test_from_settings_fails_fast_without_backend() {
        let settings = Settings::default();
        let err = AppState::from_settings(&settings).err().unwrap();
        assert!(matches!(err, AppError::Configuration { ref key, .. } if key == "backend"));
    }

    #[test]
    fn test_from_settings_builds_rest_backend() {
        let settings = Settings {
            backend: BackendConfig {
                url: "https://abc.supabase.co".into(),
                api_key: "anon".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        let state = AppState::from_settings(&settings).unwrap();
        assert_eq!(state.backend.name(), "rest");
    }

    #[tokio::test]
    async fn test_repositories_share_one_cache() {
        let state = AppState::new(Arc::new(InMemoryBackend::new()), CacheConfig::default());
        state.repositories.customers.list().await.unwrap();
        assert!(state.cache.contains(&crate::cache::QueryKey::List(Table::Customers)));

        state
            .repositories
            .customers
            .add(NewCustomer {
                name: "Ann".into(),
                address: "1 Main".into(),
                phone: "555".into(),
                email: None,
            })
            .await
            .unwrap();
        assert!(!state.cache.contains(&crate::cache::QueryKey::List(Table::Customers)));
    }
}
