//! Cache manager that dispatches to the configured provider.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use docvault_core::config::CacheConfig;
use docvault_core::result::AppResult;
use docvault_core::traits::cache::CacheProvider;

use crate::memory::MemoryCacheProvider;

/// Provider used when caching is switched off: every lookup misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledCacheProvider;

#[async_trait]
impl CacheProvider for DisabledCacheProvider {
    async fn get(&self, _key: &str) -> AppResult<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str) -> AppResult<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> AppResult<()> {
        Ok(())
    }

    async fn delete_prefix(&self, _prefix: &str) -> AppResult<u64> {
        Ok(0)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn flush_all(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Cache manager that wraps the configured cache provider.
#[derive(Debug, Clone)]
pub struct CacheManager {
    inner: Arc<dyn CacheProvider>,
}

impl CacheManager {
    /// Create a new cache manager from configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let inner: Arc<dyn CacheProvider> = if config.enabled {
            info!(
                max_capacity = config.max_capacity,
                ttl_seconds = config.time_to_live_seconds,
                "Initializing in-memory listing cache"
            );
            Arc::new(MemoryCacheProvider::new(config))
        } else {
            info!("Listing cache disabled");
            Arc::new(DisabledCacheProvider)
        };

        Self { inner }
    }

    /// Create a cache manager from an existing provider (for testing).
    pub fn from_provider(provider: Arc<dyn CacheProvider>) -> Self {
        Self { inner: provider }
    }
}

#[async_trait]
impl CacheProvider for CacheManager {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.inner.delete(key).await
    }

    async fn delete_prefix(&self, prefix: &str) -> AppResult<u64> {
        self.inner.delete_prefix(prefix).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }

    async fn flush_all(&self) -> AppResult<()> {
        self.inner.flush_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_cache_always_misses() {
        let manager = CacheManager::new(&CacheConfig {
            enabled: false,
            ..CacheConfig::default()
        });
        manager.set("k", "v").await.unwrap();
        assert_eq!(manager.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_enabled_cache_hits() {
        let manager = CacheManager::new(&CacheConfig::default());
        manager.set("k", "v").await.unwrap();
        assert_eq!(manager.get("k").await.unwrap(), Some("v".to_string()));
    }
}
