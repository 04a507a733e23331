//! In-memory cache implementation using the moka crate.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use docvault_core::config::CacheConfig;
use docvault_core::result::AppResult;
use docvault_core::traits::cache::CacheProvider;

/// In-memory cache provider using moka.
#[derive(Debug, Clone)]
pub struct MemoryCacheProvider {
    cache: Cache<String, String>,
}

impl MemoryCacheProvider {
    /// Create a new in-memory cache from configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(Duration::from_secs(config.time_to_live_seconds))
            .build();

        Self { cache }
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.cache.get(key).await)
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.cache.insert(key.to_string(), value.to_string()).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.cache.invalidate(key).await;
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> AppResult<u64> {
        // Moka has no prefix scan, so collect matching keys first.
        let keys_to_remove: Vec<String> = self
            .cache
            .iter()
            .filter(|entry| entry.0.starts_with(prefix))
            .map(|entry| entry.0.to_string())
            .collect();

        let count = keys_to_remove.len() as u64;
        for key in keys_to_remove {
            self.cache.invalidate(&key).await;
        }

        debug!(prefix, count, "Invalidated cached listings");
        Ok(count)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn flush_all(&self) -> AppResult<()> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_provider() -> MemoryCacheProvider {
        let config = CacheConfig {
            enabled: true,
            max_capacity: 100,
            time_to_live_seconds: 60,
        };
        MemoryCacheProvider::new(&config)
    }

    #[tokio::test]
    async fn test_set_get() {
        let provider = make_provider();
        provider.set("key1", "value1").await.unwrap();
        let val = provider.get("key1").await.unwrap();
        assert_eq!(val, Some("value1".to_string()));
    }

    #[tokio::test]
    async fn test_delete() {
        let provider = make_provider();
        provider.set("key2", "value2").await.unwrap();
        provider.delete("key2").await.unwrap();
        assert_eq!(provider.get("key2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_prefix_leaves_other_keys() {
        let provider = make_provider();
        provider.set("docvault:list:a", "1").await.unwrap();
        provider.set("docvault:list:b", "2").await.unwrap();
        provider.set("other", "3").await.unwrap();

        let removed = provider.delete_prefix("docvault:list:").await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(provider.get("docvault:list:a").await.unwrap(), None);
        assert_eq!(provider.get("other").await.unwrap(), Some("3".to_string()));
    }

    #[tokio::test]
    async fn test_json_roundtrip() {
        let provider = make_provider();
        let data = serde_json::json!({"name": "Projects", "children": 3});
        provider.set_json("json_key", &data).await.unwrap();
        let result: Option<serde_json::Value> = provider.get_json("json_key").await.unwrap();
        assert_eq!(result, Some(data));
    }
}
