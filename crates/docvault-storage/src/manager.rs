//! Builds the configured object store.

use std::sync::Arc;

use tracing::info;

use docvault_core::config::StorageConfig;
use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::storage::StorageProvider;

use crate::providers::{LocalStorageProvider, MemoryStorageProvider};
use crate::signing::UrlSigner;

/// Instantiate the provider named by `config.provider`.
pub async fn build_provider(config: &StorageConfig) -> AppResult<Arc<dyn StorageProvider>> {
    let signer = UrlSigner::new(&config.signing);

    let provider: Arc<dyn StorageProvider> = match config.provider.as_str() {
        "local" => {
            info!(root = %config.local.root_path, "Using local object store");
            Arc::new(LocalStorageProvider::new(&config.local.root_path, signer).await?)
        }
        "memory" => {
            info!("Using in-memory object store");
            Arc::new(MemoryStorageProvider::new(signer))
        }
        other => {
            return Err(AppError::configuration(format!(
                "Unknown storage provider '{other}' (expected 'local' or 'memory')"
            )));
        }
    };

    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_memory_provider() {
        let config = StorageConfig {
            provider: "memory".to_string(),
            ..StorageConfig::default()
        };
        let provider = build_provider(&config).await.unwrap();
        assert_eq!(provider.provider_type(), "memory");
    }

    #[tokio::test]
    async fn test_unknown_provider_is_config_error() {
        let config = StorageConfig {
            provider: "s3".to_string(),
            ..StorageConfig::default()
        };
        let err = build_provider(&config).await.unwrap_err();
        assert!(err.is(docvault_core::error::ErrorKind::Configuration));
    }
}
