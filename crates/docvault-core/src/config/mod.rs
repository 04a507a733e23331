//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! TOML files layered with environment variables. Each sub-module
//! represents a logical configuration section.

pub mod cache;
pub mod database;
pub mod logging;
pub mod storage;
pub mod upload;

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use self::cache::CacheConfig;
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::storage::{LocalStorageConfig, StorageConfig, UrlSigningConfig};
pub use self::upload::UploadConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Metadata store connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Listing cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Object store settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Upload batch settings.
    #[serde(default)]
    pub upload: UploadConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a base TOML file.
    ///
    /// Layers, lowest priority first: `path`, `config/{env}.toml` when
    /// `DOCVAULT_ENV` is set, then `DOCVAULT__SECTION__KEY` environment
    /// variables. Missing files are not an error.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(path).required(false));

        if let Ok(env) = std::env::var("DOCVAULT_ENV") {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{env}")).required(false));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("DOCVAULT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let app: AppConfig = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        app.upload.validate()?;
        Ok(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = AppConfig::load("does/not/exist").expect("defaults");
        assert_eq!(config.storage.provider, "local");
        assert_eq!(config.upload.progress_grace_ms, 1_500);
        assert!(config.cache.enabled);
    }
}
