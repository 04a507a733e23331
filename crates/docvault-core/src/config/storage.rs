//! Object store configuration.

use serde::{Deserialize, Serialize};

/// Top-level object store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Provider to use: `"local"` or `"memory"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Local filesystem storage configuration.
    #[serde(default)]
    pub local: LocalStorageConfig,
    /// Signing settings for temporary read URLs.
    #[serde(default)]
    pub signing: UrlSigningConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            local: LocalStorageConfig::default(),
            signing: UrlSigningConfig::default(),
        }
    }
}

/// Local filesystem storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalStorageConfig {
    /// Root path for blob files.
    #[serde(default = "default_local_root")]
    pub root_path: String,
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_local_root(),
        }
    }
}

/// Settings used to mint temporary read URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlSigningConfig {
    /// Base URL that serves blobs, e.g. `https://files.example.com/blobs`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Shared secret mixed into every URL signature.
    #[serde(default = "default_secret")]
    pub secret: String,
    /// TTL used when the caller does not pass one.
    #[serde(default = "default_ttl")]
    pub default_ttl_seconds: u64,
}

impl Default for UrlSigningConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            secret: default_secret(),
            default_ttl_seconds: default_ttl(),
        }
    }
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_local_root() -> String {
    "./data/blobs".to_string()
}

fn default_base_url() -> String {
    "http://localhost:8080/blobs".to_string()
}

fn default_secret() -> String {
    "change-me".to_string()
}

fn default_ttl() -> u64 {
    3600
}
