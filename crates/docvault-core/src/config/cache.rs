//! Listing cache configuration.

use serde::{Deserialize, Serialize};

/// In-memory listing cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether listings are cached at all. When disabled every read goes
    /// to the metadata store.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Maximum number of cached listings.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
    /// TTL for cached listings in seconds.
    #[serde(default = "default_ttl")]
    pub time_to_live_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_capacity: default_max_capacity(),
            time_to_live_seconds: default_ttl(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_max_capacity() -> u64 {
    1_000
}

fn default_ttl() -> u64 {
    60
}
