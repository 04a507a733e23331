//! Upload batch configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Limits and timing for batch uploads.
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum number of files accepted in one batch.
    #[serde(default = "default_max_batch_files")]
    #[validate(range(min = 1, max = 1000))]
    pub max_batch_files: usize,
    /// Maximum size of a single file in bytes (default 100 MB).
    #[serde(default = "default_max_file_size")]
    #[validate(range(min = 1))]
    pub max_file_size_bytes: u64,
    /// How long finished progress entries stay visible before they are
    /// cleared, in milliseconds.
    #[serde(default = "default_grace_ms")]
    #[validate(range(max = 60_000))]
    pub progress_grace_ms: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_batch_files: default_max_batch_files(),
            max_file_size_bytes: default_max_file_size(),
            progress_grace_ms: default_grace_ms(),
        }
    }
}

fn default_max_batch_files() -> usize {
    50
}

fn default_max_file_size() -> u64 {
    104_857_600 // 100 MB
}

fn default_grace_ms() -> u64 {
    1_500
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(UploadConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_batch_rejected() {
        let config = UploadConfig {
            max_batch_files: 0,
            ..UploadConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
