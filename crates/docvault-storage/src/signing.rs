//! Signed, expiring read URLs.
//!
//! The signature is HMAC-SHA256 over `{key}|{expires}` keyed by the
//! configured secret, hex encoded.

use std::time::Duration;

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use docvault_core::config::UrlSigningConfig;
use docvault_core::error::AppError;
use docvault_core::result::AppResult;

type HmacSha256 = Hmac<Sha256>;

/// Mints and verifies `{base}/{key}?expires=..&signature=..` URLs.
#[derive(Debug, Clone)]
pub struct UrlSigner {
    base_url: String,
    secret: String,
}

impl UrlSigner {
    /// Create a signer from configuration.
    pub fn new(config: &UrlSigningConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            secret: config.secret.clone(),
        }
    }

    /// Sign `key` so that it can be read until `now + ttl`.
    pub fn sign(&self, key: &str, ttl: Duration) -> AppResult<String> {
        if ttl.is_zero() {
            return Err(AppError::validation("URL lifetime must be positive"));
        }
        let expires = Utc::now().timestamp() + ttl.as_secs().max(1) as i64;
        let signature = hex::encode(self.mac(key, expires)?.finalize().into_bytes());
        Ok(format!(
            "{}/{}?expires={}&signature={}",
            self.base_url, key, expires, signature
        ))
    }

    /// Check a signature produced by [`UrlSigner::sign`]. The comparison is
    /// constant time.
    pub fn verify(&self, key: &str, expires: i64, signature: &str) -> bool {
        if expires < Utc::now().timestamp() {
            return false;
        }
        let Ok(raw) = hex::decode(signature) else {
            return false;
        };
        match self.mac(key, expires) {
            Ok(mac) => mac.verify_slice(&raw).is_ok(),
            Err(_) => false,
        }
    }

    fn mac(&self, key: &str, expires: i64) -> AppResult<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| AppError::configuration(format!("Invalid signing secret: {e}")))?;
        mac.update(key.as_bytes());
        mac.update(b"|");
        mac.update(expires.to_string().as_bytes());
        Ok(mac)
    }
}
