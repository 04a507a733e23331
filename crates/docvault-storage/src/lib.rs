//! # docvault-storage
//!
//! Object store providers for DocVault. Blobs live on the local filesystem
//! or, for tests and dry runs, in process memory. Temporary read URLs are
//! signed with HMAC-SHA256 over a shared secret.

pub mod key;
pub mod manager;
pub mod providers;
pub mod signing;

pub use key::{generate_storage_key, key_timestamp};
pub use manager::build_provider;
pub use signing::UrlSigner;
