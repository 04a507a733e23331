//! # docvault-cache
//!
//! Read-through cache for node listings. Two modes:
//!
//! - **memory**: in-process cache using [moka](https://crates.io/crates/moka)
//! - **disabled**: every lookup misses, every read goes to the metadata store
//!
//! The mode is selected at runtime from [`CacheConfig`](docvault_core::config::CacheConfig).

pub mod keys;
pub mod memory;
pub mod provider;

pub use memory::MemoryCacheProvider;
pub use provider::{CacheManager, DisabledCacheProvider};
