//! Provider traits defined in `docvault-core` and implemented by other crates.

pub mod cache;
pub mod storage;

pub use cache::CacheProvider;
pub use storage::{RemovalFailure, RemovalReport, StorageProvider};
