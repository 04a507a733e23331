//! Node store: cached listings and the in-memory folder index.

pub mod index;
pub mod service;

pub use index::FolderIndex;
pub use service::{FolderListing, NodeStore};
