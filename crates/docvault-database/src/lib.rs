//! # docvault-database
//!
//! Metadata store access for DocVault. The [`NodeRepository`] trait is the
//! collaborator contract the service layer consumes; [`PgNodeRepository`]
//! backs it with PostgreSQL and [`MemoryNodeRepository`] keeps everything
//! in process.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::{MemoryNodeRepository, NodeRepository, PgNodeRepository};
