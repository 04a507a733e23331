//! # docvault-entity
//!
//! Domain models for DocVault. A single [`Node`](node::Node) type covers
//! both folders and files; the tree is kept as a flat set of records with
//! parent references. [`NodeRecord`](node::NodeRecord) is the persisted row
//! shape and derives `sqlx::FromRow`.

pub mod breadcrumb;
pub mod node;
pub mod tree;

pub use breadcrumb::Breadcrumb;
pub use node::{CreateNode, FlagCategory, KindFilter, Node, NodePatch, NodeRecord};
pub use tree::FolderTreeNode;
