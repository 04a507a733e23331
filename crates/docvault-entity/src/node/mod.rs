//! Node domain entities.

pub mod flag;
pub mod model;
pub mod ordering;
pub mod record;

pub use flag::FlagCategory;
pub use model::{CreateNode, KindFilter, Node, NodePatch};
pub use ordering::{listing_order, sort_listing};
pub use record::NodeRecord;
