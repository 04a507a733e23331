//! Housekeeping jobs.

pub mod orphans;

pub use orphans::{OrphanSweeper, SweepReport};
