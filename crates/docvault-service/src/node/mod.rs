//! Node mutations and their reports.

pub mod report;
pub mod service;

pub use report::{DeleteReport, MoveOutcome, PartialDeleteWarning};
pub use service::NodeService;
