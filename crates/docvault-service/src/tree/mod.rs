//! Pure tree logic: move validation and breadcrumb resolution.

pub mod breadcrumb;
pub mod validator;

pub use breadcrumb::resolve_breadcrumbs;
pub use validator::{MoveRejection, validate_move};
