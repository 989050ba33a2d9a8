//! Position specs and their dependency-ordered resolution.

pub mod position;
pub mod resolver;

pub use position::{PositionSpec, align_position};
pub use resolver::resolve;
