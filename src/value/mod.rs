//! Value normalizers: loosely typed config values to canonical colors and points.

pub mod color;
pub mod params;
pub mod point;

pub use color::parse_color;
pub use params::{MAX_DIMENSION, ParamMap, ParamValue, Params};
pub use point::{PartialPoint, parse_axis, parse_point, parse_point_with_keys};
