//! CPU raster surface and the layer compositor.

pub mod composite;
pub mod raster;
pub mod renderer;
pub mod surface;

pub use renderer::{BlendSettings, draw_pass, render};
pub use surface::Surface;
