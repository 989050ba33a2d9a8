#![forbid(unsafe_code)]

//! Declarative poster rendering: a canvas registry of layered elements, dependency-ordered
//! positioning, a document loader with variable substitution, and a CPU compositor.

pub mod canvas;
pub mod context;
pub mod element;
pub mod foundation;
pub mod layout;
pub mod load;
pub mod registry;
pub mod render;
pub mod text;
pub mod value;

pub use canvas::{Canvas, CanvasSettings, ElementQuery, Layer, LayerSettings};
pub use context::PosterContext;
pub use element::{
    Drawable, Element, ElementKind, EllipseElement, ImageElement, RectangleElement, ShapeStyle,
    StyleDelta, TextElement, TextStyle,
};
pub use foundation::core::Rgba8;
pub use foundation::error::{PosterError, PosterResult};
pub use layout::PositionSpec;
pub use load::{Loader, PosterSpec, Variables};
pub use registry::{
    BuildContext, ElementFactory, OperationContext, OperationRegistry, OperationSpec, Registry,
};
pub use render::{BlendSettings, Surface};
pub use text::{FontBook, FontFace, TextAlign, WrapStyle};
pub use value::{ParamMap, ParamValue, Params};
