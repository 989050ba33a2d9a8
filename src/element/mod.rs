//! Drawable element model.
//!
//! [`Element`] is a closed sum over the supported element kinds; shared behaviour goes through
//! the [`Drawable`] capability trait.

pub mod image;
pub mod shape;
pub mod text;

use std::fmt;
use std::sync::Arc;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{PosterError, PosterResult};
use crate::render::{BlendSettings, Surface};
use crate::text::FontFace;

pub use self::image::ImageElement;
pub use self::shape::{EllipseElement, RectangleElement, ShapeStyle};
pub use self::text::{TextElement, TextStyle};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    Text,
    Image,
    Rectangle,
    Ellipse,
}

impl ElementKind {
    pub const ALL: [ElementKind; 4] = [Self::Text, Self::Image, Self::Rectangle, Self::Ellipse];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Rectangle => "rectangle",
            Self::Ellipse => "ellipse",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capabilities every element exposes to the canvas, the resolver and the renderer.
pub trait Drawable {
    fn kind(&self) -> ElementKind;

    /// Top-left corner in canvas pixels.
    fn position(&self) -> (i32, i32);

    fn set_position(&mut self, x: i32, y: i32);

    fn size(&self) -> (u32, u32);

    /// `false` when the element lacks what it needs to draw (no font, no content, no pixels).
    fn is_ready(&self) -> bool;

    /// Any colour or pixel with alpha below 255.
    fn has_translucency(&self) -> bool;

    fn draw(&self, target: &mut Surface, blend: BlendSettings) -> PosterResult<()>;

    /// Inclusive axis-aligned bounding-box test against `[x1, x2] x [y1, y2]`.
    fn overlaps_region(&self, x1: f64, y1: f64, x2: f64, y2: f64) -> bool {
        let (x, y) = self.position();
        let (w, h) = self.size();
        let (x, y) = (f64::from(x), f64::from(y));
        !(x2 < x || x1 > x + f64::from(w) || y2 < y || y1 > y + f64::from(h))
    }

    fn overlaps_at(&self, x: f64, y: f64) -> bool {
        self.overlaps_region(x, y, x, y)
    }

    fn translate(&mut self, dx: i32, dy: i32) {
        let (x, y) = self.position();
        self.set_position(x.saturating_add(dx), y.saturating_add(dy));
    }
}

#[derive(Clone, Debug)]
pub enum Element {
    Text(TextElement),
    Image(ImageElement),
    Rectangle(RectangleElement),
    Ellipse(EllipseElement),
}

macro_rules! dispatch {
    ($self:expr, $e:ident => $body:expr) => {
        match $self {
            Element::Text($e) => $body,
            Element::Image($e) => $body,
            Element::Rectangle($e) => $body,
            Element::Ellipse($e) => $body,
        }
    };
}

impl Drawable for Element {
    fn kind(&self) -> ElementKind {
        dispatch!(self, e => e.kind())
    }

    fn position(&self) -> (i32, i32) {
        dispatch!(self, e => e.position())
    }

    fn set_position(&mut self, x: i32, y: i32) {
        dispatch!(self, e => e.set_position(x, y))
    }

    fn size(&self) -> (u32, u32) {
        dispatch!(self, e => e.size())
    }

    fn is_ready(&self) -> bool {
        dispatch!(self, e => e.is_ready())
    }

    fn has_translucency(&self) -> bool {
        dispatch!(self, e => e.has_translucency())
    }

    fn draw(&self, target: &mut Surface, blend: BlendSettings) -> PosterResult<()> {
        dispatch!(self, e => e.draw(target, blend))
    }
}

/// Style change computed by an operation, applied by the element it was computed for.
#[derive(Clone, Debug)]
pub enum StyleDelta {
    Pixels(::image::RgbaImage),
    Fill(Rgba8),
    Outline {
        color: Option<Rgba8>,
        width: Option<f64>,
    },
    Content(String),
    Font {
        face: Option<Arc<FontFace>>,
        family: Option<String>,
        size: Option<f32>,
    },
    Translate {
        dx: i32,
        dy: i32,
    },
}

impl Element {
    pub fn as_text(&self) -> Option<&TextElement> {
        match self {
            Self::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageElement> {
        match self {
            Self::Image(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_rectangle(&self) -> Option<&RectangleElement> {
        match self {
            Self::Rectangle(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_ellipse(&self) -> Option<&EllipseElement> {
        match self {
            Self::Ellipse(e) => Some(e),
            _ => None,
        }
    }

    pub fn apply_delta(&mut self, delta: StyleDelta) -> PosterResult<()> {
        let kind = self.kind();
        match (self, delta) {
            (this, StyleDelta::Translate { dx, dy }) => this.translate(dx, dy),
            (Self::Image(img), StyleDelta::Pixels(pixels)) => img.set_pixels(pixels),
            (Self::Text(t), StyleDelta::Fill(c)) => t.set_fill(c),
            (Self::Rectangle(r), StyleDelta::Fill(c)) => r.style.fill = Some(c),
            (Self::Ellipse(e), StyleDelta::Fill(c)) => e.style.fill = Some(c),
            (Self::Rectangle(r), StyleDelta::Outline { color, width }) => {
                r.style.set_outline(color, width)
            }
            (Self::Ellipse(e), StyleDelta::Outline { color, width }) => {
                e.style.set_outline(color, width)
            }
            (Self::Text(t), StyleDelta::Content(s)) => t.set_content(s)?,
            (Self::Text(t), StyleDelta::Font { face, family, size }) => {
                t.set_font(face, family, size)?
            }
            (_, delta) => {
                return Err(PosterError::validation(format!(
                    "cannot apply {delta:?} to a {kind} element"
                )));
            }
        }
        Ok(())
    }
}

impl From<TextElement> for Element {
    fn from(e: TextElement) -> Self {
        Self::Text(e)
    }
}

impl From<ImageElement> for Element {
    fn from(e: ImageElement) -> Self {
        Self::Image(e)
    }
}

impl From<RectangleElement> for Element {
    fn from(e: RectangleElement) -> Self {
        Self::Rectangle(e)
    }
}

impl From<EllipseElement> for Element {
    fn from(e: EllipseElement) -> Self {
        Self::Ellipse(e)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/element/mod.rs"]
mod tests;
