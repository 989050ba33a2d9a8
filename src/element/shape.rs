use crate::element::{Drawable, ElementKind};
use crate::foundation::core::Rgba8;
use crate::foundation::error::PosterResult;
use crate::render::raster::{ShapeGeometry, shape_bitmap};
use crate::render::{BlendSettings, Surface, draw_pass};

pub const DEFAULT_OUTLINE_WIDTH: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeStyle {
    pub fill: Option<Rgba8>,
    pub outline: Option<Rgba8>,
    pub outline_width: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: None,
            outline: None,
            outline_width: DEFAULT_OUTLINE_WIDTH,
        }
    }
}

impl ShapeStyle {
    pub fn set_outline(&mut self, color: Option<Rgba8>, width: Option<f64>) {
        if let Some(c) = color {
            self.outline = Some(c);
        }
        if let Some(w) = width {
            self.outline_width = w.max(0.0);
        }
    }

    fn stroke(&self) -> Option<(Rgba8, f64)> {
        self.outline
            .filter(|_| self.outline_width > 0.0)
            .map(|c| (c, self.outline_width))
    }

    fn fill_translucent(&self) -> bool {
        self.fill.is_some_and(Rgba8::is_translucent)
    }

    fn outline_translucent(&self) -> bool {
        self.stroke().is_some_and(|(c, _)| c.is_translucent())
    }

    pub fn is_translucent(&self) -> bool {
        self.fill_translucent() || self.outline_translucent()
    }
}

/// Fill and outline a shape at `pos`.
///
/// With a translucent colour and an outline, fill and outline are separate passes so the
/// outline composites over the filled interior instead of replacing it.
fn draw_shape(
    geometry: ShapeGeometry,
    pos: (i32, i32),
    (w, h): (u32, u32),
    style: &ShapeStyle,
    target: &mut Surface,
    blend: BlendSettings,
) -> PosterResult<()> {
    let stroke = style.stroke();
    let (x, y) = pos;

    if stroke.is_some() && style.is_translucent() {
        if let Some(fill) = style.fill {
            let bmp = shape_bitmap(geometry, w, h, Some(fill), None)?;
            draw_pass(target, blend, fill.is_translucent(), |s| {
                s.paste(&bmp, x, y);
                Ok(())
            })?;
        }
        let bmp = shape_bitmap(geometry, w, h, None, stroke)?;
        return draw_pass(target, blend, style.outline_translucent(), |s| {
            s.paste(&bmp, x, y);
            Ok(())
        });
    }

    if style.fill.is_none() && stroke.is_none() {
        return Ok(());
    }
    let bmp = shape_bitmap(geometry, w, h, style.fill, stroke)?;
    draw_pass(target, blend, style.is_translucent(), |s| {
        s.paste(&bmp, x, y);
        Ok(())
    })
}

#[derive(Clone, Debug, PartialEq)]
pub struct RectangleElement {
    position: (i32, i32),
    pub width: u32,
    pub height: u32,
    pub style: ShapeStyle,
    pub border_radius: f64,
}

impl RectangleElement {
    pub fn new(width: u32, height: u32, style: ShapeStyle) -> Self {
        Self {
            position: (0, 0),
            width,
            height,
            style,
            border_radius: 0.0,
        }
    }

    pub fn with_border_radius(mut self, radius: f64) -> Self {
        self.border_radius = radius.max(0.0);
        self
    }
}

impl Drawable for RectangleElement {
    fn kind(&self) -> ElementKind {
        ElementKind::Rectangle
    }

    fn position(&self) -> (i32, i32) {
        self.position
    }

    fn set_position(&mut self, x: i32, y: i32) {
        self.position = (x, y);
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn is_ready(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    fn has_translucency(&self) -> bool {
        self.style.is_translucent()
    }

    fn draw(&self, target: &mut Surface, blend: BlendSettings) -> PosterResult<()> {
        draw_shape(
            ShapeGeometry::Rect {
                radius: self.border_radius,
            },
            self.position,
            self.size(),
            &self.style,
            target,
            blend,
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EllipseElement {
    position: (i32, i32),
    pub width: u32,
    pub height: u32,
    pub style: ShapeStyle,
}

impl EllipseElement {
    pub fn new(width: u32, height: u32, style: ShapeStyle) -> Self {
        Self {
            position: (0, 0),
            width,
            height,
            style,
        }
    }

    /// Circle of the given radius, i.e. a `2r x 2r` ellipse.
    pub fn circle(radius: u32, style: ShapeStyle) -> Self {
        let d = radius.saturating_mul(2);
        Self::new(d, d, style)
    }
}

impl Drawable for EllipseElement {
    fn kind(&self) -> ElementKind {
        ElementKind::Ellipse
    }

    fn position(&self) -> (i32, i32) {
        self.position
    }

    fn set_position(&mut self, x: i32, y: i32) {
        self.position = (x, y);
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn is_ready(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    fn has_translucency(&self) -> bool {
        self.style.is_translucent()
    }

    fn draw(&self, target: &mut Surface, blend: BlendSettings) -> PosterResult<()> {
        draw_shape(
            ShapeGeometry::Ellipse,
            self.position,
            self.size(),
            &self.style,
            target,
            blend,
        )
    }
}
