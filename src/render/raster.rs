//! Primitive rasterisation through `vello_cpu`.
//!
//! Every primitive is rendered into its own element-sized bitmap which the caller then pastes
//! onto a [`crate::render::surface::Surface`].

use image::RgbaImage;
use vello_cpu::kurbo::Shape as _;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{PosterError, PosterResult};
use crate::render::composite::unpremultiply_in_place;

const PATH_TOLERANCE: f64 = 0.1;

/// Geometry of a filled/stroked shape, in bitmap-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShapeGeometry {
    Rect { radius: f64 },
    Ellipse,
}

/// Render `draw` into a fresh `width x height` straight-alpha bitmap.
pub fn rasterize(
    width: u32,
    height: u32,
    draw: impl FnOnce(&mut vello_cpu::RenderContext),
) -> PosterResult<RgbaImage> {
    if width == 0 || height == 0 {
        return Ok(RgbaImage::new(width, height));
    }
    let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(PosterError::render(format!(
            "bitmap {width}x{height} exceeds the rasteriser limit of {}",
            u16::MAX
        )));
    };

    let mut ctx = vello_cpu::RenderContext::new(w, h);
    draw(&mut ctx);
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);

    let mut data = pixmap.data_as_u8_slice().to_vec();
    unpremultiply_in_place(&mut data);
    RgbaImage::from_raw(width, height, data)
        .ok_or_else(|| PosterError::render("rasteriser returned a short pixel buffer"))
}

pub fn paint(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn shape_path(geometry: ShapeGeometry, rect: vello_cpu::kurbo::Rect) -> vello_cpu::kurbo::BezPath {
    match geometry {
        ShapeGeometry::Rect { radius } if radius > 0.0 => {
            let max_r = rect.width().min(rect.height()) / 2.0;
            vello_cpu::kurbo::RoundedRect::from_rect(rect, radius.min(max_r).max(0.0))
                .to_path(PATH_TOLERANCE)
        }
        ShapeGeometry::Rect { .. } => rect.to_path(PATH_TOLERANCE),
        ShapeGeometry::Ellipse => vello_cpu::kurbo::Ellipse::from_rect(rect).to_path(PATH_TOLERANCE),
    }
}

/// Rasterise one shape pass. `fill` paints the full box; `outline` is stroked inside the box
/// (the stroke is inset by half its width so it never leaves the bitmap).
pub fn shape_bitmap(
    geometry: ShapeGeometry,
    width: u32,
    height: u32,
    fill: Option<Rgba8>,
    outline: Option<(Rgba8, f64)>,
) -> PosterResult<RgbaImage> {
    let (w, h) = (f64::from(width), f64::from(height));
    rasterize(width, height, |ctx| {
        if let Some(color) = fill {
            ctx.set_paint(paint(color));
            ctx.fill_path(&shape_path(
                geometry,
                vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h),
            ));
        }
        if let Some((color, stroke_w)) = outline.filter(|(_, sw)| *sw > 0.0) {
            let half = (stroke_w / 2.0).min(w / 2.0).min(h / 2.0);
            let inset = vello_cpu::kurbo::Rect::new(half, half, w - half, h - half);
            let geometry = match geometry {
                ShapeGeometry::Rect { radius } => ShapeGeometry::Rect {
                    radius: (radius - half).max(0.0),
                },
                other => other,
            };
            ctx.set_paint(paint(color));
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(stroke_w));
            ctx.stroke_path(&shape_path(geometry, inset));
        }
    })
}
