use std::path::Path;

use image::RgbaImage;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{PosterError, PosterResult};
use crate::render::composite::{composite_in_place, over};

/// Straight-alpha RGBA8 raster target.
#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    image: RgbaImage,
}

impl Surface {
    /// New surface filled with `fill`.
    pub fn new(width: u32, height: u32, fill: Rgba8) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, image::Rgba(fill.to_array())),
        }
    }

    pub fn transparent(width: u32, height: u32) -> Self {
        Self::new(width, height, Rgba8::transparent())
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        (x < self.width() && y < self.height()).then(|| Rgba8::from_array(self.image.get_pixel(x, y).0))
    }

    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn to_image(&self) -> RgbaImage {
        self.image.clone()
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn fill(&mut self, color: Rgba8) {
        for px in self.image.pixels_mut() {
            px.0 = color.to_array();
        }
    }

    /// Source-over `bitmap` at `(x, y)`, using its alpha channel as the mask. Parts outside the
    /// surface are clipped.
    pub fn paste(&mut self, bitmap: &RgbaImage, x: i32, y: i32) {
        let (sw, sh) = (i64::from(self.width()), i64::from(self.height()));
        let (x, y) = (i64::from(x), i64::from(y));
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + i64::from(bitmap.width())).min(sw);
        let y1 = (y + i64::from(bitmap.height())).min(sh);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        for dy in y0..y1 {
            for dx in x0..x1 {
                let src = bitmap.get_pixel((dx - x) as u32, (dy - y) as u32).0;
                if src[3] == 0 {
                    continue;
                }
                let dst = self.image.get_pixel_mut(dx as u32, dy as u32);
                dst.0 = over(dst.0, src);
            }
        }
    }

    /// Composite an equal-sized surface onto this one with its alpha capped at `opacity`.
    pub fn composite(&mut self, src: &Surface, opacity: f32) -> PosterResult<()> {
        if src.width() != self.width() || src.height() != self.height() {
            return Err(PosterError::render(format!(
                "cannot composite a {}x{} surface onto a {}x{} surface",
                src.width(),
                src.height(),
                self.width(),
                self.height()
            )));
        }
        composite_in_place(&mut self.image, src.image.as_raw(), opacity)
    }

    /// Copy of the `[x1, x2) x [y1, y2)` box. The box must lie inside the surface.
    pub fn cropped(&self, x1: u32, y1: u32, x2: u32, y2: u32) -> PosterResult<Surface> {
        if x1 >= x2 || y1 >= y2 || x2 > self.width() || y2 > self.height() {
            return Err(PosterError::validation(format!(
                "crop box ({x1}, {y1}, {x2}, {y2}) is empty or outside the {}x{} surface",
                self.width(),
                self.height()
            )));
        }
        let view = image::imageops::crop_imm(&self.image, x1, y1, x2 - x1, y2 - y1);
        Ok(Self {
            image: view.to_image(),
        })
    }

    pub fn save_png(&self, path: &Path) -> PosterResult<()> {
        self.image
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| PosterError::render(format!("failed to write '{}': {e}", path.display())))
    }
}
