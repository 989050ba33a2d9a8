use std::path::{Path, PathBuf};

use ::image::RgbaImage;
use ::image::imageops::FilterType;

use crate::element::{Drawable, ElementKind};
use crate::foundation::error::{PosterError, PosterResult};
use crate::render::{BlendSettings, Surface, draw_pass};

/// Decoded bitmap pasted with its own alpha channel as the mask.
#[derive(Clone, Debug)]
pub struct ImageElement {
    position: (i32, i32),
    pixels: RgbaImage,
    source: Option<PathBuf>,
    has_alpha: bool,
    loaded: bool,
}

impl ImageElement {
    /// Placeholder with no pixels; never ready.
    pub fn empty() -> Self {
        Self {
            position: (0, 0),
            pixels: RgbaImage::new(0, 0),
            source: None,
            has_alpha: false,
            loaded: false,
        }
    }

    pub fn from_rgba(pixels: RgbaImage) -> Self {
        let mut out = Self::empty();
        out.set_pixels(pixels);
        out
    }

    /// Decode `path` and optionally resize it (see [`ImageElement::resize`]).
    pub fn open(path: impl AsRef<Path>, width: Option<u32>, height: Option<u32>) -> PosterResult<Self> {
        let path = path.as_ref();
        let decoded = ::image::open(path).map_err(|e| {
            PosterError::asset(format!("failed to load image '{}': {e}", path.display()))
        })?;
        let mut out = Self::from_rgba(decoded.to_rgba8());
        out.source = Some(path.to_path_buf());
        out.resize(width, height)?;
        Ok(out)
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn set_pixels(&mut self, pixels: RgbaImage) {
        self.has_alpha = pixels.pixels().any(|p| p.0[3] < 255);
        self.loaded = pixels.width() > 0 && pixels.height() > 0;
        self.pixels = pixels;
    }

    /// Resize to the given box. With only one side given the other follows the aspect ratio.
    pub fn resize(&mut self, width: Option<u32>, height: Option<u32>) -> PosterResult<()> {
        let (w0, h0) = self.pixels.dimensions();
        let Some((w, h)) = target_size(w0, h0, width, height) else {
            return Ok(());
        };
        if w == 0 || h == 0 {
            return Err(PosterError::validation(format!(
                "image cannot be resized to {w}x{h}"
            )));
        }
        if (w, h) != (w0, h0) {
            let resized = ::image::imageops::resize(&self.pixels, w, h, FilterType::Lanczos3);
            self.set_pixels(resized);
        }
        Ok(())
    }
}

pub(crate) fn target_size(
    w0: u32,
    h0: u32,
    width: Option<u32>,
    height: Option<u32>,
) -> Option<(u32, u32)> {
    let scaled = |num: u32, a: u32, b: u32| -> u32 {
        if b == 0 {
            0
        } else {
            (f64::from(num) * f64::from(a) / f64::from(b)).round().max(1.0) as u32
        }
    };
    match (width, height) {
        (None, None) => None,
        (Some(w), Some(h)) => Some((w, h)),
        (Some(w), None) => Some((w, scaled(w, h0, w0))),
        (None, Some(h)) => Some((scaled(h, w0, h0), h)),
    }
}

impl Drawable for ImageElement {
    fn kind(&self) -> ElementKind {
        ElementKind::Image
    }

    fn position(&self) -> (i32, i32) {
        self.position
    }

    fn set_position(&mut self, x: i32, y: i32) {
        self.position = (x, y);
    }

    fn size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    fn is_ready(&self) -> bool {
        self.loaded
    }

    fn has_translucency(&self) -> bool {
        self.has_alpha
    }

    fn draw(&self, target: &mut Surface, blend: BlendSettings) -> PosterResult<()> {
        let (x, y) = self.position;
        draw_pass(target, blend, self.has_alpha, |s| {
            s.paste(&self.pixels, x, y);
            Ok(())
        })
    }
}
