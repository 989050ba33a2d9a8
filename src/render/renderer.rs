use crate::canvas::Canvas;
use crate::element::Drawable;
use crate::foundation::error::PosterResult;
use crate::render::surface::Surface;

/// Per-draw compositing settings inherited from the element's layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlendSettings {
    /// Alpha cap in `[0, 1]`.
    pub opacity: f32,
}

impl Default for BlendSettings {
    fn default() -> Self {
        Self { opacity: 1.0 }
    }
}

impl BlendSettings {
    pub fn with_opacity(opacity: f32) -> Self {
        Self {
            opacity: opacity.clamp(0.0, 1.0),
        }
    }

    pub fn is_opaque(self) -> bool {
        self.opacity >= 1.0
    }
}

/// Run one draw pass onto `target`.
///
/// Opaque passes at full layer opacity paint straight onto `target`. Anything else paints into
/// a transparent scratch surface of the same size which is then composited with its alpha
/// capped at the layer opacity.
pub fn draw_pass(
    target: &mut Surface,
    blend: BlendSettings,
    translucent: bool,
    paint: impl FnOnce(&mut Surface) -> PosterResult<()>,
) -> PosterResult<()> {
    if blend.is_opaque() && !translucent {
        return paint(target);
    }
    let mut scratch = Surface::transparent(target.width(), target.height());
    paint(&mut scratch)?;
    target.composite(&scratch, blend.opacity)
}

/// Draw every layer of `canvas`, in order, onto a copy of its backing surface.
#[tracing::instrument(skip_all, fields(width = canvas.width(), height = canvas.height()))]
pub fn render(canvas: &Canvas) -> PosterResult<Surface> {
    let mut out = canvas.backing().clone();
    for layer in canvas.layers() {
        let blend = BlendSettings::with_opacity(layer.settings.opacity);
        for id in &layer.elements {
            let Some(element) = canvas.get_element(id) else {
                continue;
            };
            if !element.is_ready() {
                tracing::warn!(element = %id, layer = %layer.name, "element not ready, skipping");
                continue;
            }
            element.draw(&mut out, blend)?;
        }
    }
    Ok(out)
}
