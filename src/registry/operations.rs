use std::collections::BTreeMap;

use image::RgbaImage;

use crate::element::{Drawable, Element, ElementKind, StyleDelta};
use crate::foundation::core::round_px;
use crate::foundation::error::{PosterError, PosterResult};
use crate::registry::OperationContext;
use crate::value::{ParamMap, Params};

/// A pure operation: reads the element and its parameters, returns the change to apply.
pub type OperationFn =
    fn(&Element, &Params<'_>, &OperationContext<'_>) -> PosterResult<StyleDelta>;

/// One named operation as declared on an element.
#[derive(Clone, Debug, PartialEq)]
pub struct OperationSpec {
    pub name: String,
    pub params: ParamMap,
    /// Dotted location of the parameters, used in error messages.
    pub path: String,
}

impl OperationSpec {
    pub fn new(name: impl Into<String>, params: ParamMap) -> Self {
        let name = name.into();
        let path = format!("operations.{name}");
        Self { name, params, path }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }
}

#[derive(Clone)]
struct OperationEntry {
    func: OperationFn,
    supports: Vec<ElementKind>,
}

/// Operation table keyed by name, each entry limited to the element kinds it supports.
#[derive(Clone, Default)]
pub struct OperationRegistry {
    ops: BTreeMap<String, OperationEntry>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut r = Self::new();
        r.register("apply_hue_shift", apply_hue_shift, &[ElementKind::Image]);
        r.register("set_hue_from_hex", set_hue_from_hex, &[ElementKind::Image]);
        r.register("resize", resize, &[ElementKind::Image]);
        r.register("set_text", set_text, &[ElementKind::Text]);
        r.register("set_font", set_font, &[ElementKind::Text]);
        r.register(
            "set_fill",
            set_fill,
            &[ElementKind::Text, ElementKind::Rectangle, ElementKind::Ellipse],
        );
        r.register(
            "set_outline",
            set_outline,
            &[ElementKind::Rectangle, ElementKind::Ellipse],
        );
        r.register("translate", translate, &ElementKind::ALL);
        r
    }

    pub fn register(&mut self, name: &str, func: OperationFn, supports: &[ElementKind]) {
        self.ops.insert(
            name.to_owned(),
            OperationEntry {
                func,
                supports: supports.to_vec(),
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<OperationFn> {
        self.ops.get(name).map(|e| e.func)
    }

    pub fn supports(&self, name: &str, kind: ElementKind) -> bool {
        self.ops
            .get(name)
            .is_some_and(|e| e.supports.contains(&kind))
    }

    pub fn supported_kinds(&self, name: &str) -> Option<&[ElementKind]> {
        self.ops.get(name).map(|e| e.supports.as_slice())
    }

    pub fn registered_names(&self) -> Vec<&str> {
        self.ops.keys().map(String::as_str).collect()
    }

    /// Run `spec` on `element`.
    ///
    /// Unregistered operations and unsupported element kinds are skipped with a warning and
    /// return `Ok(false)`. Bad parameters of a supported operation are errors.
    pub fn apply(
        &self,
        element: &mut Element,
        spec: &OperationSpec,
        ctx: &OperationContext<'_>,
    ) -> PosterResult<bool> {
        let Some(entry) = self.ops.get(&spec.name) else {
            tracing::warn!(
                element = ctx.element,
                operation = %spec.name,
                "operation not registered, skipping"
            );
            return Ok(false);
        };
        let kind = element.kind();
        if !entry.supports.contains(&kind) {
            tracing::warn!(
                element = ctx.element,
                operation = %spec.name,
                kind = %kind,
                "operation does not support this element type, skipping"
            );
            return Ok(false);
        }

        let params = Params::new(&spec.params, &spec.path);
        let delta = (entry.func)(element, &params, ctx)?;
        element.apply_delta(delta)?;
        tracing::debug!(element = ctx.element, operation = %spec.name, "applied operation");
        Ok(true)
    }
}

fn image_pixels<'e>(element: &'e Element, op: &str) -> PosterResult<&'e RgbaImage> {
    element
        .as_image()
        .map(|i| i.pixels())
        .ok_or_else(|| PosterError::validation(format!("{op} needs an image element")))
}

fn map_rgb(src: &RgbaImage, f: impl Fn(f64, f64, f64) -> (f64, f64, f64)) -> RgbaImage {
    let mut out = src.clone();
    for px in out.pixels_mut() {
        let [r, g, b, a] = px.0;
        let (h, s, v) = rgb_to_hsv(r, g, b);
        let (h, s, v) = f(h, s, v);
        let (r, g, b) = hsv_to_rgb(h, s, v);
        px.0 = [r, g, b, a];
    }
    out
}

fn apply_hue_shift(
    element: &Element,
    params: &Params<'_>,
    _ctx: &OperationContext<'_>,
) -> PosterResult<StyleDelta> {
    params.expect_keys(&["degrees"])?;
    let shift = params.required_number("degrees")? / 360.0;
    let pixels = image_pixels(element, "apply_hue_shift")?;
    Ok(StyleDelta::Pixels(map_rgb(pixels, |h, s, v| {
        ((h + shift).rem_euclid(1.0), s, v)
    })))
}

fn set_hue_from_hex(
    element: &Element,
    params: &Params<'_>,
    _ctx: &OperationContext<'_>,
) -> PosterResult<StyleDelta> {
    params.expect_keys(&["hex_color"])?;
    let target = params.color("hex_color")?.ok_or_else(|| {
        PosterError::validation(format!(
            "{}: missing required color",
            params.field_path("hex_color")
        ))
    })?;
    let (hue, _, _) = rgb_to_hsv(target.r, target.g, target.b);
    let pixels = image_pixels(element, "set_hue_from_hex")?;
    Ok(StyleDelta::Pixels(map_rgb(pixels, |_, s, v| (hue, s, v))))
}

fn resize(
    element: &Element,
    params: &Params<'_>,
    _ctx: &OperationContext<'_>,
) -> PosterResult<StyleDelta> {
    params.expect_keys(&["width", "height"])?;
    let width = params.dimension("width")?;
    let height = params.dimension("height")?;
    let Some(img) = element.as_image() else {
        return Err(PosterError::validation("resize needs an image element"));
    };
    let mut resized = img.clone();
    resized.resize(width, height)?;
    Ok(StyleDelta::Pixels(resized.pixels().clone()))
}

fn set_text(
    _element: &Element,
    params: &Params<'_>,
    _ctx: &OperationContext<'_>,
) -> PosterResult<StyleDelta> {
    params.expect_keys(&["text"])?;
    Ok(StyleDelta::Content(params.text(&["text"])?.unwrap_or_default()))
}

fn set_font(
    _element: &Element,
    params: &Params<'_>,
    ctx: &OperationContext<'_>,
) -> PosterResult<StyleDelta> {
    params.expect_keys(&["family", "font_family", "size", "font_size"])?;
    let family = params.string_any(&["family", "font_family"])?;
    let size = match params.get_any(&["size", "font_size"]) {
        Some((v, path)) => {
            let n = v.as_f64().filter(|n| n.is_finite() && *n > 0.0).ok_or_else(|| {
                PosterError::validation(format!("{path}: expected a positive size"))
            })?;
            Some(n as f32)
        }
        None => None,
    };
    Ok(StyleDelta::Font {
        face: family.and_then(|f| ctx.fonts.resolve(f)),
        family: family.map(str::to_owned),
        size,
    })
}

fn set_fill(
    _element: &Element,
    params: &Params<'_>,
    _ctx: &OperationContext<'_>,
) -> PosterResult<StyleDelta> {
    params.expect_keys(&["color", "fill"])?;
    let color = params.color_any(&["color", "fill"])?.ok_or_else(|| {
        PosterError::validation(format!(
            "{}: missing required color",
            params.field_path("color")
        ))
    })?;
    Ok(StyleDelta::Fill(color))
}

fn set_outline(
    _element: &Element,
    params: &Params<'_>,
    _ctx: &OperationContext<'_>,
) -> PosterResult<StyleDelta> {
    params.expect_keys(&["color", "outline", "width"])?;
    let width = params.number("width")?;
    if width.is_some_and(|w| !w.is_finite() || w < 0.0) {
        return Err(PosterError::validation(format!(
            "{}: expected a non-negative width",
            params.field_path("width")
        )));
    }
    Ok(StyleDelta::Outline {
        color: params.color_any(&["color", "outline"])?,
        width,
    })
}

fn translate(
    _element: &Element,
    params: &Params<'_>,
    _ctx: &OperationContext<'_>,
) -> PosterResult<StyleDelta> {
    params.expect_keys(&["dx", "dy"])?;
    Ok(StyleDelta::Translate {
        dx: round_px(params.number("dx")?.unwrap_or(0.0)),
        dy: round_px(params.number("dy")?.unwrap_or(0.0)),
    })
}

/// Hue, saturation and value, each in `[0, 1]`.
pub(crate) fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let (r, g, b) = (
        f64::from(r) / 255.0,
        f64::from(g) / 255.0,
        f64::from(b) / 255.0,
    );
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    if delta == 0.0 {
        return (0.0, 0.0, max);
    }
    let s = delta / max;
    let h = if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    (h / 6.0, s, max)
}

pub(crate) fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (u8, u8, u8) {
    let to_u8 = |c: f64| (c * 255.0).round().clamp(0.0, 255.0) as u8;
    if s == 0.0 {
        let c = to_u8(v);
        return (c, c, c);
    }
    let h6 = h.rem_euclid(1.0) * 6.0;
    let i = h6.floor();
    let f = h6 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match i as u8 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    (to_u8(r), to_u8(g), to_u8(b))
}

impl std::fmt::Debug for OperationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.ops.iter().map(|(k, e)| (k, &e.supports)))
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/registry/operations.rs"]
mod tests;
