use std::collections::BTreeMap;
use std::sync::Arc;

use crate::element::{
    Element, EllipseElement, ImageElement, RectangleElement, ShapeStyle, TextElement, TextStyle,
};
use crate::element::shape::DEFAULT_OUTLINE_WIDTH;
use crate::element::text::DEFAULT_FONT_SIZE;
use crate::foundation::core::Rgba8;
use crate::foundation::error::{PosterError, PosterResult};
use crate::registry::BuildContext;
use crate::text::{TextAlign, WrapStyle};
use crate::value::Params;

/// Builds one element from its resolved `values` map.
pub type ElementBuilder =
    Arc<dyn Fn(&Params<'_>, &BuildContext<'_>) -> PosterResult<Element> + Send + Sync>;

/// String-keyed table of element builders.
#[derive(Clone, Default)]
pub struct ElementFactory {
    builders: BTreeMap<String, ElementBuilder>,
}

impl ElementFactory {
    /// Empty factory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory with `text`, `image`, `rectangle`, `ellipse` and `circle`.
    pub fn with_builtins() -> Self {
        let mut f = Self::new();
        f.register("text", build_text);
        f.register("image", build_image);
        f.register("rectangle", build_rectangle);
        f.register("ellipse", build_ellipse);
        f.register("circle", build_circle);
        f
    }

    /// Register (or replace) the builder for `type_name`.
    pub fn register<F>(&mut self, type_name: &str, builder: F)
    where
        F: Fn(&Params<'_>, &BuildContext<'_>) -> PosterResult<Element> + Send + Sync + 'static,
    {
        self.builders
            .insert(type_name.to_owned(), Arc::new(builder));
    }

    pub fn is_registered(&self, type_name: &str) -> bool {
        self.builders.contains_key(type_name)
    }

    pub fn registered_types(&self) -> Vec<&str> {
        self.builders.keys().map(String::as_str).collect()
    }

    pub fn create(
        &self,
        type_name: &str,
        params: &Params<'_>,
        ctx: &BuildContext<'_>,
    ) -> PosterResult<Element> {
        let builder = self
            .builders
            .get(type_name)
            .ok_or_else(|| PosterError::UnknownElementType {
                element: ctx.element.to_owned(),
                kind: type_name.to_owned(),
                registered: self.registered_types().join(", "),
            })?;
        builder(params, ctx)
    }
}

fn positive_size(params: &Params<'_>, key: &str, default: f32) -> PosterResult<f32> {
    let size = params.number(key)?.map_or(default, |n| n as f32);
    if !size.is_finite() || size <= 0.0 {
        return Err(PosterError::validation(format!(
            "{}: expected a positive size, got {size}",
            params.field_path(key)
        )));
    }
    Ok(size)
}

fn build_text(params: &Params<'_>, ctx: &BuildContext<'_>) -> PosterResult<Element> {
    params.expect_keys(&[
        "text",
        "font_family",
        "font",
        "font_size",
        "max_width",
        "wrap_style",
        "text_alignment",
        "alignment",
        "fill",
        "color",
    ])?;

    let content = params.text(&["text"])?.unwrap_or_default();
    let requested = params.string_any(&["font_family", "font"])?;
    let face = match requested {
        Some(family) => ctx.fonts.resolve(family),
        None => ctx.fonts.default_face(),
    };
    if face.is_none() {
        tracing::warn!(element = ctx.element, "no font available for text element");
    }
    let font_family = requested
        .map(str::to_owned)
        .or_else(|| face.as_ref().map(|f| f.family().to_owned()))
        .unwrap_or_default();

    let align = match params.string_any(&["text_alignment", "alignment"])? {
        Some(s) => TextAlign::parse(s).ok_or_else(|| {
            PosterError::validation(format!(
                "{}: unknown text alignment '{s}' (expected left, center or right)",
                params.field_path("text_alignment")
            ))
        })?,
        None => TextAlign::Left,
    };

    let max_width = params.number("max_width")?.map(|w| w as f32);
    if max_width.is_some_and(|w| !w.is_finite() || w <= 0.0) {
        return Err(PosterError::validation(format!(
            "{}: expected a positive width",
            params.field_path("max_width")
        )));
    }

    let style = TextStyle {
        font_family,
        font_size: positive_size(params, "font_size", DEFAULT_FONT_SIZE)?,
        wrap: params
            .string("wrap_style")?
            .map_or(WrapStyle::Word, WrapStyle::parse),
        max_width,
        align,
        fill: params.color_any(&["fill", "color"])?.unwrap_or(Rgba8::BLACK),
    };
    Ok(TextElement::new(content, style, face)?.into())
}

fn build_image(params: &Params<'_>, ctx: &BuildContext<'_>) -> PosterResult<Element> {
    params.expect_keys(&["path", "image_path", "width", "height"])?;
    let width = params.dimension("width")?;
    let height = params.dimension("height")?;
    let Some(path) = params.string_any(&["path", "image_path"])? else {
        return Ok(ImageElement::empty().into());
    };
    Ok(ImageElement::open(ctx.resolve_asset(path), width, height)?.into())
}

fn shape_style(params: &Params<'_>, fill_keys: &[&str]) -> PosterResult<ShapeStyle> {
    let outline_width = params
        .number("outline_width")?
        .unwrap_or(DEFAULT_OUTLINE_WIDTH);
    if !outline_width.is_finite() || outline_width < 0.0 {
        return Err(PosterError::validation(format!(
            "{}: expected a non-negative width, got {outline_width}",
            params.field_path("outline_width")
        )));
    }
    Ok(ShapeStyle {
        fill: params.color_any(fill_keys)?,
        outline: params.color("outline")?,
        outline_width,
    })
}

fn build_rectangle(params: &Params<'_>, _ctx: &BuildContext<'_>) -> PosterResult<Element> {
    params.expect_keys(&[
        "width",
        "height",
        "fill",
        "outline",
        "outline_width",
        "border_radius",
    ])?;
    let rect = RectangleElement::new(
        params.dimension("width")?.unwrap_or(0),
        params.dimension("height")?.unwrap_or(0),
        shape_style(params, &["fill"])?,
    )
    .with_border_radius(params.number("border_radius")?.unwrap_or(0.0));
    Ok(rect.into())
}

fn build_ellipse(params: &Params<'_>, _ctx: &BuildContext<'_>) -> PosterResult<Element> {
    params.expect_keys(&["width", "height", "fill", "outline", "outline_width"])?;
    Ok(EllipseElement::new(
        params.dimension("width")?.unwrap_or(0),
        params.dimension("height")?.unwrap_or(0),
        shape_style(params, &["fill"])?,
    )
    .into())
}

fn build_circle(params: &Params<'_>, _ctx: &BuildContext<'_>) -> PosterResult<Element> {
    params.expect_keys(&["radius", "fill", "background", "outline", "outline_width"])?;
    let radius = params.dimension("radius")?.ok_or_else(|| {
        PosterError::validation(format!(
            "{}: circle needs a radius",
            params.field_path("radius")
        ))
    })?;
    Ok(EllipseElement::circle(radius, shape_style(params, &["fill", "background"])?).into())
}

#[cfg(test)]
#[path = "../../tests/unit/registry/elements.rs"]
mod tests;
