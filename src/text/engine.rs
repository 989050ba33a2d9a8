use std::collections::HashMap;
use std::sync::Arc;

use image::RgbaImage;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{PosterError, PosterResult};
use crate::render::raster::{paint, rasterize};
use crate::text::fonts::FontFace;
use crate::text::wrap::{WrapStyle, wrap_text};
use crate::text::{TextAlign, TextBlock, TextLine};

/// Stateful helper for building Parley layouts from registered font faces.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    // face family -> parley family name
    registered: HashMap<String, String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: HashMap::new(),
        }
    }

    fn family_for(&mut self, face: &FontFace) -> PosterResult<String> {
        if let Some(name) = self.registered.get(face.family()) {
            return Ok(name.clone());
        }
        let bytes = face.bytes()?;
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            PosterError::asset(format!(
                "no font families registered from font '{}'",
                face.family()
            ))
        })?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| PosterError::asset("registered font family has no name"))?
            .to_string();
        self.registered
            .insert(face.family().to_owned(), name.clone());
        Ok(name)
    }

    /// Shape and lay out a single unwrapped line.
    pub fn layout_line(
        &mut self,
        text: &str,
        face: &FontFace,
        size_px: f32,
        brush: Rgba8,
    ) -> PosterResult<parley::Layout<Rgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(PosterError::validation(format!(
                "font size must be finite and > 0, got {size_px}"
            )));
        }
        let family_name = self.family_for(face)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    /// Advance width and line height of `text` on one line.
    ///
    /// Empty text still has the height of a line.
    pub fn measure(&mut self, text: &str, face: &FontFace, size_px: f32) -> PosterResult<(f32, f32)> {
        if text.is_empty() {
            let (_, h) = extent(&self.layout_line(" ", face, size_px, Rgba8::BLACK)?);
            return Ok((0.0, h));
        }
        Ok(extent(&self.layout_line(text, face, size_px, Rgba8::BLACK)?))
    }

    /// Wrap and measure a paragraph block.
    pub fn layout_block(
        &mut self,
        content: &str,
        face: &FontFace,
        size_px: f32,
        wrap: WrapStyle,
        max_width: Option<f32>,
    ) -> PosterResult<TextBlock> {
        let lines = wrap_text(content, wrap, max_width, |s| {
            self.measure(s, face, size_px).map(|(w, _)| w)
        })?;

        let mut block = TextBlock::default();
        for text in lines {
            let (width, height) = self.measure(&text, face, size_px)?;
            block.width = block.width.max(width);
            block.height += height;
            block.lines.push(TextLine {
                text,
                width,
                height,
            });
        }
        Ok(block)
    }

    /// Rasterise a laid out block into a bitmap of the block's size.
    pub fn draw_block(
        &mut self,
        block: &TextBlock,
        face: &FontFace,
        size_px: f32,
        color: Rgba8,
        align: TextAlign,
    ) -> PosterResult<RgbaImage> {
        let (w, h) = block.pixel_size();

        let mut runs: Vec<(f32, Vec<vello_cpu::Glyph>)> = Vec::new();
        let mut y_off = 0.0f32;
        for line in &block.lines {
            let x_off = align.factor() * (block.width - line.width);
            if !line.text.is_empty() {
                let layout = self.layout_line(&line.text, face, size_px, color)?;
                for l in layout.lines() {
                    for item in l.items() {
                        let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                            continue;
                        };
                        let glyphs = run
                            .positioned_glyphs()
                            .map(|g| vello_cpu::Glyph {
                                id: g.id,
                                x: g.x + x_off,
                                y: g.y + y_off,
                            })
                            .collect();
                        runs.push((run.run().font_size(), glyphs));
                    }
                }
            }
            y_off += line.height;
        }

        let bytes: Arc<Vec<u8>> = face.bytes()?;
        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes.to_vec()), 0);
        rasterize(w, h, |ctx| {
            ctx.set_paint(paint(color));
            for (font_size, glyphs) in runs {
                ctx.glyph_run(&font)
                    .font_size(font_size)
                    .fill_glyphs(glyphs.into_iter());
            }
        })
    }
}

fn extent(layout: &parley::Layout<Rgba8>) -> (f32, f32) {
    let mut w = 0.0f32;
    let mut h = 0.0f32;
    for line in layout.lines() {
        let m = line.metrics();
        w = w.max(m.advance);
        h += m.ascent + m.descent + m.leading;
    }
    (w, h)
}

#[cfg(test)]
#[path = "../../tests/unit/text/engine.rs"]
mod tests;
