use std::sync::Arc;

use crate::element::{Drawable, ElementKind};
use crate::foundation::core::Rgba8;
use crate::foundation::error::PosterResult;
use crate::render::{BlendSettings, Surface, draw_pass};
use crate::text::{FontFace, TextAlign, TextBlock, TextLayoutEngine, WrapStyle};

pub const DEFAULT_FONT_SIZE: f32 = 20.0;

#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f32,
    pub wrap: WrapStyle,
    pub max_width: Option<f32>,
    pub align: TextAlign,
    pub fill: Rgba8,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: String::new(),
            font_size: DEFAULT_FONT_SIZE,
            wrap: WrapStyle::Word,
            max_width: None,
            align: TextAlign::Left,
            fill: Rgba8::BLACK,
        }
    }
}

/// Wrapped, measured text drawn with a single face.
///
/// The block is re-laid out whenever content, font or size change, so [`Drawable::size`] is
/// always current.
#[derive(Clone, Debug)]
pub struct TextElement {
    position: (i32, i32),
    content: String,
    font: Option<Arc<FontFace>>,
    style: TextStyle,
    block: TextBlock,
}

impl TextElement {
    pub fn new(
        content: impl Into<String>,
        style: TextStyle,
        font: Option<Arc<FontFace>>,
    ) -> PosterResult<Self> {
        let mut out = Self {
            position: (0, 0),
            content: content.into(),
            font,
            style,
            block: TextBlock::default(),
        };
        out.relayout()?;
        Ok(out)
    }

    fn relayout(&mut self) -> PosterResult<()> {
        self.block = match &self.font {
            Some(face) if !self.content.is_empty() => TextLayoutEngine::new().layout_block(
                &self.content,
                face,
                self.style.font_size,
                self.style.wrap,
                self.style.max_width,
            )?,
            _ => TextBlock::default(),
        };
        Ok(())
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Content with the wrapping line breaks applied.
    pub fn wrapped(&self) -> String {
        self.block.joined()
    }

    pub fn lines(&self) -> usize {
        self.block.lines.len()
    }

    pub fn font(&self) -> Option<&Arc<FontFace>> {
        self.font.as_ref()
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    pub fn set_content(&mut self, content: impl Into<String>) -> PosterResult<()> {
        self.content = content.into();
        self.relayout()
    }

    /// Change face, family name and/or size; `None` keeps the current value.
    pub fn set_font(
        &mut self,
        face: Option<Arc<FontFace>>,
        family: Option<String>,
        size: Option<f32>,
    ) -> PosterResult<()> {
        if let Some(face) = face {
            self.font = Some(face);
        }
        if let Some(family) = family {
            self.style.font_family = family;
        }
        if let Some(size) = size {
            self.style.font_size = size;
        }
        self.relayout()
    }

    pub fn set_fill(&mut self, fill: Rgba8) {
        self.style.fill = fill;
    }
}

impl Drawable for TextElement {
    fn kind(&self) -> ElementKind {
        ElementKind::Text
    }

    fn position(&self) -> (i32, i32) {
        self.position
    }

    fn set_position(&mut self, x: i32, y: i32) {
        self.position = (x, y);
    }

    fn size(&self) -> (u32, u32) {
        if !self.is_ready() {
            return (0, 0);
        }
        self.block.pixel_size()
    }

    fn is_ready(&self) -> bool {
        self.font.is_some() && !self.content.is_empty()
    }

    fn has_translucency(&self) -> bool {
        self.style.fill.is_translucent()
    }

    fn draw(&self, target: &mut Surface, blend: BlendSettings) -> PosterResult<()> {
        let Some(face) = &self.font else {
            return Ok(());
        };
        let bitmap = TextLayoutEngine::new().draw_block(
            &self.block,
            face,
            self.style.font_size,
            self.style.fill,
            self.style.align,
        )?;
        let (x, y) = self.position;
        draw_pass(target, blend, self.has_translucency(), |s| {
            s.paste(&bitmap, x, y);
            Ok(())
        })
    }
}
