//! Fonts, measurement and wrapping for text elements.

pub mod engine;
pub mod fonts;
pub mod wrap;

pub use engine::TextLayoutEngine;
pub use fonts::{FontBook, FontFace};
pub use wrap::{WrapStyle, wrap_text};

/// Horizontal alignment of lines within a text block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "center" | "centre" | "middle" => Some(Self::Center),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    pub fn factor(self) -> f32 {
        match self {
            Self::Left => 0.0,
            Self::Center => 0.5,
            Self::Right => 1.0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub width: f32,
    pub height: f32,
}

/// Wrapped and measured text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<TextLine>,
    pub width: f32,
    pub height: f32,
}

impl TextBlock {
    /// Size rounded up to whole pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let px = |v: f32| {
            if v.is_finite() && v > 0.0 {
                v.ceil() as u32
            } else {
                0
            }
        };
        (px(self.width), px(self.height))
    }

    pub fn joined(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
