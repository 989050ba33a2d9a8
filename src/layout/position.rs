use kurbo::{Point, Rect, Vec2};

use crate::value::PartialPoint;

/// Where an element goes, before resolution.
#[derive(Clone, Debug, PartialEq)]
pub enum PositionSpec {
    /// Fixed top-left corner.
    Absolute(Point),
    /// A named canvas anchor plus an offset.
    AnchorRef { anchor: String, offset: Vec2 },
    /// Another element's top-left corner plus an offset.
    ElementRef { target: String, offset: Vec2 },
    /// Fractional placement inside the canvas or a parent element. An unset factor keeps the
    /// element's current coordinate on that axis.
    Alignment {
        align: PartialPoint,
        parent: Option<String>,
        offset: Vec2,
    },
}

impl Default for PositionSpec {
    fn default() -> Self {
        Self::Absolute(Point::ZERO)
    }
}

impl PositionSpec {
    pub fn absolute(x: f64, y: f64) -> Self {
        Self::Absolute(Point::new(x, y))
    }

    pub fn anchor(name: impl Into<String>, offset: Vec2) -> Self {
        Self::AnchorRef {
            anchor: name.into(),
            offset,
        }
    }

    pub fn element(target: impl Into<String>, offset: Vec2) -> Self {
        Self::ElementRef {
            target: target.into(),
            offset,
        }
    }

    pub fn align(x: Option<f64>, y: Option<f64>) -> Self {
        Self::Alignment {
            align: PartialPoint { x, y },
            parent: None,
            offset: Vec2::ZERO,
        }
    }

    /// The same spec, landing `delta` further along.
    pub fn shifted(self, delta: Vec2) -> Self {
        if delta == Vec2::ZERO {
            return self;
        }
        match self {
            Self::Absolute(p) => Self::Absolute(p + delta),
            Self::AnchorRef { anchor, offset } => Self::AnchorRef {
                anchor,
                offset: offset + delta,
            },
            Self::ElementRef { target, offset } => Self::ElementRef {
                target,
                offset: offset + delta,
            },
            Self::Alignment {
                align,
                parent,
                offset,
            } => Self::Alignment {
                align,
                parent,
                offset: offset + delta,
            },
        }
    }

    /// Element this spec needs resolved first, if any.
    pub fn dependency(&self) -> Option<&str> {
        match self {
            Self::ElementRef { target, .. } => Some(target),
            Self::Alignment {
                parent: Some(p), ..
            } => Some(p),
            _ => None,
        }
    }
}

/// `align * (parent_extent - element_extent) + parent_origin` per axis.
///
/// Factors are not clamped, so values outside `[0, 1]` place the element outside the parent.
pub fn align_position(
    align: PartialPoint,
    parent: Rect,
    element_size: (f64, f64),
    current: Point,
) -> Point {
    let axis = |factor: Option<f64>, origin: f64, extent: f64, size: f64, keep: f64| match factor {
        Some(f) => f * (extent - size) + origin,
        None => keep,
    };
    Point::new(
        axis(align.x, parent.x0, parent.width(), element_size.0, current.x),
        axis(align.y, parent.y0, parent.height(), element_size.1, current.y),
    )
}
