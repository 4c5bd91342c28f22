// Copyright 2025 the Plotbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint primitives produced by chart layout.
//!
//! Layout never draws. It emits [`Mark`]s (rectangles, paths and text runs with resolved pixel
//! geometry) and a [`Painter`] replays them onto whatever backend the caller has.

extern crate alloc;

use alloc::string::String;

use kurbo::{BezPath, Point, Rect, Shape as _};
use peniko::Brush;
use peniko::color::palette::css;
use plotbox_text::{TextMeasurer, TextStyle};

use crate::z_order;

/// Horizontal text anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    /// The position is the start of the text.
    Start,
    /// The position is the horizontal center of the text.
    Middle,
    /// The position is the end of the text.
    End,
}

/// Vertical text alignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextBaseline {
    /// The position is the top of the ink box.
    Top,
    /// The position is the vertical middle of the ink box.
    Middle,
    /// The position is the alphabetic baseline.
    Alphabetic,
    /// The position is the bottom of the ink box.
    Bottom,
}

/// A paint + width pair for stroked shapes.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Stroke paint.
    pub brush: Brush,
    /// Stroke width in pixels.
    pub stroke_width: f64,
}

impl StrokeStyle {
    /// Convenience for a solid stroke.
    pub fn solid(brush: impl Into<Brush>, stroke_width: f64) -> Self {
        Self {
            brush: brush.into(),
            stroke_width,
        }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::solid(css::BLACK, 1.0)
    }
}

/// A single line of positioned text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextMark {
    /// Anchor point in pixels.
    pub pos: Point,
    /// The (unshaped) text.
    pub text: String,
    /// Font used for measuring and drawing.
    pub style: TextStyle,
    /// Fill paint.
    pub fill: Brush,
    /// Horizontal anchor relative to `pos`.
    pub anchor: TextAnchor,
    /// Vertical alignment relative to `pos`.
    pub baseline: TextBaseline,
    /// Rotation around `pos` in degrees, clockwise on screen.
    pub angle: f64,
}

impl TextMark {
    /// Creates an unrotated, start-anchored, alphabetic-baseline text mark.
    pub fn new(pos: Point, text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            pos,
            text: text.into(),
            style,
            fill: css::BLACK.into(),
            anchor: TextAnchor::Start,
            baseline: TextBaseline::Alphabetic,
            angle: 0.0,
        }
    }

    /// Sets the fill paint.
    pub fn with_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.fill = fill.into();
        self
    }

    /// Sets anchor and baseline.
    pub fn with_align(mut self, anchor: TextAnchor, baseline: TextBaseline) -> Self {
        self.anchor = anchor;
        self.baseline = baseline;
        self
    }

    /// Sets the rotation in degrees (clockwise on screen).
    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    /// Unrotated ink bounds of this text.
    pub fn bounds(&self, measurer: &dyn TextMeasurer) -> Rect {
        let m = measurer.measure(&self.text, self.style.clone());
        let (x, y) = (self.pos.x, self.pos.y);
        let w = m.advance_width;
        let (x0, x1) = match self.anchor {
            TextAnchor::Start => (x, x + w),
            TextAnchor::Middle => (x - 0.5 * w, x + 0.5 * w),
            TextAnchor::End => (x - w, x),
        };
        let h = m.height();
        let (y0, y1) = match self.baseline {
            TextBaseline::Top => (y, y + h),
            TextBaseline::Middle => (y - 0.5 * h, y + 0.5 * h),
            TextBaseline::Alphabetic => (y - m.ascent, y + m.descent),
            TextBaseline::Bottom => (y - h, y),
        };
        Rect::new(x0, y0, x1, y1)
    }
}

/// The geometry and paint of a mark.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// An axis-aligned rectangle.
    Rect {
        /// Geometry in pixels.
        rect: Rect,
        /// Optional fill.
        fill: Option<Brush>,
        /// Optional outline.
        stroke: Option<StrokeStyle>,
    },
    /// An arbitrary path.
    Path {
        /// Geometry in pixels.
        path: BezPath,
        /// Optional fill.
        fill: Option<Brush>,
        /// Optional outline.
        stroke: Option<StrokeStyle>,
    },
    /// A text run.
    Text(TextMark),
}

/// A paint instruction with its z-order.
#[derive(Clone, Debug, PartialEq)]
pub struct Mark {
    /// Paint order; lower values are painted first.
    pub z_index: i32,
    /// What to paint.
    pub shape: Shape,
}

impl Mark {
    /// A filled rectangle.
    pub fn filled_rect(rect: Rect, fill: impl Into<Brush>) -> Self {
        Self {
            z_index: z_order::SERIES_FILL,
            shape: Shape::Rect {
                rect,
                fill: Some(fill.into()),
                stroke: None,
            },
        }
    }

    /// An outlined, unfilled rectangle.
    pub fn outlined_rect(rect: Rect, stroke: StrokeStyle) -> Self {
        Self {
            z_index: z_order::SERIES_STROKE,
            shape: Shape::Rect {
                rect,
                fill: None,
                stroke: Some(stroke),
            },
        }
    }

    /// A path with neither fill nor stroke; add them with [`Mark::with_fill`] and
    /// [`Mark::with_stroke`].
    pub fn path(path: BezPath) -> Self {
        Self {
            z_index: z_order::SERIES_FILL,
            shape: Shape::Path {
                path,
                fill: None,
                stroke: None,
            },
        }
    }

    /// A stroked straight line.
    pub fn line(from: Point, to: Point, stroke: StrokeStyle) -> Self {
        let mut path = BezPath::new();
        path.move_to(from);
        path.line_to(to);
        Self {
            z_index: z_order::SERIES_STROKE,
            shape: Shape::Path {
                path,
                fill: None,
                stroke: Some(stroke),
            },
        }
    }

    /// A text mark.
    pub fn text(text: TextMark) -> Self {
        Self {
            z_index: z_order::AXIS_LABELS,
            shape: Shape::Text(text),
        }
    }

    /// Sets the z-index.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Sets the fill paint.
    pub fn with_fill(mut self, brush: impl Into<Brush>) -> Self {
        let brush = brush.into();
        match &mut self.shape {
            Shape::Rect { fill, .. } | Shape::Path { fill, .. } => *fill = Some(brush),
            Shape::Text(text) => text.fill = brush,
        }
        self
    }

    /// Sets the outline stroke (ignored for text).
    pub fn with_stroke(mut self, style: StrokeStyle) -> Self {
        if let Shape::Rect { stroke, .. } | Shape::Path { stroke, .. } = &mut self.shape {
            *stroke = Some(style);
        }
        self
    }

    /// Geometric bounds of rectangles and paths.
    pub fn bounds(&self) -> Option<Rect> {
        match &self.shape {
            Shape::Rect { rect, .. } => Some(*rect),
            Shape::Path { path, .. } => Some(path.bounding_box()),
            Shape::Text(_) => None,
        }
    }

    /// The text payload, if this is a text mark.
    pub fn as_text(&self) -> Option<&TextMark> {
        match &self.shape {
            Shape::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// A rendering backend that replays marks.
pub trait Painter {
    /// Paints a single mark.
    fn paint(&mut self, mark: &Mark);
}
