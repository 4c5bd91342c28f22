// Copyright 2025 the Plotbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned boxes built from [`Position`]s.

extern crate alloc;

use alloc::sync::Arc;

use kurbo::Rect;

use crate::dimension::Dimension;
use crate::position::Position;
use crate::unit::UnitFactors;

/// An axis-aligned rectangle with symbolic edges.
///
/// The edges are `min`/`max` combinations of the two defining corners, so `left <= right` and
/// `top <= bottom` hold after resolution no matter which corners were passed in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutBox {
    top_left: Position,
    bottom_right: Position,
}

impl LayoutBox {
    /// Creates a box spanning two opposite corners, in any order.
    pub fn new(a: &Position, b: &Position) -> Self {
        let left = a.dim_x().min(b.dim_x());
        let right = a.dim_x().max(b.dim_x());
        let top = a.dim_y().min(b.dim_y());
        let bottom = a.dim_y().max(b.dim_y());
        let mut top_left = Position::new(left, top);
        let mut bottom_right = Position::new(right, bottom);
        if let Some(env) = a.env().or_else(|| b.env()) {
            top_left = top_left.resolve_shared(env.clone());
            bottom_right = bottom_right.resolve_shared(env.clone());
        }
        Self {
            top_left,
            bottom_right,
        }
    }

    /// Creates a box from its four edges.
    pub fn from_edges(
        left: impl Into<Dimension>,
        top: impl Into<Dimension>,
        right: impl Into<Dimension>,
        bottom: impl Into<Dimension>,
    ) -> Self {
        Self::new(&Position::new(left, top), &Position::new(right, bottom))
    }

    /// Creates a pixel box from a `kurbo` rectangle.
    pub fn from_rect(rect: Rect) -> Self {
        Self::from_edges(rect.x0, rect.y0, rect.x1, rect.y1)
    }

    /// Returns a copy resolved against a snapshot of `env`.
    #[must_use]
    pub fn resolve(&self, env: &UnitFactors) -> Self {
        let env = Arc::new(env.clone());
        Self {
            top_left: self.top_left.resolve_shared(env.clone()),
            bottom_right: self.bottom_right.resolve_shared(env),
        }
    }

    /// Whether this box carries an environment snapshot.
    pub fn is_resolved(&self) -> bool {
        self.top_left.is_resolved()
    }

    /// The top-left corner.
    pub fn top_left(&self) -> Position {
        self.top_left.clone()
    }

    /// The bottom-right corner.
    pub fn bottom_right(&self) -> Position {
        self.bottom_right.clone()
    }

    /// The top-right corner.
    pub fn top_right(&self) -> Position {
        self.corner(self.bottom_right.dim_x(), self.top_left.dim_y())
    }

    /// The bottom-left corner.
    pub fn bottom_left(&self) -> Position {
        self.corner(self.top_left.dim_x(), self.bottom_right.dim_y())
    }

    fn corner(&self, x: &Dimension, y: &Dimension) -> Position {
        let p = Position::new(x, y);
        match self.top_left.env() {
            Some(env) => p.resolve_shared(env.clone()),
            None => p,
        }
    }

    /// The center point.
    pub fn center(&self) -> Position {
        self.top_left.towards(&self.bottom_right, 0.5, 0.5)
    }

    /// Resolved left edge.
    pub fn left(&self) -> f64 {
        self.top_left.x()
    }

    /// Resolved top edge.
    pub fn top(&self) -> f64 {
        self.top_left.y()
    }

    /// Resolved right edge.
    pub fn right(&self) -> f64 {
        self.bottom_right.x()
    }

    /// Resolved bottom edge.
    pub fn bottom(&self) -> f64 {
        self.bottom_right.y()
    }

    /// Resolved width.
    pub fn width(&self) -> f64 {
        self.right() - self.left()
    }

    /// Resolved height.
    pub fn height(&self) -> f64 {
        self.bottom() - self.top()
    }

    /// `(x, y, width, height)`.
    pub fn xywh(&self) -> (f64, f64, f64, f64) {
        (self.left(), self.top(), self.width(), self.height())
    }

    /// `(top, left, bottom, right)`.
    pub fn tlbr(&self) -> (f64, f64, f64, f64) {
        (self.top(), self.left(), self.bottom(), self.right())
    }

    /// The resolved box as a `kurbo` rectangle.
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.left(), self.top(), self.right(), self.bottom())
    }

    /// Insets every edge: `dx` horizontally and `dy` vertically.
    #[must_use]
    pub fn inside_box(&self, dx: impl Into<Dimension>, dy: impl Into<Dimension>) -> Self {
        let dx = dx.into();
        let dy = dy.into();
        Self::new(
            &self.top_left.relative(&dx, &dy),
            &self.bottom_right.relative(dx.neg(), dy.neg()),
        )
    }

    /// Outsets every edge: `dx` horizontally and `dy` vertically.
    #[must_use]
    pub fn outside_box(&self, dx: impl Into<Dimension>, dy: impl Into<Dimension>) -> Self {
        let dx = dx.into();
        let dy = dy.into();
        Self::new(
            &self.top_left.relative(dx.neg(), dy.neg()),
            &self.bottom_right.relative(&dx, &dy),
        )
    }
}
