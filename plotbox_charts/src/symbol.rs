// Copyright 2025 the Plotbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Marker shapes.

use kurbo::{BezPath, Circle, Shape};

/// Marker shapes for scatter points and legend samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// An axis-aligned square.
    Square,
    /// A circle.
    Circle,
    /// An upward pointing triangle.
    Triangle,
    /// A square rotated by 45°.
    Diamond,
    /// A four-pointed star.
    Star,
}

// Polygon designs on a 32×32 grid.
const GRID: f64 = 32.0;
const SQUARE: &[(f64, f64)] = &[(0.0, 0.0), (32.0, 0.0), (32.0, 32.0), (0.0, 32.0)];
const TRIANGLE: &[(f64, f64)] = &[(16.0, 0.0), (32.0, 26.0), (0.0, 26.0)];
const DIAMOND: &[(f64, f64)] = &[(16.0, 0.0), (32.0, 16.0), (16.0, 32.0), (0.0, 16.0)];
const STAR: &[(f64, f64)] = &[
    (0.0, 16.0),
    (14.0, 14.0),
    (16.0, 0.0),
    (18.0, 14.0),
    (32.0, 16.0),
    (18.0, 18.0),
    (16.0, 32.0),
    (14.0, 18.0),
];

impl Symbol {
    /// The cycle used when series don't pick a symbol.
    pub const SERIES_CYCLE: [Self; 3] = [Self::Triangle, Self::Diamond, Self::Star];

    /// Parses a symbol name (`square`, `circle`, `triangle`, `diamond`, `star`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "square" | "rect" => Some(Self::Square),
            "circle" => Some(Self::Circle),
            "triangle" => Some(Self::Triangle),
            "diamond" => Some(Self::Diamond),
            "star" => Some(Self::Star),
            _ => None,
        }
    }

    /// Outline centered on `(cx, cy)`, `size` pixels across.
    pub fn path(self, cx: f64, cy: f64, size: f64) -> BezPath {
        let grid = match self {
            Self::Circle => return Circle::new((cx, cy), 0.5 * size).to_path(0.1),
            Self::Square => SQUARE,
            Self::Triangle => TRIANGLE,
            Self::Diamond => DIAMOND,
            Self::Star => STAR,
        };
        let k = size / GRID;
        let origin = (cx - 0.5 * size, cy - 0.5 * size);
        let mut corners = grid.iter().map(|&(x, y)| (origin.0 + x * k, origin.1 + y * k));
        let mut path = BezPath::new();
        if let Some(first) = corners.next() {
            path.move_to(first);
            corners.for_each(|p| path.line_to(p));
            path.close_path();
        }
        path
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use kurbo::Rect;

    use super::*;

    #[test]
    fn grid_symbols_fill_their_cell() {
        let star = Symbol::Star.path(50.0, 50.0, 16.0).bounding_box();
        assert_eq!(star, Rect::new(42.0, 42.0, 58.0, 58.0));

        // The triangle's base sits at 26/32 of the cell.
        let tri = Symbol::Triangle.path(0.0, 0.0, 32.0).bounding_box();
        assert_eq!(tri, Rect::new(-16.0, -16.0, 16.0, 10.0));
    }

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!(Symbol::from_name("Diamond"), Some(Symbol::Diamond));
        assert_eq!(Symbol::from_name("hexagon"), None);
    }
}
