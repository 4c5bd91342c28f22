// Copyright 2025 the Plotbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Category label placement: wrapping, rotation and font fitting.
//!
//! Group labels under a band axis get one shared rotation. A label is wrapped to its slot
//! first; if it still does not fit, the axis is tilted counter-clockwise just enough that the
//! rotated labels, each anchored with its end under the slot center, stop overlapping.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::f64::consts::FRAC_PI_2;

use kurbo::{BezPath, Point, Vec2};
use peniko::Brush;
use plotbox_text::{TextMeasurer, TextStyle};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;
use crate::mark::{TextAnchor, TextBaseline, TextMark};

/// Smallest font size [`fit_font_size`] shrinks to.
pub const MIN_FITTED_FONT_SIZE: f64 = 10.0;

/// A label broken into lines, with its measured extent.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelBlock {
    /// The lines, top to bottom.
    pub lines: Vec<String>,
    /// Width of the widest line.
    pub width: f64,
    /// `line_height * lines.len()`.
    pub height: f64,
    /// Ascent plus descent of one line.
    pub line_height: f64,
}

impl LabelBlock {
    /// Measures `text` as a single line.
    pub fn single(text: &str, style: &TextStyle, measurer: &dyn TextMeasurer) -> Self {
        let m = measurer.measure(text, style.clone());
        Self {
            lines: alloc::vec![text.to_string()],
            width: m.advance_width,
            height: m.height(),
            line_height: m.height(),
        }
    }

    /// Word-wraps `text` so that lines fit `max_width` where possible.
    ///
    /// Text that fits is kept on one line. Otherwise words are greedily packed; a word wider
    /// than `max_width` gets a line of its own.
    pub fn layout(
        text: &str,
        style: &TextStyle,
        max_width: f64,
        measurer: &dyn TextMeasurer,
    ) -> Self {
        let single = Self::single(text, style, measurer);
        if single.width <= max_width || !text.contains(' ') {
            return single;
        }

        let width_of = |s: &str| measurer.measure(s, style.clone()).advance_width;
        let mut lines: Vec<String> = Vec::new();
        let mut current = String::new();
        for word in text.split(' ').filter(|w| !w.is_empty()) {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate_width = width_of(&current) + width_of(" ") + width_of(word);
            if candidate_width <= max_width {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(core::mem::take(&mut current));
                current.push_str(word);
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }

        let width = lines.iter().map(|l| width_of(l)).fold(0.0, f64::max);
        let n = lines.len() as f64;
        Self {
            lines,
            width,
            height: single.line_height * n,
            line_height: single.line_height,
        }
    }

    /// Axis-aligned extent after rotating by `angle` radians.
    pub fn rotated_extent(&self, angle: f64) -> (f64, f64) {
        rotated_extent(self.width, self.height, angle)
    }

    /// Emits one centered text mark per line, for a block centered at `center` and rotated
    /// counter-clockwise by `angle` radians.
    pub fn text_marks(
        &self,
        center: Point,
        angle: f64,
        style: &TextStyle,
        fill: &Brush,
    ) -> Vec<TextMark> {
        let (sin, cos) = (angle.sin(), angle.cos());
        let mid = (self.lines.len() as f64 - 1.0) * 0.5;
        self.lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let d = (i as f64 - mid) * self.line_height;
                let pos = center + Vec2::new(d * sin, d * cos);
                TextMark::new(pos, line.clone(), style.clone())
                    .with_fill(fill.clone())
                    .with_align(TextAnchor::Middle, TextBaseline::Middle)
                    .with_angle(-angle.to_degrees())
            })
            .collect()
    }
}

/// Axis-aligned `(width, height)` of a `w × h` rectangle rotated by `angle` radians.
pub fn rotated_extent(w: f64, h: f64, angle: f64) -> (f64, f64) {
    let (sin, cos) = (angle.sin().abs(), angle.cos().abs());
    (h * sin + w * cos, w * sin + h * cos)
}

/// Smallest counter-clockwise rotation (radians) for one label of size `w × h`.
///
/// `straight` is the horizontal room for an unrotated label (the slot pitch), `angled` the room
/// a tilted label may extend to the left of its slot center.
pub fn minimal_rotation(w: f64, h: f64, straight: f64, angled: f64) -> f64 {
    if w <= straight {
        return 0.0;
    }
    if 3.0 * h > 2.0 * straight {
        return FRAC_PI_2;
    }
    let min_angle = (3.0 * h / (2.0 * straight)).asin();
    if angled > w {
        return min_angle;
    }
    let big_w = angled;
    let root = (h * h + w * w - big_w * big_w).max(0.0).sqrt();
    let angle = 2.0 * ((h + root) / (w + big_w)).atan();
    angle.min(FRAC_PI_2).max(min_angle)
}

/// Center of a label block placed under a slot centered at `anchor`.
///
/// `anchor.y` is the top of the label row. Tilted labels keep their end edge under the slot
/// center; vertical labels are centered on it.
pub fn rotated_label_center(anchor: Point, w: f64, h: f64, angle: f64) -> Point {
    let (bw, bh) = rotated_extent(w, h, angle);
    let mut x = anchor.x;
    if angle > 0.0 && angle < FRAC_PI_2 - 1e-4 {
        x += h * angle.sin() - 0.5 * bw;
    }
    Point::new(x, anchor.y + 0.5 * bh)
}

fn corners(center: Point, w: f64, h: f64, angle: f64) -> [Point; 4] {
    // Counter-clockwise on screen: +x maps to (cos, -sin), +y maps to (sin, cos).
    let (sin, cos) = (angle.sin(), angle.cos());
    let ux = Vec2::new(cos, -sin) * (0.5 * w);
    let uy = Vec2::new(sin, cos) * (0.5 * h);
    [
        center - ux - uy,
        center + ux - uy,
        center + ux + uy,
        center - ux + uy,
    ]
}

/// Outline of a rotated label block, for debug overlays.
pub fn label_outline(center: Point, w: f64, h: f64, angle: f64) -> BezPath {
    let c = corners(center, w, h, angle);
    let mut p = BezPath::new();
    p.move_to(c[0]);
    for pt in &c[1..] {
        p.line_to(*pt);
    }
    p.close_path();
    p
}

fn project(pts: &[Point; 4], axis: Vec2) -> (f64, f64) {
    pts.iter()
        .map(|p| p.to_vec2().dot(axis))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        })
}

/// Separating-axis test for two convex quadrilaterals. Touching edges do not intersect.
fn quads_intersect(a: &[Point; 4], b: &[Point; 4]) -> bool {
    const EPS: f64 = 1e-6;
    for quad in [a, b] {
        for i in 0..2 {
            let edge = quad[i + 1] - quad[i];
            let axis = Vec2::new(-edge.y, edge.x);
            if axis.hypot2() == 0.0 {
                continue;
            }
            let (a0, a1) = project(a, axis);
            let (b0, b1) = project(b, axis);
            let scale = axis.hypot();
            if a1.min(b1) - a0.max(b0) <= EPS * scale {
                return false;
            }
        }
    }
    true
}

/// Chooses one rotation (whole degrees) for a row of labels.
///
/// `sizes` are the unrotated `(width, height)` of each label block in slot order, `pitch` the
/// distance between adjacent slot centers and `angled` the room left of a slot (see
/// [`minimal_rotation`]). The search starts at the largest per-label minimum and returns the
/// first angle at which no two neighboring labels overlap, or 90.
pub fn resolve_axis_rotation(sizes: &[(f64, f64)], pitch: f64, angled: f64) -> u32 {
    let start = sizes
        .iter()
        .map(|&(w, h)| minimal_rotation(w, h, pitch, angled))
        .fold(0.0, f64::max)
        .to_degrees()
        .ceil()
        .clamp(0.0, 90.0);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "clamped to [0, 90]"
    )]
    let start = start as u32;

    for degrees in start..=90 {
        let angle = f64::from(degrees).to_radians();
        let placed: Vec<[Point; 4]> = sizes
            .iter()
            .enumerate()
            .map(|(i, &(w, h))| {
                let anchor = Point::new(i as f64 * pitch, 0.0);
                corners(rotated_label_center(anchor, w, h, angle), w, h, angle)
            })
            .collect();
        if placed.windows(2).all(|pair| !quads_intersect(&pair[0], &pair[1])) {
            log::debug!("label rotation {degrees}° for {} labels", sizes.len());
            return degrees;
        }
    }
    90
}

/// Largest font size (stepping down by 1px, not below [`MIN_FITTED_FONT_SIZE`]) at which the
/// widest of `labels` fits `available` width.
pub fn fit_font_size(
    labels: &[String],
    style: &TextStyle,
    available: f64,
    measurer: &dyn TextMeasurer,
) -> f64 {
    let mut size = style.font_size;
    let Some((widest, mut width)) = labels
        .iter()
        .map(|l| (l, measurer.measure(l, style.clone()).advance_width))
        .fold(None, |best: Option<(&String, f64)>, (l, w)| match best {
            Some((_, bw)) if bw >= w => best,
            _ => Some((l, w)),
        })
    else {
        return size;
    };
    while size > MIN_FITTED_FONT_SIZE && width > available {
        size -= 1.0;
        width = measurer
            .measure(widest, style.clone().with_font_size(size))
            .advance_width;
    }
    size
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::format;
    use std::vec;

    use plotbox_text::HeuristicTextMeasurer;

    use super::*;

    #[test]
    fn short_text_stays_on_one_line() {
        let style = TextStyle::new(10.0);
        let b = LabelBlock::layout("Q1 2024", &style, 100.0, &HeuristicTextMeasurer);
        assert_eq!(b.lines, ["Q1 2024"]);
        assert_eq!(b.width, 42.0);
        assert_eq!(b.height, 10.0);
    }

    #[test]
    fn long_text_wraps_greedily() {
        // 6px per char: "North" = 30, "North East" = 60.
        let style = TextStyle::new(10.0);
        let b = LabelBlock::layout("North East Region", &style, 60.0, &HeuristicTextMeasurer);
        assert_eq!(b.lines, ["North East", "Region"]);
        assert_eq!(b.width, 60.0);
        assert_eq!(b.height, 20.0);

        let b = LabelBlock::layout("Extraordinarily long", &style, 30.0, &HeuristicTextMeasurer);
        assert_eq!(b.lines, ["Extraordinarily", "long"]);
        assert_eq!(b.width, 90.0);
    }

    #[test]
    fn minimal_rotation_cases() {
        assert_eq!(minimal_rotation(40.0, 10.0, 50.0, 80.0), 0.0);
        assert_eq!(minimal_rotation(60.0, 40.0, 50.0, 80.0), FRAC_PI_2);
        let min_angle = (30.0_f64 / 100.0).asin();
        assert!((minimal_rotation(60.0, 10.0, 50.0, 80.0) - min_angle).abs() < 1e-12);
        let a = minimal_rotation(200.0, 10.0, 50.0, 80.0);
        assert!(a > min_angle && a < FRAC_PI_2);
    }

    #[test]
    fn rotated_extent_swaps_at_right_angles() {
        let (w, h) = rotated_extent(30.0, 10.0, FRAC_PI_2);
        assert!((w - 10.0).abs() < 1e-12);
        assert!((h - 30.0).abs() < 1e-12);
    }

    #[test]
    fn labels_that_fit_are_not_rotated() {
        let sizes = [(40.0, 10.0), (50.0, 10.0), (30.0, 10.0)];
        assert_eq!(resolve_axis_rotation(&sizes, 50.0, 80.0), 0);
    }

    #[test]
    fn rotation_avoids_overlap() {
        let sizes = vec![(120.0, 10.0); 4];
        let degrees = resolve_axis_rotation(&sizes, 40.0, 60.0);
        assert!(degrees > 0 && degrees <= 90);

        let angle = f64::from(degrees).to_radians();
        let quads: Vec<_> = (0..4)
            .map(|i| {
                let c = rotated_label_center(Point::new(i as f64 * 40.0, 0.0), 120.0, 10.0, angle);
                corners(c, 120.0, 10.0, angle)
            })
            .collect();
        assert!(!quads_intersect(&quads[0], &quads[1]));

        // One degree less overlaps, unless we started at the per-label minimum.
        let start = minimal_rotation(120.0, 10.0, 40.0, 60.0).to_degrees().ceil() as u32;
        if degrees > start {
            let a = f64::from(degrees - 1).to_radians();
            let q0 = corners(rotated_label_center(Point::ZERO, 120.0, 10.0, a), 120.0, 10.0, a);
            let q1 = corners(
                rotated_label_center(Point::new(40.0, 0.0), 120.0, 10.0, a),
                120.0,
                10.0,
                a,
            );
            assert!(quads_intersect(&q0, &q1));
        }
    }

    #[test]
    fn rotation_is_monotone_in_label_length() {
        let style = TextStyle::new(12.0);
        let mut previous = 0;
        for n in 1..40 {
            let text = format!("{:x<n$}", "");
            let grown = LabelBlock::single(&text, &style, &HeuristicTextMeasurer);
            let sizes = [(60.0, 14.4), (grown.width, grown.height), (60.0, 14.4)];
            let degrees = resolve_axis_rotation(&sizes, 70.0, 90.0);
            assert!(degrees >= previous, "{n} chars: {degrees} < {previous}");
            previous = degrees;
        }
        assert!(previous > 0);
    }

    #[test]
    fn font_shrinks_until_the_widest_label_fits() {
        let labels = vec!["1,00".to_string(), "100,00".to_string()];
        let style = TextStyle::new(20.0);
        // 6 chars at 0.6em: fits 60px at 16px.
        let size = fit_font_size(&labels, &style, 60.0, &HeuristicTextMeasurer);
        assert_eq!(size, 16.0);
        // Never below the floor.
        let size = fit_font_size(&labels, &style, 1.0, &HeuristicTextMeasurer);
        assert_eq!(size, MIN_FITTED_FONT_SIZE);
    }

    #[test]
    fn multi_line_marks_stack_along_the_rotated_axis() {
        let block = LabelBlock {
            lines: vec!["a".to_string(), "b".to_string()],
            width: 6.0,
            height: 20.0,
            line_height: 10.0,
        };
        let marks = block.text_marks(
            Point::new(50.0, 50.0),
            0.0,
            &TextStyle::new(10.0),
            &Brush::default(),
        );
        assert_eq!(marks[0].pos, Point::new(50.0, 45.0));
        assert_eq!(marks[1].pos, Point::new(50.0, 55.0));
        assert_eq!(marks[0].angle, 0.0);
    }
}
