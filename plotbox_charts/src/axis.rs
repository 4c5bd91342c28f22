// Copyright 2025 the Plotbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis mark generation.
//!
//! Axes are measured first (their label extents decide how much room the plot box gets) and
//! arranged once the plot box is known. Tick positions are already in pixels by then.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use peniko::color::palette::css;
use peniko::{Brush, Color};
use plotbox_text::{TextMeasurer, TextStyle};

use crate::format::{NumberFormatSpec, NumberFormatter};
use crate::mark::{Mark, StrokeStyle, TextAnchor, TextBaseline, TextMark};
use crate::z_order;

/// Default rule color.
pub const RULE_COLOR: Color = Color::from_rgb8(0x33, 0x44, 0x55);
/// Default tick label color.
pub const LABEL_COLOR: Color = Color::from_rgb8(0x11, 0x11, 0x11);

/// Axis styling.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisStyle {
    /// Style for the axis line, ticks and value grid lines.
    pub rule: StrokeStyle,
    /// Fill paint for tick labels.
    pub label_fill: Brush,
    /// Tick label font.
    pub label_style: TextStyle,
    /// Tick length; labels sit two tick lengths away from their axis.
    pub tick_length: f64,
}

impl AxisStyle {
    /// Dark slate rules, near-black labels.
    pub fn new(label_style: TextStyle, tick_length: f64) -> Self {
        Self {
            rule: StrokeStyle::solid(RULE_COLOR, 1.0),
            label_fill: LABEL_COLOR.into(),
            label_style,
            tick_length,
        }
    }

    /// Sets the rule style.
    pub fn with_rule(mut self, rule: StrokeStyle) -> Self {
        self.rule = rule;
        self
    }

    /// Sets the label fill.
    pub fn with_label_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.label_fill = fill.into();
        self
    }
}

impl Default for AxisStyle {
    fn default() -> Self {
        Self::new(TextStyle::default(), 6.0).with_label_fill(css::BLACK)
    }
}

/// Where a horizontal axis sits relative to the plot box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AxisSide {
    /// Above the plot; labels grow upwards.
    Top,
    /// Below the plot; labels grow downwards.
    #[default]
    Bottom,
}

impl AxisSide {
    /// Parses `top` / `bottom`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            _ => None,
        }
    }

    fn direction(self) -> f64 {
        match self {
            Self::Top => -1.0,
            Self::Bottom => 1.0,
        }
    }
}

/// One tick, positioned in pixels along its axis.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisTick {
    /// Pixel coordinate along the axis (x for horizontal axes, y for vertical ones).
    pub pos: f64,
    /// Label text.
    pub label: String,
}

impl AxisTick {
    /// Formats `values` and maps them to pixels with `map`.
    pub fn formatted(
        values: &[f64],
        map: impl Fn(f64) -> f64,
        formatter: &dyn NumberFormatter,
        spec: &NumberFormatSpec,
    ) -> Vec<Self> {
        values
            .iter()
            .map(|&v| Self {
                pos: map(v),
                label: formatter.format(v, spec),
            })
            .collect()
    }
}

/// Width of the widest label.
pub fn max_label_width<S: AsRef<str>>(
    labels: &[S],
    style: &TextStyle,
    measurer: &dyn TextMeasurer,
) -> f64 {
    labels
        .iter()
        .map(|l| measurer.measure(l.as_ref(), style.clone()).advance_width)
        .fold(0.0, f64::max)
}

/// Ink height (ascent plus descent) of the tallest label.
pub fn max_label_height<S: AsRef<str>>(
    labels: &[S],
    style: &TextStyle,
    measurer: &dyn TextMeasurer,
) -> f64 {
    labels
        .iter()
        .map(|l| measurer.measure(l.as_ref(), style.clone()).height())
        .fold(0.0, f64::max)
}

/// Width a vertical value axis needs: widest label plus two tick lengths.
pub fn value_axis_width(ticks: &[AxisTick], style: &AxisStyle, measurer: &dyn TextMeasurer) -> f64 {
    let labels: Vec<&str> = ticks.iter().map(|t| t.label.as_str()).collect();
    max_label_width(&labels, &style.label_style, measurer) + 2.0 * style.tick_length
}

/// Height a horizontal axis needs: tallest label plus two tick lengths.
pub fn horizontal_axis_height(
    ticks: &[AxisTick],
    style: &AxisStyle,
    measurer: &dyn TextMeasurer,
) -> f64 {
    let labels: Vec<&str> = ticks.iter().map(|t| t.label.as_str()).collect();
    max_label_height(&labels, &style.label_style, measurer) + 2.0 * style.tick_length
}

/// Grid lines and right-aligned labels of a vertical value axis.
///
/// Each line runs from one tick length left of `label_right` across to `plot_right`; labels
/// end two tick lengths left of `label_right`. Ticks strictly inside `hidden` (a `(top, bottom)`
/// band) are skipped entirely.
pub fn value_axis_marks(
    ticks: &[AxisTick],
    label_right: f64,
    plot_right: f64,
    style: &AxisStyle,
    hidden: Option<(f64, f64)>,
) -> Vec<Mark> {
    let mut out = Vec::with_capacity(ticks.len() * 2);
    for tick in ticks {
        if hidden.is_some_and(|(top, bottom)| tick.pos > top && tick.pos < bottom) {
            continue;
        }
        out.push(
            Mark::line(
                Point::new(label_right - style.tick_length, tick.pos),
                Point::new(plot_right, tick.pos),
                style.rule.clone(),
            )
            .with_z_index(z_order::GRID_LINES),
        );
        out.push(
            Mark::text(
                TextMark::new(
                    Point::new(label_right - 2.0 * style.tick_length, tick.pos),
                    tick.label.clone(),
                    style.label_style.clone(),
                )
                .with_fill(style.label_fill.clone())
                .with_align(TextAnchor::End, TextBaseline::Middle),
            )
            .with_z_index(z_order::AXIS_LABELS),
        );
    }
    out
}

/// Axis line, ticks and centered labels of a horizontal axis along the `side` edge of `plot`.
pub fn horizontal_axis_marks(
    ticks: &[AxisTick],
    plot: Rect,
    side: AxisSide,
    style: &AxisStyle,
) -> Vec<Mark> {
    let y = match side {
        AxisSide::Top => plot.y0,
        AxisSide::Bottom => plot.y1,
    };
    let dir = side.direction();
    let baseline = match side {
        AxisSide::Top => TextBaseline::Bottom,
        AxisSide::Bottom => TextBaseline::Top,
    };

    let mut out = Vec::with_capacity(ticks.len() * 2 + 1);
    out.push(
        Mark::line(
            Point::new(plot.x0, y),
            Point::new(plot.x1, y),
            style.rule.clone(),
        )
        .with_z_index(z_order::AXIS_RULES),
    );
    for tick in ticks {
        out.push(
            Mark::line(
                Point::new(tick.pos, y),
                Point::new(tick.pos, y + dir * style.tick_length),
                style.rule.clone(),
            )
            .with_z_index(z_order::AXIS_RULES),
        );
        out.push(
            Mark::text(
                TextMark::new(
                    Point::new(tick.pos, y + dir * 2.0 * style.tick_length),
                    tick.label.clone(),
                    style.label_style.clone(),
                )
                .with_fill(style.label_fill.clone())
                .with_align(TextAnchor::Middle, baseline),
            )
            .with_z_index(z_order::AXIS_LABELS),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::string::ToString;

    use plotbox_text::HeuristicTextMeasurer;

    use super::*;
    use crate::format::BasicNumberFormatter;

    fn ticks(pos: &[f64]) -> Vec<AxisTick> {
        pos.iter()
            .map(|&p| AxisTick {
                pos: p,
                label: p.to_string(),
            })
            .collect()
    }

    #[test]
    fn formatted_ticks_are_mapped_and_labeled() {
        let t = AxisTick::formatted(
            &[0.0, 50.0],
            |v| 100.0 - v,
            &BasicNumberFormatter,
            &NumberFormatSpec::default(),
        );
        assert_eq!(t[1].pos, 50.0);
        assert_eq!(t[1].label, "50,00");
    }

    #[test]
    fn value_axis_width_includes_two_ticks() {
        let style = AxisStyle::new(TextStyle::new(10.0), 5.0);
        let w = value_axis_width(&ticks(&[1.0, 100.0]), &style, &HeuristicTextMeasurer);
        assert_eq!(w, 18.0 + 10.0);
    }

    #[test]
    fn hidden_band_skips_inner_ticks_only() {
        let style = AxisStyle::default();
        let band = Some((20.0, 30.0));
        let marks = value_axis_marks(&ticks(&[10.0, 20.0, 30.0]), 50.0, 200.0, &style, band);
        // The tick at 20 sits on the band edge and survives; nothing is strictly inside.
        assert_eq!(marks.len(), 6);
        let marks = value_axis_marks(&ticks(&[10.0, 25.0]), 50.0, 200.0, &style, band);
        assert_eq!(marks.len(), 2);
        assert_eq!(marks[0].bounds(), Some(Rect::new(44.0, 10.0, 200.0, 10.0)));
        let label = marks[1].as_text().unwrap();
        assert_eq!(label.pos, Point::new(38.0, 10.0));
        assert_eq!(label.anchor, TextAnchor::End);
    }

    #[test]
    fn top_axis_ticks_point_up() {
        let style = AxisStyle::new(TextStyle::new(10.0), 4.0);
        let plot = Rect::new(0.0, 50.0, 100.0, 150.0);
        let marks = horizontal_axis_marks(&ticks(&[25.0]), plot, AxisSide::Top, &style);
        assert_eq!(marks.len(), 3);
        let label = marks[2].as_text().unwrap();
        assert_eq!(label.pos, Point::new(25.0, 42.0));
        assert_eq!(label.baseline, TextBaseline::Bottom);
        assert_eq!(marks[1].bounds(), Some(Rect::new(25.0, 46.0, 25.0, 50.0)));
    }
}
