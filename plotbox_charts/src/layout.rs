// Copyright 2025 the Plotbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolved chart regions.
//!
//! Every chart family carves the canvas the same way: padding first, then an optional title
//! strip, then the legend, then axis label boxes sized from measured tick labels. What is left
//! is the plot box, and scales map onto exactly that span.

extern crate alloc;

use alloc::vec::Vec;

use kurbo::Rect;
use peniko::Color;
use peniko::color::palette::css;
use plotbox_core::LayoutBox;

use crate::mark::{Mark, StrokeStyle};
use crate::z_order;

/// The boxes a chart was laid out into, all resolved to pixels.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartRegions {
    /// The whole canvas.
    pub canvas: LayoutBox,
    /// The canvas minus outer padding.
    pub chart: LayoutBox,
    /// Where data marks go.
    pub plot: LayoutBox,
    /// The legend footprint, if a legend was drawn.
    pub legend: Option<LayoutBox>,
    /// Horizontal axis label box.
    pub x_axis: Option<LayoutBox>,
    /// Vertical axis label box.
    pub y_axis: Option<LayoutBox>,
    /// Title strip.
    pub title: Option<LayoutBox>,
}

impl ChartRegions {
    /// Outlines every region, each in its own color.
    pub fn debug_marks(&self) -> Vec<Mark> {
        let outlined: [(Option<&LayoutBox>, Color); 7] = [
            (Some(&self.canvas), css::GRAY),
            (Some(&self.chart), css::ORANGE),
            (Some(&self.plot), css::MAGENTA),
            (self.legend.as_ref(), css::RED),
            (self.x_axis.as_ref(), css::BLUE),
            (self.y_axis.as_ref(), css::TEAL),
            (self.title.as_ref(), css::PURPLE),
        ];
        outlined
            .into_iter()
            .filter_map(|(b, color)| b.map(|b| outline(b.to_rect(), color)))
            .collect()
    }
}

/// A one pixel debug outline.
pub(crate) fn outline(rect: Rect, color: Color) -> Mark {
    Mark::outlined_rect(rect, StrokeStyle::solid(color, 1.0)).with_z_index(z_order::DEBUG)
}

/// Splits a strip of `height` pixels off the top of `chart`.
///
/// Returns the strip and the remainder. A non-positive height yields no strip.
pub fn split_top(chart: &LayoutBox, height: f64) -> (Option<LayoutBox>, LayoutBox) {
    if height <= 0.0 {
        return (None, chart.clone());
    }
    let height = height.min(chart.height());
    let strip = LayoutBox::new(&chart.top_left(), &chart.top_right().below_by(height));
    let rest = LayoutBox::new(&strip.bottom_left(), &chart.bottom_right());
    (Some(strip), rest)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use plotbox_core::UnitFactors;

    use super::*;

    #[test]
    fn split_top_keeps_the_remainder_resolved() {
        let env = UnitFactors::for_canvas(200.0, 100.0);
        let chart = LayoutBox::from_rect(Rect::new(10.0, 10.0, 190.0, 90.0)).resolve(&env);
        let (strip, rest) = split_top(&chart, 20.0);
        assert_eq!(strip.unwrap().to_rect(), Rect::new(10.0, 10.0, 190.0, 30.0));
        assert_eq!(rest.to_rect(), Rect::new(10.0, 30.0, 190.0, 90.0));
        assert!(rest.is_resolved());

        let (none, same) = split_top(&chart, 0.0);
        assert!(none.is_none());
        assert_eq!(same, chart);
    }

    #[test]
    fn debug_marks_skip_missing_regions() {
        let b = LayoutBox::from_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        let regions = ChartRegions {
            canvas: b.clone(),
            chart: b.clone(),
            plot: b,
            ..ChartRegions::default()
        };
        let marks = regions.debug_marks();
        assert_eq!(marks.len(), 3);
        assert!(marks.iter().all(|m| m.z_index == z_order::DEBUG));
    }
}
