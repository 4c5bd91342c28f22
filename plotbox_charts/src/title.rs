// Copyright 2025 the Plotbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart titles.
//!
//! A title reserves a strip at the top of the chart box before anything else is sized. The
//! strip holds the bold title line and, below it, an optional smaller subtitle line.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use peniko::Color;
use plotbox_text::{FontWeight, TextMeasurer, TextStyle};

use crate::mark::{Mark, TextAnchor, TextBaseline, TextMark};
use crate::z_order;

/// Subtitle size relative to the title size.
const SUBTITLE_SCALE: f64 = 0.8;

/// A chart title with an optional subtitle.
#[derive(Clone, Debug, PartialEq)]
pub struct Title {
    /// Title text.
    pub text: String,
    /// Subtitle text.
    pub subtitle: Option<String>,
    /// Title font; the subtitle uses the same family at a smaller, regular weight.
    pub style: TextStyle,
    /// Text color.
    pub fill: Color,
}

impl Title {
    /// Creates a bold title.
    pub fn new(text: impl Into<String>, style: TextStyle, fill: Color) -> Self {
        Self {
            text: text.into(),
            subtitle: None,
            style: style.with_weight(FontWeight::BOLD),
            fill,
        }
    }

    /// Sets the subtitle text.
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Padding above and below the text block.
    fn padding(&self) -> f64 {
        0.3 * self.style.font_size
    }

    fn subtitle_style(&self) -> TextStyle {
        self.style
            .clone()
            .with_font_size(self.style.font_size * SUBTITLE_SCALE)
            .with_weight(FontWeight::NORMAL)
    }

    /// The text lines top to bottom, with their styles and heights.
    fn lines(&self, measurer: &dyn TextMeasurer) -> Vec<(String, TextStyle, f64)> {
        let mut lines = Vec::with_capacity(2);
        let h = measurer.measure(&self.text, self.style.clone()).line_height();
        lines.push((self.text.clone(), self.style.clone(), h));
        if let Some(sub) = &self.subtitle {
            let style = self.subtitle_style();
            let h = measurer.measure(sub, style.clone()).line_height();
            lines.push((sub.clone(), style, h));
        }
        lines
    }

    /// Height of the strip this title needs.
    pub fn height(&self, measurer: &dyn TextMeasurer) -> f64 {
        let pad = self.padding();
        let lines = self.lines(measurer);
        let gaps = (lines.len() - 1) as f64 * pad / 3.0;
        2.0 * pad + gaps + lines.iter().map(|(_, _, h)| h).sum::<f64>()
    }

    /// Text marks centered horizontally in `strip`, stacked from its top.
    pub fn marks(&self, measurer: &dyn TextMeasurer, strip: Rect) -> Vec<Mark> {
        let pad = self.padding();
        let x = strip.center().x;
        let mut y = strip.y0 + pad;
        let mut marks = Vec::new();
        for (text, style, h) in self.lines(measurer) {
            let mark = TextMark::new(Point::new(x, y), text, style)
                .with_fill(self.fill)
                .with_align(TextAnchor::Middle, TextBaseline::Top);
            marks.push(Mark::text(mark).with_z_index(z_order::TITLES));
            y += h + pad / 3.0;
        }
        marks
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use peniko::color::palette::css;
    use plotbox_text::HeuristicTextMeasurer;

    use super::*;

    #[test]
    fn subtitle_stacks_below_the_title() {
        let m = HeuristicTextMeasurer;
        let title = Title::new("Sales", TextStyle::new(20.0), css::BLACK);
        // 6px padding above and below a 20px line.
        assert_eq!(title.height(&m), 32.0);

        let title = title.with_subtitle("by quarter");
        let h = title.height(&m);
        assert_eq!(h, 32.0 + 2.0 + 16.0);

        let marks = title.marks(&m, Rect::new(0.0, 10.0, 200.0, 10.0 + h));
        let texts: std::vec::Vec<_> = marks.iter().filter_map(Mark::as_text).collect();
        assert_eq!(texts.len(), 2);
        assert_eq!(texts[0].pos, Point::new(100.0, 16.0));
        assert_eq!(texts[0].style.font_weight, FontWeight::BOLD);
        assert_eq!(texts[1].pos, Point::new(100.0, 38.0));
        assert_eq!(texts[1].style.font_weight, FontWeight::NORMAL);
    }
}
