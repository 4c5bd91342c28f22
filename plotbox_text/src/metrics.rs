// Copyright 2025 the Plotbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The measurement interface and a font-free fallback.

use crate::TextStyle;

/// Measures single lines of text.
///
/// Layout calls this before producing any marks, so implementations must be deterministic
/// for a given `(text, style)` pair. Line breaks are not interpreted.
pub trait TextMeasurer {
    /// Extents of `text` set on one line in `style`.
    fn measure(&self, text: &str, style: TextStyle) -> TextMetrics;
}

/// Extents of one line of text, in pixels, relative to its baseline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextMetrics {
    /// Horizontal advance of the whole line.
    pub advance_width: f64,
    /// Height above the baseline.
    pub ascent: f64,
    /// Depth below the baseline.
    pub descent: f64,
    /// Extra spacing between consecutive lines.
    pub leading: f64,
}

impl TextMetrics {
    /// Ink height: `ascent + descent`.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.ascent + self.descent
    }

    /// Distance between baselines of stacked lines.
    #[must_use]
    pub fn line_height(&self) -> f64 {
        self.height() + self.leading
    }
}

/// Metrics from fixed em ratios, for servers without fonts and for tests.
///
/// Every character advances `0.6em`; ascent is `0.8em` and descent `0.2em`.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl HeuristicTextMeasurer {
    const ADVANCE_EM: f64 = 0.6;
    const ASCENT_EM: f64 = 0.8;
    const DESCENT_EM: f64 = 0.2;
}

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, style: TextStyle) -> TextMetrics {
        let em = style.font_size;
        TextMetrics {
            advance_width: Self::ADVANCE_EM * em * text.chars().count() as f64,
            ascent: Self::ASCENT_EM * em,
            descent: Self::DESCENT_EM * em,
            leading: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn heuristic_metrics_are_em_proportional() {
        let m = HeuristicTextMeasurer.measure("abcd", TextStyle::new(10.0));
        assert_eq!(m.advance_width, 24.0);
        assert_eq!(m.ascent, 8.0);
        assert_eq!(m.height(), 10.0);
        assert_eq!(m.line_height(), m.height());
    }
}
