// Copyright 2025 the Plotbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Legend layout.
//!
//! A legend is packed into rows of `marker + gap + label` entries before any other region is
//! allocated, because its height decides how much room the plot gets. Marker geometry is
//! derived from the label font's ascent so legends scale with the text.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect, Vec2};
use peniko::Brush;
use peniko::color::palette::css;
use plotbox_text::{TextMeasurer, TextStyle};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;
use crate::mark::{Mark, StrokeStyle, TextAnchor, TextBaseline, TextMark};
use crate::symbol::Symbol;
use crate::z_order;

/// The sample drawn in front of a legend label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LegendMarker {
    /// A filled square.
    Box,
    /// A short horizontal line stroked with the entry color.
    Line,
    /// A point symbol.
    Shape(Symbol),
}

/// One legend entry.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
    /// Sample style.
    pub marker: LegendMarker,
    /// Sample color.
    pub fill: Brush,
    /// Optional sample outline.
    pub stroke: Option<Brush>,
    /// Label text.
    pub label: String,
}

impl LegendEntry {
    /// Creates an entry without an outline.
    pub fn new(marker: LegendMarker, fill: impl Into<Brush>, label: impl Into<String>) -> Self {
        Self {
            marker,
            fill: fill.into(),
            stroke: None,
            label: label.into(),
        }
    }

    /// Sets the sample outline.
    pub fn with_stroke(mut self, stroke: impl Into<Brush>) -> Self {
        self.stroke = Some(stroke.into());
        self
    }
}

/// Horizontal alignment of legend rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LegendAlign {
    /// Rows start at the left edge.
    Left,
    /// Rows are centered.
    #[default]
    Center,
    /// Rows end at the right edge.
    Right,
}

impl LegendAlign {
    /// Parses `left`, `center` or `right`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

/// Which side of the plot the legend occupies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LegendPosition {
    /// Above the plot.
    Top,
    /// Below the plot.
    #[default]
    Bottom,
    /// Left of the plot.
    Left,
    /// Right of the plot.
    Right,
}

impl LegendPosition {
    /// Parses `top`, `bottom`, `left` or `right`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    /// Whether entries stack in a column.
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// Ratios that derive legend geometry from the label font.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LegendMetrics {
    /// Marker size relative to the label ascent.
    pub sample: f64,
    /// Marker vertical offset relative to the label ascent.
    pub sample_offset: f64,
    /// Gap between marker and label relative to the marker height.
    pub label_gap: f64,
    /// Line marker stroke width relative to the label ascent.
    pub line_stroke: f64,
    /// Spacing before a non-first entry of a row, relative to the entry height.
    pub entry_spacing: f64,
    /// Row pitch relative to the tallest entry.
    pub row_pitch: f64,
}

impl Default for LegendMetrics {
    fn default() -> Self {
        Self {
            sample: 0.65,
            sample_offset: 0.35 * 5.0 / 8.0,
            label_gap: 0.45,
            line_stroke: 0.05,
            entry_spacing: 1.25,
            row_pitch: 2.0,
        }
    }
}

/// Legend layout inputs.
#[derive(Clone, Debug)]
pub struct LegendLayout {
    entries: Vec<LegendEntry>,
    budget: f64,
    text_style: TextStyle,
    text_fill: Brush,
    align: LegendAlign,
    position: LegendPosition,
    one_item_per_row: bool,
    fixed_cross_size: Option<f64>,
    anchor_bottom: bool,
    metrics: LegendMetrics,
}

impl LegendLayout {
    /// Creates a bottom, centered legend with the given width budget.
    pub fn new(budget: f64, text_style: TextStyle) -> Self {
        Self {
            entries: Vec::new(),
            budget: budget.max(0.0),
            text_style,
            text_fill: css::BLACK.into(),
            align: LegendAlign::Center,
            position: LegendPosition::Bottom,
            one_item_per_row: false,
            fixed_cross_size: None,
            anchor_bottom: false,
            metrics: LegendMetrics::default(),
        }
    }

    /// Sets the entries.
    pub fn with_entries(mut self, entries: impl IntoIterator<Item = LegendEntry>) -> Self {
        self.entries = entries.into_iter().collect();
        self
    }

    /// Sets the label color.
    pub fn with_text_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.text_fill = fill.into();
        self
    }

    /// Sets the row alignment.
    pub fn with_align(mut self, align: LegendAlign) -> Self {
        self.align = align;
        self
    }

    /// Sets the legend side.
    pub fn with_position(mut self, position: LegendPosition) -> Self {
        self.position = position;
        self
    }

    /// Puts every entry on its own row.
    pub fn with_one_item_per_row(mut self, one_item_per_row: bool) -> Self {
        self.one_item_per_row = one_item_per_row;
        self
    }

    /// Minimum width of a left/right legend.
    pub fn with_fixed_cross_size(mut self, size: Option<f64>) -> Self {
        self.fixed_cross_size = size;
        self
    }

    /// Offsets the rows of a vertical legend by one row pitch.
    pub fn with_anchor_bottom(mut self, anchor_bottom: bool) -> Self {
        self.anchor_bottom = anchor_bottom;
        self
    }

    /// Overrides the geometry ratios.
    pub fn with_metrics(mut self, metrics: LegendMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Measures and packs the entries.
    pub fn layout(&self, measurer: &dyn TextMeasurer) -> Legend {
        let m = &self.metrics;
        let vertical = self.position.is_vertical();

        let measured: Vec<PlacedEntry> = self
            .entries
            .iter()
            .map(|entry| self.measure_entry(entry, measurer))
            .collect();

        if measured.is_empty() {
            return Legend {
                width: if vertical { 0.0 } else { self.budget },
                height: 0.0,
                rows: 0,
                entries: measured,
                text_style: self.text_style.clone(),
                text_fill: self.text_fill.clone(),
            };
        }

        // Greedy row packing; x is relative to the row start for now.
        let mut rows: Vec<Vec<usize>> = alloc::vec![Vec::new()];
        let mut row_widths: Vec<f64> = alloc::vec![0.0];
        let mut placed = measured;
        for (i, entry) in placed.iter_mut().enumerate() {
            let row = rows.len() - 1;
            let current = row_widths[row];
            let mut spacing = if current == 0.0 {
                0.0
            } else {
                (entry.height * m.entry_spacing).ceil()
            };
            let force_break = self.one_item_per_row || vertical;
            if !rows[row].is_empty()
                && (force_break || current + spacing + entry.width > self.budget)
            {
                rows.push(Vec::new());
                row_widths.push(0.0);
                spacing = 0.0;
            }
            let row = rows.len() - 1;
            entry.x = row_widths[row] + spacing;
            row_widths[row] += spacing + entry.width;
            rows[row].push(i);
        }

        let widest = row_widths.iter().copied().fold(0.0, f64::max);
        let width = if vertical {
            widest.max(self.fixed_cross_size.unwrap_or(0.0))
        } else {
            self.budget
        };
        let justify = if vertical {
            0.0
        } else {
            (self.budget - widest) * 0.5
        };

        let tallest = placed.iter().map(|e| e.height).fold(0.0, f64::max);
        let pitch = (tallest * m.row_pitch).ceil();
        let offset_rows = usize::from(vertical && self.anchor_bottom);

        for (r, row) in rows.iter().enumerate() {
            let row_width = row_widths[r];
            let start = match self.align {
                LegendAlign::Center => (width - row_width) * 0.5,
                LegendAlign::Left => justify,
                LegendAlign::Right => width - row_width - justify,
            };
            let y = pitch * (r + offset_rows) as f64;
            for &i in row {
                placed[i].x += start;
                placed[i].y = y;
            }
        }

        let height = pitch * (rows.len() + offset_rows) as f64;
        log::debug!(
            "legend: {} entries in {} rows, {width}x{height}",
            placed.len(),
            rows.len()
        );
        Legend {
            width,
            height,
            rows: rows.len(),
            entries: placed,
            text_style: self.text_style.clone(),
            text_fill: self.text_fill.clone(),
        }
    }

    fn measure_entry(&self, entry: &LegendEntry, measurer: &dyn TextMeasurer) -> PlacedEntry {
        let m = &self.metrics;
        let tm = measurer.measure(&entry.label, self.text_style.clone());
        let ascent = tm.ascent;
        let size = (m.sample * ascent).ceil();
        let marker_y = (m.sample_offset * ascent).floor();
        let (marker_w, marker_h) = match entry.marker {
            LegendMarker::Line => (size, ascent),
            LegendMarker::Box | LegendMarker::Shape(_) => (size, size),
        };
        let gap = (m.label_gap * marker_h).round();
        PlacedEntry {
            entry: entry.clone(),
            x: 0.0,
            y: 0.0,
            width: marker_w + gap + tm.advance_width,
            height: marker_h.max(tm.height()),
            marker: Rect::new(0.0, marker_y, marker_w, marker_y + marker_h),
            line_width: m.line_stroke * ascent,
            text_pos: Point::new(marker_w + gap, ascent),
        }
    }
}

/// An entry with its position inside the legend.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedEntry {
    /// The entry.
    pub entry: LegendEntry,
    /// Left edge relative to the legend origin.
    pub x: f64,
    /// Top edge relative to the legend origin.
    pub y: f64,
    /// Entry width.
    pub width: f64,
    /// Entry height.
    pub height: f64,
    /// Marker box relative to the entry origin.
    pub marker: Rect,
    /// Stroke width of line markers.
    pub line_width: f64,
    /// Label baseline start relative to the entry origin.
    pub text_pos: Point,
}

impl PlacedEntry {
    /// Entry bounds relative to the legend origin.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

/// A laid-out legend.
#[derive(Clone, Debug, PartialEq)]
pub struct Legend {
    /// Footprint width.
    pub width: f64,
    /// Footprint height.
    pub height: f64,
    /// Number of rows.
    pub rows: usize,
    /// Entries in input order.
    pub entries: Vec<PlacedEntry>,
    text_style: TextStyle,
    text_fill: Brush,
}

impl Legend {
    /// A legend with no entries and no footprint.
    pub fn empty() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            rows: 0,
            entries: Vec::new(),
            text_style: TextStyle::default(),
            text_fill: css::BLACK.into(),
        }
    }

    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Marker and label marks with the legend's top-left corner at `origin`.
    pub fn marks(&self, origin: Point) -> Vec<Mark> {
        let mut out = Vec::with_capacity(self.entries.len() * 2);
        for placed in &self.entries {
            let base = origin.to_vec2() + Vec2::new(placed.x, placed.y);
            let r = placed.marker + base;
            let entry = &placed.entry;
            let marker = match entry.marker {
                LegendMarker::Box => {
                    let mut mark = Mark::filled_rect(r, entry.fill.clone());
                    if let Some(stroke) = &entry.stroke {
                        mark = mark.with_stroke(StrokeStyle::solid(stroke.clone(), 1.0));
                    }
                    mark
                }
                LegendMarker::Line => {
                    let y = r.center().y;
                    Mark::line(
                        Point::new(r.x0, y),
                        Point::new(r.x1, y),
                        StrokeStyle::solid(entry.fill.clone(), placed.line_width),
                    )
                }
                LegendMarker::Shape(symbol) => {
                    let c = r.center();
                    let mut mark =
                        Mark::path(symbol.path(c.x, c.y, r.width())).with_fill(entry.fill.clone());
                    if let Some(stroke) = &entry.stroke {
                        mark = mark.with_stroke(StrokeStyle::solid(stroke.clone(), 1.0));
                    }
                    mark
                }
            };
            out.push(marker.with_z_index(z_order::LEGEND_SWATCHES));
            out.push(
                Mark::text(
                    TextMark::new(
                        placed.text_pos + base,
                        entry.label.clone(),
                        self.text_style.clone(),
                    )
                    .with_fill(self.text_fill.clone())
                    .with_align(TextAnchor::Start, TextBaseline::Alphabetic),
                )
                .with_z_index(z_order::LEGEND_LABELS),
            );
        }
        out
    }

    /// Outlines of the legend footprint and each entry.
    pub fn debug_marks(&self, origin: Point) -> Vec<Mark> {
        let offset = origin.to_vec2();
        let mut out = Vec::with_capacity(self.entries.len() + 1);
        out.push(
            Mark::outlined_rect(
                Rect::new(0.0, 0.0, self.width, self.height) + offset,
                StrokeStyle::solid(css::RED, 1.0),
            )
            .with_z_index(z_order::DEBUG),
        );
        for placed in &self.entries {
            out.push(
                Mark::outlined_rect(placed.bounds() + offset, StrokeStyle::solid(css::LIME, 1.0))
                    .with_z_index(z_order::DEBUG),
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec::Vec;

    use plotbox_text::HeuristicTextMeasurer;

    use super::*;
    use crate::mark::Shape;

    fn entries(labels: &[&str], marker: LegendMarker) -> Vec<LegendEntry> {
        labels
            .iter()
            .map(|l| LegendEntry::new(marker, css::STEEL_BLUE, *l))
            .collect()
    }

    // At 10px: ascent 8, marker 6, gap 3; "A" is 6px wide, so every entry is 15×10 and the
    // spacing between entries is 13.

    #[test]
    fn entries_pack_into_the_fewest_rows() {
        let style = TextStyle::new(10.0);
        let wide = LegendLayout::new(100.0, style.clone())
            .with_entries(entries(&["A", "A", "A"], LegendMarker::Box))
            .layout(&HeuristicTextMeasurer);
        assert_eq!(wide.rows, 1);
        assert_eq!(wide.width, 100.0);
        assert_eq!(wide.height, 20.0);
        // One row of 71px centered in 100px.
        assert_eq!(wide.entries[0].x, 14.5);
        assert_eq!(wide.entries[2].x, 14.5 + 56.0);

        let narrow = LegendLayout::new(50.0, style)
            .with_entries(entries(&["A", "A", "A"], LegendMarker::Box))
            .layout(&HeuristicTextMeasurer);
        assert_eq!(narrow.rows, 2);
        assert_eq!(narrow.height, 40.0);
        assert_eq!(narrow.entries[2].y, 20.0);
    }

    #[test]
    fn one_item_per_row_stacks_entries() {
        let legend = LegendLayout::new(500.0, TextStyle::new(10.0))
            .with_entries(entries(&["a", "b", "c"], LegendMarker::Shape(Symbol::Star)))
            .with_one_item_per_row(true)
            .layout(&HeuristicTextMeasurer);
        assert_eq!(legend.rows, 3);
        assert_eq!(legend.height, 60.0);
        let ys: Vec<f64> = legend.entries.iter().map(|e| e.y).collect();
        assert_eq!(ys, [0.0, 20.0, 40.0]);
    }

    #[test]
    fn empty_legend_has_no_height() {
        let horizontal =
            LegendLayout::new(300.0, TextStyle::new(10.0)).layout(&HeuristicTextMeasurer);
        assert_eq!((horizontal.width, horizontal.height), (300.0, 0.0));
        assert!(horizontal.marks(Point::ZERO).is_empty());

        let vertical = LegendLayout::new(300.0, TextStyle::new(10.0))
            .with_position(LegendPosition::Right)
            .layout(&HeuristicTextMeasurer);
        assert_eq!((vertical.width, vertical.height), (0.0, 0.0));
    }

    #[test]
    fn left_alignment_justifies_the_row_block() {
        let legend = LegendLayout::new(100.0, TextStyle::new(10.0))
            .with_entries(entries(&["A", "AAAAAA"], LegendMarker::Box))
            .with_align(LegendAlign::Left)
            .with_one_item_per_row(true)
            .layout(&HeuristicTextMeasurer);
        // Widest row is 9 + 36 = 45; the block is centered, rows share its left edge.
        assert_eq!(legend.entries[0].x, 27.5);
        assert_eq!(legend.entries[1].x, 27.5);
    }

    #[test]
    fn vertical_legends_size_to_content() {
        let legend = LegendLayout::new(400.0, TextStyle::new(10.0))
            .with_entries(entries(&["A", "AAAAAA"], LegendMarker::Line))
            .with_position(LegendPosition::Left)
            .with_align(LegendAlign::Left)
            .with_fixed_cross_size(Some(30.0))
            .with_anchor_bottom(true)
            .layout(&HeuristicTextMeasurer);
        // Line markers are 6×8 with a 4px gap: 6 + 4 + 36 = 46.
        assert_eq!(legend.width, 46.0);
        assert_eq!(legend.rows, 2);
        assert_eq!(legend.entries[0].y, 20.0);
        assert_eq!(legend.height, 60.0);
    }

    #[test]
    fn marks_are_offset_by_the_origin() {
        let legend = LegendLayout::new(100.0, TextStyle::new(10.0))
            .with_entries(entries(&["A"], LegendMarker::Box))
            .layout(&HeuristicTextMeasurer);
        let marks = legend.marks(Point::new(10.0, 100.0));
        assert_eq!(marks.len(), 2);
        let Shape::Rect { rect, .. } = &marks[0].shape else {
            panic!("expected a rect swatch");
        };
        // Marker y offset is floor(0.21875 * 8) = 1.
        assert_eq!(*rect, Rect::new(52.5, 101.0, 58.5, 107.0));
        let text = marks[1].as_text().unwrap();
        assert_eq!(text.pos, Point::new(61.5, 108.0));
        assert_eq!(legend.debug_marks(Point::ZERO).len(), 2);
    }

    #[test]
    fn packed_rows_never_exceed_the_budget() {
        // Box entries are 9 + 6n wide for an n-letter label, so the widest (n = 8) is 57.
        let labels: Vec<std::string::String> = (0..40)
            .map(|i| "A".repeat(1 + (i * 7 + i / 3) % 8))
            .collect();
        let labels: Vec<&str> = labels.iter().map(|l| l.as_str()).collect();
        for budget in [60.0, 97.0, 150.0, 333.0, 800.0] {
            for align in [LegendAlign::Left, LegendAlign::Center, LegendAlign::Right] {
                let legend = LegendLayout::new(budget, TextStyle::new(10.0))
                    .with_entries(entries(&labels, LegendMarker::Box))
                    .with_align(align)
                    .layout(&HeuristicTextMeasurer);
                assert_eq!(legend.entries.len(), labels.len());
                let mut rows = 0;
                let mut last_y = f64::NEG_INFINITY;
                let mut last_right = 0.0;
                for e in &legend.entries {
                    if e.y > last_y {
                        rows += 1;
                        last_y = e.y;
                    } else {
                        assert!(e.x >= last_right, "{budget} {align:?}: entries overlap");
                    }
                    assert!(e.x >= -1e-9, "{budget} {align:?}: {} starts left", e.x);
                    assert!(
                        e.x + e.width <= budget + 1e-9,
                        "{budget} {align:?}: row ends at {}",
                        e.x + e.width
                    );
                    last_right = e.x + e.width;
                }
                assert_eq!(rows, legend.rows);
                assert!(legend.width <= budget);
            }
        }
    }
}
