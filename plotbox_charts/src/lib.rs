// Copyright 2025 the Plotbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart layout for pie, bar, scatter and timeline charts.
//!
//! A render takes a [`ChartRequest`] (chart configuration, field aliases and data rows, as
//! deserialized from the JSON a client posts) and produces a [`ChartOutput`]:
//! - the resolved regions of the chart (chart box, plot box, legend, axis label boxes), and
//! - an ordered list of [`Mark`]s that any [`Painter`] can replay.
//!
//! Geometry is derived through `plotbox_core` boxes and positions; text is sized through an
//! injected [`plotbox_text::TextMeasurer`], so layout never depends on a particular renderer.
//!
//! ```
//! use plotbox_charts::{ChartKind, ChartRequest, RenderContext, render};
//! use plotbox_text::HeuristicTextMeasurer;
//!
//! let request: ChartRequest = serde_json::from_str(
//!     r#"{"chart": {"width": 400, "height": 300}, "data": [{"value": 1}, {"value": 2}]}"#,
//! )
//! .unwrap();
//! let output = render(ChartKind::Pie, &request, &RenderContext::new(&HeuristicTextMeasurer))
//!     .unwrap();
//! assert!(!output.marks.is_empty());
//! ```

#![no_std]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

mod axis;
mod bar;
mod config;
mod data;
mod error;
#[cfg(not(feature = "std"))]
mod float;
mod format;
mod labels;
mod layout;
mod legend;
mod mark;
mod pie;
mod render;
#[cfg(test)]
mod render_tests;
mod scale;
mod scatter;
mod symbol;
mod time;
mod timeline;
mod title;
mod z_order;

pub use axis::{
    AxisSide, AxisStyle, AxisTick, LABEL_COLOR, RULE_COLOR, horizontal_axis_height,
    horizontal_axis_marks, max_label_height, max_label_width, value_axis_marks,
    value_axis_width,
};
pub use bar::{BarLayout, last_group_correction};
pub use config::{
    AxisConfig, AxisOptions, ChartConfig, ChartRequest, DebugConfig, DimensionSpec, OneOrMany,
};
pub use data::{Accessor, Meta, MetaValue, Row, Value};
pub use error::RenderError;
pub use format::{BasicNumberFormatter, NumberFormatSpec, NumberFormatter, NumberStyle};
pub use labels::{
    LabelBlock, MIN_FITTED_FONT_SIZE, fit_font_size, label_outline, minimal_rotation,
    resolve_axis_rotation, rotated_extent, rotated_label_center,
};
pub use layout::{ChartRegions, split_top};
pub use legend::{
    Legend, LegendAlign, LegendEntry, LegendLayout, LegendMarker, LegendMetrics, LegendPosition,
    PlacedEntry,
};
pub use mark::{Mark, Painter, Shape, StrokeStyle, TextAnchor, TextBaseline, TextMark};
pub use pie::{PieLayout, PieSlice, arc_path, label_alignment, pie_slices};
pub use render::{
    ChartDetails, ChartKind, ChartOutput, DEFAULT_HEIGHT, DEFAULT_WIDTH, RenderContext,
    RenderOptions, render,
};
pub use scale::{ScaleBand, ScaleLinear, padded_extent, tick_increment, ticks};
pub use scatter::ScatterLayout;
pub use symbol::Symbol;
pub use time::{
    CalendarTicks, DEFAULT_MONTHS, TimeInterval, TimeTickGenerator, TimeTicks, date_label,
};
pub use timeline::{TimelineLayout, broken_line};
pub use title::Title;
pub use z_order::*;
