// Copyright 2025 the Plotbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Z-order conventions for chart-generated marks.
//!
//! Every [`Mark`](crate::Mark) carries a `z_index`. Chart drivers emit marks in any order and
//! the output is stably sorted by these values, which gives the fixed paint order: background,
//! legend, axes, data, data labels, debug wireframes, watermark.

/// Canvas background fill.
pub const BACKGROUND: i32 = -100;

/// Legend swatches and lines.
pub const LEGEND_SWATCHES: i32 = -80;
/// Legend labels.
pub const LEGEND_LABELS: i32 = -75;

/// Gridlines and tick lines spanning the plot.
pub const GRID_LINES: i32 = -60;
/// Axis domain line and tick marks.
pub const AXIS_RULES: i32 = -50;
/// Axis tick labels.
pub const AXIS_LABELS: i32 = -40;
/// Axis title labels.
pub const AXIS_TITLES: i32 = -35;
/// Chart-level titles.
pub const TITLES: i32 = -30;

/// Filled series marks (bars, slices).
pub const SERIES_FILL: i32 = 0;
/// Stroked series marks (lines, reference rules).
pub const SERIES_STROKE: i32 = 10;
/// Point series marks drawn above lines.
pub const SERIES_POINTS: i32 = 20;

/// Value labels drawn on top of data marks.
pub const DATA_LABELS: i32 = 40;

/// Region outlines and other debug overlays.
pub const DEBUG: i32 = 90;
/// Watermark text.
pub const WATERMARK: i32 = 100;
