// Copyright 2025 the Plotbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement hooks for chart layout.
//!
//! Plotbox lays out legends, tick labels and titles from measured text extents, but it never
//! shapes or draws glyphs itself. Chart code depends on the small [`TextMeasurer`] interface
//! and the embedding renderer supplies the implementation.
//!
//! Layout measures the same strings many times (a legend entry is measured once for packing
//! and again for painting), so [`MeasureCache`] memoizes measurements for one render.

#![no_std]

extern crate alloc;

mod cache;
mod metrics;
mod style;

pub use cache::MeasureCache;
pub use metrics::{HeuristicTextMeasurer, TextMeasurer, TextMetrics};
pub use style::{FontFamily, FontStyle, FontWeight, TextStyle};
