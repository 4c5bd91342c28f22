// Copyright 2025 the Plotbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render errors.

use plotbox_core::DimensionParseError;

/// Why a chart could not be laid out.
///
/// These are all detected before any layout work starts. Everything past validation is total:
/// missing data or styling falls back to defaults.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RenderError {
    /// The canvas size is negative, zero or not finite.
    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas {
        /// Requested width.
        width: f64,
        /// Requested height.
        height: f64,
    },
    /// The canvas area exceeds [`RenderOptions::max_canvas_area`](crate::RenderOptions).
    #[error("canvas area {area} exceeds the limit of {max}")]
    CanvasTooLarge {
        /// Requested area in square pixels.
        area: f64,
        /// Configured limit.
        max: f64,
    },
    /// A dimension-valued configuration field could not be parsed.
    #[error("invalid value for `{field}`")]
    Dimension {
        /// The configuration field name, as spelled in the request.
        field: &'static str,
        /// The parse failure.
        #[source]
        source: DimensionParseError,
    },
}
