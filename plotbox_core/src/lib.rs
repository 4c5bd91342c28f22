// Copyright 2025 the Plotbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Unit-aware geometry for chart layout.
//!
//! Chart layout mixes lengths in several units: viewport percentages (`vw`, `vmin`, ...),
//! font-relative units (`em`) and literal pixels. This crate keeps those lengths symbolic:
//! - [`Dimension`] is a lazily evaluated length expression.
//! - [`UnitFactors`] is the environment that turns units into pixels.
//! - [`Position`] and [`LayoutBox`] build points and rectangles out of dimensions.
//!
//! Everything is immutable. Layout code derives new positions and boxes from old ones and
//! resolves them against an environment built for a single render.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod dimension;
#[cfg(not(feature = "std"))]
mod float;
mod layout_box;
mod position;
mod unit;

pub use dimension::{CombineOp, Dimension, DimensionParseError};
pub use layout_box::LayoutBox;
pub use position::Position;
pub use unit::{Unit, UnitFactors};
