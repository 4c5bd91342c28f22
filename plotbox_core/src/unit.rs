// Copyright 2025 the Plotbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Length units and the per-render unit environment.

extern crate alloc;

use alloc::sync::Arc;
use core::fmt;

use hashbrown::HashMap;

/// A length unit attached to a [`Dimension`](crate::Dimension) leaf.
///
/// Unrecognized unit names are kept verbatim in [`Unit::Other`]; they resolve with a factor of
/// `1.0` unless the environment defines them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Unit {
    /// Device pixels.
    Px,
    /// Percent of the current layout scope (the smaller viewport side by default).
    Percent,
    /// One hundredth of the viewport width.
    Vw,
    /// One hundredth of the viewport height.
    Vh,
    /// The smaller of [`Unit::Vw`] and [`Unit::Vh`].
    Vmin,
    /// The larger of [`Unit::Vw`] and [`Unit::Vh`].
    Vmax,
    /// The label font size.
    Em,
    /// Any other unit name.
    Other(Arc<str>),
}

impl Unit {
    /// Maps a unit name (as written in a dimension string) to a unit.
    pub fn from_name(name: &str) -> Self {
        match name {
            "px" => Self::Px,
            "%" => Self::Percent,
            "vw" => Self::Vw,
            "vh" => Self::Vh,
            "vmin" => Self::Vmin,
            "vmax" => Self::Vmax,
            "em" => Self::Em,
            other => Self::Other(Arc::from(other)),
        }
    }

    /// Returns the unit name as written in dimension strings.
    pub fn name(&self) -> &str {
        match self {
            Self::Px => "px",
            Self::Percent => "%",
            Self::Vw => "vw",
            Self::Vh => "vh",
            Self::Vmin => "vmin",
            Self::Vmax => "vmax",
            Self::Em => "em",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pixels-per-unit factors used to resolve dimensions.
///
/// An environment is built once per render from the canvas size and extended as layout
/// proceeds (for example with `em` once the label font size is known). Missing units resolve
/// with a factor of `1.0`, so resolution never fails.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UnitFactors {
    factors: HashMap<Unit, f64>,
}

impl UnitFactors {
    /// Creates an empty environment (every unit resolves with `1.0`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the base environment for a canvas of the given pixel size.
    ///
    /// Defines `px`, the viewport units and `%` (as `vmin`).
    pub fn for_canvas(width: f64, height: f64) -> Self {
        Self::new().with_factor(Unit::Px, 1.0).with_viewport(width, height)
    }

    /// Re-scopes the viewport units (`vw`, `vh`, `vmin`, `vmax`, `%`) to a box of the given size.
    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        let vw = width / 100.0;
        let vh = height / 100.0;
        let vmin = vw.min(vh);
        self.set(Unit::Vw, vw);
        self.set(Unit::Vh, vh);
        self.set(Unit::Vmin, vmin);
        self.set(Unit::Vmax, vw.max(vh));
        self.set(Unit::Percent, vmin);
        self
    }

    /// Defines the `em` unit.
    pub fn with_em(self, em: f64) -> Self {
        self.with_factor(Unit::Em, em)
    }

    /// Defines or replaces the factor for `unit`.
    pub fn with_factor(mut self, unit: Unit, factor: f64) -> Self {
        self.set(unit, factor);
        self
    }

    /// Defines or replaces the factor for `unit` in place.
    pub fn set(&mut self, unit: Unit, factor: f64) {
        self.factors.insert(unit, factor);
    }

    /// Returns the factor defined for `unit`, if any.
    pub fn get(&self, unit: &Unit) -> Option<f64> {
        self.factors.get(unit).copied()
    }

    /// Returns the factor for `unit`, falling back to `1.0`.
    pub fn factor(&self, unit: &Unit) -> f64 {
        self.get(unit).unwrap_or(1.0)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn canvas_env_defines_viewport_units() {
        let env = UnitFactors::for_canvas(800.0, 400.0);
        assert_eq!(env.factor(&Unit::Vw), 8.0);
        assert_eq!(env.factor(&Unit::Vh), 4.0);
        assert_eq!(env.factor(&Unit::Vmin), 4.0);
        assert_eq!(env.factor(&Unit::Vmax), 8.0);
        assert_eq!(env.factor(&Unit::Px), 1.0);
        assert_eq!(env.get(&Unit::Em), None);
    }

    #[test]
    fn unknown_units_round_trip_their_name() {
        let unit = Unit::from_name("furlong");
        assert_eq!(unit.name(), "furlong");
        assert_eq!(UnitFactors::new().factor(&unit), 1.0);
    }
}
