// Copyright 2025 the Plotbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Unit-carrying lengths and their lazy combinators.
//!
//! A [`Dimension`] is a small expression tree. Leaves hold a number and a [`Unit`]; derived
//! dimensions (negation, sums, minimum/maximum, interpolation) keep references to their
//! operands and are only evaluated when [`Dimension::value`] is called with an environment.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::sync::Arc;
use core::fmt;
use core::str::FromStr;

use crate::unit::{Unit, UnitFactors};

/// Binary operators used by [`Dimension::Combine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CombineOp {
    /// `a + b`.
    Add,
    /// `min(a, b)`.
    Min,
    /// `max(a, b)`.
    Max,
}

impl CombineOp {
    fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Add => a + b,
            Self::Min => a.min(b),
            Self::Max => a.max(b),
        }
    }
}

/// A length expression resolved against a [`UnitFactors`] environment.
#[derive(Clone, Debug, PartialEq)]
pub enum Dimension {
    /// A literal `number` in `unit`.
    Leaf {
        /// The scalar part.
        number: f64,
        /// The unit the scalar is expressed in.
        unit: Unit,
    },
    /// The negation of another dimension.
    Neg(Arc<Self>),
    /// A binary combination of two dimensions.
    Combine {
        /// The operator.
        op: CombineOp,
        /// Left operand.
        a: Arc<Self>,
        /// Right operand.
        b: Arc<Self>,
    },
    /// Linear interpolation `a + (b - a) * t`.
    Lerp {
        /// Start.
        a: Arc<Self>,
        /// End.
        b: Arc<Self>,
        /// Interpolation factor.
        t: f64,
    },
}

impl Dimension {
    /// Zero pixels.
    pub const ZERO: Self = Self::Leaf {
        number: 0.0,
        unit: Unit::Px,
    };

    /// Creates a leaf dimension.
    pub fn new(number: f64, unit: Unit) -> Self {
        Self::Leaf { number, unit }
    }

    /// Creates a pixel dimension.
    pub fn px(number: f64) -> Self {
        Self::new(number, Unit::Px)
    }

    /// Parses a `<number><unit>` string such as `"10px"`, `"2.5vmin"` or `"50 %"`.
    pub fn parse(text: &str) -> Result<Self, DimensionParseError> {
        let trimmed = text.trim();
        let bytes = trimmed.as_bytes();
        let mut i = 0;
        if matches!(bytes.first(), Some(b'+' | b'-')) {
            i += 1;
        }
        let digits_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        let mut has_digits = i > digits_start;
        if i < bytes.len() && bytes[i] == b'.' {
            i += 1;
            let frac_start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            has_digits |= i > frac_start;
        }
        if !has_digits {
            return Err(DimensionParseError::MissingNumber(text.to_string()));
        }
        let number: f64 = trimmed[..i]
            .parse()
            .map_err(|_| DimensionParseError::MissingNumber(text.to_string()))?;

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let unit_start = i;
        while i < bytes.len() && (bytes[i].is_ascii_alphabetic() || bytes[i] == b'%') {
            i += 1;
        }
        if i == unit_start {
            if i == bytes.len() {
                return Err(DimensionParseError::MissingUnit(text.to_string()));
            }
            return Err(DimensionParseError::Trailing(text.to_string()));
        }
        if i != bytes.len() {
            return Err(DimensionParseError::Trailing(text.to_string()));
        }
        Ok(Self::new(number, Unit::from_name(&trimmed[unit_start..])))
    }

    /// Returns `(number, unit)` for leaf dimensions.
    pub fn leaf(&self) -> Option<(f64, &Unit)> {
        match self {
            Self::Leaf { number, unit } => Some((*number, unit)),
            _ => None,
        }
    }

    /// Resolves this dimension to pixels.
    pub fn value(&self, env: &UnitFactors) -> f64 {
        match self {
            Self::Leaf { number, unit } => number * env.factor(unit),
            Self::Neg(a) => -a.value(env),
            Self::Combine { op, a, b } => op.apply(a.value(env), b.value(env)),
            Self::Lerp { a, b, t } => {
                let a = a.value(env);
                a + (b.value(env) - a) * t
            }
        }
    }

    /// Returns `-self`.
    #[must_use]
    pub fn neg(&self) -> Self {
        match self {
            Self::Leaf { number, unit } => Self::new(-number, unit.clone()),
            Self::Neg(inner) => (**inner).clone(),
            _ => Self::Neg(Arc::new(self.clone())),
        }
    }

    /// Returns `self + other`.
    #[must_use]
    pub fn plus(&self, other: impl Into<Self>) -> Self {
        self.combine(CombineOp::Add, other.into())
    }

    /// Returns `self - other`.
    #[must_use]
    pub fn minus(&self, other: impl Into<Self>) -> Self {
        self.combine(CombineOp::Add, other.into().neg())
    }

    /// Returns `min(self, other)`.
    #[must_use]
    pub fn min(&self, other: impl Into<Self>) -> Self {
        self.combine(CombineOp::Min, other.into())
    }

    /// Returns `max(self, other)`.
    #[must_use]
    pub fn max(&self, other: impl Into<Self>) -> Self {
        self.combine(CombineOp::Max, other.into())
    }

    /// Returns `self + (other - self) * t`.
    #[must_use]
    pub fn lerp(&self, other: impl Into<Self>, t: f64) -> Self {
        Self::Lerp {
            a: Arc::new(self.clone()),
            b: Arc::new(other.into()),
            t,
        }
    }

    fn combine(&self, op: CombineOp, other: Self) -> Self {
        Self::Combine {
            op,
            a: Arc::new(self.clone()),
            b: Arc::new(other),
        }
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<f64> for Dimension {
    fn from(px: f64) -> Self {
        Self::px(px)
    }
}

impl From<&Dimension> for Dimension {
    fn from(dim: &Dimension) -> Self {
        dim.clone()
    }
}

impl FromStr for Dimension {
    type Err = DimensionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf { number, unit } => write!(f, "{number}{unit}"),
            Self::Neg(a) => write!(f, "-({a})"),
            Self::Combine { op, a, b } => match op {
                CombineOp::Add => write!(f, "({a} + {b})"),
                CombineOp::Min => write!(f, "min({a}, {b})"),
                CombineOp::Max => write!(f, "max({a}, {b})"),
            },
            Self::Lerp { a, b, t } => write!(f, "lerp({a}, {b}, {t})"),
        }
    }
}

/// Errors produced by [`Dimension::parse`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DimensionParseError {
    /// The text does not start with a number.
    #[error("illegal dimension string {0:?}: expected a number")]
    MissingNumber(String),
    /// The number is not followed by a unit.
    #[error("illegal dimension string {0:?}: expected a unit after the number")]
    MissingUnit(String),
    /// Unexpected characters follow the unit.
    #[error("illegal dimension string {0:?}: unexpected trailing characters")]
    Trailing(String),
}
