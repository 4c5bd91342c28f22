// Copyright 2025 the Plotbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Points (or vectors) whose coordinates are [`Dimension`] expressions.

extern crate alloc;

use alloc::sync::Arc;

use kurbo::Point;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;
use crate::dimension::Dimension;
use crate::unit::UnitFactors;

/// An immutable 2D position built from two dimensions.
///
/// A position may carry a resolved environment snapshot. Every position derived from a
/// resolved one inherits the snapshot, so deriving then resolving and resolving then deriving
/// produce the same coordinates.
///
/// Reading coordinates from an unresolved position evaluates against the empty environment,
/// where every unit has a factor of `1.0`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Position {
    x: Dimension,
    y: Dimension,
    env: Option<Arc<UnitFactors>>,
}

impl Position {
    /// Creates an unresolved position.
    pub fn new(x: impl Into<Dimension>, y: impl Into<Dimension>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            env: None,
        }
    }

    /// The origin in pixels.
    pub fn origin() -> Self {
        Self::default()
    }

    /// The symbolic x coordinate.
    pub fn dim_x(&self) -> &Dimension {
        &self.x
    }

    /// The symbolic y coordinate.
    pub fn dim_y(&self) -> &Dimension {
        &self.y
    }

    /// Returns a copy resolved against a snapshot of `env`.
    #[must_use]
    pub fn resolve(&self, env: &UnitFactors) -> Self {
        self.resolve_shared(Arc::new(env.clone()))
    }

    /// Returns a copy resolved against an already shared environment.
    #[must_use]
    pub fn resolve_shared(&self, env: Arc<UnitFactors>) -> Self {
        Self {
            x: self.x.clone(),
            y: self.y.clone(),
            env: Some(env),
        }
    }

    /// Whether this position carries an environment snapshot.
    pub fn is_resolved(&self) -> bool {
        self.env.is_some()
    }

    /// The environment snapshot, if resolved.
    pub fn env(&self) -> Option<&Arc<UnitFactors>> {
        self.env.as_ref()
    }

    fn eval(&self, dim: &Dimension) -> f64 {
        match &self.env {
            Some(env) => dim.value(env),
            None => dim.value(&UnitFactors::new()),
        }
    }

    /// The resolved x coordinate in pixels.
    pub fn x(&self) -> f64 {
        self.eval(&self.x)
    }

    /// The resolved y coordinate in pixels.
    pub fn y(&self) -> f64 {
        self.eval(&self.y)
    }

    /// Both resolved coordinates.
    pub fn xy(&self) -> (f64, f64) {
        (self.x(), self.y())
    }

    /// The resolved position as a `kurbo` point.
    pub fn to_point(&self) -> Point {
        Point::new(self.x(), self.y())
    }

    fn derive(&self, x: Dimension, y: Dimension, other_env: Option<&Arc<UnitFactors>>) -> Self {
        Self {
            x,
            y,
            env: self.env.clone().or_else(|| other_env.cloned()),
        }
    }

    /// Offsets this position by `(dx, dy)`.
    #[must_use]
    pub fn relative(&self, dx: impl Into<Dimension>, dy: impl Into<Dimension>) -> Self {
        self.derive(self.x.plus(dx), self.y.plus(dy), None)
    }

    /// Moves right by `dx`.
    #[must_use]
    pub fn right_by(&self, dx: impl Into<Dimension>) -> Self {
        self.derive(self.x.plus(dx), self.y.clone(), None)
    }

    /// Moves left by `dx`.
    #[must_use]
    pub fn left_by(&self, dx: impl Into<Dimension>) -> Self {
        self.derive(self.x.minus(dx), self.y.clone(), None)
    }

    /// Moves down (towards larger y) by `dy`.
    #[must_use]
    pub fn below_by(&self, dy: impl Into<Dimension>) -> Self {
        self.derive(self.x.clone(), self.y.plus(dy), None)
    }

    /// Moves up (towards smaller y) by `dy`.
    #[must_use]
    pub fn above_by(&self, dy: impl Into<Dimension>) -> Self {
        self.derive(self.x.clone(), self.y.minus(dy), None)
    }

    /// Component-wise sum.
    #[must_use]
    pub fn plus(&self, other: &Self) -> Self {
        self.derive(
            self.x.plus(&other.x),
            self.y.plus(&other.y),
            other.env.as_ref(),
        )
    }

    /// Component-wise difference.
    #[must_use]
    pub fn minus(&self, other: &Self) -> Self {
        self.derive(
            self.x.minus(&other.x),
            self.y.minus(&other.y),
            other.env.as_ref(),
        )
    }

    /// Interpolates towards `other`, independently per axis.
    ///
    /// `tx = ty = 0` yields `self`, `1` yields `other`.
    #[must_use]
    pub fn towards(&self, other: &Self, tx: f64, ty: f64) -> Self {
        self.derive(
            self.x.lerp(&other.x, tx),
            self.y.lerp(&other.y, ty),
            other.env.as_ref(),
        )
    }

    /// Treats this position as a vector and rescales it to `length`.
    ///
    /// The result holds pixel coordinates. A zero vector is returned unchanged.
    #[must_use]
    pub fn with_length(&self, length: impl Into<Dimension>) -> Self {
        let current = self.length();
        if current == 0.0 || !current.is_finite() {
            return self.clone();
        }
        let target = self.eval(&length.into());
        let k = target / current;
        let (x, y) = self.xy();
        self.derive(Dimension::px(x * k), Dimension::px(y * k), None)
    }

    /// Euclidean length of the resolved vector.
    pub fn length(&self) -> f64 {
        let (x, y) = self.xy();
        (x * x + y * y).sqrt()
    }

    /// Quadrant of the resolved vector, counting counter-clockwise from `+x` (y up).
    ///
    /// `0` is `x ≥ 0, y ≥ 0`, `1` is `x < 0, y ≥ 0`, `2` is `x < 0, y < 0` and `3` is
    /// `x ≥ 0, y < 0`.
    pub fn quadrant(&self) -> u8 {
        let (x, y) = self.xy();
        let x_pos = x >= 0.0;
        let y_pos = y >= 0.0;
        let q = if y_pos { 0 } else { 2 };
        if x_pos == y_pos { q } else { q + 1 }
    }

    /// Octant of the resolved vector, counting counter-clockwise from `+x` (y up).
    ///
    /// Exact diagonals belong to the lower octant of their quadrant.
    pub fn octant(&self) -> u8 {
        let (x, y) = self.xy();
        let q = self.quadrant();
        let steep = x.abs() < y.abs();
        let diagonal = x.abs() == y.abs();
        let even_quadrant = q % 2 == 0;
        let second_half = steep == even_quadrant && !diagonal;
        2 * q + u8::from(second_half)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::unit::Unit;

    fn vw(n: f64) -> Dimension {
        Dimension::new(n, Unit::Vw)
    }

    #[test]
    fn derived_positions_inherit_the_resolved_env() {
        let env = UnitFactors::for_canvas(800.0, 400.0);
        let p = Position::new(vw(10.0), 5.0).resolve(&env);
        let q = p.right_by(vw(5.0)).below_by(10.0);
        assert!(q.is_resolved());
        assert_eq!(q.xy(), (120.0, 15.0));
    }

    #[test]
    fn resolve_commutes_with_derivation() {
        let env = UnitFactors::for_canvas(640.0, 480.0);
        let p = Position::new(vw(10.0), Dimension::new(20.0, Unit::Vh));
        let other = Position::new(3.0, Dimension::new(1.0, Unit::Vmin));

        let resolve_first = p.resolve(&env).left_by(vw(2.0)).plus(&other);
        let derive_first = p.left_by(vw(2.0)).plus(&other).resolve(&env);
        assert_eq!(resolve_first.xy(), derive_first.xy());

        let resolve_first = p.resolve(&env).towards(&other, 0.25, 0.75);
        let derive_first = p.towards(&other, 0.25, 0.75).resolve(&env);
        assert_eq!(resolve_first.xy(), derive_first.xy());
    }

    #[test]
    fn towards_interpolates_per_axis() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(10.0, 20.0);
        assert_eq!(a.towards(&b, 0.5, 0.5).xy(), (5.0, 10.0));
        assert_eq!(a.towards(&b, 1.0, 0.0).xy(), (10.0, 0.0));
    }

    #[test]
    fn with_length_rescales_the_vector() {
        let v = Position::new(3.0, 4.0);
        let w = v.with_length(10.0);
        assert!((w.x() - 6.0).abs() < 1e-12);
        assert!((w.y() - 8.0).abs() < 1e-12);
        assert!((w.length() - 10.0).abs() < 1e-12);

        let zero = Position::origin();
        assert_eq!(zero.with_length(5.0).xy(), (0.0, 0.0));
    }

    #[test]
    fn quadrants_and_octants_count_counter_clockwise() {
        let cases = [
            ((2.0, 1.0), 0, 0),
            ((1.0, 2.0), 0, 1),
            ((-1.0, 2.0), 1, 2),
            ((-2.0, 1.0), 1, 3),
            ((-2.0, -1.0), 2, 4),
            ((-1.0, -2.0), 2, 5),
            ((1.0, -2.0), 3, 6),
            ((2.0, -1.0), 3, 7),
        ];
        for ((x, y), quadrant, octant) in cases {
            let p = Position::new(x, y);
            assert_eq!(p.quadrant(), quadrant, "quadrant of ({x}, {y})");
            assert_eq!(p.octant(), octant, "octant of ({x}, {y})");
        }
        assert_eq!(Position::new(1.0, 1.0).octant(), 0);
    }
}
