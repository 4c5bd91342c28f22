// Copyright 2025 the Plotbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tiny scale utilities.
//!
//! Tick generation and "nice" domain rounding follow the conventions of d3-array/d3-scale, so
//! charts laid out here put ticks where a browser-based renderer would.

extern crate alloc;

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

const E10: f64 = 7.071_067_811_865_476; // sqrt(50)
const E5: f64 = 3.162_277_660_168_379_5; // sqrt(10)
const E2: f64 = core::f64::consts::SQRT_2;

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

impl ScaleLinear {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Maps a value from domain space into range space.
    ///
    /// A degenerate domain maps everything to the middle of the range.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return 0.5 * (r0 + r1);
        }
        let t = (x - d0) / denom;
        r0 + t * (r1 - r0)
    }

    /// The domain as authored (or as niced).
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// The output range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Returns up to roughly `count` tick values inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.domain;
        ticks(d0, d1, count)
    }

    /// Extends the domain to round values based on the tick step for `count`.
    #[must_use]
    pub fn nice(&self, count: usize) -> Self {
        let (mut start, mut stop) = self.domain;
        let reversed = stop < start;
        if reversed {
            core::mem::swap(&mut start, &mut stop);
        }
        let mut prestep = None;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count as f64);
            if prestep == Some(step) {
                break;
            }
            if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            prestep = Some(step);
        }
        let domain = if reversed { (stop, start) } else { (start, stop) };
        Self::new(domain, self.range)
    }
}

/// Returns `(i1, i2, inc)`; a negative `inc` means the tick step is `1 / -inc`.
fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10_f64.powi(power as i32);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    #[allow(
        clippy::cast_possible_truncation,
        reason = "decimal exponents of finite f64 steps fit in i32"
    )]
    let (i1, i2, inc) = if power < 0.0 {
        let inc = 10_f64.powi(-power as i32) / factor;
        let mut i1 = (start * inc).round();
        let mut i2 = (stop * inc).round();
        if i1 / inc < start {
            i1 += 1.0;
        }
        if i2 / inc > stop {
            i2 -= 1.0;
        }
        (i1, i2, -inc)
    } else {
        let inc = 10_f64.powi(power as i32) * factor;
        let mut i1 = (start / inc).round();
        let mut i2 = (stop / inc).round();
        if i1 * inc < start {
            i1 += 1.0;
        }
        if i2 * inc > stop {
            i2 -= 1.0;
        }
        (i1, i2, inc)
    };
    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// The signed tick increment for `count` ticks over `[start, stop]`.
pub fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    if !(start.is_finite() && stop.is_finite()) || count <= 0.0 || start == stop {
        return 0.0;
    }
    tick_spec(start, stop, count).2
}

/// Returns tick values for `[start, stop]`, at most ~`count` of them, never outside the domain.
pub fn ticks(mut start: f64, mut stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !(start.is_finite() && stop.is_finite()) {
        return Vec::new();
    }
    if start == stop {
        return alloc::vec![start];
    }
    let reverse = stop < start;
    if reverse {
        core::mem::swap(&mut start, &mut stop);
    }
    let (i1, i2, inc) = tick_spec(start, stop, count as f64);
    if !(i2 >= i1) {
        return Vec::new();
    }
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "i2 >= i1 and both are integral"
    )]
    let n = (i2 - i1 + 1.0).min(10_000.0) as usize;
    let mut out: Vec<f64> = (0..n)
        .map(|i| {
            let k = i1 + i as f64;
            if inc < 0.0 { k / -inc } else { k * inc }
        })
        .collect();
    if reverse {
        out.reverse();
    }
    out
}

/// `(min, max)` widened by `extra` of its span on both ends; `(0, 1)` when empty.
pub fn padded_extent(values: impl IntoIterator<Item = f64>, extra: f64) -> (f64, f64) {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return (0.0, 1.0);
    }
    let pad = (hi - lo) * extra;
    (lo - pad, hi + pad)
}

/// A discrete band scale for categorical charts.
///
/// Padding is expressed as a fraction of the step: `padding_inner` in `[0, 1]` separates bands,
/// `padding_outer` adds space before the first and after the last band. Leftover space is split
/// evenly on both ends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleBand {
    range: (f64, f64),
    count: usize,
    padding_inner: f64,
    padding_outer: f64,
}

impl ScaleBand {
    /// Creates a new band scale covering `count` bands over `range`, without padding.
    pub fn new(range: (f64, f64), count: usize) -> Self {
        Self {
            range,
            count,
            padding_inner: 0.0,
            padding_outer: 0.0,
        }
    }

    /// Sets inner padding (clamped to `[0, 1]`).
    pub fn with_padding_inner(mut self, padding: f64) -> Self {
        self.padding_inner = padding.clamp(0.0, 1.0);
        self
    }

    /// Sets outer padding.
    pub fn with_padding_outer(mut self, padding: f64) -> Self {
        self.padding_outer = padding.max(0.0);
        self
    }

    /// Returns the number of bands.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Distance between the starts of adjacent bands.
    pub fn step(&self) -> f64 {
        let (r0, r1) = self.range;
        let n = self.count as f64;
        let denom = (n - self.padding_inner + 2.0 * self.padding_outer).max(1.0);
        (r1 - r0).abs() / denom
    }

    /// Width of each band.
    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding_inner)
    }

    fn start(&self) -> f64 {
        let (r0, r1) = self.range;
        let (lo, hi) = if r1 >= r0 { (r0, r1) } else { (r1, r0) };
        let n = self.count as f64;
        lo + (hi - lo - self.step() * (n - self.padding_inner)) * 0.5
    }

    /// Start of the band at `index`.
    pub fn x(&self, index: usize) -> f64 {
        let (r0, r1) = self.range;
        let i = if r1 >= r0 {
            index
        } else {
            self.count.saturating_sub(index + 1)
        };
        self.start() + self.step() * i as f64
    }

    /// Center of the band at `index`.
    pub fn center(&self, index: usize) -> f64 {
        self.x(index) + 0.5 * self.bandwidth()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec;

    use super::*;

    fn assert_all_close(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len(), "{a:?} vs {b:?}");
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < 1e-9, "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn ticks_stay_inside_the_domain() {
        assert_all_close(&ticks(0.0, 100.0, 3), &[0.0, 50.0, 100.0]);
        assert_all_close(&ticks(0.0, 1.0, 5), &[0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert_all_close(&ticks(-0.5, 10.5, 4), &[0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_all_close(&ticks(10.0, 0.0, 2), &[10.0, 5.0, 0.0]);
        assert_eq!(ticks(3.0, 3.0, 5), vec![3.0]);
        assert!(ticks(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn nice_extends_to_round_values() {
        let s = ScaleLinear::new((0.3, 9.7), (0.0, 1.0)).nice(10);
        assert_eq!(s.domain(), (0.0, 10.0));

        let s = ScaleLinear::new((0.0, 87.0), (0.0, 1.0)).nice(3);
        assert_eq!(s.domain(), (0.0, 100.0));

        let s = ScaleLinear::new((12.0, -3.0), (0.0, 1.0)).nice(5);
        assert_eq!(s.domain(), (15.0, -5.0));
    }

    #[test]
    fn linear_maps_onto_the_range() {
        let s = ScaleLinear::new((0.0, 100.0), (400.0, 0.0));
        assert_eq!(s.map(0.0), 400.0);
        assert_eq!(s.map(25.0), 300.0);
        let flat = ScaleLinear::new((5.0, 5.0), (0.0, 10.0));
        assert_eq!(flat.map(5.0), 5.0);
    }

    #[test]
    fn band_padding_matches_step_units() {
        let b = ScaleBand::new((0.0, 100.0), 4)
            .with_padding_inner(0.2)
            .with_padding_outer(0.1);
        assert!((b.step() - 25.0).abs() < 1e-9);
        assert!((b.bandwidth() - 20.0).abs() < 1e-9);
        assert!((b.x(0) - 2.5).abs() < 1e-9);
        assert!((b.x(3) - 77.5).abs() < 1e-9);
        assert!((b.center(1) - 37.5).abs() < 1e-9);
    }

    #[test]
    fn band_without_padding_tiles_the_range() {
        let b = ScaleBand::new((10.0, 70.0), 3);
        assert_eq!(b.step(), 20.0);
        assert_eq!(b.bandwidth(), 20.0);
        assert_eq!(b.x(2), 50.0);
    }

    #[test]
    fn extents_are_padded_by_their_span() {
        assert_eq!(padded_extent([0.0, 10.0, 5.0], 0.05), (-0.5, 10.5));
        assert_eq!(padded_extent([3.0], 0.05), (3.0, 3.0));
        assert_eq!(padded_extent([f64::NAN], 0.05), (0.0, 1.0));
        assert_eq!(padded_extent(core::iter::empty(), 0.05), (0.0, 1.0));
    }
}
