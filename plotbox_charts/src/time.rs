// Copyright 2025 the Plotbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time tick generation and date labels.
//!
//! Time values are epoch **milliseconds** (UTC). Tick placement is injectable through
//! [`TimeTickGenerator`]; [`CalendarTicks`] is the bundled calendar-aware default.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use chrono::{DateTime, Datelike, NaiveDate, Utc};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;
use crate::scale;

const SECOND: f64 = 1_000.0;
const MINUTE: f64 = 60.0 * SECOND;
const HOUR: f64 = 60.0 * MINUTE;
const DAY: f64 = 24.0 * HOUR;
const WEEK: f64 = 7.0 * DAY;
const MONTH: f64 = 30.0 * DAY;
const YEAR: f64 = 365.0 * DAY;

/// English month abbreviations used by date labels unless overridden.
pub const DEFAULT_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A named calendar interval for time ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimeInterval {
    /// First day of every month.
    Month,
    /// January, April, July and October 1st.
    Quarter,
    /// January and July 1st.
    HalfYear,
    /// January 1st.
    Year,
}

impl TimeInterval {
    /// Parses `month`, `quarter`, `half-year` or `year`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "month" => Some(Self::Month),
            "quarter" => Some(Self::Quarter),
            "half-year" => Some(Self::HalfYear),
            "year" => Some(Self::Year),
            _ => None,
        }
    }

    fn months(self) -> u32 {
        match self {
            Self::Month => 1,
            Self::Quarter => 3,
            Self::HalfYear => 6,
            Self::Year => 12,
        }
    }
}

/// How many time ticks to produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeTicks {
    /// Roughly this many ticks at a calendar-friendly step.
    Count(usize),
    /// One tick per interval boundary.
    Every(TimeInterval),
}

/// Produces tick positions for a time domain.
pub trait TimeTickGenerator {
    /// Returns ascending tick times (epoch milliseconds) within `[start, stop]`.
    fn ticks(&self, start: f64, stop: f64, ticks: TimeTicks) -> Vec<f64>;
}

/// Calendar-aware tick generator in UTC.
///
/// With [`TimeTicks::Count`] the step is chosen from a fixed ladder (seconds through months),
/// falling back to whole years for long domains.
#[derive(Clone, Copy, Debug, Default)]
pub struct CalendarTicks;

#[derive(Clone, Copy, Debug)]
enum Step {
    Fixed(f64),
    Months(u32),
    Years(u32),
}

const LADDER: &[(f64, Step)] = &[
    (SECOND, Step::Fixed(SECOND)),
    (5.0 * SECOND, Step::Fixed(5.0 * SECOND)),
    (15.0 * SECOND, Step::Fixed(15.0 * SECOND)),
    (30.0 * SECOND, Step::Fixed(30.0 * SECOND)),
    (MINUTE, Step::Fixed(MINUTE)),
    (5.0 * MINUTE, Step::Fixed(5.0 * MINUTE)),
    (15.0 * MINUTE, Step::Fixed(15.0 * MINUTE)),
    (30.0 * MINUTE, Step::Fixed(30.0 * MINUTE)),
    (HOUR, Step::Fixed(HOUR)),
    (3.0 * HOUR, Step::Fixed(3.0 * HOUR)),
    (6.0 * HOUR, Step::Fixed(6.0 * HOUR)),
    (12.0 * HOUR, Step::Fixed(12.0 * HOUR)),
    (DAY, Step::Fixed(DAY)),
    (2.0 * DAY, Step::Fixed(2.0 * DAY)),
    (WEEK, Step::Fixed(WEEK)),
    (MONTH, Step::Months(1)),
    (3.0 * MONTH, Step::Months(3)),
    (YEAR, Step::Years(1)),
];

impl CalendarTicks {
    fn step_for_count(start: f64, stop: f64, count: usize) -> Option<Step> {
        let target = (stop - start) / count.max(1) as f64;
        let i = LADDER.partition_point(|(d, _)| *d <= target);
        if i == LADDER.len() {
            let k = scale::tick_increment(start / YEAR, stop / YEAR, count as f64).max(1.0);
            #[allow(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                reason = "year steps are small positive integers"
            )]
            return Some(Step::Years(k as u32));
        }
        if i == 0 {
            return None;
        }
        let (lo, lo_step) = LADDER[i - 1];
        let (hi, hi_step) = LADDER[i];
        Some(if target / lo < hi / target {
            lo_step
        } else {
            hi_step
        })
    }
}

impl TimeTickGenerator for CalendarTicks {
    fn ticks(&self, start: f64, stop: f64, ticks: TimeTicks) -> Vec<f64> {
        if !(start.is_finite() && stop.is_finite()) || stop < start {
            return Vec::new();
        }
        let step = match ticks {
            TimeTicks::Every(interval) => Step::Months(interval.months()),
            TimeTicks::Count(0) => return Vec::new(),
            TimeTicks::Count(count) => match Self::step_for_count(start, stop, count) {
                Some(step) => step,
                // Sub-second domains get plain numeric ticks.
                None => return scale::ticks(start, stop, count),
            },
        };
        match step {
            Step::Fixed(d) => fixed_ticks(start, stop, d),
            Step::Months(k) => month_ticks(start, stop, k),
            Step::Years(k) => month_ticks(start, stop, 12 * k.max(1)),
        }
    }
}

fn fixed_ticks(start: f64, stop: f64, step: f64) -> Vec<f64> {
    // Weeks start on Sunday; the epoch was a Thursday.
    let offset = if step == WEEK { -4.0 * DAY } else { 0.0 };
    let mut t = ((start - offset) / step).ceil() * step + offset;
    let mut out = Vec::new();
    while t <= stop && out.len() < 10_000 {
        out.push(t);
        t += step;
    }
    out
}

/// First-of-month boundaries every `k` months, aligned so that `month0 % k == 0` (and
/// `year % (k / 12) == 0` for whole-year steps).
fn month_ticks(start: f64, stop: f64, k: u32) -> Vec<f64> {
    let (Some(first), Some(_)) = (datetime(start), datetime(stop)) else {
        return Vec::new();
    };
    let k = k.max(1);
    let mut year = first.year();
    let mut month0 = first.month0();
    if k >= 12 {
        let years = i32::try_from(k / 12).unwrap_or(1);
        year = year.div_euclid(years) * years;
        month0 = 0;
    } else {
        month0 -= month0 % k;
    }
    let mut out = Vec::new();
    while out.len() < 10_000 {
        let Some(t) = month_start(year, month0) else {
            break;
        };
        if t > stop {
            break;
        }
        if t >= start {
            out.push(t);
        }
        month0 += k;
        #[allow(clippy::cast_possible_wrap, reason = "month0 / 12 is tiny")]
        {
            year += (month0 / 12) as i32;
        }
        month0 %= 12;
    }
    out
}

fn month_start(year: i32, month0: u32) -> Option<f64> {
    let date = NaiveDate::from_ymd_opt(year, month0 + 1, 1)?;
    let ms = date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis();
    #[allow(clippy::cast_precision_loss, reason = "epoch milliseconds fit f64 exactly")]
    let ms = ms as f64;
    Some(ms)
}

fn datetime(ms: f64) -> Option<DateTime<Utc>> {
    if !ms.is_finite() {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, reason = "checked finite; chrono range-checks")]
    let ms = ms as i64;
    DateTime::from_timestamp_millis(ms)
}

/// Formats a date as `"<month> <year % 100>"`, e.g. `"Jan 21"`.
///
/// `months` supplies the twelve month names; missing entries fall back to English.
pub fn date_label<S: AsRef<str>>(ms: f64, months: &[S]) -> String {
    let Some(dt) = datetime(ms) else {
        return String::new();
    };
    let m = dt.month0() as usize;
    let name = months
        .get(m)
        .map(|s| s.as_ref())
        .unwrap_or(DEFAULT_MONTHS[m]);
    format!("{} {}", name, dt.year() % 100)
}
