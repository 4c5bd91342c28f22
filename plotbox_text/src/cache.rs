// Copyright 2025 the Plotbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-render memoization of text measurements.

use alloc::string::{String, ToString};
use core::cell::{Cell, RefCell};
use core::fmt;

use hashbrown::HashMap;

use crate::{FontFamily, FontStyle, FontWeight, TextMeasurer, TextMetrics, TextStyle};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct StyleKey {
    size_bits: u64,
    family: FontFamily,
    weight: FontWeight,
    style: FontStyle,
}

impl From<&TextStyle> for StyleKey {
    fn from(style: &TextStyle) -> Self {
        Self {
            size_bits: style.font_size.to_bits(),
            family: style.font_family.clone(),
            weight: style.font_weight,
            style: style.font_style,
        }
    }
}

/// Memoizes `(style, text)` measurements of a wrapped [`TextMeasurer`].
///
/// Create one per render and drop it afterwards; it is not meant to be shared between threads
/// or kept across renders.
pub struct MeasureCache<'a> {
    measurer: &'a dyn TextMeasurer,
    entries: RefCell<HashMap<StyleKey, HashMap<String, TextMetrics>>>,
    hits: Cell<u64>,
    misses: Cell<u64>,
}

impl<'a> MeasureCache<'a> {
    /// Wraps `measurer`.
    pub fn new(measurer: &'a dyn TextMeasurer) -> Self {
        Self {
            measurer,
            entries: RefCell::new(HashMap::new()),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    /// Number of measurements answered from the cache.
    pub fn hits(&self) -> u64 {
        self.hits.get()
    }

    /// Number of measurements forwarded to the wrapped measurer.
    pub fn misses(&self) -> u64 {
        self.misses.get()
    }
}

impl fmt::Debug for MeasureCache<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeasureCache")
            .field("hits", &self.hits.get())
            .field("misses", &self.misses.get())
            .finish_non_exhaustive()
    }
}

impl TextMeasurer for MeasureCache<'_> {
    fn measure(&self, text: &str, style: TextStyle) -> TextMetrics {
        let key = StyleKey::from(&style);
        if let Some(metrics) = self
            .entries
            .borrow()
            .get(&key)
            .and_then(|by_text| by_text.get(text))
        {
            self.hits.set(self.hits.get() + 1);
            return *metrics;
        }

        let metrics = self.measurer.measure(text, style);
        log::trace!("measured {text:?}: {metrics:?}");
        self.misses.set(self.misses.get() + 1);
        self.entries
            .borrow_mut()
            .entry(key)
            .or_default()
            .insert(text.to_string(), metrics);
        metrics
    }
}
