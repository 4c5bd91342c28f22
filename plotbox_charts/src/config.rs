// Copyright 2025 the Plotbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart requests as they arrive over the wire.
//!
//! Field names follow the JSON the chart service has always accepted (camelCase). Every field
//! is optional; each chart family supplies its own defaults when it reads the configuration.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use peniko::Color;
use peniko::color::{Srgb, parse_color};
use plotbox_core::{Dimension, DimensionParseError};
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;

use crate::data::{Meta, Row};
use crate::format::{NumberFormatSpec, NumberStyle};

/// A length in a request: a number of pixels or a dimension string such as `"2.5vmin"`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DimensionSpec {
    /// Pixels.
    Number(f64),
    /// Text parsed with [`Dimension::parse`].
    Text(String),
}

impl DimensionSpec {
    /// Converts to a [`Dimension`].
    pub fn to_dimension(&self) -> Result<Dimension, DimensionParseError> {
        match self {
            Self::Number(n) => Ok(Dimension::px(*n)),
            Self::Text(s) => Dimension::parse(s),
        }
    }
}

/// A value that may be given once or as a list.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    /// A single value.
    One(T),
    /// A list of values.
    Many(Vec<T>),
}

impl<T: Clone> OneOrMany<T> {
    /// The values as a list.
    pub fn to_vec(&self) -> Vec<T> {
        match self {
            Self::One(v) => alloc::vec![v.clone()],
            Self::Many(v) => v.clone(),
        }
    }

    /// The first value.
    pub fn first(&self) -> Option<&T> {
        match self {
            Self::One(v) => Some(v),
            Self::Many(v) => v.first(),
        }
    }
}

/// Deserializes booleans the way the chart service always has: `false`, `0`, `"false"` and
/// `null` are false, every other value is true.
pub(crate) fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientBool;

    impl<'de> Visitor<'de> for LenientBool {
        type Value = Option<bool>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a boolean-like value")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v != 0))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v != 0))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v != 0.0))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(Some(v != "false"))
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Some(false))
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Some(false))
        }

        fn visit_some<D2: Deserializer<'de>>(self, d: D2) -> Result<Self::Value, D2::Error> {
            d.deserialize_any(self)
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            while seq.next_element::<de::IgnoredAny>()?.is_some() {}
            Ok(Some(true))
        }

        fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            while map
                .next_entry::<de::IgnoredAny, de::IgnoredAny>()?
                .is_some()
            {}
            Ok(Some(true))
        }
    }

    deserializer.deserialize_any(LenientBool)
}

/// Shared axis styling (`chart.axis`).
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AxisConfig {
    /// Rule and tick color.
    pub stroke: Option<String>,
    /// Rule and tick width.
    pub line_width: Option<DimensionSpec>,
    /// Tick label color.
    pub text_color: Option<String>,
    /// Value highlighted with its own rule and label (timeline charts).
    pub reference_value: Option<f64>,
    /// Color of the reference rule.
    pub reference_stroke: Option<String>,
}

/// Per-axis options (`valueAxis`, `mainAxis`, `xAxis`, `yAxis`, `timeAxis`).
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AxisOptions {
    /// `top`/`bottom` for horizontal axes, `left`/`right` for vertical ones.
    pub position: Option<String>,
    /// Desired number of ticks; `0` means the family default.
    pub tick_count: Option<usize>,
    /// Whether to round the domain to tick multiples.
    #[serde(deserialize_with = "lenient_bool")]
    pub nice: Option<bool>,
    /// Calendar interval for time ticks (`month`, `quarter`, `half-year`, `year`).
    pub tick_interval: Option<String>,
    /// Overrides `chart.labelPrecision` for this axis.
    pub label_precision: Option<usize>,
    /// Overrides `chart.labelStyle` for this axis.
    pub label_style: Option<String>,
    /// Overrides `chart.labelCurrency` for this axis.
    pub label_currency: Option<String>,
}

impl AxisOptions {
    /// The configured tick count, or `default` when unset or zero.
    pub fn tick_count_or(options: Option<&Self>, default: usize) -> usize {
        options
            .and_then(|o| o.tick_count)
            .filter(|&n| n > 0)
            .unwrap_or(default)
    }
}

/// The `chart` object of a request.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfig {
    /// Canvas width in pixels (default 1920).
    pub width: Option<f64>,
    /// Canvas height in pixels (default 1080).
    pub height: Option<f64>,
    /// Canvas fill; transparent when unset.
    pub background: Option<String>,
    /// Horizontal padding around the chart box.
    pub pad_x: Option<DimensionSpec>,
    /// Vertical padding; defaults to `padX`.
    pub pad_y: Option<DimensionSpec>,
    /// CSS font family list for labels.
    pub label_font_family: Option<String>,
    /// Label font size.
    pub label_font_size: Option<DimensionSpec>,
    /// CSS font family list for the legend; defaults to the label family.
    pub legend_font_family: Option<String>,
    /// Legend font size (pie charts).
    pub legend_font_size: Option<DimensionSpec>,
    /// Color of data labels and pie legends.
    pub label_color: Option<String>,
    /// Axis tick length.
    pub tick_length: Option<DimensionSpec>,
    /// Series line width (timeline) or slice outline width (pie).
    pub line_width: Option<DimensionSpec>,
    /// Marker size for scatter charts; defaults to the label font size.
    pub shape_size: Option<DimensionSpec>,
    /// Pie hole radius.
    pub inner_radius: Option<DimensionSpec>,
    /// Pie radius.
    pub outer_radius: Option<DimensionSpec>,
    /// Pie corner radius (accepted, not drawn).
    pub corner_radius: Option<DimensionSpec>,
    /// Angular gap between pie slices, radians.
    pub pad_angle: Option<DimensionSpec>,
    /// Angle of the first pie slice, radians clockwise from 12 o'clock.
    pub start_angle: Option<DimensionSpec>,
    /// Per-series colors (bar, timeline) or slice outline color (pie).
    pub stroke: Option<OneOrMany<String>>,
    /// Palette.
    pub colors: Option<Vec<String>>,
    /// Legend labels of timeline series.
    pub series_label: Option<OneOrMany<String>>,
    /// Twelve month abbreviations for time labels.
    pub months: Option<Vec<String>>,
    /// Locale for number formatting (default `de-DE`).
    pub locale: Option<String>,
    /// `decimal`, `percent` or `currency`.
    pub label_style: Option<String>,
    /// Fraction digits of formatted numbers (default 2).
    pub label_precision: Option<usize>,
    /// ISO 4217 code for the currency style (default `EUR`).
    pub label_currency: Option<String>,
    /// Inner padding between bar groups, as a fraction of the band step.
    pub label_padding: Option<f64>,
    /// Outer padding of the bar group scale.
    pub label_outer_padding: Option<f64>,
    /// Extra padding in front of the last bar group, in units of the inner padding.
    pub last_label_extra_padding_factor: Option<f64>,
    /// Inner padding between bars of one group.
    pub category_padding: Option<f64>,
    /// Legend marker size relative to the font ascent.
    pub legend_sample: Option<f64>,
    /// Fraction of the data extent added on each side of scatter scales.
    pub extra: Option<f64>,
    /// Marker symbol names for scatter series.
    pub shapes: Option<Vec<String>>,
    /// `top`, `bottom`, `left` or `right`.
    pub legend_position: Option<String>,
    /// `left`, `center` or `right`.
    pub legend_align: Option<String>,
    /// Minimum width of a left or right legend.
    pub legend_width: Option<DimensionSpec>,
    /// `top` or `bottom`: the plot edge a left or right legend lines up with.
    pub legend_anchor: Option<String>,
    /// Put each legend entry on its own row.
    #[serde(deserialize_with = "lenient_bool")]
    pub legend_item_per_row: Option<bool>,
    /// Draw the legend.
    #[serde(deserialize_with = "lenient_bool")]
    pub show_legend: Option<bool>,
    /// Draw layout wireframes.
    #[serde(deserialize_with = "lenient_bool")]
    pub show_debug: Option<bool>,
    /// Draw a cross at the pie center.
    #[serde(deserialize_with = "lenient_bool")]
    pub show_center: Option<bool>,
    /// Draw pie slice labels.
    #[serde(deserialize_with = "lenient_bool")]
    pub show_labels: Option<bool>,
    /// Draw pie label leader lines.
    #[serde(deserialize_with = "lenient_bool")]
    pub show_label_debug: Option<bool>,
    /// Chart title.
    pub title: Option<String>,
    /// Chart subtitle, drawn under the title.
    pub subtitle: Option<String>,
    /// Shared axis styling.
    pub axis: AxisConfig,
    /// Value (y) axis of bar and timeline charts.
    pub value_axis: Option<AxisOptions>,
    /// Main (x) axis; the time axis tick settings of timeline charts.
    pub main_axis: Option<AxisOptions>,
    /// Scatter x axis; falls back to `mainAxis`.
    pub x_axis: Option<AxisOptions>,
    /// Scatter y axis; falls back to `valueAxis`.
    pub y_axis: Option<AxisOptions>,
    /// Timeline time axis placement.
    pub time_axis: Option<AxisOptions>,
}

impl ChartConfig {
    /// The number format for an axis, with `axis` overriding the chart-wide settings.
    pub fn number_format(&self, axis: Option<&AxisOptions>) -> NumberFormatSpec {
        let defaults = NumberFormatSpec::default();
        let style = axis
            .and_then(|a| a.label_style.as_deref())
            .or(self.label_style.as_deref())
            .unwrap_or("decimal");
        let currency = axis
            .and_then(|a| a.label_currency.as_deref())
            .or(self.label_currency.as_deref())
            .unwrap_or("EUR");
        NumberFormatSpec {
            style: NumberStyle::from_config(style, currency),
            precision: axis
                .and_then(|a| a.label_precision)
                .or(self.label_precision)
                .unwrap_or(defaults.precision),
            locale: self
                .locale
                .as_deref()
                .map(Arc::from)
                .unwrap_or(defaults.locale),
        }
    }

    /// Whether layout wireframes should be drawn.
    pub fn show_debug(&self) -> bool {
        self.show_debug.unwrap_or(false)
    }
}

/// The optional `debug` object of a request.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Draw layout wireframes.
    #[serde(deserialize_with = "lenient_bool")]
    pub boxes: Option<bool>,
}

/// A complete render request.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartRequest {
    /// Styling and layout options.
    pub chart: ChartConfig,
    /// Logical field name to data field name.
    pub meta: Meta,
    /// Data rows.
    pub data: Vec<Row>,
    /// Debug switches.
    pub debug: Option<DebugConfig>,
}

impl ChartRequest {
    /// Whether either debug switch is on.
    pub fn debug_boxes(&self) -> bool {
        self.chart.show_debug() || self.debug.as_ref().and_then(|d| d.boxes).unwrap_or(false)
    }
}

/// Parses a CSS color.
pub(crate) fn color(text: &str) -> Option<Color> {
    parse_color(text.trim())
        .ok()
        .map(|c| c.to_alpha_color::<Srgb>())
}

/// Parses a configured color, falling back to `fallback` when unset or malformed.
pub(crate) fn color_or(text: Option<&str>, fallback: Color) -> Color {
    match text {
        None => fallback,
        Some(t) => color(t).unwrap_or_else(|| {
            log::warn!("unparsable color {t:?}, using {fallback:?}");
            fallback
        }),
    }
}

/// Parses a list of colors; malformed entries are replaced by the matching `palette` entry.
pub(crate) fn palette_or(texts: Option<&[String]>, palette: &[Color]) -> Vec<Color> {
    match texts {
        Some(list) if !list.is_empty() => list
            .iter()
            .enumerate()
            .map(|(i, t)| color_or(Some(t), palette[i % palette.len()]))
            .collect(),
        _ => palette.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use plotbox_core::Unit;

    use super::*;

    #[test]
    fn booleans_are_lenient() {
        let cases = [
            (r#"false"#, Some(false)),
            (r#"0"#, Some(false)),
            (r#""false""#, Some(false)),
            (r#"null"#, Some(false)),
            (r#"true"#, Some(true)),
            (r#"1"#, Some(true)),
            (r#""true""#, Some(true)),
            (r#""yes""#, Some(true)),
        ];
        for (json, expected) in cases {
            let src = std::format!(r#"{{"showLegend": {json}}}"#);
            let cfg: ChartConfig = serde_json::from_str(&src).unwrap();
            assert_eq!(cfg.show_legend, expected, "showLegend: {json}");
        }
        let cfg: ChartConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.show_legend, None);
    }

    #[test]
    fn dimensions_accept_numbers_and_strings() {
        let cfg: ChartConfig =
            serde_json::from_str(r#"{"padX": 20, "labelFontSize": "2.5vmin", "padY": "20"}"#)
                .unwrap();
        let pad = cfg.pad_x.unwrap().to_dimension().unwrap();
        assert_eq!(pad.leaf(), Some((20.0, &Unit::Px)));
        let font = cfg.label_font_size.unwrap().to_dimension().unwrap();
        assert_eq!(font.leaf(), Some((2.5, &Unit::Vmin)));
        assert!(cfg.pad_y.unwrap().to_dimension().is_err());
    }

    #[test]
    fn axis_overrides_number_format() {
        let cfg: ChartConfig = serde_json::from_str(
            r#"{"locale": "en-US", "labelPrecision": 1,
                "valueAxis": {"labelStyle": "currency", "labelCurrency": "USD", "tickCount": 0}}"#,
        )
        .unwrap();
        let spec = cfg.number_format(cfg.value_axis.as_ref());
        assert_eq!(spec.style, NumberStyle::Currency(Arc::from("USD")));
        assert_eq!(spec.precision, 1);
        assert_eq!(&*spec.locale, "en-US");
        assert_eq!(AxisOptions::tick_count_or(cfg.value_axis.as_ref(), 3), 3);
    }

    #[test]
    fn request_debug_switches() {
        let req: ChartRequest =
            serde_json::from_str(r#"{"chart": {}, "debug": {"boxes": 1}}"#).unwrap();
        assert!(req.debug_boxes());
        assert!(!ChartRequest::default().debug_boxes());
    }

    #[test]
    fn malformed_colors_fall_back() {
        let fallback = Color::from_rgb8(1, 2, 3);
        assert_eq!(color_or(Some("#fff"), fallback), Color::from_rgb8(255, 255, 255));
        assert_eq!(color_or(Some("not a color"), fallback), fallback);
        assert_eq!(color_or(None, fallback), fallback);
        let palette = palette_or(Some(&[std::string::String::from("bogus")]), &[fallback]);
        assert_eq!(palette, [fallback]);
    }
}
