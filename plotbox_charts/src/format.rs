// Copyright 2025 the Plotbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Number formatting hooks for tick and value labels.
//!
//! Real locale data is out of scope: charts call a [`NumberFormatter`] and the embedder may
//! supply one backed by ICU or the host platform. [`BasicNumberFormatter`] knows the decimal
//! and grouping conventions of a handful of locales, which is enough for tick labels.

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};
use alloc::sync::Arc;

/// How a number is presented.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NumberStyle {
    /// Plain decimal number.
    Decimal,
    /// The value times 100 followed by a percent sign.
    Percent,
    /// A monetary amount in the given ISO 4217 currency.
    Currency(Arc<str>),
}

impl NumberStyle {
    /// Builds a style from `labelStyle` / `labelCurrency` configuration values.
    ///
    /// Unknown style names are treated as decimal.
    pub fn from_config(style: &str, currency: &str) -> Self {
        match style {
            "percent" => Self::Percent,
            "currency" => Self::Currency(Arc::from(currency)),
            _ => Self::Decimal,
        }
    }
}

/// Everything needed to format one axis' labels.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NumberFormatSpec {
    /// Presentation style.
    pub style: NumberStyle,
    /// Exact number of fraction digits.
    pub precision: usize,
    /// BCP 47 locale tag, e.g. `de-DE`.
    pub locale: Arc<str>,
}

impl Default for NumberFormatSpec {
    fn default() -> Self {
        Self {
            style: NumberStyle::Decimal,
            precision: 2,
            locale: Arc::from("de-DE"),
        }
    }
}

/// Formats numbers for display.
pub trait NumberFormatter {
    /// Formats `value` according to `spec`.
    fn format(&self, value: f64, spec: &NumberFormatSpec) -> String;
}

/// A small table-driven formatter.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicNumberFormatter;

struct Conventions {
    decimal: char,
    group: Option<char>,
    // Whether symbols (currency, percent) follow the number after a no-break space.
    suffix_symbols: bool,
}

fn conventions(locale: &str) -> Conventions {
    let lang = locale.split(['-', '_']).next().unwrap_or("");
    match (lang, locale) {
        (_, "de-CH") => Conventions {
            decimal: '.',
            group: Some('\u{2019}'),
            suffix_symbols: true,
        },
        ("fr", _) => Conventions {
            decimal: ',',
            group: Some('\u{202f}'),
            suffix_symbols: true,
        },
        ("de" | "es" | "it" | "nl" | "pt" | "da" | "id", _) => Conventions {
            decimal: ',',
            group: Some('.'),
            suffix_symbols: true,
        },
        ("sv" | "nb" | "fi" | "cs" | "pl" | "ru", _) => Conventions {
            decimal: ',',
            group: Some('\u{a0}'),
            suffix_symbols: true,
        },
        _ => Conventions {
            decimal: '.',
            group: Some(','),
            suffix_symbols: false,
        },
    }
}

fn currency_symbol(code: &str) -> &str {
    match code {
        "EUR" => "€",
        "USD" => "$",
        "GBP" => "£",
        "JPY" => "¥",
        _ => code,
    }
}

impl NumberFormatter for BasicNumberFormatter {
    fn format(&self, value: f64, spec: &NumberFormatSpec) -> String {
        if !value.is_finite() {
            return value.to_string();
        }
        let conv = conventions(&spec.locale);
        let scaled = match spec.style {
            NumberStyle::Percent => value * 100.0,
            _ => value,
        };
        let digits = format!("{:.*}", spec.precision, scaled.abs());
        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (digits.as_str(), None),
        };
        let mut body = group_digits(int_part, conv.group);
        if let Some(frac) = frac_part {
            body.push(conv.decimal);
            body.push_str(frac);
        }
        // `-0.00` reads as zero.
        let negative = scaled < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0');
        let sign = if negative { "-" } else { "" };
        match &spec.style {
            NumberStyle::Decimal => format!("{sign}{body}"),
            NumberStyle::Percent if conv.suffix_symbols => format!("{sign}{body}\u{a0}%"),
            NumberStyle::Percent => format!("{sign}{body}%"),
            NumberStyle::Currency(code) if conv.suffix_symbols => {
                format!("{sign}{body}\u{a0}{}", currency_symbol(code))
            }
            NumberStyle::Currency(code) => format!("{sign}{}{body}", currency_symbol(code)),
        }
    }
}

fn group_digits(int_part: &str, group: Option<char>) -> String {
    let Some(sep) = group else {
        return int_part.to_string();
    };
    let len = int_part.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn spec(style: NumberStyle, precision: usize, locale: &str) -> NumberFormatSpec {
        NumberFormatSpec {
            style,
            precision,
            locale: Arc::from(locale),
        }
    }

    #[test]
    fn german_decimal_uses_comma_and_dot_grouping() {
        let f = BasicNumberFormatter;
        let s = spec(NumberStyle::Decimal, 2, "de-DE");
        assert_eq!(f.format(1234.5, &s), "1.234,50");
        assert_eq!(f.format(0.0, &s), "0,00");
        assert_eq!(f.format(-1234567.0, &s), "-1.234.567,00");
        assert_eq!(f.format(-0.001, &s), "0,00");
    }

    #[test]
    fn english_places_symbols_before() {
        let f = BasicNumberFormatter;
        let cur = spec(NumberStyle::Currency(Arc::from("USD")), 2, "en-US");
        assert_eq!(f.format(1234.5, &cur), "$1,234.50");
        let pct = spec(NumberStyle::Percent, 1, "en-US");
        assert_eq!(f.format(0.125, &pct), "12.5%");
    }

    #[test]
    fn german_places_symbols_after() {
        let f = BasicNumberFormatter;
        let cur = spec(NumberStyle::from_config("currency", "EUR"), 0, "de-DE");
        assert_eq!(f.format(50.0, &cur), "50\u{a0}€");
        let pct = spec(NumberStyle::from_config("percent", "EUR"), 0, "de-DE");
        assert_eq!(f.format(0.5, &pct), "50\u{a0}%");
    }
}
