// Copyright 2025 the Plotbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data rows and field accessors.
//!
//! Requests carry rows as loosely typed JSON objects plus a `meta` table that renames the fields
//! a chart reads. An [`Accessor`] resolves a logical field (`value`, `label`, ...) through that
//! table once per render and then reads it from every row.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use chrono::DateTime;
use hashbrown::HashMap;
use serde::Deserialize;

/// A single cell of a data row.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// `true` / `false`.
    Bool(bool),
    /// Any JSON number.
    Number(f64),
    /// A string.
    Text(String),
    /// `null`.
    Null,
}

impl Value {
    /// Reads the cell as a number; numeric strings are accepted.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Null => None,
        }
    }

    /// Reads the cell as display text. Empty strings count as missing.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Text(s) if s.is_empty() => None,
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) => Some(format!("{n}")),
            Self::Bool(b) => Some(b.to_string()),
            Self::Null => None,
        }
    }

    /// Reads the cell as epoch milliseconds: a number, or an RFC 3339 timestamp string.
    pub fn as_timestamp(&self) -> Option<f64> {
        match self {
            Self::Text(s) => match DateTime::parse_from_rfc3339(s.trim()) {
                #[allow(clippy::cast_precision_loss, reason = "epoch milliseconds fit f64")]
                Ok(dt) => Some(dt.timestamp_millis() as f64),
                Err(_) => self.as_f64(),
            },
            _ => self.as_f64(),
        }
    }
}

/// A data row.
pub type Row = BTreeMap<String, Value>;

/// A `meta` entry: a field name, or a list of them.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    /// One field.
    One(String),
    /// Several fields (e.g. one per timeline series).
    Many(Vec<String>),
}

/// Logical field name to data field name(s).
pub type Meta = BTreeMap<String, MetaValue>;

/// Reads one logical field from rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Accessor {
    field: String,
}

impl Accessor {
    /// Resolves `name` through `meta`, falling back to `name` itself.
    ///
    /// A list-valued entry resolves to its first element.
    pub fn new(name: &str, meta: &Meta) -> Self {
        let field = match meta.get(name) {
            Some(MetaValue::One(field)) => field.clone(),
            Some(MetaValue::Many(fields)) => fields
                .first()
                .cloned()
                .unwrap_or_else(|| name.to_string()),
            None => name.to_string(),
        };
        Self { field }
    }

    /// Resolves a possibly list-valued entry into one accessor per element.
    ///
    /// Each element is itself resolved through `meta` once more, so `meta` can map series
    /// names to data fields.
    pub fn many(name: &str, meta: &Meta) -> Vec<Self> {
        match meta.get(name) {
            Some(MetaValue::Many(fields)) => fields.iter().map(|f| Self::new(f, meta)).collect(),
            Some(MetaValue::One(field)) if field != name => alloc::vec![Self::new(field, meta)],
            _ => alloc::vec![Self::new(name, meta)],
        }
    }

    /// The data field this accessor reads.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The raw cell, if present.
    pub fn get<'r>(&self, row: &'r Row) -> Option<&'r Value> {
        row.get(&self.field)
    }

    /// The cell as a number.
    pub fn number(&self, row: &Row) -> Option<f64> {
        self.get(row).and_then(Value::as_f64)
    }

    /// The cell as text.
    pub fn text(&self, row: &Row) -> Option<String> {
        self.get(row).and_then(Value::as_text)
    }

    /// The cell as epoch milliseconds.
    pub fn timestamp(&self, row: &Row) -> Option<f64> {
        self.get(row).and_then(Value::as_timestamp)
    }
}

/// Distinct names in first-seen order.
#[derive(Clone, Debug, Default)]
pub(crate) struct Ordinal {
    pub(crate) names: Vec<String>,
    index: HashMap<String, usize>,
}

impl Ordinal {
    /// Index of `name`, appending it when new.
    pub(crate) fn insert(&mut self, name: String) -> usize {
        if let Some(&i) = self.index.get(&name) {
            return i;
        }
        let i = self.names.len();
        self.index.insert(name.clone(), i);
        self.names.push(name);
        i
    }

    pub(crate) fn len(&self) -> usize {
        self.names.len()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn row(json: &str) -> Row {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn accessors_follow_meta_aliases() {
        let meta: Meta = serde_json::from_str(r#"{"value": "amount"}"#).unwrap();
        let r = row(r#"{"amount": 12.5, "value": 1}"#);
        let value = Accessor::new("value", &meta);
        assert_eq!(value.field(), "amount");
        assert_eq!(value.number(&r), Some(12.5));

        let label = Accessor::new("label", &meta);
        assert_eq!(label.text(&r), None);
    }

    #[test]
    fn list_meta_resolves_each_series() {
        let meta: Meta =
            serde_json::from_str(r#"{"value": ["a", "b"], "b": "beta"}"#).unwrap();
        let fields: std::vec::Vec<_> = Accessor::many("value", &meta)
            .iter()
            .map(|a| a.field().to_string())
            .collect();
        assert_eq!(fields, ["a", "beta"]);
        assert_eq!(Accessor::many("timestamp", &meta)[0].field(), "timestamp");
    }

    #[test]
    fn cells_convert_leniently() {
        let r = row(r#"{"n": "4.5", "t": "2021-01-01T00:00:00Z", "z": null, "s": ""}"#);
        assert_eq!(Accessor::new("n", &Meta::new()).number(&r), Some(4.5));
        assert_eq!(
            Accessor::new("t", &Meta::new()).timestamp(&r),
            Some(1_609_459_200_000.0)
        );
        assert_eq!(Accessor::new("z", &Meta::new()).number(&r), None);
        assert_eq!(Accessor::new("s", &Meta::new()).text(&r), None);
    }

    #[test]
    fn ordinal_keeps_first_seen_order() {
        let mut o = Ordinal::default();
        assert_eq!(o.insert("b".into()), 0);
        assert_eq!(o.insert("a".into()), 1);
        assert_eq!(o.insert("b".into()), 0);
        assert_eq!(o.names, ["b", "a"]);
        assert_eq!(o.len(), 2);
    }
}
