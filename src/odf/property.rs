//! Typed property records carried by every structural call.
//!
//! A [`PropertyRecord`] is an ordered map from namespaced attribute keys
//! (`fo:font-size`, `style:font-name`, `librevenge:list-id`, ...) to typed
//! [`PropertyValue`]s, plus named child sequences of further records
//! (tab stops, gradient stops, path segments, formula tokens).
//!
//! Insertion order is significant: it drives both the attribute order of the
//! emitted XML and the canonical key used for style deduplication.

use crate::common::unit::{Unit, format_decimal, format_measure, format_real, parse_length_inches};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of keys that steer the generator and never reach the output as attributes.
pub const INTERNAL_PREFIX: &str = "librevenge:";

/// Returns `true` if `key` is an internal steering key.
#[inline]
pub fn is_internal_key(key: &str) -> bool {
    key.starts_with(INTERNAL_PREFIX)
}

/// A single typed property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Real(f64),
    Boolean(bool),
    /// A number tagged with a unit (lengths, percentages)
    Measure(f64, Unit),
}

impl PropertyValue {
    /// Render the value the way it appears in an ODF attribute.
    ///
    /// # Examples
    ///
    /// ```
    /// use odfgen::odf::PropertyValue;
    /// use odfgen::common::Unit;
    ///
    /// assert_eq!(PropertyValue::Measure(0.5, Unit::Inch).to_odf_string(), "0.5in");
    /// assert_eq!(PropertyValue::Measure(0.3, Unit::Percent).to_odf_string(), "30%");
    /// assert_eq!(PropertyValue::Integer(3).to_odf_string(), "3");
    /// assert_eq!(PropertyValue::Boolean(true).to_odf_string(), "true");
    /// ```
    pub fn to_odf_string(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Integer(i) => {
                let mut buffer = itoa::Buffer::new();
                buffer.format(*i).to_string()
            },
            Self::Real(r) => format_real(*r),
            Self::Boolean(b) => if *b { "true" } else { "false" }.to_string(),
            Self::Measure(value, unit) => format_measure(*value, *unit),
        }
    }

    /// Borrow the value as a string, if it is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Interpret the value as an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Real(r) | Self::Measure(r, _) => Some(r.round() as i64),
            Self::Boolean(b) => Some(i64::from(*b)),
            Self::String(s) => s.trim().parse().ok(),
        }
    }

    /// Interpret the value as a floating point number, ignoring its unit
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Real(r) | Self::Measure(r, _) => Some(*r),
            Self::Boolean(_) => None,
            Self::String(s) => s.trim().parse().ok(),
        }
    }

    /// Interpret the value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            Self::Integer(i) => Some(*i != 0),
            Self::String(s) => match s.as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Interpret the value as a length in inches
    pub fn as_inches(&self) -> Option<f64> {
        match self {
            Self::Measure(value, unit) => unit.to_inches(*value),
            Self::Integer(i) => Some(*i as f64),
            Self::Real(r) => Some(*r),
            Self::String(s) => parse_length_inches(s),
            Self::Boolean(_) => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_odf_string())
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for PropertyValue {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<usize> for PropertyValue {
    fn from(i: usize) -> Self {
        Self::Integer(i as i64)
    }
}

impl From<f64> for PropertyValue {
    fn from(r: f64) -> Self {
        Self::Real(r)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

/// Ordered property map with optional child sequences.
///
/// # Examples
///
/// ```
/// use odfgen::odf::PropertyRecord;
///
/// let record = PropertyRecord::new()
///     .with("fo:font-weight", "bold")
///     .with("librevenge:list-id", 3);
///
/// assert_eq!(record.get_str("fo:font-weight"), Some("bold"));
/// assert_eq!(record.get_int("librevenge:list-id"), Some(3));
/// assert_eq!(record.canonical_key(), "[fo:font-weight:bold][librevenge:list-id:3]");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    entries: Vec<(String, PropertyValue)>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<(String, Vec<PropertyRecord>)>,
}

impl PropertyRecord {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[inline]
    pub fn with(mut self, key: &str, value: impl Into<PropertyValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder-style child sequence
    #[inline]
    pub fn with_children(mut self, key: &str, children: Vec<PropertyRecord>) -> Self {
        self.set_children(key, children);
        self
    }

    /// Insert or replace a value.
    ///
    /// Replacing keeps the key at its original position.
    pub fn insert(&mut self, key: &str, value: impl Into<PropertyValue>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    /// Remove a value, returning it
    pub fn remove(&mut self, key: &str) -> Option<PropertyValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Borrow a string value
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(PropertyValue::as_str)
    }

    /// Any value rendered as its ODF string
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).map(PropertyValue::to_odf_string)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(PropertyValue::as_int)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(PropertyValue::as_f64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(PropertyValue::as_bool)
    }

    /// A length value converted to inches
    pub fn get_inches(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(PropertyValue::as_inches)
    }

    /// Iterate over the scalar entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of scalar entries
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the record has neither entries nor children
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.children.is_empty()
    }

    /// Replace (or add) a named child sequence
    pub fn set_children(&mut self, key: &str, children: Vec<PropertyRecord>) {
        match self.children.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = children,
            None => self.children.push((key.to_string(), children)),
        }
    }

    /// Borrow a named child sequence
    pub fn children(&self, key: &str) -> Option<&[PropertyRecord]> {
        self.children
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    pub fn remove_children(&mut self, key: &str) -> Option<Vec<PropertyRecord>> {
        let index = self.children.iter().position(|(k, _)| k == key)?;
        Some(self.children.remove(index).1)
    }

    /// Iterate over every child sequence in insertion order
    pub fn child_sequences(&self) -> impl Iterator<Item = (&str, &[PropertyRecord])> {
        self.children.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Canonical deduplication key.
    ///
    /// Concatenates `[key:value]` for every entry in insertion order, then
    /// `[key:(...)]` for every child sequence with its records recursively
    /// keyed. Two records holding the same pairs in a different order yield
    /// different keys.
    pub fn canonical_key(&self) -> String {
        let mut key = String::new();
        self.write_canonical_key(&mut key);
        key
    }

    fn write_canonical_key(&self, out: &mut String) {
        for (k, v) in &self.entries {
            out.push('[');
            out.push_str(k);
            out.push(':');
            out.push_str(&v.to_odf_string());
            out.push(']');
        }
        for (k, records) in &self.children {
            out.push('[');
            out.push_str(k);
            out.push_str(":(");
            for record in records {
                out.push('(');
                record.write_canonical_key(out);
                out.push(')');
            }
            out.push_str(")]");
        }
    }

    /// Copy of the record without internal `librevenge:` entries.
    ///
    /// Child sequences are kept as they are.
    pub fn style_attributes(&self) -> PropertyRecord {
        PropertyRecord {
            entries: self
                .entries
                .iter()
                .filter(|(k, _)| !is_internal_key(k))
                .cloned()
                .collect(),
            children: self.children.clone(),
        }
    }

    /// Copy of `self` with every entry and child sequence of `overlay` applied on top
    pub fn merged(&self, overlay: &PropertyRecord) -> PropertyRecord {
        let mut merged = self.clone();
        for (k, v) in &overlay.entries {
            merged.insert(k, v.clone());
        }
        for (k, children) in &overlay.children {
            merged.set_children(k, children.clone());
        }
        merged
    }

    /// Entries whose key satisfies `filter`, in insertion order
    pub fn filtered(&self, filter: impl Fn(&str) -> bool) -> PropertyRecord {
        PropertyRecord {
            entries: self
                .entries
                .iter()
                .filter(|(k, _)| filter(k))
                .cloned()
                .collect(),
            children: Vec::new(),
        }
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> FromIterator<(K, V)> for PropertyRecord {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut record = PropertyRecord::new();
        for (k, v) in iter {
            let key: String = k.into();
            record.insert(&key, v);
        }
        record
    }
}

/// Format a length in inches with four decimals at most
#[inline]
pub fn inches(value: f64) -> String {
    let mut s = format_decimal(value, 4);
    s.push_str("in");
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut record = PropertyRecord::new().with("a", 1).with("b", 2);
        record.insert("a", 3);
        assert_eq!(record.canonical_key(), "[a:3][b:2]");
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_canonical_key_order_sensitive() {
        let first = PropertyRecord::new().with("fo:font-weight", "bold").with("fo:color", "#ff0000");
        let second = PropertyRecord::new().with("fo:color", "#ff0000").with("fo:font-weight", "bold");
        assert_ne!(first.canonical_key(), second.canonical_key());
    }

    #[test]
    fn test_canonical_key_children() {
        let stop = PropertyRecord::new().with("style:position", PropertyValue::Measure(1.0, Unit::Inch));
        let record = PropertyRecord::new()
            .with("fo:margin-left", PropertyValue::Measure(0.25, Unit::Inch))
            .with_children("style:tab-stops", vec![stop]);
        assert_eq!(
            record.canonical_key(),
            "[fo:margin-left:0.25in][style:tab-stops:(([style:position:1in]))]"
        );
    }

    #[test]
    fn test_style_attributes_strips_internal() {
        let record = PropertyRecord::new()
            .with("librevenge:paragraph-id", 4)
            .with("fo:text-align", "center");
        let style = record.style_attributes();
        assert_eq!(style.len(), 1);
        assert!(style.contains("fo:text-align"));
    }

    #[test]
    fn test_merged_overlay() {
        let base = PropertyRecord::new().with("fo:font-size", "10pt").with("fo:color", "#000000");
        let overlay = PropertyRecord::new().with("fo:color", "#ffffff").with("fo:font-style", "italic");
        let merged = base.merged(&overlay);
        assert_eq!(merged.get_str("fo:color"), Some("#ffffff"));
        assert_eq!(merged.canonical_key(), "[fo:font-size:10pt][fo:color:#ffffff][fo:font-style:italic]");
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(PropertyValue::from("12").as_int(), Some(12));
        assert_eq!(PropertyValue::Measure(72.0, Unit::Point).as_inches(), Some(1.0));
        assert_eq!(PropertyValue::from("0.5in").as_inches(), Some(0.5));
        assert_eq!(PropertyValue::from("true").as_bool(), Some(true));
        assert_eq!(PropertyValue::Real(2.0).to_odf_string(), "2");
        assert_eq!(PropertyValue::Measure(1440.0, Unit::Twip).to_odf_string(), "1in");
    }

    #[test]
    fn test_collect_from_pairs() {
        let record = PropertyRecord::new().with("fo:color", "#123456");
        let cloned: PropertyRecord = record.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
        assert_eq!(record, cloned);
    }

    #[test]
    fn test_serde_json_round_trip() {
        let record = PropertyRecord::new()
            .with("fo:color", "#123456")
            .with("librevenge:list-id", 4)
            .with("draw:opacity", PropertyValue::Real(0.5))
            .with("style:print", true)
            .with("fo:font-size", PropertyValue::Measure(12.0, Unit::Point))
            .with_children(
                "style:tab-stops",
                vec![PropertyRecord::new().with("style:position", PropertyValue::Measure(1.0, Unit::Inch))],
            );
        let json = serde_json::to_string(&record).unwrap();
        let back: PropertyRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
        assert_eq!(back.canonical_key(), record.canonical_key());

        let flat: PropertyRecord = serde_json::from_str(r#"{"entries":[["fo:color",{"String":"red"}]]}"#).unwrap();
        assert_eq!(flat.get_str("fo:color"), Some("red"));
    }
}
