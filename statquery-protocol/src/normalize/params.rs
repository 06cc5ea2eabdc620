use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Output parameter names. `sortby` and `topk` are lowercase on the wire
/// even though the query fields are camel-cased.
pub mod keys {
    pub const SELECT: &str = "select";
    pub const TIME_RANGE: &str = "timeRange";
    pub const TS_ASCENDING: &str = "tsAscending";
    pub const SORT: &str = "sort";
    pub const SORT_BY: &str = "sortby";
    pub const TIME_UNIT: &str = "timeUnit";
    pub const FILTER: &str = "filter";
    pub const REALTIME: &str = "realtime";
    pub const ACCURACY: &str = "accuracy";
    pub const LIMIT: &str = "limit";
    pub const TOP_K: &str = "topk";
}

/// A single parameter value: text, a whole number, or a fractional number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(u64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(text) => Some(text),
            ParamValue::Number(_) | ParamValue::Float(_) => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ParamValue::Number(number) => Some(*number),
            ParamValue::Float(_) | ParamValue::Text(_) => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Number(number) => Some(*number as f64),
            ParamValue::Float(number) => Some(*number),
            ParamValue::Text(_) => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, ParamValue::Number(_) | ParamValue::Float(_))
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(number) => write!(f, "{number}"),
            ParamValue::Float(number) => write!(f, "{number}"),
            ParamValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

/// Booleans travel as the strings `"true"`/`"false"`.
impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Number(u64::from(value))
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        ParamValue::Number(value)
    }
}

/// Whole non-negative values collapse to [`ParamValue::Number`], so `1.0`
/// renders as `1` rather than `1.0`.
impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        if value.fract() == 0.0 && (0.0..=u64::MAX as f64).contains(&value) {
            ParamValue::Number(value as u64)
        } else {
            ParamValue::Float(value)
        }
    }
}

/// Flat parameter set ready for a transport layer.
///
/// Keys are kept sorted so that the JSON and query-string renderings are
/// deterministic; the order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedParameters(BTreeMap<String, ParamValue>);

impl NormalizedParameters {
    pub(crate) fn insert(&mut self, key: &str, value: impl Into<ParamValue>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// Text value for `key`, if present and textual.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ParamValue::as_str)
    }

    /// Numeric value for `key`, if present and numeric.
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(ParamValue::as_u64)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ParamValue> {
        self.0.iter()
    }

    pub fn into_inner(self) -> BTreeMap<String, ParamValue> {
        self.0
    }

    /// JSON object with string and number members.
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .0
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    ParamValue::Number(number) => serde_json::Value::from(*number),
                    ParamValue::Float(number) => serde_json::Value::from(*number),
                    ParamValue::Text(text) => serde_json::Value::from(text.as_str()),
                };
                (key.clone(), value)
            })
            .collect();
        serde_json::Value::Object(map)
    }

    /// `application/x-www-form-urlencoded` rendering, keys in sorted order.
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.0 {
            serializer.append_pair(key, &value.to_string());
        }
        serializer.finish()
    }
}

impl<'a> IntoIterator for &'a NormalizedParameters {
    type Item = (&'a String, &'a ParamValue);
    type IntoIter = btree_map::Iter<'a, String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for NormalizedParameters {
    type Item = (String, ParamValue);
    type IntoIter = btree_map::IntoIter<String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
