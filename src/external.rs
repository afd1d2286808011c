//! The external values a color can arrive as, and leave as: a string, a packed number, a keyed
//! record, or a tuple. These mirror what a binding layer (a settings file, a widget's data model)
//! actually holds, so they can also be moved to and from `serde_json` values directly.

use serde_derive::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// An insertion-ordered record of channel names to values. `None` is `null`.
///
/// Order matters because a record is written back out with the caller's own keys, in the caller's
/// own order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ColorRecord(pub Vec<(String, Option<f64>)>);

impl ColorRecord {
    /// Creates an empty record.
    pub fn new() -> ColorRecord {
        ColorRecord(Vec::new())
    }

    /// Appends a key and value.
    pub fn push<K: Into<String>>(&mut self, key: K, value: Option<f64>) {
        self.0.push((key.into(), value));
    }

    /// The keys, in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    /// Looks up a value by exact key.
    pub fn get(&self, key: &str) -> Option<Option<f64>> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> From<Vec<(K, f64)>> for ColorRecord {
    fn from(pairs: Vec<(K, f64)>) -> ColorRecord {
        ColorRecord(pairs.into_iter().map(|(k, v)| (k.into(), Some(v))).collect())
    }
}

/// A color as it exists outside this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExternalValue {
    /// A packed `0xRRGGBB` or `0xRRGGBBAA` integer.
    Number(f64),
    /// Any textual notation: CSS, or an object or tuple written out as text.
    String(String),
    /// A keyed record like `{r: 255, g: 0, b: 102}`.
    Object(ColorRecord),
    /// A positional sRGB tuple like `[255, 0, 102]`.
    Tuple(Vec<Option<f64>>),
}

impl From<&str> for ExternalValue {
    fn from(s: &str) -> ExternalValue {
        ExternalValue::String(s.to_string())
    }
}

impl From<String> for ExternalValue {
    fn from(s: String) -> ExternalValue {
        ExternalValue::String(s)
    }
}

impl From<f64> for ExternalValue {
    fn from(n: f64) -> ExternalValue {
        ExternalValue::Number(n)
    }
}

impl From<u32> for ExternalValue {
    fn from(n: u32) -> ExternalValue {
        ExternalValue::Number(f64::from(n))
    }
}

impl From<ColorRecord> for ExternalValue {
    fn from(r: ColorRecord) -> ExternalValue {
        ExternalValue::Object(r)
    }
}

impl From<Vec<f64>> for ExternalValue {
    fn from(t: Vec<f64>) -> ExternalValue {
        ExternalValue::Tuple(t.into_iter().map(Some).collect())
    }
}

/// Reads a JSON value as an optional number: `null` is `Some(None)`, anything non-numeric is
/// `None`.
fn json_number(v: &Value) -> Option<Option<f64>> {
    match v {
        Value::Null => Some(None),
        Value::Number(n) => n.as_f64().map(Some),
        _ => None,
    }
}

fn number_to_json(v: Option<f64>) -> Value {
    match v {
        // integers print as integers
        Some(x) if x.fract() == 0.0 && x.abs() < 9.0e15 => Value::Number(Number::from(x as i64)),
        Some(x) => Number::from_f64(x).map(Value::Number).unwrap_or(Value::Null),
        None => Value::Null,
    }
}

impl ExternalValue {
    /// Converts a JSON value. Returns `None` for JSON that can't hold a color at all (booleans,
    /// `null`, or containers with non-numeric members).
    pub fn from_json(value: &Value) -> Option<ExternalValue> {
        match value {
            Value::Number(n) => n.as_f64().map(ExternalValue::Number),
            Value::String(s) => Some(ExternalValue::String(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(json_number)
                .collect::<Option<Vec<_>>>()
                .map(ExternalValue::Tuple),
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| json_number(v).map(|n| (k.clone(), n)))
                .collect::<Option<Vec<_>>>()
                .map(|pairs| ExternalValue::Object(ColorRecord(pairs))),
            Value::Null | Value::Bool(_) => None,
        }
    }

    /// Converts to a JSON value. Whole numbers become JSON integers.
    pub fn to_json(&self) -> Value {
        match self {
            ExternalValue::Number(n) => number_to_json(Some(*n)),
            ExternalValue::String(s) => Value::String(s.clone()),
            ExternalValue::Tuple(items) => {
                Value::Array(items.iter().map(|v| number_to_json(*v)).collect())
            }
            ExternalValue::Object(record) => {
                let mut map = Map::new();
                for (k, v) in &record.0 {
                    map.insert(k.clone(), number_to_json(*v));
                }
                Value::Object(map)
            }
        }
    }
}
