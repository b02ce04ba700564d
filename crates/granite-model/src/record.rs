//! Dynamic record and value plumbing.
//!
//! Records are JSON object maps: every source is reduced to one before
//! mapping, and generic destinations are produced as one. `ValueKind`
//! describes the declared kind of a destination property or constructor
//! parameter and supplies the zero value used when construction has
//! nothing better.

use serde::{Deserialize, Serialize};

/// A single dynamic value.
pub type Value = serde_json::Value;

/// An ordered string-keyed record of dynamic values.
pub type Record = serde_json::Map<String, Value>;

/// Declared kind of a property or constructor parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Integer number.
    Int,
    /// Floating-point number.
    Float,
    /// Boolean.
    Bool,
    /// String.
    Text,
    /// Nested record (JSON object).
    Record,
    /// List (JSON array).
    List,
    /// Any value; no kind constraint.
    Any,
}

impl ValueKind {
    /// The zero value for this kind, used when a constructor parameter has
    /// no matching data, no declared default, and is not nullable.
    #[must_use]
    pub fn zero(self) -> Value {
        match self {
            Self::Int => Value::from(0),
            Self::Float => Value::from(0.0),
            Self::Bool => Value::Bool(false),
            Self::Text => Value::String(String::new()),
            Self::Record => Value::Object(Record::new()),
            Self::List => Value::Array(Vec::new()),
            Self::Any => Value::Null,
        }
    }

    /// Whether `value` is acceptable for this kind. Null is accepted
    /// everywhere; numeric kinds accept any JSON number.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Any => true,
            _ if value.is_null() => true,
            Self::Int | Self::Float => value.is_number(),
            Self::Bool => value.is_boolean(),
            Self::Text => value.is_string(),
            Self::Record => value.is_object(),
            Self::List => value.is_array(),
        }
    }
}

/// Runtime kind name of a value, used in error messages.
#[must_use]
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Resolves a `.`-delimited path against a record.
///
/// Any missing segment, or a segment landing on a non-record value, yields
/// `None` rather than an error.
#[must_use]
pub fn dot_get<'a>(record: &'a Record, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = record.get(first)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}
