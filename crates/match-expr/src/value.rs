use std::collections::BTreeMap;

use serde::Serialize;

/// Runtime value of the expression language.
///
/// Records are bound by serializing them into this tree, so whatever a
/// record's serde representation is, that is exactly what rule authors see.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Truthiness for boolean contexts: `null`, `false`, `0`, `NaN`, the
    /// empty string, and the empty list are falsy; maps are always truthy.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Map(_) => true,
        }
    }

    /// Numeric coercion for scoring contexts: booleans map to 0/1, numeric
    /// strings parse, everything non-numeric (including NaN) maps to 0.
    pub fn as_number(&self) -> f64 {
        match self {
            Value::Null => 0.0,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Number(n) => {
                if n.is_nan() {
                    0.0
                } else {
                    *n
                }
            }
            Value::Str(s) => match s.trim().parse::<f64>() {
                Ok(n) if !n.is_nan() => n,
                _ => 0.0,
            },
            Value::List(_) | Value::Map(_) => 0.0,
        }
    }

    /// Field lookup. Anything other than a map with that key yields `Null`,
    /// which is how missing record sections degrade to falsy instead of
    /// erroring.
    pub fn field(&self, name: &str) -> Value {
        match self {
            Value::Map(entries) => entries.get(name).cloned().unwrap_or(Value::Null),
            _ => Value::Null,
        }
    }

    pub fn from_json(json: serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Value::from_json(value)))
                    .collect(),
            ),
        }
    }

    /// Bind any serializable record as an expression value. A record that
    /// cannot be represented (which plain data records never are) binds as
    /// `Null` rather than failing the evaluation.
    pub fn from_record<T: Serialize>(record: &T) -> Value {
        serde_json::to_value(record)
            .map(Value::from_json)
            .unwrap_or(Value::Null)
    }
}
