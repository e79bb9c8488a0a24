use std::fmt;

use calamine::Data;
use serde::{Deserialize, Serialize};

/// A single cell value held by a [`crate::rows::Row`].
///
/// Delimited sources only ever produce [`Value::Text`]; workbook cells map to
/// the closest variant. [`Value::Unset`] marks a declared column that the
/// source never wrote.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Unset,
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl Value {
    pub fn is_unset(&self) -> bool {
        matches!(self, Value::Unset)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_display(&self) -> String {
        match self {
            Value::Unset => "null".to_string(),
            Value::Text(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => {
                if f.fract() == 0.0 && f.is_finite() {
                    (*f as i64).to_string()
                } else {
                    f.to_string()
                }
            }
            Value::Boolean(b) => b.to_string(),
        }
    }

    /// Numeric view used for coordinates. Text is trimmed and parsed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Text(s) => s.trim().parse().ok(),
            Value::Unset | Value::Boolean(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&Data> for Value {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::String(s) => Value::Text(s.clone()),
            Data::Int(i) => Value::Integer(*i),
            Data::Float(f) => Value::Float(*f),
            Data::Bool(b) => Value::Boolean(*b),
            Data::Empty => Value::Text(String::new()),
            other => Value::Text(other.to_string()),
        }
    }
}

/// Text of a workbook header cell; numeric headers render without a
/// trailing `.0`.
pub fn cell_text(cell: &Data) -> String {
    Value::from(cell).as_display().trim().to_string()
}
