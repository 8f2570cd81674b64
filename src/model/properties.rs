//! Named property access shared by every element record.
//!
//! Each record publishes an ordered list of exported field names. Adapters for external
//! lattice engines, and the crate's own file layer, read and write records exclusively
//! through this list so that the typed setters (and the recomputation they trigger) are
//! always the single path for mutation.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// -2^63 and 2^63: the first is exactly i64::MIN, the second is one past i64::MAX.
const I64_FLOAT_MIN: f64 = i64::MIN as f64;
const I64_FLOAT_END: f64 = -(i64::MIN as f64);

/// Dynamically typed value of an exported record field.
///
/// Untagged on the wire: integers, floats, strings and float arrays map directly onto their
/// TOML/JSON counterparts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Int(i64),
    Float(f64),
    Text(String),
    Array(Vec<f64>),
}

impl PropertyValue {
    /// Short type label used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Int(_) => "integer",
            PropertyValue::Float(_) => "float",
            PropertyValue::Text(_) => "string",
            PropertyValue::Array(_) => "array",
        }
    }

    /// Returns the value as a float, widening integers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Int(v) => Some(*v as f64),
            PropertyValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as an integer. Floats are accepted only when integral and within
    /// the `i64` range.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(v) => Some(*v),
            PropertyValue::Float(v)
                if v.fract() == 0.0 && (I64_FLOAT_MIN..I64_FLOAT_END).contains(v) =>
            {
                Some(*v as i64)
            }
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as a float array; a scalar becomes a one-element array.
    pub fn as_array(&self) -> Option<Vec<f64>> {
        match self {
            PropertyValue::Array(v) => Some(v.clone()),
            PropertyValue::Int(_) | PropertyValue::Float(_) => self.as_f64().map(|v| vec![v]),
            PropertyValue::Text(_) => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Int(v) => write!(f, "{v}"),
            PropertyValue::Float(v) => write!(f, "{v}"),
            PropertyValue::Text(s) => write!(f, "\"{s}\""),
            PropertyValue::Array(values) => {
                write!(f, "[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<Vec<f64>> for PropertyValue {
    fn from(value: Vec<f64>) -> Self {
        PropertyValue::Array(value)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropertyError {
    #[error("'{record}' has no property named '{key}'")]
    UnknownProperty { record: &'static str, key: String },

    #[error("property '{key}' expects {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid value for property '{key}': {details}")]
    InvalidValue { key: String, details: String },
}

impl PropertyError {
    pub fn unknown(record: &'static str, key: impl Into<String>) -> Self {
        Self::UnknownProperty {
            record,
            key: key.into(),
        }
    }

    pub fn mismatch(key: impl Into<String>, expected: &'static str, found: &PropertyValue) -> Self {
        Self::TypeMismatch {
            key: key.into(),
            expected,
            found: found.type_name(),
        }
    }

    pub fn invalid(key: impl Into<String>, details: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            details: details.into(),
        }
    }
}

/// Record with an ordered set of exported, name-addressable fields.
pub trait Properties {
    /// Record name used in error messages.
    const RECORD: &'static str;

    /// Exported field names, in export order.
    fn init_properties(&self) -> &'static [&'static str];

    /// Reads an exported field. Unset optional fields and unknown keys yield `None`.
    fn property(&self, key: &str) -> Option<PropertyValue>;

    /// Writes an exported field, running the same recomputation as the typed setters.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError`] when the key is not exported by this record or when the
    /// value has the wrong type or an invalid content.
    fn set_property(&mut self, key: &str, value: PropertyValue) -> Result<(), PropertyError>;

    /// Returns `true` when `key` is one of the exported fields.
    fn has_property(&self, key: &str) -> bool {
        self.init_properties().contains(&key)
    }

    /// Iterates `(name, value)` pairs in export order.
    fn iter_properties(&self) -> impl Iterator<Item = (&'static str, Option<PropertyValue>)> + '_ {
        self.init_properties()
            .iter()
            .map(move |&key| (key, self.property(key)))
    }
}

pub(crate) fn expect_f64(key: &str, value: &PropertyValue) -> Result<f64, PropertyError> {
    value
        .as_f64()
        .ok_or_else(|| PropertyError::mismatch(key, "a number", value))
}

pub(crate) fn expect_i64(key: &str, value: &PropertyValue) -> Result<i64, PropertyError> {
    value
        .as_i64()
        .ok_or_else(|| PropertyError::mismatch(key, "an integer", value))
}

pub(crate) fn expect_text<'v>(key: &str, value: &'v PropertyValue) -> Result<&'v str, PropertyError> {
    value
        .as_text()
        .ok_or_else(|| PropertyError::mismatch(key, "a string", value))
}

pub(crate) fn expect_array(key: &str, value: &PropertyValue) -> Result<Vec<f64>, PropertyError> {
    value
        .as_array()
        .ok_or_else(|| PropertyError::mismatch(key, "a number array", value))
}

/// Maps zero to `None`, the convention for unset optional numeric fields.
pub(crate) fn nonzero_f64(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

pub(crate) fn nonzero_i64(value: Option<i64>) -> Option<i64> {
    value.filter(|v| *v != 0)
}
