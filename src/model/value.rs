use std::convert::TryFrom;
use std::fmt;

use serde_json::{Map, Value};

use crate::error::{Error, Result};

pub const BOOL_VALUE: &str = "boolValue";
pub const INT64_VALUE: &str = "int64Value";
pub const DOUBLE_VALUE: &str = "doubleValue";
pub const STRING_VALUE: &str = "stringValue";
pub const DISTRIBUTION_VALUE: &str = "distributionValue";

/// The value of a single point.
///
/// See https://cloud.google.com/monitoring/api/ref_v3/rest/v3/TypedValue
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Bool(bool),
    Int64(i64),
    Double(f64),
    String(String),
    /// Distributions are kept in their structured wire form.
    Distribution(Value),
}

impl TypedValue {
    /// The wire key naming this value's type.
    pub fn discriminator(&self) -> &'static str {
        match self {
            TypedValue::Bool(_) => BOOL_VALUE,
            TypedValue::Int64(_) => INT64_VALUE,
            TypedValue::Double(_) => DOUBLE_VALUE,
            TypedValue::String(_) => STRING_VALUE,
            TypedValue::Distribution(_) => DISTRIBUTION_VALUE,
        }
    }

    // Scalars travel as quoted strings.
    fn encoded(&self) -> Value {
        match self {
            TypedValue::Distribution(v) => v.clone(),
            TypedValue::Double(n) if n.is_nan() => Value::String("NaN".into()),
            TypedValue::Double(n) if n.is_infinite() => Value::String(
                if n.is_sign_positive() { "Infinity" } else { "-Infinity" }.into(),
            ),
            scalar => Value::String(scalar.to_string()),
        }
    }

    pub fn to_wire(&self) -> Value {
        let mut obj = Map::with_capacity(1);
        obj.insert(self.discriminator().into(), self.encoded());
        Value::Object(obj)
    }

    pub fn from_wire(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| Error::malformed("point value is not an object"))?;

        if obj.len() != 1 {
            return Err(Error::malformed(format!(
                "point value must have exactly one key, got {}",
                obj.len()
            )));
        }

        let (key, payload) = obj.iter().next().expect("length checked above");
        let malformed = || Error::malformed(format!("unexpected {} payload: {}", key, payload));

        match key.as_str() {
            BOOL_VALUE => match payload {
                Value::Bool(b) => Ok(TypedValue::Bool(*b)),
                // String form is what to_wire() itself writes.
                Value::String(s) => s.parse().map(TypedValue::Bool).map_err(|_| malformed()),
                _ => Err(malformed()),
            },
            INT64_VALUE => match payload {
                Value::String(s) => s.parse().map(TypedValue::Int64).map_err(|_| malformed()),
                Value::Number(n) => n.as_i64().map(TypedValue::Int64).ok_or_else(malformed),
                _ => Err(malformed()),
            },
            DOUBLE_VALUE => match payload {
                Value::Number(n) => n.as_f64().map(TypedValue::Double).ok_or_else(malformed),
                // Also covers to_wire() output, "NaN" and "Infinity" included.
                Value::String(s) => s.parse().map(TypedValue::Double).map_err(|_| malformed()),
                _ => Err(malformed()),
            },
            STRING_VALUE => match payload {
                Value::String(s) => Ok(TypedValue::String(s.clone())),
                _ => Err(malformed()),
            },
            DISTRIBUTION_VALUE => match payload {
                Value::Object(_) => Ok(TypedValue::Distribution(payload.clone())),
                _ => Err(malformed()),
            },
            other => Err(Error::unsupported_value_type(format!(
                "unknown value discriminator '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TypedValue::Bool(b) => write!(f, "{}", b),
            TypedValue::Int64(n) => write!(f, "{}", n),
            TypedValue::Double(n) => write!(f, "{}", n),
            TypedValue::String(s) => write!(f, "{}", s),
            TypedValue::Distribution(v) => write!(f, "{}", v),
        }
    }
}

/// Infers the value kind from an untyped JSON scalar.
impl TryFrom<Value> for TypedValue {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(TypedValue::Bool(b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(TypedValue::Int64(i)),
                None => n
                    .as_f64()
                    .map(TypedValue::Double)
                    .ok_or_else(|| Error::unsupported_value_type(format!("number {}", n))),
            },
            Value::String(s) => Ok(TypedValue::String(s)),
            v @ Value::Object(_) => Ok(TypedValue::Distribution(v)),
            v => Err(Error::unsupported_value_type(format!(
                "no point value type for {}",
                v
            ))),
        }
    }
}

impl From<bool> for TypedValue {
    fn from(v: bool) -> Self {
        TypedValue::Bool(v)
    }
}

impl From<i64> for TypedValue {
    fn from(v: i64) -> Self {
        TypedValue::Int64(v)
    }
}

impl From<i32> for TypedValue {
    fn from(v: i32) -> Self {
        TypedValue::Int64(v.into())
    }
}

impl From<u32> for TypedValue {
    fn from(v: u32) -> Self {
        TypedValue::Int64(v.into())
    }
}

impl From<f64> for TypedValue {
    fn from(v: f64) -> Self {
        TypedValue::Double(v)
    }
}

impl From<f32> for TypedValue {
    fn from(v: f32) -> Self {
        TypedValue::Double(v.into())
    }
}

impl From<&str> for TypedValue {
    fn from(v: &str) -> Self {
        TypedValue::String(v.into())
    }
}

impl From<String> for TypedValue {
    fn from(v: String) -> Self {
        TypedValue::String(v)
    }
}
