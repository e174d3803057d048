use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::timestamp::{parse_rfc3339, to_rfc3339, IntoTimestamp, Timestamp};
use super::value::TypedValue;
use crate::error::{Error, Result};

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntervalRepr {
    end_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start_time: Option<String>,
}

/// A single point in a time series.
///
/// If `start_time` is absent the service takes it to equal `end_time`.
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    end_time: Timestamp,
    start_time: Option<Timestamp>,
    value: TypedValue,
}

impl Point {
    pub fn new<E, V>(end_time: E, value: V) -> Self
    where
        E: IntoTimestamp,
        V: Into<TypedValue>,
    {
        Self {
            end_time: end_time.into_timestamp(),
            start_time: None,
            value: value.into(),
        }
    }

    pub fn with_interval<E, S, V>(end_time: E, start_time: Option<S>, value: V) -> Self
    where
        E: IntoTimestamp,
        S: IntoTimestamp,
        V: Into<TypedValue>,
    {
        Self {
            end_time: end_time.into_timestamp(),
            start_time: start_time.map(IntoTimestamp::into_timestamp),
            value: value.into(),
        }
    }

    #[inline]
    pub fn end_time(&self) -> &Timestamp {
        &self.end_time
    }

    #[inline]
    pub fn start_time(&self) -> Option<&Timestamp> {
        self.start_time.as_ref()
    }

    #[inline]
    pub fn value(&self) -> &TypedValue {
        &self.value
    }

    pub fn to_wire(&self) -> Value {
        let interval = IntervalRepr {
            end_time: to_rfc3339(&self.end_time),
            start_time: self.start_time.as_ref().map(to_rfc3339),
        };

        json!({
            "interval": interval,
            "value": self.value.to_wire(),
        })
    }

    pub fn from_wire(info: &Value) -> Result<Self> {
        let interval = info
            .get("interval")
            .ok_or_else(|| Error::malformed("point without interval"))?;
        let interval = IntervalRepr::deserialize(interval)
            .map_err(|e| Error::malformed("couldn't decode point interval").caused_by(e))?;

        let value = info
            .get("value")
            .ok_or_else(|| Error::malformed("point without value"))?;

        Ok(Self {
            end_time: parse_rfc3339(&interval.end_time)?,
            start_time: interval
                .start_time
                .as_deref()
                .map(parse_rfc3339)
                .transpose()?,
            value: TypedValue::from_wire(value)?,
        })
    }
}
