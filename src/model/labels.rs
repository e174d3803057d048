use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

pub type LabelName = String;

pub type LabelValue = String;

pub type Labels = BTreeMap<LabelName, LabelValue>;

/// Builds a label set from `(name, value)` pairs.
pub fn labels<I, N, V>(pairs: I) -> Labels
where
    I: IntoIterator<Item = (N, V)>,
    N: Into<LabelName>,
    V: Into<LabelValue>,
{
    pairs
        .into_iter()
        .map(|(n, v)| (n.into(), v.into()))
        .collect()
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LabelValueType {
    String,
    Bool,
    Int64,
}

impl Default for LabelValueType {
    fn default() -> Self {
        LabelValueType::String
    }
}

/// Schema of a single label of a metric or resource descriptor.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelDescriptor {
    pub key: LabelName,
    #[serde(default)]
    pub value_type: LabelValueType,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl LabelDescriptor {
    pub fn new<K, D>(key: K, value_type: LabelValueType, description: D) -> Self
    where
        K: Into<LabelName>,
        D: Into<String>,
    {
        Self {
            key: key.into(),
            value_type,
            description: description.into(),
        }
    }

    pub fn from_wire(info: &Value) -> Result<Self> {
        LabelDescriptor::deserialize(info)
            .map_err(|e| Error::malformed("couldn't decode label descriptor").caused_by(e))
    }
}
