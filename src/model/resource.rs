use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::labels::{LabelDescriptor, Labels};
use crate::error::{Error, Result};

/// A monitored resource, e.g. a VM instance.
///
/// When writing time series the `project_id` label can and should be
/// omitted; the service fills it in from the request path.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "type")]
    pub r#type: String,
    #[serde(default)]
    pub labels: Labels,
}

impl Resource {
    pub fn new<T: Into<String>>(r#type: T, labels: Labels) -> Self {
        Self {
            r#type: r#type.into(),
            labels,
        }
    }

    pub fn to_wire(&self) -> Value {
        serde_json::to_value(self).expect("string maps always serialize")
    }

    pub fn from_wire(info: &Value) -> Result<Self> {
        Resource::deserialize(info)
            .map_err(|e| Error::malformed("couldn't decode resource").caused_by(e))
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub r#type: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub labels: Vec<LabelDescriptor>,
}

impl ResourceDescriptor {
    pub fn to_wire(&self) -> Value {
        serde_json::to_value(self).expect("descriptor fields always serialize")
    }

    pub fn from_wire(info: &Value) -> Result<Self> {
        ResourceDescriptor::deserialize(info)
            .map_err(|e| Error::malformed("couldn't decode resource descriptor").caused_by(e))
    }
}
