use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::labels::{LabelDescriptor, Labels};
use crate::error::{Error, Result};

/// A specific metric, identified by a type and a set of label values.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    #[serde(rename = "type")]
    pub r#type: String,
    #[serde(default)]
    pub labels: Labels,
}

impl Metric {
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
        Metric::deserialize(info)
            .map_err(|e| Error::malformed("couldn't decode metric").caused_by(e))
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricKind {
    MetricKindUnspecified,
    Gauge,
    Delta,
    Cumulative,
}

impl Default for MetricKind {
    fn default() -> Self {
        MetricKind::MetricKindUnspecified
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueType {
    ValueTypeUnspecified,
    Bool,
    Int64,
    Double,
    String,
    Distribution,
    Money,
}

impl Default for ValueType {
    fn default() -> Self {
        ValueType::ValueTypeUnspecified
    }
}

/// Schema of a metric type.
///
/// `name` is assigned by the service and is absent on descriptors built
/// locally for creation.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub r#type: String,
    #[serde(default)]
    pub labels: Vec<LabelDescriptor>,
    #[serde(default)]
    pub metric_kind: MetricKind,
    #[serde(default)]
    pub value_type: ValueType,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub display_name: String,
}

impl MetricDescriptor {
    pub fn to_wire(&self) -> Value {
        serde_json::to_value(self).expect("descriptor fields always serialize")
    }

    pub fn from_wire(info: &Value) -> Result<Self> {
        MetricDescriptor::deserialize(info)
            .map_err(|e| Error::malformed("couldn't decode metric descriptor").caused_by(e))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::ErrorKind;
    use crate::model::labels::{labels, LabelValueType};

    #[test]
    fn test_metric_wire() {
        let metric = Metric::new(
            "custom.googleapis.com/my_metric",
            labels(vec![("status", "successful")]),
        );
        let wire = json!({
            "type": "custom.googleapis.com/my_metric",
            "labels": {"status": "successful"},
        });

        assert_eq!(wire, metric.to_wire());
        assert_eq!(metric, Metric::from_wire(&wire).unwrap());
    }

    #[test]
    fn test_metric_without_labels() {
        let metric = Metric::from_wire(&json!({"type": "m"})).unwrap();
        assert!(metric.labels.is_empty());

        let err = Metric::from_wire(&json!({"labels": {}})).unwrap_err();
        assert_eq!(ErrorKind::MalformedResponse, err.kind());
    }

    #[test]
    fn test_metric_descriptor_from_wire() {
        let descriptor = MetricDescriptor::from_wire(&json!({
            "name": "projects/my-project/metricDescriptors/custom.googleapis.com/my_metric",
            "type": "custom.googleapis.com/my_metric",
            "metricKind": "GAUGE",
            "valueType": "DOUBLE",
            "labels": [{"key": "status"}],
            "description": "This is my metric.",
        }))
        .unwrap();

        assert_eq!(MetricKind::Gauge, descriptor.metric_kind);
        assert_eq!(ValueType::Double, descriptor.value_type);
        assert_eq!("This is my metric.", descriptor.description);
        assert_eq!("", descriptor.unit);
        assert_eq!(LabelValueType::String, descriptor.labels[0].value_type);
    }

    #[test]
    fn test_metric_descriptor_to_wire_omits_name() {
        let descriptor = MetricDescriptor {
            r#type: "custom.googleapis.com/my_metric".into(),
            metric_kind: MetricKind::Cumulative,
            value_type: ValueType::Int64,
            ..Default::default()
        };

        assert_eq!(
            json!({
                "type": "custom.googleapis.com/my_metric",
                "labels": [],
                "metricKind": "CUMULATIVE",
                "valueType": "INT64",
                "unit": "",
                "description": "",
                "displayName": "",
            }),
            descriptor.to_wire()
        );
    }
}
