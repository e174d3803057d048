use std::cell::OnceCell;
use std::fmt;

use serde::Deserialize;
use serde_json::{json, Value};

use super::labels::Labels;
use super::metric::{Metric, MetricKind, ValueType};
use super::point::Point;
use super::resource::Resource;
use crate::error::{Error, Result};

const RESOURCE_TYPE_LABEL: &str = "resource_type";

/// A single time series of metric values.
///
/// Series built for writing carry exactly one point and no kind/type
/// metadata; series read back from the service carry both.
pub struct TimeSeries {
    metric: Metric,
    resource: Resource,
    metric_kind: Option<MetricKind>,
    value_type: Option<ValueType>,
    points: Vec<Point>,
    labels: OnceCell<Labels>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct KindRepr {
    #[serde(default)]
    metric_kind: Option<MetricKind>,
    #[serde(default)]
    value_type: Option<ValueType>,
}

impl TimeSeries {
    pub fn new(
        metric: Metric,
        resource: Resource,
        metric_kind: Option<MetricKind>,
        value_type: Option<ValueType>,
        points: Vec<Point>,
    ) -> Self {
        Self {
            metric,
            resource,
            metric_kind,
            value_type,
            points,
            labels: OnceCell::new(),
        }
    }

    #[inline]
    pub fn metric(&self) -> &Metric {
        &self.metric
    }

    #[inline]
    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    #[inline]
    pub fn metric_kind(&self) -> Option<MetricKind> {
        self.metric_kind
    }

    #[inline]
    pub fn value_type(&self) -> Option<ValueType> {
        self.value_type
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// All the labels of the series in one map: `resource_type`, then the
    /// resource labels, then the metric labels. Later entries win.
    pub fn labels(&self) -> &Labels {
        self.labels.get_or_init(|| {
            let mut labels = Labels::new();
            labels.insert(RESOURCE_TYPE_LABEL.into(), self.resource.r#type.clone());
            labels.extend(self.resource.labels.clone());
            labels.extend(self.metric.labels.clone());
            labels
        })
    }

    /// Copies everything but the point data, substituting `points`
    /// (none if `None`).
    pub fn header(&self, points: Option<Vec<Point>>) -> Self {
        Self {
            metric: self.metric.clone(),
            resource: self.resource.clone(),
            metric_kind: self.metric_kind,
            value_type: self.value_type,
            points: points.unwrap_or_default(),
            labels: self.labels.clone(),
        }
    }

    /// The write representation; `metricKind` and `valueType` are
    /// output-only and never sent.
    pub fn to_wire(&self) -> Value {
        json!({
            "metric": self.metric.to_wire(),
            "resource": self.resource.to_wire(),
            "points": self.points.iter().map(Point::to_wire).collect::<Vec<_>>(),
        })
    }

    /// The read representation, with `metricKind` and `valueType` when set.
    pub fn to_full_wire(&self) -> Value {
        let mut info = self.to_wire();
        if let Some(kind) = self.metric_kind {
            info["metricKind"] = json!(kind);
        }
        if let Some(value_type) = self.value_type {
            info["valueType"] = json!(value_type);
        }
        info
    }

    pub fn from_wire(info: &Value) -> Result<Self> {
        let metric = info
            .get("metric")
            .ok_or_else(|| Error::malformed("time series without metric"))?;
        let resource = info
            .get("resource")
            .ok_or_else(|| Error::malformed("time series without resource"))?;
        let kinds = KindRepr::deserialize(info)
            .map_err(|e| Error::malformed("couldn't decode time series kind").caused_by(e))?;

        let points = match info.get("points") {
            None => Vec::new(),
            Some(Value::Array(points)) => points
                .iter()
                .map(Point::from_wire)
                .collect::<Result<Vec<_>>>()?,
            Some(_) => return Err(Error::malformed("time series points is not an array")),
        };

        Ok(Self::new(
            Metric::from_wire(metric)?,
            Resource::from_wire(resource)?,
            kinds.metric_kind,
            kinds.value_type,
            points,
        ))
    }
}

impl Clone for TimeSeries {
    fn clone(&self) -> Self {
        self.header(Some(self.points.clone()))
    }
}

// The label cache is not part of the value.
impl PartialEq for TimeSeries {
    fn eq(&self, other: &Self) -> bool {
        self.metric == other.metric
            && self.resource == other.resource
            && self.metric_kind == other.metric_kind
            && self.value_type == other.value_type
            && self.points == other.points
    }
}

// Points are elided.
impl fmt::Debug for TimeSeries {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TimeSeries")
            .field("num_points", &self.points.len())
            .field("metric", &self.metric)
            .field("resource", &self.resource)
            .field("metric_kind", &self.metric_kind)
            .field("value_type", &self.value_type)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use chrono::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::model::labels::labels;

    fn series(points: Vec<Point>) -> TimeSeries {
        TimeSeries::new(
            Metric::new("m", labels(vec![("zone", "eu"), ("status", "ok")])),
            Resource::new("gce_instance", labels(vec![("zone", "us"), ("instance_id", "1")])),
            Some(MetricKind::Gauge),
            Some(ValueType::Int64),
            points,
        )
    }

    fn point(minute: u32, value: i64) -> Point {
        Point::new(Utc.with_ymd_and_hms(2016, 4, 6, 22, minute, 0).unwrap(), value)
    }

    #[test]
    fn test_labels_metric_overrides_resource() {
        let ts = series(vec![]);
        assert_eq!(
            &labels(vec![
                ("resource_type", "gce_instance"),
                ("zone", "eu"),
                ("instance_id", "1"),
                ("status", "ok"),
            ]),
            ts.labels()
        );
        // Cached view is stable across calls.
        assert!(std::ptr::eq(ts.labels(), ts.labels()));
    }

    #[test]
    fn test_header_drops_points() {
        let ts = series(vec![point(5, 1), point(6, 2)]);
        let header = ts.header(None);

        assert!(header.points().is_empty());
        assert_eq!(ts.metric(), header.metric());
        assert_eq!(ts.resource(), header.resource());
        assert_eq!(ts.metric_kind(), header.metric_kind());
        assert_eq!(ts.value_type(), header.value_type());
        assert_eq!(2, ts.points().len());
    }

    #[test]
    fn test_header_substitutes_points() {
        let ts = series(vec![point(5, 1), point(6, 2)]);
        let header = ts.header(Some(vec![point(7, 3)]));

        assert_eq!(&[point(7, 3)], header.points());
        assert_eq!(&[point(5, 1), point(6, 2)], ts.points());
    }

    #[test]
    fn test_to_wire_omits_kinds() {
        let ts = series(vec![point(5, 3)]);
        assert_eq!(
            json!({
                "metric": {"type": "m", "labels": {"zone": "eu", "status": "ok"}},
                "resource": {"type": "gce_instance", "labels": {"zone": "us", "instance_id": "1"}},
                "points": [{
                    "interval": {"endTime": "2016-04-06T22:05:00.000000Z"},
                    "value": {"int64Value": "3"},
                }],
            }),
            ts.to_wire()
        );
    }

    #[test]
    fn test_read_shape_round_trip() {
        let ts = series(vec![point(5, 1), point(6, 2)]);
        let wire = ts.to_full_wire();
        assert_eq!(json!("GAUGE"), wire["metricKind"]);
        assert_eq!(json!("INT64"), wire["valueType"]);

        assert_eq!(ts, TimeSeries::from_wire(&wire).unwrap());
    }

    #[test]
    fn test_read_shape_keeps_nanoseconds() {
        let wire = json!({
            "metric": {"type": "m"},
            "resource": {"type": "global"},
            "metricKind": "GAUGE",
            "valueType": "INT64",
            "points": [{
                "interval": {
                    "startTime": "2016-04-06T22:05:00.000000001Z",
                    "endTime": "2016-04-06T22:05:00.123456789Z",
                },
                "value": {"int64Value": "1"},
            }],
        });

        let ts = TimeSeries::from_wire(&wire).unwrap();
        let encoded = ts.to_full_wire();
        assert_eq!(wire["points"], encoded["points"]);
        assert_eq!(ts, TimeSeries::from_wire(&encoded).unwrap());
    }

    #[test]
    fn test_write_shape_round_trip() {
        let ts = series(vec![point(5, 1)]);
        let decoded = TimeSeries::from_wire(&ts.to_wire()).unwrap();

        assert_eq!(ts.metric(), decoded.metric());
        assert_eq!(ts.resource(), decoded.resource());
        assert_eq!(ts.points(), decoded.points());
        assert_eq!(None, decoded.metric_kind());
    }

    #[test]
    fn test_from_wire_without_points() {
        let ts = TimeSeries::from_wire(&json!({
            "metric": {"type": "m"},
            "resource": {"type": "global"},
            "metricKind": "CUMULATIVE",
            "valueType": "DOUBLE",
        }))
        .unwrap();

        assert!(ts.points().is_empty());
        assert_eq!(Some(MetricKind::Cumulative), ts.metric_kind());
        assert_eq!(Some(ValueType::Double), ts.value_type());
    }
}
