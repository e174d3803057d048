use crate::error::{Error, Result};
use crate::model::{to_rfc3339, Timestamp};

/// Time series selection: one metric type, a time interval and an
/// optional extra filter expression.
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    metric_type: String,
    end_time: Option<Timestamp>,
    start_time: Option<Timestamp>,
    extra_filter: Option<String>,
}

impl Query {
    /// Provided for demonstration purposes only; subject to change.
    pub const DEFAULT_METRIC_TYPE: &'static str = "compute.googleapis.com/instance/cpu/utilization";

    /// A query without an interval. [`Query::select_interval`] must be
    /// called before the query can be executed.
    pub fn new<T: Into<String>>(metric_type: T) -> Self {
        Self {
            metric_type: metric_type.into(),
            end_time: None,
            start_time: None,
            extra_filter: None,
        }
    }

    /// Replaces the interval. Without a start time the interval is the single
    /// instant `end_time`.
    pub fn select_interval(
        mut self,
        end_time: Timestamp,
        start_time: Option<Timestamp>,
    ) -> Result<Self> {
        if let Some(start) = start_time {
            if start > end_time {
                return Err(Error::invalid_argument("end time is before start time"));
            }
        }
        self.end_time = Some(end_time);
        self.start_time = start_time;
        Ok(self)
    }

    /// Narrows the selection, e.g. `resource.label.zone = "us-east1-a"`.
    pub fn select_filter<F: Into<String>>(mut self, filter: F) -> Self {
        let filter = filter.into();
        self.extra_filter = match self.extra_filter.take() {
            Some(prev) => Some(format!("{} AND {}", prev, filter)),
            None => Some(filter),
        };
        self
    }

    #[inline]
    pub fn metric_type(&self) -> &str {
        &self.metric_type
    }

    #[inline]
    pub fn end_time(&self) -> Option<&Timestamp> {
        self.end_time.as_ref()
    }

    #[inline]
    pub fn start_time(&self) -> Option<&Timestamp> {
        self.start_time.as_ref()
    }

    pub fn filter(&self) -> String {
        let filter = format!("metric.type = \"{}\"", self.metric_type);
        match &self.extra_filter {
            Some(extra) => format!("{} AND {}", filter, extra),
            None => filter,
        }
    }

    pub(crate) fn params(&self) -> Result<Vec<(String, String)>> {
        let end_time = self.end_time.as_ref().ok_or_else(|| {
            Error::invalid_argument("query interval was never set, call select_interval() first")
        })?;

        let mut params = vec![
            ("filter".to_string(), self.filter()),
            ("interval.endTime".to_string(), to_rfc3339(end_time)),
        ];
        if let Some(start_time) = &self.start_time {
            params.push(("interval.startTime".to_string(), to_rfc3339(start_time)));
        }
        Ok(params)
    }
}
