use chrono::Duration;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::clock::{Clock, SystemClock};
use super::query::Query;
use crate::connection::{Connection, Method};
use crate::error::{Error, Result};
use crate::model::{
    start_of_minute, Group, Labels, Metric, MetricDescriptor, MetricKind, Point, Resource,
    ResourceDescriptor, TimeSeries, Timestamp, TypedValue, ValueType,
};

/// Client for the Monitoring API of a single project.
///
/// Factory methods (`metric`, `resource`, `time_series`, `group`, ...) never
/// touch the network; every other method issues exactly the requests it
/// needs through the owned [`Connection`].
pub struct Client {
    project: String,
    connection: Box<dyn Connection>,
    clock: Box<dyn Clock>,
}

impl Client {
    pub fn new<P: Into<String>>(project: P, connection: Box<dyn Connection>) -> Self {
        Self {
            project: project.into(),
            connection,
            clock: Box::new(SystemClock),
        }
    }

    /// Replaces the source of "now" used for default end times.
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[inline]
    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn metric<T: Into<String>>(&self, r#type: T, labels: Labels) -> Metric {
        Metric::new(r#type, labels)
    }

    /// `labels` should not include `project_id` when the resource is
    /// used for writing.
    pub fn resource<T: Into<String>>(&self, r#type: T, labels: Labels) -> Resource {
        Resource::new(r#type, labels)
    }

    /// Builds a series holding the single point `value`.
    ///
    /// `end_time` defaults to now. Without `start_time` the service treats the
    /// point as a single instant.
    pub fn time_series<V: Into<TypedValue>>(
        &self,
        metric: Metric,
        resource: Resource,
        value: V,
        end_time: Option<Timestamp>,
        start_time: Option<Timestamp>,
    ) -> Result<TimeSeries> {
        let end_time = end_time.unwrap_or_else(|| self.clock.now());
        if let Some(start) = &start_time {
            if *start > end_time {
                return Err(Error::invalid_argument("end time is before start time"));
            }
        }

        let point = Point::with_interval(end_time, start_time, value);
        Ok(TimeSeries::new(metric, resource, None, None, vec![point]))
    }

    /// A group object owned by this project; no request is made.
    pub fn group(
        &self,
        id: Option<&str>,
        display_name: Option<&str>,
        parent_id: Option<&str>,
        filter: Option<&str>,
        is_cluster: bool,
    ) -> Group {
        Group {
            id: id.map(String::from),
            name: id.map(|id| self.group_name(id)),
            display_name: display_name.map(String::from),
            parent_id: parent_id.map(String::from),
            parent_name: parent_id.map(|id| self.group_name(id)),
            filter: filter.map(String::from),
            is_cluster,
        }
    }

    /// A metric descriptor ready for [`Client::create_metric_descriptor`].
    /// Labels, unit and descriptions can be filled in on the returned value.
    pub fn metric_descriptor<T: Into<String>>(
        &self,
        r#type: T,
        metric_kind: MetricKind,
        value_type: ValueType,
    ) -> MetricDescriptor {
        MetricDescriptor {
            r#type: r#type.into(),
            metric_kind,
            value_type,
            ..Default::default()
        }
    }

    /// A query over the `duration` ending at `end_time`.
    ///
    /// Without `end_time` the interval ends at the start of the current
    /// minute. A zero `duration` leaves the interval unset, which is only
    /// allowed without an `end_time`.
    pub fn query<T: Into<String>>(
        &self,
        metric_type: T,
        end_time: Option<Timestamp>,
        duration: Duration,
    ) -> Result<Query> {
        if duration < Duration::zero() {
            return Err(Error::invalid_argument("query duration must not be negative"));
        }

        let query = Query::new(metric_type);
        if duration == Duration::zero() {
            if end_time.is_some() {
                return Err(Error::invalid_argument(
                    "end time given without a duration, use select_interval() for a point in time",
                ));
            }
            return Ok(query);
        }

        let end_time = end_time.unwrap_or_else(|| start_of_minute(&self.clock.now()));
        let start_time = end_time
            .checked_sub_signed(duration)
            .ok_or_else(|| Error::invalid_argument("query duration is out of range"))?;
        query.select_interval(end_time, Some(start_time))
    }

    /// Writes a batch of series. Each series must hold exactly one point;
    /// the service rejects the whole batch otherwise.
    pub fn write_time_series(&self, series: &[TimeSeries]) -> Result<()> {
        let body = json!({
            "timeSeries": series.iter().map(TimeSeries::to_wire).collect::<Vec<_>>(),
        });

        info!(project = %self.project, count = series.len(), "writing time series");
        self.connection
            .api_request(Method::Post, &self.time_series_path(), &[], Some(&body))?;
        Ok(())
    }

    pub fn write_point<V: Into<TypedValue>>(
        &self,
        metric: Metric,
        resource: Resource,
        value: V,
        end_time: Option<Timestamp>,
        start_time: Option<Timestamp>,
    ) -> Result<()> {
        let series = self.time_series(metric, resource, value, end_time, start_time)?;
        self.write_time_series(&[series])
    }

    pub fn list_time_series(&self, query: &Query) -> Result<Vec<TimeSeries>> {
        let params = query.params()?;
        self.list(&self.time_series_path(), params, "timeSeries")?
            .iter()
            .map(TimeSeries::from_wire)
            .collect()
    }

    pub fn fetch_metric_descriptor(&self, metric_type: &str) -> Result<MetricDescriptor> {
        let path = format!("{}{}", self.metric_descriptors_path(), metric_type);
        let info = self.connection.api_request(Method::Get, &path, &[], None)?;
        MetricDescriptor::from_wire(&info)
    }

    /// `type_prefix` adds `metric.type = starts_with("<prefix>")` to
    /// `filter`.
    pub fn list_metric_descriptors(
        &self,
        filter: Option<&str>,
        type_prefix: Option<&str>,
    ) -> Result<Vec<MetricDescriptor>> {
        let mut clauses = Vec::new();
        if let Some(filter) = filter {
            clauses.push(filter.to_string());
        }
        if let Some(prefix) = type_prefix {
            clauses.push(format!("metric.type = starts_with(\"{}\")", prefix));
        }

        let mut params = Vec::new();
        if !clauses.is_empty() {
            params.push(("filter".to_string(), clauses.join(" AND ")));
        }

        self.list(&self.metric_descriptors_path(), params, "metricDescriptors")?
            .iter()
            .map(MetricDescriptor::from_wire)
            .collect()
    }

    /// Creates a custom metric; returns the descriptor as stored by the
    /// service, `name` included.
    pub fn create_metric_descriptor(
        &self,
        descriptor: &MetricDescriptor,
    ) -> Result<MetricDescriptor> {
        let body = descriptor.to_wire();
        let info = self.connection.api_request(
            Method::Post,
            &self.metric_descriptors_path(),
            &[],
            Some(&body),
        )?;
        MetricDescriptor::from_wire(&info)
    }

    pub fn delete_metric_descriptor(&self, metric_type: &str) -> Result<()> {
        let path = format!("{}{}", self.metric_descriptors_path(), metric_type);
        self.connection.api_request(Method::Delete, &path, &[], None)?;
        Ok(())
    }

    pub fn fetch_resource_descriptor(&self, resource_type: &str) -> Result<ResourceDescriptor> {
        let path = format!("{}{}", self.resource_descriptors_path(), resource_type);
        let info = self.connection.api_request(Method::Get, &path, &[], None)?;
        ResourceDescriptor::from_wire(&info)
    }

    pub fn list_resource_descriptors(
        &self,
        filter: Option<&str>,
    ) -> Result<Vec<ResourceDescriptor>> {
        let params = filter
            .map(|f| vec![("filter".to_string(), f.to_string())])
            .unwrap_or_default();

        self.list(&self.resource_descriptors_path(), params, "resourceDescriptors")?
            .iter()
            .map(ResourceDescriptor::from_wire)
            .collect()
    }

    pub fn fetch_group(&self, group_id: &str) -> Result<Group> {
        let path = format!("/{}", self.group_name(group_id));
        let info = self.connection.api_request(Method::Get, &path, &[], None)?;
        Group::from_wire(&info)
    }

    pub fn list_groups(&self) -> Result<Vec<Group>> {
        let path = format!("/projects/{}/groups/", self.project);
        self.list(&path, Vec::new(), "group")?
            .iter()
            .map(Group::from_wire)
            .collect()
    }

    fn time_series_path(&self) -> String {
        format!("/projects/{}/timeSeries/", self.project)
    }

    fn metric_descriptors_path(&self) -> String {
        format!("/projects/{}/metricDescriptors/", self.project)
    }

    fn resource_descriptors_path(&self) -> String {
        format!("/projects/{}/monitoredResourceDescriptors/", self.project)
    }

    fn group_name(&self, group_id: &str) -> String {
        format!("projects/{}/groups/{}", self.project, group_id)
    }

    // Collects `items_key` from every page, following `nextPageToken`.
    fn list(
        &self,
        path: &str,
        params: Vec<(String, String)>,
        items_key: &str,
    ) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = params.clone();
            if let Some(token) = page_token.take() {
                query.push(("pageToken".to_string(), token));
            }

            let response = self
                .connection
                .api_request(Method::Get, path, &query, None)?;

            match response.get(items_key) {
                None => (),
                Some(Value::Array(page)) => items.extend(page.iter().cloned()),
                Some(_) => {
                    return Err(Error::malformed(format!("'{}' is not an array", items_key)))
                }
            }

            match response.get("nextPageToken").and_then(Value::as_str) {
                Some(token) if !token.is_empty() => page_token = Some(token.to_string()),
                _ => break,
            }
        }

        debug!(%path, count = items.len(), "listed {}", items_key);
        Ok(items)
    }
}
