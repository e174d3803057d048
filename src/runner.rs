use std::iter::FromIterator;

use tracing::debug;

use crate::cliopt::Command;
use crate::error::Result;
use crate::model::Labels;
use crate::monitoring::Client;
use crate::output::Writer;

// Command -> Client -> (model -> wire JSON) -> Writer
pub struct Runner {
    client: Client,
    writer: Box<dyn Writer>,
}

impl Runner {
    pub fn new(client: Client, writer: Box<dyn Writer>) -> Self {
        Self { client, writer }
    }

    pub fn run(&mut self, cmd: Command) -> Result<()> {
        debug!(?cmd, project = self.client.project(), "running command");

        match cmd {
            Command::WritePoint {
                metric_type,
                metric_labels,
                resource_type,
                resource_labels,
                end_time,
                start_time,
                value,
            } => {
                let metric = self
                    .client
                    .metric(metric_type, Labels::from_iter(metric_labels));
                let resource = self
                    .client
                    .resource(resource_type, Labels::from_iter(resource_labels));
                let series =
                    self.client
                        .time_series(metric, resource, value, end_time, start_time)?;
                self.client.write_time_series(std::slice::from_ref(&series))?;
                self.emit(&series.to_wire())
            }

            Command::Query {
                metric_type,
                end_time,
                duration,
                filter,
            } => {
                let mut query = self.client.query(metric_type, end_time, duration)?;
                if let Some(filter) = filter {
                    query = query.select_filter(filter);
                }
                for series in self.client.list_time_series(&query)? {
                    self.emit(&series.to_full_wire())?;
                }
                Ok(())
            }

            Command::FetchMetricDescriptor { metric_type } => {
                let descriptor = self.client.fetch_metric_descriptor(&metric_type)?;
                self.emit(&descriptor.to_wire())
            }

            Command::ListMetricDescriptors {
                filter,
                type_prefix,
            } => {
                let descriptors = self
                    .client
                    .list_metric_descriptors(filter.as_deref(), type_prefix.as_deref())?;
                for descriptor in descriptors {
                    self.emit(&descriptor.to_wire())?;
                }
                Ok(())
            }

            Command::FetchResourceDescriptor { resource_type } => {
                let descriptor = self.client.fetch_resource_descriptor(&resource_type)?;
                self.emit(&descriptor.to_wire())
            }

            Command::ListResourceDescriptors { filter } => {
                for descriptor in self.client.list_resource_descriptors(filter.as_deref())? {
                    self.emit(&descriptor.to_wire())?;
                }
                Ok(())
            }

            Command::FetchGroup { group_id } => {
                let group = self.client.fetch_group(&group_id)?;
                self.emit(&group.to_wire())
            }

            Command::ListGroups => {
                for group in self.client.list_groups()? {
                    self.emit(&group.to_wire())?;
                }
                Ok(())
            }
        }
    }

    fn emit(&mut self, value: &serde_json::Value) -> Result<()> {
        self.writer
            .write(value)
            .map_err(|e| ("couldn't write output", e).into())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use chrono::prelude::*;
    use serde_json::{json, Value};

    use super::*;
    use crate::connection::{Connection, Method};
    use crate::model::TypedValue;

    #[derive(Default)]
    struct Canned {
        responses: RefCell<Vec<Value>>,
        requests: RefCell<Vec<(Method, String)>>,
    }

    impl Connection for Canned {
        fn api_request(
            &self,
            method: Method,
            path: &str,
            _query: &[(String, String)],
            _body: Option<&Value>,
        ) -> Result<Value> {
            self.requests.borrow_mut().push((method, path.to_string()));
            let mut responses = self.responses.borrow_mut();
            Ok(if responses.is_empty() {
                json!({})
            } else {
                responses.remove(0)
            })
        }
    }

    struct Lines(Rc<RefCell<Vec<Value>>>);

    impl Writer for Lines {
        fn write(&mut self, value: &Value) -> std::io::Result<()> {
            self.0.borrow_mut().push(value.clone());
            Ok(())
        }
    }

    fn runner(conn: Rc<Canned>) -> (Runner, Rc<RefCell<Vec<Value>>>) {
        let lines = Rc::new(RefCell::new(Vec::new()));
        let client = Client::new("my-project", Box::new(conn));
        (Runner::new(client, Box::new(Lines(Rc::clone(&lines)))), lines)
    }

    #[test]
    fn test_write_point_echoes_series() {
        let conn = Rc::new(Canned::default());
        let (mut runner, lines) = runner(Rc::clone(&conn));

        runner
            .run(Command::WritePoint {
                metric_type: "custom.googleapis.com/my_metric".into(),
                metric_labels: vec![("status".into(), "ok".into())],
                resource_type: "global".into(),
                resource_labels: vec![],
                end_time: Some(Utc.with_ymd_and_hms(2016, 4, 6, 22, 5, 0).unwrap()),
                start_time: None,
                value: TypedValue::Int64(3),
            })
            .unwrap();

        assert_eq!(
            vec![(Method::Post, "/projects/my-project/timeSeries/".to_string())],
            *conn.requests.borrow()
        );
        let lines = lines.borrow();
        assert_eq!(1, lines.len());
        assert_eq!(json!({"int64Value": "3"}), lines[0]["points"][0]["value"]);
    }

    #[test]
    fn test_list_groups_one_line_each() {
        let conn = Rc::new(Canned::default());
        conn.responses.borrow_mut().push(json!({
            "group": [
                {"name": "projects/my-project/groups/A", "isCluster": false},
                {"name": "projects/my-project/groups/B", "isCluster": true},
            ],
        }));
        let (mut runner, lines) = runner(conn);

        runner.run(Command::ListGroups).unwrap();

        let names: Vec<_> = lines.borrow().iter().map(|g| g["name"].clone()).collect();
        assert_eq!(
            vec![json!("projects/my-project/groups/A"), json!("projects/my-project/groups/B")],
            names
        );
    }
}
