//! Minimal writer for the Stackdriver Logging API (V2).

use serde_json::{json, Value};
use tracing::debug;

use crate::connection::{Connection, Method};
use crate::error::Result;

/// Sink for structured (JSON) log entries.
pub trait StructLogger {
    fn log_struct(&self, payload: &Value) -> Result<()>;
}

/// Writes entries to the log `projects/<project>/logs/<name>` against the
/// `global` monitored resource.
pub struct Logger {
    project: String,
    name: String,
    connection: Box<dyn Connection>,
}

impl Logger {
    pub fn new<P, N>(project: P, name: N, connection: Box<dyn Connection>) -> Self
    where
        P: Into<String>,
        N: Into<String>,
    {
        Self {
            project: project.into(),
            name: name.into(),
            connection,
        }
    }

    pub fn full_name(&self) -> String {
        format!("projects/{}/logs/{}", self.project, self.name)
    }

    fn entry(&self, payload: &Value) -> Value {
        json!({
            "logName": self.full_name(),
            "resource": {"type": "global"},
            "jsonPayload": payload,
        })
    }
}

impl StructLogger for Logger {
    fn log_struct(&self, payload: &Value) -> Result<()> {
        let body = json!({ "entries": [self.entry(payload)] });
        debug!(log = %self.full_name(), "writing log entry");
        self.connection
            .api_request(Method::Post, "/entries:write", &[], Some(&body))?;
        Ok(())
    }
}
