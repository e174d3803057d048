//! Client for Stackdriver Error Reporting.
//!
//! Errors are reported by writing formatted entries to the `errors` log
//! through the Logging API.
//!
//! See https://cloud.google.com/error-reporting/docs/formatting-error-messages

use std::backtrace::Backtrace;
use std::error::Error as StdError;

use serde_json::{json, Value};
use tracing::debug;

use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::logging::{Logger, StructLogger};

/// Service name used when neither the call nor the client names one.
pub const DEFAULT_SERVICE: &str = "rust";

pub const ERROR_LOG_NAME: &str = "errors";

pub struct Client {
    logger: Box<dyn StructLogger>,
    service: Option<String>,
    version: Option<String>,
}

impl Client {
    pub fn new<P: Into<String>>(project: P, connection: Box<dyn Connection>) -> Self {
        Self::with_logger(Box::new(Logger::new(project, ERROR_LOG_NAME, connection)))
    }

    pub fn with_logger(logger: Box<dyn StructLogger>) -> Self {
        Self {
            logger,
            service: None,
            version: None,
        }
    }

    /// Identifier of the reporting service, e.g. the executable name. It
    /// should stay stable across deployments, unlike `version`.
    pub fn with_service<S: Into<String>>(mut self, service: S) -> Self {
        self.service = Some(service.into()).filter(|s: &String| !s.is_empty());
        self
    }

    /// Source code version, e.g. a release tag or a commit hash.
    pub fn with_version<V: Into<String>>(mut self, version: V) -> Self {
        self.version = Some(version.into()).filter(|v: &String| !v.is_empty());
        self
    }

    pub fn default_service(&self) -> &str {
        self.service.as_deref().unwrap_or(DEFAULT_SERVICE)
    }

    pub fn default_version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn report(&self, message: &str, err: &(dyn StdError + 'static)) -> Result<()> {
        self.report_with(message, err, None, None)
    }

    /// Reports `err` with the client defaults overridden by `service` and
    /// `version` where given.
    pub fn report_with(
        &self,
        message: &str,
        err: &(dyn StdError + 'static),
        service: Option<&str>,
        version: Option<&str>,
    ) -> Result<()> {
        let payload = self.payload(message, &format_traceback(err), service, version);
        debug!(service = %payload["serviceContext"]["service"], "reporting error");
        self.logger.log_struct(&payload)
    }

    fn payload(
        &self,
        message: &str,
        traceback: &str,
        service: Option<&str>,
        version: Option<&str>,
    ) -> Value {
        let service = service
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.default_service());
        let version = version
            .filter(|v| !v.is_empty())
            .or_else(|| self.default_version());

        let mut context = json!({ "service": service });
        if let Some(version) = version {
            context["version"] = json!(version);
        }

        json!({
            "serviceContext": context,
            "message": format!("{} : {}", message, traceback),
        })
    }
}

/// Renders `err`, each of its causes and the current stack.
pub fn format_traceback(err: &(dyn StdError + 'static)) -> String {
    let mut out = head_line(err);

    let mut source = err.source();
    if source.is_some() {
        out.push_str("\n\nCaused by:");
    }
    while let Some(cause) = source {
        out.push_str("\n    ");
        out.push_str(&head_line(cause));
        source = cause.source();
    }

    out.push_str("\n\nStack backtrace:\n");
    out.push_str(&Backtrace::force_capture().to_string());
    out
}

// Our own Display already appends the source, which gets its own line.
fn head_line(err: &(dyn StdError + 'static)) -> String {
    match err.downcast_ref::<Error>() {
        Some(err) => err.message().to_string(),
        None => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let client = Client::with_logger(Box::new(NullLogger));
        assert_eq!(DEFAULT_SERVICE, client.default_service());
        assert_eq!(None, client.default_version());

        let client = client.with_service("SERVICE").with_version("myversion");
        assert_eq!("SERVICE", client.default_service());
        assert_eq!(Some("myversion"), client.default_version());
    }

    #[test]
    fn test_payload_service_context() {
        let client = Client::with_logger(Box::new(NullLogger)).with_version("v1");

        let payload = client.payload("hello world", "tb", None, None);
        assert_eq!(
            json!({"service": "rust", "version": "v1"}),
            payload["serviceContext"]
        );
        assert_eq!("hello world : tb", payload["message"]);

        let payload = client.payload("m", "tb", Some("notdefault"), Some("notdefaultversion"));
        assert_eq!(
            json!({"service": "notdefault", "version": "notdefaultversion"}),
            payload["serviceContext"]
        );
    }

    #[test]
    fn test_format_traceback() {
        let err = Error::new("couldn't write point").caused_by(std::fmt::Error);
        let traceback = format_traceback(&err);

        assert!(traceback.starts_with("couldn't write point"));
        assert!(traceback.contains("Caused by:\n    an error occurred when formatting an argument"));
        assert!(traceback.contains("Stack backtrace:"));
    }

    #[test]
    fn test_format_traceback_lists_cause_once() {
        let err = Error::new("couldn't write point").caused_by(std::fmt::Error);
        let traceback = format_traceback(&err);

        let cause = "an error occurred when formatting an argument";
        assert_eq!(1, traceback.matches(cause).count());
        assert!(!traceback.contains("Source error"));
        assert!(traceback.starts_with("couldn't write point\n\nCaused by:"));
    }

    struct NullLogger;

    impl StructLogger for NullLogger {
        fn log_struct(&self, _payload: &Value) -> Result<()> {
            Ok(())
        }
    }
}
