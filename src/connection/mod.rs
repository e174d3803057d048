use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::error::Result;

mod credentials;
mod http;

pub use credentials::*;
pub use http::*;

pub const MONITORING_API_BASE_URL: &str = "https://monitoring.googleapis.com/v3";

pub const LOGGING_API_BASE_URL: &str = "https://logging.googleapis.com/v2";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An authenticated JSON transport to one Google API.
///
/// `path` is relative to the API base URL and starts with a slash. A
/// missing resource must be reported as `ErrorKind::RemoteNotFound`.
pub trait Connection {
    fn api_request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value>;
}

impl<C: Connection + ?Sized> Connection for Box<C> {
    fn api_request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        (**self).api_request(method, path, query, body)
    }
}

impl<C: Connection + ?Sized> Connection for Rc<C> {
    fn api_request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        (**self).api_request(method, path, query, body)
    }
}
