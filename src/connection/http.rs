use serde_json::Value;
use tracing::{debug, warn};

use super::credentials::Credentials;
use super::{Connection, Method};
use crate::error::{Error, ErrorKind, Result};

/// Blocking HTTPS transport backed by a `ureq` agent.
pub struct HttpConnection {
    agent: ureq::Agent,
    base_url: String,
    credentials: Box<dyn Credentials>,
}

impl HttpConnection {
    pub fn new<U: Into<String>>(base_url: U, credentials: Box<dyn Credentials>) -> Self {
        let base_url = base_url.into();
        Self {
            agent: ureq::Agent::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Connection for HttpConnection {
    fn api_request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let token = self.credentials.token()?;
        debug!(%method, %url, params = query.len(), "api request");

        let mut request = self
            .agent
            .request(method.as_str(), &url)
            .set("Authorization", &format!("Bearer {}", token));
        for (key, value) in query {
            request = request.query(key, value);
        }

        let response = match body {
            Some(body) => request.send_json(body.clone()),
            None => request.call(),
        };

        match response {
            Ok(response) => parse_body(response),
            Err(ureq::Error::Status(code, response)) => {
                let text = response.into_string().unwrap_or_default();
                warn!(%method, %url, code, "api request rejected");
                Err(status_error(code, method, path, &text))
            }
            Err(err) => Err(Error::with_kind(
                ErrorKind::Transport,
                format!("{} {} failed: {}", method, url, err),
            )),
        }
    }
}

fn parse_body(response: ureq::Response) -> Result<Value> {
    let text = response
        .into_string()
        .map_err(|e| Error::with_kind(ErrorKind::Transport, "couldn't read response body").caused_by(e))?;

    if text.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }

    serde_json::from_str(&text)
        .map_err(|e| Error::malformed("response body is not JSON").caused_by(e))
}

fn status_error(code: u16, method: Method, path: &str, text: &str) -> Error {
    let message = format!("{} {} returned {}: {}", method, path, code, text.trim());
    let kind = match code {
        400 => ErrorKind::InvalidArgument,
        404 => ErrorKind::RemoteNotFound,
        _ => ErrorKind::Remote,
    };
    Error::with_kind(kind, message)
}
