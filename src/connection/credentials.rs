use std::env;

use crate::error::{Error, Result};

pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// Source of OAuth2 bearer tokens.
pub trait Credentials {
    fn token(&self) -> Result<String>;
}

/// A pre-issued access token, e.g. from `gcloud auth print-access-token`.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new<T: Into<String>>(token: T) -> Self {
        Self(token.into())
    }

    pub fn from_env() -> Result<Self> {
        env::var(ACCESS_TOKEN_ENV)
            .map(Self)
            .map_err(|e| (format!("{} is not set", ACCESS_TOKEN_ENV), e).into())
    }
}

impl Credentials for AccessToken {
    fn token(&self) -> Result<String> {
        if self.0.is_empty() {
            return Err(Error::new("empty access token"));
        }
        Ok(self.0.clone())
    }
}

// Never print the token itself.
impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "AccessToken(****)")
    }
}
