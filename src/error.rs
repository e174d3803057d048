use std::{error, fmt};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// A value cannot be mapped to a wire discriminator.
    UnsupportedValueType,
    /// A response body violates an expected shape.
    MalformedResponse,
    /// The remote service reports the resource does not exist.
    RemoteNotFound,
    /// The caller supplied contradictory or rejected input.
    InvalidArgument,
    /// Any other non-success answer from the remote service.
    Remote,
    /// The request never got an answer.
    Transport,
    Other,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            ErrorKind::UnsupportedValueType => "unsupported value type",
            ErrorKind::MalformedResponse => "malformed response",
            ErrorKind::RemoteNotFound => "not found",
            ErrorKind::InvalidArgument => "invalid argument",
            ErrorKind::Remote => "remote error",
            ErrorKind::Transport => "transport error",
            ErrorKind::Other => "error",
        };
        write!(f, "{}", s)
    }
}

pub struct Error {
    kind: ErrorKind,
    message: String,
    source: Option<Box<dyn error::Error + Send + Sync>>,
}

impl Error {
    pub fn new(message: &str) -> Self {
        Self::with_kind(ErrorKind::Other, message)
    }

    pub fn with_kind<M: Into<String>>(kind: ErrorKind, message: M) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn unsupported_value_type<M: Into<String>>(message: M) -> Self {
        Self::with_kind(ErrorKind::UnsupportedValueType, message)
    }

    pub fn malformed<M: Into<String>>(message: M) -> Self {
        Self::with_kind(ErrorKind::MalformedResponse, message)
    }

    pub fn not_found<M: Into<String>>(message: M) -> Self {
        Self::with_kind(ErrorKind::RemoteNotFound, message)
    }

    pub fn invalid_argument<M: Into<String>>(message: M) -> Self {
        Self::with_kind(ErrorKind::InvalidArgument, message)
    }

    pub fn caused_by<E>(mut self, err: E) -> Self
    where
        E: error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(err));
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::RemoteNotFound
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Error({:?}): {}", self.kind, self)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.source {
            Some(err) => write!(f, "{}. Source error: {}", self.message, err),
            None => write!(f, "{}", self.message),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self.source {
            Some(ref err) => Some(&**err),
            None => None,
        }
    }
}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Self::with_kind(ErrorKind::Other, message)
    }
}

impl From<&str> for Error {
    fn from(message: &str) -> Self {
        Self::with_kind(ErrorKind::Other, message)
    }
}

impl<E: error::Error + Send + Sync + 'static> From<(String, E)> for Error {
    fn from((message, err): (String, E)) -> Self {
        Self::with_kind(ErrorKind::Other, message).caused_by(err)
    }
}

impl<E: error::Error + Send + Sync + 'static> From<(&str, E)> for Error {
    fn from((message, err): (&str, E)) -> Self {
        Self::with_kind(ErrorKind::Other, message).caused_by(err)
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        format!("{}", err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_source() {
        let err: Error = ("JSON deserialization failed", fmt::Error).into();
        assert_eq!(err.kind(), ErrorKind::Other);
        assert_eq!(
            "JSON deserialization failed. Source error: an error occurred when formatting an argument",
            err.to_string()
        );
        assert!(error::Error::source(&err).is_some());
    }

    #[test]
    fn test_kind_constructors() {
        assert!(Error::not_found("miss").is_not_found());
        assert_eq!(
            ErrorKind::InvalidArgument,
            Error::invalid_argument("bad").kind()
        );
        assert_eq!(ErrorKind::MalformedResponse, Error::malformed("x").kind());
        assert_eq!("miss", Error::not_found("miss").message());
    }
}
