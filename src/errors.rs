use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

/// The response body is not a well-formed Web Tools document.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("malformed response at byte {position}: {message}")]
pub struct ParseError {
    position: u64,
    message: String,
}

impl ParseError {
    pub(crate) fn new(position: u64, message: impl fmt::Display) -> Self {
        Self {
            position,
            message: message.to_string(),
        }
    }

    /// Byte offset into the body where parsing stopped.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The service answered with an `Error` document.
#[derive(Error, Debug)]
#[error("Web Tools API error: {status} - {}", self.message())]
pub struct ServiceError {
    status: StatusCode,
    body: String,
    number: Option<String>,
    origin: Option<String>,
    description: Option<String>,
}

impl ServiceError {
    pub(crate) fn new(
        status: StatusCode,
        body: &str,
        number: Option<String>,
        origin: Option<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            status,
            body: body.to_string(),
            number,
            origin,
            description,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The raw response body, kept for diagnostics.
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn number(&self) -> Option<&str> {
        self.number.as_deref()
    }

    /// The `Source` the service reported, naming the component that failed.
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The service's description of the error, or the raw body if it gave none.
    pub fn message(&self) -> &str {
        self.description().unwrap_or(&self.body)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LookupError {
    #[error("no address with ID {0:?} in the response")]
    NotFound(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown address field: {0:?}")]
pub struct UnknownFieldError(pub String);

#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

#[derive(Error, Debug)]
pub enum ClientBuilderError {
    #[error("missing field: {0}")]
    MissingField(String),
    #[error(transparent)]
    UrlParse(#[from] url::ParseError),
}
