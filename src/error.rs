//! Error types for the client
//!
//! Configuration problems surface before any I/O happens. Everything that
//! happens after the request leaves the process is split into transport
//! failures, status failures and decoding failures so callers can tell
//! "the server said no" from "the server sent garbage".

use bytes::Bytes;
use reqwest::StatusCode;
use thiserror::Error;

use crate::response::{Body, Response};

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed argument or option.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A `:name` token in the path had no matching option.
    #[error("no value for placeholder `:{name}` in `{template}`")]
    UnresolvedPlaceholder { name: String, template: String },

    /// The configuration file could not be read or parsed.
    #[error("failed to load config file '{path}': {message}")]
    ConfigFile { path: String, message: String },

    /// Transport failure (DNS, connection refused, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a status of 400 or above.
    #[error("HTTP {status}: {message}")]
    HttpStatus {
        status: StatusCode,
        message: String,
        response: Box<Response>,
    },

    /// The response claimed to be JSON but was not.
    #[error("failed to parse response body as JSON: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
        raw: Bytes,
    },

    /// The request body could not be serialized.
    #[error("failed to serialize request body: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Pagination walked past the configured page bound.
    #[error("pagination exceeded the limit of {limit} pages")]
    TooManyPages { limit: usize },
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }

    /// True for errors raised before any request was sent.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::Configuration(_) | Error::UnresolvedPlaceholder { .. } | Error::ConfigFile { .. }
        )
    }

    /// HTTP status of a status error.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response attached to a status error.
    pub fn response(&self) -> Option<&Response> {
        match self {
            Error::HttpStatus { response, .. } => Some(response),
            _ => None,
        }
    }

    /// Decoded body attached to a status error.
    pub fn body(&self) -> Option<&Body> {
        self.response().map(|response| &response.body)
    }
}
