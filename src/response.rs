//! Response decoding

use std::borrow::Cow;

use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::pagination::Links;
use crate::transport::RawResponse;

/// Decoded response payload
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    Raw(Bytes),
}

impl Body {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Body::Json(value) => Some(value),
            Body::Raw(_) => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        self.as_json().and_then(Value::as_array)
    }

    /// Body as text; JSON bodies are re-serialized
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Body::Json(value) => Cow::Owned(value.to_string()),
            Body::Raw(bytes) => String::from_utf8_lossy(bytes),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Body::Raw(bytes) if bytes.is_empty())
    }

    /// The `message` field GitHub puts in error bodies
    pub fn message(&self) -> Option<&str> {
        self.as_json()
            .and_then(|value| value.get("message"))
            .and_then(Value::as_str)
    }
}

/// A decoded HTTP response
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Body,
    /// Undecoded payload bytes
    pub raw: Bytes,
}

impl Response {
    /// Pagination links from the `Link` header
    pub fn links(&self) -> Links {
        Links::from_headers(&self.headers)
    }

    /// Deserialize the raw payload into `T`
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.raw).map_err(|source| Error::Parse {
            source,
            raw: self.raw.clone(),
        })
    }
}

/// True for `application/json` and `application/*+json` content types
pub fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            let essence = value
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase();
            essence == "application/json" || essence.ends_with("+json")
        })
        .unwrap_or(false)
}

/// Decode a raw response and turn statuses of 400 and above into errors.
///
/// Empty payloads are never parsed. An error status with an unparseable
/// body still surfaces as a status error, with the body kept raw.
pub fn decode(raw: RawResponse, expect_json: bool) -> Result<Response> {
    let RawResponse {
        status,
        headers,
        body: bytes,
    } = raw;
    let failed = status.is_client_error() || status.is_server_error();

    let body = if bytes.is_empty() || !(expect_json || is_json_content_type(&headers)) {
        Body::Raw(bytes.clone())
    } else {
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => Body::Json(value),
            Err(_) if failed => Body::Raw(bytes.clone()),
            Err(source) => return Err(Error::Parse { source, raw: bytes }),
        }
    };

    let response = Response {
        status,
        headers,
        body,
        raw: bytes,
    };

    if failed {
        let message = response
            .body
            .message()
            .map(str::to_string)
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| "request failed".to_string());
        return Err(Error::HttpStatus {
            status,
            message,
            response: Box::new(response),
        });
    }

    Ok(response)
}
