//! Request body and content headers
//!
//! Whatever is left of the merged options after removing reserved keys and
//! consumed placeholders becomes the JSON body of POST, PUT and PATCH
//! requests. An explicit `body` (or `text` with `json: false`) is sent as-is.

use bytes::Bytes;
use reqwest::Method;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Map, Value};

use crate::constants::options as keys;
use crate::error::{Error, Result};
use crate::options::RequestOptions;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Option keys that would end up in a JSON body
pub fn remainder(options: &RequestOptions, consumed: &[String]) -> Map<String, Value> {
    let params = options.params();
    options
        .iter()
        .filter(|(key, _)| !options.is_reserved(key))
        .filter(|(key, _)| !consumed.contains(key) && !params.contains(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Compute the payload for `method` and set `Content-Type` / `Content-Length`.
pub fn normalize_body(
    method: &Method,
    options: &RequestOptions,
    consumed: &[String],
    headers: &mut HeaderMap,
) -> Result<Option<Bytes>> {
    let payload = if let Some(raw) = raw_payload(method, options)? {
        Some(raw)
    } else if carries_json_body(method) {
        let rest = remainder(options, consumed);
        if rest.is_empty() {
            None
        } else {
            let bytes = serde_json::to_vec(&Value::Object(rest)).map_err(Error::Serialization)?;
            if !headers.contains_key(CONTENT_TYPE) {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
            }
            Some(Bytes::from(bytes))
        }
    } else {
        None
    };

    match &payload {
        Some(bytes) => {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(bytes.len()));
        }
        None if *method == Method::PUT => {
            headers.insert(CONTENT_LENGTH, HeaderValue::from_static("0"));
        }
        None => {}
    }

    Ok(payload)
}

fn carries_json_body(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PUT || *method == Method::PATCH
}

/// Explicit `body`, or `text` when JSON is switched off
fn raw_payload(method: &Method, options: &RequestOptions) -> Result<Option<Bytes>> {
    if *method == Method::GET {
        return Ok(None);
    }
    let explicit = options.get(keys::BODY).or_else(|| {
        if options.json() == Some(false) {
            options.get(keys::TEXT)
        } else {
            None
        }
    });
    match explicit {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(Bytes::from(text.clone()))),
        Some(other) => serde_json::to_vec(other)
            .map(|bytes| Some(Bytes::from(bytes)))
            .map_err(Error::Serialization),
    }
}
