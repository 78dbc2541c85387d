//! Option validation
//!
//! Runs before any request is built. All problems are collected so one error
//! lists everything that needs fixing.

use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::constants::options as keys;
use crate::error::{Error, Result};
use crate::options::RequestOptions;

/// A single problem with a set of options
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsValidationError {
    InvalidUrl { key: String, value: String, reason: String },
    NotAnObject { key: String },
    NonScalarEntry { key: String, entry: String },
    NotPositive { key: String },
    OutOfRange { key: String },
    UnpairedCredential { present: String, missing: String },
}

impl std::fmt::Display for OptionsValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionsValidationError::InvalidUrl { key, value, reason } => {
                write!(f, "'{}' is not a valid URL for {}: {}", value, key, reason)
            }
            OptionsValidationError::NotAnObject { key } => {
                write!(f, "{} must be a mapping", key)
            }
            OptionsValidationError::NonScalarEntry { key, entry } => {
                write!(f, "{}.{} must be a string, number or boolean", key, entry)
            }
            OptionsValidationError::NotPositive { key } => {
                write!(f, "{} must be a positive number", key)
            }
            OptionsValidationError::OutOfRange { key } => {
                write!(f, "{} is too large", key)
            }
            OptionsValidationError::UnpairedCredential { present, missing } => {
                write!(f, "{} is set but {} is missing", present, missing)
            }
        }
    }
}

/// Collect every problem with `options`
pub fn check_options(options: &RequestOptions) -> Vec<OptionsValidationError> {
    let mut errors = Vec::new();

    for key in [keys::APIURL, keys::ENDPOINT] {
        if let Some(value) = options.get(key)
            && let Err(error) = check_base_url(key, value)
        {
            errors.push(error);
        }
    }

    if let Some(headers) = options.get(keys::HEADERS) {
        check_scalar_map(keys::HEADERS, headers, false, &mut errors);
    }
    if let Some(query) = options.get(keys::QUERY) {
        check_scalar_map(keys::QUERY, query, true, &mut errors);
    }

    if let Some(max_pages) = options.get(keys::MAX_PAGES)
        && !max_pages.as_u64().is_some_and(|n| n > 0)
    {
        errors.push(OptionsValidationError::NotPositive {
            key: keys::MAX_PAGES.to_string(),
        });
    }
    if let Some(timeout) = options.get(keys::TIMEOUT) {
        match timeout.as_f64() {
            Some(secs) if secs > 0.0 && secs.is_finite() => {
                if Duration::try_from_secs_f64(secs).is_err() {
                    errors.push(OptionsValidationError::OutOfRange {
                        key: keys::TIMEOUT.to_string(),
                    });
                }
            }
            _ => errors.push(OptionsValidationError::NotPositive {
                key: keys::TIMEOUT.to_string(),
            }),
        }
    }

    match (options.contains(keys::USERNAME), options.contains(keys::PASSWORD)) {
        (true, false) => errors.push(OptionsValidationError::UnpairedCredential {
            present: keys::USERNAME.to_string(),
            missing: keys::PASSWORD.to_string(),
        }),
        (false, true) => errors.push(OptionsValidationError::UnpairedCredential {
            present: keys::PASSWORD.to_string(),
            missing: keys::USERNAME.to_string(),
        }),
        _ => {}
    }

    errors
}

/// Validate `options`, turning any problems into one configuration error
pub fn validate_options(options: &RequestOptions) -> Result<()> {
    let errors = check_options(options);
    if errors.is_empty() {
        return Ok(());
    }
    Err(validation_errors_to_error(errors))
}

pub fn validation_errors_to_error(errors: Vec<OptionsValidationError>) -> Error {
    let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    Error::config(messages.join("; "))
}

fn check_base_url(key: &str, value: &Value) -> std::result::Result<(), OptionsValidationError> {
    let invalid = |reason: String| OptionsValidationError::InvalidUrl {
        key: key.to_string(),
        value: value.to_string(),
        reason,
    };
    let text = value
        .as_str()
        .ok_or_else(|| invalid("expected a string".to_string()))?;
    let url = Url::parse(text).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("unsupported scheme '{}'", other))),
    }
}

fn check_scalar_map(
    key: &str,
    value: &Value,
    allow_lists: bool,
    errors: &mut Vec<OptionsValidationError>,
) {
    let Some(map) = value.as_object() else {
        errors.push(OptionsValidationError::NotAnObject {
            key: key.to_string(),
        });
        return;
    };
    for (entry, value) in map {
        let ok = match value {
            Value::String(_) | Value::Number(_) | Value::Bool(_) => true,
            // null removes a query pair
            Value::Null => allow_lists,
            Value::Array(items) => allow_lists && items.iter().all(is_scalar),
            Value::Object(_) => false,
        };
        if !ok {
            errors.push(OptionsValidationError::NonScalarEntry {
                key: key.to_string(),
                entry: entry.clone(),
            });
        }
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}
