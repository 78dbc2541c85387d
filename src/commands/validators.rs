//! Command argument validation utilities
//!
//! Parsing and checks that run after clap has split the command line:
//! `key=value` pairs, `--data` JSON and HTTP method names.

use anyhow::{Result, anyhow};
use reqwest::Method;
use serde_json::{Map, Value};

/// Validation errors for command arguments
#[derive(Debug, PartialEq)]
pub enum CommandValidationError {
    /// Mutually exclusive arguments were both provided
    MutualExclusivity { first: String, second: String },
    /// Invalid argument value
    InvalidValue {
        argument: String,
        value: String,
        reason: String,
    },
}

impl std::fmt::Display for CommandValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandValidationError::MutualExclusivity { first, second } => {
                write!(f, "Cannot specify both {} and {}", first, second)
            }
            CommandValidationError::InvalidValue {
                argument,
                value,
                reason,
            } => {
                write!(f, "Invalid value '{}' for {}: {}", value, argument, reason)
            }
        }
    }
}

impl std::error::Error for CommandValidationError {}

/// Convert validation error to anyhow::Error
pub fn validation_error_to_anyhow(error: CommandValidationError) -> anyhow::Error {
    anyhow!(error.to_string())
}

/// Parse `key=value`. The value is read as JSON when it parses (numbers,
/// booleans, arrays, objects, `null`) and kept as a string otherwise.
pub fn parse_key_value(arg: &str) -> std::result::Result<(String, Value), CommandValidationError> {
    let invalid = |reason: &str| CommandValidationError::InvalidValue {
        argument: "key=value".to_string(),
        value: arg.to_string(),
        reason: reason.to_string(),
    };
    let (key, value) = arg.split_once('=').ok_or_else(|| invalid("missing '='"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(invalid("key cannot be empty"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Parse `--data`, which must be a JSON object
pub fn parse_data(data: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(data) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(validation_error_to_anyhow(
            CommandValidationError::InvalidValue {
                argument: "--data".to_string(),
                value: data.to_string(),
                reason: "expected a JSON object".to_string(),
            },
        )),
        Err(e) => Err(validation_error_to_anyhow(
            CommandValidationError::InvalidValue {
                argument: "--data".to_string(),
                value: data.to_string(),
                reason: e.to_string(),
            },
        )),
    }
}

/// Parse an HTTP method name, case-insensitively
pub fn parse_method(method: &str) -> std::result::Result<Method, CommandValidationError> {
    let upper = method.trim().to_ascii_uppercase();
    match upper.as_str() {
        "GET" | "POST" | "PUT" | "PATCH" | "DELETE" | "HEAD" | "OPTIONS" => {
            Method::from_bytes(upper.as_bytes()).map_err(|e| CommandValidationError::InvalidValue {
                argument: "method".to_string(),
                value: method.to_string(),
                reason: e.to_string(),
            })
        }
        _ => Err(CommandValidationError::InvalidValue {
            argument: "method".to_string(),
            value: method.to_string(),
            reason: "expected one of get, post, put, patch, delete, head, options".to_string(),
        }),
    }
}

/// Validate the request path
pub fn validate_path(path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(validation_error_to_anyhow(
            CommandValidationError::InvalidValue {
                argument: "path".to_string(),
                value: path.to_string(),
                reason: "path cannot be empty or whitespace only".to_string(),
            },
        ));
    }
    Ok(())
}

/// `--body` sends a raw payload, `--data` a JSON object; not both
pub fn validate_payload_args(data: &Option<String>, body: &Option<String>) -> Result<()> {
    if data.is_some() && body.is_some() {
        return Err(validation_error_to_anyhow(
            CommandValidationError::MutualExclusivity {
                first: "--data".to_string(),
                second: "--body".to_string(),
            },
        ));
    }
    Ok(())
}
