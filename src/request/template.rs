//! URL interpolation
//!
//! Turns a path template such as `/repos/:owner/:repo` into a full URL,
//! recording which option keys were consumed as placeholders so they stay
//! out of the request body.

use std::sync::LazyLock;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use regex::Regex;
use serde_json::{Map, Value};
use url::Url;

use crate::constants::github::CACHE_BUST_PARAM;
use crate::constants::options::CREDENTIALS;
use crate::error::{Error, Result};
use crate::options::RequestOptions;

/// Placeholders start with a letter or underscore, so ports never match.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":([A-Za-z_]\w*)").expect("valid placeholder pattern"));

static LAST_CACHE_BUST: AtomicI64 = AtomicI64::new(0);

/// Result of interpolating a path template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpolated {
    pub url: String,
    /// Lower-cased option keys substituted into the path, in order of use
    pub consumed: Vec<String>,
}

/// Substitute placeholders, prepend the base URL and merge the `query` option.
///
/// Only the path is scanned for placeholders. A placeholder with no option
/// value is an error rather than being sent literally.
pub fn interpolate(template: &str, options: &RequestOptions) -> Result<Interpolated> {
    let template = template.trim();
    if template.is_empty() {
        return Err(Error::config("path must not be empty"));
    }

    let (origin, rest) = split_origin(template);
    let (path, query) = match rest.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (rest, None),
    };

    let mut consumed: Vec<String> = Vec::new();
    let mut substituted = String::with_capacity(path.len());
    let mut last = 0;
    for captures in PLACEHOLDER.captures_iter(path) {
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        let key = name.as_str().to_ascii_lowercase();
        if CREDENTIALS.contains(&key.as_str()) {
            return Err(Error::config(format!(
                "credential `:{}` cannot be used as a path placeholder",
                name.as_str()
            )));
        }
        let value = match options.get(&key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(Value::Null) | None => {
                return Err(Error::UnresolvedPlaceholder {
                    name: name.as_str().to_string(),
                    template: template.to_string(),
                });
            }
            Some(_) => {
                return Err(Error::config(format!(
                    "placeholder `:{}` needs a string, number or boolean value",
                    name.as_str()
                )));
            }
        };
        substituted.push_str(&path[last..whole.start()]);
        substituted.push_str(&value);
        last = whole.end();
        if !consumed.contains(&key) {
            consumed.push(key);
        }
    }
    substituted.push_str(&path[last..]);

    let mut full = match origin {
        Some(origin) => format!("{}{}", origin, substituted),
        None => {
            let base = options.api_base().trim_end_matches('/');
            if substituted.starts_with('/') {
                format!("{}{}", base, substituted)
            } else {
                format!("{}/{}", base, substituted)
            }
        }
    };
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        full.push('?');
        full.push_str(query);
    }

    let mut url =
        Url::parse(&full).map_err(|e| Error::config(format!("invalid URL '{}': {}", full, e)))?;
    if let Some(overrides) = options.query().filter(|q| !q.is_empty()) {
        apply_query(&mut url, overrides)?;
    }

    Ok(Interpolated {
        url: url.to_string(),
        consumed,
    })
}

/// Add `key=value` to the query string unless `key` is already present
pub fn with_query_default(url: &str, key: &str, value: &str) -> Result<String> {
    let mut parsed = parse(url)?;
    if parsed.query_pairs().any(|(k, _)| k == key) {
        return Ok(url.to_string());
    }
    parsed.query_pairs_mut().append_pair(key, value);
    Ok(parsed.to_string())
}

/// Append the cache-busting parameter to a GET URL
pub fn append_cache_buster(url: &str) -> Result<String> {
    let mut parsed = parse(url)?;
    parsed
        .query_pairs_mut()
        .append_pair(CACHE_BUST_PARAM, &cache_buster().to_string());
    Ok(parsed.to_string())
}

/// Millisecond timestamp, strictly increasing across calls in this process
pub fn cache_buster() -> i64 {
    let now = Utc::now().timestamp_millis();
    match LAST_CACHE_BUST.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
        Some(now.max(last + 1))
    }) {
        Ok(previous) | Err(previous) => now.max(previous + 1),
    }
}

/// Strip everything after the first `?`, for logging
pub fn redact_query(url: &str) -> &str {
    url.split_once('?').map(|(head, _)| head).unwrap_or(url)
}

fn parse(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| Error::config(format!("invalid URL '{}': {}", url, e)))
}

/// Split an absolute template into `scheme://authority` and the rest
fn split_origin(template: &str) -> (Option<&str>, &str) {
    let Some(idx) = template.find("//") else {
        return (None, template);
    };
    let after = idx + 2;
    let end = template[after..]
        .find(['/', '?'])
        .map(|offset| after + offset)
        .unwrap_or(template.len());
    (Some(&template[..end]), &template[end..])
}

/// Overlay `overrides` on the URL's query; option values win, `null` removes
fn apply_query(url: &mut Url, overrides: &Map<String, Value>) -> Result<()> {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !overrides.contains_key(k.as_ref()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    for (key, value) in overrides {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    pairs.push((key.clone(), query_scalar(key, item)?));
                }
            }
            other => pairs.push((key.clone(), query_scalar(key, other)?)),
        }
    }

    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }
    Ok(())
}

fn query_scalar(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(Error::config(format!(
            "query parameter '{}' must be a string, number or boolean",
            key
        ))),
    }
}
