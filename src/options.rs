//! Request options and the option merger
//!
//! Options are a flat mapping of lower-cased names to JSON values. Three
//! layers feed every request: library defaults, the options stored on the
//! client instance, and the options passed to the call. Later layers win key
//! by key; `headers` and `query` merge one level deeper so a call can add a
//! single header without restating the instance's headers.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::constants::{github, options as keys, pagination};

/// A layer of request options
#[derive(Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RequestOptions {
    values: BTreeMap<String, Value>,
}

impl RequestOptions {
    /// Create an empty option set
    pub fn new() -> Self {
        Self::default()
    }

    /// Library defaults, the lowest-precedence layer
    pub fn defaults() -> Self {
        Self::new().set(keys::APIURL, github::API_BASE)
    }

    /// Set `key` to `value`, returning the updated options
    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert `key`, lower-casing it (and header names) first
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) -> Option<Value> {
        let key = key.to_ascii_lowercase();
        let value = normalize_value(&key, value.into());
        self.values.insert(key, value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(&key.to_ascii_lowercase())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(&key.to_ascii_lowercase())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// String value of `key`, ignoring non-string values
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn with_token(self, token: impl Into<String>) -> Self {
        self.set(keys::TOKEN, token.into())
    }

    pub fn with_bearer(self, bearer: impl Into<String>) -> Self {
        self.set(keys::BEARER, bearer.into())
    }

    pub fn with_basic_auth(self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.set(keys::USERNAME, username.into())
            .set(keys::PASSWORD, password.into())
    }

    pub fn with_apiurl(self, apiurl: impl Into<String>) -> Self {
        self.set(keys::APIURL, apiurl.into())
    }

    /// Force (or stop forcing) JSON decoding of responses
    pub fn with_json(self, json: bool) -> Self {
        self.set(keys::JSON, json)
    }

    /// Raw request payload, sent without JSON serialization when a string
    pub fn with_body(self, body: impl Into<Value>) -> Self {
        self.set(keys::BODY, body)
    }

    /// Add one header to the `headers` map
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert_nested(
            keys::HEADERS,
            name.to_ascii_lowercase(),
            Value::String(value.into()),
        );
        self
    }

    /// Add one pair to the `query` map
    pub fn with_query(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert_nested(keys::QUERY, name.to_string(), value.into());
        self
    }

    pub fn with_max_pages(self, max_pages: usize) -> Self {
        self.set(keys::MAX_PAGES, max_pages)
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.set(keys::TIMEOUT, timeout.as_secs_f64())
    }

    pub fn token(&self) -> Option<&str> {
        self.get_str(keys::TOKEN)
    }

    pub fn bearer(&self) -> Option<&str> {
        self.get_str(keys::BEARER)
    }

    pub fn username(&self) -> Option<&str> {
        self.get_str(keys::USERNAME)
    }

    pub fn password(&self) -> Option<&str> {
        self.get_str(keys::PASSWORD)
    }

    /// The `json` flag, if set
    pub fn json(&self) -> Option<bool> {
        self.get(keys::JSON).and_then(Value::as_bool)
    }

    /// Base URL: `apiurl`, then `endpoint`, then the public GitHub API
    pub fn api_base(&self) -> &str {
        self.get_str(keys::APIURL)
            .or_else(|| self.get_str(keys::ENDPOINT))
            .unwrap_or(github::API_BASE)
    }

    pub fn headers(&self) -> Option<&Map<String, Value>> {
        self.get(keys::HEADERS).and_then(Value::as_object)
    }

    pub fn query(&self) -> Option<&Map<String, Value>> {
        self.get(keys::QUERY).and_then(Value::as_object)
    }

    pub fn max_pages(&self) -> usize {
        self.get(keys::MAX_PAGES)
            .and_then(Value::as_u64)
            .map(|n| n as usize)
            .unwrap_or(pagination::DEFAULT_MAX_PAGES)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.get(keys::TIMEOUT)
            .and_then(Value::as_f64)
            .filter(|secs| *secs > 0.0)
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }

    /// Keys listed in the `params` option, treated as already consumed
    pub fn params(&self) -> Vec<String> {
        self.get(keys::PARAMS)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_ascii_lowercase)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether `key` never contributes to a request body
    pub fn is_reserved(&self, key: &str) -> bool {
        keys::RESERVED.contains(&key) || (key == keys::TEXT && self.json() == Some(false))
    }

    /// Overlay `other` on top of `self` without touching either input
    pub fn merged_with(&self, other: &RequestOptions) -> RequestOptions {
        let mut merged = self.clone();
        for (key, value) in &other.values {
            let combined = match (merged.values.get(key), value) {
                (Some(Value::Object(base)), Value::Object(overlay))
                    if key == keys::HEADERS || key == keys::QUERY =>
                {
                    let mut map = base.clone();
                    for (k, v) in overlay {
                        map.insert(k.clone(), v.clone());
                    }
                    Value::Object(map)
                }
                _ => value.clone(),
            };
            merged.values.insert(key.clone(), combined);
        }
        merged
    }

    fn insert_nested(&mut self, key: &str, name: String, value: Value) {
        let mut map = match self.values.remove(key) {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        map.insert(name, value);
        self.values.insert(key.to_string(), Value::Object(map));
    }
}

/// Merge the three option layers; call options beat instance options, which
/// beat the defaults.
pub fn merge(
    defaults: &RequestOptions,
    instance: &RequestOptions,
    call: &RequestOptions,
) -> RequestOptions {
    defaults.merged_with(instance).merged_with(call)
}

fn normalize_value(key: &str, value: Value) -> Value {
    match value {
        Value::Object(map) if key == keys::HEADERS => Value::Object(
            map.into_iter()
                .map(|(name, v)| (name.to_ascii_lowercase(), v))
                .collect(),
        ),
        other => other,
    }
}

impl fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in &self.values {
            if keys::CREDENTIALS.contains(&key.as_str()) {
                map.entry(key, &"***");
            } else {
                map.entry(key, value);
            }
        }
        map.finish()
    }
}

impl<'de> Deserialize<'de> for RequestOptions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        Ok(raw.into_iter().collect())
    }
}

impl<K: AsRef<str>> FromIterator<(K, Value)> for RequestOptions {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut options = RequestOptions::new();
        for (key, value) in iter {
            options.insert(key.as_ref(), value);
        }
        options
    }
}

impl From<Map<String, Value>> for RequestOptions {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}
