//! Loading options from YAML files and the environment

use std::env;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::constants::{env as vars, options as keys};
use crate::error::{Error, Result};
use crate::options::RequestOptions;

impl RequestOptions {
    /// Load options from a YAML mapping such as
    ///
    /// ```yaml
    /// apiurl: https://github.example.com/api/v3
    /// token: ghp_...
    /// headers:
    ///   x-github-api-version: "2022-11-28"
    /// ```
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_error = |message: String| Error::ConfigFile {
            path: path.display().to_string(),
            message,
        };

        let content = std::fs::read_to_string(path).map_err(|e| file_error(e.to_string()))?;
        if content.trim().is_empty() {
            return Ok(Self::new());
        }
        let value: Value = serde_yaml::from_str(&content).map_err(|e| file_error(e.to_string()))?;
        let options = match value {
            Value::Object(map) => Self::from(map),
            Value::Null => Self::new(),
            _ => return Err(file_error("expected a mapping at the top level".to_string())),
        };

        debug!(path = %path.display(), keys = options.len(), "loaded options file");
        Ok(options)
    }

    /// Load `path` if it exists, otherwise return empty options
    pub fn load_if_exists(path: impl AsRef<Path>) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }

    /// Write options to a YAML file, credentials included
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file_error = |message: String| Error::ConfigFile {
            path: path.display().to_string(),
            message,
        };
        let yaml = serde_yaml::to_string(self).map_err(|e| file_error(e.to_string()))?;
        std::fs::write(path, yaml).map_err(|e| file_error(e.to_string()))
    }

    /// Credentials and base URL from `GITHUB_*` environment variables.
    ///
    /// Unset and empty variables are skipped.
    pub fn from_env() -> Self {
        let mut options = Self::new();
        for (var, key) in [
            (vars::TOKEN, keys::TOKEN),
            (vars::BEARER, keys::BEARER),
            (vars::USERNAME, keys::USERNAME),
            (vars::PASSWORD, keys::PASSWORD),
            (vars::API_URL, keys::APIURL),
        ] {
            if let Ok(value) = env::var(var)
                && !value.is_empty()
            {
                options.insert(key, value);
            }
        }
        options
    }
}
