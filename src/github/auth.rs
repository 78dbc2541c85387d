//! Authentication and default header synthesis
//!
//! Credentials are read from the merged options in a fixed order: `token`,
//! then `bearer`, then `username` + `password`. The first match produces the
//! `Authorization` header; nothing else ever reads the credential keys.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use serde_json::Value;

use crate::constants::github::{DEFAULT_ACCEPT, DEFAULT_USER_AGENT};
use crate::error::{Error, Result};
use crate::options::RequestOptions;

/// Credentials for the GitHub API
#[derive(Clone, PartialEq, Eq)]
pub enum GitHubAuth {
    /// Personal access token, sent as `token <t>`
    Token(String),
    /// OAuth or app token, sent as `Bearer <t>`
    Bearer(String),
    /// Username and password, sent as HTTP basic auth
    Basic { username: String, password: String },
}

impl GitHubAuth {
    /// Pick the credentials to use from merged options, if any
    pub fn from_options(options: &RequestOptions) -> Option<Self> {
        if let Some(token) = options.token() {
            return Some(GitHubAuth::Token(token.to_string()));
        }
        if let Some(bearer) = options.bearer() {
            return Some(GitHubAuth::Bearer(bearer.to_string()));
        }
        match (options.username(), options.password()) {
            (Some(username), Some(password)) => Some(GitHubAuth::Basic {
                username: username.to_string(),
                password: password.to_string(),
            }),
            _ => None,
        }
    }

    /// Value of the `Authorization` header for these credentials
    pub fn get_auth_header(&self) -> String {
        match self {
            GitHubAuth::Token(token) => format!("token {}", token),
            GitHubAuth::Bearer(bearer) => format!("Bearer {}", bearer),
            GitHubAuth::Basic { username, password } => {
                format!("Basic {}", STANDARD.encode(format!("{}:{}", username, password)))
            }
        }
    }

    /// Scheme name, safe to log
    pub fn scheme(&self) -> &'static str {
        match self {
            GitHubAuth::Token(_) => "token",
            GitHubAuth::Bearer(_) => "bearer",
            GitHubAuth::Basic { .. } => "basic",
        }
    }
}

impl fmt::Debug for GitHubAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GitHubAuth::{}(***)", self.scheme())
    }
}

/// Build request headers from merged options.
///
/// Defaults come first, then the `Authorization` header, then the caller's
/// `headers` map, so a caller header always wins.
pub fn synthesize_headers(options: &RequestOptions) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(DEFAULT_ACCEPT));
    headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));

    if let Some(auth) = GitHubAuth::from_options(options) {
        let mut value = HeaderValue::from_str(&auth.get_auth_header())
            .map_err(|_| Error::config("credentials contain characters not allowed in a header"))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    if let Some(custom) = options.headers() {
        for (name, value) in custom {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| Error::config(format!("invalid header name '{}'", name)))?;
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => {
                    return Err(Error::config(format!(
                        "header '{}' must be a string, number or boolean",
                        name
                    )));
                }
            };
            let header_value = HeaderValue::from_str(&text)
                .map_err(|_| Error::config(format!("invalid value for header '{}'", name)))?;
            headers.insert(header_name, header_value);
        }
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_token_header() {
        let headers = synthesize_headers(&RequestOptions::new().with_token("abc")).unwrap();
        assert_eq!(headers[AUTHORIZATION], "token abc");
    }

    #[test]
    fn test_bearer_header() {
        let headers = synthesize_headers(&RequestOptions::new().with_bearer("xyz")).unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer xyz");
    }

    #[test]
    fn test_basic_header() {
        let headers =
            synthesize_headers(&RequestOptions::new().with_basic_auth("u", "p")).unwrap();
        assert_eq!(headers[AUTHORIZATION], "Basic dTpw");
    }

    #[test]
    fn test_token_beats_bearer_and_basic() {
        let options = RequestOptions::new()
            .with_basic_auth("u", "p")
            .with_bearer("xyz")
            .with_token("abc");
        assert_eq!(
            GitHubAuth::from_options(&options),
            Some(GitHubAuth::Token("abc".to_string()))
        );

        let options = RequestOptions::new().with_basic_auth("u", "p").with_bearer("xyz");
        assert_eq!(
            GitHubAuth::from_options(&options),
            Some(GitHubAuth::Bearer("xyz".to_string()))
        );
    }

    #[test]
    fn test_no_credentials_no_authorization() {
        let headers = synthesize_headers(&RequestOptions::new()).unwrap();
        assert!(headers.get(AUTHORIZATION).is_none());
        assert_eq!(headers[ACCEPT], DEFAULT_ACCEPT);
        assert_eq!(headers[USER_AGENT], DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_username_without_password_is_ignored() {
        assert!(GitHubAuth::from_options(&RequestOptions::new().set("username", "u")).is_none());
    }

    #[test]
    fn test_caller_headers_override_defaults() {
        let options = RequestOptions::new()
            .with_token("abc")
            .with_header("Accept", "application/vnd.github.mercy-preview+json")
            .with_header("User-Agent", "my-app");
        let headers = synthesize_headers(&options).unwrap();
        assert_eq!(headers[ACCEPT], "application/vnd.github.mercy-preview+json");
        assert_eq!(headers[USER_AGENT], "my-app");
        assert_eq!(headers.get_all(ACCEPT).iter().count(), 1);
    }

    #[test]
    fn test_non_scalar_header_is_rejected() {
        let options = RequestOptions::new().set("headers", json!({"x-list": [1, 2]}));
        let err = synthesize_headers(&options).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_debug_hides_secret() {
        let auth = GitHubAuth::Token("ghp_secret".to_string());
        assert_eq!(format!("{:?}", auth), "GitHubAuth::token(***)");
    }
}
