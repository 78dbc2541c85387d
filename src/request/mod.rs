//! Request resolution pipeline
//!
//! - [`template`]: placeholder interpolation, base URL, query merging, cache busting
//! - [`body`]: JSON body / raw payload and content headers
//!
//! [`resolve`] runs the stages in order over already-merged options and
//! returns an immutable [`ResolvedRequest`].

pub mod body;
pub mod template;

use std::time::Duration;

use bytes::Bytes;
use reqwest::Method;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap};

use crate::constants::pagination::{DEFAULT_PER_PAGE, PER_PAGE_PARAM};
use crate::error::Result;
use crate::github::auth::synthesize_headers;
use crate::options::RequestOptions;

pub use body::normalize_body;
pub use template::{Interpolated, interpolate};

/// A fully-formed HTTP request, ready for a [`Transport`](crate::Transport)
#[derive(Debug, Clone)]
pub struct ResolvedRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    /// Decode the response as JSON regardless of its content type
    pub expect_json: bool,
    pub timeout: Option<Duration>,
}

impl ResolvedRequest {
    /// GET request for a server-provided page URL, reusing these headers.
    ///
    /// The URL is used verbatim: no interpolation and no cache buster.
    pub fn follow(&self, url: &str) -> ResolvedRequest {
        let mut headers = self.headers.clone();
        headers.remove(CONTENT_LENGTH);
        headers.remove(CONTENT_TYPE);
        ResolvedRequest {
            method: Method::GET,
            url: url.to_string(),
            headers,
            body: None,
            expect_json: self.expect_json,
            timeout: self.timeout,
        }
    }
}

/// Resolve a single request from merged options
pub fn resolve(method: Method, path: &str, options: &RequestOptions) -> Result<ResolvedRequest> {
    build(method, path, options, None)
}

/// Resolve the first request of a paged walk, defaulting `per_page`
pub fn resolve_paged(path: &str, options: &RequestOptions) -> Result<ResolvedRequest> {
    build(Method::GET, path, options, Some(DEFAULT_PER_PAGE))
}

fn build(
    method: Method,
    path: &str,
    options: &RequestOptions,
    per_page: Option<u32>,
) -> Result<ResolvedRequest> {
    let Interpolated { url, consumed } = interpolate(path, options)?;

    let url = match per_page {
        Some(per_page) => {
            template::with_query_default(&url, PER_PAGE_PARAM, &per_page.to_string())?
        }
        None => url,
    };
    let url = if method == Method::GET {
        template::append_cache_buster(&url)?
    } else {
        url
    };

    let mut headers = synthesize_headers(options)?;
    let body = normalize_body(&method, options, &consumed, &mut headers)?;

    Ok(ResolvedRequest {
        method,
        url,
        headers,
        body,
        expect_json: options.json() == Some(true),
        timeout: options.timeout(),
    })
}
