//! Link-header pagination
//!
//! The walker requests the first page, then follows `rel="next"` links from
//! the `Link` header one page at a time until the server stops sending one.
//! Absolute next-page URLs are used exactly as the server wrote them;
//! relative ones are resolved against the page that linked to them.

use std::sync::Arc;

use futures::{Stream, TryStreamExt, stream};
use reqwest::header::{HeaderMap, LINK};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::request::ResolvedRequest;
use crate::request::template::redact_query;
use crate::response::Response;
use crate::transport::{Transport, execute};

/// Pagination links parsed from a `Link` header (RFC 8288)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Links {
    pub next: Option<String>,
    pub prev: Option<String>,
    pub first: Option<String>,
    pub last: Option<String>,
}

impl Links {
    /// Parse one `Link` header value: `<url>; rel="next", <url>; rel="last"`
    pub fn from_header(header_value: &str) -> Self {
        let mut links = Self::default();

        for part in split_outside_brackets(header_value, ',') {
            let mut url = None;
            let mut rels = Vec::new();

            for segment in split_outside_brackets(part, ';') {
                let segment = segment.trim();
                if segment.starts_with('<') && segment.ends_with('>') {
                    url = Some(segment[1..segment.len() - 1].to_string());
                } else if let Some((name, value)) = segment.split_once('=')
                    && name.trim().eq_ignore_ascii_case("rel")
                {
                    rels.extend(
                        value
                            .trim()
                            .trim_matches('"')
                            .split_whitespace()
                            .map(str::to_ascii_lowercase),
                    );
                }
            }

            let Some(url) = url else { continue };
            for rel in rels {
                let slot = match rel.as_str() {
                    "next" => &mut links.next,
                    "prev" => &mut links.prev,
                    "first" => &mut links.first,
                    "last" => &mut links.last,
                    _ => continue,
                };
                if slot.is_none() {
                    *slot = Some(url.clone());
                }
            }
        }

        links
    }

    /// Parse every `Link` header in `headers`
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut links = Self::default();
        for value in headers.get_all(LINK) {
            let Ok(value) = value.to_str() else { continue };
            let parsed = Self::from_header(value);
            links.next = links.next.or(parsed.next);
            links.prev = links.prev.or(parsed.prev);
            links.first = links.first.or(parsed.first);
            links.last = links.last.or(parsed.last);
        }
        links
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

/// Split a header value on `separator` where it is not inside `<...>`
fn split_outside_brackets(value: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut inside_url = false;
    let mut start = 0;
    for (idx, ch) in value.char_indices() {
        match ch {
            '<' => inside_url = true,
            '>' => inside_url = false,
            ch if ch == separator && !inside_url => {
                parts.push(&value[start..idx]);
                start = idx + ch.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&value[start..]);
    parts
}

/// Resolve a link target against the URL of the page that carried it
fn resolve_link(base: &str, target: &str) -> Result<String> {
    if Url::parse(target).is_ok() {
        return Ok(target.to_string());
    }
    Url::parse(base)
        .and_then(|base| base.join(target))
        .map(String::from)
        .map_err(|e| Error::config(format!("invalid next link '{}': {}", target, e)))
}

/// Every page of a walk, in fetch order
#[derive(Debug, Clone)]
pub struct PagedResult {
    pub pages: Vec<Response>,
    /// Concatenated page bodies, present only when every page is a JSON array
    pub merged: Option<Vec<Value>>,
}

impl PagedResult {
    pub fn from_pages(pages: Vec<Response>) -> Self {
        let merged = pages
            .iter()
            .map(|page| page.body.as_array())
            .collect::<Option<Vec<_>>>()
            .map(|arrays| arrays.into_iter().flatten().cloned().collect());
        Self { pages, merged }
    }
}

struct Walk {
    transport: Arc<dyn Transport>,
    next: Option<ResolvedRequest>,
    fetched: usize,
    max_pages: usize,
}

/// Lazily fetch pages starting with `first`, one request at a time.
///
/// Fails with [`Error::TooManyPages`] when a next link is still present
/// after `max_pages` pages.
pub fn pages(
    transport: Arc<dyn Transport>,
    first: ResolvedRequest,
    max_pages: usize,
) -> impl Stream<Item = Result<Response>> + Send + 'static {
    let walk = Walk {
        transport,
        next: Some(first),
        fetched: 0,
        max_pages,
    };

    stream::try_unfold(walk, |mut walk| async move {
        let Some(request) = walk.next.take() else {
            return Ok(None);
        };
        if walk.fetched >= walk.max_pages {
            warn!(
                limit = walk.max_pages,
                url = redact_query(&request.url),
                "stopping pagination at page limit"
            );
            return Err(Error::TooManyPages {
                limit: walk.max_pages,
            });
        }

        let response = execute(walk.transport.as_ref(), &request).await?;
        walk.fetched += 1;
        walk.next = match response.links().next {
            Some(target) => Some(request.follow(&resolve_link(&request.url, &target)?)),
            None => None,
        };
        debug!(
            page = walk.fetched,
            has_next = walk.next.is_some(),
            "fetched page"
        );
        Ok(Some((response, walk)))
    })
}

/// Fetch every page and merge array bodies
pub async fn walk(
    transport: Arc<dyn Transport>,
    first: ResolvedRequest,
    max_pages: usize,
) -> Result<PagedResult> {
    let pages: Vec<Response> = pages(transport, first, max_pages).try_collect().await?;
    Ok(PagedResult::from_pages(pages))
}
