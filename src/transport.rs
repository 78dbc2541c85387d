//! HTTP executor
//!
//! The [`Transport`] trait is the seam between the request pipeline and the
//! network. [`ReqwestTransport`] is the default; tests and embedders can plug
//! in their own.

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::error::Result;
use crate::request::ResolvedRequest;
use crate::request::template::redact_query;
use crate::response::{Response, decode};

/// Status, headers and payload as received, before decoding
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Sends a resolved request over the wire
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and return the undecoded response.
    ///
    /// Only transport failures are errors here; every status is a response.
    async fn send(&self, request: &ResolvedRequest) -> Result<RawResponse>;
}

/// [`Transport`] backed by a shared `reqwest::Client`
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing client (proxies, TLS settings, connection pools)
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &ResolvedRequest) -> Result<RawResponse> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

/// Send one request and decode the result
pub async fn execute(transport: &dyn Transport, request: &ResolvedRequest) -> Result<Response> {
    debug!(
        method = %request.method,
        url = redact_query(&request.url),
        "sending request"
    );
    let raw = transport.send(request).await?;
    debug!(status = raw.status.as_u16(), bytes = raw.body.len(), "received response");
    decode(raw, request.expect_json)
}
