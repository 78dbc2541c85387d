//! Common test support utilities and fixtures
//!
//! Shared by the integration tests through `mod support;`.

#![allow(dead_code)]

use bytes::Bytes;
use github_base::request::ResolvedRequest;
use github_base::{GitHub, RawResponse, RequestOptions, Result, StatusCode, Transport};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use std::collections::VecDeque;
use std::process::Command;
use std::sync::{Arc, Mutex};
use wiremock::MockServer;

/// Result of running a CLI command
#[derive(Debug)]
pub struct CliOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Run the CLI through `cargo run` with a scrubbed GitHub environment
pub fn run_cli(args: &[&str]) -> CliOutput {
    let output = Command::new("cargo")
        .args(["run", "--quiet", "--"])
        .args(args)
        .env_remove("GITHUB_TOKEN")
        .env_remove("GITHUB_BEARER")
        .env_remove("GITHUB_USERNAME")
        .env_remove("GITHUB_PASSWORD")
        .env_remove("GITHUB_API_URL")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to execute cargo run");

    CliOutput {
        status: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}

/// Client pointed at a mock server
pub fn client_for(server: &MockServer) -> GitHub {
    GitHub::new(RequestOptions::new().with_apiurl(server.uri())).unwrap()
}

/// Client with a token, pointed at a mock server
pub fn authed_client_for(server: &MockServer, token: &str) -> GitHub {
    GitHub::new(
        RequestOptions::new()
            .with_apiurl(server.uri())
            .with_token(token),
    )
    .unwrap()
}

/// Transport that records requests and replays canned responses
#[derive(Default, Clone)]
pub struct RecordingTransport {
    pub requests: Arc<Mutex<Vec<ResolvedRequest>>>,
    responses: Arc<Mutex<VecDeque<RawResponse>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON response
    pub fn push_json(&self, status: u16, body: serde_json::Value) -> &Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.push(RawResponse {
            status: StatusCode::from_u16(status).unwrap(),
            headers,
            body: Bytes::from(body.to_string()),
        })
    }

    pub fn push(&self, response: RawResponse) -> &Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn sent(&self) -> Vec<ResolvedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: &ResolvedRequest) -> Result<RawResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.responses.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| RawResponse {
            status: StatusCode::NO_CONTENT,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }))
    }
}

/// Client backed by a [`RecordingTransport`]
pub fn recording_client(options: RequestOptions) -> (GitHub, RecordingTransport) {
    let transport = RecordingTransport::new();
    let github = GitHub::with_transport(options, Arc::new(transport.clone())).unwrap();
    (github, transport)
}
