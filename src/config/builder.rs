//! Client builder

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::error::Result;
use crate::github::GitHub;
use crate::options::RequestOptions;
use crate::transport::{ReqwestTransport, Transport};

/// Builder for [`GitHub`] clients
#[derive(Default)]
pub struct ClientBuilder {
    options: RequestOptions,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing set of instance options
    pub fn from_options(options: RequestOptions) -> Self {
        Self {
            options,
            transport: None,
        }
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.options = self.options.with_token(token);
        self
    }

    pub fn bearer(mut self, bearer: impl Into<String>) -> Self {
        self.options = self.options.with_bearer(bearer);
        self
    }

    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.options = self.options.with_basic_auth(username, password);
        self
    }

    pub fn apiurl(mut self, apiurl: impl Into<String>) -> Self {
        self.options = self.options.with_apiurl(apiurl);
        self
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.options = self.options.with_header(name, value);
        self
    }

    pub fn query(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.options = self.options.with_query(name, value);
        self
    }

    pub fn json(mut self, json: bool) -> Self {
        self.options = self.options.with_json(json);
        self
    }

    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.options = self.options.with_max_pages(max_pages);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options = self.options.with_timeout(timeout);
        self
    }

    /// Any other instance option, such as a default placeholder value
    pub fn option(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.options = self.options.set(key, value);
        self
    }

    /// Overlay `options` on what has been set so far
    pub fn options(mut self, options: &RequestOptions) -> Self {
        self.options = self.options.merged_with(options);
        self
    }

    /// Send requests through `transport` instead of `reqwest`
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Validate the options and build the client
    pub fn build(self) -> Result<GitHub> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new()),
        };
        GitHub::with_transport(self.options, transport)
    }
}
