//! The `GitHub` client
//!
//! Every verb method is a thin wrapper over [`GitHub::request`], which merges
//! option layers, resolves the request and hands it to the transport. The
//! client itself is immutable from the point of view of a call: instance
//! options live behind an `Arc` and clones share them.

use std::fmt;
use std::sync::Arc;

use futures::Stream;
use reqwest::Method;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::builder::ClientBuilder;
use crate::config::validation::validate_options;
use crate::error::Result;
use crate::options::{RequestOptions, merge};
use crate::pagination::{self, PagedResult};
use crate::plugins::Plugin;
use crate::request::{self, ResolvedRequest};
use crate::response::Response;
use crate::transport::{ReqwestTransport, Transport, execute};

/// GitHub REST API client
///
/// ```rust,no_run
/// use github_base::{GitHub, RequestOptions};
///
/// # async fn example() -> github_base::Result<()> {
/// let github = GitHub::new(RequestOptions::new().with_token("ghp_..."))?;
/// let gists = github
///     .paged("/users/:owner/gists", &RequestOptions::new().set("owner", "doowb"))
///     .await?;
/// println!("{} gists", gists.merged.unwrap_or_default().len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GitHub {
    options: Arc<RequestOptions>,
    transport: Arc<dyn Transport>,
}

impl GitHub {
    /// Create a client sending requests with `reqwest`
    pub fn new(options: RequestOptions) -> Result<Self> {
        Self::with_transport(options, Arc::new(ReqwestTransport::new()))
    }

    /// Create a client on top of a custom transport
    pub fn with_transport(options: RequestOptions, transport: Arc<dyn Transport>) -> Result<Self> {
        validate_options(&options)?;
        Ok(Self {
            options: Arc::new(options),
            transport,
        })
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Instance options, as given at construction
    pub fn options(&self) -> &RequestOptions {
        &self.options
    }

    /// Change one instance option. Clones made earlier keep their options.
    pub fn set_option(&mut self, key: &str, value: impl Into<serde_json::Value>) -> &mut Self {
        Arc::make_mut(&mut self.options).insert(key, value);
        self
    }

    /// Defaults, instance options and `call` merged in precedence order
    pub fn merged(&self, call: &RequestOptions) -> RequestOptions {
        merge(&RequestOptions::defaults(), &self.options, call)
    }

    /// Run the request pipeline without sending anything
    pub fn resolve(
        &self,
        method: Method,
        path: &str,
        options: &RequestOptions,
    ) -> Result<ResolvedRequest> {
        let merged = self.merged(options);
        validate_options(&merged)?;
        request::resolve(method, path, &merged)
    }

    /// Send one request with any method
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        options: &RequestOptions,
    ) -> Result<Response> {
        let request = self.resolve(method, path, options)?;
        execute(self.transport.as_ref(), &request).await
    }

    pub async fn get(&self, path: &str, options: &RequestOptions) -> Result<Response> {
        self.request(Method::GET, path, options).await
    }

    pub async fn put(&self, path: &str, options: &RequestOptions) -> Result<Response> {
        self.request(Method::PUT, path, options).await
    }

    pub async fn post(&self, path: &str, options: &RequestOptions) -> Result<Response> {
        self.request(Method::POST, path, options).await
    }

    pub async fn patch(&self, path: &str, options: &RequestOptions) -> Result<Response> {
        self.request(Method::PATCH, path, options).await
    }

    pub async fn delete(&self, path: &str, options: &RequestOptions) -> Result<Response> {
        self.request(Method::DELETE, path, options).await
    }

    /// Alias for [`GitHub::delete`]
    pub async fn del(&self, path: &str, options: &RequestOptions) -> Result<Response> {
        self.delete(path, options).await
    }

    /// Lazily walk every page of a collection.
    ///
    /// Option problems are reported here, before the first request is sent.
    pub fn paged_stream(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> Result<impl Stream<Item = Result<Response>> + Send + 'static> {
        let merged = self.merged(options);
        validate_options(&merged)?;
        let first = request::resolve_paged(path, &merged)?;
        Ok(pagination::pages(
            Arc::clone(&self.transport),
            first,
            merged.max_pages(),
        ))
    }

    /// Fetch every page of a collection, following `Link: rel="next"`
    pub async fn paged(&self, path: &str, options: &RequestOptions) -> Result<PagedResult> {
        let merged = self.merged(options);
        validate_options(&merged)?;
        let first = request::resolve_paged(path, &merged)?;
        let result =
            pagination::walk(Arc::clone(&self.transport), first, merged.max_pages()).await?;
        debug!(pages = result.pages.len(), "pagination finished");
        Ok(result)
    }

    /// Send a request on the tokio runtime and hand the result to `callback`.
    ///
    /// The callback runs exactly once, on a runtime worker.
    pub fn spawn_request<F>(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
        callback: F,
    ) -> JoinHandle<()>
    where
        F: FnOnce(Result<Response>) + Send + 'static,
    {
        let client = self.clone();
        let path = path.to_string();
        tokio::spawn(async move {
            let result = client.request(method, &path, &options).await;
            callback(result);
        })
    }

    /// Build a capability object sharing this client
    pub fn plugin<P: Plugin>(&self) -> P {
        P::attach(self.clone())
    }
}

impl fmt::Debug for GitHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHub")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
