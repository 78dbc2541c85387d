//! github-base - a thin client for the GitHub REST API
//!
//! Requests are described by a path template and a bag of options. The
//! options are merged (library defaults < client options < call options),
//! `:placeholders` in the path are filled from them, credentials become an
//! `Authorization` header and whatever is left becomes the JSON body.
//!
//! ```rust,no_run
//! use github_base::{GitHub, RequestOptions};
//!
//! # async fn example() -> github_base::Result<()> {
//! let github = GitHub::builder().token("ghp_...").build()?;
//! let repo = github
//!     .get(
//!         "/repos/:owner/:repo",
//!         &RequestOptions::new().set("owner", "rust-lang").set("repo", "rust"),
//!     )
//!     .await?;
//! println!("{}", repo.body.text());
//! # Ok(())
//! # }
//! ```

pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod github;
pub mod options;
pub mod pagination;
pub mod plugins;
pub mod request;
pub mod response;
pub mod transport;

pub use config::ClientBuilder;
pub use error::{Error, Result};
pub use github::{GitHub, GitHubAuth};
pub use options::{RequestOptions, merge};
pub use pagination::{Links, PagedResult};
pub use plugins::Plugin;
pub use request::ResolvedRequest;
pub use response::{Body, Response};
pub use transport::{RawResponse, ReqwestTransport, Transport};

/// Re-exported so callers can name methods without depending on `reqwest`
pub use reqwest::{Method, StatusCode};

/// Options from the default config file (if present) overlaid with the
/// `GITHUB_*` environment variables
pub fn load_default_options() -> Result<RequestOptions> {
    let file = RequestOptions::load_if_exists(constants::config::DEFAULT_CONFIG_FILE)?;
    Ok(file.merged_with(&RequestOptions::from_env()))
}
