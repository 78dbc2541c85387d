//! GitHub API client
//!
//! - [`client`]: the [`GitHub`] client and its verb methods
//! - [`auth`]: credential selection and default header synthesis

pub mod auth;
pub mod client;

pub use auth::{GitHubAuth, synthesize_headers};
pub use client::GitHub;

pub use crate::constants::github::{API_BASE, DEFAULT_USER_AGENT};
