//! Gist operations on top of the github-base verb methods
//!
//! ```rust,no_run
//! use github_base::{GitHub, RequestOptions};
//! use github_base_gists::Gists;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let github = GitHub::new(RequestOptions::new().with_token("ghp_..."))?;
//! let gists: Gists = github.plugin();
//! for gist in gists.list("doowb").await? {
//!     println!("{} {}", gist.id, gist.description.unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use github_base::{GitHub, Plugin, RequestOptions, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// A gist as returned by the API
#[derive(Debug, Clone, Deserialize)]
pub struct Gist {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub files: BTreeMap<String, GistFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GistFile {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    /// Only present when a single gist is fetched
    #[serde(default)]
    pub content: Option<String>,
}

/// Payload for creating a gist
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewGist {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub public: bool,
    pub files: BTreeMap<String, FileContent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileContent {
    pub content: String,
}

impl NewGist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }

    pub fn file(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(
            name.into(),
            FileContent {
                content: content.into(),
            },
        );
        self
    }
}

/// Gist capability, built with `github.plugin::<Gists>()`
#[derive(Debug, Clone)]
pub struct Gists {
    github: GitHub,
}

impl Plugin for Gists {
    fn attach(client: GitHub) -> Self {
        Self { github: client }
    }

    fn client(&self) -> &GitHub {
        &self.github
    }
}

impl Gists {
    /// Every public gist of `user`, across all pages
    pub async fn list(&self, user: &str) -> Result<Vec<Gist>> {
        let options = RequestOptions::new().set("user", user);
        let result = self
            .github
            .paged("/users/:user/gists", &options)
            .await
            .with_context(|| format!("Failed to list gists for {}", user))?;
        debug!(user, pages = result.pages.len(), "listed gists");
        collect(result.merged)
    }

    /// Every gist of the authenticated user
    pub async fn list_mine(&self) -> Result<Vec<Gist>> {
        let result = self
            .github
            .paged("/gists", &RequestOptions::new())
            .await
            .context("Failed to list gists for the authenticated user")?;
        collect(result.merged)
    }

    pub async fn get(&self, id: &str) -> Result<Gist> {
        let response = self
            .github
            .get("/gists/:id", &id_options(id))
            .await
            .with_context(|| format!("Failed to get gist {}", id))?;
        Ok(response.json()?)
    }

    pub async fn create(&self, gist: &NewGist) -> Result<Gist> {
        let options = to_options(gist)?;
        let response = self
            .github
            .post("/gists", &options)
            .await
            .context("Failed to create gist")?;
        Ok(response.json()?)
    }

    /// Replace the content of the named files; other files are left alone
    pub async fn update(&self, id: &str, files: &BTreeMap<String, String>) -> Result<Gist> {
        let files: serde_json::Map<String, Value> = files
            .iter()
            .map(|(name, content)| (name.clone(), serde_json::json!({ "content": content })))
            .collect();
        let options = id_options(id).set("files", Value::Object(files));
        let response = self
            .github
            .patch("/gists/:id", &options)
            .await
            .with_context(|| format!("Failed to update gist {}", id))?;
        Ok(response.json()?)
    }

    pub async fn star(&self, id: &str) -> Result<()> {
        self.github
            .put("/gists/:id/star", &id_options(id))
            .await
            .with_context(|| format!("Failed to star gist {}", id))?;
        Ok(())
    }

    pub async fn unstar(&self, id: &str) -> Result<()> {
        self.github
            .delete("/gists/:id/star", &id_options(id))
            .await
            .with_context(|| format!("Failed to unstar gist {}", id))?;
        Ok(())
    }

    /// `204` means starred, `404` means not starred
    pub async fn is_starred(&self, id: &str) -> Result<bool> {
        match self.github.get("/gists/:id/star", &id_options(id)).await {
            Ok(_) => Ok(true),
            Err(err) if err.status() == Some(StatusCode::NOT_FOUND) => Ok(false),
            Err(err) => Err(err).with_context(|| format!("Failed to check star on gist {}", id)),
        }
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.github
            .del("/gists/:id", &id_options(id))
            .await
            .with_context(|| format!("Failed to delete gist {}", id))?;
        Ok(())
    }
}

fn id_options(id: &str) -> RequestOptions {
    RequestOptions::new().set("id", id)
}

fn to_options<T: Serialize>(payload: &T) -> Result<RequestOptions> {
    match serde_json::to_value(payload)? {
        Value::Object(map) => Ok(RequestOptions::from(map)),
        other => anyhow::bail!("Expected an object payload, got {}", other),
    }
}

fn collect<T: DeserializeOwned>(merged: Option<Vec<Value>>) -> Result<Vec<T>> {
    let items = merged.context("Expected every page to be a JSON array")?;
    Ok(serde_json::from_value(Value::Array(items))?)
}
