//! Operations on the authenticated user

use anyhow::{Context, Result};
use github_base::{GitHub, Plugin, RequestOptions, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub login: String,
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub public_repos: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Org {
    pub login: String,
    pub id: u64,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repo {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Which repositories `repos` returns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RepoType {
    #[default]
    All,
    Owner,
    Public,
    Private,
    Member,
}

impl RepoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepoType::All => "all",
            RepoType::Owner => "owner",
            RepoType::Public => "public",
            RepoType::Private => "private",
            RepoType::Member => "member",
        }
    }
}

/// User capability, built with `github.plugin::<UserApi>()`
#[derive(Debug, Clone)]
pub struct UserApi {
    github: GitHub,
}

impl Plugin for UserApi {
    fn attach(client: GitHub) -> Self {
        Self { github: client }
    }

    fn client(&self) -> &GitHub {
        &self.github
    }
}

impl UserApi {
    pub async fn profile(&self) -> Result<User> {
        let response = self
            .github
            .get("/user", &RequestOptions::new())
            .await
            .context("Failed to get the authenticated user")?;
        Ok(response.json()?)
    }

    pub async fn orgs(&self) -> Result<Vec<Org>> {
        let result = self
            .github
            .paged("/user/orgs", &RequestOptions::new())
            .await
            .context("Failed to list organizations")?;
        collect(result.merged)
    }

    /// Repositories of the authenticated user, most recently updated first
    pub async fn repos(&self, repo_type: RepoType) -> Result<Vec<Repo>> {
        let options = RequestOptions::new()
            .with_query("type", repo_type.as_str())
            .with_query("sort", "updated");
        let result = self
            .github
            .paged("/user/repos", &options)
            .await
            .context("Failed to list repositories")?;
        debug!(
            repo_type = repo_type.as_str(),
            pages = result.pages.len(),
            "listed repositories"
        );
        collect(result.merged)
    }

    pub async fn follow(&self, username: &str) -> Result<()> {
        self.github
            .put("/user/following/:user", &user_options(username))
            .await
            .with_context(|| format!("Failed to follow {}", username))?;
        Ok(())
    }

    pub async fn unfollow(&self, username: &str) -> Result<()> {
        self.github
            .delete("/user/following/:user", &user_options(username))
            .await
            .with_context(|| format!("Failed to unfollow {}", username))?;
        Ok(())
    }

    /// `204` means following, `404` means not following
    pub async fn is_following(&self, username: &str) -> Result<bool> {
        match self
            .github
            .get("/user/following/:user", &user_options(username))
            .await
        {
            Ok(_) => Ok(true),
            Err(err) if err.status() == Some(StatusCode::NOT_FOUND) => Ok(false),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to check whether following {}", username))
            }
        }
    }
}

fn user_options(user: &str) -> RequestOptions {
    RequestOptions::new().set("user", user)
}

fn collect<T: serde::de::DeserializeOwned>(merged: Option<Vec<Value>>) -> Result<Vec<T>> {
    let items = merged.context("Expected every page to be a JSON array")?;
    Ok(serde_json::from_value(Value::Array(items))?)
}
