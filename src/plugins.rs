//! Extension point for capability crates
//!
//! A plugin is a struct built from a clone of the client that adds named
//! operations on top of the verb methods. The client knows nothing about
//! concrete plugins; it only hands out clones of itself.

use crate::github::GitHub;

/// A capability object layered over a [`GitHub`] client
pub trait Plugin: Sized {
    /// Build the capability around `client`
    fn attach(client: GitHub) -> Self;

    /// The client the capability sends requests through
    fn client(&self) -> &GitHub;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::RequestOptions;
    use reqwest::Method;

    struct Repos {
        github: GitHub,
    }

    impl Plugin for Repos {
        fn attach(client: GitHub) -> Self {
            Self { github: client }
        }

        fn client(&self) -> &GitHub {
            &self.github
        }
    }

    #[test]
    fn test_plugin_shares_client_options() {
        let github = GitHub::new(RequestOptions::new().with_token("abc").set("owner", "doowb")).unwrap();
        let repos: Repos = github.plugin();
        assert_eq!(repos.client().options(), github.options());

        let request = repos
            .client()
            .resolve(Method::GET, "/users/:owner/repos", &RequestOptions::new())
            .unwrap();
        assert!(request.url.contains("/users/doowb/repos"));
    }
}
