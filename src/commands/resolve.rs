//! Dry-run command implementation

use super::{Command, CommandContext};
use crate::request::ResolvedRequest;
use anyhow::{Context, Result};
use async_trait::async_trait;
use colored::*;
use reqwest::Method;
use reqwest::header::AUTHORIZATION;

/// Print the request that would be sent, without sending it
pub struct ResolveCommand {
    pub method: Method,
    pub path: String,
}

#[async_trait]
impl Command for ResolveCommand {
    async fn execute(&self, context: &CommandContext) -> Result<()> {
        let request = context
            .github
            .resolve(self.method.clone(), &self.path, &context.options)
            .with_context(|| format!("failed to resolve {} {}", self.method, self.path))?;
        println!("{}", render(&request));
        Ok(())
    }
}

/// Human-readable request, with the `Authorization` value masked
pub fn render(request: &ResolvedRequest) -> String {
    let mut lines = vec![format!("{} {}", request.method.as_str().bold(), request.url)];

    let mut names: Vec<&str> = request.headers.keys().map(|name| name.as_str()).collect();
    names.sort_unstable();
    names.dedup();
    for name in names {
        for value in request.headers.get_all(name) {
            let shown = if name == AUTHORIZATION.as_str() {
                mask_authorization(value.to_str().unwrap_or_default())
            } else {
                String::from_utf8_lossy(value.as_bytes()).into_owned()
            };
            lines.push(format!("{}: {}", name.cyan(), shown));
        }
    }

    if let Some(body) = &request.body {
        lines.push(String::new());
        lines.push(String::from_utf8_lossy(body).into_owned());
    }
    lines.join("\n")
}

/// Keep the scheme, hide the credential
fn mask_authorization(value: &str) -> String {
    match value.split_once(' ') {
        Some((scheme, _)) => format!("{} ***", scheme),
        None => "***".to_string(),
    }
}
