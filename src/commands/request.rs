//! Single request command implementation

use super::{Command, CommandContext};
use crate::error::Error;
use crate::response::{Body, Response};
use anyhow::{Context, Result};
use async_trait::async_trait;
use colored::*;
use reqwest::{Method, StatusCode};

/// Send one request and print the status line and body
pub struct RequestCommand {
    pub method: Method,
    pub path: String,
}

#[async_trait]
impl Command for RequestCommand {
    async fn execute(&self, context: &CommandContext) -> Result<()> {
        let result = context
            .github
            .request(self.method.clone(), &self.path, &context.options)
            .await;

        match result {
            Ok(response) => {
                print_status(&self.method, &self.path, response.status);
                print_body(&response.body, context.compact)?;
                Ok(())
            }
            Err(Error::HttpStatus {
                status,
                message,
                response,
            }) => {
                print_status(&self.method, &self.path, status);
                print_body(&response.body, context.compact)?;
                if status == StatusCode::FORBIDDEN
                    && let Some(summary) = rate_limit_summary(&response)
                {
                    eprintln!("{}", summary.yellow());
                }
                anyhow::bail!("{} {} failed: {}", self.method, self.path, message)
            }
            Err(err) => {
                Err(err).with_context(|| format!("{} {} failed", self.method, self.path))
            }
        }
    }
}

/// Coloured `METHOD path -> status` line on stderr
pub fn print_status(method: &Method, path: &str, status: StatusCode) {
    let code = status.to_string();
    let code = if status.is_success() {
        code.green()
    } else if status.is_redirection() {
        code.yellow()
    } else {
        code.red()
    };
    eprintln!("{} {} {} {}", method.as_str().bold(), path.cyan(), "->".dimmed(), code);
}

/// Print a body to stdout, pretty-printing JSON unless `compact`
pub fn print_body(body: &Body, compact: bool) -> Result<()> {
    match body {
        Body::Json(value) if compact => println!("{}", serde_json::to_string(value)?),
        Body::Json(value) => println!("{}", serde_json::to_string_pretty(value)?),
        Body::Raw(bytes) if bytes.is_empty() => {}
        Body::Raw(_) => println!("{}", body.text()),
    }
    Ok(())
}

/// Rate limit headers worth surfacing when a request was refused
pub fn rate_limit_summary(response: &Response) -> Option<String> {
    let remaining = response.headers.get("x-ratelimit-remaining")?.to_str().ok()?;
    let limit = response.headers.get("x-ratelimit-limit")?.to_str().ok()?;
    Some(format!("rate limit: {}/{} remaining", remaining, limit))
}
