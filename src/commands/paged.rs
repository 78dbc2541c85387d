//! Paged request command implementation

use super::request::{print_body, print_status};
use super::{Command, CommandContext};
use crate::response::Body;
use anyhow::{Context, Result};
use async_trait::async_trait;
use colored::*;
use futures::TryStreamExt;
use reqwest::Method;
use serde_json::Value;

/// Walk every page of a collection and print the merged result
pub struct PagedCommand {
    pub path: String,
    /// Print each page as it arrives instead of one merged array
    pub stream: bool,
}

#[async_trait]
impl Command for PagedCommand {
    async fn execute(&self, context: &CommandContext) -> Result<()> {
        if self.stream {
            return self.execute_streaming(context).await;
        }

        let result = context
            .github
            .paged(&self.path, &context.options)
            .await
            .with_context(|| format!("GET {} failed", self.path))?;

        if let Some(last) = result.pages.last() {
            print_status(&Method::GET, &self.path, last.status);
        }
        eprintln!(
            "{} {} page(s)",
            "Fetched".green(),
            result.pages.len().to_string().bold()
        );

        match result.merged {
            Some(items) => print_body(&Body::Json(Value::Array(items)), context.compact)?,
            None => {
                for page in &result.pages {
                    print_body(&page.body, context.compact)?;
                }
            }
        }
        Ok(())
    }
}

impl PagedCommand {
    async fn execute_streaming(&self, context: &CommandContext) -> Result<()> {
        let mut pages = Box::pin(
            context
                .github
                .paged_stream(&self.path, &context.options)
                .with_context(|| format!("GET {} failed", self.path))?,
        );

        let mut count = 0usize;
        while let Some(page) = pages
            .try_next()
            .await
            .with_context(|| format!("GET {} failed on page {}", self.path, count + 1))?
        {
            count += 1;
            eprintln!("{} {}", "page".dimmed(), count.to_string().bold());
            print_body(&page.body, context.compact)?;
        }
        eprintln!("{} {} page(s)", "Fetched".green(), count.to_string().bold());
        Ok(())
    }
}
