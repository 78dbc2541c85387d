//! Base types and traits for the command pattern

use crate::github::GitHub;
use crate::options::RequestOptions;
use anyhow::Result;

/// Context passed to all commands
#[derive(Clone, Debug)]
pub struct CommandContext {
    /// Client built from the config file, environment and global flags
    pub github: GitHub,
    /// Options given for this call only
    pub options: RequestOptions,
    /// Print the body compactly instead of pretty-printed
    pub compact: bool,
}

/// Trait that all commands must implement
#[async_trait::async_trait]
pub trait Command {
    /// Execute the command with the given context
    async fn execute(&self, context: &CommandContext) -> Result<()>;
}
