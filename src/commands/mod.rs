//! Command implementations for the CLI

pub mod base;
pub mod paged;
pub mod request;
pub mod resolve;
pub mod validators;

pub use base::{Command, CommandContext};
pub use paged::PagedCommand;
pub use request::RequestCommand;
pub use resolve::ResolveCommand;
