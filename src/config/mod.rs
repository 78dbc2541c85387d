//! Configuration management module

pub mod builder;
pub mod loader;
pub mod validation;

pub use builder::ClientBuilder;
pub use validation::{OptionsValidationError, check_options, validate_options};
