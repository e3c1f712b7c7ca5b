//! Command-line interface module.

mod args;
pub mod edit;
pub mod fetch;
pub mod patch;

pub use args::{Cli, Commands};
