//! CLI module
//!
//! Command-line interface for one-off paginated calls.
//!
//! # Commands
//!
//! - `fetch` - Follow continuation tokens, one JSON line per page
//! - `get` - Single-page call
//! - `validate` - Check a config file

mod commands;
mod runner;

pub use commands::{CallArgs, Cli, Commands, OutputFormat};
pub use runner::Runner;

#[cfg(test)]
mod tests;
