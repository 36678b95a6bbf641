//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Rate-limited, auto-paginating HTTP client
#[derive(Parser, Debug)]
#[command(name = "pagequeue")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Call an endpoint and follow continuation tokens
    Fetch {
        #[command(flatten)]
        call: CallArgs,

        /// Stop after the first page even if a token is returned
        #[arg(long)]
        no_auto: bool,

        /// Stop after the first page that carries an error
        #[arg(long)]
        halt_on_error: bool,

        /// Cancel the session after this many pages
        #[arg(long)]
        max_pages: Option<usize>,
    },

    /// Call an endpoint once
    Get {
        #[command(flatten)]
        call: CallArgs,
    },

    /// Validate the configuration file
    Validate,
}

/// Arguments shared by `fetch` and `get`
#[derive(Args, Debug, Clone, Default)]
pub struct CallArgs {
    /// Absolute URL, or a path relative to the configured base_url
    pub url: String,

    /// Query parameter (key=value, repeatable)
    #[arg(short, long = "query", value_name = "KEY=VALUE")]
    pub query: Vec<String>,

    /// Request header (key:value, repeatable)
    #[arg(short = 'H', long = "header", value_name = "KEY:VALUE")]
    pub header: Vec<String>,

    /// Requests allowed per window
    #[arg(long)]
    pub requests: Option<u32>,

    /// Rate window in seconds
    #[arg(long)]
    pub window_secs: Option<u64>,

    /// Fixed dispatch interval in milliseconds
    #[arg(long)]
    pub interval_ms: Option<u64>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one page per line)
    Json,
    /// Human-readable output
    Pretty,
}
