// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # pagequeue
//!
//! Rate-limited, auto-paginating HTTP calls for cursor-paginated JSON APIs.
//!
//! ## Features
//!
//! - **Paced dispatch**: one request per interval derived from a rate budget
//!   (e.g. 1500 requests per 15 minutes), or a governor token bucket
//! - **Auto pagination**: follows the continuation token in each page until
//!   the API stops returning one
//! - **Two outbound channels**: pages on `data`, failures on `errors`, both
//!   closed when the session ends
//! - **Cancellation**: a session can be stopped at any await point
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagequeue::{Client, ClientConfig, Envelope, PageStream, QueryParams};
//!
//! #[tokio::main]
//! async fn main() -> pagequeue::Result<()> {
//!     let config = ClientConfig {
//!         base_url: "https://api.example.com/2".into(),
//!         ..Default::default()
//!     };
//!     let client = Client::new(&config)?;
//!
//!     let mut query = QueryParams::new();
//!     query.insert("max_results".into(), vec!["100".into()]);
//!
//!     let mut stream: PageStream<Envelope> = client.paginate("users/42/tweets", query);
//!     while let Some(page) = stream.next_page().await {
//!         println!("{:?} results", page.result_count());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Client                              │
//! │        paginate(path, query)       fetch_one(path, query)    │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │ seed Request
//! ┌──────────────────────────────┴───────────────────────────────┐
//! │  PageDriver session ──requests──▶ Queue worker               │
//! │        ▲                             │ pace → Executor       │
//! │        └─────────responses───────────┘                       │
//! └──────────────┬───────────────────────────────┬───────────────┘
//!                │ data (bounded)                │ errors
//!                ▼                               ▼
//!                           PageStream<P>
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Page payloads and the continuation contract
pub mod page;

/// Immutable request values and per-round responses
pub mod request;

/// Executor trait and the reqwest-backed implementation
pub mod http;

/// Rate-limited request queue
pub mod queue;

/// Continuation-token pagination
pub mod pagination;

/// Client facade
pub mod client;

/// Configuration loading
pub mod config;

/// Command-line interface
pub mod cli;

#[cfg(test)]
mod test_support;

// ============================================================================
// Re-exports
// ============================================================================

pub use client::Client;
pub use config::{load_config, load_config_from_str, ClientConfig};
pub use error::{Error, ErrorKind, Result};
pub use http::{Executor, HttpExecutor, HttpExecutorConfig};
pub use page::{ApiProblem, Envelope, Meta, Page};
pub use pagination::{next_page, NextPage, PageDriver, PageStream, StopReason};
pub use queue::{Queue, QueueConfig, QueueHandle};
pub use request::{Request, Response};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
