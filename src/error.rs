//! Error types for pagequeue
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Errors raised while executing a request are never retried by the queue.
//! They travel to the caller through the `errors` channel of a
//! [`PageStream`](crate::pagination::PageStream), and [`Error::kind`] /
//! [`Error::is_retryable`] are there for the caller to decide what to do.

use crate::page::ApiProblem;
use thiserror::Error;

/// The main error type for pagequeue
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Executor panicked: {message}")]
    ExecutorPanic { message: String },

    // ============================================================================
    // Protocol Errors
    // ============================================================================
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("API returned {} error(s): {}", problems.len(), summarize(problems))]
    Api { problems: Vec<ApiProblem> },

    // ============================================================================
    // Decode Errors
    // ============================================================================
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Lifecycle Errors
    // ============================================================================
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Request queue is closed")]
    QueueClosed,
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The call could not be completed
    Transport,
    /// The body could not be parsed into the expected payload
    Decode,
    /// The API answered with a well-formed error
    Protocol,
    /// Bad configuration or request construction
    Config,
    /// Queue shutdown or cancellation
    Lifecycle,
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an API problem error
    pub fn api(problems: Vec<ApiProblem>) -> Self {
        Self::Api { problems }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Http(_) | Error::Timeout { .. } | Error::ExecutorPanic { .. } => {
                ErrorKind::Transport
            }
            Error::HttpStatus { .. } | Error::RateLimited { .. } | Error::Api { .. } => {
                ErrorKind::Protocol
            }
            Error::Decode { .. } | Error::JsonParse(_) => ErrorKind::Decode,
            Error::Config { .. }
            | Error::InvalidConfigValue { .. }
            | Error::YamlParse(_)
            | Error::InvalidUrl(_)
            | Error::Io(_) => ErrorKind::Config,
            Error::Cancelled | Error::QueueClosed => ErrorKind::Lifecycle,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::RateLimited { .. } | Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

fn summarize(problems: &[ApiProblem]) -> String {
    problems
        .iter()
        .map(ApiProblem::summary)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias for pagequeue
pub type Result<T> = std::result::Result<T, Error>;
