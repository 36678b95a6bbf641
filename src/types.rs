//! Common types used throughout pagequeue
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Ordered query parameter set: each key maps to one or more values
pub type QueryParams = BTreeMap<String, Vec<String>>;

/// Ordered header map
pub type HeaderMap = BTreeMap<String, String>;

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
            Method::PUT => reqwest::Method::PUT,
            Method::PATCH => reqwest::Method::PATCH,
            Method::DELETE => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::PATCH => "PATCH",
            Method::DELETE => "DELETE",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Call Policy
// ============================================================================

/// Whether a call site can paginate at all
///
/// Lookups by ID structurally return a single page, so the driver must not
/// consult the continuation token for them even if one is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallMode {
    /// Follow continuation tokens (subject to the `auto` flag)
    #[default]
    Paginated,
    /// Exactly one response is consumed
    Single,
}

/// What the driver does when a page arrives with an error attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Relay the error and keep following the continuation token
    #[default]
    Continue,
    /// Relay the error and stop after the current page
    Halt,
}

// ============================================================================
// Rate Budget
// ============================================================================

/// "N requests per window" budget, converted to a fixed dispatch interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateBudget {
    /// Requests allowed per window
    pub requests: u32,
    /// Rate-limit horizon
    pub window: Duration,
}

impl RateBudget {
    /// Create a budget of `requests` per `window`
    pub fn new(requests: u32, window: Duration) -> Self {
        Self { requests, window }
    }

    /// Budget expressed per 15 minute window, the usual REST API horizon
    pub fn per_15_minutes(requests: u32) -> Self {
        Self::new(requests, Duration::from_secs(15 * 60))
    }

    /// Minimum spacing between dispatches (`window / requests`)
    pub fn interval(&self) -> Duration {
        self.window / self.requests.max(1)
    }
}

impl Default for RateBudget {
    fn default() -> Self {
        Self::per_15_minutes(1500)
    }
}
