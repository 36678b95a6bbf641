//! Client configuration
//!
//! A [`ClientConfig`] is usually loaded from a YAML file (JSON works too,
//! being a YAML subset):
//!
//! ```yaml
//! base_url: https://api.example.com/2
//! rate_limit:
//!   requests: 450
//!   window_secs: 900
//! auto: true
//! error_policy: continue
//! continuation_param: pagination_token
//! timeout_secs: 30
//! headers:
//!   Authorization: Bearer xxx
//! ```

use crate::error::{Error, Result};
use crate::http::HttpExecutorConfig;
use crate::queue::QueueConfig;
use crate::types::{ErrorPolicy, RateBudget};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Client Config
// ============================================================================

/// Complete client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL prepended to relative paths (empty = absolute URLs only)
    #[serde(default)]
    pub base_url: String,

    /// Rate budget
    #[serde(default)]
    pub rate_limit: RateLimitDef,

    /// Follow continuation tokens automatically
    #[serde(default = "default_true")]
    pub auto: bool,

    /// What to do when a page carries an error
    #[serde(default)]
    pub error_policy: ErrorPolicy,

    /// Query key receiving the continuation token
    #[serde(default = "default_continuation_param")]
    pub continuation_param: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Pages buffered ahead of the caller
    #[serde(default = "default_data_capacity")]
    pub data_capacity: usize,
}

fn default_true() -> bool {
    true
}

fn default_continuation_param() -> String {
    crate::queue::DEFAULT_CONTINUATION_PARAM.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_data_capacity() -> usize {
    16
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            rate_limit: RateLimitDef::default(),
            auto: true,
            error_policy: ErrorPolicy::default(),
            continuation_param: default_continuation_param(),
            timeout_secs: default_timeout_secs(),
            user_agent: None,
            headers: HashMap::new(),
            data_capacity: default_data_capacity(),
        }
    }
}

/// Rate budget definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitDef {
    /// Requests allowed per window
    #[serde(default = "default_requests")]
    pub requests: u32,

    /// Window length in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Explicit dispatch interval; overrides `window_secs / requests`
    #[serde(default)]
    pub interval_ms: Option<u64>,
}

fn default_requests() -> u32 {
    1500
}

fn default_window_secs() -> u64 {
    900
}

impl Default for RateLimitDef {
    fn default() -> Self {
        Self {
            requests: default_requests(),
            window_secs: default_window_secs(),
            interval_ms: None,
        }
    }
}

impl RateLimitDef {
    pub fn budget(&self) -> RateBudget {
        RateBudget::new(self.requests, Duration::from_secs(self.window_secs))
    }

    /// Effective dispatch interval
    pub fn interval(&self) -> Duration {
        match self.interval_ms {
            Some(ms) => Duration::from_millis(ms),
            None => self.budget().interval(),
        }
    }
}

impl ClientConfig {
    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if !self.base_url.is_empty() {
            url::Url::parse(&self.base_url)?;
        }
        if self.rate_limit.interval_ms.is_none() {
            if self.rate_limit.requests == 0 {
                return Err(Error::invalid_value(
                    "rate_limit.requests",
                    "must be greater than zero",
                ));
            }
            if self.rate_limit.window_secs == 0 {
                return Err(Error::invalid_value(
                    "rate_limit.window_secs",
                    "must be greater than zero",
                ));
            }
        }
        if self.continuation_param.trim().is_empty() {
            return Err(Error::invalid_value(
                "continuation_param",
                "must not be empty",
            ));
        }
        if self.timeout_secs == 0 {
            return Err(Error::invalid_value("timeout_secs", "must be greater than zero"));
        }
        if self.data_capacity == 0 {
            return Err(Error::invalid_value("data_capacity", "must be greater than zero"));
        }
        Ok(())
    }

    /// Queue settings derived from this config
    pub fn queue_config(&self) -> QueueConfig {
        QueueConfig::from_budget(self.rate_limit.budget())
            .interval(self.rate_limit.interval())
            .auto(self.auto)
            .error_policy(self.error_policy)
            .continuation_param(&self.continuation_param)
            .data_capacity(self.data_capacity)
    }

    /// HTTP executor settings derived from this config
    pub fn http_config(&self) -> HttpExecutorConfig {
        let mut builder =
            HttpExecutorConfig::builder().timeout(Duration::from_secs(self.timeout_secs));
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent);
        }
        for (key, value) in &self.headers {
            builder = builder.header(key, value);
        }
        builder.build()
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load and validate a config file
pub fn load_config(path: impl AsRef<Path>) -> Result<ClientConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;
    load_config_from_str(&content)
}

/// Parse and validate a config document
pub fn load_config_from_str(content: &str) -> Result<ClientConfig> {
    let config: ClientConfig = serde_yaml::from_str(content)?;
    config.validate()?;
    Ok(config)
}
