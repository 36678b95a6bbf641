//! reqwest-backed executor
//!
//! Provides an executor that handles:
//! - Default headers and user agent for every call
//! - Per-call timeout
//! - Error classification (status, rate limiting, decode)
//!
//! It performs exactly one attempt per request.

use super::executor::Executor;
use crate::error::{Error, Result};
use crate::page::Page;
use crate::request::Request;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the HTTP executor
#[derive(Debug, Clone)]
pub struct HttpExecutorConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpExecutorConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            default_headers: HashMap::new(),
            user_agent: format!("pagequeue/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpExecutorConfig {
    /// Create a new config builder
    pub fn builder() -> HttpExecutorConfigBuilder {
        HttpExecutorConfigBuilder::default()
    }
}

/// Builder for HTTP executor config
#[derive(Default)]
pub struct HttpExecutorConfigBuilder {
    config: HttpExecutorConfig,
}

impl HttpExecutorConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpExecutorConfig {
        self.config
    }
}

/// Executes [`Request`]s over HTTP and decodes JSON payloads
#[derive(Clone)]
pub struct HttpExecutor {
    client: Client,
    config: HttpExecutorConfig,
}

impl HttpExecutor {
    /// Create an executor with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpExecutorConfig::default())
    }

    /// Create an executor with custom configuration
    pub fn with_config(config: HttpExecutorConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, config })
    }

    /// Create an executor around an existing reqwest client
    pub fn with_client(client: Client, config: HttpExecutorConfig) -> Self {
        Self { client, config }
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    pub fn config(&self) -> &HttpExecutorConfig {
        &self.config
    }

    /// Send the request once and classify the status
    pub async fn send(&self, request: &Request) -> Result<Response> {
        let url = request.full_url();
        let mut req = self
            .client
            .request(request.method().into(), url.clone())
            .timeout(self.config.timeout);

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        // Request headers win over defaults
        for (key, value) in request.headers() {
            req = req.header(key.as_str(), value.as_str());
        }

        if let Some(body) = request.body() {
            req = req.body(body.clone());
        }

        let response = match req.send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return Err(Error::Timeout {
                    timeout_ms: self.config.timeout.as_millis() as u64,
                });
            }
            Err(e) => return Err(Error::Http(e)),
        };

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = extract_retry_after(&response);
            warn!(url = %url, retry_after, "Rate limited (429)");
            return Err(Error::RateLimited {
                retry_after_seconds: retry_after,
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        debug!("Request succeeded: {} {}", request.method(), url);
        Ok(response)
    }

    /// Send the request and decode the JSON body
    pub async fn send_json<T: DeserializeOwned>(&self, request: &Request) -> Result<T> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            Error::decode(format!(
                "{e} (body: {})",
                String::from_utf8_lossy(&bytes[..bytes.len().min(200)])
            ))
        })
    }
}

#[async_trait]
impl<P> Executor<P> for HttpExecutor
where
    P: DeserializeOwned + Page,
{
    async fn execute(&self, request: &Request) -> Result<P> {
        self.send_json(request).await
    }
}

impl std::fmt::Debug for HttpExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpExecutor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Extract retry-after header value
fn extract_retry_after(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .unwrap_or(60)
}
