//! API client facade
//!
//! Binds an [`HttpExecutor`] and a [`QueueConfig`] to a base URL so that an
//! endpoint call is one line:
//!
//! ```rust,ignore
//! let client = Client::new(&load_config("client.yaml")?)?;
//! let stream: PageStream<Envelope> = client.paginate("users/42/tweets", query);
//! let (pages, errors) = stream.collect().await;
//! ```
//!
//! Every call gets its own queue and its own pagination session.

use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::HttpExecutor;
use crate::page::Page;
use crate::pagination::{PageDriver, PageStream};
use crate::queue::{Queue, QueueConfig};
use crate::request::Request;
use crate::types::{CallMode, Method, QueryParams};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Entry point for endpoint calls
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    executor: Arc<HttpExecutor>,
    queue: QueueConfig,
}

impl Client {
    /// Create a client from a validated config
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let executor = HttpExecutor::with_config(config.http_config())?;
        Ok(Self::with_executor(
            config.base_url.clone(),
            executor,
            config.queue_config(),
        ))
    }

    /// Create a client around an existing executor
    pub fn with_executor(
        base_url: impl Into<String>,
        executor: HttpExecutor,
        queue: QueueConfig,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            executor: Arc::new(executor),
            queue,
        }
    }

    pub fn queue_config(&self) -> &QueueConfig {
        &self.queue
    }

    /// Build a request for `path` relative to the base URL
    pub fn request(&self, method: Method, path: &str) -> Result<Request> {
        Request::new(method, &self.build_url(path))
    }

    /// GET `path` and follow continuation tokens
    pub fn paginate<P>(&self, path: &str, query: QueryParams) -> PageStream<P>
    where
        P: DeserializeOwned + Page,
    {
        match self.request(Method::GET, path) {
            Ok(request) => self.send(request.with_query(query), CallMode::Paginated),
            Err(e) => PageStream::failed(e),
        }
    }

    /// GET `path` once; lookups by ID cannot paginate
    pub fn fetch_one<P>(&self, path: &str, query: QueryParams) -> PageStream<P>
    where
        P: DeserializeOwned + Page,
    {
        match self.request(Method::GET, path) {
            Ok(request) => self.send(request.with_query(query), CallMode::Single),
            Err(e) => PageStream::failed(e),
        }
    }

    /// Run a prepared request in a fresh session
    pub fn send<P>(&self, request: Request, mode: CallMode) -> PageStream<P>
    where
        P: DeserializeOwned + Page,
    {
        self.send_with(request, mode, &CancellationToken::new())
    }

    /// Like [`Client::send`], cancelled when `cancel` fires
    ///
    /// Cancelling the returned stream leaves `cancel` untouched.
    pub fn send_with<P>(
        &self,
        request: Request,
        mode: CallMode,
        cancel: &CancellationToken,
    ) -> PageStream<P>
    where
        P: DeserializeOwned + Page,
    {
        let queue = Queue::<P>::new(self.queue.clone(), self.executor.clone())
            .with_cancellation(cancel);
        PageDriver::new(queue).mode(mode).spawn(request)
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") || self.base_url.is_empty() {
            return path.to_string();
        }

        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}
