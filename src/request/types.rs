//! Request/response definitions

use crate::error::{Error, Result};
use crate::page::Page;
use crate::types::{HeaderMap, Method, QueryParams};
use bytes::Bytes;
use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

// ============================================================================
// Round State
// ============================================================================

/// Per-round state carried by a request
///
/// `round` is the zero-based page index. The dispatch fields are stamped by
/// the queue worker and must not leak into the next round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundState {
    /// Zero-based page index
    pub round: u32,
    /// When the worker handed the request to the executor
    pub dispatched_at: Option<Instant>,
    /// How long the executor took
    pub elapsed: Option<Duration>,
}

// ============================================================================
// Request
// ============================================================================

/// One HTTP call
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: Url,
    query: QueryParams,
    headers: HeaderMap,
    body: Option<Bytes>,
    state: RoundState,
}

impl Request {
    /// Create a request
    ///
    /// Any query string already present in `url` is moved into the query
    /// parameter set, so that later merges see every key.
    pub fn new(method: Method, url: &str) -> Result<Self> {
        let mut url = Url::parse(url)?;

        let mut query = QueryParams::new();
        for (key, value) in url.query_pairs() {
            query
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }
        url.set_query(None);

        Ok(Self {
            method,
            url,
            query,
            headers: HeaderMap::new(),
            body: None,
            state: RoundState::default(),
        })
    }

    /// Create a GET request
    pub fn get(url: &str) -> Result<Self> {
        Self::new(Method::GET, url)
    }

    /// Create a POST request
    pub fn post(url: &str) -> Result<Self> {
        Self::new(Method::POST, url)
    }

    /// Replace the query with `query` merged over the current one
    #[must_use]
    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.merge_query(query);
        self
    }

    /// Set a single query parameter
    #[must_use]
    pub fn with_query_pair(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), vec![value.into()]);
        self
    }

    /// Add a header
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set an opaque body
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set a JSON body and content type
    pub fn with_json_body<T: Serialize>(self, body: &T) -> Result<Self> {
        let bytes = serde_json::to_vec(body)?;
        Ok(self
            .with_header("Content-Type", "application/json")
            .with_body(bytes))
    }

    // ------------------------------------------------------------------------
    // Pagination primitives
    // ------------------------------------------------------------------------

    /// Merge `values` into the query
    ///
    /// Keys in `values` replace existing values for that key; every other
    /// key is kept as is.
    pub fn merge_query(&mut self, values: QueryParams) {
        for (key, vals) in values {
            self.query.insert(key, vals);
        }
    }

    /// Clear state retained from the previous round
    pub fn reset_state(&mut self) {
        self.state.dispatched_at = None;
        self.state.elapsed = None;
    }

    /// Derive the request for the page after this one
    #[must_use]
    pub fn next_round(&self, param: &str, token: impl Into<String>) -> Self {
        let mut next = self.clone();
        let mut values = QueryParams::new();
        values.insert(param.to_string(), vec![token.into()]);
        next.merge_query(values);
        next.reset_state();
        next.state.round = self.state.round.saturating_add(1);
        next
    }

    pub(crate) fn mark_dispatched(&mut self, at: Instant) {
        self.state.dispatched_at = Some(at);
    }

    pub(crate) fn mark_completed(&mut self) {
        if let Some(at) = self.state.dispatched_at {
            self.state.elapsed = Some(at.elapsed());
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn method(&self) -> Method {
        self.method
    }

    /// Endpoint URL without query string
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    /// First value of a query parameter
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    /// Zero-based page index
    pub fn round(&self) -> u32 {
        self.state.round
    }

    /// Endpoint URL with the query string rendered
    pub fn full_url(&self) -> Url {
        let mut url = self.url.clone();
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, values) in &self.query {
                for value in values {
                    pairs.append_pair(key, value);
                }
            }
        }
        url
    }
}

// ============================================================================
// Response
// ============================================================================

/// Outcome of executing one [`Request`]
///
/// Carries a payload, an error, or both (a page that decoded fine but also
/// reports API problems). Never neither.
#[derive(Debug)]
pub struct Response<P> {
    request: Request,
    payload: Option<P>,
    error: Option<Error>,
}

impl<P: Page> Response<P> {
    /// Build a response from an executor result
    pub fn from_result(request: Request, result: Result<P>) -> Self {
        match result {
            Ok(payload) => {
                let error = payload.protocol_error();
                Self {
                    request,
                    payload: Some(payload),
                    error,
                }
            }
            Err(error) => Self::from_error(request, error),
        }
    }

    /// Build a response that only carries an error
    pub fn from_error(request: Request, error: Error) -> Self {
        Self {
            request,
            payload: None,
            error: Some(error),
        }
    }

    /// Non-empty continuation token of the payload
    pub fn continuation_token(&self) -> Option<&str> {
        self.payload
            .as_ref()
            .and_then(Page::continuation_token)
            .filter(|t| !t.is_empty())
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn payload(&self) -> Option<&P> {
        self.payload.as_ref()
    }

    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Split into request, payload and error
    pub fn into_parts(self) -> (Request, Option<P>, Option<Error>) {
        (self.request, self.payload, self.error)
    }
}
