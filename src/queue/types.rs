//! Queue configuration

use crate::types::{ErrorPolicy, RateBudget};
use std::time::Duration;

/// Default query parameter that carries the continuation token
pub const DEFAULT_CONTINUATION_PARAM: &str = "pagination_token";

/// Settings shared by a queue and the pagination driver that feeds it
///
/// The worker only looks at `interval` and the channel capacities; `auto`,
/// `error_policy` and `continuation_param` are read by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    /// Minimum spacing between dispatches
    pub interval: Duration,
    /// Rate-limit horizon the interval was derived from
    pub window: Duration,
    /// Follow continuation tokens automatically
    pub auto: bool,
    /// What to do when a page carries an error
    pub error_policy: ErrorPolicy,
    /// Query key that receives the continuation token
    pub continuation_param: String,
    /// Inbound request channel capacity
    pub request_capacity: usize,
    /// Outbound response channel capacity
    pub response_capacity: usize,
    /// Caller-facing data channel capacity
    pub data_capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self::from_budget(RateBudget::default())
    }
}

impl QueueConfig {
    /// Config pacing at `budget.window / budget.requests`
    pub fn from_budget(budget: RateBudget) -> Self {
        Self {
            interval: budget.interval(),
            window: budget.window,
            auto: true,
            error_policy: ErrorPolicy::Continue,
            continuation_param: DEFAULT_CONTINUATION_PARAM.to_string(),
            request_capacity: 1,
            response_capacity: 1,
            data_capacity: 16,
        }
    }

    /// Set the dispatch interval
    #[must_use]
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the informational window
    #[must_use]
    pub fn window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Enable or disable automatic pagination
    #[must_use]
    pub fn auto(mut self, auto: bool) -> Self {
        self.auto = auto;
        self
    }

    /// Set the error policy
    #[must_use]
    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Set the continuation query parameter
    #[must_use]
    pub fn continuation_param(mut self, param: impl Into<String>) -> Self {
        self.continuation_param = param.into();
        self
    }

    /// Set inbound/outbound channel capacities
    #[must_use]
    pub fn capacities(mut self, requests: usize, responses: usize) -> Self {
        self.request_capacity = requests;
        self.response_capacity = responses;
        self
    }

    /// Set the caller-facing data channel capacity
    #[must_use]
    pub fn data_capacity(mut self, capacity: usize) -> Self {
        self.data_capacity = capacity;
        self
    }
}
