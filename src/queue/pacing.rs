//! Pacing strategies
//!
//! The default is a fixed interval between dispatches: "N requests per
//! window" becomes `interval = window / N`, with no bursts. APIs that allow
//! bursting can use the governor-backed token bucket instead.

use crate::types::RateBudget;
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use tracing::trace;

/// Decides when the next request may be dispatched
#[async_trait]
pub trait Pacer: Send {
    /// Resolve once the next dispatch is allowed
    async fn wait(&mut self);
}

// ============================================================================
// Fixed Interval
// ============================================================================

/// Keeps at least `interval` between consecutive dispatches
///
/// The first dispatch goes out immediately.
#[derive(Debug, Clone)]
pub struct FixedIntervalPacer {
    interval: Duration,
    last: Option<Instant>,
}

impl FixedIntervalPacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Pacer for a "requests per window" budget
    pub fn from_budget(budget: RateBudget) -> Self {
        Self::new(budget.interval())
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[async_trait]
impl Pacer for FixedIntervalPacer {
    async fn wait(&mut self) {
        if let Some(last) = self.last {
            let next = last + self.interval;
            if next > Instant::now() {
                trace!(wait_ms = (next - Instant::now()).as_millis() as u64, "Pacing");
                sleep_until(next).await;
            }
        }
        self.last = Some(Instant::now());
    }
}

// ============================================================================
// No Pacing
// ============================================================================

/// Dispatches as fast as the executor allows
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacer;

#[async_trait]
impl Pacer for NoPacer {
    async fn wait(&mut self) {}
}

// ============================================================================
// Token Bucket
// ============================================================================

/// Configuration for token bucket pacing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Time to replenish one token
    pub period: Duration,
    /// Burst size (max tokens in bucket)
    pub burst_size: u32,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self::from_budget(RateBudget::default(), 1)
    }
}

impl RateLimiterConfig {
    /// Create a new rate limiter config
    pub fn new(period: Duration, burst_size: u32) -> Self {
        Self { period, burst_size }
    }

    /// Replenish at the budget's rate, allowing `burst_size` back-to-back calls
    pub fn from_budget(budget: RateBudget, burst_size: u32) -> Self {
        Self::new(budget.interval(), burst_size)
    }

    /// Create config for `requests_per_second` with an equal burst
    pub fn per_second(requests_per_second: u32) -> Self {
        let rps = requests_per_second.max(1);
        Self::new(Duration::from_secs(1) / rps, rps)
    }
}

/// Token bucket pacer backed by governor
#[derive(Clone)]
pub struct TokenBucketPacer {
    limiter: Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
}

impl TokenBucketPacer {
    /// Create a new token bucket with the given config
    pub fn new(config: &RateLimiterConfig) -> Self {
        let burst = NonZeroU32::new(config.burst_size).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(config.period)
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::MAX))
            .allow_burst(burst);

        Self {
            limiter: Arc::new(Governor::direct(quota)),
        }
    }
}

#[async_trait]
impl Pacer for TokenBucketPacer {
    async fn wait(&mut self) {
        self.limiter.until_ready().await;
    }
}

impl std::fmt::Debug for TokenBucketPacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenBucketPacer").finish()
    }
}

#[cfg(test)]
mod pacing_tests {
    use super::*;

    #[test]
    fn test_rate_limiter_config_default() {
        let config = RateLimiterConfig::default();
        assert_eq!(config.period, Duration::from_millis(600));
        assert_eq!(config.burst_size, 1);
    }

    #[test]
    fn test_rate_limiter_config_per_second() {
        let config = RateLimiterConfig::per_second(10);
        assert_eq!(config.period, Duration::from_millis(100));
        assert_eq!(config.burst_size, 10);

        let config = RateLimiterConfig::per_second(0);
        assert_eq!(config.period, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_token_bucket_allows_burst() {
        let mut pacer = TokenBucketPacer::new(&RateLimiterConfig::new(Duration::from_secs(60), 5));

        for _ in 0..5 {
            tokio::time::timeout(Duration::from_secs(1), pacer.wait())
                .await
                .expect("burst token should be available");
        }
        // bucket is empty; the next token is a minute away
        let blocked = tokio::time::timeout(Duration::from_millis(50), pacer.wait()).await;
        assert!(blocked.is_err());
    }

    #[tokio::test]
    async fn test_token_bucket_refills() {
        let mut pacer = TokenBucketPacer::new(&RateLimiterConfig::per_second(100));
        for _ in 0..110 {
            tokio::time::timeout(Duration::from_secs(2), pacer.wait())
                .await
                .expect("pacer should refill at 100/s");
        }
    }

    #[tokio::test]
    async fn test_token_bucket_zero_period_does_not_block() {
        let mut pacer = TokenBucketPacer::new(&RateLimiterConfig::new(Duration::ZERO, 1));
        for _ in 0..50 {
            pacer.wait().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_interval_first_dispatch_is_immediate() {
        let mut pacer = FixedIntervalPacer::new(Duration::from_secs(5));
        let start = Instant::now();
        pacer.wait().await;
        assert_eq!(Instant::now(), start);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_interval_spacing() {
        let mut pacer = FixedIntervalPacer::from_budget(RateBudget::new(4, Duration::from_secs(2)));
        assert_eq!(pacer.interval(), Duration::from_millis(500));

        pacer.wait().await;
        let first = Instant::now();
        pacer.wait().await;
        let second = Instant::now();
        pacer.wait().await;
        let third = Instant::now();

        assert!(second - first >= Duration::from_millis(500));
        assert!(third - second >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_interval_no_wait_after_idle() {
        let mut pacer = FixedIntervalPacer::new(Duration::from_millis(100));
        pacer.wait().await;
        tokio::time::sleep(Duration::from_millis(250)).await;

        let before = Instant::now();
        pacer.wait().await;
        assert_eq!(Instant::now(), before);
    }
}
