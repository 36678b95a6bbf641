//! Rate-limited request queue
//!
//! A [`Queue`] owns one background worker. The worker takes [`Request`]s
//! from a bounded inbound channel, waits on its [`Pacer`], runs the request
//! through the injected [`Executor`], and publishes one [`Response`] per
//! request on a bounded outbound channel.
//!
//! # Overview
//!
//! - One worker per queue, so responses come out in submission order
//! - Pacing is pluggable: fixed interval (default), token bucket, or none
//! - Executor errors are surfaced in the response, never retried
//! - The worker stops when the inbound side closes, the outbound receiver
//!   is dropped, or its cancellation token fires
//!
//! The queue knows nothing about pagination; see [`crate::pagination`].
//!
//! [`Request`]: crate::request::Request
//! [`Response`]: crate::request::Response
//! [`Executor`]: crate::http::Executor

mod pacing;
mod types;
mod worker;

pub use pacing::{FixedIntervalPacer, NoPacer, Pacer, RateLimiterConfig, TokenBucketPacer};
pub use types::{QueueConfig, DEFAULT_CONTINUATION_PARAM};
pub use worker::{Queue, QueueHandle};
