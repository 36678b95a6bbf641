//! HTTP execution module
//!
//! The queue does not know how a request is performed. It calls an
//! [`Executor`], and this module provides the trait plus a reqwest-backed
//! implementation.
//!
//! # Features
//!
//! - **Executor trait**: any async `Request -> Result<P>` capability
//! - **HttpExecutor**: reqwest client with default headers, user agent and timeout
//! - **Error mapping**: non-2xx, 429 and decode failures become [`crate::Error`] values
//!
//! Nothing here retries; retry policy belongs to the caller.

mod client;
mod executor;

pub use client::{HttpExecutor, HttpExecutorConfig, HttpExecutorConfigBuilder};
pub use executor::Executor;
