//! Executor capability

use crate::error::Result;
use crate::request::Request;
use async_trait::async_trait;
use std::sync::Arc;

/// Performs one request and decodes the payload
///
/// Implementations must tolerate being called repeatedly with requests
/// derived from the same seed (same endpoint, updated query).
#[async_trait]
pub trait Executor<P>: Send + Sync {
    /// Execute the request
    async fn execute(&self, request: &Request) -> Result<P>;
}

#[async_trait]
impl<P, E> Executor<P> for Arc<E>
where
    E: Executor<P> + ?Sized,
    P: Send + 'static,
{
    async fn execute(&self, request: &Request) -> Result<P> {
        (**self).execute(request).await
    }
}
