//! Fetch functions injected into the cache.
//!
//! The cache never talks to the network itself. Every read is backed by a
//! [`QueryFetcher`] supplied by the caller; async closures returning
//! `Result<V, FetchError>` implement the trait directly.

use async_trait::async_trait;
use reparagym_core::FetchError;
use std::future::Future;

/// Source of values for one fingerprint.
///
/// Implementations must be cheap to call repeatedly: the cache invokes
/// `fetch` once per attempt, including retries.
#[async_trait]
pub trait QueryFetcher<V>: Send + Sync {
    async fn fetch(&self) -> Result<V, FetchError>;
}

#[async_trait]
impl<V, F, Fut> QueryFetcher<V> for F
where
    V: Send + 'static,
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<V, FetchError>> + Send,
{
    async fn fetch(&self) -> Result<V, FetchError> {
        (self)().await
    }
}
