//! Reparagym Query - Query Cache Coordinator
//!
//! Shared cache that sits between the storefront and the commerce API.
//! Reads are keyed by [`Fingerprint`](reparagym_core::Fingerprint) and
//! follow stale-while-revalidate semantics:
//!
//! - a value younger than the staleness window is served without fetching
//! - an older value is served while a background refresh runs
//! - concurrent reads of one fingerprint share a single fetch
//! - failed reads are retried per [`RetryPolicy`](reparagym_core::RetryPolicy),
//!   except client errors other than 429
//! - unobserved entries are dropped after the garbage-collection horizon
//!
//! Writes go through [`QueryCache::mutate`] and are attempted exactly once.

pub mod cache;
pub mod fetcher;
pub mod gc;
pub mod observer;
pub mod state;
pub mod stats;

mod entry;

pub use cache::QueryCache;
pub use fetcher::QueryFetcher;
pub use gc::GcHandle;
pub use observer::QueryObserver;
pub use state::QueryState;
pub use stats::CacheStats;

// Re-exported for callers that only depend on this crate.
pub use reparagym_core::{FetchError, Fingerprint, QueryConfig, QueryError, RetryDelay, RetryPolicy};
