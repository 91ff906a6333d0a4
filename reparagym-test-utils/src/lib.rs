//! Reparagym Test Utilities
//!
//! Shared test infrastructure for the Reparagym workspace:
//! - Scripted fetch functions that count their invocations
//! - Proptest generators for fingerprints, statuses and query configs
//! - Fixtures shaped like commerce API responses
//! - Assertions for query outcomes

pub use reparagym_core::{
    FailureClass, FetchError, Fingerprint, QueryConfig, QueryError, RetryDelay, RetryPolicy,
};
pub use reparagym_query::{QueryCache, QueryFetcher, QueryState};

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

// ============================================================================
// MOCK FETCHERS
// ============================================================================

/// Fetch function with a scripted sequence of outcomes.
///
/// Each invocation pops the next scripted result; once the script runs out
/// the fallback result is returned forever. Clones share the script and the
/// invocation counter, so a test can hand one clone to the cache and keep
/// another to inspect.
#[derive(Debug, Clone)]
pub struct ScriptedFetcher<V> {
    script: Arc<Mutex<VecDeque<Result<V, FetchError>>>>,
    fallback: Result<V, FetchError>,
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl<V> ScriptedFetcher<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Always succeed with `value`.
    pub fn ok(value: V) -> Self {
        Self::with_fallback(Ok(value))
    }

    /// Always fail with `error`.
    pub fn failing(error: FetchError) -> Self {
        Self::with_fallback(Err(error))
    }

    pub fn with_fallback(fallback: Result<V, FetchError>) -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            fallback,
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Queue `result` ahead of the fallback.
    pub fn then(self, result: Result<V, FetchError>) -> Self {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(result);
        self
    }

    /// Sleep for `delay` (on the Tokio clock) before every result.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of times the cache has invoked this fetch function.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<V> QueryFetcher<V> for ScriptedFetcher<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn fetch(&self) -> Result<V, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for cache inputs.

    use super::*;
    use proptest::prelude::*;

    /// Category handles served by the storefront.
    pub const CATEGORY_HANDLES: [&str; 4] = ["cardio", "fuerza", "electronicos", "cables"];

    /// Generate a fingerprint such as `cat:cardio` or
    /// `products?category=fuerza&limit=12&offset=24`.
    pub fn arb_fingerprint() -> impl Strategy<Value = Fingerprint> {
        prop_oneof![
            prop::sample::select(CATEGORY_HANDLES.to_vec())
                .prop_map(|handle| Fingerprint::new(format!("cat:{handle}"))),
            (
                prop::sample::select(CATEGORY_HANDLES.to_vec()),
                1u32..=50,
                0u32..10,
            )
                .prop_map(|(handle, limit, page)| {
                    Fingerprint::builder("products")
                        .param("category", handle)
                        .param("limit", limit)
                        .param("offset", page * limit)
                        .build()
                }),
        ]
    }

    /// Generate a client error status other than 429.
    pub fn arb_client_error_status() -> impl Strategy<Value = u16> {
        (400u16..500).prop_filter("429 is retryable", |status| *status != 429)
    }

    /// Generate a status the retry policy treats as transient.
    pub fn arb_retryable_status() -> impl Strategy<Value = u16> {
        prop_oneof![Just(429u16), 500u16..600]
    }

    /// Generate any failure the commerce API can produce.
    pub fn arb_fetch_error() -> impl Strategy<Value = FetchError> {
        prop_oneof![
            (400u16..600).prop_map(|status| FetchError::status(status, "upstream error")),
            "[a-z ]{1,24}".prop_map(|reason| FetchError::transport(reason)),
            "[a-z ]{1,24}".prop_map(|reason| FetchError::decode(reason)),
        ]
    }

    /// Generate a retry policy with immediate retries.
    pub fn arb_retry_policy() -> impl Strategy<Value = RetryPolicy> {
        (0u32..6).prop_map(|max_retries| RetryPolicy::default().with_max_retries(max_retries))
    }

    /// Generate a query config with windows between 1 ms and 20 minutes.
    pub fn arb_query_config() -> impl Strategy<Value = QueryConfig> {
        (1u64..=1_200_000, 1u64..=1_200_000, arb_retry_policy()).prop_map(
            |(stale_ms, gc_ms, retry)| {
                QueryConfig::default()
                    .with_stale_time(Duration::from_millis(stale_ms))
                    .with_gc_time(Duration::from_millis(gc_ms))
                    .with_retry(retry)
            },
        )
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Canned inputs shaped like the commerce API.

    use super::*;
    use serde_json::{json, Value};

    /// Config with the documented defaults: 60 s stale, 600 s gc, 3 retries.
    pub fn default_config() -> QueryConfig {
        QueryConfig::default()
    }

    /// Config that never retries.
    pub fn no_retry_config() -> QueryConfig {
        QueryConfig::default().with_retry(RetryPolicy::never())
    }

    /// A cache with the default config.
    pub fn cache<V>() -> QueryCache<V>
    where
        V: Clone + Send + Sync + 'static,
    {
        QueryCache::new(default_config())
    }

    /// One product as returned by `GET /store/products`.
    pub fn product_json(id: &str, title: &str, handle: &str) -> Value {
        json!({
            "id": id,
            "title": title,
            "handle": handle,
            "subtitle": null,
            "description": format!("{title} original"),
            "thumbnail": format!("https://cdn.reparagymstore.com/{handle}.jpg"),
            "variants": [
                {
                    "id": format!("variant_{id}"),
                    "title": "Default",
                    "sku": handle.to_uppercase(),
                    "calculated_price": {
                        "calculated_amount": 1250,
                        "currency_code": "mxn"
                    }
                }
            ]
        })
    }

    /// A product list page as returned by `GET /store/products`.
    pub fn product_page_json(products: Vec<Value>, offset: u32, limit: u32) -> Value {
        let count = products.len();
        json!({
            "products": products,
            "count": count,
            "offset": offset,
            "limit": limit
        })
    }

    /// Two cardio parts.
    pub fn cardio_page_json() -> Value {
        product_page_json(
            vec![
                product_json("prod_01", "Banda para caminadora", "banda-caminadora"),
                product_json("prod_02", "Motor DC 2.5 HP", "motor-dc-25"),
            ],
            0,
            12,
        )
    }

    /// Commerce API error body.
    pub fn error_json(kind: &str, message: &str) -> Value {
        json!({ "type": kind, "message": message })
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions for query outcomes.

    use super::*;

    /// Assert a fetch failed after exactly `attempts` attempts.
    pub fn assert_failed_after<V: std::fmt::Debug>(result: &Result<V, QueryError>, attempts: u32) {
        match result {
            Err(QueryError::FetchFailed { attempts: actual, .. }) => assert_eq!(
                *actual, attempts,
                "expected failure after {attempts} attempts, got {actual}"
            ),
            other => panic!("expected FetchFailed, got {other:?}"),
        }
    }

    /// Assert a query failed with the given upstream status.
    pub fn assert_status<V: std::fmt::Debug>(result: &Result<V, QueryError>, status: u16) {
        match result {
            Err(err) => assert_eq!(err.status_code(), Some(status), "unexpected error {err:?}"),
            Ok(value) => panic!("expected status {status}, got Ok({value:?})"),
        }
    }

    /// Assert a state carries `value` and is not stale.
    pub fn assert_fresh<V: PartialEq + std::fmt::Debug>(state: &QueryState<V>, value: &V) {
        match state {
            QueryState::Success {
                value: actual,
                is_stale: false,
                ..
            } => assert_eq!(actual, value),
            other => panic!("expected fresh value, got {other:?}"),
        }
    }

    /// Assert a state carries `value` but is stale.
    pub fn assert_stale<V: PartialEq + std::fmt::Debug>(state: &QueryState<V>, value: &V) {
        match state {
            QueryState::Success {
                value: actual,
                is_stale: true,
                ..
            } => assert_eq!(actual, value),
            other => panic!("expected stale value, got {other:?}"),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
