//! End-to-end behaviour of the query cache against scripted fetch functions.

use std::time::Duration;

use proptest::prelude::*;
use reparagym_query::{FetchError, Fingerprint, QueryCache, QueryConfig, QueryError, QueryState, RetryDelay, RetryPolicy};
use reparagym_test_utils::assertions::{assert_failed_after, assert_fresh, assert_stale, assert_status};
use reparagym_test_utils::generators::{arb_client_error_status, arb_retryable_status};
use reparagym_test_utils::{fixtures, ScriptedFetcher};
use tokio::time::{advance, Instant};

fn fp(key: &str) -> Fingerprint {
    Fingerprint::from(key)
}

/// Yield until the fetch for `key` has finished.
async fn until_settled(cache: &QueryCache<u32>, key: &str) {
    for _ in 0..100 {
        if cache.peek(&fp(key)).is_some_and(|state| state.is_settled()) {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("{key} never settled");
}

fn paused_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .expect("runtime")
}

// ============================================================================
// DE-DUPLICATION
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_concurrent_reads_share_one_fetch() {
    let cache = fixtures::cache::<Vec<&'static str>>();
    let fetcher = ScriptedFetcher::ok(vec!["banda", "motor"]).with_delay(Duration::from_millis(100));

    let first = cache.get(fp("cat:cardio"), fetcher.clone());
    assert!(first.is_pending());

    advance(Duration::from_millis(50)).await;
    let second = cache.get(fp("cat:cardio"), fetcher.clone());
    assert!(second.is_pending());

    let value = cache.fetch(fp("cat:cardio"), fetcher.clone()).await.unwrap();
    assert_eq!(value, vec!["banda", "motor"]);
    assert_eq!(fetcher.calls(), 1);
    assert_eq!(cache.stats().deduplicated, 2);
}

#[tokio::test(start_paused = true)]
async fn test_many_awaiting_readers_see_same_result() {
    let cache = fixtures::cache::<u32>();
    let fetcher = ScriptedFetcher::ok(42).with_delay(Duration::from_millis(100));

    let mut waiters = Vec::new();
    for _ in 0..8 {
        let cache = cache.clone();
        let fetcher = fetcher.clone();
        waiters.push(tokio::spawn(async move { cache.fetch(fp("cat:fuerza"), fetcher).await }));
    }
    for waiter in waiters {
        assert_eq!(waiter.await.unwrap().unwrap(), 42);
    }
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_distinct_fingerprints_fetch_independently() {
    let cache = fixtures::cache::<u32>();
    let cardio = ScriptedFetcher::ok(1);
    let fuerza = ScriptedFetcher::ok(2);

    assert_eq!(cache.fetch(fp("cat:cardio"), cardio.clone()).await.unwrap(), 1);
    assert_eq!(cache.fetch(fp("cat:fuerza"), fuerza.clone()).await.unwrap(), 2);
    assert_eq!((cardio.calls(), fuerza.calls()), (1, 1));
    assert_eq!(cache.len(), 2);
}

// ============================================================================
// STALENESS
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_staleness_boundary() {
    let cache = fixtures::cache::<u32>();
    let fetcher = ScriptedFetcher::ok(1).then(Ok(1)).then(Ok(2));

    cache.fetch(fp("cat:cables"), fetcher.clone()).await.unwrap();
    advance(Duration::from_millis(59_999)).await;
    assert_fresh(&cache.get(fp("cat:cables"), fetcher.clone()), &1);
    assert_eq!(fetcher.calls(), 1);

    advance(Duration::from_millis(1)).await;
    assert_stale(&cache.get(fp("cat:cables"), fetcher.clone()), &1);
    let refreshed = cache.fetch(fp("cat:cables"), fetcher.clone()).await.unwrap();
    assert_eq!(refreshed, 2);
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_failed_refresh_keeps_previous_value() {
    let cache = QueryCache::new(fixtures::no_retry_config());
    let fetcher = ScriptedFetcher::<u32>::failing(FetchError::status(503, "mantenimiento")).then(Ok(9u32));

    cache.fetch(fp("cat:electronicos"), fetcher.clone()).await.unwrap();
    advance(Duration::from_secs(61)).await;

    let err = cache.fetch(fp("cat:electronicos"), fetcher.clone()).await;
    assert_status(&err, 503);

    let state = cache.peek(&fp("cat:electronicos")).unwrap();
    assert!(state.is_error());
    assert_eq!(state.value(), Some(&9));
}

#[tokio::test(start_paused = true)]
async fn test_invalidation_refetches_observed_entry() {
    let cache = fixtures::cache::<u32>();
    let fetcher = ScriptedFetcher::ok(2).then(Ok(1));

    let mut observer = cache.observe(fp("products?category=cardio"), fetcher.clone());
    assert_eq!(observer.settled().await.unwrap(), 1);

    assert!(cache.invalidate(&fp("products?category=cardio")));
    assert!(observer.current().is_fetching());

    assert_eq!(observer.settled().await.unwrap(), 2);
    assert_eq!(
        observer.current(),
        QueryState::Success {
            value: 2,
            is_stale: false,
            is_fetching: false
        }
    );
    assert_eq!(fetcher.calls(), 2);
}

// ============================================================================
// FAILURE AND RETRY
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_not_found_fails_fast() {
    let cache = fixtures::cache::<u32>();
    let fetcher = ScriptedFetcher::<u32>::failing(FetchError::status(404, "Category not found"));

    let result = cache.fetch(fp("cat:fuerza"), fetcher.clone()).await;
    assert_failed_after(&result, 1);
    assert_status(&result, 404);
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_get_reports_client_error_after_one_invocation() {
    let cache = fixtures::cache::<u32>();
    let fetcher = ScriptedFetcher::<u32>::failing(FetchError::status(404, "Category not found"));

    assert!(cache.get(fp("cat:fuerza"), fetcher.clone()).is_pending());
    until_settled(&cache, "cat:fuerza").await;
    assert_eq!(fetcher.calls(), 1);

    let state = cache.get(fp("cat:fuerza"), fetcher.clone());
    assert!(state.is_error());
    assert_eq!(state.error().and_then(QueryError::status_code), Some(404));
    assert_eq!(state.value(), None);
    assert!(state.is_fetching());

    let polled = cache.get(fp("cat:fuerza"), fetcher.clone());
    assert!(polled.is_error());

    until_settled(&cache, "cat:fuerza").await;
    assert_eq!(fetcher.calls(), 2);
    assert!(cache.peek(&fp("cat:fuerza")).unwrap().is_error());
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_retries_reach_every_observer() {
    let cache = fixtures::cache::<u32>();
    let fetcher = ScriptedFetcher::<u32>::failing(FetchError::status(503, "mantenimiento"))
        .with_delay(Duration::from_millis(100));

    let mut first = cache.observe(fp("cat:cables"), fetcher.clone());
    let second = cache.observe(fp("cat:cables"), fetcher.clone());
    assert!(first.current().is_pending());
    assert!(second.current().is_pending());

    assert_failed_after(&first.settled().await, 4);
    for observer in [&first, &second] {
        let state = observer.current();
        assert!(state.is_error());
        assert!(state.is_settled());
        assert_eq!(state.error().and_then(QueryError::status_code), Some(503));
    }
    assert_eq!(fetcher.calls(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_transport_error_recovers_within_budget() {
    let cache = fixtures::cache::<u32>();
    let fetcher = ScriptedFetcher::ok(5)
        .then(Err(FetchError::transport("connection reset")))
        .then(Err(FetchError::transport("connection reset")));

    assert_eq!(cache.fetch(fp("cat:cardio"), fetcher.clone()).await.unwrap(), 5);
    assert_eq!(fetcher.calls(), 3);
    assert_eq!(cache.stats().retries, 2);
}

#[tokio::test(start_paused = true)]
async fn test_decode_error_uses_full_retry_budget() {
    let cache = fixtures::cache::<u32>();
    let fetcher = ScriptedFetcher::<u32>::failing(FetchError::decode("expected `products`"));

    let result = cache.fetch(fp("cat:cardio"), fetcher.clone()).await;
    assert_failed_after(&result, 4);
    assert_eq!(fetcher.calls(), 4);
    assert_eq!(cache.stats().retries, 3);
}

#[tokio::test(start_paused = true)]
async fn test_exponential_backoff_spaces_attempts() {
    let config = QueryConfig::default().with_retry(RetryPolicy::default().with_delay(RetryDelay::Exponential {
        initial: Duration::from_millis(100),
        max: Duration::from_millis(1_000),
        multiplier: 2.0,
    }));
    let cache = QueryCache::<u32>::new(config);
    let fetcher = ScriptedFetcher::<u32>::failing(FetchError::status(500, "boom"));

    let start = Instant::now();
    let result = cache.fetch(fp("cat:cables"), fetcher.clone()).await;
    assert_failed_after(&result, 4);
    // 100 + 200 + 400
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(699) && elapsed <= Duration::from_millis(701));
}

#[tokio::test(start_paused = true)]
async fn test_mutation_is_never_retried_or_cached() {
    let cache = fixtures::cache::<u32>();
    let fetcher = ScriptedFetcher::<u32>::failing(FetchError::status(500, "boom"));

    let result = cache.mutate(|| async { reparagym_query::QueryFetcher::fetch(&fetcher).await }).await;
    assert!(matches!(result, Err(QueryError::MutationFailed(_))));
    assert_eq!(fetcher.calls(), 1);
    assert!(cache.is_empty());
}

// ============================================================================
// GARBAGE COLLECTION
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_expired_entry_is_refetched() {
    let cache = fixtures::cache::<u32>();
    let fetcher = ScriptedFetcher::ok(2).then(Ok(1));

    cache.fetch(fp("cat:cables"), fetcher.clone()).await.unwrap();
    advance(Duration::from_millis(600_000)).await;
    assert!(cache.contains(&fp("cat:cables")));

    advance(Duration::from_millis(1)).await;
    assert!(!cache.contains(&fp("cat:cables")));

    assert_eq!(cache.fetch(fp("cat:cables"), fetcher.clone()).await.unwrap(), 2);
    assert_eq!(fetcher.calls(), 2);
    assert_eq!(cache.stats().evictions, 1);
}

#[tokio::test(start_paused = true)]
async fn test_result_lands_after_observers_leave() {
    let cache = fixtures::cache::<u32>();
    let fetcher = ScriptedFetcher::ok(3).with_delay(Duration::from_millis(100));

    drop(cache.observe(fp("cat:cardio"), fetcher.clone()));
    tokio::time::sleep(Duration::from_millis(150)).await;

    assert_fresh(&cache.peek(&fp("cat:cardio")).unwrap(), &3);
}

#[tokio::test(start_paused = true)]
async fn test_clear_discards_late_results() {
    let cache = fixtures::cache::<u32>();
    let fetcher = ScriptedFetcher::ok(3).with_delay(Duration::from_millis(100));

    drop(cache.observe(fp("cat:cardio"), fetcher.clone()));
    cache.clear();
    tokio::time::sleep(Duration::from_millis(150)).await;

    assert!(cache.is_empty());
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_client_errors_invoke_fetch_once(status in arb_client_error_status()) {
        let rt = paused_runtime();
        let calls = rt.block_on(async {
            let cache = fixtures::cache::<u32>();
            let fetcher = ScriptedFetcher::<u32>::failing(FetchError::status(status, ""));
            let result = cache.fetch(fp("cat:fuerza"), fetcher.clone()).await;
            assert_status(&result, status);
            fetcher.calls()
        });
        prop_assert_eq!(calls, 1);
    }

    #[test]
    fn prop_retryable_errors_use_full_budget(status in arb_retryable_status(), max_retries in 0u32..6) {
        let rt = paused_runtime();
        let calls = rt.block_on(async {
            let config = QueryConfig::default().with_retry(RetryPolicy::default().with_max_retries(max_retries));
            let cache = QueryCache::<u32>::new(config);
            let fetcher = ScriptedFetcher::<u32>::failing(FetchError::status(status, ""));
            let result = cache.fetch(fp("cat:cardio"), fetcher.clone()).await;
            assert_failed_after(&result, max_retries + 1);
            fetcher.calls()
        });
        prop_assert_eq!(calls, max_retries as usize + 1);
    }

    #[test]
    fn prop_fresh_reads_never_fetch(stale_ms in 1u64..120_000, reads in 1usize..10) {
        let rt = paused_runtime();
        let calls = rt.block_on(async {
            let config = QueryConfig::default().with_stale_time(Duration::from_millis(stale_ms));
            let cache = QueryCache::<u32>::new(config);
            let fetcher = ScriptedFetcher::ok(1);
            cache.fetch(fp("cat:cables"), fetcher.clone()).await.unwrap();
            let step = Duration::from_millis(stale_ms.saturating_sub(1) / reads as u64);
            for _ in 0..reads {
                advance(step).await;
                assert!(cache.get(fp("cat:cables"), fetcher.clone()).is_success());
            }
            fetcher.calls()
        });
        prop_assert_eq!(calls, 1);
    }

    #[test]
    fn prop_observed_entries_survive_any_gc(gc_ms in 1u64..1_000_000, extra_ms in 1u64..1_000_000) {
        let rt = paused_runtime();
        let (kept, collected) = rt.block_on(async {
            let config = QueryConfig::default().with_gc_time(Duration::from_millis(gc_ms));
            let cache = QueryCache::<u32>::new(config);
            let mut observer = cache.observe(fp("cat:cardio"), ScriptedFetcher::ok(1));
            observer.settled().await.unwrap();

            advance(Duration::from_millis(gc_ms + extra_ms)).await;
            let kept = cache.collect_garbage();
            drop(observer);
            advance(Duration::from_millis(gc_ms + 1)).await;
            (kept, cache.collect_garbage())
        });
        prop_assert_eq!(kept, 0);
        prop_assert_eq!(collected, 1);
    }
}
