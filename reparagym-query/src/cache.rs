//! The query cache coordinator.
//!
//! Mediates every read of the commerce API through a shared, time-bounded
//! cache. For each fingerprint it decides whether a cached value can be
//! served, whether a refresh is needed, and whether a failed fetch may be
//! retried. All network access goes through the caller's fetch function.
//!
//! Fetches run as spawned tasks. A fetch therefore outlives the observers
//! that triggered it: if every observer goes away before it finishes, the
//! result is still written to the cache for the next reader.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use reparagym_core::{FetchError, Fingerprint, QueryConfig, QueryError};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::entry::{Generation, QueryEntry};
use crate::fetcher::QueryFetcher;
use crate::observer::QueryObserver;
use crate::state::QueryState;
use crate::stats::{CacheStats, StatsRecorder};

/// Process-wide query cache.
///
/// Cloning is cheap and every clone shares the same entries. Reads must be
/// issued from within a Tokio runtime because fetches are spawned onto it.
///
/// # Example
///
/// ```ignore
/// let cache = QueryCache::new(QueryConfig::default());
///
/// // Non-blocking read: cached value, or Pending while the fetch runs
/// let state = cache.get("cat:cardio".into(), move || client.list(&query));
///
/// // Await a settled result
/// let page = cache.fetch("cat:cardio".into(), fetcher).await?;
/// ```
pub struct QueryCache<V> {
    pub(crate) inner: Arc<Shared<V>>,
}

pub(crate) struct Shared<V> {
    pub(crate) config: QueryConfig,
    entries: Mutex<HashMap<Fingerprint, QueryEntry<V>>>,
    generations: AtomicU64,
    pub(crate) stats: StatsRecorder,
}

impl<V> Clone for QueryCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> QueryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a new cache.
    pub fn new(config: QueryConfig) -> Self {
        Self {
            inner: Arc::new(Shared {
                config,
                entries: Mutex::new(HashMap::new()),
                generations: AtomicU64::new(1),
                stats: StatsRecorder::default(),
            }),
        }
    }

    /// Create a new cache with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(QueryConfig::default())
    }

    /// Get the cache configuration.
    pub fn config(&self) -> &QueryConfig {
        &self.inner.config
    }

    /// Read `fingerprint` without waiting.
    ///
    /// Returns the cached value if its staleness deadline has not passed.
    /// Otherwise a background refresh is started with `fetcher` (unless one
    /// is already running) and the previous value is returned while it is
    /// pending, or [`QueryState::Pending`] if there is none.
    pub fn get<F>(&self, fingerprint: Fingerprint, fetcher: F) -> QueryState<V>
    where
        F: QueryFetcher<V> + 'static,
    {
        self.observe(fingerprint, fetcher).current()
    }

    /// Register an observer for `fingerprint`, starting a fetch if needed.
    ///
    /// The entry cannot be garbage-collected while the observer is alive.
    pub fn observe<F>(&self, fingerprint: Fingerprint, fetcher: F) -> QueryObserver<V>
    where
        F: QueryFetcher<V> + 'static,
    {
        self.observe_with(fingerprint, Arc::new(fetcher))
    }

    /// Like [`QueryCache::observe`] with a shared fetch function.
    pub fn observe_with(
        &self,
        fingerprint: Fingerprint,
        fetcher: Arc<dyn QueryFetcher<V>>,
    ) -> QueryObserver<V> {
        let shared = &self.inner;
        let now = Instant::now();
        let stale_time = shared.config.stale_time;
        let mut entries = shared.lock();

        if entries
            .get(&fingerprint)
            .is_some_and(|entry| entry.is_collectable(now, shared.config.gc_time))
        {
            entries.remove(&fingerprint);
            shared.stats.evict(1);
            debug!(%fingerprint, "Evicted expired entry on access");
        }

        let entry = entries
            .entry(fingerprint.clone())
            .or_insert_with(|| QueryEntry::new(shared.next_generation(), Arc::clone(&fetcher), now));

        entry.fetcher = fetcher;
        entry.observers += 1;
        entry.last_touched = now;

        if entry.needs_fetch(now, stale_time) {
            if entry.data.is_some() {
                shared.stats.stale_hit();
            } else {
                shared.stats.miss();
            }
            shared.start_fetch(&fingerprint, entry, now);
        } else if entry.in_flight.is_some() {
            shared.stats.deduplicate();
            debug!(%fingerprint, "Joined fetch already in flight");
        } else {
            shared.stats.hit();
        }

        QueryObserver::new(
            Arc::clone(shared),
            fingerprint,
            entry.generation,
            entry.subscribe(),
        )
    }

    /// Resolve `fingerprint` to a settled value.
    ///
    /// Returns immediately for a fresh entry; otherwise joins the fetch in
    /// flight or starts one, and waits for it (retries included).
    pub async fn fetch<F>(&self, fingerprint: Fingerprint, fetcher: F) -> Result<V, QueryError>
    where
        F: QueryFetcher<V> + 'static,
    {
        let mut observer = self.observe(fingerprint, fetcher);
        observer.settled().await
    }

    /// Run a one-shot write.
    ///
    /// The mutation is attempted exactly once, never retried and never
    /// cached; its outcome goes straight back to the caller.
    pub async fn mutate<T, F, Fut>(&self, mutation: F) -> Result<T, QueryError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        self.inner.stats.mutation();
        match mutation().await {
            Ok(value) => Ok(value),
            Err(error) => {
                self.inner.stats.mutation_failure();
                warn!(error = %error, class = error.class().as_str(), "Mutation failed");
                Err(QueryError::MutationFailed(error))
            }
        }
    }

    /// Current state of `fingerprint` without registering interest or
    /// fetching. `None` when there is no live entry.
    pub fn peek(&self, fingerprint: &Fingerprint) -> Option<QueryState<V>> {
        let shared = &self.inner;
        let now = Instant::now();
        let entries = shared.lock();
        entries
            .get(fingerprint)
            .filter(|entry| !entry.is_collectable(now, shared.config.gc_time))
            .map(|entry| entry.snapshot(now, shared.config.stale_time))
    }

    /// True if a live (not yet collectable) entry exists.
    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.peek(fingerprint).is_some()
    }

    /// Mark an entry stale so its next access refreshes it. Observed
    /// entries are refreshed right away.
    ///
    /// Returns false if there was no entry.
    pub fn invalidate(&self, fingerprint: &Fingerprint) -> bool {
        self.invalidate_where(|candidate| candidate == fingerprint) > 0
    }

    /// Invalidate every entry whose fingerprint starts with `prefix`.
    pub fn invalidate_prefix(&self, prefix: &str) -> usize {
        self.invalidate_where(|candidate| candidate.starts_with(prefix))
    }

    fn invalidate_where<P>(&self, predicate: P) -> usize
    where
        P: Fn(&Fingerprint) -> bool,
    {
        let shared = &self.inner;
        let now = Instant::now();
        let mut entries = shared.lock();
        let mut invalidated = 0;

        for (fingerprint, entry) in entries.iter_mut() {
            if !predicate(fingerprint) {
                continue;
            }
            invalidated += 1;
            entry.invalidated = true;
            if entry.observers > 0 && entry.in_flight.is_none() {
                shared.start_fetch(fingerprint, entry, now);
            } else {
                entry.publish(now, shared.config.stale_time);
            }
        }

        if invalidated > 0 {
            debug!(count = invalidated, "Invalidated cache entries");
        }
        invalidated
    }

    /// Evict every unobserved entry past its garbage-collection deadline.
    pub fn collect_garbage(&self) -> usize {
        self.inner.collect_garbage()
    }

    /// Drop every entry. Fetches still in flight are discarded when they
    /// finish and observers waiting on them see [`QueryError::Abandoned`].
    pub fn clear(&self) {
        let mut entries = self.inner.lock();
        let count = entries.len();
        entries.clear();
        debug!(count, "Cleared query cache");
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        let entries = self.inner.lock();
        let entry_count = entries.len() as u64;
        let observed = entries.values().filter(|e| e.observers > 0).count() as u64;
        let in_flight = entries.values().filter(|e| e.in_flight.is_some()).count() as u64;
        self.inner.stats.snapshot(entry_count, observed, in_flight)
    }
}

impl<V> Shared<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Entries are only mutated through short critical sections that never
    /// panic mid-update, so a poisoned lock still guards consistent data.
    pub(crate) fn lock(&self) -> MutexGuard<'_, HashMap<Fingerprint, QueryEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_generation(&self) -> Generation {
        self.generations.fetch_add(1, Ordering::Relaxed)
    }

    /// Mark `entry` as fetching and spawn the fetch. Caller holds the lock.
    fn start_fetch(self: &Arc<Self>, fingerprint: &Fingerprint, entry: &mut QueryEntry<V>, now: Instant) {
        let fetch_id = self.next_generation();
        entry.in_flight = Some(fetch_id);
        entry.invalidated = false;
        entry.publish(now, self.config.stale_time);

        debug!(%fingerprint, fetch_id, "Starting fetch");

        let guard = FetchGuard {
            shared: Arc::clone(self),
            fingerprint: fingerprint.clone(),
            fetch_id,
            settled: false,
        };
        let fetcher = Arc::clone(&entry.fetcher);
        tokio::spawn(run_fetch(guard, fetcher));
    }

    /// Record the outcome of fetch `fetch_id`.
    ///
    /// Outcomes of fetches that are no longer authoritative (entry cleared
    /// or replaced) are dropped.
    fn complete(&self, fingerprint: &Fingerprint, fetch_id: Generation, outcome: Result<V, QueryError>) {
        let now = Instant::now();
        let mut entries = self.lock();
        let Some(entry) = entries.get_mut(fingerprint) else {
            debug!(%fingerprint, fetch_id, "Discarding result for removed entry");
            return;
        };
        if entry.in_flight != Some(fetch_id) {
            debug!(%fingerprint, fetch_id, "Discarding result of superseded fetch");
            return;
        }

        entry.in_flight = None;
        entry.last_touched = now;
        match outcome {
            Ok(value) => {
                entry.data = Some(value);
                entry.fetched_at = Some(now);
                entry.error = None;
            }
            Err(error) => {
                self.stats.failure();
                entry.error = Some(error);
            }
        }
        entry.publish(now, self.config.stale_time);
    }

    pub(crate) fn collect_garbage(&self) -> usize {
        let now = Instant::now();
        let gc_time = self.config.gc_time;
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_collectable(now, gc_time));
        let evicted = before - entries.len();
        if evicted > 0 {
            self.stats.evict(evicted as u64);
            debug!(evicted, remaining = entries.len(), "Collected expired entries");
        }
        evicted
    }

    /// Drop one observer of entry `generation`.
    pub(crate) fn release(&self, fingerprint: &Fingerprint, generation: Generation) {
        let mut entries = self.lock();
        if let Some(entry) = entries.get_mut(fingerprint) {
            if entry.generation == generation {
                entry.observers = entry.observers.saturating_sub(1);
                entry.last_touched = Instant::now();
            }
        }
    }

    /// Fresh snapshot of entry `generation`, if it is still live.
    pub(crate) fn snapshot(&self, fingerprint: &Fingerprint, generation: Generation) -> Option<QueryState<V>> {
        let entries = self.lock();
        entries
            .get(fingerprint)
            .filter(|entry| entry.generation == generation)
            .map(|entry| entry.snapshot(Instant::now(), self.config.stale_time))
    }
}

/// Settles a fetch exactly once, even if the fetch task panics or is
/// cancelled.
struct FetchGuard<V>
where
    V: Clone + Send + Sync + 'static,
{
    shared: Arc<Shared<V>>,
    fingerprint: Fingerprint,
    fetch_id: Generation,
    settled: bool,
}

impl<V> FetchGuard<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn settle(mut self, outcome: Result<V, QueryError>) {
        self.settled = true;
        self.shared.complete(&self.fingerprint, self.fetch_id, outcome);
    }
}

impl<V> Drop for FetchGuard<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        if !self.settled {
            warn!(fingerprint = %self.fingerprint, "Fetch ended without a result");
            let abandoned = QueryError::Abandoned {
                fingerprint: self.fingerprint.clone(),
            };
            self.shared.complete(&self.fingerprint, self.fetch_id, Err(abandoned));
        }
    }
}

/// Attempt the fetch, retrying per the configured policy.
async fn run_fetch<V>(guard: FetchGuard<V>, fetcher: Arc<dyn QueryFetcher<V>>)
where
    V: Clone + Send + Sync + 'static,
{
    let policy = guard.shared.config.retry.clone();
    let mut retries: u32 = 0;

    let outcome = loop {
        guard.shared.stats.fetch();
        match fetcher.fetch().await {
            Ok(value) => break Ok(value),
            Err(error) if policy.should_retry(retries, &error) => {
                retries += 1;
                guard.shared.stats.retry();
                debug!(
                    fingerprint = %guard.fingerprint,
                    retry = retries,
                    error = %error,
                    class = error.class().as_str(),
                    "Retrying failed fetch"
                );
                let delay = policy.delay_for(retries);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
            Err(error) => {
                warn!(
                    fingerprint = %guard.fingerprint,
                    attempts = retries + 1,
                    error = %error,
                    class = error.class().as_str(),
                    "Fetch failed"
                );
                break Err(QueryError::FetchFailed {
                    fingerprint: guard.fingerprint.clone(),
                    attempts: retries + 1,
                    source: error,
                });
            }
        }
    };

    guard.settle(outcome);
}
