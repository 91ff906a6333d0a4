//! Cache usage counters.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics about cache usage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Reads served from a fresh entry without fetching.
    pub hits: u64,
    /// Reads that found a value but had to refresh it in the background.
    pub stale_hits: u64,
    /// Reads that found no value.
    pub misses: u64,
    /// Reads that joined a fetch already in flight.
    pub deduplicated: u64,
    /// Fetch function invocations, retries included.
    pub fetches: u64,
    /// Retries after a failed attempt.
    pub retries: u64,
    /// Fetches that ended in an error after exhausting retries.
    pub failures: u64,
    /// Entries removed by garbage collection.
    pub evictions: u64,
    /// Mutations attempted.
    pub mutations: u64,
    /// Mutations that failed.
    pub mutation_failures: u64,
    /// Number of entries currently in cache.
    pub entry_count: u64,
    /// Entries with at least one observer.
    pub observed_entries: u64,
    /// Entries with a fetch in flight.
    pub in_flight: u64,
}

impl CacheStats {
    /// Calculate the hit rate (0.0 to 1.0). Stale hits count as hits.
    pub fn hit_rate(&self) -> f64 {
        let served = self.hits + self.stale_hits;
        let total = served + self.misses;
        if total == 0 {
            0.0
        } else {
            served as f64 / total as f64
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    hits: AtomicU64,
    stale_hits: AtomicU64,
    misses: AtomicU64,
    deduplicated: AtomicU64,
    fetches: AtomicU64,
    retries: AtomicU64,
    failures: AtomicU64,
    evictions: AtomicU64,
    mutations: AtomicU64,
    mutation_failures: AtomicU64,
}

macro_rules! counter {
    ($name:ident, $field:ident) => {
        pub(crate) fn $name(&self) {
            self.$field.fetch_add(1, Ordering::Relaxed);
        }
    };
}

impl StatsRecorder {
    counter!(hit, hits);
    counter!(stale_hit, stale_hits);
    counter!(miss, misses);
    counter!(deduplicate, deduplicated);
    counter!(fetch, fetches);
    counter!(retry, retries);
    counter!(failure, failures);
    counter!(mutation, mutations);
    counter!(mutation_failure, mutation_failures);

    pub(crate) fn evict(&self, count: u64) {
        self.evictions.fetch_add(count, Ordering::Relaxed);
    }

    /// Combine the counters with entry-level gauges.
    pub(crate) fn snapshot(&self, entry_count: u64, observed_entries: u64, in_flight: u64) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            stale_hits: self.stale_hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            deduplicated: self.deduplicated.load(Ordering::Relaxed),
            fetches: self.fetches.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            mutations: self.mutations.load(Ordering::Relaxed),
            mutation_failures: self.mutation_failures.load(Ordering::Relaxed),
            entry_count,
            observed_entries,
            in_flight,
        }
    }
}
