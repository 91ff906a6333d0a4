//! Per-fingerprint cache entry.

use std::sync::Arc;
use std::time::Duration;

use reparagym_core::QueryError;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::fetcher::QueryFetcher;
use crate::state::QueryState;

/// Identifies one incarnation of an entry, or one fetch.
pub(crate) type Generation = u64;

pub(crate) struct QueryEntry<V> {
    /// Distinguishes this entry from a later one under the same fingerprint.
    pub(crate) generation: Generation,
    pub(crate) data: Option<V>,
    pub(crate) fetched_at: Option<Instant>,
    pub(crate) error: Option<QueryError>,
    /// Set by invalidation, cleared when the next fetch starts.
    pub(crate) invalidated: bool,
    pub(crate) observers: usize,
    /// Start of the garbage-collection window.
    pub(crate) last_touched: Instant,
    /// Fetch currently authoritative for this entry.
    pub(crate) in_flight: Option<Generation>,
    /// Most recently supplied fetch function, used for refetch on invalidation.
    pub(crate) fetcher: Arc<dyn QueryFetcher<V>>,
    state_tx: watch::Sender<QueryState<V>>,
}

impl<V> QueryEntry<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(generation: Generation, fetcher: Arc<dyn QueryFetcher<V>>, now: Instant) -> Self {
        let (state_tx, _) = watch::channel(QueryState::Pending);
        Self {
            generation,
            data: None,
            fetched_at: None,
            error: None,
            invalidated: false,
            observers: 0,
            last_touched: now,
            in_flight: None,
            fetcher,
            state_tx,
        }
    }

    pub(crate) fn is_stale(&self, now: Instant, stale_time: Duration) -> bool {
        if self.invalidated {
            return true;
        }
        match self.fetched_at {
            Some(fetched_at) => now.saturating_duration_since(fetched_at) >= stale_time,
            None => true,
        }
    }

    /// Whether the next access has to go to the fetch function.
    pub(crate) fn needs_fetch(&self, now: Instant, stale_time: Duration) -> bool {
        self.in_flight.is_none()
            && (self.data.is_none() || self.error.is_some() || self.is_stale(now, stale_time))
    }

    /// Unobserved, idle and past its garbage-collection deadline.
    pub(crate) fn is_collectable(&self, now: Instant, gc_time: Duration) -> bool {
        self.observers == 0
            && self.in_flight.is_none()
            && now.saturating_duration_since(self.last_touched) > gc_time
    }

    pub(crate) fn snapshot(&self, now: Instant, stale_time: Duration) -> QueryState<V> {
        let is_fetching = self.in_flight.is_some();
        if let Some(error) = &self.error {
            return QueryState::Error {
                error: error.clone(),
                previous: self.data.clone(),
                is_fetching,
            };
        }
        if is_fetching {
            return match &self.data {
                Some(value) => QueryState::Success {
                    value: value.clone(),
                    is_stale: self.is_stale(now, stale_time),
                    is_fetching: true,
                },
                None => QueryState::Pending,
            };
        }
        match &self.data {
            Some(value) => QueryState::Success {
                value: value.clone(),
                is_stale: self.is_stale(now, stale_time),
                is_fetching: false,
            },
            None => QueryState::Pending,
        }
    }

    /// Push the current state to every observer.
    pub(crate) fn publish(&self, now: Instant, stale_time: Duration) {
        self.state_tx.send_replace(self.snapshot(now, stale_time));
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<QueryState<V>> {
        self.state_tx.subscribe()
    }
}
