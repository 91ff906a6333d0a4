//! Registered interest in one cache entry.

use std::sync::Arc;

use reparagym_core::{Fingerprint, QueryError};
use tokio::sync::watch;

use crate::cache::Shared;
use crate::entry::Generation;
use crate::state::QueryState;

/// Keeps an entry alive and receives its state changes.
///
/// While at least one observer exists the entry is exempt from garbage
/// collection. Dropping the observer releases it and restarts the entry's
/// garbage-collection window.
pub struct QueryObserver<V>
where
    V: Clone + Send + Sync + 'static,
{
    shared: Arc<Shared<V>>,
    fingerprint: Fingerprint,
    generation: Generation,
    rx: watch::Receiver<QueryState<V>>,
}

impl<V> QueryObserver<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(
        shared: Arc<Shared<V>>,
        fingerprint: Fingerprint,
        generation: Generation,
        rx: watch::Receiver<QueryState<V>>,
    ) -> Self {
        Self {
            shared,
            fingerprint,
            generation,
            rx,
        }
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// State as of now, staleness recomputed against the clock.
    pub fn current(&self) -> QueryState<V> {
        self.shared
            .snapshot(&self.fingerprint, self.generation)
            .unwrap_or_else(|| self.rx.borrow().clone())
    }

    /// Wait for the next published state.
    ///
    /// Returns `None` once the entry has been removed from the cache.
    pub async fn changed(&mut self) -> Option<QueryState<V>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Wait until no fetch is outstanding and return its outcome.
    pub async fn settled(&mut self) -> Result<V, QueryError> {
        let settled = match self.rx.wait_for(QueryState::is_settled).await {
            Ok(state) => state.clone(),
            Err(_) => {
                return Err(QueryError::Abandoned {
                    fingerprint: self.fingerprint.clone(),
                })
            }
        };

        match settled {
            QueryState::Success { value, .. } => Ok(value),
            QueryState::Error { error, .. } => Err(error),
            QueryState::Pending => Err(QueryError::Abandoned {
                fingerprint: self.fingerprint.clone(),
            }),
        }
    }
}

impl<V> Drop for QueryObserver<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        self.shared.release(&self.fingerprint, self.generation);
    }
}

impl<V> std::fmt::Debug for QueryObserver<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryObserver")
            .field("fingerprint", &self.fingerprint)
            .field("generation", &self.generation)
            .finish()
    }
}
