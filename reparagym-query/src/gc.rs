//! Periodic garbage collection.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cache::{QueryCache, Shared};

/// Handle to the background sweep started by [`QueryCache::spawn_gc`].
///
/// The sweep stops when the handle is dropped or shut down, and on its own
/// once every clone of the cache is gone.
#[derive(Debug)]
pub struct GcHandle {
    task: Option<JoinHandle<()>>,
}

impl GcHandle {
    /// Stop the sweep and wait for the task to wind down.
    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
            info!("Query cache garbage collector stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for GcHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl<V> QueryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Sweep expired entries every `interval`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn_gc(&self, interval: Duration) -> GcHandle {
        let weak = Arc::downgrade(&self.inner);
        info!(interval_ms = interval.as_millis() as u64, "Starting query cache garbage collector");
        GcHandle {
            task: Some(tokio::spawn(sweep(weak, interval))),
        }
    }
}

async fn sweep<V>(cache: Weak<Shared<V>>, interval: Duration)
where
    V: Clone + Send + Sync + 'static,
{
    let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let Some(shared) = cache.upgrade() else {
            debug!("Query cache dropped, stopping garbage collector");
            return;
        };
        shared.collect_garbage();
    }
}
