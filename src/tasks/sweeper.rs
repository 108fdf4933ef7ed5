//! Expiry Sweep Task
//!
//! Background task that periodically removes TTL-expired entries.

use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::cache::CacheStore;

/// Sweep interval used when the builder does not override it.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5);

/// Spawns the periodic expiry sweep on the configured executor.
///
/// Each pass takes the store's exclusive lock once, so the scan and the
/// removals are a single critical section: an entry refreshed concurrently
/// is re-evaluated against its current creation time, never evicted on a
/// stale observation.
///
/// The returned handle is aborted when the owning engine drops.
pub(crate) fn spawn_sweep_task<K, V>(
    store: Arc<Mutex<CacheStore<K, V>>>,
    ttl: Duration,
    interval: Duration,
    handle: &Handle,
) -> JoinHandle<()>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Send + 'static,
{
    handle.spawn(async move {
        debug!(
            interval_ms = interval.as_millis() as u64,
            ttl_ms = ttl.as_millis() as u64,
            "expiry sweep task started"
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut store = store.lock();
                store.sweep_expired(ttl, Instant::now())
            };

            if removed > 0 {
                debug!(removed, "expiry sweep removed entries");
            } else {
                trace!("expiry sweep found no expired entries");
            }
        }
    })
}
