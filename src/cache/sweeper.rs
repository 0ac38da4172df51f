// Periodic expiry sweep for the adaptive cache
// Author: kelexine (https://github.com/kelexine)

use super::manager::AdaptiveCache;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Shortest sweep period accepted; smaller values (including zero) are raised to it.
pub const MIN_CLEANUP_PERIOD: Duration = Duration::from_millis(1);

/// Spawn a task that calls [`AdaptiveCache::cleanup`] every `period`.
///
/// The first sweep happens one full period after spawning. The task runs
/// until the returned handle is aborted. `period` is clamped to
/// [`MIN_CLEANUP_PERIOD`].
pub fn spawn_cleanup_task<T>(cache: Arc<AdaptiveCache<T>>, period: Duration) -> JoinHandle<()>
where
    T: Clone + Send + Sync + 'static,
{
    let period = period.max(MIN_CLEANUP_PERIOD);
    info!("Starting cache cleanup every {:?}", period);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let removed = cache.cleanup();
            let remaining = cache.len();
            crate::metrics::record_cache_evictions(removed);
            crate::metrics::update_cache_entries(remaining);
            debug!(
                "Cache sweep removed {} entries, {} remain",
                removed, remaining
            );
        }
    })
}
