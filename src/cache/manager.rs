// Adaptive cache facade - the only type callers touch
// Author: kelexine (https://github.com/kelexine)

use super::clock::{Clock, SystemClock};
use super::models::{CacheConfig, CacheStats};
use super::quota::{QuotaState, QuotaStatus, QuotaTelemetry, QuotaTracker, TelemetrySource};
use super::store::{CacheEntry, EntryStore};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Response cache whose TTLs follow the upstream quota.
///
/// Callers ask [`should_use_cache`](Self::should_use_cache) before issuing an
/// upstream request; on a miss they perform the request, then
/// [`set`](Self::set) the payload and feed the response headers to
/// [`update_quota`](Self::update_quota). The TTL of every entry is decided
/// once, at `set` time, from the quota known at that moment.
///
/// All operations are synchronous and never fail; a miss is `None`/`false`.
pub struct AdaptiveCache<T> {
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    entries: RwLock<EntryStore<T>>,
    quota: QuotaTracker,
    stats: Mutex<CacheStats>,
}

impl<T: Clone> AdaptiveCache<T> {
    /// Create a cache driven by the system clock.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a cache driven by an arbitrary clock.
    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let quota = QuotaTracker::new(config.low_quota_threshold);
        Self {
            config,
            clock,
            entries: RwLock::new(EntryStore::new()),
            quota,
            stats: Mutex::new(CacheStats::default()),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Current time as seen by this cache.
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Whether a fresh entry exists for `key`. Never evicts.
    ///
    /// Low quota does not extend an entry past its TTL: only fresh entries
    /// are ever reported as usable.
    pub fn should_use_cache(&self, key: &str) -> bool {
        let now = self.clock.now();
        let fresh = match self.entries.read().get(key) {
            Some(entry) => !entry.is_expired(now),
            None => return false,
        };

        if fresh && self.quota.is_low() {
            debug!("Quota low, preferring cached response for {}", key);
        }
        fresh
    }

    /// Fetch the payload for `key` if it is still fresh.
    ///
    /// A stale entry is removed on the spot.
    pub fn get(&self, key: &str) -> Option<T> {
        let now = self.clock.now();

        {
            let entries = self.entries.read();
            match entries.get(key) {
                None => {
                    drop(entries);
                    self.stats.lock().misses += 1;
                    return None;
                }
                Some(entry) if !entry.is_expired(now) => {
                    let data = entry.data.clone();
                    drop(entries);
                    self.stats.lock().hits += 1;
                    return Some(data);
                }
                Some(_) => {}
            }
        }

        // Re-check under the write lock: a concurrent set may have replaced it.
        let mut entries = self.entries.write();
        let replaced = match entries.get(key) {
            Some(entry) if entry.is_expired(now) => None,
            Some(entry) => Some(entry.data.clone()),
            None => {
                drop(entries);
                self.stats.lock().misses += 1;
                return None;
            }
        };

        match replaced {
            Some(data) => {
                drop(entries);
                self.stats.lock().hits += 1;
                Some(data)
            }
            None => {
                entries.remove(key);
                drop(entries);
                debug!("Evicted stale entry {}", key);
                let mut stats = self.stats.lock();
                stats.evictions += 1;
                stats.misses += 1;
                None
            }
        }
    }

    /// Store `data` under `key`, replacing any previous entry.
    pub fn set(&self, key: impl Into<String>, data: T) {
        let key = key.into();
        let ttl = self.config.policy.ttl_for(&self.quota.snapshot());
        let now = self.clock.now();

        debug!("Caching {} for {}s", key, ttl.as_secs());
        self.entries
            .write()
            .insert(key, CacheEntry::new(data, now, ttl));
        self.stats.lock().stores += 1;
    }

    /// Remove every stale entry. Returns how many were removed.
    pub fn cleanup(&self) -> usize {
        let now = self.clock.now();
        let removed = self.entries.write().remove_expired(now);
        if removed > 0 {
            debug!("Cleanup removed {} stale entries", removed);
            self.stats.lock().evictions += removed as u64;
        }
        removed
    }

    /// Replace the quota snapshot with what an upstream response reported.
    pub fn update_quota(&self, telemetry: QuotaTelemetry) {
        self.quota.update(telemetry, self.clock.now());
    }

    /// Parse quota headers from `source` and record them.
    pub fn update_quota_from<S: TelemetrySource + ?Sized>(&self, source: &S) {
        self.update_quota(QuotaTelemetry::from_source(source));
    }

    /// Copy of the current quota snapshot.
    pub fn quota_info(&self) -> QuotaState {
        self.quota.snapshot()
    }

    pub fn is_quota_low(&self) -> bool {
        self.quota.is_low()
    }

    /// Budget status on this cache's TTL tiers.
    pub fn quota_status(&self) -> QuotaStatus {
        self.config.policy.status_for(&self.quota.snapshot())
    }

    /// TTL frozen into the entry for `key`, stale or not.
    pub fn entry_ttl(&self, key: &str) -> Option<Duration> {
        self.entries.read().get(key).map(|entry| entry.ttl)
    }

    /// Number of stored entries, including stale ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop all entries. Quota state is kept.
    pub fn clear(&self) {
        self.entries.write().clear();
        debug!("Cache cleared");
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.lock().clone()
    }
}

impl<T: Clone> Default for AdaptiveCache<T> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
