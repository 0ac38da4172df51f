//! Cache configuration and statistics models.

// Author: kelexine (https://github.com/kelexine)

use super::policy::TtlPolicy;
use super::quota::LOW_QUOTA_THRESHOLD;
use std::time::Duration;

/// Configuration for the adaptive response cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL tiers applied at write time.
    pub policy: TtlPolicy,
    /// Remaining-request count below which quota is considered low.
    pub low_quota_threshold: u64,
    /// Period of the background expiry sweep.
    pub cleanup_interval: Duration,
}

impl Default for CacheConfig {
    /// Provides default values for cache configuration.
    ///
    /// - `policy`: 10 / 5 / 2 minute tiers split at 50 and 200 remaining
    /// - `low_quota_threshold`: 100
    /// - `cleanup_interval`: 5 minutes
    fn default() -> Self {
        Self {
            policy: TtlPolicy::default(),
            low_quota_threshold: LOW_QUOTA_THRESHOLD,
            cleanup_interval: Duration::from_secs(5 * 60),
        }
    }
}

/// Statistics for cache operations.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Reads that returned a fresh payload.
    pub hits: u64,
    /// Reads that found nothing usable.
    pub misses: u64,
    /// Writes (inserts and replacements).
    pub stores: u64,
    /// Entries dropped for staleness, lazily or by sweep.
    pub evictions: u64,
}
