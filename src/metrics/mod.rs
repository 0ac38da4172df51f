// Metrics module for Prometheus observability
// Author: kelexine (https://github.com/kelexine)

mod registry;

pub use registry::{
    gather_metrics, CACHE_ENTRIES, CACHE_OPERATIONS, REQUESTS_TOTAL, UPSTREAM_CALLS,
    UPSTREAM_DURATION, UPSTREAM_QUOTA,
};

use crate::cache::QuotaState;

/// Helper to record a served request
pub fn record_request(endpoint: &str, status_code: u16, cache_hit: bool) {
    let cache = if cache_hit { "hit" } else { "miss" };
    REQUESTS_TOTAL
        .with_label_values(&[endpoint, &status_code.to_string(), cache])
        .inc();
}

/// Helper to record an Odds API call
pub fn record_upstream_call(resource: &str, status_code: u16, duration_secs: f64) {
    UPSTREAM_CALLS
        .with_label_values(&[resource, &status_code.to_string()])
        .inc();

    UPSTREAM_DURATION
        .with_label_values(&[resource])
        .observe(duration_secs);
}

/// Helpers to record cache operations
pub fn record_cache_hit() {
    CACHE_OPERATIONS.with_label_values(&["hit"]).inc();
}

pub fn record_cache_miss() {
    CACHE_OPERATIONS.with_label_values(&["miss"]).inc();
}

pub fn record_cache_store() {
    CACHE_OPERATIONS.with_label_values(&["store"]).inc();
}

pub fn record_cache_evictions(count: usize) {
    if count > 0 {
        CACHE_OPERATIONS
            .with_label_values(&["eviction"])
            .inc_by(count as f64);
    }
}

pub fn update_cache_entries(count: usize) {
    CACHE_ENTRIES.with_label_values(&["stored"]).set(count as f64);
}

/// Helper to publish the latest quota snapshot
pub fn update_quota(state: &QuotaState) {
    UPSTREAM_QUOTA
        .with_label_values(&["remaining"])
        .set(state.remaining as f64);
    UPSTREAM_QUOTA
        .with_label_values(&["used"])
        .set(state.used as f64);
}
