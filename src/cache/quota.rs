// Upstream quota tracking from rate-limit response headers
// Author: kelexine (https://github.com/kelexine)
//
// The Odds API reports its remaining budget on every response through
// `x-requests-remaining` / `x-requests-used`. Only the latest snapshot is kept.

use parking_lot::RwLock;
use reqwest::header::HeaderMap;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, warn};

pub const REMAINING_HEADER: &str = "x-requests-remaining";
pub const USED_HEADER: &str = "x-requests-used";

/// Assumed remaining budget before anything has been observed.
pub const DEFAULT_REMAINING: u64 = 1000;
pub const DEFAULT_USED: u64 = 0;

/// Below this many remaining requests the quota is reported as low.
pub const LOW_QUOTA_THRESHOLD: u64 = 100;

/// Below this the budget is nearly exhausted.
pub const CRITICAL_BELOW: u64 = 50;
/// Below this the budget is constrained.
pub const CONSTRAINED_BELOW: u64 = 200;

/// Anything that can answer "what is the value of header `name`".
pub trait TelemetrySource {
    fn header(&self, name: &str) -> Option<&str>;
}

impl TelemetrySource for HeaderMap {
    fn header(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.to_str().ok())
    }
}

impl TelemetrySource for HashMap<String, String> {
    fn header(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl TelemetrySource for [(&str, &str)] {
    fn header(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| *v)
    }
}

/// Quota values as reported by one upstream response, before defaulting.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct QuotaTelemetry {
    pub remaining: Option<u64>,
    pub used: Option<u64>,
}

impl QuotaTelemetry {
    pub fn new(remaining: Option<u64>, used: Option<u64>) -> Self {
        Self { remaining, used }
    }

    /// Parse both counters from a header-like source.
    ///
    /// Missing or malformed values come back as `None`; nothing here fails.
    pub fn from_source<S: TelemetrySource + ?Sized>(source: &S) -> Self {
        Self {
            remaining: source.header(REMAINING_HEADER).and_then(parse_count),
            used: source.header(USED_HEADER).and_then(parse_count),
        }
    }

    /// Whether either counter was present.
    pub fn is_empty(&self) -> bool {
        self.remaining.is_none() && self.used.is_none()
    }
}

/// Parse a non-negative base-10 counter. Decimal values are floored.
fn parse_count(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<u64>() {
        return Some(value);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Some(value.floor() as u64),
        _ => None,
    }
}

/// Coarse health of the upstream budget, used by UI-facing endpoints.
/// Derived from the TTL tiers in force, see [`TtlPolicy::status_for`](super::TtlPolicy::status_for).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaStatus {
    Critical,
    Warning,
    Good,
}

impl QuotaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuotaStatus::Critical => "critical",
            QuotaStatus::Warning => "warning",
            QuotaStatus::Good => "good",
        }
    }
}

/// Most recently observed upstream quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaState {
    pub remaining: u64,
    pub used: u64,
    /// `None` until the first response has been observed.
    pub last_updated: Option<Instant>,
}

impl Default for QuotaState {
    fn default() -> Self {
        Self {
            remaining: DEFAULT_REMAINING,
            used: DEFAULT_USED,
            last_updated: None,
        }
    }
}

impl QuotaState {
    /// Snapshot with the given remaining count, as if never observed.
    pub fn with_remaining(remaining: u64) -> Self {
        Self {
            remaining,
            ..Self::default()
        }
    }

    /// Share of the window already consumed, 0.0 - 100.0.
    pub fn usage_percentage(&self) -> f64 {
        let total = self.remaining.saturating_add(self.used);
        if total == 0 {
            return 0.0;
        }
        self.used as f64 / total as f64 * 100.0
    }

    /// Human readable age of the snapshot ("never", "just now", "5m ago", "2h ago").
    pub fn describe_age(&self, now: Instant) -> String {
        let Some(last) = self.last_updated else {
            return "never".to_string();
        };

        let minutes = now.saturating_duration_since(last).as_secs() / 60;
        if minutes < 1 {
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else {
            format!("{}h ago", minutes / 60)
        }
    }
}

/// Holds the single current belief about upstream capacity.
#[derive(Debug)]
pub struct QuotaTracker {
    state: RwLock<QuotaState>,
    low_threshold: u64,
}

impl QuotaTracker {
    pub fn new(low_threshold: u64) -> Self {
        Self {
            state: RwLock::new(QuotaState::default()),
            low_threshold,
        }
    }

    /// Replace the snapshot with what `telemetry` reports, observed at `now`.
    ///
    /// Absent counters fall back to the optimistic defaults.
    pub fn update(&self, telemetry: QuotaTelemetry, now: Instant) {
        if telemetry.is_empty() {
            debug!("Response carried no quota headers, assuming default quota");
        }

        let next = QuotaState {
            remaining: telemetry.remaining.unwrap_or(DEFAULT_REMAINING),
            used: telemetry.used.unwrap_or(DEFAULT_USED),
            last_updated: Some(now),
        };

        if next.remaining < self.low_threshold {
            warn!(
                "Upstream quota low: {} requests remaining ({} used)",
                next.remaining, next.used
            );
        } else {
            debug!(
                "Upstream quota: {} remaining, {} used",
                next.remaining, next.used
            );
        }

        *self.state.write() = next;
    }

    /// Copy of the current snapshot.
    pub fn snapshot(&self) -> QuotaState {
        *self.state.read()
    }

    pub fn is_low(&self) -> bool {
        self.state.read().remaining < self.low_threshold
    }

    pub fn low_threshold(&self) -> u64 {
        self.low_threshold
    }
}

impl Default for QuotaTracker {
    fn default() -> Self {
        Self::new(LOW_QUOTA_THRESHOLD)
    }
}
