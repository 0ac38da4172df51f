// TTL policy: how long a fresh response may be trusted given the quota
// Author: kelexine (https://github.com/kelexine)

use super::quota::{QuotaState, QuotaStatus, CONSTRAINED_BELOW, CRITICAL_BELOW};
use std::time::Duration;

/// Three-tier policy that trusts cached responses longer as quota shrinks.
///
/// | remaining                          | TTL              |
/// |------------------------------------|------------------|
/// | `< critical_below`                 | `critical_ttl`   |
/// | `critical_below..constrained_below`| `constrained_ttl`|
/// | `>= constrained_below`             | `healthy_ttl`    |
///
/// The result is frozen into each entry at write time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtlPolicy {
    pub critical_below: u64,
    pub constrained_below: u64,
    pub critical_ttl: Duration,
    pub constrained_ttl: Duration,
    pub healthy_ttl: Duration,
}

impl Default for TtlPolicy {
    /// - below 50 remaining: 10 minutes
    /// - below 200 remaining: 5 minutes
    /// - otherwise: 2 minutes
    fn default() -> Self {
        Self {
            critical_below: CRITICAL_BELOW,
            constrained_below: CONSTRAINED_BELOW,
            critical_ttl: Duration::from_secs(10 * 60),
            constrained_ttl: Duration::from_secs(5 * 60),
            healthy_ttl: Duration::from_secs(2 * 60),
        }
    }
}

impl TtlPolicy {
    pub fn ttl_for(&self, quota: &QuotaState) -> Duration {
        if quota.remaining < self.critical_below {
            self.critical_ttl
        } else if quota.remaining < self.constrained_below {
            self.constrained_ttl
        } else {
            self.healthy_ttl
        }
    }

    /// Budget status on the same tiers that pick the TTL.
    pub fn status_for(&self, quota: &QuotaState) -> QuotaStatus {
        if quota.remaining < self.critical_below {
            QuotaStatus::Critical
        } else if quota.remaining < self.constrained_below {
            QuotaStatus::Warning
        } else {
            QuotaStatus::Good
        }
    }
}
