//! Adaptive, quota-aware response cache.
//!
//! Sits between callers and the upstream odds provider and decides, per
//! request key, whether a previously fetched response can be served. The
//! TTL given to each new entry depends on how much of the upstream request
//! quota is left, as last reported by the provider's response headers.
//!
//! # Components
//!
//! - `clock`: monotonic time source, swappable in tests.
//! - `store`: key -> entry map with freshness checks.
//! - `quota`: parsing and tracking of `x-requests-remaining` / `x-requests-used`.
//! - `policy`: quota -> TTL mapping.
//! - `manager`: the [`AdaptiveCache`] facade.
//! - `sweeper`: background task calling [`AdaptiveCache::cleanup`].
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod clock;
pub mod manager;
pub mod models;
pub mod policy;
pub mod quota;
pub mod store;
pub mod sweeper;

pub use clock::{Clock, ManualClock, SystemClock};
pub use manager::AdaptiveCache;
pub use models::{CacheConfig, CacheStats};
pub use policy::TtlPolicy;
pub use quota::{QuotaState, QuotaStatus, QuotaTelemetry, QuotaTracker, TelemetrySource};
pub use store::{CacheEntry, EntryStore};
pub use sweeper::spawn_cleanup_task;
