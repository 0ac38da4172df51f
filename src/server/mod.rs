//! Axum-based HTTP front-end for the oddscache gateway.
//!
//! Exposes the cached odds endpoint, a quota status endpoint for UI
//! warnings, and the usual health/metrics probes.
//!
//! # Components
//!
//! - `handlers`: Implementation of individual endpoints.
//! - `routes`: Router, shared state and request-id/trace/CORS layers.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod handlers;
mod routes;

pub use handlers::{HealthResponse, HealthStatus, QuotaResponse};
pub use routes::{create_router, AppState};
