//! Utility functions and helpers for the oddscache gateway.
//!
//! This module provides cross-cutting concerns like structured logging,
//! secret redaction, and retry logic with backoff.
//!
//! # Submodules
//!
//! - `logging`: Tracing initialization and API key redaction.
//! - `retry`: Retry mechanisms that respect upstream `Retry-After` hints.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod logging;
pub mod retry;
