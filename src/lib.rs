// oddscache - Quota-aware caching gateway for The Odds API
// Author: kelexine (https://github.com/kelexine)

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod metrics;
pub mod odds;
pub mod server;
pub mod utils;
