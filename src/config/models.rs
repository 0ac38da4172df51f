//! Configuration data structures for the oddscache gateway.
//!
//! This module defines the schema for the application settings, including
//! server parameters, the upstream Odds API connection, cache tuning and
//! logging.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::cache::{CacheConfig, TtlPolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings (host, port).
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream Odds API settings.
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Adaptive cache tuning.
    #[serde(default)]
    pub cache: CacheSettings,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the built-in HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The IP address or hostname the server should bind to.
    /// Default: `127.0.0.1`
    #[serde(default = "default_host")]
    pub host: String,

    /// The port number the server should listen on.
    /// Default: `8080`
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Settings for the upstream Odds API connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of The Odds API.
    /// Default: `https://api.the-odds-api.com/v4`
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// API key sent as the `apiKey` query parameter. Required.
    #[serde(default)]
    pub api_key: String,

    /// Request timeout in seconds.
    /// Default: `30`
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Maximum attempts for a single upstream request (1 disables retries).
    /// Default: `3`
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

/// Settings for the adaptive response cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Seconds between background expiry sweeps.
    /// Default: `300`
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,

    /// Remaining-request count below which quota is reported low.
    /// Default: `100`
    #[serde(default = "default_low_quota_threshold")]
    pub low_quota_threshold: u64,

    /// Below this many remaining requests the longest TTL applies.
    /// Default: `50`
    #[serde(default = "default_critical_below")]
    pub critical_below: u64,

    /// Below this many remaining requests the middle TTL applies.
    /// Default: `200`
    #[serde(default = "default_constrained_below")]
    pub constrained_below: u64,

    /// Default: `600`
    #[serde(default = "default_critical_ttl")]
    pub critical_ttl_seconds: u64,

    /// Default: `300`
    #[serde(default = "default_constrained_ttl")]
    pub constrained_ttl_seconds: u64,

    /// Default: `120`
    #[serde(default = "default_healthy_ttl")]
    pub healthy_ttl_seconds: u64,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`, `compact`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Whether to mask the upstream API key in logged URLs.
    /// Default: `true`
    #[serde(default = "default_true")]
    pub sanitize_secrets: bool,
}

impl CacheSettings {
    /// Build the runtime cache configuration from these settings.
    pub fn to_cache_config(&self) -> CacheConfig {
        CacheConfig {
            policy: TtlPolicy {
                critical_below: self.critical_below,
                constrained_below: self.constrained_below,
                critical_ttl: Duration::from_secs(self.critical_ttl_seconds),
                constrained_ttl: Duration::from_secs(self.constrained_ttl_seconds),
                healthy_ttl: Duration::from_secs(self.healthy_ttl_seconds),
            },
            low_quota_threshold: self.low_quota_threshold,
            cleanup_interval: Duration::from_secs(self.cleanup_interval_seconds),
        }
    }
}

// Default trait implementations linking to custom logic

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_key: String::new(),
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            cleanup_interval_seconds: default_cleanup_interval(),
            low_quota_threshold: default_low_quota_threshold(),
            critical_below: default_critical_below(),
            constrained_below: default_constrained_below(),
            critical_ttl_seconds: default_critical_ttl(),
            constrained_ttl_seconds: default_constrained_ttl(),
            healthy_ttl_seconds: default_healthy_ttl(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            sanitize_secrets: true,
        }
    }
}

// Helper functions for serde defaults and shared constants
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_api_base_url() -> String {
    "https://api.the-odds-api.com/v4".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_cleanup_interval() -> u64 {
    300 // 5 minutes
}

fn default_low_quota_threshold() -> u64 {
    crate::cache::quota::LOW_QUOTA_THRESHOLD
}

fn default_critical_below() -> u64 {
    crate::cache::quota::CRITICAL_BELOW
}

fn default_constrained_below() -> u64 {
    crate::cache::quota::CONSTRAINED_BELOW
}

fn default_critical_ttl() -> u64 {
    600
}

fn default_constrained_ttl() -> u64 {
    300
}

fn default_healthy_ttl() -> u64 {
    120
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
