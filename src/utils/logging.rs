//! Structured logging and secret-redaction utilities.
//!
//! This module configures the `tracing` ecosystem for the application,
//! supporting multiple output formats and providing a helper that keeps the
//! upstream API key out of logged URLs.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::config::LoggingConfig;
use crate::error::{OddsError, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const REDACTED: &str = "[REDACTED]";

/// Initializes the global tracing subscriber for the application.
///
/// Supports three output formats:
/// - `json`: Structured JSON logs for production ingestion.
/// - `compact`: Single-line output.
/// - `pretty` (default): Human-readable, colorized output for development.
///
/// Log levels are controlled via the `RUST_LOG` environment variable or
/// the provided `LoggingConfig`.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match config.format.as_str() {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        "compact" => registry
            .with(tracing_subscriber::fmt::layer().compact())
            .try_init(),
        _ => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init(),
    };

    result.map_err(|e| OddsError::Internal(format!("Failed to initialize logging: {}", e)))
}

/// Masks the value of every `apiKey` query parameter in `input`.
///
/// Upstream URLs carry the key in the query string, so anything that logs a
/// URL should pass it through here first.
///
/// # Arguments
///
/// * `input` - The raw string that may contain the key.
///
/// # Returns
///
/// A new string with each key value replaced by `[REDACTED]`.
pub fn sanitize(input: &str) -> String {
    const MARKER: &str = "apiKey=";

    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find(MARKER) {
        let value_start = pos + MARKER.len();
        result.push_str(&rest[..value_start]);
        result.push_str(REDACTED);

        let tail = &rest[value_start..];
        let value_end = tail
            .find(|c: char| c == '&' || c == '#' || c.is_whitespace() || c == '"' || c == '\'')
            .unwrap_or(tail.len());
        rest = &tail[value_end..];
    }
    result.push_str(rest);

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_api_key_mid_query() {
        let input = "GET https://api.the-odds-api.com/v4/sports?apiKey=abc123&regions=us";
        let output = sanitize(input);
        assert_eq!(
            output,
            "GET https://api.the-odds-api.com/v4/sports?apiKey=[REDACTED]&regions=us"
        );
    }

    #[test]
    fn test_sanitize_api_key_at_end() {
        let output = sanitize("/v4/sports?apiKey=secret");
        assert!(output.ends_with("apiKey=[REDACTED]"));
        assert!(!output.contains("secret"));
    }

    #[test]
    fn test_sanitize_leaves_other_text() {
        assert_eq!(sanitize("no secrets here"), "no secrets here");
    }
}
