// Odds API HTTP client
// Author: kelexine (https://github.com/kelexine)

use super::OddsRequest;
use crate::cache::QuotaTelemetry;
use crate::config::UpstreamConfig;
use crate::error::{OddsError, Result};
use crate::utils::logging::sanitize;
use crate::utils::retry::{parse_retry_after, with_retry, AttemptError};
use reqwest::header::{HeaderMap, CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Decoded upstream payload plus the quota headers that came with it.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub payload: Value,
    pub telemetry: QuotaTelemetry,
}

/// Client for The Odds API.
///
/// Adds the API key, retries transient failures and hands back the JSON
/// body together with the quota telemetry. It never touches the cache.
pub struct OddsClient {
    http_client: Client,
    config: UpstreamConfig,
    sanitize_secrets: bool,
}

impl OddsClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .use_rustls_tls()
            .build()
            .map_err(|e| OddsError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        debug!("Created Odds API client for {}", config.api_base_url);

        Ok(Self {
            http_client,
            config: config.clone(),
            sanitize_secrets: true,
        })
    }

    /// Toggle API key masking in logged URLs and transport errors (on by default).
    pub fn with_sanitized_logging(mut self, enabled: bool) -> Self {
        self.sanitize_secrets = enabled;
        self
    }

    /// `text` as it may appear in logs.
    pub fn loggable(&self, text: &str) -> String {
        if self.sanitize_secrets {
            sanitize(text)
        } else {
            text.to_string()
        }
    }

    /// Get the API base_url
    pub fn base_url(&self) -> &str {
        &self.config.api_base_url
    }

    /// Full upstream URL for `request`, API key included.
    pub fn request_url(&self, request: &OddsRequest) -> Result<Url> {
        let base = self.config.api_base_url.trim_end_matches('/');
        let mut query = request.query();
        query.push(("apiKey", self.config.api_key.clone()));

        Url::parse_with_params(&format!("{}{}", base, request.path()), &query)
            .map_err(|e| OddsError::Config(format!("Invalid upstream URL: {}", e)))
    }

    /// Perform `request` against the upstream API.
    pub async fn fetch(&self, request: &OddsRequest) -> Result<UpstreamResponse> {
        let url = self.request_url(request)?;
        let resource = request.resource();
        debug!("GET {}", self.loggable(url.as_str()));

        let (headers, body) = with_retry(resource, self.config.max_retries, || {
            let pending = self.http_client.get(url.clone());
            async move {
                let started = Instant::now();
                let response = pending
                    .send()
                    .await
                    .map_err(|e| {
                        AttemptError::new(502, format!("HTTP error: {}", self.loggable(&e.to_string())))
                    })?;

                let status = response.status();
                crate::metrics::record_upstream_call(
                    resource,
                    status.as_u16(),
                    started.elapsed().as_secs_f64(),
                );

                let headers = response.headers().clone();
                if !status.is_success() {
                    let retry_after = headers
                        .get(RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(parse_retry_after);
                    let body = response.text().await.unwrap_or_default();
                    let message = extract_error_message(&body).unwrap_or(body);
                    return Err(AttemptError::new(status.as_u16(), message)
                        .with_retry_after(retry_after));
                }

                let body = response.text().await.map_err(|e| {
                    AttemptError::new(502, format!("Failed to read response body: {}", e))
                })?;
                Ok::<_, AttemptError>((headers, body))
            }
        })
        .await
        .map_err(|err| {
            error!("Odds API {} request failed: HTTP {} - {}", resource, err.status, err.body);
            map_attempt_error(err)
        })?;

        if !is_json(&headers) {
            let content_type = headers
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("<missing>")
                .to_string();
            return Err(OddsError::UnexpectedContentType(content_type));
        }

        let payload: Value = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse Odds API response: {}", e);
            OddsError::Json(e)
        })?;

        let telemetry = QuotaTelemetry::from_source(&headers);
        debug!(
            "Odds API {} ok (remaining: {:?}, used: {:?})",
            resource, telemetry.remaining, telemetry.used
        );

        Ok(UpstreamResponse { payload, telemetry })
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.contains("application/json"))
        .unwrap_or(false)
}

/// Extract error message from an Odds API error body (`{"message": ...}`)
fn extract_error_message(body: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    parsed
        .get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
}

fn map_attempt_error(err: AttemptError) -> OddsError {
    match err.status {
        429 => OddsError::TooManyRequests(format!("Odds API rate limit: {}", err.body)),
        503 | 504 => OddsError::ServiceUnavailable(format!("Upstream unavailable: {}", err.body)),
        status => OddsError::UpstreamApi {
            status,
            message: err.body,
        },
    }
}
