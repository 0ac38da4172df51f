// HTTP request handlers
// Author: kelexine (https://github.com/kelexine)

use super::routes::AppState;
use crate::cache::QuotaStatus;
use crate::error::OddsError;
use crate::odds::RequestParams;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub checks: HashMap<String, HealthCheck>,
    pub timestamp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub message: String,
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut checks = HashMap::new();
    let cache = state.odds_service.cache();
    let quota = cache.quota_info();

    // Upstream quota
    let (overall_status, quota_check) = match cache.quota_status() {
        QuotaStatus::Critical => (
            HealthStatus::Unhealthy,
            HealthCheck {
                status: "error".to_string(),
                message: format!("{} upstream requests remaining", quota.remaining),
            },
        ),
        _ if cache.is_quota_low() => (
            HealthStatus::Degraded,
            HealthCheck {
                status: "warning".to_string(),
                message: format!("{} upstream requests remaining", quota.remaining),
            },
        ),
        _ => (
            HealthStatus::Healthy,
            HealthCheck {
                status: "ok".to_string(),
                message: format!("{} upstream requests remaining", quota.remaining),
            },
        ),
    };
    checks.insert("upstream_quota".to_string(), quota_check);

    // Cache
    checks.insert(
        "cache".to_string(),
        HealthCheck {
            status: "ok".to_string(),
            message: format!("{} entries", cache.len()),
        },
    );

    // Configuration
    checks.insert(
        "configuration".to_string(),
        HealthCheck {
            status: "ok".to_string(),
            message: format!("API base: {}", state.config.upstream.api_base_url),
        },
    );

    Json(HealthResponse {
        status: overall_status,
        checks,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Handler for /metrics (Prometheus text format)
pub async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        crate::metrics::gather_metrics(),
    )
}

/// Handler for /api/odds - serves upstream data through the adaptive cache
pub async fn odds_handler(
    State(state): State<AppState>,
    Query(params): Query<RequestParams>,
) -> Response {
    let (response, cache_hit) = match serve_odds(&state, params).await {
        Ok(served) => served,
        Err(e) => {
            warn!("Odds request failed: {}", e);
            (e.into_response(), false)
        }
    };

    crate::metrics::record_request("/api/odds", response.status().as_u16(), cache_hit);
    response
}

async fn serve_odds(state: &AppState, params: RequestParams) -> Result<(Response, bool), OddsError> {
    let request = params.into_request()?;
    let fetched = state.odds_service.fetch(&request).await?;

    info!(
        "Served {} ({})",
        request.resource(),
        if fetched.cache_hit { "cache hit" } else { "upstream" }
    );

    let headers = [
        ("x-cache", if fetched.cache_hit { "hit" } else { "miss" }.to_string()),
        ("x-requests-remaining", fetched.quota.remaining.to_string()),
        ("x-requests-used", fetched.quota.used.to_string()),
    ];

    let response = (StatusCode::OK, headers, Json(fetched.payload.as_ref())).into_response();
    Ok((response, fetched.cache_hit))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuotaResponse {
    pub remaining: u64,
    pub used: u64,
    pub status: String,
    pub usage_percentage: f64,
    pub last_updated: String,
    pub low: bool,
}

/// Handler for /api/quota - current upstream quota for UI indicators
pub async fn quota_handler(State(state): State<AppState>) -> Json<QuotaResponse> {
    let cache = state.odds_service.cache();
    let quota = cache.quota_info();

    Json(QuotaResponse {
        remaining: quota.remaining,
        used: quota.used,
        status: cache.quota_status().as_str().to_string(),
        usage_percentage: quota.usage_percentage(),
        last_updated: quota.describe_age(cache.now()),
        low: cache.is_quota_low(),
    })
}
