// HTTP front-end tests
// Author: kelexine (https://github.com/kelexine)

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use mockito::Matcher;
use oddscache::cache::{AdaptiveCache, CacheConfig, QuotaTelemetry};
use oddscache::config::AppConfig;
use oddscache::odds::{OddsClient, OddsService};
use oddscache::server::{create_router, HealthResponse, HealthStatus, QuotaResponse};
use std::sync::Arc;
use tower::ServiceExt;

fn app(base_url: String) -> (Router, Arc<OddsService>) {
    app_with_cache(base_url, CacheConfig::default())
}

fn app_with_cache(base_url: String, cache_config: CacheConfig) -> (Router, Arc<OddsService>) {
    let mut config = AppConfig::default();
    config.upstream.api_base_url = base_url;
    config.upstream.api_key = "test-key".to_string();
    config.upstream.max_retries = 1;

    let client = OddsClient::new(&config.upstream).unwrap();
    let cache = Arc::new(AdaptiveCache::new(cache_config));
    let service = Arc::new(OddsService::new(cache, client));
    (create_router(config, service.clone()), service)
}

async fn get(router: &Router, uri: &str) -> axum::response::Response {
    router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_odds_endpoint_reports_cache_status() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v4/sports/soccer_epl/events")
        .match_query(Matcher::UrlEncoded("dateFormat".into(), "unix".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_header("x-requests-remaining", "150")
        .with_header("x-requests-used", "850")
        .with_body(r#"[{"id":"e1"}]"#)
        .expect(1)
        .create_async()
        .await;

    let (router, _) = app(format!("{}/v4", server.url()));
    let uri = "/api/odds?type=events&sportKey=soccer_epl&dateFormat=unix";

    let first = get(&router, uri).await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(first.headers()["x-cache"], "miss");
    assert_eq!(first.headers()["x-requests-remaining"], "150");
    assert_eq!(first.headers()["x-requests-used"], "850");
    let payload: serde_json::Value = body_json(first).await;
    assert_eq!(payload[0]["id"], "e1");

    let second = get(&router, uri).await;
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(second.headers()["x-cache"], "hit");
    assert!(second.headers().contains_key("x-request-id"));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_odds_endpoint_rejects_missing_sport() {
    let (router, _) = app("http://127.0.0.1:9/v4".to_string());

    let response = get(&router, "/api/odds?type=odds").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = body_json(response).await;
    assert_eq!(body["error"]["type"], "invalid_request_error");
}

#[tokio::test]
async fn test_quota_endpoint() {
    let (router, service) = app("http://127.0.0.1:9/v4".to_string());

    let initial: QuotaResponse = body_json(get(&router, "/api/quota").await).await;
    assert_eq!(initial.remaining, 1000);
    assert_eq!(initial.used, 0);
    assert_eq!(initial.status, "good");
    assert_eq!(initial.last_updated, "never");
    assert!(!initial.low);

    service
        .cache()
        .update_quota(QuotaTelemetry::new(Some(40), Some(460)));

    let updated: QuotaResponse = body_json(get(&router, "/api/quota").await).await;
    assert_eq!(updated.remaining, 40);
    assert_eq!(updated.status, "critical");
    assert_eq!(updated.last_updated, "just now");
    assert!((updated.usage_percentage - 92.0).abs() < 1e-9);
    assert!(updated.low);
}

#[tokio::test]
async fn test_health_tracks_quota() {
    let (router, service) = app("http://127.0.0.1:9/v4".to_string());

    let health: HealthResponse = body_json(get(&router, "/health").await).await;
    assert_eq!(health.status, HealthStatus::Healthy);
    assert!(health.checks.contains_key("upstream_quota"));

    service
        .cache()
        .update_quota(QuotaTelemetry::new(Some(80), Some(920)));
    let health: HealthResponse = body_json(get(&router, "/health").await).await;
    assert_eq!(health.status, HealthStatus::Degraded);

    service
        .cache()
        .update_quota(QuotaTelemetry::new(Some(10), Some(990)));
    let health: HealthResponse = body_json(get(&router, "/health").await).await;
    assert_eq!(health.status, HealthStatus::Unhealthy);
}

#[tokio::test]
async fn test_quota_status_follows_configured_tiers() {
    let mut cache_config = CacheConfig::default();
    cache_config.policy.critical_below = 300;
    cache_config.policy.constrained_below = 600;
    let (router, service) = app_with_cache("http://127.0.0.1:9".to_string(), cache_config);

    service
        .cache()
        .update_quota(QuotaTelemetry::new(Some(250), Some(750)));

    let quota: QuotaResponse = body_json(get(&router, "/api/quota").await).await;
    assert_eq!(quota.status, "critical");
    assert!(!quota.low);

    let health: HealthResponse = body_json(get(&router, "/health").await).await;
    assert_eq!(health.status, HealthStatus::Unhealthy);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let (router, _) = app("http://127.0.0.1:9/v4".to_string());
    let _ = get(&router, "/api/odds?type=odds").await;

    let response = get(&router, "/metrics").await;
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("requests_total"));
}
