// Cached odds service against a mocked upstream
// Author: kelexine (https://github.com/kelexine)

use mockito::Matcher;
use oddscache::cache::{AdaptiveCache, CacheConfig};
use oddscache::config::UpstreamConfig;
use oddscache::error::OddsError;
use oddscache::odds::{DateFormat, OddsClient, OddsFormat, OddsOptions, OddsRequest, OddsService};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn service(base_url: String) -> OddsService {
    let config = UpstreamConfig {
        api_base_url: base_url,
        api_key: "test-key".to_string(),
        timeout_seconds: 5,
        max_retries: 1,
    };
    let client = OddsClient::new(&config).unwrap();
    OddsService::new(Arc::new(AdaptiveCache::new(CacheConfig::default())), client)
}

#[tokio::test]
async fn test_second_fetch_is_served_from_cache() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v4/sports")
        .match_query(Matcher::UrlEncoded("apiKey".into(), "test-key".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_header("x-requests-remaining", "480")
        .with_header("x-requests-used", "20")
        .with_body(r#"[{"key":"soccer_epl","title":"EPL"}]"#)
        .expect(1)
        .create_async()
        .await;

    let service = service(format!("{}/v4", server.url()));

    let first = service.fetch(&OddsRequest::Sports).await.unwrap();
    assert!(!first.cache_hit);
    assert_eq!(first.payload[0]["key"], "soccer_epl");
    assert_eq!(first.quota.remaining, 480);
    assert_eq!(first.quota.used, 20);

    let second = service.fetch(&OddsRequest::Sports).await.unwrap();
    assert!(second.cache_hit);
    assert_eq!(*second.payload, *first.payload);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_ttl_uses_quota_known_before_response() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/v4/sports")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_header("x-requests-remaining", "30")
        .with_body("[]")
        .create_async()
        .await;

    let service = service(format!("{}/v4", server.url()));
    service.fetch(&OddsRequest::Sports).await.unwrap();

    let cache = service.cache();
    assert_eq!(cache.entry_ttl("sports_list"), Some(Duration::from_secs(120)));
    assert!(cache.is_quota_low());

    // The next write sees the critical quota
    cache.set("next", Arc::new(json!([])));
    assert_eq!(cache.entry_ttl("next"), Some(Duration::from_secs(600)));
}

#[tokio::test]
async fn test_odds_request_sends_adjusted_markets() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v4/sports/golf_masters_tournament_winner/odds")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("markets".into(), "outrights".into()),
            Matcher::UrlEncoded("regions".into(), "us,eu,uk".into()),
            Matcher::UrlEncoded("oddsFormat".into(), "decimal".into()),
            Matcher::UrlEncoded("dateFormat".into(), "iso".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json; charset=utf-8")
        .with_body("[]")
        .create_async()
        .await;

    let service = service(format!("{}/v4", server.url()));
    let request = OddsRequest::Odds {
        sport: "golf_masters_tournament_winner".to_string(),
        options: OddsOptions::default(),
    };
    let fetched = service.fetch(&request).await.unwrap();
    assert!(!fetched.cache_hit);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_upstream_error_is_not_cached() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/v4/sports/unknown_sport/scores")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_header("x-requests-remaining", "1")
        .with_body(r#"{"message":"Unknown sport"}"#)
        .create_async()
        .await;

    let service = service(format!("{}/v4", server.url()));
    let request = OddsRequest::Scores {
        sport: "unknown_sport".to_string(),
        date_format: Default::default(),
    };

    let err = service.fetch(&request).await.unwrap_err();
    match err {
        OddsError::UpstreamApi { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Unknown sport");
        }
        other => panic!("unexpected error: {:?}", other),
    }

    assert!(service.cache().is_empty());
    assert_eq!(service.cache().quota_info().remaining, 1000);
}

#[tokio::test]
async fn test_non_json_response_is_rejected() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/v4/sports")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let service = service(format!("{}/v4", server.url()));
    let err = service.fetch(&OddsRequest::Sports).await.unwrap_err();

    assert!(matches!(err, OddsError::UnexpectedContentType(_)));
    assert!(service.cache().is_empty());
}

#[tokio::test]
async fn test_rate_limited_upstream_maps_to_too_many_requests() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/v4/sports")
        .match_query(Matcher::Any)
        .with_status(429)
        .with_body("slow down")
        .create_async()
        .await;

    let service = service(format!("{}/v4", server.url()));
    let err = service.fetch(&OddsRequest::Sports).await.unwrap_err();
    assert!(matches!(err, OddsError::TooManyRequests(_)));
}

#[tokio::test]
async fn test_invalid_request_never_reaches_upstream() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let service = service(format!("{}/v4", server.url()));
    let request = OddsRequest::HistoricalEvents {
        sport: "soccer_epl".to_string(),
        date: String::new(),
        date_format: Default::default(),
    };

    let err = service.fetch(&request).await.unwrap_err();
    assert!(matches!(err, OddsError::InvalidRequest(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_historical_odds_formats_are_cached_separately() {
    let mut server = mockito::Server::new_async().await;
    let mut mocks = Vec::new();
    for format in ["decimal", "american"] {
        mocks.push(
            server
                .mock("GET", "/v4/historical/sports/soccer_epl/odds")
                .match_query(Matcher::UrlEncoded("oddsFormat".into(), format.into()))
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(json!({ "fmt": format }).to_string())
                .expect(1)
                .create_async()
                .await,
        );
    }

    let service = service(format!("{}/v4", server.url()));
    let request = |odds_format| OddsRequest::HistoricalOdds {
        sport: "soccer_epl".to_string(),
        date: "2024-01-01T00:00:00Z".to_string(),
        options: OddsOptions {
            odds_format,
            ..OddsOptions::default()
        },
    };

    let decimal = service.fetch(&request(OddsFormat::Decimal)).await.unwrap();
    let american = service.fetch(&request(OddsFormat::American)).await.unwrap();
    assert!(!american.cache_hit);
    assert_eq!(decimal.payload["fmt"], "decimal");
    assert_eq!(american.payload["fmt"], "american");

    let again = service.fetch(&request(OddsFormat::American)).await.unwrap();
    assert!(again.cache_hit);
    assert_eq!(again.payload["fmt"], "american");

    for mock in mocks {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_historical_events_date_formats_are_cached_separately() {
    let mut server = mockito::Server::new_async().await;
    let mut mocks = Vec::new();
    for format in ["iso", "unix"] {
        mocks.push(
            server
                .mock("GET", "/v4/historical/sports/soccer_epl/events")
                .match_query(Matcher::UrlEncoded("dateFormat".into(), format.into()))
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(json!({ "dateFormat": format }).to_string())
                .expect(1)
                .create_async()
                .await,
        );
    }

    let service = service(format!("{}/v4", server.url()));
    let request = |date_format| OddsRequest::HistoricalEvents {
        sport: "soccer_epl".to_string(),
        date: "2024-01-01T00:00:00Z".to_string(),
        date_format,
    };

    let iso = service.fetch(&request(DateFormat::Iso)).await.unwrap();
    let unix = service.fetch(&request(DateFormat::Unix)).await.unwrap();
    assert!(!unix.cache_hit);
    assert_eq!(iso.payload["dateFormat"], "iso");
    assert_eq!(unix.payload["dateFormat"], "unix");

    for mock in mocks {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_adjusted_golf_markets_share_one_entry() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v4/sports/golf_masters_tournament_winner/odds")
        .match_query(Matcher::UrlEncoded("markets".into(), "outrights".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .expect(1)
        .create_async()
        .await;

    let service = service(format!("{}/v4", server.url()));
    let request = |markets: &str| OddsRequest::Odds {
        sport: "golf_masters_tournament_winner".to_string(),
        options: OddsOptions {
            markets: markets.to_string(),
            ..OddsOptions::default()
        },
    };

    assert!(!service.fetch(&request("h2h")).await.unwrap().cache_hit);
    assert!(service.fetch(&request("outrights")).await.unwrap().cache_hit);

    mock.assert_async().await;
}
