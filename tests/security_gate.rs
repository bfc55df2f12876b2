//! Security gate behavior through the full router.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use brightpane::SiteConfig;

mod common;
use common::{capture_logs, fixture_router, get, send, test_server, StalledStore};

const NO_CACHE: &str = "no-store, no-cache, must-revalidate";

#[tokio::test]
async fn test_unknown_api_path_is_still_tagged() {
    let router = fixture_router();

    let res = send(&router, get("/api/anything")).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.header("x-api-version"), Some("1.0"));
    assert_eq!(res.header("cache-control"), Some(NO_CACHE));
}

#[tokio::test]
async fn test_api_routes_are_tagged() {
    let router = fixture_router();

    for uri in ["/api/site", "/api/booking/options"] {
        let res = send(&router, get(uri)).await;
        assert_eq!(res.status, StatusCode::OK, "{}", uri);
        assert_eq!(res.header("x-api-version"), Some("1.0"), "{}", uri);
        assert_eq!(res.header("cache-control"), Some(NO_CACHE), "{}", uri);
    }
}

#[tokio::test]
async fn test_non_api_paths_pass_through() {
    let router = fixture_router();

    for uri in ["/robots.txt", "/health", "/apiary"] {
        let res = send(&router, get(uri)).await;
        assert_eq!(res.header("x-api-version"), None, "{}", uri);
        assert_eq!(res.header("cache-control"), None, "{}", uri);
    }
}

#[tokio::test]
async fn test_cross_origin_is_logged_not_blocked() {
    let router = fixture_router();

    let req = Request::builder()
        .uri("/api/site")
        .header("host", "brightpane.local")
        .header("origin", "https://elsewhere.example")
        .body(Body::empty())
        .unwrap();
    let (logs, _guard) = capture_logs();
    let res = send(&router, req).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["name"], "Brightpane Window Cleaning");
    let logs = logs.contents();
    assert!(logs.contains("Cross-origin request"), "{}", logs);
    assert!(logs.contains("https://elsewhere.example"), "{}", logs);
}

#[tokio::test]
async fn test_same_origin_is_not_logged() {
    let router = fixture_router();

    let req = Request::builder()
        .uri("/api/site")
        .header("host", "brightpane.local")
        .header("origin", "https://brightpane.local")
        .body(Body::empty())
        .unwrap();
    let (logs, _guard) = capture_logs();
    let res = send(&router, req).await;

    assert_eq!(res.status, StatusCode::OK);
    assert!(!logs.contents().contains("Cross-origin request"));
}

#[tokio::test]
async fn test_timed_out_api_request_is_tagged() {
    let mut config = SiteConfig::default();
    config.timeouts.request_secs = 1;
    let (_, server) = test_server(config, Arc::new(StalledStore));

    let res = send(&server.router(), get("/api/assistant?q=gutters")).await;
    assert_eq!(res.status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(res.header("x-api-version"), Some("1.0"));
    assert_eq!(res.header("cache-control"), Some(NO_CACHE));
}

#[tokio::test]
async fn test_request_id_is_assigned_and_propagated() {
    let router = fixture_router();

    let res = send(&router, get("/health")).await;
    assert!(res.header("x-request-id").is_some());

    let req = Request::builder()
        .uri("/health")
        .header("x-request-id", "abc-123")
        .body(Body::empty())
        .unwrap();
    let res = send(&router, req).await;
    assert_eq!(res.header("x-request-id"), Some("abc-123"));
}
