//! End-to-end tests for the market availability surface.

mod common;

use axum::http::StatusCode;
use common::{request, test_state, unreachable_base_url, MockUpstream};
use gateway_core::Network;
use gateway_server::create_router;
use gateway_venue::testkit::StubVenue;
use serde_json::json;
use std::sync::Arc;

const MARKETS_PATH: &str = "/api/venue-markets/available";

fn btc_payload() -> serde_json::Value {
    json!({
        "success": true,
        "markets": {
            "BTC": {"index": 0, "name": "BTC/USD", "available": true}
        }
    })
}

#[tokio::test]
async fn upstream_markets_flow_caches_between_requests() {
    let upstream = MockUpstream::serving(MARKETS_PATH, btc_payload()).await;
    let state = test_state(
        &upstream.base_url,
        Network::Testnet,
        Arc::new(StubVenue::new()),
        None,
        None,
    );
    let router = create_router(state);

    let (status, body) = request(&router, "GET", "/available-markets", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 1);
    assert_eq!(body["markets"]["BTC"]["index"], 0);

    // validate-market reuses the cached map: still one upstream hit.
    let (status, body) = request(
        &router,
        "POST",
        "/validate-market",
        Some(json!({"market": "btc"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["market"], "BTC");
    assert_eq!(body["isAvailable"], true);
    assert_eq!(body["marketName"], "BTC/USD");
    assert_eq!(body["assetIndex"], 0);

    assert_eq!(upstream.hit_count(), 1);
}

#[tokio::test]
async fn refresh_param_forces_upstream_fetch() {
    let upstream = MockUpstream::serving(MARKETS_PATH, btc_payload()).await;
    let state = test_state(
        &upstream.base_url,
        Network::Testnet,
        Arc::new(StubVenue::new()),
        None,
        None,
    );
    let router = create_router(state);

    request(&router, "GET", "/available-markets", None).await;
    request(&router, "GET", "/available-markets?refresh=true", None).await;
    request(&router, "GET", "/available-markets?refresh=true", None).await;

    assert_eq!(upstream.hit_count(), 3);
}

#[tokio::test]
async fn unreachable_upstream_serves_fallback_table() {
    let state = test_state(
        &unreachable_base_url(),
        Network::Testnet,
        Arc::new(StubVenue::new()),
        None,
        None,
    );
    let router = create_router(state);

    let (status, body) = request(&router, "GET", "/available-markets", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 7);
    assert_eq!(body["markets"]["BTC"]["index"], 0);
    assert_eq!(body["markets"]["ETH"]["index"], 1);
    assert_eq!(body["markets"]["SOL"]["index"], 9);

    // Fallback symbols still validate as available.
    let (status, body) = request(
        &router,
        "POST",
        "/validate-market",
        Some(json!({"market": "hype"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isAvailable"], true);
    assert_eq!(body["assetIndex"], 41);

    // Unknown symbols miss without erroring, in any case.
    for symbol in ["pepe", "PEPE", "Pepe"] {
        let (status, body) = request(
            &router,
            "POST",
            "/validate-market",
            Some(json!({"market": symbol})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isAvailable"], false);
        assert_eq!(body["marketName"], serde_json::Value::Null);
        assert_eq!(body["assetIndex"], serde_json::Value::Null);
    }
}

#[tokio::test]
async fn validate_market_requires_symbol() {
    let state = test_state(
        &unreachable_base_url(),
        Network::Testnet,
        Arc::new(StubVenue::new()),
        None,
        None,
    );
    let router = create_router(state);

    let (status, body) = request(&router, "POST", "/validate-market", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Missing market parameter");
}

#[tokio::test]
async fn health_reports_service_and_network() {
    let state = test_state(
        &unreachable_base_url(),
        Network::Mainnet,
        Arc::new(StubVenue::new()),
        None,
        None,
    );
    let router = create_router(state);

    let (status, body) = request(&router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "perp-gateway");
    assert_eq!(body["network"], "mainnet");
    assert!(body["timestamp"].is_string());
}
