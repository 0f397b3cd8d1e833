//! Shared helpers for gateway integration tests.
//!
//! Provides a mock upstream HTTP server on an ephemeral port (with request
//! counting) and a one-shot request helper against the router.

#![allow(dead_code)]

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use gateway_core::Network;
use gateway_markets::{MarketCache, MarketsApiClient, DEFAULT_TTL};
use gateway_server::{AppState, GatewayConfig};
use gateway_social::SocialApiClient;
use gateway_venue::{VenueApi, WalletPool};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

/// Mock upstream serving a fixed JSON payload, counting hits.
pub struct MockUpstream {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
}

impl MockUpstream {
    /// Serve `payload` on `path` (GET) on an ephemeral local port.
    pub async fn serving(path: &str, payload: Value) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let shared = (hits.clone(), Arc::new(payload));

        async fn handler(
            State((hits, payload)): State<(Arc<AtomicUsize>, Arc<Value>)>,
        ) -> Json<Value> {
            hits.fetch_add(1, Ordering::SeqCst);
            Json((*payload).clone())
        }

        let router = Router::new().route(path, get(handler)).with_state(shared);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            hits,
        }
    }

    pub fn hit_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// A local base URL nothing is listening on (connection refused).
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Build app state with the given collaborators.
pub fn test_state(
    config_api_url: &str,
    network: Network,
    venue: Arc<dyn VenueApi>,
    wallet_pool: Option<Arc<dyn WalletPool>>,
    social: Option<Arc<SocialApiClient>>,
) -> AppState {
    let config = GatewayConfig {
        network,
        config_api_url: config_api_url.to_string(),
        ..GatewayConfig::default()
    };

    let markets_client = MarketsApiClient::new(&config.config_api_url, &config.venue).unwrap();
    let markets = Arc::new(MarketCache::new(Arc::new(markets_client), DEFAULT_TTL));

    AppState::new(Arc::new(config), markets, venue, wallet_pool, social)
}

/// Fire one request at the router and decode the JSON response.
pub async fn request(
    router: &Router,
    method: &str,
    path: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(path);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}
