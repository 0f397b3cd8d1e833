//! Router construction and server entry.

use crate::handlers::{health, markets, social, trading};
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Create the axum router with all gateway routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/available-markets", get(markets::available_markets))
        .route("/validate-market", post(markets::validate_market))
        .route("/balance", post(trading::balance))
        .route("/positions", post(trading::positions))
        .route("/open-position", post(trading::open_position))
        .route("/close-position", post(trading::close_position))
        .route("/transfer", post(trading::transfer))
        .route("/approve-agent", post(trading::approve_agent))
        .route("/faucet", post(trading::faucet))
        .route("/market-info", get(trading::market_info))
        .route("/tweets/{username}", get(social::tweets))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve the gateway.
pub async fn run_server(
    state: AppState,
    port: u16,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(port, "Starting gateway server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
