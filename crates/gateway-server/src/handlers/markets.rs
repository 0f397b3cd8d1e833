//! Market availability endpoints.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::Json;
use gateway_core::{canonical_symbol, MarketLookup, MarketRecord};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct AvailableMarketsQuery {
    #[serde(default)]
    pub refresh: bool,
}

/// `GET /available-markets?refresh=<bool>`
pub async fn available_markets(
    State(state): State<AppState>,
    Query(query): Query<AvailableMarketsQuery>,
) -> Json<Value> {
    let snapshot = state.markets.get_available_markets(query.refresh).await;
    Json(json!({
        "success": true,
        "markets": &*snapshot.markets,
        "count": snapshot.markets.len(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ValidateMarketRequest {
    #[serde(default)]
    pub market: Option<String>,
}

/// `POST /validate-market {"market": "BTC"}`
pub async fn validate_market(
    State(state): State<AppState>,
    Json(request): Json<ValidateMarketRequest>,
) -> ApiResult<Json<Value>> {
    let market = request
        .market
        .as_deref()
        .map(canonical_symbol)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing market parameter".to_string()))?;

    let lookup = state.markets.validate_market(&market).await;

    Ok(Json(json!({
        "success": true,
        "market": market,
        "isAvailable": lookup.is_available(),
        "marketName": lookup.display_name(),
        "assetIndex": lookup.asset_index(),
    })))
}

/// Validate a market for trading, or build the 400 payload listing what is
/// currently tradable.
pub async fn require_available_market(state: &AppState, market: &str) -> ApiResult<MarketRecord> {
    if let MarketLookup::Found(record) = state.markets.validate_market(market).await {
        if record.available {
            return Ok(record);
        }
    }

    let snapshot = state.markets.get_available_markets(false).await;
    let mut available: Vec<String> = snapshot.markets.keys().cloned().collect();
    available.sort();

    let error = format!(
        "Market {} is not available. Available markets: {}",
        canonical_symbol(market),
        available.join(", ")
    );
    let payload = json!({
        "success": false,
        "error": &error,
        "availableMarkets": available,
    });
    Err(ApiError::UnavailableMarket(error, payload))
}
