//! Trading endpoints: balances, positions, orders, transfers, delegation.
//!
//! Two body shapes are accepted where the service history left both in use:
//! the agent shape (`agentAddress` resolved through the wallet pool, always
//! delegated) and the legacy shape (`privateKey` supplied directly).

use crate::error::{ApiError, ApiResult};
use crate::handlers::markets::require_available_market;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use gateway_core::{canonical_symbol, TradeSide};
use gateway_venue::{parse_address, ActionSigner, OpenPositionParams, RawAmount, TransferParams};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

/// Resolved trading credentials.
struct TradeCredentials {
    private_key: String,
    use_delegation: bool,
}

/// Resolve the signing key from either body shape.
///
/// `agentAddress` wins when both are present; its key comes from the wallet
/// pool and implies delegation.
async fn resolve_credentials(
    state: &AppState,
    agent_address: Option<&str>,
    private_key: Option<&str>,
    use_delegation: Option<bool>,
) -> ApiResult<TradeCredentials> {
    if let Some(agent) = agent_address.filter(|a| !a.is_empty()) {
        let pool = state
            .wallet_pool
            .as_ref()
            .ok_or_else(|| ApiError::Config("DATABASE_URL not configured".to_string()))?;

        let key = pool
            .agent_key(agent)
            .await
            .map_err(|e| ApiError::Upstream(format!("Failed to fetch agent key: {e}")))?;

        return match key {
            Some(private_key) => {
                info!(agent = %agent, "Found agent key in wallet pool");
                Ok(TradeCredentials {
                    private_key,
                    use_delegation: true,
                })
            }
            None => Err(ApiError::NotFound(format!(
                "Agent address {agent} not found in wallet pool"
            ))),
        };
    }

    match private_key.filter(|k| !k.is_empty()) {
        Some(key) => Ok(TradeCredentials {
            private_key: key.to_string(),
            use_delegation: use_delegation.unwrap_or(false),
        }),
        None => Err(ApiError::BadRequest(
            "Missing required fields: agentAddress or privateKey".to_string(),
        )),
    }
}

/// Reference price attached to market orders; keepers fill at oracle price.
fn reference_price(market: &str) -> Decimal {
    match market {
        "BTC" => Decimal::from(90_000),
        "ETH" => Decimal::from(3_000),
        "SOL" => Decimal::from(200),
        _ => Decimal::from(100),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRequest {
    #[serde(default)]
    pub address: Option<String>,
}

fn required_address(request: &AddressRequest) -> ApiResult<String> {
    request
        .address
        .as_deref()
        .filter(|a| !a.is_empty())
        .map(|a| a.to_string())
        .ok_or_else(|| ApiError::BadRequest("Missing address".to_string()))
}

/// `POST /balance {"address": "0x..."}`
pub async fn balance(
    State(state): State<AppState>,
    Json(request): Json<AddressRequest>,
) -> ApiResult<Json<Value>> {
    let address = required_address(&request)?;
    let checksummed = parse_address(&address)?.to_checksum(None);

    let balances = state.venue.balances(&checksummed).await?;
    info!(address = %checksummed, usdc = %balances.usdc, "Balance check");

    Ok(Json(json!({
        "success": true,
        "address": checksummed,
        "usdcBalance": balances.usdc,
        "ethBalance": balances.native,
    })))
}

/// `POST /positions {"address": "0x..."}`
pub async fn positions(
    State(state): State<AppState>,
    Json(request): Json<AddressRequest>,
) -> ApiResult<Json<Value>> {
    let address = required_address(&request)?;
    let checksummed = parse_address(&address)?.to_checksum(None);

    let positions = state.venue.positions(&checksummed).await?;
    info!(count = positions.len(), address = %checksummed, "Fetched positions");

    Ok(Json(json!({
        "success": true,
        "positions": positions,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenPositionRequest {
    #[serde(default)]
    pub agent_address: Option<String>,
    #[serde(default)]
    pub private_key: Option<String>,
    #[serde(default)]
    pub user_address: Option<String>,
    #[serde(default)]
    pub market: Option<String>,
    #[serde(default)]
    pub side: Option<String>,
    /// Agent shape: collateral in USDC.
    #[serde(default)]
    pub collateral: Option<RawAmount>,
    /// Legacy shape alias for collateral.
    #[serde(default)]
    pub size: Option<RawAmount>,
    #[serde(default)]
    pub leverage: Option<RawAmount>,
    #[serde(default)]
    pub use_delegation: Option<bool>,
}

/// `POST /open-position`
pub async fn open_position(
    State(state): State<AppState>,
    Json(request): Json<OpenPositionRequest>,
) -> ApiResult<Json<Value>> {
    let credentials = resolve_credentials(
        &state,
        request.agent_address.as_deref(),
        request.private_key.as_deref(),
        request.use_delegation,
    )
    .await?;

    let collateral = request
        .collateral
        .as_ref()
        .or(request.size.as_ref())
        .and_then(|a| a.to_decimal(0))
        .ok_or_else(|| ApiError::BadRequest("Missing required fields".to_string()))?;

    let market = request
        .market
        .as_deref()
        .map(canonical_symbol)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing required fields".to_string()))?;

    if credentials.use_delegation && request.user_address.is_none() {
        return Err(ApiError::BadRequest(
            "userAddress required for delegation".to_string(),
        ));
    }

    let trader = match request.user_address.as_deref() {
        Some(user) if credentials.use_delegation => Some(parse_address(user)?.to_checksum(None)),
        _ => None,
    };

    let side = match request.side.as_deref() {
        Some(side) => side
            .parse::<TradeSide>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        None => TradeSide::Long,
    };

    let leverage = request
        .leverage
        .as_ref()
        .and_then(|l| l.to_decimal(0))
        .unwrap_or_else(|| Decimal::from(10));

    // Availability gate before anything touches the venue.
    let record = require_available_market(&state, &market).await?;
    info!(
        market = %market,
        name = %record.name,
        asset_index = record.index,
        "Market validated"
    );

    let params = OpenPositionParams {
        asset_index: record.index,
        market: market.clone(),
        collateral,
        side,
        leverage,
        trader,
        reference_price: reference_price(&market),
    };

    let receipt = state
        .venue
        .open_position(&credentials.private_key, &params)
        .await?;

    Ok(Json(json!({
        "success": true,
        "orderId": &receipt.order_id,
        "tradeId": &receipt.order_id,
        "transactionHash": &receipt.tx_hash,
        "txHash": &receipt.tx_hash,
        "status": "pending",
        "message": "Order created, waiting for keeper to fill position",
        "result": {
            "market": market,
            "side": side,
            "collateral": collateral,
            "leverage": leverage,
        },
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosePositionRequest {
    #[serde(default)]
    pub agent_address: Option<String>,
    #[serde(default)]
    pub private_key: Option<String>,
    #[serde(default)]
    pub user_address: Option<String>,
    #[serde(default)]
    pub market: Option<String>,
    #[serde(default)]
    pub trade_id: Option<RawAmount>,
    #[serde(default)]
    pub use_delegation: Option<bool>,
}

/// `POST /close-position`
///
/// Idempotent: when no open trade matches the market, the desired end state
/// already holds and the handler reports success without any venue action.
pub async fn close_position(
    State(state): State<AppState>,
    Json(request): Json<ClosePositionRequest>,
) -> ApiResult<Json<Value>> {
    let credentials = resolve_credentials(
        &state,
        request.agent_address.as_deref(),
        request.private_key.as_deref(),
        request.use_delegation,
    )
    .await?;

    let market = request
        .market
        .as_deref()
        .filter(|m| !m.is_empty())
        .ok_or_else(|| {
            ApiError::BadRequest(
                "Missing required fields: agentAddress/privateKey, market".to_string(),
            )
        })?;

    let address_to_check = match request.user_address.as_deref() {
        Some(user) if credentials.use_delegation => parse_address(user)?.to_checksum(None),
        _ => ActionSigner::from_hex(&credentials.private_key)?
            .address()
            .to_checksum(None),
    };

    let trades = state.venue.open_trades(&address_to_check).await?;
    let wanted_id = request.trade_id.as_ref().map(|id| id.to_plain_string());
    let trade_to_close = trades.iter().find(|trade| {
        trade.matches_market(market)
            && wanted_id
                .as_deref()
                .map(|id| trade.identifier() == id)
                .unwrap_or(true)
    });

    let Some(trade) = trade_to_close else {
        info!(market, "No open position to close, already flat");
        return Ok(Json(json!({
            "success": true,
            "message": "No open position to close",
            "closePnl": 0,
        })));
    };

    let trade_index = trade.trade_index().ok_or_else(|| {
        ApiError::Upstream("open trade entry carries no close index".to_string())
    })?;

    let trader = credentials
        .use_delegation
        .then(|| address_to_check.as_str());
    let receipt = state
        .venue
        .close_trade(&credentials.private_key, trade_index, trader)
        .await?;

    let close_pnl = trade.realized_pnl();
    info!(market, %close_pnl, "Position closed");

    Ok(Json(json!({
        "success": true,
        "result": {
            "txHash": receipt.tx_hash,
            "market": market,
            "closePnl": close_pnl,
        },
        "closePnl": close_pnl,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    #[serde(default)]
    pub agent_private_key: Option<String>,
    #[serde(default)]
    pub to_address: Option<String>,
    #[serde(default)]
    pub amount: Option<RawAmount>,
    #[serde(default)]
    pub vault_address: Option<String>,
}

/// `POST /transfer`: USDC withdrawal, used for profit-share collection.
pub async fn transfer(
    State(state): State<AppState>,
    Json(request): Json<TransferRequest>,
) -> ApiResult<Json<Value>> {
    let missing =
        || ApiError::BadRequest("Missing required fields: agentPrivateKey, toAddress, amount".to_string());

    let agent_key = request
        .agent_private_key
        .as_deref()
        .filter(|k| !k.is_empty())
        .ok_or_else(missing)?;
    let to_address = request
        .to_address
        .as_deref()
        .filter(|a| !a.is_empty())
        .ok_or_else(missing)?;
    let amount = request
        .amount
        .as_ref()
        .and_then(|a| a.to_decimal(0))
        .ok_or_else(missing)?;

    info!(to = %to_address, %amount, "Transferring USDC");

    let params = TransferParams {
        to: to_address.to_string(),
        amount,
    };
    let receipt = state
        .venue
        .withdraw(agent_key, &params, request.vault_address.as_deref())
        .await?;

    Ok(Json(json!({
        "success": true,
        "result": {
            "txHash": receipt.tx_hash,
            "amount": amount,
            "to": to_address,
        },
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveAgentRequest {
    #[serde(default)]
    pub user_private_key: Option<String>,
    #[serde(default)]
    pub agent_address: Option<String>,
}

/// `POST /approve-agent`: the user authorizes an agent wallet to trade on
/// their behalf.
pub async fn approve_agent(
    State(state): State<AppState>,
    Json(request): Json<ApproveAgentRequest>,
) -> ApiResult<Json<Value>> {
    let missing = || {
        ApiError::BadRequest("Missing required fields: userPrivateKey, agentAddress".to_string())
    };

    let user_key = request
        .user_private_key
        .as_deref()
        .filter(|k| !k.is_empty())
        .ok_or_else(missing)?;
    let agent_address = request
        .agent_address
        .as_deref()
        .filter(|a| !a.is_empty())
        .ok_or_else(missing)?;

    let agent = parse_address(agent_address)?.to_checksum(None);
    info!(agent = %agent, "User approving agent");

    let receipt = state.venue.approve_agent(user_key, &agent).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Agent approved successfully",
        "agentAddress": agent,
        "transactionHash": receipt.tx_hash,
    })))
}

/// `POST /faucet {"address": "0x..."}`, testnet only.
pub async fn faucet(
    State(state): State<AppState>,
    Json(request): Json<AddressRequest>,
) -> ApiResult<Json<Value>> {
    let address = required_address(&request)?;

    if !state.config.network.is_testnet() {
        return Err(ApiError::BadRequest(
            "Faucet only available on testnet".to_string(),
        ));
    }

    let receipt = state.venue.request_faucet(&address).await?;
    info!(address = %address, amount = %receipt.amount, "Faucet tokens sent");

    Ok(Json(json!({
        "success": true,
        "amount": receipt.amount,
        "txHash": receipt.tx_hash,
    })))
}

/// `GET /market-info`: venue pair listing, passed through.
pub async fn market_info(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let pairs = state.venue.pair_details().await.map_err(|e| {
        warn!(error = %e, "Pair details fetch failed");
        ApiError::from(e)
    })?;

    Ok(Json(json!({
        "success": true,
        "pairs": pairs,
    })))
}
