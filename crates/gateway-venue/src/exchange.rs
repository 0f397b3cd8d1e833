//! Signed exchange actions and the venue API seam.
//!
//! `VenueApi` is the trait the HTTP handlers talk to; `VenueClient` is the
//! production implementation that signs actions and posts them to the venue
//! exchange endpoint. Orders are filled asynchronously by keepers, so a
//! successful submission returns a pending order receipt, not a fill.

use crate::client::VenueInfoClient;
use crate::error::{VenueError, VenueResult};
use crate::signer::{parse_address, SignerCache};
use crate::types::{
    CloseReceipt, FaucetReceipt, OpenPositionParams, OrderReceipt, RawOpenTrade, TransferParams,
    TxReceipt, VenueBalances,
};
use async_trait::async_trait;
use chrono::Utc;
use gateway_core::Position;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

/// Fixed timeout for exchange requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything the gateway needs from the venue.
#[async_trait]
pub trait VenueApi: Send + Sync {
    async fn balances(&self, address: &str) -> VenueResult<VenueBalances>;
    async fn positions(&self, address: &str) -> VenueResult<Vec<Position>>;
    async fn open_trades(&self, address: &str) -> VenueResult<Vec<RawOpenTrade>>;
    async fn pair_details(&self) -> VenueResult<Value>;
    async fn open_position(
        &self,
        private_key: &str,
        params: &OpenPositionParams,
    ) -> VenueResult<OrderReceipt>;
    async fn close_trade(
        &self,
        private_key: &str,
        trade_index: u64,
        trader: Option<&str>,
    ) -> VenueResult<CloseReceipt>;
    async fn withdraw(
        &self,
        private_key: &str,
        params: &TransferParams,
        vault: Option<&str>,
    ) -> VenueResult<TxReceipt>;
    async fn approve_agent(&self, user_key: &str, agent_address: &str) -> VenueResult<TxReceipt>;
    async fn request_faucet(&self, address: &str) -> VenueResult<FaucetReceipt>;
}

/// Production venue client: info queries plus signed exchange actions.
pub struct VenueClient {
    info: VenueInfoClient,
    client: Client,
    exchange_url: String,
    faucet_url: String,
    signers: SignerCache,
}

impl VenueClient {
    /// Create a new venue client.
    pub fn new(base_url: impl Into<String>) -> VenueResult<Self> {
        let base_url = base_url.into();
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| VenueError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            info: VenueInfoClient::new(base_url.clone())?,
            client,
            exchange_url: format!("{base_url}/exchange"),
            faucet_url: format!("{base_url}/faucet"),
            signers: SignerCache::new(),
        })
    }

    /// Sign and post an action to the exchange endpoint.
    ///
    /// Returns the `response` object of the venue's acknowledgment; a
    /// non-ok status is an `ActionRejected` error.
    async fn post_action(&self, private_key: &str, action: Value) -> VenueResult<Value> {
        let signer = self.signers.get_or_create(private_key)?;
        let nonce = Utc::now().timestamp_millis() as u64;
        let signature = signer.sign_action(&action, nonce).await?;

        debug!(action_type = %action["type"], nonce, "Posting exchange action");

        let payload = json!({
            "action": action,
            "nonce": nonce,
            "signature": signature,
        });

        let response = self
            .client
            .post(&self.exchange_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| VenueError::HttpClient(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VenueError::ActionRejected(format!("HTTP {status}: {body}")));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| VenueError::HttpClient(format!("Failed to parse response: {e}")))?;

        if body.get("status").and_then(|s| s.as_str()) != Some("ok") {
            return Err(VenueError::ActionRejected(body.to_string()));
        }

        Ok(body.get("response").cloned().unwrap_or(Value::Null))
    }
}

fn string_at(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl VenueApi for VenueClient {
    async fn balances(&self, address: &str) -> VenueResult<VenueBalances> {
        let address = parse_address(address)?;
        self.info.balances(&address.to_checksum(None)).await
    }

    async fn positions(&self, address: &str) -> VenueResult<Vec<Position>> {
        let address = parse_address(address)?;
        self.info.positions(&address.to_checksum(None)).await
    }

    async fn open_trades(&self, address: &str) -> VenueResult<Vec<RawOpenTrade>> {
        let address = parse_address(address)?;
        self.info.open_trades(&address.to_checksum(None)).await
    }

    async fn pair_details(&self) -> VenueResult<Value> {
        self.info.pair_details().await
    }

    async fn open_position(
        &self,
        private_key: &str,
        params: &OpenPositionParams,
    ) -> VenueResult<OrderReceipt> {
        info!(
            market = %params.market,
            side = %params.side,
            collateral = %params.collateral,
            leverage = %params.leverage,
            delegated = params.trader.is_some(),
            "Submitting open-position action"
        );

        let mut action = json!({
            "type": "order",
            "asset": params.asset_index,
            "isBuy": params.side.is_long(),
            "collateral": params.collateral.to_string(),
            "leverage": params.leverage.to_string(),
            "limitPx": params.reference_price.to_string(),
            "tp": "0",
            "sl": "0",
        });
        if let Some(trader) = &params.trader {
            action["trader"] = json!(parse_address(trader)?.to_checksum(None));
        }

        let response = self.post_action(private_key, action).await?;

        let order_id = response
            .get("orderId")
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                VenueError::ActionRejected("no orderId in exchange response".to_string())
            })?;

        info!(order_id = %order_id, "Order submitted, awaiting keeper fill");

        Ok(OrderReceipt {
            order_id,
            tx_hash: string_at(&response, "txHash"),
        })
    }

    async fn close_trade(
        &self,
        private_key: &str,
        trade_index: u64,
        trader: Option<&str>,
    ) -> VenueResult<CloseReceipt> {
        info!(trade_index, delegated = trader.is_some(), "Submitting close action");

        let mut action = json!({
            "type": "close",
            "tradeIndex": trade_index,
        });
        if let Some(trader) = trader {
            action["trader"] = json!(parse_address(trader)?.to_checksum(None));
        }

        let response = self.post_action(private_key, action).await?;
        Ok(CloseReceipt {
            tx_hash: string_at(&response, "txHash"),
        })
    }

    async fn withdraw(
        &self,
        private_key: &str,
        params: &TransferParams,
        vault: Option<&str>,
    ) -> VenueResult<TxReceipt> {
        let destination = parse_address(&params.to)?.to_checksum(None);
        info!(to = %destination, amount = %params.amount, "Submitting withdraw action");

        let mut action = json!({
            "type": "withdraw",
            "destination": destination,
            "amount": params.amount.to_string(),
        });
        if let Some(vault) = vault {
            action["trader"] = json!(parse_address(vault)?.to_checksum(None));
        }

        let response = self.post_action(private_key, action).await?;
        Ok(TxReceipt {
            tx_hash: string_at(&response, "txHash"),
        })
    }

    async fn approve_agent(&self, user_key: &str, agent_address: &str) -> VenueResult<TxReceipt> {
        let agent = parse_address(agent_address)?.to_checksum(None);
        info!(agent = %agent, "Submitting agent approval");

        let action = json!({
            "type": "approveAgent",
            "agent": agent,
        });

        let response = self.post_action(user_key, action).await?;
        Ok(TxReceipt {
            tx_hash: string_at(&response, "txHash"),
        })
    }

    async fn request_faucet(&self, address: &str) -> VenueResult<FaucetReceipt> {
        let address = parse_address(address)?.to_checksum(None);

        let status = self.info.faucet_status(&address).await?;
        let can_request = status
            .get("canRequest")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        if !can_request {
            let next = string_at(&status, "nextRequestTime");
            return Err(VenueError::FaucetUnavailable(format!(
                "Cannot request yet. Next request at: {next}"
            )));
        }

        let response = self
            .client
            .post(&self.faucet_url)
            .json(&json!({"user": address}))
            .send()
            .await
            .map_err(|e| VenueError::HttpClient(format!("HTTP request failed: {e}")))?;

        let http_status = response.status();
        if !http_status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VenueError::FaucetUnavailable(format!(
                "HTTP {http_status}: {body}"
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| VenueError::HttpClient(format!("Failed to parse response: {e}")))?;

        info!(user = %address, "Faucet tokens requested");

        Ok(FaucetReceipt {
            amount: string_at(&body, "amount"),
            tx_hash: string_at(&body, "txHash"),
        })
    }
}
