//! Read-only info queries against the venue REST API.

use crate::error::{VenueError, VenueResult};
use crate::types::{RawOpenTrade, VenueBalances};
use gateway_core::Position;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Fixed timeout for info requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Request body for the info endpoint.
#[derive(Debug, Serialize)]
struct InfoRequest<'a> {
    #[serde(rename = "type")]
    request_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<&'a str>,
}

/// Client for the venue info endpoint.
pub struct VenueInfoClient {
    client: Client,
    info_url: String,
}

impl VenueInfoClient {
    /// Create a new info client.
    ///
    /// # Arguments
    /// * `base_url` - Venue API base (e.g. "https://api.venue.example")
    pub fn new(base_url: impl Into<String>) -> VenueResult<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| VenueError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            info_url: format!("{}/info", base_url.into()),
        })
    }

    async fn post_info(&self, request: &InfoRequest<'_>) -> VenueResult<Value> {
        let response = self
            .client
            .post(&self.info_url)
            .json(request)
            .send()
            .await
            .map_err(|e| VenueError::HttpClient(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VenueError::HttpClient(format!("HTTP {status}: {body}")));
        }

        response
            .json()
            .await
            .map_err(|e| VenueError::HttpClient(format!("Failed to parse response: {e}")))
    }

    /// Fetch USDC and native balances for an address.
    pub async fn balances(&self, address: &str) -> VenueResult<VenueBalances> {
        debug!(user = %address, "Fetching balances");
        let body = self
            .post_info(&InfoRequest {
                request_type: "balances",
                user: Some(address),
            })
            .await?;
        serde_json::from_value(body).map_err(VenueError::Json)
    }

    /// Fetch raw open trades for an address.
    ///
    /// The endpoint returns either a bare array or a `{"data": [...]}`
    /// envelope depending on generation; both are accepted. Entries that
    /// fail to parse are logged and skipped.
    pub async fn open_trades(&self, address: &str) -> VenueResult<Vec<RawOpenTrade>> {
        info!(user = %address, "Fetching open trades");
        let body = self
            .post_info(&InfoRequest {
                request_type: "openTrades",
                user: Some(address),
            })
            .await?;

        let entries = body
            .as_array()
            .or_else(|| body.get("data").and_then(|d| d.as_array()))
            .ok_or_else(|| {
                VenueError::HttpClient("openTrades response is not an array".to_string())
            })?;

        let mut trades = Vec::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            match serde_json::from_value::<RawOpenTrade>(entry.clone()) {
                Ok(trade) => trades.push(trade),
                Err(e) => warn!(idx, error = %e, "Skipping unparseable open trade"),
            }
        }

        debug!(count = trades.len(), "Fetched open trades");
        Ok(trades)
    }

    /// Fetch open trades normalized into positions.
    ///
    /// Entries that cannot be normalized are logged and skipped, not fatal.
    pub async fn positions(&self, address: &str) -> VenueResult<Vec<Position>> {
        let trades = self.open_trades(address).await?;
        let mut positions = Vec::with_capacity(trades.len());
        for trade in &trades {
            match trade.normalize() {
                Some(position) => positions.push(position),
                None => warn!(trade_id = %trade.identifier(), "Skipping incomplete trade entry"),
            }
        }
        info!(count = positions.len(), user = %address, "Normalized positions");
        Ok(positions)
    }

    /// Fetch the formatted pair details listing.
    ///
    /// Pass-through payload; the gateway does not reinterpret it.
    pub async fn pair_details(&self) -> VenueResult<Value> {
        self.post_info(&InfoRequest {
            request_type: "pairDetails",
            user: None,
        })
        .await
    }

    /// Fetch faucet status for an address.
    pub async fn faucet_status(&self, address: &str) -> VenueResult<Value> {
        self.post_info(&InfoRequest {
            request_type: "faucetStatus",
            user: Some(address),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_request_serialization() {
        let request = InfoRequest {
            request_type: "balances",
            user: Some("0xabc"),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"type":"balances","user":"0xabc"}"#);

        let request = InfoRequest {
            request_type: "pairDetails",
            user: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"type":"pairDetails"}"#);
    }
}
