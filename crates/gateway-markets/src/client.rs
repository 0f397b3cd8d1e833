//! HTTP client for the venue configuration API.
//!
//! Fetches the set of tradable markets for a venue. The fetch side is a
//! trait so the cache's TTL and fallback behavior can be tested without
//! a live endpoint.

use crate::error::{MarketsError, MarketsResult};
use async_trait::async_trait;
use gateway_core::{canonical_symbol, MarketMap, MarketRecord};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

/// Fixed timeout for configuration API requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of market availability data.
#[async_trait]
pub trait MarketFetch: Send + Sync {
    /// Fetch the current market map from upstream.
    async fn fetch_markets(&self) -> MarketsResult<MarketMap>;
}

/// Envelope returned by the configuration API.
#[derive(Debug, Deserialize)]
struct AvailableMarketsResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    markets: Option<HashMap<String, MarketRecord>>,
}

/// Client for the venue configuration API.
pub struct MarketsApiClient {
    client: Client,
    base_url: String,
    venue: String,
}

impl MarketsApiClient {
    /// Create a new configuration API client.
    ///
    /// # Arguments
    /// * `base_url` - Configuration API base (e.g. "http://localhost:3000")
    /// * `venue` - Venue identifier passed as a query parameter
    pub fn new(base_url: impl Into<String>, venue: impl Into<String>) -> MarketsResult<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| MarketsError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            venue: venue.into(),
        })
    }
}

#[async_trait]
impl MarketFetch for MarketsApiClient {
    async fn fetch_markets(&self) -> MarketsResult<MarketMap> {
        let url = format!("{}/api/venue-markets/available", self.base_url);
        info!(url = %url, venue = %self.venue, "Fetching available markets");

        let response = self
            .client
            .get(&url)
            .query(&[("venue", self.venue.as_str())])
            .send()
            .await
            .map_err(|e| MarketsError::HttpClient(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MarketsError::HttpClient(format!("HTTP {status}: {body}")));
        }

        let body: AvailableMarketsResponse = response
            .json()
            .await
            .map_err(|e| MarketsError::MalformedPayload(format!("Failed to parse response: {e}")))?;

        if !body.success {
            return Err(MarketsError::MalformedPayload(
                "upstream reported success=false".to_string(),
            ));
        }

        let markets = match body.markets {
            Some(markets) if !markets.is_empty() => markets,
            _ => {
                return Err(MarketsError::MalformedPayload(
                    "markets object missing or empty".to_string(),
                ))
            }
        };

        // Keys come back in whatever case the database stored; canonicalize.
        let markets: MarketMap = markets
            .into_iter()
            .map(|(symbol, record)| (canonical_symbol(&symbol), record))
            .collect();

        debug!(count = markets.len(), "Fetched market map");
        Ok(markets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_parses() {
        let json = r#"{"success":true,"markets":{"BTC":{"index":0,"name":"BTC/USD","available":true}}}"#;
        let parsed: AvailableMarketsResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.success);
        let markets = parsed.markets.unwrap();
        assert_eq!(markets["BTC"].index, 0);
    }

    #[test]
    fn test_envelope_tolerates_missing_fields() {
        let parsed: AvailableMarketsResponse = serde_json::from_str("{}").unwrap();
        assert!(!parsed.success);
        assert!(parsed.markets.is_none());
    }
}
