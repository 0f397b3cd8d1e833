//! Shared application state for the axum handlers.
//!
//! Everything handlers depend on is constructed once at startup and injected
//! here; in particular the market cache is an owned object, not process-wide
//! state, so its behavior is testable in isolation.

use crate::config::GatewayConfig;
use crate::error::{ApiError, ApiResult};
use gateway_markets::{MarketCache, MarketsApiClient};
use gateway_social::SocialApiClient;
use gateway_venue::{DbWalletPool, VenueApi, VenueClient, WalletPool};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub markets: Arc<MarketCache>,
    pub venue: Arc<dyn VenueApi>,
    pub wallet_pool: Option<Arc<dyn WalletPool>>,
    pub social: Option<Arc<SocialApiClient>>,
}

impl AppState {
    /// Full-injection constructor (used directly by tests).
    pub fn new(
        config: Arc<GatewayConfig>,
        markets: Arc<MarketCache>,
        venue: Arc<dyn VenueApi>,
        wallet_pool: Option<Arc<dyn WalletPool>>,
        social: Option<Arc<SocialApiClient>>,
    ) -> Self {
        Self {
            config,
            markets,
            venue,
            wallet_pool,
            social,
        }
    }

    /// Build production state from configuration.
    pub fn from_config(config: GatewayConfig) -> ApiResult<Self> {
        let markets_client = MarketsApiClient::new(&config.config_api_url, &config.venue)
            .map_err(|e| ApiError::Config(e.to_string()))?;
        let markets = Arc::new(MarketCache::new(
            Arc::new(markets_client),
            Duration::from_secs(config.market_cache_ttl_secs),
        ));

        let venue: Arc<dyn VenueApi> = Arc::new(
            VenueClient::new(&config.venue_api_url).map_err(|e| ApiError::Config(e.to_string()))?,
        );

        let wallet_pool: Option<Arc<dyn WalletPool>> = match &config.database_url {
            Some(url) => Some(Arc::new(
                DbWalletPool::connect(url).map_err(|e| ApiError::Config(e.to_string()))?,
            )),
            None => {
                info!("DATABASE_URL not set, agent wallet-pool flows disabled");
                None
            }
        };

        let social = if config.social_configured() {
            Some(Arc::new(
                SocialApiClient::new(&config.social_api_url, &config.social_api_key)
                    .map_err(|e| ApiError::Config(e.to_string()))?,
            ))
        } else {
            info!("Social API credentials not set, tweet routes will report an error");
            None
        };

        Ok(Self {
            config: Arc::new(config),
            markets,
            venue,
            wallet_pool,
            social,
        })
    }
}
