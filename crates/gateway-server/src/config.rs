//! Gateway configuration.
//!
//! Layered the usual way: serde defaults, then an optional TOML file
//! (`GATEWAY_CONFIG` or `--config`), then environment variable overrides for
//! the recognized deployment variables.

use crate::error::{ApiError, ApiResult};
use gateway_core::Network;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Gateway service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Network selection for the venue.
    #[serde(default)]
    pub network: Network,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Venue REST API base URL.
    #[serde(default = "default_venue_api_url")]
    pub venue_api_url: String,
    /// Configuration API base URL (market availability source).
    #[serde(default = "default_config_api_url")]
    pub config_api_url: String,
    /// Venue identifier passed to the configuration API.
    #[serde(default = "default_venue_name")]
    pub venue: String,
    /// Market cache time-to-live in seconds.
    #[serde(default = "default_market_cache_ttl_secs")]
    pub market_cache_ttl_secs: u64,
    /// Social data API base URL.
    #[serde(default)]
    pub social_api_url: String,
    /// Social data API bearer credential (empty = social routes disabled).
    #[serde(default)]
    pub social_api_key: String,
    /// Wallet pool database URL (absent = agent flows disabled).
    #[serde(default)]
    pub database_url: Option<String>,
    /// Log file directory.
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

fn default_port() -> u16 {
    5002
}

fn default_venue_api_url() -> String {
    "https://api.venue-testnet.example".to_string()
}

fn default_config_api_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_venue_name() -> String {
    "PERP".to_string()
}

fn default_market_cache_ttl_secs() -> u64 {
    300
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            port: default_port(),
            venue_api_url: default_venue_api_url(),
            config_api_url: default_config_api_url(),
            venue: default_venue_name(),
            market_cache_ttl_secs: default_market_cache_ttl_secs(),
            social_api_url: String::new(),
            social_api_key: String::new(),
            database_url: None,
            log_dir: default_log_dir(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration: file (CLI arg, then `GATEWAY_CONFIG`), then env
    /// overrides.
    pub fn load(cli_path: Option<&str>) -> ApiResult<Self> {
        let path = cli_path
            .map(|p| p.to_string())
            .or_else(|| std::env::var("GATEWAY_CONFIG").ok());

        let mut config = match path {
            Some(path) if Path::new(&path).exists() => Self::from_file(&path)?,
            Some(path) => {
                tracing::warn!(path = %path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env();
        Ok(config)
    }

    /// Load from a specific TOML file.
    pub fn from_file(path: &str) -> ApiResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ApiError::Config(format!("Failed to read config: {e}")))?;
        toml::from_str(&content).map_err(|e| ApiError::Config(format!("Failed to parse config: {e}")))
    }

    /// Apply environment variable overrides.
    fn apply_env(&mut self) {
        if let Ok(testnet) = std::env::var("GATEWAY_TESTNET") {
            self.network = if testnet.to_lowercase() == "true" {
                Network::Testnet
            } else {
                Network::Mainnet
            };
        }
        if let Ok(url) = std::env::var("VENUE_API_URL").or_else(|_| std::env::var("VENUE_RPC_URL"))
        {
            self.venue_api_url = url;
        }
        if let Ok(url) = std::env::var("CONFIG_API_URL") {
            self.config_api_url = url;
        }
        if let Ok(port) = std::env::var("GATEWAY_PORT") {
            if let Ok(port) = port.parse() {
                self.port = port;
            }
        }
        if let Ok(key) = std::env::var("SOCIAL_API_KEY") {
            self.social_api_key = key;
        }
        if let Ok(url) = std::env::var("SOCIAL_API_URL") {
            self.social_api_url = url;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database_url = Some(url);
        }
        if let Ok(dir) = std::env::var("GATEWAY_LOG_DIR") {
            self.log_dir = dir;
        }
    }

    /// Whether the social routes have credentials to work with.
    pub fn social_configured(&self) -> bool {
        !self.social_api_key.is_empty() && !self.social_api_url.is_empty()
    }
}
