//! Venue adapter error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VenueError {
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Invalid address format: {0}")]
    InvalidAddress(String),

    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Exchange rejected action: {0}")]
    ActionRejected(String),

    #[error("Faucet unavailable: {0}")]
    FaucetUnavailable(String),

    #[error("Wallet pool error: {0}")]
    WalletPool(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type VenueResult<T> = Result<T, VenueError>;
