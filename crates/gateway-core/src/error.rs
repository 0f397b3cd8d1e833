//! Error types for gateway-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid trade side: {0}")]
    InvalidSide(String),

    #[error("Invalid network: {0}")]
    InvalidNetwork(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
