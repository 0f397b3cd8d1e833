//! Markets error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarketsError {
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Malformed markets payload: {0}")]
    MalformedPayload(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type MarketsResult<T> = Result<T, MarketsError>;
