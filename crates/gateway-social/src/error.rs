//! Social adapter error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SocialError {
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Upstream returned HTTP {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Unrecognized response shape: {0}")]
    UnrecognizedShape(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SocialResult<T> = Result<T, SocialError>;
