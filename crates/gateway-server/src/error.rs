//! API error type and its JSON mapping.
//!
//! Every handler error becomes a `{"success": false, "error": "..."}` body
//! with the status from the error class; the process never faults on a
//! request. Market-cache fallback is absorbed upstream of this type and is
//! not an error.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gateway_social::SocialError;
use gateway_venue::VenueError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Client input error: missing/malformed fields, unknown markets.
    #[error("{0}")]
    BadRequest(String),

    /// Lookup miss the client can act on (e.g. agent not in the pool).
    #[error("{0}")]
    NotFound(String),

    /// Service misconfiguration (e.g. missing credentials).
    #[error("{0}")]
    Config(String),

    /// Venue, social, or database dependency failure.
    #[error("{0}")]
    Upstream(String),

    /// Market not in the available set; carries the full 400 payload
    /// including the current market list.
    #[error("{0}")]
    UnavailableMarket(String, serde_json::Value),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::UnavailableMarket(..) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Config(_) | Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        let body = match self {
            Self::UnavailableMarket(_, payload) => payload,
            other => json!({"success": false, "error": other.to_string()}),
        };
        (status, Json(body)).into_response()
    }
}

impl From<VenueError> for ApiError {
    fn from(e: VenueError) -> Self {
        match e {
            VenueError::InvalidAddress(_) | VenueError::InvalidKey(_) => {
                Self::BadRequest(e.to_string())
            }
            VenueError::FaucetUnavailable(_) => Self::BadRequest(e.to_string()),
            _ => Self::Upstream(e.to_string()),
        }
    }
}

impl From<SocialError> for ApiError {
    fn from(e: SocialError) -> Self {
        Self::Upstream(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Upstream("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_venue_error_classes() {
        let bad: ApiError = VenueError::InvalidAddress("0xzz".into()).into();
        assert!(matches!(bad, ApiError::BadRequest(_)));

        let upstream: ApiError = VenueError::HttpClient("boom".into()).into();
        assert!(matches!(upstream, ApiError::Upstream(_)));

        let faucet: ApiError = VenueError::FaucetUnavailable("wait".into()).into();
        assert!(matches!(faucet, ApiError::BadRequest(_)));
    }
}
