//! Tweet fetching endpoints.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use gateway_social::TweetQuery;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct TweetsParams {
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    #[serde(default)]
    pub since_id: Option<String>,
}

fn default_max_results() -> u32 {
    10
}

/// `GET /tweets/{username}?max_results=&since_id=`
pub async fn tweets(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(params): Query<TweetsParams>,
) -> ApiResult<Json<Value>> {
    let client = state
        .social
        .as_ref()
        .ok_or_else(|| ApiError::Config("Social API key not configured".to_string()))?;

    let username = username.trim_start_matches('@').to_string();
    info!(username = %username, max_results = params.max_results, "Fetching tweets");

    let query = TweetQuery {
        max_results: params.max_results,
        since_id: params.since_id.clone(),
    };
    let tweets = client.user_tweets(&username, &query).await?;
    let count = tweets.len();

    Ok(Json(json!({
        "success": true,
        "username": username,
        "tweets": tweets,
        "count": count,
    })))
}
