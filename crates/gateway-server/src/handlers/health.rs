//! Health check.

use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "perp-gateway",
        "network": state.config.network.as_str(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
