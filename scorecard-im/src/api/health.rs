//! Health check endpoint

use axum::{routing::get, Json, Router};
use serde_json::json;

use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// GET /health
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "module": "scorecard-im",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
