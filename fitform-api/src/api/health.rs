//! Health check endpoint

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    pub model_loaded: bool,
    pub total_users: usize,
}

/// GET /health
///
/// Reports predictor availability and how many parents have records.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.engine.health();
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "fitform-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model_loaded: snapshot.model_loaded,
        total_users: snapshot.total_users,
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
