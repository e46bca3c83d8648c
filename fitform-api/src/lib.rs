//! fitform-api library - child-garment measurement service
//!
//! Derives a coherent set of garment measurements from a child's age,
//! gender, height and weight through a layered fallback of brand lookup,
//! statistical prediction and anthropometric formulas, persisted per
//! parent/child pair.

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::engine::MeasurementEngine;

pub mod api;
pub mod engine;
pub mod error;
pub mod model;
pub mod store;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Measurement engine with its injected predictor, resolver and store
    pub engine: Arc<MeasurementEngine>,
}

impl AppState {
    /// Create new application state
    pub fn new(engine: MeasurementEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

/// Build application router
///
/// CORS is permissive on all routes; the service has no authentication.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/predict-measurements", post(api::predict_measurements))
        .route("/update-measurements", put(api::update_measurements))
        .route(
            "/get-measurements/:parent_id/:child_id",
            get(api::get_measurements),
        )
        .merge(api::health_routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
