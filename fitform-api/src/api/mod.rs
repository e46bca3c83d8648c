//! HTTP API handlers for fitform-api

pub mod health;
pub mod measurements;

pub use health::health_routes;
pub use measurements::{get_measurements, predict_measurements, update_measurements};
