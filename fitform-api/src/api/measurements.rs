//! Measurement prediction, update and retrieval handlers
//!
//! Thin wiring over the measurement engine: deserialize, delegate, shape
//! the response. All domain decisions live in the engine and store.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use fitform_common::types::InputParameters;
use fitform_common::{MeasurementMap, MeasurementRecord};

use crate::engine::PredictParams;
use crate::error::ApiResult;
use crate::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub parent_id: String,
    pub child_id: String,
    pub measurements: MeasurementMap,
}

/// Response for predict and update: the measurement maps plus a message
#[derive(Debug, Serialize)]
pub struct MeasurementResponse {
    pub success: bool,
    pub parent_id: String,
    pub child_id: String,
    pub measurements_cm: MeasurementMap,
    pub measurements_inches: MeasurementMap,
    pub message: String,
}

impl MeasurementResponse {
    fn from_record(record: MeasurementRecord, message: &str) -> Self {
        Self {
            success: true,
            parent_id: record.parent_id,
            child_id: record.child_id,
            measurements_cm: record.measurements_cm,
            measurements_inches: record.measurements_inches,
            message: message.to_string(),
        }
    }
}

/// Full record echo for retrieval
#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub success: bool,
    pub parent_id: String,
    pub child_id: String,
    pub input_parameters: InputParameters,
    pub measurements_cm: MeasurementMap,
    pub measurements_inches: MeasurementMap,
    pub prediction_timestamp: String,
    pub last_updated: String,
    pub is_predicted: bool,
    pub is_manually_updated: bool,
}

impl From<MeasurementRecord> for RecordResponse {
    fn from(record: MeasurementRecord) -> Self {
        Self {
            success: true,
            parent_id: record.parent_id,
            child_id: record.child_id,
            input_parameters: record.input_parameters,
            measurements_cm: record.measurements_cm,
            measurements_inches: record.measurements_inches,
            prediction_timestamp: record.prediction_timestamp,
            last_updated: record.last_updated,
            is_predicted: record.is_predicted,
            is_manually_updated: record.is_manually_updated,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /predict-measurements
pub async fn predict_measurements(
    State(state): State<AppState>,
    Json(params): Json<PredictParams>,
) -> ApiResult<Json<MeasurementResponse>> {
    let record = state.engine.predict(params)?;
    Ok(Json(MeasurementResponse::from_record(
        record,
        "Measurements predicted and saved successfully",
    )))
}

/// PUT /update-measurements
pub async fn update_measurements(
    State(state): State<AppState>,
    Json(request): Json<UpdateRequest>,
) -> ApiResult<Json<MeasurementResponse>> {
    let record = state.engine.update(
        &request.parent_id,
        &request.child_id,
        &request.measurements,
    )?;
    Ok(Json(MeasurementResponse::from_record(
        record,
        "Measurements updated successfully",
    )))
}

/// GET /get-measurements/:parent_id/:child_id
pub async fn get_measurements(
    State(state): State<AppState>,
    Path((parent_id, child_id)): Path<(String, String)>,
) -> ApiResult<Json<RecordResponse>> {
    let record = state.engine.get(&parent_id, &child_id)?;
    Ok(Json(record.into()))
}
