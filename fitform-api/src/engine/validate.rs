//! Input validation gating all writes
//!
//! Every failure carries a specific caller-facing message; the engine never
//! sees an out-of-range or malformed value.

use serde::Deserialize;

use fitform_common::types::UPDATABLE_KEYS;
use fitform_common::{Error, Gender, GenderInput, MeasurementMap, Result};

/// Raw prediction request as received on the wire
#[derive(Debug, Clone, Deserialize)]
pub struct PredictParams {
    pub parent_id: String,
    pub child_id: String,
    pub age: f64,
    pub gender: GenderInput,
    pub weight: f64,
    pub height: f64,
    #[serde(default)]
    pub brand: Option<String>,
}

/// Prediction input after schema and range checks
#[derive(Debug, Clone)]
pub struct PredictInput {
    pub parent_id: String,
    pub child_id: String,
    pub age: f64,
    pub gender: Gender,
    pub weight: f64,
    pub height: f64,
    pub brand: Option<String>,
}

/// Validate a prediction request: identifiers, ranges, gender, brand
///
/// Boundaries are inclusive: age 3 and 18, weight 10 and 120, height 80
/// and 220 are all accepted. An empty brand string normalizes to None.
pub fn validate_predict(params: PredictParams) -> Result<PredictInput> {
    validate_ids(&params.parent_id, &params.child_id)?;

    if !(3.0..=18.0).contains(&params.age) {
        return Err(Error::Validation(
            "Age must be between 3 and 18 years".to_string(),
        ));
    }
    if !(10.0..=120.0).contains(&params.weight) {
        return Err(Error::Validation(
            "Weight must be between 10.0 and 120.0 kg".to_string(),
        ));
    }
    if !(80.0..=220.0).contains(&params.height) {
        return Err(Error::Validation(
            "Height must be between 80.0 and 220.0 cm".to_string(),
        ));
    }

    let gender = Gender::from_input(&params.gender)?;
    let brand = params.brand.filter(|b| !b.trim().is_empty());

    Ok(PredictInput {
        parent_id: params.parent_id,
        child_id: params.child_id,
        age: params.age,
        gender,
        weight: params.weight,
        height: params.height,
        brand,
    })
}

/// Validate the composite-key identifiers
pub fn validate_ids(parent_id: &str, child_id: &str) -> Result<()> {
    if parent_id.trim().is_empty() {
        return Err(Error::Validation(
            "Parent ID must be a non-empty string".to_string(),
        ));
    }
    if child_id.trim().is_empty() {
        return Err(Error::Validation(
            "Child ID must be a non-empty string".to_string(),
        ));
    }
    Ok(())
}

/// Validate a manual-update measurement map
///
/// Keys are restricted to the core vocabulary; derived lengths cannot be
/// edited. Values must be positive finite numbers.
pub fn validate_manual_measurements(measurements: &MeasurementMap) -> Result<()> {
    for (key, value) in measurements {
        if !UPDATABLE_KEYS.contains(&key.as_str()) {
            return Err(Error::Validation(format!(
                "Invalid measurement key: {key}. Valid keys are: {}",
                UPDATABLE_KEYS.join(", ")
            )));
        }
        if !value.is_finite() || *value <= 0.0 {
            return Err(Error::Validation(format!(
                "Measurement {key} must be a positive number"
            )));
        }
    }
    Ok(())
}
