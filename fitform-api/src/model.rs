//! Predictor model handle
//!
//! The statistical predictor is an opaque collaborator consumed through a
//! fixed positional contract: features `[age, gender_code, height_cm,
//! weight_kg]` in, at least `[waist, hip, bicep, wrist]` out. The engine is
//! handed the model at construction; when loading failed at startup the
//! engine simply has none and prediction requests fail fast.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use fitform_common::{Error, Result};

/// Number of input features in the prediction contract
pub const FEATURE_COUNT: usize = 4;

/// Opaque body-measurement predictor
///
/// Output values are positional: waist, hip, bicep, wrist, then any extra
/// values (ignored by the engine).
pub trait BodyModel: Send + Sync {
    /// Predict from `[age, gender_code, height_cm, weight_kg]`
    fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Result<Vec<f64>>;
}

/// Linear regression model loaded from a JSON parameter file
///
/// One coefficient row and one intercept per output, applied to the raw
/// feature vector. Shape is validated at load so prediction itself cannot
/// go out of bounds.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    outputs: Vec<String>,
    coefficients: Vec<[f64; FEATURE_COUNT]>,
    intercepts: Vec<f64>,
}

impl LinearModel {
    /// Load and shape-check model parameters
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parse model parameters from a JSON string
    pub fn from_json(raw: &str) -> Result<Self> {
        let model: LinearModel = serde_json::from_str(raw)
            .map_err(|e| Error::Internal(format!("invalid model parameters: {e}")))?;

        if model.coefficients.len() != model.outputs.len()
            || model.intercepts.len() != model.outputs.len()
        {
            return Err(Error::Internal(format!(
                "model parameter shape mismatch: {} outputs, {} coefficient rows, {} intercepts",
                model.outputs.len(),
                model.coefficients.len(),
                model.intercepts.len()
            )));
        }

        Ok(model)
    }

    /// Names of the model's outputs, in prediction order
    pub fn output_names(&self) -> &[String] {
        &self.outputs
    }
}

impl BodyModel for LinearModel {
    fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Result<Vec<f64>> {
        let values = self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, intercept)| {
                row.iter()
                    .zip(features)
                    .map(|(coefficient, feature)| coefficient * feature)
                    .sum::<f64>()
                    + intercept
            })
            .collect();
        Ok(values)
    }
}
