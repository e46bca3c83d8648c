//! Shared domain types for the FitForm measurement service
//!
//! Defines the persisted measurement record, the gender enum with its
//! boundary normalization, the manual-update key vocabulary, and the
//! cm-to-inch derivation applied to every record mutation.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Measurement name to value in a single unit
pub type MeasurementMap = BTreeMap<String, f64>;

/// Measurement keys accepted by manual updates
///
/// Derived lengths (Inseam, KurtaLength, ...) are computed, never edited,
/// so they are deliberately absent here.
pub const UPDATABLE_KEYS: [&str; 8] = [
    "Waist", "Hip", "Bicep", "Neck", "Wrist", "Chest", "Shoulder", "Sleeve",
];

/// Child gender, normalized at the API boundary
///
/// Internal logic operates only on this enum; the flexible wire formats
/// are handled by [`GenderInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Numeric code used in the predictor feature vector (male=1, female=2)
    pub fn code(&self) -> u8 {
        match self {
            Gender::Male => 1,
            Gender::Female => 2,
        }
    }

    /// Normalized string form ("male"/"female")
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    /// Normalize a wire-format gender value
    ///
    /// Accepts "male"/"female"/"m"/"f" (case-insensitive) or the integer
    /// codes 1/2. Anything else is a validation error.
    pub fn from_input(input: &GenderInput) -> Result<Gender> {
        match input {
            GenderInput::Name(name) => match name.to_lowercase().as_str() {
                "male" | "m" => Ok(Gender::Male),
                "female" | "f" => Ok(Gender::Female),
                _ => Err(Error::Validation(
                    "Gender must be 'male', 'female', 'm', or 'f'".to_string(),
                )),
            },
            GenderInput::Code(1) => Ok(Gender::Male),
            GenderInput::Code(2) => Ok(Gender::Female),
            GenderInput::Code(_) => Err(Error::Validation(
                "Gender must be 1 (male) or 2 (female)".to_string(),
            )),
        }
    }
}

/// Gender value as accepted on the wire: a string or an integer code
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GenderInput {
    Code(i64),
    Name(String),
}

/// Input snapshot captured at prediction time
///
/// Immutable once written except by a new prediction overwriting the
/// whole record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputParameters {
    pub age: f64,
    pub gender: Gender,
    pub weight: f64,
    pub height: f64,
    pub brand: Option<String>,
}

/// Persisted measurement result for one child under one parent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementRecord {
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

impl MeasurementRecord {
    /// Build a freshly predicted record with derived inches and audit fields
    pub fn from_prediction(
        parent_id: String,
        child_id: String,
        input_parameters: InputParameters,
        measurements_cm: MeasurementMap,
    ) -> Self {
        let now = Utc::now().to_rfc3339();
        let measurements_inches = inches_from(&measurements_cm);
        Self {
            parent_id,
            child_id,
            input_parameters,
            measurements_cm,
            measurements_inches,
            prediction_timestamp: now.clone(),
            last_updated: now,
            is_predicted: true,
            is_manually_updated: false,
        }
    }

    /// Merge manual edits into the cm map and refresh all derived state
    ///
    /// Only the supplied keys change; the inch map is recomputed in full so
    /// it is never partially stale. `is_predicted` is left untouched.
    pub fn apply_manual_update(&mut self, partial: &MeasurementMap) {
        for (key, value) in partial {
            self.measurements_cm.insert(key.clone(), round2(*value));
        }
        self.measurements_inches = inches_from(&self.measurements_cm);
        self.last_updated = Utc::now().to_rfc3339();
        self.is_manually_updated = true;
    }
}

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Derive the inch map from a cm map (2.54 cm per inch, rounded to 2 places)
pub fn inches_from(cm: &MeasurementMap) -> MeasurementMap {
    cm.iter()
        .map(|(key, value)| (key.clone(), round2(value / 2.54)))
        .collect()
}
