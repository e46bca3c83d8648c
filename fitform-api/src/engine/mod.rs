//! Measurement derivation engine
//!
//! Composes the brand resolver, statistical predictor and formula
//! estimators into one answer per prediction request: brand data takes
//! priority, the predictor fills the gaps, and chest/shoulder/sleeve plus
//! the secondary lengths always come from formulas unless brand already
//! supplied chest.

use std::sync::Arc;

use tracing::{error, info};

use fitform_common::types::{round2, InputParameters};
use fitform_common::{Error, MeasurementMap, MeasurementRecord, Result};

use crate::model::BodyModel;
use crate::store::MeasurementStore;

pub mod brand;
pub mod dataset;
pub mod formulas;
pub mod validate;

pub use brand::BrandResolver;
pub use validate::{PredictInput, PredictParams};

/// Predictor output keys, positional: first four model outputs
const PREDICTED_KEYS: [&str; 4] = ["Waist", "Hip", "Bicep", "Wrist"];

/// Health snapshot exposed by the engine
#[derive(Debug, Clone, Copy)]
pub struct HealthSnapshot {
    pub model_loaded: bool,
    pub total_users: usize,
}

/// Measurement orchestrator
///
/// All collaborators are injected at construction; the predictor is
/// optional and its absence fails prediction requests fast.
pub struct MeasurementEngine {
    model: Option<Arc<dyn BodyModel>>,
    brands: BrandResolver,
    store: MeasurementStore,
}

impl MeasurementEngine {
    pub fn new(
        model: Option<Arc<dyn BodyModel>>,
        brands: BrandResolver,
        store: MeasurementStore,
    ) -> Self {
        Self {
            model,
            brands,
            store,
        }
    }

    pub fn model_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// Run one prediction request end to end
    ///
    /// Steps are strictly ordered: validate, check the model handle, seed
    /// from brand data, fall back to the predictor when the seed is empty,
    /// then always apply both formula tiers and persist the full record.
    /// A record with no Waist/Hip/Bicep/Wrist (partial brand data) is
    /// accepted, not an error.
    pub fn predict(&self, params: PredictParams) -> Result<MeasurementRecord> {
        let input = validate::validate_predict(params)?;
        let model = self.model.as_deref().ok_or(Error::ModelUnavailable)?;

        let mut measurements = MeasurementMap::new();

        // Case 1: brand available
        if let Some(brand) = input.brand.as_deref() {
            if let Some(found) = self.brands.resolve(brand, input.age, input.gender) {
                for (key, value) in found.entries() {
                    measurements.insert(key.to_string(), value);
                }
            }
        }

        // Case 2: no brand, or brand lookup returned nothing useful
        if measurements.is_empty() {
            let features = [
                input.age,
                f64::from(input.gender.code()),
                input.height,
                input.weight,
            ];
            let outputs = model.predict(&features)?;
            if outputs.len() < PREDICTED_KEYS.len() {
                return Err(Error::Internal(format!(
                    "model returned {} outputs, expected at least {}",
                    outputs.len(),
                    PREDICTED_KEYS.len()
                )));
            }
            for (key, value) in PREDICTED_KEYS.iter().zip(&outputs) {
                measurements.insert((*key).to_string(), round2(*value));
            }
        }

        // Formula tier 1: shoulder and sleeve always win; chest only fills
        // a gap the brand left open.
        let core = formulas::core_sizes(input.age, input.gender, input.height);
        measurements
            .entry("Chest".to_string())
            .or_insert_with(|| round2(core.chest));
        measurements.insert("Shoulder".to_string(), round2(core.shoulder));
        measurements.insert("Sleeve".to_string(), round2(core.sleeve));

        // Formula tier 2: derived lengths, never brand- or model-sourced
        let lengths =
            formulas::secondary_lengths(input.age, input.gender, input.height, core.chest);
        measurements.extend(lengths);

        let record = MeasurementRecord::from_prediction(
            input.parent_id,
            input.child_id,
            InputParameters {
                age: input.age,
                gender: input.gender,
                weight: input.weight,
                height: input.height,
                brand: input.brand,
            },
            measurements,
        );

        // A failed save is logged but the prediction still answers; the
        // caller gets the assembled measurements either way.
        match self.store.upsert(record.clone()) {
            Ok(()) => info!(
                "Measurements saved for {}/{}",
                record.parent_id, record.child_id
            ),
            Err(e) => error!(
                "Failed to save measurements for {}/{}: {e}",
                record.parent_id, record.child_id
            ),
        }

        Ok(record)
    }

    /// Merge manual edits into an existing record
    pub fn update(
        &self,
        parent_id: &str,
        child_id: &str,
        partial: &MeasurementMap,
    ) -> Result<MeasurementRecord> {
        validate::validate_ids(parent_id, child_id)?;
        self.store.update_measurements(parent_id, child_id, partial)
    }

    /// Fetch one persisted record
    pub fn get(&self, parent_id: &str, child_id: &str) -> Result<MeasurementRecord> {
        self.store.get(parent_id, child_id)
    }

    pub fn health(&self) -> HealthSnapshot {
        HealthSnapshot {
            model_loaded: self.model_loaded(),
            total_users: self.store.parent_count(),
        }
    }
}
