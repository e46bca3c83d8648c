//! File-backed measurement store
//!
//! One JSON document keyed parent_id -> child_id -> record. Every mutation
//! is a whole-store read-modify-write with no locking; concurrent writers
//! race and the last writer wins. Loading never fails: a missing file is an
//! empty store, a corrupt file is logged and treated as empty.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};

use fitform_common::{Error, MeasurementMap, MeasurementRecord, Result};

use crate::engine::validate;

/// Full persisted mapping: parent_id -> child_id -> record
pub type StoreData = BTreeMap<String, BTreeMap<String, MeasurementRecord>>;

/// Whole-file JSON persistence for measurement records
#[derive(Debug, Clone)]
pub struct MeasurementStore {
    path: PathBuf,
}

impl MeasurementStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read the whole persisted mapping
    ///
    /// Missing file means first run; corrupt content is logged and
    /// discarded. Neither raises.
    pub fn load(&self) -> StoreData {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return StoreData::new(),
            Err(e) => {
                warn!("Could not read {}: {e}. Starting with empty data.", self.path.display());
                return StoreData::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(data) => data,
            Err(e) => {
                warn!("Could not decode {}: {e}. Starting with empty data.", self.path.display());
                StoreData::new()
            }
        }
    }

    /// Overwrite the whole persisted mapping
    ///
    /// Writes a sibling temp file first and renames it into place, so a
    /// failed write cannot leave a half-written store behind.
    pub fn save(&self, data: &StoreData) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)
            .map_err(|e| Error::Persistence(format!("encode store: {e}")))?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serialized)
            .map_err(|e| Error::Persistence(format!("write {}: {e}", tmp_path.display())))?;
        fs::rename(&tmp_path, &self.path)
            .map_err(|e| Error::Persistence(format!("rename into {}: {e}", self.path.display())))?;
        Ok(())
    }

    /// Insert or overwrite the record for its parent/child pair
    pub fn upsert(&self, record: MeasurementRecord) -> Result<()> {
        let mut data = self.load();
        data.entry(record.parent_id.clone())
            .or_default()
            .insert(record.child_id.clone(), record);
        self.save(&data)
    }

    /// Fetch one record
    pub fn get(&self, parent_id: &str, child_id: &str) -> Result<MeasurementRecord> {
        self.load()
            .get(parent_id)
            .and_then(|children| children.get(child_id))
            .cloned()
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "Child {child_id} under parent {parent_id} not found"
                ))
            })
    }

    /// Merge manual measurement edits into an existing record
    ///
    /// The record must already exist (predictions create records, updates
    /// never do). Key and value validation runs after the existence check
    /// so an unknown child reports NotFound, not a key error.
    pub fn update_measurements(
        &self,
        parent_id: &str,
        child_id: &str,
        partial: &MeasurementMap,
    ) -> Result<MeasurementRecord> {
        let mut data = self.load();
        let record = data
            .get_mut(parent_id)
            .and_then(|children| children.get_mut(child_id))
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "Child {child_id} under parent {parent_id} not found. Please make a prediction first."
                ))
            })?;

        validate::validate_manual_measurements(partial)?;

        record.apply_manual_update(partial);
        let updated = record.clone();
        self.save(&data)?;
        info!("Measurements updated for {parent_id}/{child_id}");
        Ok(updated)
    }

    /// Number of parents with at least one record (health reporting)
    pub fn parent_count(&self) -> usize {
        self.load().len()
    }
}
