//! # FitForm Common Library
//!
//! Shared code for the FitForm measurement service including:
//! - Error taxonomy and result alias
//! - Domain types (gender, measurement records, unit conversion)
//! - Data folder resolution

pub mod config;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{Gender, GenderInput, InputParameters, MeasurementMap, MeasurementRecord};
