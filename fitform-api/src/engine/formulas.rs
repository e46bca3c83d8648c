//! Anthropometric formula estimators
//!
//! Pure age-banded linear-in-height formulas in two tiers: tier 1 covers
//! chest/shoulder/sleeve, tier 2 the secondary garment lengths (inseam,
//! kurta length, neck depths, ...). Brand data and the statistical
//! predictor never produce these; the orchestrator always derives them
//! here.

use fitform_common::types::round2;
use fitform_common::{Gender, MeasurementMap};

/// Tier-1 output: primary upper-body measurements in cm, unrounded
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoreSizes {
    pub chest: f64,
    pub shoulder: f64,
    pub sleeve: f64,
}

/// Tier-1 formulas: chest, shoulder and sleeve from age, gender and height
pub fn core_sizes(age: f64, gender: Gender, height: f64) -> CoreSizes {
    let chest = height
        * if age < 2.0 {
            0.51
        } else if age < 6.0 {
            0.49
        } else {
            0.47
        };

    let shoulder = height
        * match gender {
            Gender::Male => {
                if age < 6.0 {
                    0.22
                } else {
                    0.23
                }
            }
            Gender::Female => {
                if age < 6.0 {
                    0.21
                } else {
                    0.22
                }
            }
        };

    let sleeve = height
        * if age < 2.0 {
            0.28
        } else if age < 6.0 {
            0.30
        } else {
            0.32
        };

    CoreSizes {
        chest,
        shoulder,
        sleeve,
    }
}

/// Tier-2 formulas: secondary garment lengths, rounded to 2 places
///
/// Gender and the caller's chest are accepted but unused; the neck depths
/// key off a fixed height ratio (height * 0.52), not the tier-1 chest.
pub fn secondary_lengths(
    age: f64,
    _gender: Gender,
    height: f64,
    _chest: f64,
) -> MeasurementMap {
    let band = |young: f64, middle: f64, older: f64| {
        if age <= 5.0 {
            young
        } else if age <= 10.0 {
            middle
        } else {
            older
        }
    };

    let inseam = height * band(0.38, 0.42, 0.45);
    let top_length = height * band(0.35, 0.38, 0.40);
    let kurta_length = height * band(0.40, 0.43, 0.46);
    let pant_length = inseam + height * 0.05;
    let knee_length = height * band(0.26, 0.27, 0.28);
    let midi_length = height * band(0.35, 0.40, 0.45);
    let ankle_length = height * band(0.48, 0.50, 0.55);
    let maxi_length = height * band(0.55, 0.58, 0.60);
    let armhole = height * 0.12;

    let chest = height * 0.52;
    let neck_depth_front = (chest * 0.115).max(2.5);
    let neck_depth_back = (chest * 0.07).max(1.5);

    [
        ("Inseam", inseam),
        ("Armhole", armhole),
        ("TopLength", top_length),
        ("KurtaLength", kurta_length),
        ("PantLength", pant_length),
        ("KneeLength", knee_length),
        ("MidiLength", midi_length),
        ("AnkleLength", ankle_length),
        ("MaxiLength", maxi_length),
        ("NeckDepthBack", neck_depth_back),
        ("NeckDepthFront", neck_depth_front),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), round2(value)))
    .collect()
}
