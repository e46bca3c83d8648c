//! Brand size-chart lookup
//!
//! Resolves chest/waist/hip for a brand+age+gender from the reference CSV.
//! The chart is re-read and re-parsed on every call; any read or parse
//! problem degrades to "no brand data" so the caller falls back to the
//! statistical predictor.

use std::fs;
use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, error, warn};

use fitform_common::Gender;

use super::dataset::{age_matches, parse_range};

/// Gender marker embedded in H&M row labels, e.g. "H&M (B)"
static GENDER_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\((B|G)\)").expect("hardcoded marker pattern"));

/// Reference measurements found for a brand row
///
/// Any field may be absent individually when its column was blank or
/// unparseable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrandMeasurements {
    pub chest: Option<f64>,
    pub waist: Option<f64>,
    pub hip: Option<f64>,
}

impl BrandMeasurements {
    /// Present values keyed by their measurement names
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [
            ("Chest", self.chest),
            ("Waist", self.waist),
            ("Hip", self.hip),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
    }
}

/// One row of the size chart, fields kept raw for tolerant parsing
#[derive(Debug, Clone)]
struct ChartRow {
    brand: String,
    age: String,
    chest: String,
    waist: String,
    hips: String,
}

/// Brand size-chart resolver
#[derive(Debug, Clone)]
pub struct BrandResolver {
    dataset_path: PathBuf,
}

impl BrandResolver {
    pub fn new(dataset_path: PathBuf) -> Self {
        Self { dataset_path }
    }

    /// Look up reference measurements for a brand, age and gender
    ///
    /// Returns `None` when the chart is unreadable or no row matches; both
    /// are soft failures logged here, never surfaced as errors.
    pub fn resolve(&self, brand: &str, age: f64, gender: Gender) -> Option<BrandMeasurements> {
        let raw = match fs::read(&self.dataset_path) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(
                    "Failed to read brand dataset {}: {e}",
                    self.dataset_path.display()
                );
                return None;
            }
        };
        // Tolerate non-UTF-8 source encodings in the chart
        let text = String::from_utf8_lossy(&raw);

        let rows = match parse_rows(&text) {
            Ok(rows) => rows,
            Err(e) => {
                error!(
                    "Failed to parse brand dataset {}: {e}",
                    self.dataset_path.display()
                );
                return None;
            }
        };

        debug!("Brand lookup: brand={brand}, age={age}, gender={}", gender.as_str());

        let brand_lower = brand.to_lowercase();
        let candidates: Vec<&ChartRow> = if brand_lower.contains("h&m") {
            // H&M keeps one row per gender, marked (B)/(G) in the label.
            // If no row carries the requested marker, fall back to every
            // H&M row rather than failing.
            let marker = match gender {
                Gender::Male => "B",
                Gender::Female => "G",
            };
            let all_hm: Vec<&ChartRow> = rows
                .iter()
                .filter(|row| row.brand.to_lowercase().contains("h&m"))
                .collect();
            let by_gender: Vec<&ChartRow> = all_hm
                .iter()
                .copied()
                .filter(|row| {
                    GENDER_MARKER_RE
                        .captures(&row.brand)
                        .is_some_and(|captures| &captures[1] == marker)
                })
                .collect();
            if by_gender.is_empty() {
                all_hm
            } else {
                by_gender
            }
        } else {
            rows.iter()
                .filter(|row| row.brand.to_lowercase().contains(&brand_lower))
                .collect()
        };

        let row = candidates
            .into_iter()
            .find(|row| age_matches(&row.age, age));

        let Some(row) = row else {
            warn!("No matching measurements found for brand '{brand}' and age {age}");
            return None;
        };

        let found = BrandMeasurements {
            chest: parse_range(&row.chest),
            waist: parse_range(&row.waist),
            hip: parse_range(&row.hips),
        };
        debug!("Matched row for '{}': {:?}", row.brand, found);
        Some(found)
    }
}

/// Read the chart rows, locating columns by header name
///
/// Column order is not contractual; missing columns read as blank cells.
fn parse_rows(text: &str) -> Result<Vec<ChartRow>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|header| header.trim().eq_ignore_ascii_case(name))
    };

    let brand_col = column("Brand");
    let age_col = column("Age (Years)");
    let chest_col = column("Chest (cm)");
    let waist_col = column("Waist (cm)");
    let hips_col = column("Hips (cm)");

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let field = |col: Option<usize>| {
            col.and_then(|i| record.get(i))
                .unwrap_or_default()
                .to_string()
        };
        rows.push(ChartRow {
            brand: field(brand_col),
            age: field(age_col),
            chest: field(chest_col),
            waist: field(waist_col),
            hips: field(hips_col),
        });
    }
    Ok(rows)
}
