//! Tolerant cell parsing for the brand reference dataset
//!
//! The size chart is semi-structured: measurement cells may hold a single
//! number, a dashed range ("71–78", en-dash or hyphen), or be blank; age
//! cells may additionally be ampersand-joined lists ("10&11"). Parsing
//! never errors, it yields `None`/`false` for anything unrecognizable.

use once_cell::sync::Lazy;
use regex::Regex;

static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+\.?\d*").expect("hardcoded number pattern"));

static INTEGER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("hardcoded int pattern"));

/// Reduce a measurement cell to a single representative value
///
/// All numeric substrings are extracted; more than one collapses to the
/// arithmetic mean (so "71–78" becomes 74.5), exactly one is returned as-is,
/// none yields `None`.
pub fn parse_range(cell: &str) -> Option<f64> {
    let numbers: Vec<f64> = NUMBER_RE
        .find_iter(cell)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();

    match numbers.len() {
        0 => None,
        1 => Some(numbers[0]),
        n => Some(numbers.iter().sum::<f64>() / n as f64),
    }
}

/// Check whether `target_age` falls into a dataset age cell
///
/// Ampersand lists match on membership, dashed ranges on inclusive
/// containment, plain integers on equality; the target is truncated to an
/// integer first. Unparseable cells never match.
pub fn age_matches(cell: &str, target_age: f64) -> bool {
    let cell = cell.trim();
    let target = target_age as i64;

    // Lists like '10&11' or '4&5'
    if cell.contains('&') {
        return integers_in(cell).any(|age| age == target);
    }

    // Ranges like '104–110' (en-dash or hyphen)
    if cell.contains('–') || cell.contains('-') {
        let bounds: Vec<i64> = integers_in(cell).collect();
        if bounds.len() == 2 {
            return bounds[0] <= target && target <= bounds[1];
        }
        return false;
    }

    // Single number like '120'
    if !cell.is_empty() && cell.chars().all(|c| c.is_ascii_digit()) {
        return cell.parse::<i64>().map(|age| age == target).unwrap_or(false);
    }

    false
}

fn integers_in(cell: &str) -> impl Iterator<Item = i64> + '_ {
    INTEGER_RE
        .find_iter(cell)
        .filter_map(|m| m.as_str().parse().ok())
}
