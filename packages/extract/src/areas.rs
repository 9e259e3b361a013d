//! Floor areas and storey counts.

use std::sync::LazyLock;

use crate::pattern::{Pattern, PatternError, collect_logged, compile_all, parse_number};

static AREA: LazyLock<Pattern> =
    LazyLock::new(|| Pattern::new(r"([0-9]+(?:\.[0-9]+)?)\s*(?:sq\.?\s+m|square\s+meters?|m2|m²)"));

static FLOOR_COUNTS: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)(?:building|structure) with ([0-9]+) (?:floor|storey|story|level)s?",
        r"(?i)([0-9]+)(?:-| )(?:floor|storey|story|level) (?:building|structure)",
        r"(?i)([0-9]+)[\s-]store(?:y|ies)",
        r"(?i)(?:floor|storey|story|level)s?: ([0-9]+)",
        r"(?i)(?:number of|total) (?:floor|storey|story|level)s?: ([0-9]+)",
    ])
});

fn scan_areas(text: &str) -> Result<Vec<f64>, PatternError> {
    Ok(AREA
        .regex()?
        .captures_iter(text)
        .filter_map(|caps| parse_number(caps.get(1)?.as_str()))
        .collect())
}

fn scan_floor_counts(pattern: &Pattern, text: &str) -> Result<Vec<u32>, PatternError> {
    Ok(pattern
        .regex()?
        .captures_iter(text)
        .filter_map(|caps| caps.get(1)?.as_str().parse().ok())
        .collect())
}

/// Area figures in square meters ("45 sq m", "12.5 m²"), as written.
#[must_use]
pub fn extract_areas(text: &str) -> Vec<f64> {
    collect_logged("extract_areas", [scan_areas(text)])
}

/// Storey counts ("3-storey building", "floors: 2").
///
/// Every phrasing is tried, so a count can be reported more than once.
#[must_use]
pub fn extract_floor_count(text: &str) -> Vec<u32> {
    let counts = collect_logged(
        "extract_floor_count",
        FLOOR_COUNTS
            .iter()
            .map(|pattern| scan_floor_counts(pattern, text)),
    );
    log::debug!("Found {} floor counts", counts.len());
    counts
}
