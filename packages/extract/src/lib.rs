#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Structured metadata extraction from building-plan text.
//!
//! Drawings, specification sheets and schedules arrive here already
//! converted to plain text. This crate reads that text with ordered regex
//! tables and keyword vocabularies and produces the records a compliance
//! check compares against building-code thresholds: classified dimensions,
//! window and door identifiers, schedule entries with their own
//! measurements and materials, schedule quality scores, and structural
//! heights.
//!
//! Extractors never fail on input. A pattern that cannot be applied is
//! logged through the [`log`] facade and contributes nothing, and a failed
//! aggregate extraction returns an empty record with its `error` field set.
//! [`extract_all`] runs every extractor over one document.

pub mod areas;
pub mod dimensions;
pub mod identifiers;
pub mod items;
pub mod options;
pub mod pattern;
pub mod quality;
pub mod schedule;
pub mod structural;
pub mod text_quality;
pub mod vocabulary;

pub use areas::{extract_areas, extract_floor_count};
pub use dimensions::{
    extract_dimension_values, extract_dimension_values_with, extract_dimensions,
    extract_dimensions_with,
};
pub use identifiers::{
    extract_door_identifiers, extract_door_identifiers_with, extract_window_identifiers,
    extract_window_identifiers_with,
};
pub use options::ExtractionOptions;
pub use pattern::PatternError;
pub use plan_extract_models as models;
pub use quality::{assess_schedule_quality, check_cross_referencing, check_sequential_numbering};
pub use schedule::{
    calculate_schedule_completeness, extract_schedule_info, extract_schedule_info_with,
    try_extract_schedule_info,
};
pub use structural::{extract_structural_heights, try_extract_structural_heights};
pub use text_quality::assess_text_quality;

use plan_extract_models::ExtractionMetadata;

/// Errors that abort an aggregate extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// A pattern the extraction cannot do without failed.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// Extraction options could not be parsed.
    #[error("Invalid extraction config: {0}")]
    Config(#[from] toml::de::Error),

    /// The embedded keyword tables could not be loaded.
    #[error("Invalid vocabulary: {0}")]
    Vocabulary(String),
}

/// Runs every extractor over `text` with default options.
#[must_use]
pub fn extract_all(text: &str) -> ExtractionMetadata {
    extract_all_with(text, &ExtractionOptions::default())
}

/// Runs every extractor over `text`.
///
/// Schedule quality is assessed from the items of the extracted schedule.
#[must_use]
pub fn extract_all_with(text: &str, options: &ExtractionOptions) -> ExtractionMetadata {
    let schedule = extract_schedule_info_with(text, options);
    let schedule_quality =
        assess_schedule_quality(&schedule.windows, &schedule.doors, &schedule.ironmongery);

    ExtractionMetadata {
        dimensions: extract_dimensions_with(text, options),
        areas: extract_areas(text),
        floor_counts: extract_floor_count(text),
        window_identifiers: extract_window_identifiers_with(text, options),
        door_identifiers: extract_door_identifiers_with(text, options),
        schedule,
        schedule_quality,
        structural_heights: extract_structural_heights(text),
        text_quality: assess_text_quality(text),
    }
}

#[cfg(test)]
mod tests {
    use plan_extract_models::{ScheduleInfo, StructuralHeights, TextQuality};

    use super::*;

    #[test]
    fn empty_text_yields_empty_results_everywhere() {
        assert!(extract_dimensions("").is_empty());
        assert!(extract_dimension_values("").is_empty());
        assert!(extract_window_identifiers("").is_empty());
        assert!(extract_door_identifiers("").is_empty());
        assert!(extract_areas("").is_empty());
        assert!(extract_floor_count("").is_empty());
        assert_eq!(extract_schedule_info(""), ScheduleInfo::default());
        assert_eq!(extract_structural_heights(""), StructuralHeights::default());
        assert_eq!(assess_text_quality(""), TextQuality::Poor);

        let metadata = extract_all("");
        assert!(metadata.dimensions.is_empty());
        assert_eq!(metadata.schedule, ScheduleInfo::default());
        assert_eq!(metadata.structural_heights, StructuralHeights::default());
        assert_eq!(
            metadata.schedule_quality.issues,
            vec!["No window or door schedules found", "Schedules are incomplete"]
        );
    }

    #[test]
    fn aggregate_combines_every_extractor() {
        let text = "WINDOW SCHEDULE\n\
            WO1 900mm x 2100mm aluminum window in kitchen\n\
            LINTEL LEVEL 2.1m WALL PLATE LEVEL 2.4m\n\
            A building with 2 floors, total area 120 m2";
        let metadata = extract_all_with(text, &ExtractionOptions::deduplicated());

        assert_eq!(metadata.window_identifiers, vec!["WO1"]);
        assert!(metadata.schedule.has_window_schedule);
        assert_eq!(metadata.schedule.windows.len(), 1);
        assert_eq!(metadata.structural_heights.implied_room_height, Some(2.4));
        assert_eq!(metadata.floor_counts, vec![2]);
        assert_eq!(metadata.areas, vec![120.0]);
        assert!(
            metadata
                .schedule_quality
                .strengths
                .contains(&"Window schedule present".to_owned())
        );
    }

    #[test]
    fn metadata_serializes_with_wire_names() {
        let metadata = extract_all("D1 timber door FR60");
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["schedule"]["hasSchedule"], true);
        assert_eq!(json["schedule"]["doors"][0]["fireRating"], "FR60");
        assert_eq!(json["text_quality"], "poor");
    }

    #[test]
    fn config_errors_are_reported() {
        let err = ExtractionOptions::from_toml_str("dedupe_overlapping = [").unwrap_err();
        assert!(err.to_string().starts_with("Invalid extraction config"));
    }
}
