//! Classified measurement extraction.
//!
//! [`DIMENSION_SOURCES`] is an ordered table of patterns, most specific
//! first: explicit "lintel level = X m" phrasings, then abbreviations
//! ("LL: Xm"), then bare keyword-and-number forms, then room heights, and
//! finally two fully generic "<number> m" / "<number> mm" patterns. Every
//! pattern runs independently over the whole text, so one mention can be
//! reported by several patterns. Values are converted to meters using the
//! pattern's unit and kept only when they fall inside the kind's plausible
//! range.

use std::sync::LazyLock;

use plan_extract_models::{Dimension, DimensionKind, LengthUnit};

use crate::ExtractionOptions;
use crate::pattern::{
    Pattern, PatternError, collect_logged, first_number, parse_number, retain_non_overlapping,
};

use plan_extract_models::DimensionKind::{
    CeilingHeight, ClearHeight, Dimension as Generic, FloorToCeiling, GeneralHeight, LintelLevel,
    MaxRoofHeight, WallPlateLevel,
};
use plan_extract_models::LengthUnit::{Meters, Millimeters};

/// Ordered `(kind, unit, pattern)` table. Capture group 1 holds the number.
pub const DIMENSION_SOURCES: &[(DimensionKind, LengthUnit, &str)] = &[
    // ── Lintel level ────────────────────────────────────────────────
    (
        LintelLevel,
        Meters,
        r"(?i)lintel\s*(?:level|height)\s*(?:of|is|:|=)?\s*([0-9]+(?:\.[0-9]+)?)\s*(?:m|meters|meter)",
    ),
    (
        LintelLevel,
        Meters,
        r"LINTEL\s*(?:LEVEL|HEIGHT)\s*(?:OF|IS|:|=)?\s*([0-9]+(?:\.[0-9]+)?)\s*(?:M|METERS|METER)",
    ),
    (
        LintelLevel,
        Meters,
        r"(?i)(?:LL|L\.L\.|LINTEL)\s*(?:=|:|-)\s*([0-9]+(?:\.[0-9]+)?)\s*(?:m|mm|M|MM)",
    ),
    (
        LintelLevel,
        Meters,
        r"LINTEL\s*(?:LEVEL|HEIGHT)?\s*([0-9]+(?:\.[0-9]+)?)\s*(?:m|mm|M|MM)",
    ),
    // ── Wall plate level ────────────────────────────────────────────
    (
        WallPlateLevel,
        Meters,
        r"(?i)wall\s*plate\s*(?:level|height)\s*(?:of|is|:|=)?\s*([0-9]+(?:\.[0-9]+)?)\s*(?:m|meters|meter)",
    ),
    (
        WallPlateLevel,
        Meters,
        r"WALL\s*PLATE\s*(?:LEVEL|HEIGHT)\s*(?:OF|IS|:|=)?\s*([0-9]+(?:\.[0-9]+)?)\s*(?:M|METERS|METER)",
    ),
    (
        WallPlateLevel,
        Meters,
        r"(?i)(?:WP|W\.P\.|WALL\s*PLATE)\s*(?:=|:|-)\s*([0-9]+(?:\.[0-9]+)?)\s*(?:m|mm|M|MM)",
    ),
    (
        WallPlateLevel,
        Meters,
        r"WALL\s*PLATE\s*(?:LEVEL|HEIGHT)?\s*([0-9]+(?:\.[0-9]+)?)\s*(?:m|mm|M|MM)",
    ),
    // ── Maximum roof height ─────────────────────────────────────────
    (
        MaxRoofHeight,
        Meters,
        r"(?i)(?:max|maximum|roof)\s*(?:roof)?\s*height\s*(?:of|is|:|=)?\s*([0-9]+(?:\.[0-9]+)?)\s*(?:m|meters|meter)",
    ),
    (
        MaxRoofHeight,
        Meters,
        r"(?:MAX|MAXIMUM|ROOF)\s*(?:ROOF)?\s*HEIGHT\s*(?:OF|IS|:|=)?\s*([0-9]+(?:\.[0-9]+)?)\s*(?:M|METERS|METER)",
    ),
    (
        MaxRoofHeight,
        Meters,
        r"(?i)(?:MRH|M\.R\.H\.|MAX\s*ROOF)\s*(?:=|:|-)\s*([0-9]+(?:\.[0-9]+)?)\s*(?:m|mm|M|MM)",
    ),
    (
        MaxRoofHeight,
        Meters,
        r"(?:MAX|MAXIMUM|ROOF)\s*(?:ROOF)?\s*(?:LEVEL|HEIGHT)?\s*([0-9]+(?:\.[0-9]+)?)\s*(?:m|mm|M|MM)",
    ),
    // ── Bare keyword followed by a number (elevation annotations) ───
    (LintelLevel, Meters, r"\bLINTEL\b[^0-9]*([0-9]+(?:\.[0-9]+)?)"),
    (WallPlateLevel, Meters, r"\bWALL\s*PLATE\b[^0-9]*([0-9]+(?:\.[0-9]+)?)"),
    (
        MaxRoofHeight,
        Meters,
        r"\bMAX(?:IMUM)?\s*(?:ROOF)?\s*HEIGHT\b[^0-9]*([0-9]+(?:\.[0-9]+)?)",
    ),
    (MaxRoofHeight, Meters, r"\bROOF\s*HEIGHT\b[^0-9]*([0-9]+(?:\.[0-9]+)?)"),
    // ── Room heights ────────────────────────────────────────────────
    (
        CeilingHeight,
        Meters,
        r"(?i)ceiling\s*(?:height)?\s*(?:of|is|:|=)?\s*([0-9]+(?:\.[0-9]+)?)\s*(?:m|meters|meter)",
    ),
    (
        CeilingHeight,
        Meters,
        r"CEILING\s*(?:HEIGHT)?\s*(?:OF|IS|:|=)?\s*([0-9]+(?:\.[0-9]+)?)\s*(?:M|METERS|METER)",
    ),
    (
        ClearHeight,
        Meters,
        r"(?i)clear\s*height\s*(?:of|is|:|=)?\s*([0-9]+(?:\.[0-9]+)?)\s*(?:m|meters|meter)",
    ),
    (
        ClearHeight,
        Meters,
        r"CLEAR\s*HEIGHT\s*(?:OF|IS|:|=)?\s*([0-9]+(?:\.[0-9]+)?)\s*(?:M|METERS|METER)",
    ),
    (
        FloorToCeiling,
        Meters,
        r"(?i)floor\s*(?:to|-)\s*ceiling\s*(?:height)?\s*(?:of|is|:|=)?\s*([0-9]+(?:\.[0-9]+)?)\s*(?:m|meters|meter)",
    ),
    (
        FloorToCeiling,
        Meters,
        r"FLOOR\s*(?:TO|-)\s*CEILING\s*(?:HEIGHT)?\s*(?:OF|IS|:|=)?\s*([0-9]+(?:\.[0-9]+)?)\s*(?:M|METERS|METER)",
    ),
    // ── General heights ─────────────────────────────────────────────
    (
        GeneralHeight,
        Meters,
        r"(?i)height\s*(?:of|is|:|=)?\s*([0-9]+(?:\.[0-9]+)?)\s*(?:m|meters|meter)",
    ),
    (
        GeneralHeight,
        Meters,
        r"(?i)([0-9]+(?:\.[0-9]+)?)\s*(?:m|meters|meter)\s*(?:height|tall|high)",
    ),
    (
        GeneralHeight,
        Millimeters,
        r"(?i)([0-9]+(?:,[0-9]+)?)\s*(?:mm|millimeters|millimeter)\s*(?:height|tall|high)",
    ),
    // ── Last resort: any metric measurement ─────────────────────────
    (Generic, Meters, r"([0-9]+(?:\.[0-9]+)?)\s*(?:m|meters|meter)"),
    (Generic, Millimeters, r"([0-9]+(?:,[0-9]+)?)\s*(?:mm|millimeters|millimeter)"),
];

/// One compiled entry of [`DIMENSION_SOURCES`].
#[derive(Debug)]
pub struct DimensionPattern {
    pub kind: DimensionKind,
    pub unit: LengthUnit,
    pub pattern: Pattern,
}

static DIMENSION_PATTERNS: LazyLock<Vec<DimensionPattern>> = LazyLock::new(|| {
    DIMENSION_SOURCES
        .iter()
        .map(|&(kind, unit, source)| DimensionPattern {
            kind,
            unit,
            pattern: Pattern::new(source),
        })
        .collect()
});

/// Applies one pattern to `text`, keeping plausible values only.
///
/// # Errors
///
/// Returns [`PatternError`] if the pattern did not compile.
pub fn scan_pattern(entry: &DimensionPattern, text: &str) -> Result<Vec<Dimension>, PatternError> {
    let re = entry.pattern.regex()?;
    let mut dimensions = Vec::new();

    for caps in re.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let raw = caps
            .get(1)
            .map(|m| m.as_str())
            .or_else(|| first_number(whole.as_str()));
        let Some(value) = raw.and_then(parse_number) else {
            continue;
        };

        let meters = entry.unit.to_meters(value);
        if entry.kind.is_plausible(meters) {
            dimensions.push(Dimension {
                value: meters,
                kind: entry.kind,
                raw_text: whole.as_str().to_owned(),
                span: whole.range(),
            });
        }
    }

    Ok(dimensions)
}

/// Extracts every classified dimension with default options.
#[must_use]
pub fn extract_dimensions(text: &str) -> Vec<Dimension> {
    extract_dimensions_with(text, &ExtractionOptions::default())
}

/// Extracts every classified dimension.
///
/// Results follow table order. Without de-duplication a single mention can
/// appear once per pattern that reads it.
#[must_use]
pub fn extract_dimensions_with(text: &str, options: &ExtractionOptions) -> Vec<Dimension> {
    let results = DIMENSION_PATTERNS
        .iter()
        .map(|entry| scan_pattern(entry, text));
    let dimensions = collect_logged("extract_dimensions", results);

    let dimensions = if options.dedupe_overlapping {
        retain_non_overlapping(dimensions, |d| &d.span)
    } else {
        dimensions
    };

    log::debug!("Extracted {} dimensions", dimensions.len());
    dimensions
}

/// The numeric values of [`extract_dimensions`], in meters.
#[must_use]
pub fn extract_dimension_values(text: &str) -> Vec<f64> {
    extract_dimension_values_with(text, &ExtractionOptions::default())
}

/// The numeric values of [`extract_dimensions_with`], in meters.
#[must_use]
pub fn extract_dimension_values_with(text: &str, options: &ExtractionOptions) -> Vec<f64> {
    extract_dimensions_with(text, options)
        .into_iter()
        .map(|d| d.value)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn of_kind(dimensions: &[Dimension], kind: DimensionKind) -> Vec<f64> {
        dimensions
            .iter()
            .filter(|d| d.kind == kind)
            .map(|d| d.value)
            .collect()
    }

    #[test]
    fn all_patterns_compile() {
        for entry in DIMENSION_PATTERNS.iter() {
            assert!(
                entry.pattern.regex().is_ok(),
                "pattern failed to compile: {}",
                entry.pattern.source()
            );
        }
    }

    #[test]
    fn table_ends_with_generic_patterns() {
        let n = DIMENSION_SOURCES.len();
        assert_eq!(DIMENSION_SOURCES[n - 2].0, DimensionKind::Dimension);
        assert_eq!(DIMENSION_SOURCES[n - 1].0, DimensionKind::Dimension);
        assert_eq!(DIMENSION_SOURCES[n - 1].1, LengthUnit::Millimeters);
        assert!(
            DIMENSION_SOURCES[..n - 2]
                .iter()
                .all(|(kind, _, _)| *kind != DimensionKind::Dimension)
        );
    }

    #[test]
    fn explicit_lintel_level() {
        let dims = extract_dimensions("Lintel level of 2.1 m above FFL");
        let lintels = of_kind(&dims, DimensionKind::LintelLevel);
        assert!(!lintels.is_empty());
        assert!(approx_eq(lintels[0], 2.1));
    }

    #[test]
    fn abbreviated_wall_plate() {
        let dims = extract_dimensions("WP: 2.7m");
        let plates = of_kind(&dims, DimensionKind::WallPlateLevel);
        assert_eq!(plates.len(), 1);
        assert!(approx_eq(plates[0], 2.7));
    }

    #[test]
    fn millimeter_dimension_converts_to_meters() {
        let dims = extract_dimensions("opening 2400mm");
        let generic: Vec<&Dimension> = dims
            .iter()
            .filter(|d| d.kind == DimensionKind::Dimension)
            .collect();
        assert_eq!(generic.len(), 1);
        assert!(approx_eq(generic[0].value, 2.4));
        assert_eq!(generic[0].raw_text, "2400mm");
    }

    #[test]
    fn millimeter_height_converts_to_meters() {
        let dims = extract_dimensions("parapet 1200mm high");
        let heights = of_kind(&dims, DimensionKind::GeneralHeight);
        assert_eq!(heights.len(), 1);
        assert!(approx_eq(heights[0], 1.2));
    }

    #[test]
    fn implausible_values_are_dropped() {
        // 9.5 is outside the lintel range but inside the generic one.
        let dims = extract_dimensions("LINTEL LEVEL 9.5m");
        assert!(of_kind(&dims, DimensionKind::LintelLevel).is_empty());
        assert_eq!(of_kind(&dims, DimensionKind::Dimension), vec![9.5]);

        // 75 m is implausible for everything.
        assert!(extract_dimensions("75m").is_empty());
    }

    #[test]
    fn every_value_is_inside_its_kind_range() {
        let text = "LINTEL LEVEL 2.1m WALL PLATE 2.4m MAX ROOF HEIGHT 6.5m \
                    ceiling height 2.7m clear height 2.5 m floor to ceiling 2.6m \
                    height of 1.1m 900mm 45m 120m LL: 1.2m ROOF HEIGHT 12";
        let dims = extract_dimensions(text);
        assert!(!dims.is_empty());
        for dim in &dims {
            assert!(
                dim.kind.is_plausible(dim.value),
                "{:?} value {} outside range",
                dim.kind,
                dim.value
            );
        }
    }

    #[test]
    fn case_sensitive_patterns_skip_lowercase() {
        // The bare "LINTEL <n>" form only matches upper-case annotations.
        let upper = extract_dimensions("LINTEL 2.1m");
        let lower = extract_dimensions("lintel 2.1m");
        assert!(!of_kind(&upper, DimensionKind::LintelLevel).is_empty());
        assert!(of_kind(&lower, DimensionKind::LintelLevel).is_empty());
    }

    #[test]
    fn duplicates_are_kept_by_default() {
        let dims = extract_dimensions("LINTEL LEVEL 2.1m");
        let lintels = of_kind(&dims, DimensionKind::LintelLevel);
        // Case-insensitive, upper-case, bare and keyword forms all agree.
        assert!(lintels.len() > 1);
        assert!(lintels.iter().all(|v| approx_eq(*v, 2.1)));
        // The generic pattern also reports the same "2.1m".
        assert_eq!(of_kind(&dims, DimensionKind::Dimension), vec![2.1]);
    }

    #[test]
    fn dedupe_keeps_most_specific_reading() {
        let dims = extract_dimensions_with("LINTEL LEVEL 2.1m", &ExtractionOptions::deduplicated());
        assert_eq!(dims.len(), 1);
        assert_eq!(dims[0].kind, DimensionKind::LintelLevel);
        assert_eq!(dims[0].raw_text, "LINTEL LEVEL 2.1m");
    }

    #[test]
    fn dedupe_keeps_disjoint_mentions() {
        let dims = extract_dimensions_with(
            "LINTEL LEVEL 2.1m WALL PLATE LEVEL 2.4m",
            &ExtractionOptions::deduplicated(),
        );
        let kinds: Vec<DimensionKind> = dims.iter().map(|d| d.kind).collect();
        assert!(kinds.contains(&DimensionKind::LintelLevel));
        assert!(kinds.contains(&DimensionKind::WallPlateLevel));
        for (i, a) in dims.iter().enumerate() {
            for b in &dims[i + 1..] {
                assert!(a.span.end <= b.span.start || b.span.end <= a.span.start);
            }
        }
    }

    #[test]
    fn values_wrapper_matches_dimensions() {
        let text = "ceiling height 2.7m and 3m";
        let values = extract_dimension_values(text);
        let dims: Vec<f64> = extract_dimensions(text).iter().map(|d| d.value).collect();
        assert_eq!(values, dims);
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(extract_dimensions("").is_empty());
        assert!(extract_dimension_values("").is_empty());
    }
}
