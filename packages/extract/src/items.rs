//! Per-entry rules applied to a single schedule item's text.
//!
//! Dimensions here use their own width/height/"W x H" patterns with a
//! 0.3–3.0 m window rather than the document-wide dimension table, since
//! an opening is never taller than a storey.

use std::ops::RangeInclusive;
use std::sync::LazyLock;

use plan_extract_models::{DimensionRole, ItemDimension, LengthUnit};
use regex::Captures;

use crate::pattern::{Pattern, PatternError, any_match_logged, collect_logged, compile_all};
use crate::vocabulary::Vocabulary;

/// Plausible width or height of a single opening, in meters.
pub const OPENING_RANGE: RangeInclusive<f64> = 0.3..=3.0;

static WIDTH: LazyLock<Pattern> = LazyLock::new(|| {
    Pattern::new(r"(?i)(?:width|w|wide|breadth)\s*[=:]*\s*([0-9]+(?:\.[0-9]+)?)\s*(mm|m)")
});

static HEIGHT: LazyLock<Pattern> = LazyLock::new(|| {
    Pattern::new(r"(?i)(?:height|h|high|ht)\s*[=:]*\s*([0-9]+(?:\.[0-9]+)?)\s*(mm|m)")
});

/// "900 x 2100", "900mm x 2100mm", "0.9 by 2.1 m".
static COMBINED: LazyLock<Pattern> = LazyLock::new(|| {
    Pattern::new(r"(?i)([0-9]+(?:\.[0-9]+)?)\s*(mm|m)?\s*(?:x|×|by)\s*([0-9]+(?:\.[0-9]+)?)\s*(mm|m)?")
});

static LOCATIONS: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    compile_all(&[
        r"\b(?:in|at|for)\s+(?:the\s+)?(\w+\s+\w+(?:\s+\w+)?)",
        r"(\w+\s+\w+(?:\s+\w+)?)\s+(?:area|room|space)",
        r"location\s*[:-]?\s*(\w+\s+\w+(?:\s+\w+)?)",
    ])
});

static DIMENSION_HINTS: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)(?:width|height|w|h)\s*[=:]*\s*[0-9]+",
        r"(?i)[0-9]+\s*(?:mm|m)?\s*(?:x|×|by)\s*[0-9]+",
    ])
});

static VENTILATION_DETAILS: LazyLock<Pattern> =
    LazyLock::new(|| Pattern::new(r"(?i)\b(?:ventilation|opening|openable|airflow)\b"));

static NATURAL_LIGHT_DETAILS: LazyLock<Pattern> = LazyLock::new(|| {
    Pattern::new(r"(?i)\b(?:natural\s*light|daylight|light\s*transmission|glazing)\b")
});

fn unit_of(caps: &Captures<'_>, groups: &[usize]) -> Option<LengthUnit> {
    let units: Vec<&str> = groups
        .iter()
        .filter_map(|&i| caps.get(i).map(|m| m.as_str()))
        .collect();
    if units.iter().any(|u| u.eq_ignore_ascii_case("mm")) {
        Some(LengthUnit::Millimeters)
    } else if units.is_empty() {
        None
    } else {
        Some(LengthUnit::Meters)
    }
}

fn parse(caps: &Captures<'_>, group: usize) -> Option<f64> {
    caps.get(group)?.as_str().parse::<f64>().ok()
}

fn scan_single(
    pattern: &Pattern,
    role: DimensionRole,
    text: &str,
) -> Result<Vec<ItemDimension>, PatternError> {
    let mut dimensions = Vec::new();
    for caps in pattern.regex()?.captures_iter(text) {
        let Some(value) = parse(&caps, 1) else {
            continue;
        };
        let unit = unit_of(&caps, &[2]).unwrap_or(LengthUnit::Meters);
        let meters = unit.to_meters(value);
        if OPENING_RANGE.contains(&meters) {
            dimensions.push(ItemDimension {
                role,
                value: meters,
                raw_text: caps[0].to_owned(),
            });
        }
    }
    Ok(dimensions)
}

fn scan_combined(text: &str) -> Result<Vec<ItemDimension>, PatternError> {
    let mut dimensions = Vec::new();
    for caps in COMBINED.regex()?.captures_iter(text) {
        let (Some(first), Some(second)) = (parse(&caps, 1), parse(&caps, 3)) else {
            continue;
        };
        // Unitless schedule figures in the hundreds are millimeters.
        let unit = unit_of(&caps, &[2, 4]).unwrap_or(if first >= 100.0 || second >= 100.0 {
            LengthUnit::Millimeters
        } else {
            LengthUnit::Meters
        });
        let first = unit.to_meters(first);
        let second = unit.to_meters(second);
        let width = first.min(second);
        let height = first.max(second);

        if OPENING_RANGE.contains(&width) && OPENING_RANGE.contains(&height) {
            let raw_text = caps[0].to_owned();
            dimensions.push(ItemDimension {
                role: DimensionRole::Width,
                value: width,
                raw_text: raw_text.clone(),
            });
            dimensions.push(ItemDimension {
                role: DimensionRole::Height,
                value: height,
                raw_text,
            });
        }
    }
    Ok(dimensions)
}

/// Width and height measurements written in one item's text.
///
/// In a combined "A x B" figure the smaller number is taken as the width.
#[must_use]
pub fn item_dimensions(text: &str) -> Vec<ItemDimension> {
    collect_logged(
        "item_dimensions",
        [
            scan_single(&WIDTH, DimensionRole::Width, text),
            scan_single(&HEIGHT, DimensionRole::Height, text),
            scan_combined(text),
        ],
    )
}

/// Location of an item: a positional phrase ("in the master bedroom"),
/// otherwise the first known room name in the text.
#[must_use]
pub fn item_location(vocab: &Vocabulary, text: &str) -> Option<String> {
    let lower = text.to_lowercase();

    for pattern in LOCATIONS.iter() {
        match pattern.captures(&lower) {
            Ok(Some(caps)) => {
                if let Some(location) = caps
                    .get(1)
                    .map(|m| m.as_str().trim())
                    .filter(|location| !vocab.is_false_location(location))
                {
                    return Some(location.to_owned());
                }
            }
            Ok(None) => {}
            Err(e) => log::error!("Error in item_location: {e}"),
        }
    }

    vocab.room_in(&lower).map(str::to_owned)
}

/// Whether the item text talks about ventilation or openable area.
#[must_use]
pub fn mentions_ventilation(text: &str) -> bool {
    any_match_logged(
        "mentions_ventilation",
        std::slice::from_ref(&*VENTILATION_DETAILS),
        text,
    )
}

/// Whether the item text talks about daylight or glazing.
#[must_use]
pub fn mentions_natural_light(text: &str) -> bool {
    any_match_logged(
        "mentions_natural_light",
        std::slice::from_ref(&*NATURAL_LIGHT_DETAILS),
        text,
    )
}

/// Heuristic confidence that an entry is a fully specified schedule line.
///
/// Starts at 0.5, adds 0.2 for dimension-like text, 0.1 each for material
/// and location, 0.1 for text longer than 50 characters.
#[must_use]
pub fn item_confidence(text: &str, has_material: bool, has_location: bool) -> f64 {
    let mut confidence: f64 = 0.5;
    if any_match_logged("item_confidence", &DIMENSION_HINTS, text) {
        confidence += 0.2;
    }
    if has_material {
        confidence += 0.1;
    }
    if has_location {
        confidence += 0.1;
    }
    if text.chars().count() > 50 {
        confidence += 0.1;
    }
    confidence.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::vocabulary;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn role_values(dims: &[ItemDimension], role: DimensionRole) -> Vec<f64> {
        dims.iter().filter(|d| d.role == role).map(|d| d.value).collect()
    }

    #[test]
    fn combined_with_units_puts_smaller_first() {
        let dims = item_dimensions("2100mm x 900mm");
        assert_eq!(dims.len(), 2);
        assert!(approx_eq(role_values(&dims, DimensionRole::Width)[0], 0.9));
        assert!(approx_eq(role_values(&dims, DimensionRole::Height)[0], 2.1));
    }

    #[test]
    fn combined_unit_after_first_number() {
        let dims = item_dimensions("WO1 900mm x 2100mm aluminum window");
        assert!(approx_eq(role_values(&dims, DimensionRole::Width)[0], 0.9));
        assert!(approx_eq(role_values(&dims, DimensionRole::Height)[0], 2.1));
    }

    #[test]
    fn unitless_millimeter_figures() {
        let dims = item_dimensions("1200 x 1500");
        assert!(approx_eq(role_values(&dims, DimensionRole::Width)[0], 1.2));
        assert!(approx_eq(role_values(&dims, DimensionRole::Height)[0], 1.5));
    }

    #[test]
    fn unitless_meter_figures() {
        let dims = item_dimensions("0.9 by 2.1");
        assert!(approx_eq(role_values(&dims, DimensionRole::Width)[0], 0.9));
        assert!(approx_eq(role_values(&dims, DimensionRole::Height)[0], 2.1));
    }

    #[test]
    fn explicit_width_and_height() {
        let dims = item_dimensions("W = 900mm, H = 2100mm");
        assert_eq!(role_values(&dims, DimensionRole::Width), vec![0.9]);
        assert_eq!(role_values(&dims, DimensionRole::Height), vec![2.1]);
    }

    #[test]
    fn single_letter_keys_match_inside_words() {
        // The trailing "h" of "width" reads as a height key.
        let dims = item_dimensions("width: 900mm");
        assert_eq!(role_values(&dims, DimensionRole::Width), vec![0.9]);
        assert_eq!(role_values(&dims, DimensionRole::Height), vec![0.9]);
    }

    #[test]
    fn oversized_openings_are_rejected() {
        assert!(item_dimensions("5000 x 6000").is_empty());
        assert!(item_dimensions("width 4.5m").is_empty());
    }

    #[test]
    fn location_from_positional_phrase() {
        let vocab = vocabulary().unwrap();
        assert_eq!(
            item_location(vocab, "Casement for the master bedroom"),
            Some("master bedroom".to_owned())
        );
        assert_eq!(
            item_location(vocab, "Location: ground floor lobby"),
            Some("ground floor lobby".to_owned())
        );
    }

    #[test]
    fn location_falls_back_to_room_names() {
        let vocab = vocabulary().unwrap();
        assert_eq!(
            item_location(vocab, "WO1 900mm x 2100mm aluminum window in kitchen"),
            Some("kitchen".to_owned())
        );
        assert_eq!(item_location(vocab, "1200 x 1500 fixed light"), None);
    }

    #[test]
    fn ventilation_and_light_mentions() {
        assert!(mentions_ventilation("top hung OPENABLE sash"));
        assert!(!mentions_ventilation("fixed pane"));
        assert!(mentions_natural_light("double glazing"));
        assert!(!mentions_natural_light("solid panel"));
    }

    #[test]
    fn confidence_is_clamped_and_accumulates() {
        assert!(approx_eq(item_confidence("", false, false), 0.5));
        assert!(approx_eq(item_confidence("900mm x 2100mm", true, true), 0.9));
        let long = "900 x 2100 timber flush door with vision panel to the main corridor";
        assert!(approx_eq(item_confidence(long, true, true), 1.0));
    }
}
