//! Lintel, wall-plate and roof heights, and the room height they imply.

use std::sync::LazyLock;

use plan_extract_models::{Dimension, DimensionKind, StructuralHeights};

use crate::dimensions::extract_dimensions;
use crate::pattern::{Pattern, parse_number};
use crate::ExtractError;

/// Lintels sit this far below the ceiling when no wall plate is given.
pub const LINTEL_TO_CEILING: f64 = 0.3;

/// A looser keyword-then-number rule for one structural kind, tried only
/// when the dimension table found no structural height at all.
struct Fallback {
    kind: DimensionKind,
    /// Literal spellings, at least one of which must appear in the text.
    triggers: &'static [&'static str],
    pattern: Pattern,
}

static FALLBACKS: LazyLock<Vec<Fallback>> = LazyLock::new(|| {
    vec![
        Fallback {
            kind: DimensionKind::LintelLevel,
            triggers: &["LINTEL", "lintel"],
            pattern: Pattern::new(r"(?i)\bLINTEL\b[^0-9]*([0-9]+(?:\.[0-9]+)?)"),
        },
        Fallback {
            kind: DimensionKind::WallPlateLevel,
            triggers: &["WALL PLATE", "wall plate"],
            pattern: Pattern::new(r"(?i)\bWALL\s*PLATE\b[^0-9]*([0-9]+(?:\.[0-9]+)?)"),
        },
        Fallback {
            kind: DimensionKind::MaxRoofHeight,
            triggers: &["ROOF HEIGHT", "roof height", "MAX HEIGHT", "max height"],
            pattern: Pattern::new(
                r"(?i)\b(?:ROOF|MAX(?:IMUM)?)\s*(?:ROOF)?\s*HEIGHT\b[^0-9]*([0-9]+(?:\.[0-9]+)?)",
            ),
        },
    ]
});

fn first_of(dimensions: &[Dimension], kind: DimensionKind) -> Option<f64> {
    dimensions.iter().find(|d| d.kind == kind).map(|d| d.value)
}

impl Fallback {
    fn apply(&self, text: &str) -> Result<Option<f64>, ExtractError> {
        if !self.triggers.iter().any(|t| text.contains(t)) {
            return Ok(None);
        }
        Ok(self
            .pattern
            .captures(text)?
            .and_then(|caps| caps.get(1).and_then(|m| parse_number(m.as_str())))
            .filter(|&value| self.kind.is_plausible(value)))
    }
}

/// Structural heights in `text`.
///
/// # Errors
///
/// Returns [`ExtractError::Pattern`] if a fallback pattern failed to
/// compile.
pub fn try_extract_structural_heights(text: &str) -> Result<StructuralHeights, ExtractError> {
    let dimensions = extract_dimensions(text);

    let mut lintel_level = first_of(&dimensions, DimensionKind::LintelLevel);
    let mut wall_plate_level = first_of(&dimensions, DimensionKind::WallPlateLevel);
    let mut max_roof_height = first_of(&dimensions, DimensionKind::MaxRoofHeight);

    if !dimensions.iter().any(|d| d.kind.is_structural()) {
        for fallback in FALLBACKS.iter() {
            let Some(value) = fallback.apply(text)? else {
                continue;
            };
            log::debug!("Structural {} read by keyword fallback: {value}", fallback.kind);
            match fallback.kind {
                DimensionKind::LintelLevel => lintel_level = Some(value),
                DimensionKind::WallPlateLevel => wall_plate_level = Some(value),
                _ => max_roof_height = Some(value),
            }
        }
    }

    let implied_room_height =
        wall_plate_level.or_else(|| lintel_level.map(|lintel| lintel + LINTEL_TO_CEILING));

    Ok(StructuralHeights {
        lintel_level,
        wall_plate_level,
        max_roof_height,
        has_structural_heights: lintel_level.is_some()
            || wall_plate_level.is_some()
            || max_roof_height.is_some(),
        can_determine_room_height: implied_room_height.is_some(),
        implied_room_height,
        error: None,
    })
}

/// Structural heights in `text`.
///
/// The first value found for each kind is used. The implied room height is
/// the wall-plate level, or the lintel level plus [`LINTEL_TO_CEILING`].
/// Never fails: an error yields empty heights with `error` set.
#[must_use]
pub fn extract_structural_heights(text: &str) -> StructuralHeights {
    try_extract_structural_heights(text).unwrap_or_else(|e| {
        log::error!("Error in extract_structural_heights: {e}");
        StructuralHeights::failed(e.to_string())
    })
}
