//! Window, door and ironmongery schedule detection.
//!
//! Header phrases decide whether a schedule is announced, but items are
//! scanned regardless: a tagged entry implies its schedule even without a
//! header.

use std::sync::LazyLock;

use plan_extract_models::{IronmongeryItem, ItemCategory, ScheduleInfo, ScheduleItem};

use crate::items::{
    item_confidence, item_dimensions, item_location, mentions_natural_light, mentions_ventilation,
};
use crate::pattern::{
    Pattern, PatternError, any_match_logged, collect_logged, compile_all, retain_non_overlapping,
};
use crate::vocabulary::{Vocabulary, vocabulary};
use crate::{ExtractError, ExtractionOptions};

static WINDOW_HEADERS: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)\b(?:window|fenestration)\s*(?:schedule|specification|details|list|table)\b",
        r"(?i)\bschedule\s+of\s+(?:windows|glazing)\b",
        r"(?i)\btable\s+(?:[0-9]+\s+)?(?:window|glazing)\b",
    ])
});

static DOOR_HEADERS: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)\bdoor\s*(?:schedule|specification|details|list|table)\b",
        r"(?i)\bschedule\s+of\s+doors\b",
        r"(?i)\btable\s+(?:[0-9]+\s+)?door\b",
    ])
});

static IRONMONGERY_HEADERS: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)\b(?:ironmongery|hardware)\s*(?:schedule|specification|list|table)\b",
        r"(?i)\bschedule\s+of\s+(?:ironmongery|hardware)\b",
    ])
});

static WINDOW_ITEMS: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)\b(?P<tag>(?:W|WO|WINDOW)[0-9]+)\s*[:-]?\s*(?P<details>[^,;\n]*)",
        r"(?i)\b(?P<tag>(?:W|WO|WINDOW)[0-9]+)\s*(?P<details>[^,;\n]*)",
        r"(?i)\b(?P<tag>(?:WINDOW|W)\s*(?:TYPE|REF)?\s*[:-]?\s*[0-9]+)\s*[:-]?\s*(?P<details>[^,;\n]*)",
    ])
});

static DOOR_ITEMS: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)\b(?P<tag>(?:D|DO|DOOR)[0-9]+)\s*[:-]?\s*(?P<details>[^,;\n]*)",
        r"(?i)\b(?P<tag>(?:D|DO|DOOR)[0-9]+)\s*(?P<details>[^,;\n]*)",
        r"(?i)\b(?P<tag>(?:DOOR|D)\s*(?:TYPE|REF)?\s*[:-]?\s*[0-9]+)\s*[:-]?\s*(?P<details>[^,;\n]*)",
    ])
});

static IRONMONGERY_ITEMS: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)\b(?P<tag>(?:IM|HW)[0-9]+|IRONMONGERY\s*[0-9]+)\s*[:-]?\s*(?P<details>[^,;\n]*)",
    ])
});

static VENTILATION_INFO: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)\b(?:ventilation|air\s*flow|air\s*circulation|opening\s*area)\b",
        r"(?i)\b(?:opening\s*percentage|openable\s*area)\b",
    ])
});

static NATURAL_LIGHT_INFO: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)\b(?:natural\s*light|daylight|light\s*transmission|glazing\s*area)\b",
        r"(?i)\b(?:light\s*percentage|window\s*to\s*floor\s*ratio)\b",
    ])
});

fn scan_items(
    vocab: &Vocabulary,
    category: ItemCategory,
    pattern: &Pattern,
    text: &str,
) -> Result<Vec<ScheduleItem>, PatternError> {
    let mut items = Vec::new();
    for caps in pattern.regex()?.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let entry = whole.as_str();
        let id = caps
            .name("tag")
            .map_or_else(String::new, |m| m.as_str().trim().to_uppercase());
        let details = caps
            .name("details")
            .map_or_else(String::new, |m| m.as_str().trim().to_owned());

        let dimensions = item_dimensions(entry);
        let material = vocab.material_in(category, entry);
        let location = item_location(vocab, entry);
        let is_window = category == ItemCategory::Window;

        items.push(ScheduleItem {
            id,
            details,
            has_dimensions: !dimensions.is_empty(),
            dimensions,
            confidence: item_confidence(entry, material.is_some(), location.is_some()),
            material,
            location,
            fire_rating: if category == ItemCategory::Door {
                vocab.fire_rating_in(entry)
            } else {
                None
            },
            has_ventilation_details: is_window && mentions_ventilation(entry),
            has_natural_light_details: is_window && mentions_natural_light(entry),
            span: whole.range(),
        });
    }
    Ok(items)
}

fn scan_ironmongery(
    vocab: &Vocabulary,
    pattern: &Pattern,
    text: &str,
) -> Result<Vec<IronmongeryItem>, PatternError> {
    let mut items = Vec::new();
    for caps in pattern.regex()?.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        items.push(IronmongeryItem {
            id: caps
                .name("tag")
                .map_or_else(String::new, |m| m.as_str().trim().to_uppercase()),
            details: caps
                .name("details")
                .map_or_else(String::new, |m| m.as_str().trim().to_owned()),
            hardware_type: vocab.hardware_type_in(whole.as_str()),
            span: whole.range(),
        });
    }
    Ok(items)
}

fn extract_items(
    vocab: &Vocabulary,
    category: ItemCategory,
    patterns: &[Pattern],
    text: &str,
    options: &ExtractionOptions,
) -> Vec<ScheduleItem> {
    let items = collect_logged(
        "extract_schedule_items",
        patterns
            .iter()
            .map(|pattern| scan_items(vocab, category, pattern, text)),
    );
    if options.dedupe_overlapping {
        retain_non_overlapping(items, |item| &item.span)
    } else {
        items
    }
}

/// Weighted share of items carrying dimensions (0.5), a material (0.3) and
/// a location (0.2). Zero when there are no items.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn calculate_schedule_completeness(windows: &[ScheduleItem], doors: &[ScheduleItem]) -> f64 {
    let total = windows.len() + doors.len();
    if total == 0 {
        return 0.0;
    }
    let share = |pred: fn(&ScheduleItem) -> bool| {
        windows.iter().chain(doors).filter(|item| pred(item)).count() as f64 / total as f64
    };

    share(|item| item.has_dimensions) * 0.5
        + share(|item| item.material.is_some()) * 0.3
        + share(|item| item.location.is_some()) * 0.2
}

/// Detects schedules and extracts their items.
///
/// # Errors
///
/// Returns [`ExtractError::Vocabulary`] if the keyword tables are
/// unavailable. Individual failing patterns are logged and skipped.
pub fn try_extract_schedule_info(
    text: &str,
    options: &ExtractionOptions,
) -> Result<ScheduleInfo, ExtractError> {
    let vocab = vocabulary()?;

    let mut has_window_schedule = any_match_logged("window_schedule_header", &WINDOW_HEADERS, text);
    let mut has_door_schedule = any_match_logged("door_schedule_header", &DOOR_HEADERS, text);
    let mut has_ironmongery_schedule =
        any_match_logged("ironmongery_schedule_header", &IRONMONGERY_HEADERS, text);

    let windows = extract_items(vocab, ItemCategory::Window, &WINDOW_ITEMS, text, options);
    let doors = extract_items(vocab, ItemCategory::Door, &DOOR_ITEMS, text, options);
    let ironmongery = collect_logged(
        "extract_ironmongery_items",
        IRONMONGERY_ITEMS
            .iter()
            .map(|pattern| scan_ironmongery(vocab, pattern, text)),
    );
    let ironmongery = if options.dedupe_overlapping {
        retain_non_overlapping(ironmongery, |item| &item.span)
    } else {
        ironmongery
    };

    for (flag, found, category) in [
        (&mut has_window_schedule, !windows.is_empty(), ItemCategory::Window),
        (&mut has_door_schedule, !doors.is_empty(), ItemCategory::Door),
        (
            &mut has_ironmongery_schedule,
            !ironmongery.is_empty(),
            ItemCategory::Ironmongery,
        ),
    ] {
        if found && !*flag {
            log::debug!("No {category} schedule header, but {category} items were found");
            *flag = true;
        }
    }

    let has_ventilation_info = any_match_logged("ventilation_info", &VENTILATION_INFO, text);
    let has_natural_light_info = any_match_logged("natural_light_info", &NATURAL_LIGHT_INFO, text);

    log::debug!(
        "Found {} window, {} door and {} ironmongery schedule items",
        windows.len(),
        doors.len(),
        ironmongery.len()
    );

    Ok(ScheduleInfo {
        has_schedule: has_window_schedule || has_door_schedule || has_ironmongery_schedule,
        has_window_schedule,
        has_door_schedule,
        has_ironmongery_schedule,
        schedule_completeness: calculate_schedule_completeness(&windows, &doors),
        ventilation_requirements_met: has_ventilation_info
            || windows.iter().any(|w| w.has_ventilation_details),
        natural_light_requirements_met: has_natural_light_info
            || windows.iter().any(|w| w.has_natural_light_details),
        has_ventilation_info,
        has_natural_light_info,
        windows,
        doors,
        ironmongery,
        error: None,
    })
}

/// Schedules found in `text`, with default options.
#[must_use]
pub fn extract_schedule_info(text: &str) -> ScheduleInfo {
    extract_schedule_info_with(text, &ExtractionOptions::default())
}

/// Schedules found in `text`.
///
/// Never fails: an error yields an empty [`ScheduleInfo`] whose `error`
/// carries the message.
#[must_use]
pub fn extract_schedule_info_with(text: &str, options: &ExtractionOptions) -> ScheduleInfo {
    schedule_or_failed(try_extract_schedule_info(text, options))
}

fn schedule_or_failed(result: Result<ScheduleInfo, ExtractError>) -> ScheduleInfo {
    result.unwrap_or_else(|e| {
        log::error!("Error extracting schedule info: {e}");
        ScheduleInfo::failed(e.to_string())
    })
}
