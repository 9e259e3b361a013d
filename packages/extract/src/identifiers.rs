//! Window and door tag extraction.
//!
//! Several tag formats are tried per category ("WO1", "W1", "WINDOW 1",
//! "WIN 1", "W-1"; "DO1", "D1", "DOOR 1", "D-1"). Matches from every format
//! are concatenated upper-cased. When no tag is found but the text mentions
//! the category, the category's default identifiers are returned instead.

use std::ops::Range;
use std::sync::LazyLock;

use plan_extract_models::ItemCategory;

use crate::pattern::{Pattern, PatternError, collect_logged, compile_all, retain_non_overlapping};
use crate::vocabulary::{CategoryKeywords, vocabulary};
use crate::{ExtractError, ExtractionOptions};

/// Window tag formats, in match order.
pub const WINDOW_TAG_SOURCES: &[&str] = &[
    r"(?i)\b(WO[0-9]+)\b",
    r"(?i)\b(W[0-9]+)\b",
    r"(?i)\b(WINDOW\s*[0-9]+)\b",
    r"(?i)\b(WIN\s*[0-9]+)\b",
    r"(?i)\bW(?:INDOW)?[\s-]*?([0-9]+)",
];

/// Door tag formats, in match order.
pub const DOOR_TAG_SOURCES: &[&str] = &[
    r"(?i)\b(DO[0-9]+)\b",
    r"(?i)\b(D[0-9]+)\b",
    r"(?i)\b(DOOR\s*[0-9]+)\b",
    r"(?i)\bD(?:OOR)?[\s-]*?([0-9]+)",
];

static WINDOW_TAGS: LazyLock<Vec<Pattern>> = LazyLock::new(|| compile_all(WINDOW_TAG_SOURCES));
static DOOR_TAGS: LazyLock<Vec<Pattern>> = LazyLock::new(|| compile_all(DOOR_TAG_SOURCES));

/// A tag occurrence and where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TagMatch {
    tag: String,
    span: Range<usize>,
}

fn scan_tags(pattern: &Pattern, text: &str) -> Result<Vec<TagMatch>, PatternError> {
    Ok(pattern
        .regex()?
        .find_iter(text)
        .map(|m| TagMatch {
            tag: m.as_str().to_uppercase(),
            span: m.range(),
        })
        .collect())
}

fn mention_pattern(keywords: &CategoryKeywords, negations: &[String]) -> Option<Pattern> {
    if keywords.keywords.is_empty() {
        return None;
    }
    let alternation = |words: &[String]| {
        words
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|")
    };
    let source = if negations.is_empty() {
        format!(r"(?i)\b()(?:{})\b", alternation(&keywords.keywords))
    } else {
        format!(
            r"(?i)\b(?:({})\s+)?(?:{})\b",
            alternation(negations),
            alternation(&keywords.keywords)
        )
    };
    Some(Pattern::new(source))
}

/// Keyword patterns for the categories that have defaults, built from the
/// vocabulary. Empty when the vocabulary failed to load.
static CATEGORY_MENTIONS: LazyLock<Vec<(ItemCategory, Pattern)>> = LazyLock::new(|| {
    let Ok(vocab) = vocabulary() else {
        return Vec::new();
    };
    [ItemCategory::Window, ItemCategory::Door]
        .into_iter()
        .filter_map(|category| {
            let pattern = mention_pattern(vocab.category(category)?, &vocab.negations)?;
            Some((category, pattern))
        })
        .collect()
});

/// Whether `text` names the category without a directly preceding
/// negation ("no door" does not count).
///
/// # Errors
///
/// Returns [`PatternError`] if the keyword pattern did not compile.
fn mentions_category(pattern: &Pattern, text: &str) -> Result<bool, PatternError> {
    Ok(pattern
        .regex()?
        .captures_iter(text)
        .any(|caps| caps.get(1).is_none_or(|negation| negation.as_str().is_empty())))
}

fn try_extract_identifiers(
    category: ItemCategory,
    patterns: &[Pattern],
    text: &str,
    options: &ExtractionOptions,
) -> Result<Vec<String>, ExtractError> {
    let matches = collect_logged(
        "extract_identifiers",
        patterns.iter().map(|pattern| scan_tags(pattern, text)),
    );
    let matches = if options.dedupe_overlapping {
        retain_non_overlapping(matches, |m| &m.span)
    } else {
        matches
    };

    if !matches.is_empty() {
        log::debug!("Found {} {category} identifiers", matches.len());
        return Ok(matches.into_iter().map(|m| m.tag).collect());
    }

    let vocab = vocabulary()?;
    let Some(keywords) = vocab.category(category) else {
        return Ok(Vec::new());
    };
    let Some((_, pattern)) = CATEGORY_MENTIONS.iter().find(|(c, _)| *c == category) else {
        return Ok(Vec::new());
    };
    if mentions_category(pattern, text)? {
        log::debug!(
            "No specific {category} identifiers found, but {category}s are mentioned. Using defaults."
        );
        return Ok(keywords.defaults.clone());
    }

    Ok(Vec::new())
}

fn extract_identifiers(
    category: ItemCategory,
    patterns: &[Pattern],
    text: &str,
    options: &ExtractionOptions,
) -> Vec<String> {
    try_extract_identifiers(category, patterns, text, options).unwrap_or_else(|e| {
        log::error!("Error extracting {category} identifiers: {e}");
        Vec::new()
    })
}

/// Window tags found in `text`, with default options.
#[must_use]
pub fn extract_window_identifiers(text: &str) -> Vec<String> {
    extract_window_identifiers_with(text, &ExtractionOptions::default())
}

/// Window tags found in `text`.
///
/// Falls back to the default window identifiers when no tag matches but
/// windows, glazing or fenestration are mentioned. Never fails: errors are
/// logged and yield an empty list.
#[must_use]
pub fn extract_window_identifiers_with(text: &str, options: &ExtractionOptions) -> Vec<String> {
    extract_identifiers(ItemCategory::Window, &WINDOW_TAGS, text, options)
}

/// Door tags found in `text`, with default options.
#[must_use]
pub fn extract_door_identifiers(text: &str) -> Vec<String> {
    extract_door_identifiers_with(text, &ExtractionOptions::default())
}

/// Door tags found in `text`.
///
/// Falls back to the default door identifiers when no tag matches but a
/// door, entrance, exit or access is mentioned.
#[must_use]
pub fn extract_door_identifiers_with(text: &str, options: &ExtractionOptions) -> Vec<String> {
    extract_identifiers(ItemCategory::Door, &DOOR_TAGS, text, options)
}
