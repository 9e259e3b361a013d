//! Grading of converted document text before extraction.

use std::sync::LazyLock;

use plan_extract_models::TextQuality;

use crate::pattern::{Pattern, any_match_logged};
use crate::vocabulary::vocabulary;

/// Ten or more consecutive characters that are neither word characters,
/// whitespace nor common punctuation.
static GARBLED: LazyLock<Pattern> =
    LazyLock::new(|| Pattern::new(r#"[^\w\s.,;:'"()\[\]{}?!@#$%^&*+=<>|\\/-]{10,}"#));

/// Twenty or more letters without a break, typical of dropped spaces.
static MISSING_SPACES: LazyLock<Pattern> = LazyLock::new(|| Pattern::new(r"[a-zA-Z]{20,}"));

/// Grades how usable `text` is for extraction.
///
/// Longer text naming more architectural terms grades higher. Garbled
/// symbol runs cap the grade at fair, missing spaces cap it at good.
#[must_use]
pub fn assess_text_quality(text: &str) -> TextQuality {
    if text.trim().chars().count() < 50 {
        return TextQuality::Poor;
    }

    let garbled = any_match_logged("assess_text_quality", std::slice::from_ref(&*GARBLED), text);
    let missing_spaces = any_match_logged(
        "assess_text_quality",
        std::slice::from_ref(&*MISSING_SPACES),
        text,
    );

    let lower = text.to_lowercase();
    let term_count = match vocabulary() {
        Ok(vocab) => vocab
            .architectural_terms
            .iter()
            .filter(|term| lower.contains(term.as_str()))
            .count(),
        Err(e) => {
            log::error!("Error in assess_text_quality: {e}");
            0
        }
    };
    let length = text.chars().count();

    if length > 1000 && term_count >= 10 && !garbled && !missing_spaces {
        TextQuality::Excellent
    } else if length > 500 && term_count >= 5 && !garbled {
        TextQuality::Good
    } else if length > 200 && term_count >= 3 {
        TextQuality::Fair
    } else {
        TextQuality::Poor
    }
}
