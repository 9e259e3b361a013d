//! Tunable extraction behavior.

use serde::Deserialize;

use crate::ExtractError;

/// Options shared by every extractor's `_with` entry point.
///
/// The defaults reproduce the historical output exactly, duplicates
/// included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtractionOptions {
    /// Drop results whose text span overlaps an earlier result of the same
    /// extractor. Applies to dimensions, identifiers and schedule items.
    pub dedupe_overlapping: bool,
}

impl ExtractionOptions {
    /// Options with overlap de-duplication turned on.
    #[must_use]
    pub const fn deduplicated() -> Self {
        Self {
            dedupe_overlapping: true,
        }
    }

    /// Parses options from a TOML document. Missing keys take their
    /// default.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Config`] if `toml_str` is not valid TOML or
    /// contains a value of the wrong type.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ExtractError> {
        Ok(toml::de::from_str(toml_str)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_preserve_duplicates() {
        assert!(!ExtractionOptions::default().dedupe_overlapping);
    }

    #[test]
    fn parses_dedupe_flag() {
        let options = ExtractionOptions::from_toml_str("dedupe_overlapping = true").unwrap();
        assert_eq!(options, ExtractionOptions::deduplicated());
    }

    #[test]
    fn empty_document_uses_defaults() {
        let options = ExtractionOptions::from_toml_str("").unwrap();
        assert_eq!(options, ExtractionOptions::default());
    }

    #[test]
    fn rejects_wrong_type() {
        let err = ExtractionOptions::from_toml_str("dedupe_overlapping = \"yes\"").unwrap_err();
        assert!(matches!(err, ExtractError::Config(_)));
    }
}
