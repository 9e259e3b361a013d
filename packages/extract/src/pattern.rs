//! Compiled regex tables with per-pattern failure isolation.
//!
//! Each [`Pattern`] keeps the outcome of compiling its source. A pattern
//! that failed to compile reports a [`PatternError`] every time it is used
//! instead of taking the rest of its table down with it. Extractors run a
//! whole table, get one `Result` per pattern, and flatten them with
//! [`collect_logged`].

use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// A single pattern that could not be applied.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PatternError {
    /// The pattern source is not a valid regex.
    #[error("pattern `{pattern}` failed to compile: {source}")]
    Compile {
        /// The offending pattern source.
        pattern: String,
        /// The underlying compile error.
        #[source]
        source: regex::Error,
    },
}

/// A regex source together with the result of compiling it.
#[derive(Debug)]
pub struct Pattern {
    source: String,
    compiled: Result<Regex, regex::Error>,
}

impl Pattern {
    /// Compiles `source`. Compilation failures are kept, not raised.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let compiled = Regex::new(&source);
        Self { source, compiled }
    }

    /// The pattern source as written.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the compiled regex.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::Compile`] if the source did not compile.
    pub fn regex(&self) -> Result<&Regex, PatternError> {
        self.compiled.as_ref().map_err(|e| PatternError::Compile {
            pattern: self.source.clone(),
            source: e.clone(),
        })
    }

    /// Whether the pattern matches anywhere in `text`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::Compile`] if the source did not compile.
    pub fn is_match(&self, text: &str) -> Result<bool, PatternError> {
        Ok(self.regex()?.is_match(text))
    }

    /// Captures of the first match in `text`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::Compile`] if the source did not compile.
    pub fn captures<'t>(&self, text: &'t str) -> Result<Option<Captures<'t>>, PatternError> {
        Ok(self.regex()?.captures(text))
    }
}

/// Compiles every source in `sources`, preserving order.
#[must_use]
pub fn compile_all(sources: &[&str]) -> Vec<Pattern> {
    sources.iter().map(|source| Pattern::new(*source)).collect()
}

/// Flattens one `Result` per pattern into a single list.
///
/// Failed patterns are logged under `context` and contribute nothing.
pub fn collect_logged<T>(
    context: &str,
    results: impl IntoIterator<Item = Result<Vec<T>, PatternError>>,
) -> Vec<T> {
    let mut out = Vec::new();
    for result in results {
        match result {
            Ok(items) => out.extend(items),
            Err(e) => log::error!("Error in {context}: {e}"),
        }
    }
    out
}

/// Whether any pattern in `patterns` matches `text`.
///
/// A pattern that fails is logged and counts as not matching.
#[must_use]
pub fn any_match_logged(context: &str, patterns: &[Pattern], text: &str) -> bool {
    patterns.iter().any(|pattern| match pattern.is_match(text) {
        Ok(found) => found,
        Err(e) => {
            log::error!("Error in {context}: {e}");
            false
        }
    })
}

/// Drops every item whose span overlaps the span of an item kept before it.
///
/// Earlier items win, so tables ordered most-specific first keep their most
/// specific reading of a mention.
#[must_use]
pub fn retain_non_overlapping<T>(items: Vec<T>, span: impl Fn(&T) -> &Range<usize>) -> Vec<T> {
    let mut kept: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        let candidate = span(&item);
        if !kept.iter().any(|k| overlaps(span(k), candidate)) {
            kept.push(item);
        }
    }
    kept
}

const fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

static FIRST_NUMBER: LazyLock<Pattern> = LazyLock::new(|| Pattern::new(r"[0-9]+(?:\.[0-9]+)?"));

/// The first decimal number written anywhere in `text`.
#[must_use]
pub fn first_number(text: &str) -> Option<&str> {
    match FIRST_NUMBER.regex() {
        Ok(re) => re.find(text).map(|m| m.as_str()),
        Err(e) => {
            log::error!("Error in number fallback: {e}");
            None
        }
    }
}

/// Parses a captured number, reading the first `,` as a decimal separator.
#[must_use]
pub fn parse_number(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replacen(',', ".", 1);
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        Ok(_) | Err(_) => {
            log::debug!("Discarding unparseable number '{raw}'");
            None
        }
    }
}
