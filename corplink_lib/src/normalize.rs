//! Text normalization for comparison fields and company-name match keys.
//!
//! Every function here is total: missing input normalizes to an empty string,
//! which downstream comparisons treat as "unknown".

use regex::Regex;

use crate::error::LinkError;

/// Legal-entity suffixes stripped from names when no vocabulary is configured.
pub const DEFAULT_LEGAL_SUFFIXES: &[&str] = &["INC", "LTD", "CORP", "LLC", "PLC", "GMBH"];

/// Punctuation policy for match keys: every match becomes a space.
pub const PUNCTUATION_PATTERN: &str = r"[^A-Z0-9\s]";

/// Lowercase, collapse whitespace runs to one space, trim.
pub fn normalize_display<'a>(text: impl Into<Option<&'a str>>) -> String {
    let text: Option<&str> = text.into();
    match text {
        Some(text) => text
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase(),
        None => String::new(),
    }
}

/// Display normalization with every whitespace character removed.
pub fn normalize_zip<'a>(text: impl Into<Option<&'a str>>) -> String {
    normalize_display(text)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Builds name match keys with an injected legal-suffix vocabulary.
#[derive(Debug, Clone)]
pub struct Normalizer {
    suffix_pattern: Option<Regex>,
    punctuation: Regex,
}

impl Normalizer {
    /// Compile a normalizer for the given suffix vocabulary.
    ///
    /// Entries go through the same uppercase and punctuation pass as names,
    /// so "l.l.c." and "L L C" are the same suffix. Entries with several
    /// tokens match across any run of whitespace. Longer suffixes are tried
    /// first so "CORPORATION" wins over "CORP".
    pub fn new<S: AsRef<str>>(suffixes: &[S]) -> Result<Self, LinkError> {
        let punctuation =
            Regex::new(PUNCTUATION_PATTERN).map_err(|e| LinkError::Config(e.to_string()))?;

        let mut vocabulary: Vec<Vec<String>> = suffixes
            .iter()
            .map(|s| {
                clean(&punctuation, &s.as_ref().to_uppercase())
                    .split(' ')
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|tokens| !tokens.is_empty())
            .collect();
        vocabulary.sort_by(|a, b| suffix_len(b).cmp(&suffix_len(a)).then_with(|| a.cmp(b)));
        vocabulary.dedup();

        let suffix_pattern = if vocabulary.is_empty() {
            None
        } else {
            let alternation = vocabulary
                .iter()
                .map(|tokens| {
                    tokens
                        .iter()
                        .map(|t| regex::escape(t))
                        .collect::<Vec<_>>()
                        .join(r"\s+")
                })
                .collect::<Vec<_>>()
                .join("|");
            // Keys only hold ASCII alphanumerics and whitespace by the time
            // this runs, so \b is exactly a token boundary.
            let pattern = format!(r"\b(?:{})\b", alternation);
            Some(Regex::new(&pattern).map_err(|e| LinkError::Config(e.to_string()))?)
        };

        Ok(Self {
            suffix_pattern,
            punctuation,
        })
    }

    /// Normalizer using [`DEFAULT_LEGAL_SUFFIXES`].
    pub fn with_default_suffixes() -> Result<Self, LinkError> {
        Self::new(DEFAULT_LEGAL_SUFFIXES)
    }

    /// Canonical name key used only for similarity scoring.
    ///
    /// Steps:
    /// 1. Uppercase
    /// 2. Replace everything outside `[A-Z0-9]` and whitespace with a space
    /// 3. Remove whole-token legal suffixes until none remain
    /// 4. Collapse whitespace and trim
    ///
    /// The output is a fixed point of this function.
    pub fn match_key<'a>(&self, text: impl Into<Option<&'a str>>) -> String {
        let text: Option<&str> = text.into();
        let Some(text) = text else {
            return String::new();
        };

        let mut key = clean(&self.punctuation, &text.to_uppercase());

        if let Some(pattern) = &self.suffix_pattern {
            // Removing a token can bring the pieces of a multi-token suffix
            // together ("S S A A"), so repeat. Each replacement removes at
            // least one alphanumeric character, so this terminates.
            while pattern.is_match(&key) {
                key = pattern.replace_all(&key, " ").into_owned();
            }
        }

        key.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Length of a suffix as written with single spaces.
fn suffix_len(tokens: &[String]) -> usize {
    tokens.iter().map(String::len).sum::<usize>() + tokens.len().saturating_sub(1)
}

/// Apply the punctuation policy and collapse whitespace.
fn clean(punctuation: &Regex, text: &str) -> String {
    punctuation
        .replace_all(text, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
