//! Tiered acceptance policy for candidate matches.
//!
//! Higher name similarity needs less corroboration:
//!
//! | raw score              | accepted when                      |
//! |------------------------|------------------------------------|
//! | `>= 95`                | always                             |
//! | `85 <= score < 95`     | any signal fired                   |
//! | `floor <= score < 85`  | street, or city and zip together   |
//!
//! Everything else, including any score below the floor, is rejected.

use std::fmt;

use serde::Serialize;

use crate::record::OverlapSignals;

/// Scores at or above this are accepted on the name alone.
pub const NEAR_EXACT_SCORE: f64 = 95.0;

/// Lower bound of the tier that accepts any single signal.
pub const CORROBORATED_SCORE: f64 = 85.0;

/// Default floor below which no candidate is considered.
pub const DEFAULT_MIN_ACCEPTANCE_THRESHOLD: f64 = 60.0;

/// Which rule accepted a candidate.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AcceptanceTier {
    NearExact,
    AnyCorroboration,
    StrongCorroboration,
}

impl fmt::Display for AcceptanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NearExact => write!(f, "near-exact"),
            Self::AnyCorroboration => write!(f, "any-corroboration"),
            Self::StrongCorroboration => write!(f, "strong-corroboration"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceClassifier {
    floor: f64,
}

impl ConfidenceClassifier {
    pub fn new(min_acceptance_threshold: f64) -> Self {
        Self {
            floor: min_acceptance_threshold,
        }
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }

    /// Decide whether a candidate with `raw_score` and `signals` is accepted.
    pub fn classify(&self, raw_score: f64, signals: &OverlapSignals) -> Option<AcceptanceTier> {
        if raw_score < self.floor {
            return None;
        }

        if raw_score >= NEAR_EXACT_SCORE {
            return Some(AcceptanceTier::NearExact);
        }

        if raw_score >= CORROBORATED_SCORE {
            return (!signals.is_empty()).then_some(AcceptanceTier::AnyCorroboration);
        }

        let strong = signals.street || (signals.city && signals.zip);
        strong.then_some(AcceptanceTier::StrongCorroboration)
    }
}

impl Default for ConfidenceClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_ACCEPTANCE_THRESHOLD)
    }
}
