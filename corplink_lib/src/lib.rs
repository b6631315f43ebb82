//! Company record linkage across two independently maintained datasets.
//!
//! Normalizes names and address fields, picks the best fuzzy name candidate in
//! the target dataset for every source record, corroborates it with city, zip
//! and street agreement, and accepts or rejects it under a tiered confidence
//! policy. CSV loading, aggregate metrics and joined output live alongside the
//! engine but outside its matching path.

pub mod address;
pub mod classify;
pub mod config;
pub mod corroborate;
pub mod engine;
pub mod error;
pub mod export;
pub mod loader;
pub mod matcher;
pub mod metrics;
pub mod normalize;
pub mod record;
pub mod similarity;
pub mod validation;

pub use classify::{AcceptanceTier, ConfidenceClassifier};
pub use config::{ColumnMap, Config, MatchConfig};
pub use corroborate::score_overlap;
pub use engine::Engine;
pub use error::LinkError;
pub use matcher::{find_candidate, Candidate, TargetIndex};
pub use metrics::MatchingMetrics;
pub use normalize::{normalize_display, normalize_zip, Normalizer};
pub use record::{Dataset, MatchResult, OverlapSignals, RawRecord, Record, Signal};
pub use similarity::token_sort_ratio;
