//! Aggregate quality metrics over a finished run.
//!
//! Percentages are rounded to two decimals. Ratios over an empty set are 0
//! rather than NaN.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::engine::round2;
use crate::record::MatchResult;

/// Lower bound of the "high" score band.
pub const HIGH_SCORE: f64 = 90.0;

/// Number of signals needed for full location verification.
const FULL_OVERLAP_SIGNALS: usize = 3;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct OverallMetrics {
    pub match_rate: f64,
    pub unmatched_rate: f64,
    /// Targets linked to more than one source record (branch clusters).
    pub one_to_many_cases: usize,
    pub one_to_many_percentage: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ScoreDistribution {
    /// Score exactly 100.
    pub perfect: usize,
    /// 90 <= score < 100.
    pub high: usize,
    /// Accepted with score < 90.
    pub borderline: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MatchQuality {
    pub exact_names_percent: f64,
    pub fuzzy_names_percent: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LocationVerification {
    /// City, zip and street all agreed.
    pub full_overlap_percent: f64,
    /// One or two signals agreed.
    pub partial_overlap_percent: f64,
    /// Accepted on the name alone.
    pub name_only_percent: f64,
}

/// Summary of a run, serialized as `matching_metrics.json`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MatchingMetrics {
    pub generated_at: DateTime<Utc>,
    pub total_records: usize,
    pub matched_records: usize,
    pub overall: OverallMetrics,
    pub score_distribution: ScoreDistribution,
    pub match_quality: MatchQuality,
    pub location_verification: LocationVerification,
}

impl MatchingMetrics {
    pub fn compute(results: &[MatchResult]) -> Self {
        Self::compute_at(results, Utc::now())
    }

    pub fn compute_at(results: &[MatchResult], generated_at: DateTime<Utc>) -> Self {
        let total = results.len();
        let matched: Vec<&MatchResult> = results.iter().filter(|r| r.is_matched()).collect();
        let matched_count = matched.len();

        let mut links_per_target: HashMap<&str, usize> = HashMap::new();
        for result in &matched {
            if let Some(target_id) = result.target_id.as_deref() {
                *links_per_target.entry(target_id).or_default() += 1;
            }
        }
        let one_to_many_cases = links_per_target.values().filter(|&&n| n > 1).count();

        let perfect = matched
            .iter()
            .filter(|r| r.confidence_score >= 100.0)
            .count();
        let high = matched
            .iter()
            .filter(|r| r.confidence_score >= HIGH_SCORE && r.confidence_score < 100.0)
            .count();
        let borderline = matched_count - perfect - high;

        let full = matched
            .iter()
            .filter(|r| r.overlap_signals.len() >= FULL_OVERLAP_SIGNALS)
            .count();
        let name_only = matched
            .iter()
            .filter(|r| r.overlap_signals.is_empty())
            .count();
        let partial = matched_count - full - name_only;

        let match_rate = percent(matched_count, total);
        let unmatched_rate = if total == 0 { 0.0 } else { round2(100.0 - match_rate) };
        let exact_names_percent = percent(perfect, matched_count);
        let fuzzy_names_percent = if matched_count == 0 {
            0.0
        } else {
            round2(100.0 - exact_names_percent)
        };

        Self {
            generated_at,
            total_records: total,
            matched_records: matched_count,
            overall: OverallMetrics {
                match_rate,
                unmatched_rate,
                one_to_many_cases,
                one_to_many_percentage: percent(one_to_many_cases, total),
            },
            score_distribution: ScoreDistribution {
                perfect,
                high,
                borderline,
            },
            match_quality: MatchQuality {
                exact_names_percent,
                fuzzy_names_percent,
            },
            location_verification: LocationVerification {
                full_overlap_percent: percent(full, matched_count),
                partial_overlap_percent: percent(partial, matched_count),
                name_only_percent: percent(name_only, matched_count),
            },
        }
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round2(part as f64 / whole as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::AcceptanceTier;
    use crate::record::OverlapSignals;

    fn matched(source: &str, target: &str, score: f64, signals: OverlapSignals) -> MatchResult {
        MatchResult {
            source_id: source.to_string(),
            target_id: Some(target.to_string()),
            target_index: Some(0),
            confidence_score: score,
            overlap_signals: signals,
            tier: Some(AcceptanceTier::NearExact),
        }
    }

    fn all() -> OverlapSignals {
        OverlapSignals {
            city: true,
            zip: true,
            street: true,
        }
    }

    fn city() -> OverlapSignals {
        OverlapSignals {
            city: true,
            zip: false,
            street: false,
        }
    }

    #[test]
    fn test_empty_results() {
        let m = MatchingMetrics::compute(&[]);
        assert_eq!(m.total_records, 0);
        assert_eq!(m.overall.match_rate, 0.0);
        assert_eq!(m.overall.unmatched_rate, 0.0);
        assert_eq!(m.match_quality.fuzzy_names_percent, 0.0);
        assert_eq!(m.location_verification.name_only_percent, 0.0);
    }

    #[test]
    fn test_rates_and_distribution() {
        let results = vec![
            matched("s1", "t1", 100.0, all()),
            matched("s2", "t2", 92.5, city()),
            matched("s3", "t3", 70.0, OverlapSignals::none()),
            MatchResult::unmatched("s4"),
        ];
        let m = MatchingMetrics::compute(&results);
        assert_eq!(m.matched_records, 3);
        assert_eq!(m.overall.match_rate, 75.0);
        assert_eq!(m.overall.unmatched_rate, 25.0);
        assert_eq!(m.score_distribution.perfect, 1);
        assert_eq!(m.score_distribution.high, 1);
        assert_eq!(m.score_distribution.borderline, 1);
        assert_eq!(m.match_quality.exact_names_percent, 33.33);
        assert_eq!(m.match_quality.fuzzy_names_percent, 66.67);
        assert_eq!(m.location_verification.full_overlap_percent, 33.33);
        assert_eq!(m.location_verification.partial_overlap_percent, 33.33);
        assert_eq!(m.location_verification.name_only_percent, 33.33);
    }

    #[test]
    fn test_one_to_many() {
        let results = vec![
            matched("s1", "t1", 100.0, all()),
            matched("s2", "t1", 100.0, all()),
            matched("s3", "t1", 96.0, city()),
            matched("s4", "t2", 100.0, all()),
        ];
        let m = MatchingMetrics::compute(&results);
        assert_eq!(m.overall.one_to_many_cases, 1);
        assert_eq!(m.overall.one_to_many_percentage, 25.0);
    }

    #[test]
    fn test_serialized_shape() {
        let generated_at = DateTime::parse_from_rfc3339("2026-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);
        let m = MatchingMetrics::compute_at(&[matched("s1", "t1", 100.0, all())], generated_at);
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["generated_at"], "2026-01-02T03:04:05Z");
        assert_eq!(json["overall"]["match_rate"], 100.0);
        assert_eq!(json["score_distribution"]["perfect"], 1);
        assert_eq!(json["location_verification"]["full_overlap_percent"], 100.0);
    }
}
