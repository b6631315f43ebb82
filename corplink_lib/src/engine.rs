//! The entity-resolution engine: validate, normalize, match, corroborate, classify.
//!
//! A run is a pure function of the two record sets and the configuration.
//! Source records are resolved independently in parallel against a shared,
//! read-only target index; results come back in source order.

use rayon::prelude::*;

use crate::address::record_address;
use crate::classify::ConfidenceClassifier;
use crate::config::MatchConfig;
use crate::corroborate::score_overlap;
use crate::error::LinkError;
use crate::matcher::TargetIndex;
use crate::normalize::{normalize_display, normalize_zip, Normalizer};
use crate::record::{Dataset, MatchResult, RawRecord, Record};
use crate::validation::validate_records;

#[derive(Debug, Clone)]
pub struct Engine {
    config: MatchConfig,
    normalizer: Normalizer,
    classifier: ConfidenceClassifier,
}

impl Engine {
    pub fn new(config: MatchConfig) -> Result<Self, LinkError> {
        config.validate()?;
        let normalizer = Normalizer::new(&config.legal_suffixes)?;
        let classifier = ConfidenceClassifier::new(config.min_acceptance_threshold);
        Ok(Self {
            config,
            normalizer,
            classifier,
        })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Derive the comparison fields of a raw record. Absent fields become "".
    pub fn normalize(&self, raw: &RawRecord) -> Record {
        let street = raw.street_lines.as_ref().map(|lines| lines.join(" "));
        Record {
            id: raw.id.clone(),
            display_name: raw.name.clone().unwrap_or_default(),
            match_key: self.normalizer.match_key(raw.name.as_deref()),
            city_norm: normalize_display(raw.city.as_deref()),
            zip_norm: normalize_zip(raw.postal_code.as_deref()),
            street_norm: normalize_display(street.as_deref()),
            composite_address: record_address(raw),
        }
    }

    /// Validate a dataset and normalize every record, all or nothing.
    pub fn prepare(&self, raws: &[RawRecord], dataset: Dataset) -> Result<Vec<Record>, LinkError> {
        validate_records(raws, dataset)?;
        Ok(raws.iter().map(|r| self.normalize(r)).collect())
    }

    /// Validate, normalize and resolve both datasets.
    pub fn run(
        &self,
        sources: &[RawRecord],
        targets: &[RawRecord],
    ) -> Result<Vec<MatchResult>, LinkError> {
        self.run_with_progress(sources, targets, |_| {})
    }

    /// Like [`Engine::run`], calling `progress` with each finished source index.
    pub fn run_with_progress<F>(
        &self,
        sources: &[RawRecord],
        targets: &[RawRecord],
        progress: F,
    ) -> Result<Vec<MatchResult>, LinkError>
    where
        F: Fn(usize) + Sync,
    {
        let sources = self.prepare(sources, Dataset::Source)?;
        let targets = self.prepare(targets, Dataset::Target)?;
        Ok(self.resolve_with_progress(&sources, &targets, progress))
    }

    /// Resolve already-normalized records.
    pub fn resolve(&self, sources: &[Record], targets: &[Record]) -> Vec<MatchResult> {
        self.resolve_with_progress(sources, targets, |_| {})
    }

    pub fn resolve_with_progress<F>(
        &self,
        sources: &[Record],
        targets: &[Record],
        progress: F,
    ) -> Vec<MatchResult>
    where
        F: Fn(usize) + Sync,
    {
        tracing::info!(
            "Resolving {} source records against {} target records (floor {})",
            sources.len(),
            targets.len(),
            self.classifier.floor()
        );

        let index = TargetIndex::build(targets);

        let results: Vec<MatchResult> = sources
            .par_iter()
            .enumerate()
            .map(|(i, source)| {
                let result = self.resolve_one(source, targets, &index);
                progress(i);
                result
            })
            .collect();

        let matched = results.iter().filter(|r| r.is_matched()).count();
        tracing::info!("Matched {} of {} source records", matched, results.len());

        results
    }

    /// Resolve a single source record against a prepared index of `targets`.
    pub fn resolve_one(&self, source: &Record, targets: &[Record], index: &TargetIndex) -> MatchResult {
        if source.match_key.chars().count() < self.config.min_key_length {
            return MatchResult::unmatched(&source.id);
        }

        let Some(candidate) = index.best_match(&source.match_key) else {
            return MatchResult::unmatched(&source.id);
        };
        let Some(target) = targets.get(candidate.index) else {
            return MatchResult::unmatched(&source.id);
        };

        let signals = score_overlap(source, target);

        match self.classifier.classify(candidate.score, &signals) {
            Some(tier) => MatchResult {
                source_id: source.id.clone(),
                target_id: Some(target.id.clone()),
                target_index: Some(candidate.index),
                confidence_score: round2(candidate.score),
                overlap_signals: signals,
                tier: Some(tier),
            },
            None => {
                tracing::debug!(
                    "Rejected '{}' -> '{}' (score {:.2}, signals [{}])",
                    source.match_key,
                    target.match_key,
                    candidate.score,
                    signals
                );
                MatchResult::unmatched(&source.id)
            }
        }
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
