//! Candidate selection: the best-scoring target name for a source record.
//!
//! The search is exhaustive over the target set. `TargetIndex` tokenizes the
//! target keys once per run so the per-source loop only scores.

use crate::record::Record;
use crate::similarity::{indel_ratio, sorted_tokens};

/// Best target found for a source record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Position in the target slice.
    pub index: usize,
    /// Unrounded token-sort ratio, 0-100.
    pub score: f64,
}

/// Pre-tokenized target keys, read-only for the duration of a run.
#[derive(Debug, Clone)]
pub struct TargetIndex {
    keys: Vec<Vec<char>>,
}

impl TargetIndex {
    pub fn build(targets: &[Record]) -> Self {
        Self {
            keys: targets.iter().map(|t| sorted_tokens(&t.match_key)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Highest-scoring target for `match_key`.
    ///
    /// Returns `None` for an empty key or an empty index. Ties keep the
    /// earliest target.
    pub fn best_match(&self, match_key: &str) -> Option<Candidate> {
        if match_key.is_empty() || self.keys.is_empty() {
            return None;
        }

        let source = sorted_tokens(match_key);
        let mut best: Option<Candidate> = None;

        for (index, target) in self.keys.iter().enumerate() {
            let score = indel_ratio(&source, target);
            match best {
                Some(current) if score <= current.score => {}
                _ => best = Some(Candidate { index, score }),
            }
        }

        best
    }
}

/// One-shot candidate search of `source` against `targets`.
pub fn find_candidate(source: &Record, targets: &[Record]) -> Option<Candidate> {
    if source.match_key.is_empty() || targets.is_empty() {
        return None;
    }
    TargetIndex::build(targets).best_match(&source.match_key)
}
