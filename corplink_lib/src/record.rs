//! Record and result types shared by the engine and its collaborators.

use std::fmt;

use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};

use crate::classify::AcceptanceTier;

/// Which side of the linkage a record belongs to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    Source,
    Target,
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Target => write!(f, "target"),
        }
    }
}

/// Raw fields that take part in comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Name,
    Street,
    City,
    PostalCode,
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Street => write!(f, "street"),
            Self::City => write!(f, "city"),
            Self::PostalCode => write!(f, "postal code"),
        }
    }
}

/// One row as handed over by a loader, before normalization.
///
/// `None` means the field does not exist in the dataset at all; `Some("")`
/// means it exists but is blank for this row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub id: String,
    pub name: Option<String>,
    pub street_lines: Option<Vec<String>>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}

/// A normalized record ready for matching.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Record {
    pub id: String,
    pub display_name: String,
    pub match_key: String,
    pub city_norm: String,
    pub zip_norm: String,
    pub street_norm: String,
    pub composite_address: String,
}

/// A corroborating attribute.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    City,
    Zip,
    Street,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::City => "city",
            Self::Zip => "zip",
            Self::Street => "street",
        }
    }
}

/// Set of corroboration signals that fired for a pair.
///
/// Always iterated in the order city, zip, street.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlapSignals {
    pub city: bool,
    pub zip: bool,
    pub street: bool,
}

impl OverlapSignals {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = Signal> {
        [
            (self.city, Signal::City),
            (self.zip, Signal::Zip),
            (self.street, Signal::Street),
        ]
        .into_iter()
        .filter_map(|(fired, signal)| fired.then_some(signal))
    }

    pub fn contains(&self, signal: Signal) -> bool {
        match signal {
            Signal::City => self.city,
            Signal::Zip => self.zip,
            Signal::Street => self.street,
        }
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        !(self.city || self.zip || self.street)
    }
}

impl fmt::Display for OverlapSignals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|s| s.as_str()).collect();
        write!(f, "{}", names.join(", "))
    }
}

impl Serialize for OverlapSignals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for signal in self.iter() {
            seq.serialize_element(&signal)?;
        }
        seq.end()
    }
}

/// Linkage decision for one source record.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub source_id: String,
    pub target_id: Option<String>,
    /// Position of the accepted target in the target slice.
    pub target_index: Option<usize>,
    pub confidence_score: f64,
    pub overlap_signals: OverlapSignals,
    pub tier: Option<AcceptanceTier>,
}

impl MatchResult {
    pub fn unmatched(source_id: &str) -> Self {
        Self {
            source_id: source_id.to_string(),
            target_id: None,
            target_index: None,
            confidence_score: 0.0,
            overlap_signals: OverlapSignals::none(),
            tier: None,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.target_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signals_display_order() {
        let signals = OverlapSignals {
            city: true,
            zip: false,
            street: true,
        };
        assert_eq!(signals.to_string(), "city, street");
        assert_eq!(signals.len(), 2);
    }

    #[test]
    fn test_signals_empty() {
        let signals = OverlapSignals::none();
        assert!(signals.is_empty());
        assert_eq!(signals.to_string(), "");
        assert_eq!(signals.iter().count(), 0);
    }

    #[test]
    fn test_signals_serialize_as_list() {
        let signals = OverlapSignals {
            city: true,
            zip: true,
            street: true,
        };
        let json = serde_json::to_value(signals).unwrap();
        assert_eq!(json, serde_json::json!(["city", "zip", "street"]));
    }

    #[test]
    fn test_unmatched_result() {
        let result = MatchResult::unmatched("C-100");
        assert_eq!(result.source_id, "C-100");
        assert!(!result.is_matched());
        assert_eq!(result.confidence_score, 0.0);
        assert!(result.overlap_signals.is_empty());
        assert!(result.tier.is_none());
    }
}
