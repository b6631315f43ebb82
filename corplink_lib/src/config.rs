//! Run configuration: matching policy and dataset column mappings.
//!
//! Loaded from TOML. Every section is optional; a section that is present
//! replaces that section's defaults as a whole.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classify::DEFAULT_MIN_ACCEPTANCE_THRESHOLD;
use crate::error::LinkError;
use crate::normalize::DEFAULT_LEGAL_SUFFIXES;

/// Matching policy.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MatchConfig {
    /// Floor below which no candidate is accepted, 0-100.
    pub min_acceptance_threshold: f64,
    /// Source keys shorter than this many chars are never scored.
    pub min_key_length: usize,
    /// Legal-entity suffixes stripped from names before scoring.
    pub legal_suffixes: Vec<String>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            min_acceptance_threshold: DEFAULT_MIN_ACCEPTANCE_THRESHOLD,
            min_key_length: 1,
            legal_suffixes: DEFAULT_LEGAL_SUFFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<(), LinkError> {
        if !(0.0..=100.0).contains(&self.min_acceptance_threshold) {
            return Err(LinkError::Config(format!(
                "min_acceptance_threshold must be between 0 and 100, got {}",
                self.min_acceptance_threshold
            )));
        }
        if self.legal_suffixes.iter().any(|s| s.trim().is_empty()) {
            return Err(LinkError::Config(
                "legal_suffixes must not contain empty entries".to_string(),
            ));
        }
        Ok(())
    }
}

/// Maps CSV header names onto record fields.
///
/// An unmapped field is treated as absent from the dataset.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ColumnMap {
    /// Identifier column; the 0-based row index is used when unset.
    pub id: Option<String>,
    pub name: Option<String>,
    /// Street line columns, joined in this order.
    pub street: Vec<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}

impl ColumnMap {
    /// Customer-master layout used for the source dataset.
    pub fn source_defaults() -> Self {
        Self {
            id: Some("custnmbr".to_string()),
            name: Some("custname".to_string()),
            street: vec!["sStreet1".to_string(), "sStreet2".to_string()],
            city: Some("sCity".to_string()),
            state: Some("sProvState".to_string()),
            postal_code: Some("sPostalZip".to_string()),
        }
    }

    /// Layout used for the target dataset. It has no id column.
    pub fn target_defaults() -> Self {
        Self {
            id: None,
            name: Some("custname".to_string()),
            street: vec![
                "address1".to_string(),
                "address2".to_string(),
                "address3".to_string(),
            ],
            city: Some("city".to_string()),
            state: Some("state".to_string()),
            postal_code: Some("zip".to_string()),
        }
    }
}

/// Top-level configuration file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub matching: MatchConfig,
    #[serde(default = "ColumnMap::source_defaults")]
    pub source: ColumnMap,
    #[serde(default = "ColumnMap::target_defaults")]
    pub target: ColumnMap,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            matching: MatchConfig::default(),
            source: ColumnMap::source_defaults(),
            target: ColumnMap::target_defaults(),
        }
    }
}

impl Config {
    /// Parse and validate TOML content.
    pub fn from_toml_str(content: &str) -> Result<Self, LinkError> {
        let config: Config =
            toml::from_str(content).map_err(|e| LinkError::Config(e.to_string()))?;
        config.matching.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> Result<Self, LinkError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
