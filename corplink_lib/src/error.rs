//! Error types for the library layer.

use thiserror::Error;

use crate::record::{Dataset, RecordField};

/// Errors produced by the library layer.
///
/// "No candidate" and "below threshold" are not errors: they end as an
/// unmatched `MatchResult`. Only structural problems with the inputs or the
/// configuration surface here.
#[derive(Error, Debug)]
pub enum LinkError {
    /// A record lacks a required comparison field entirely (as opposed to
    /// carrying an empty value).
    #[error("Invalid input: {dataset} record '{record_id}' has no {field} field")]
    InvalidInput {
        dataset: Dataset,
        record_id: String,
        field: RecordField,
    },
    /// The configured id column does not exist in the dataset header.
    #[error("Missing column '{column}' in {dataset} dataset")]
    MissingColumn { dataset: Dataset, column: String },
    /// Configuration could not be parsed or holds an invalid value.
    #[error("Config error: {0}")]
    Config(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
