//! Structural validation of raw records before a run.

use std::collections::HashMap;

use crate::error::LinkError;
use crate::record::{Dataset, RawRecord, RecordField};

/// Check that every comparison field exists on the record.
///
/// Blank values are fine; only absent fields are rejected.
pub fn validate_record(record: &RawRecord, dataset: Dataset) -> Result<(), LinkError> {
    let missing = if record.name.is_none() {
        Some(RecordField::Name)
    } else if record.street_lines.is_none() {
        Some(RecordField::Street)
    } else if record.city.is_none() {
        Some(RecordField::City)
    } else if record.postal_code.is_none() {
        Some(RecordField::PostalCode)
    } else {
        None
    };

    match missing {
        Some(field) => Err(LinkError::InvalidInput {
            dataset,
            record_id: record.id.clone(),
            field,
        }),
        None => Ok(()),
    }
}

/// Validate a whole dataset, stopping at the first structural failure.
///
/// Rows sharing an id but carrying different names are allowed (branch rows of
/// one customer) but logged, since they usually point at a bad id column.
pub fn validate_records(records: &[RawRecord], dataset: Dataset) -> Result<(), LinkError> {
    for record in records {
        validate_record(record, dataset)?;
    }

    for conflict in name_conflicts(records) {
        tracing::warn!(
            "{} id '{}' appears with different names: '{}' and '{}'",
            dataset,
            conflict.id,
            conflict.first_name,
            conflict.other_name
        );
    }

    Ok(())
}

/// An id whose rows disagree on the company name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameConflict<'a> {
    pub id: &'a str,
    pub first_name: &'a str,
    pub other_name: &'a str,
}

/// Rows whose name differs from the first name seen for their id.
///
/// Names are compared trimmed and ASCII case-insensitively.
pub fn name_conflicts(records: &[RawRecord]) -> Vec<NameConflict<'_>> {
    let mut names_by_id: HashMap<&str, &str> = HashMap::new();
    let mut conflicts = Vec::new();

    for record in records {
        let name = record.name.as_deref().unwrap_or_default();
        match names_by_id.get(record.id.as_str()) {
            Some(&first) if !first.trim().eq_ignore_ascii_case(name.trim()) => {
                conflicts.push(NameConflict {
                    id: &record.id,
                    first_name: first,
                    other_name: name,
                });
            }
            Some(_) => {}
            None => {
                names_by_id.insert(&record.id, name);
            }
        }
    }

    conflicts
}
