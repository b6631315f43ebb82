//! CSV loading into raw records, driven by a [`ColumnMap`].
//!
//! A column missing from the header leaves that field `None` on every row,
//! which validation later reports. A short row yields `Some("")` for the
//! cells it lacks.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::address::record_address;
use crate::config::ColumnMap;
use crate::error::LinkError;
use crate::record::{Dataset, RawRecord};

/// Header positions resolved once per file.
struct ColumnPositions {
    id: Option<usize>,
    name: Option<usize>,
    street: Option<Vec<usize>>,
    city: Option<usize>,
    state: Option<usize>,
    postal_code: Option<usize>,
}

impl ColumnPositions {
    fn resolve(
        headers: &StringRecord,
        columns: &ColumnMap,
        dataset: Dataset,
    ) -> Result<Self, LinkError> {
        let find = |name: Option<&str>| -> Option<usize> {
            let name = name?;
            let position = headers.iter().position(|h| h.trim() == name);
            if position.is_none() {
                tracing::warn!("{} dataset has no column '{}'", dataset, name);
            }
            position
        };

        let id = match &columns.id {
            Some(column) => Some(
                headers
                    .iter()
                    .position(|h| h.trim() == column.as_str())
                    .ok_or_else(|| LinkError::MissingColumn {
                        dataset,
                        column: column.clone(),
                    })?,
            ),
            None => None,
        };

        // Street is present if at least one configured line column exists.
        let street_positions: Vec<usize> = columns
            .street
            .iter()
            .filter_map(|c| find(Some(c.as_str())))
            .collect();
        let street = (!street_positions.is_empty()).then_some(street_positions);

        Ok(Self {
            id,
            name: find(columns.name.as_deref()),
            street,
            city: find(columns.city.as_deref()),
            state: find(columns.state.as_deref()),
            postal_code: find(columns.postal_code.as_deref()),
        })
    }

    fn extract(&self, row: &StringRecord, row_index: usize) -> RawRecord {
        let cell = |position: Option<usize>| -> Option<String> {
            position.map(|p| row.get(p).unwrap_or("").to_string())
        };

        let id = match self.id {
            Some(p) => row.get(p).unwrap_or("").trim().to_string(),
            None => row_index.to_string(),
        };

        RawRecord {
            id,
            name: cell(self.name),
            street_lines: self
                .street
                .as_ref()
                .map(|ps| ps.iter().map(|&p| row.get(p).unwrap_or("").to_string()).collect()),
            city: cell(self.city),
            state: cell(self.state),
            postal_code: cell(self.postal_code),
        }
    }
}

/// Read every row of a headed CSV stream.
pub fn read_records<R: Read>(
    reader: R,
    columns: &ColumnMap,
    dataset: Dataset,
) -> Result<Vec<RawRecord>, LinkError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let positions = ColumnPositions::resolve(&headers, columns, dataset)?;

    let mut records = Vec::new();
    for (row_index, row) in rdr.records().enumerate() {
        let row = row?;
        records.push(positions.extract(&row, row_index));
    }

    tracing::info!("Loaded {} {} records", records.len(), dataset);
    Ok(records)
}

/// Open and read a CSV file.
pub fn load_records(
    path: &Path,
    columns: &ColumnMap,
    dataset: Dataset,
) -> Result<Vec<RawRecord>, LinkError> {
    let file = File::open(path)?;
    read_records(file, columns, dataset)
}

/// All distinct non-empty composite addresses per id, joined with `" | "`.
///
/// Multiple rows with one id are branches of the same company; the list keeps
/// first-seen order.
pub fn location_lists(records: &[RawRecord]) -> HashMap<String, String> {
    let mut grouped: HashMap<&str, Vec<String>> = HashMap::new();
    for record in records {
        let entry = grouped.entry(record.id.as_str()).or_default();
        let address = record_address(record);
        if !address.is_empty() && !entry.contains(&address) {
            entry.push(address);
        }
    }

    grouped
        .into_iter()
        .map(|(id, addresses)| (id.to_string(), addresses.join(" | ")))
        .collect()
}
