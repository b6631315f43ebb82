//! Joined output: one merged row per source record, plus the metrics file.

use std::collections::HashMap;
use std::io::Write;

use serde::Serialize;

use crate::error::LinkError;
use crate::metrics::MatchingMetrics;
use crate::record::{MatchResult, Record};

/// Placeholder written for unmatched source records.
pub const NO_MATCH: &str = "NO MATCH";

/// One line of `merged_companies.csv`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MergedRow {
    pub source_id: String,
    pub source_name: String,
    pub target_id: String,
    pub target_name: String,
    pub source_locations: String,
    pub target_locations: String,
    pub overlapping_locations: String,
    pub confidence_score: f64,
}

/// Join results with their source and target records.
///
/// `results` must be in the same order as `sources`. `source_locations` comes
/// from [`crate::loader::location_lists`]; ids missing from it fall back to the
/// record's own composite address.
pub fn build_merged_rows(
    sources: &[Record],
    targets: &[Record],
    results: &[MatchResult],
    source_locations: &HashMap<String, String>,
) -> Vec<MergedRow> {
    sources
        .iter()
        .zip(results)
        .map(|(source, result)| {
            let target = result.target_index.and_then(|i| targets.get(i));
            MergedRow {
                source_id: source.id.clone(),
                source_name: source.display_name.clone(),
                target_id: result.target_id.clone().unwrap_or_default(),
                target_name: target
                    .map(|t| t.display_name.clone())
                    .unwrap_or_else(|| NO_MATCH.to_string()),
                source_locations: source_locations
                    .get(&source.id)
                    .cloned()
                    .unwrap_or_else(|| source.composite_address.clone()),
                target_locations: target
                    .map(|t| t.composite_address.clone())
                    .unwrap_or_default(),
                overlapping_locations: result.overlap_signals.to_string(),
                confidence_score: result.confidence_score,
            }
        })
        .collect()
}

/// Neutralize cells that spreadsheet applications would evaluate as formulas.
pub fn sanitize_csv_field(value: &str) -> String {
    match value.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{}", value),
        _ => value.to_string(),
    }
}

/// Write merged rows as CSV with a header line.
pub fn write_merged_csv<W: Write>(writer: W, rows: &[MergedRow]) -> Result<(), LinkError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        let row = MergedRow {
            source_name: sanitize_csv_field(&row.source_name),
            target_name: sanitize_csv_field(&row.target_name),
            ..row.clone()
        };
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write metrics as pretty-printed JSON.
pub fn write_metrics_json<W: Write>(
    mut writer: W,
    metrics: &MatchingMetrics,
) -> Result<(), LinkError> {
    serde_json::to_writer_pretty(&mut writer, metrics)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::AcceptanceTier;
    use crate::record::OverlapSignals;

    fn record(id: &str, name: &str, address: &str) -> Record {
        Record {
            id: id.to_string(),
            display_name: name.to_string(),
            match_key: name.to_uppercase(),
            city_norm: String::new(),
            zip_norm: String::new(),
            street_norm: String::new(),
            composite_address: address.to_string(),
        }
    }

    fn fixture() -> (Vec<Record>, Vec<Record>, Vec<MatchResult>) {
        let sources = vec![
            record("C1", "Acme Inc.", "1 Main St, Springfield"),
            record("C2", "=Evil", ""),
        ];
        let targets = vec![record("0", "ACME Corp", "1 Main Street, Springfield")];
        let results = vec![
            MatchResult {
                source_id: "C1".to_string(),
                target_id: Some("0".to_string()),
                target_index: Some(0),
                confidence_score: 100.0,
                overlap_signals: OverlapSignals {
                    city: true,
                    zip: false,
                    street: true,
                },
                tier: Some(AcceptanceTier::NearExact),
            },
            MatchResult::unmatched("C2"),
        ];
        (sources, targets, results)
    }

    #[test]
    fn test_build_rows() {
        let (sources, targets, results) = fixture();
        let mut locations = HashMap::new();
        locations.insert(
            "C1".to_string(),
            "1 Main St, Springfield | 9 Elm St, Shelbyville".to_string(),
        );
        let rows = build_merged_rows(&sources, &targets, &results, &locations);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].target_name, "ACME Corp");
        assert_eq!(
            rows[0].source_locations,
            "1 Main St, Springfield | 9 Elm St, Shelbyville"
        );
        assert_eq!(rows[0].target_locations, "1 Main Street, Springfield");
        assert_eq!(rows[0].overlapping_locations, "city, street");
        assert_eq!(rows[1].target_name, NO_MATCH);
        assert_eq!(rows[1].target_id, "");
        assert_eq!(rows[1].target_locations, "");
        assert_eq!(rows[1].confidence_score, 0.0);
    }

    #[test]
    fn test_csv_header_and_sanitizing() {
        let (sources, targets, results) = fixture();
        let rows = build_merged_rows(&sources, &targets, &results, &HashMap::new());
        let mut buf = Vec::new();
        write_merged_csv(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "source_id,source_name,target_id,target_name,source_locations,target_locations,overlapping_locations,confidence_score"
        );
        assert!(lines.next().unwrap().starts_with("C1,Acme Inc.,0,ACME Corp,"));
        assert!(lines.next().unwrap().starts_with("C2,'=Evil,,NO MATCH,"));
    }

    #[test]
    fn test_sanitize_plain_value() {
        assert_eq!(sanitize_csv_field("Acme"), "Acme");
        assert_eq!(sanitize_csv_field(""), "");
        assert_eq!(sanitize_csv_field("+1 555"), "'+1 555");
    }

    #[test]
    fn test_metrics_json() {
        let metrics = MatchingMetrics::compute(&[MatchResult::unmatched("C1")]);
        let mut buf = Vec::new();
        write_metrics_json(&mut buf, &metrics).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["total_records"], 1);
        assert_eq!(value["overall"]["unmatched_rate"], 100.0);
    }
}
