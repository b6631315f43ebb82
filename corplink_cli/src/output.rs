use anyhow::Result;
use corplink_lib::MatchingMetrics;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    /// Unknown names fall back to a table.
    pub fn parse(name: &str) -> Self {
        match name {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            "markdown" | "md" => OutputFormat::Markdown,
            _ => OutputFormat::Table,
        }
    }
}

#[derive(Tabled, Serialize, Debug, PartialEq)]
pub struct ReportRow {
    #[tabled(rename = "Metric")]
    #[serde(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    #[serde(rename = "Value")]
    pub value: String,
}

impl ReportRow {
    pub fn new(metric: &str, value: impl ToString) -> Self {
        Self {
            metric: metric.to_string(),
            value: value.to_string(),
        }
    }
}

// -- Row builders --

pub fn build_report_rows(metrics: &MatchingMetrics) -> Vec<ReportRow> {
    vec![
        ReportRow::new("Source records", metrics.total_records),
        ReportRow::new("Matched records", metrics.matched_records),
        ReportRow::new("Match rate", percent(metrics.overall.match_rate)),
        ReportRow::new("Unmatched rate", percent(metrics.overall.unmatched_rate)),
        ReportRow::new(
            "One-to-many targets",
            format!(
                "{} ({})",
                metrics.overall.one_to_many_cases,
                percent(metrics.overall.one_to_many_percentage)
            ),
        ),
        ReportRow::new("Perfect scores (100)", metrics.score_distribution.perfect),
        ReportRow::new("High scores (90-99)", metrics.score_distribution.high),
        ReportRow::new("Borderline scores", metrics.score_distribution.borderline),
        ReportRow::new(
            "Exact name matches",
            percent(metrics.match_quality.exact_names_percent),
        ),
        ReportRow::new(
            "Fuzzy name matches",
            percent(metrics.match_quality.fuzzy_names_percent),
        ),
        ReportRow::new(
            "Full location overlap",
            percent(metrics.location_verification.full_overlap_percent),
        ),
        ReportRow::new(
            "Partial location overlap",
            percent(metrics.location_verification.partial_overlap_percent),
        ),
        ReportRow::new(
            "Name only",
            percent(metrics.location_verification.name_only_percent),
        ),
    ]
}

fn percent(value: f64) -> String {
    format!("{:.2}%", value)
}

// -- Printers --

pub fn print_table<T: Tabled>(rows: &[T]) {
    println!("{}", Table::new(rows));
}

pub fn print_markdown<T: Tabled>(rows: &[T]) {
    let mut table = Table::new(rows);
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_csv<T: Serialize>(rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_json<T: Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

/// Print rows in a tabular format. JSON callers serialize their own payload.
pub fn print_rows<T: Tabled + Serialize>(rows: &[T], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => print_table(rows),
        OutputFormat::Markdown => print_markdown(rows),
        OutputFormat::Csv => print_csv(rows)?,
        OutputFormat::Json => print_json(&rows),
    }
    Ok(())
}
