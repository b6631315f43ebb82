//! The `match` subcommand: links a source CSV against a target CSV.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use corplink_lib::export::{build_merged_rows, write_merged_csv, write_metrics_json};
use corplink_lib::loader::{load_records, location_lists};
use corplink_lib::{Config, Dataset, Engine, MatchingMetrics};
use indicatif::{ProgressBar, ProgressStyle};

use crate::output::{build_report_rows, print_json, print_rows, OutputFormat};

pub const MERGED_FILE: &str = "merged_companies.csv";
pub const METRICS_FILE: &str = "matching_metrics.json";

/// Arguments for the `match` subcommand.
#[derive(Args)]
pub struct MatchArgs {
    /// Source dataset (one row per company location)
    #[arg(long)]
    pub source: PathBuf,

    /// Target dataset to link against
    #[arg(long)]
    pub target: PathBuf,

    /// TOML file with matching settings and column mappings
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the minimum acceptance score (0-100)
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Directory for merged_companies.csv and matching_metrics.json
    #[arg(long, default_value = "output")]
    pub out_dir: PathBuf,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            let config = Config::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            tracing::info!("Loaded config from {}", path.display());
            Ok(config)
        }
        None => Ok(Config::default()),
    }
}

pub fn run(args: &MatchArgs, format: &OutputFormat) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(threshold) = args.threshold {
        config.matching.min_acceptance_threshold = threshold;
    }

    let raw_sources = load_records(&args.source, &config.source, Dataset::Source)
        .with_context(|| format!("Failed to read {}", args.source.display()))?;
    let raw_targets = load_records(&args.target, &config.target, Dataset::Target)
        .with_context(|| format!("Failed to read {}", args.target.display()))?;

    let engine = Engine::new(config.matching)?;
    let sources = engine.prepare(&raw_sources, Dataset::Source)?;
    let targets = engine.prepare(&raw_targets, Dataset::Target)?;

    let pb = if args.no_progress {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(sources.len() as u64)
    };
    pb.set_style(ProgressStyle::with_template(
        "[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} ({eta}) {msg}",
    )?);
    pb.set_message("matching...");

    let results = engine.resolve_with_progress(&sources, &targets, |_| pb.inc(1));

    let metrics = MatchingMetrics::compute(&results);
    pb.finish_with_message(format!(
        "{} of {} matched",
        metrics.matched_records, metrics.total_records
    ));

    let rows = build_merged_rows(&sources, &targets, &results, &location_lists(&raw_sources));

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create {}", args.out_dir.display()))?;

    let merged_path = args.out_dir.join(MERGED_FILE);
    let merged_file = File::create(&merged_path)
        .with_context(|| format!("Failed to create {}", merged_path.display()))?;
    write_merged_csv(BufWriter::new(merged_file), &rows)?;
    let metrics_path = args.out_dir.join(METRICS_FILE);
    let metrics_file = File::create(&metrics_path)
        .with_context(|| format!("Failed to create {}", metrics_path.display()))?;
    write_metrics_json(BufWriter::new(metrics_file), &metrics)?;

    eprintln!("Wrote {} rows to {}", rows.len(), merged_path.display());
    eprintln!("Wrote metrics to {}", metrics_path.display());

    match format {
        OutputFormat::Json => print_json(&metrics),
        _ => print_rows(&build_report_rows(&metrics), format)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_without_path() {
        let config = load_config(None).unwrap();
        assert_eq!(config.matching.min_acceptance_threshold, 60.0);
    }

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../corplink_lib/tests/fixtures")
            .join(name)
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("corplink-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn args(out_dir: PathBuf) -> MatchArgs {
        MatchArgs {
            source: fixture("company_dataset_1.csv"),
            target: fixture("company_dataset_2.csv"),
            config: None,
            threshold: None,
            out_dir,
            no_progress: true,
        }
    }

    #[test]
    fn test_run_writes_both_files() {
        let out_dir = scratch_dir("writes");
        run(&args(out_dir.clone()), &OutputFormat::Csv).unwrap();

        let merged = fs::read_to_string(out_dir.join(MERGED_FILE)).unwrap();
        assert_eq!(merged.lines().count(), 8);
        let metrics: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out_dir.join(METRICS_FILE)).unwrap())
                .unwrap();
        assert_eq!(metrics["matched_records"], 4);

        fs::remove_dir_all(&out_dir).unwrap();
    }

    #[test]
    fn test_unwritable_output_names_path() {
        let out_dir = scratch_dir("unwritable");
        // A directory where the merged file should go makes File::create fail
        fs::create_dir_all(out_dir.join(MERGED_FILE)).unwrap();

        let err = run(&args(out_dir.clone()), &OutputFormat::Table).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Failed to create"), "{}", message);
        assert!(message.contains(MERGED_FILE), "{}", message);

        fs::remove_dir_all(&out_dir).unwrap();
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let err = load_config(Some(Path::new("/nonexistent/corplink.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }
}
