//! The `compare` subcommand: scores two names the way the matcher would.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use corplink_lib::{token_sort_ratio, Normalizer};
use serde::Serialize;

use crate::commands::matching::load_config;
use crate::output::{print_json, print_rows, OutputFormat, ReportRow};

/// Arguments for the `compare` subcommand.
#[derive(Args)]
pub struct CompareArgs {
    /// First company name
    pub name_a: String,

    /// Second company name
    pub name_b: String,

    /// TOML file with a custom legal suffix list
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct Comparison {
    pub key_a: String,
    pub key_b: String,
    pub score: f64,
}

pub fn compare(normalizer: &Normalizer, a: &str, b: &str) -> Comparison {
    let key_a = normalizer.match_key(a);
    let key_b = normalizer.match_key(b);
    let score = token_sort_ratio(&key_a, &key_b);
    Comparison {
        key_a,
        key_b,
        score,
    }
}

pub fn run(args: &CompareArgs, format: &OutputFormat) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let normalizer = Normalizer::new(&config.matching.legal_suffixes)?;
    let comparison = compare(&normalizer, &args.name_a, &args.name_b);

    match format {
        OutputFormat::Json => print_json(&comparison),
        _ => {
            let rows = vec![
                ReportRow::new("Key A", &comparison.key_a),
                ReportRow::new("Key B", &comparison.key_b),
                ReportRow::new("Token sort ratio", format!("{:.2}", comparison.score)),
            ];
            print_rows(&rows, format)?;
        }
    }

    Ok(())
}
