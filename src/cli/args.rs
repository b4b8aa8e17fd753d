//! Command-line argument definitions using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::pipeline::trainer::TrainParams;

/// Credo - Baseline credit-decisioning pipeline over LendingClub loan records
#[derive(Parser, Debug)]
#[command(name = "credo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalize raw CSV(.gz) loan records into a processed Parquet dataset
    Normalize {
        /// Raw dataset: a CSV(.gz) file, or a directory scanned for accepted_*.csv.gz
        #[arg(short, long, default_value = "data/raw/lending-club")]
        raw: PathBuf,

        /// Output path for the processed Parquet dataset
        #[arg(short, long, default_value = "data/processed/train.parquet")]
        output: PathBuf,

        /// Number of rows to use for schema inference.
        /// Use 0 for a full table scan (slow for large files).
        #[arg(long, default_value = "10000")]
        infer_schema_length: usize,
    },

    /// Generate a data-quality report from the processed dataset
    Quality {
        /// Processed Parquet dataset
        #[arg(short, long, default_value = "data/processed/train.parquet")]
        input: PathBuf,

        /// Output path for the quality report JSON
        #[arg(long, default_value = "artifacts/reports/data_quality.json")]
        report: PathBuf,
    },

    /// Train the gradient-boosted classifier and export its artifacts
    Train(TrainArgs),

    /// Run normalize, quality, and train back to back
    Pipeline {
        /// Raw dataset: a CSV(.gz) file, or a directory scanned for accepted_*.csv.gz
        #[arg(short, long, default_value = "data/raw/lending-club")]
        raw: PathBuf,

        /// Number of rows to use for schema inference
        #[arg(long, default_value = "10000")]
        infer_schema_length: usize,

        /// Output path for the quality report JSON
        #[arg(long, default_value = "artifacts/reports/data_quality.json")]
        quality_report: PathBuf,

        #[command(flatten)]
        train: TrainArgs,
    },

    /// Serve the trained model over HTTP
    Serve {
        /// Directory holding the model artifact
        #[arg(short, long, default_value = "artifacts/models")]
        model_dir: PathBuf,

        /// Address to listen on
        #[arg(short, long, default_value = "127.0.0.1:8080")]
        listen: String,
    },
}

/// Training inputs and hyperparameters, shared by `train` and `pipeline`.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Processed Parquet dataset
    #[arg(short, long, default_value = "data/processed/train.parquet")]
    pub input: PathBuf,

    /// Directory to write the model artifact into
    #[arg(short, long, default_value = "artifacts/models")]
    pub model_dir: PathBuf,

    /// Output path for the validation metrics JSON
    #[arg(long, default_value = "artifacts/reports/metrics.json")]
    pub metrics: PathBuf,

    /// Seed for the stratified train/validation split
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Fraction of rows held out for validation
    #[arg(long, default_value = "0.2", value_parser = validate_fraction)]
    pub valid_fraction: f64,

    /// Number of boosting iterations
    #[arg(long, default_value = "300")]
    pub iterations: usize,

    /// Learning rate (shrinkage) applied to each tree
    #[arg(long, default_value = "0.05")]
    pub shrinkage: f64,

    /// Maximum tree depth
    #[arg(long, default_value = "6")]
    pub max_depth: u32,

    /// Row subsampling ratio per iteration. 1.0 keeps training deterministic.
    #[arg(long, default_value = "1.0")]
    pub data_sample_ratio: f64,

    /// Feature subsampling ratio per iteration. 1.0 keeps training deterministic.
    #[arg(long, default_value = "1.0")]
    pub feature_sample_ratio: f64,
}

impl TrainArgs {
    pub fn params(&self) -> TrainParams {
        TrainParams {
            seed: self.seed,
            valid_fraction: self.valid_fraction,
            iterations: self.iterations,
            shrinkage: self.shrinkage,
            max_depth: self.max_depth,
            data_sample_ratio: self.data_sample_ratio,
            feature_sample_ratio: self.feature_sample_ratio,
        }
    }
}

/// Validator for valid_fraction
fn validate_fraction(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(0.0..1.0).contains(&value) {
        Err(format!(
            "valid_fraction must be in [0.0, 1.0), got {}",
            value
        ))
    } else {
        Ok(value)
    }
}
