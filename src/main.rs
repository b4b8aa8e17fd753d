//! Credo: baseline credit-decisioning pipeline
//!
//! Normalizes raw LendingClub loan records, reports on data quality,
//! trains a gradient-boosted default classifier, and serves scores over
//! HTTP.

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;

use credo::cli::{Cli, Commands, TrainArgs};
use credo::pipeline::{
    compute_quality_report, find_raw_file, load_and_normalize, read_processed, train,
    write_processed, NormalizeStats,
};
use credo::report::{export_metrics, export_quality_report, PipelineSummary, TrainingMetrics};
use credo::service;
use credo::utils::{
    create_spinner, finish_with_success, print_banner, print_completion, print_config,
    print_count, print_info, print_step_header, print_step_time, print_success,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Normalize {
            raw,
            output,
            infer_schema_length,
        } => {
            print_banner(env!("CARGO_PKG_VERSION"));
            run_normalize(&raw, &output, infer_schema_length)?;
            print_completion();
            Ok(())
        }
        Commands::Quality { input, report } => {
            print_banner(env!("CARGO_PKG_VERSION"));
            run_quality(&input, &report)?;
            print_completion();
            Ok(())
        }
        Commands::Train(args) => {
            print_banner(env!("CARGO_PKG_VERSION"));
            run_train(&args)?;
            print_completion();
            Ok(())
        }
        Commands::Pipeline {
            raw,
            infer_schema_length,
            quality_report,
            train,
        } => run_pipeline(&raw, infer_schema_length, &quality_report, &train),
        Commands::Serve { model_dir, listen } => run_serve(&model_dir, &listen),
    }
}

/// Step 1: raw CSV(.gz) -> processed Parquet
fn run_normalize(raw: &Path, output: &Path, infer_schema_length: usize) -> Result<NormalizeStats> {
    print_step_header(1, "NORMALIZING RAW DATA");

    let raw_file = find_raw_file(raw)?;
    print_info(&format!("Raw file: {}", raw_file.display()));

    let start = Instant::now();
    let spinner = create_spinner("Reading and normalizing raw records...");
    let (mut df, stats) = load_and_normalize(&raw_file, infer_schema_length)?;
    finish_with_success(&spinner, "Raw records normalized");

    print_count("raw rows", stats.raw_rows, None);
    if stats.excluded_bad_issue_date > 0 {
        print_count(
            "rows excluded",
            stats.excluded_bad_issue_date,
            Some("(unparseable issue date)"),
        );
    }
    if stats.excluded_unmapped_status > 0 {
        print_count(
            "rows excluded",
            stats.excluded_unmapped_status,
            Some("(loan status not mappable to an outcome)"),
        );
    }
    print_count(
        "kept rows",
        stats.kept_rows,
        Some(&format!(
            "({} bad, {} good)",
            stats.bad_outcomes, stats.good_outcomes
        )),
    );

    write_processed(&mut df, output)?;
    print_success(&format!("Processed dataset written to {}", output.display()));
    print_step_time(start.elapsed());

    Ok(stats)
}

/// Step 2: processed Parquet -> data-quality JSON report
fn run_quality(input: &Path, report_path: &Path) -> Result<()> {
    print_step_header(2, "DATA QUALITY REPORT");

    let start = Instant::now();
    let spinner = create_spinner("Computing data-quality statistics...");
    let df = read_processed(input)?;
    let report = compute_quality_report(&df, input)?;
    finish_with_success(&spinner, "Quality statistics computed");

    print_count("rows", report.n_rows, None);
    print_count("columns", report.n_cols, None);
    if report.n_duplicates > 0 {
        print_count("duplicate rows", report.n_duplicates, None);
    }
    for (label, count) in &report.target_distribution {
        print_info(&format!("Target {}: {} rows", label, count));
    }

    export_quality_report(&report, report_path)?;
    print_success(&format!(
        "Quality report written to {}",
        report_path.display()
    ));
    print_step_time(start.elapsed());

    Ok(())
}

/// Step 3: processed Parquet -> model artifact + metrics JSON
fn run_train(args: &TrainArgs) -> Result<(usize, TrainingMetrics)> {
    print_step_header(3, "TRAINING CLASSIFIER");

    let start = Instant::now();
    let df = read_processed(&args.input)?;
    print_count("training rows", df.height(), None);

    let spinner = create_spinner("Fitting gradient-boosted classifier...");
    let outcome = train(&df, &args.params())?;
    finish_with_success(&spinner, "Classifier trained");

    let info = &outcome.artifact.info;
    print_count("encoded features", info.n_features, None);
    print_info(&format!(
        "Split: {} train / {} validation",
        info.train_rows, info.val_rows
    ));
    print_info(&format!(
        "Validation AUC {:.4}, Brier {:.4}",
        outcome.metrics.val_auc, outcome.metrics.val_brier
    ));

    outcome.artifact.save(&args.model_dir)?;
    print_success(&format!(
        "Model artifact written to {}",
        args.model_dir.display()
    ));

    export_metrics(&outcome.metrics, &args.metrics)?;
    print_success(&format!("Metrics written to {}", args.metrics.display()));
    print_step_time(start.elapsed());

    Ok((info.n_features, outcome.metrics))
}

/// All three batch steps back to back, with a summary table at the end.
fn run_pipeline(
    raw: &Path,
    infer_schema_length: usize,
    quality_report: &Path,
    train_args: &TrainArgs,
) -> Result<()> {
    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(raw, &train_args.input, &train_args.model_dir);

    let mut summary = PipelineSummary::new();

    let step = Instant::now();
    let stats = run_normalize(raw, &train_args.input, infer_schema_length)?;
    summary.normalize_time = step.elapsed();
    summary.raw_rows = stats.raw_rows;
    summary.processed_rows = stats.kept_rows;
    summary.excluded_rows = stats.excluded_bad_issue_date + stats.excluded_unmapped_status;

    let step = Instant::now();
    run_quality(&train_args.input, quality_report)?;
    summary.quality_time = step.elapsed();

    let step = Instant::now();
    let (n_features, metrics) = run_train(train_args)?;
    summary.train_time = step.elapsed();
    summary.n_features = n_features;
    summary.val_auc = Some(metrics.val_auc);
    summary.val_brier = Some(metrics.val_brier);

    summary.display();
    print_completion();

    Ok(())
}

/// Serve the trained model over HTTP until interrupted.
fn run_serve(model_dir: &Path, listen: &str) -> Result<()> {
    tracing_subscriber::fmt::init();

    tokio::runtime::Runtime::new()?.block_on(service::serve(model_dir, listen))
}
