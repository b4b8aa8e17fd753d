//! Raw loan-application loader and normalizer
//!
//! Reads the raw accepted-loans CSV (optionally gzip-compressed),
//! normalizes the core columns into a stable internal schema, builds the
//! binary target, and writes the processed dataset to Parquet. This is the
//! data contract the rest of the pipeline depends on: downstream stages
//! never see raw-file quirks like percent signs or "36 months" terms.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use polars::prelude::*;

use crate::pipeline::target::{attach_target, build_target_mask, count_mapped_rows, STATUS_COLUMN};
use crate::pipeline::values::column_to_string_vec;

/// Core raw columns kept by the normalizer, in output order.
pub const CORE_COLUMNS: &[&str] = &[
    "issue_d",
    "loan_status",
    "loan_amnt",
    "term",
    "int_rate",
    "installment",
    "grade",
    "sub_grade",
    "emp_length",
    "home_ownership",
    "annual_inc",
    "verification_status",
    "purpose",
    "addr_state",
    "dti",
    "delinq_2yrs",
    "inq_last_6mths",
    "open_acc",
    "pub_rec",
    "revol_bal",
    "revol_util",
    "total_acc",
    "application_type",
];

/// Columns stored as percent strings in the raw file ("13.56%").
const PERCENT_COLUMNS: &[&str] = &["int_rate", "revol_util"];

/// Columns coerced to floats after text cleanup.
const NUMERIC_COLUMNS: &[&str] = &[
    "loan_amnt",
    "installment",
    "annual_inc",
    "dti",
    "delinq_2yrs",
    "inq_last_6mths",
    "open_acc",
    "pub_rec",
    "revol_bal",
    "total_acc",
];

/// Raw issue-date column ("Dec-2015" style).
pub const ISSUE_DATE_COLUMN: &str = "issue_d";

/// Derived month bucket ("2015-12"), kept for temporal grouping.
pub const ISSUE_MONTH_COLUMN: &str = "issue_month";

/// Minimum fraction of rows whose issue date must parse; below this the
/// raw file format is considered broken.
const MIN_ISSUE_PARSE_RATE: f64 = 0.95;

/// Row accounting for one normalization run.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeStats {
    pub raw_rows: usize,
    pub kept_rows: usize,
    pub excluded_bad_issue_date: usize,
    pub excluded_unmapped_status: usize,
    pub bad_outcomes: usize,
    pub good_outcomes: usize,
}

/// Pick the accepted-loans file inside a raw data directory.
///
/// Prefers `accepted_*.csv.gz` over `accepted_*.csv`; a direct file path
/// is passed through untouched.
pub fn find_raw_file(raw: &Path) -> Result<PathBuf> {
    if raw.is_file() {
        return Ok(raw.to_path_buf());
    }

    let entries = std::fs::read_dir(raw)
        .with_context(|| format!("Failed to read raw data directory: {}", raw.display()))?;

    let mut names: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    names.sort();

    for suffix in [".csv.gz", ".csv"] {
        if let Some(path) = names.iter().find(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with("accepted_") && n.ends_with(suffix))
                .unwrap_or(false)
        }) {
            return Ok(path.clone());
        }
    }

    anyhow::bail!("No accepted_*.csv(.gz) found in {}", raw.display())
}

/// Read a raw CSV file with schema inference (gzip handled transparently).
pub fn read_raw_csv(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    let schema_length = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(schema_length)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?
        .finish()
        .with_context(|| format!("Failed to read CSV file: {}", path.display()))
}

/// Load a raw file and normalize it into the processed schema.
pub fn load_and_normalize(
    path: &Path,
    infer_schema_length: usize,
) -> Result<(DataFrame, NormalizeStats)> {
    let df = read_raw_csv(path, infer_schema_length)?;
    let df = select_core_columns(&df)?;
    let mut df = normalize_values(df)?;

    let mut stats = NormalizeStats {
        raw_rows: df.height(),
        ..Default::default()
    };

    df = derive_issue_month(df)?;
    stats.excluded_bad_issue_date = stats.raw_rows - df.height();

    let mask = build_target_mask(&df)?;
    let (bad, good, excluded) = count_mapped_rows(&mask);
    stats.bad_outcomes = bad;
    stats.good_outcomes = good;
    stats.excluded_unmapped_status = excluded;

    let df = attach_target(&df)?;
    stats.kept_rows = df.height();

    anyhow::ensure!(
        df.height() > 0,
        "No rows with a mappable loan status; processed dataset would be empty"
    );

    Ok((df, stats))
}

/// Keep only the known core columns, preserving `CORE_COLUMNS` order.
///
/// The status and issue-date columns are mandatory; the rest of the core
/// set is taken when present.
fn select_core_columns(df: &DataFrame) -> Result<DataFrame> {
    let available: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    anyhow::ensure!(
        available.contains(&STATUS_COLUMN.to_string()),
        "Status column '{}' not found in raw dataset",
        STATUS_COLUMN
    );
    anyhow::ensure!(
        available.contains(&ISSUE_DATE_COLUMN.to_string()),
        "Issue date column '{}' not found in raw dataset",
        ISSUE_DATE_COLUMN
    );

    let selection: Vec<String> = CORE_COLUMNS
        .iter()
        .filter(|c| available.contains(&c.to_string()))
        .map(|c| c.to_string())
        .collect();

    df.select(selection)
        .context("Failed to select core columns")
}

/// Clean percent fields, parse the term, and coerce numerics.
fn normalize_values(mut df: DataFrame) -> Result<DataFrame> {
    for col_name in PERCENT_COLUMNS {
        if let Ok(column) = df.column(col_name) {
            let parsed: Vec<Option<f64>> = column_to_string_vec(column)?
                .iter()
                .map(|v| v.as_deref().and_then(parse_percent))
                .collect();
            df.with_column(Column::new((*col_name).into(), parsed))?;
        }
    }

    if let Ok(column) = df.column("term") {
        let parsed: Vec<Option<f64>> = column_to_string_vec(column)?
            .iter()
            .map(|v| v.as_deref().and_then(parse_term))
            .collect();
        df.with_column(Column::new("term".into(), parsed))?;
    }

    for col_name in NUMERIC_COLUMNS {
        if let Ok(column) = df.column(col_name) {
            let cast = column.cast(&DataType::Float64).with_context(|| {
                format!("Failed to coerce column '{}' to numeric", col_name)
            })?;
            df.with_column(cast)?;
        }
    }

    Ok(df)
}

/// Parse issue dates, drop rows that do not parse, add the month bucket,
/// and remove the raw date column.
fn derive_issue_month(df: DataFrame) -> Result<DataFrame> {
    let raw_values = column_to_string_vec(df.column(ISSUE_DATE_COLUMN)?)?;
    let months: Vec<Option<String>> = raw_values
        .iter()
        .map(|v| v.as_deref().and_then(parse_issue_month))
        .collect();

    let parsed = months.iter().filter(|m| m.is_some()).count();
    let parse_rate = if df.height() == 0 {
        0.0
    } else {
        parsed as f64 / df.height() as f64
    };
    anyhow::ensure!(
        parse_rate >= MIN_ISSUE_PARSE_RATE,
        "issue_d parse rate too low: {:.3}. Check the raw file format.",
        parse_rate
    );

    let keep: BooleanChunked = months.iter().map(|m| m.is_some()).collect();
    let mut out = df.filter(&keep)?;

    let month_values: Vec<String> = months.into_iter().flatten().collect();
    out.with_column(Column::new(ISSUE_MONTH_COLUMN.into(), month_values))?;

    out.drop(ISSUE_DATE_COLUMN)
        .context("Failed to drop raw issue date column")
}

/// "13.56%" -> 13.56 (plain numbers also accepted)
fn parse_percent(value: &str) -> Option<f64> {
    value.trim().trim_end_matches('%').trim().parse().ok()
}

/// " 36 months" -> 36.0
fn parse_term(value: &str) -> Option<f64> {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

/// "Dec-2015" -> "2015-12"
fn parse_issue_month(value: &str) -> Option<String> {
    let date = NaiveDate::parse_from_str(&format!("01-{}", value.trim()), "%d-%b-%Y").ok()?;
    Some(date.format("%Y-%m").to_string())
}

/// Write the processed dataset to Parquet.
pub fn write_processed(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    ParquetWriter::new(file)
        .finish(df)
        .with_context(|| format!("Failed to write Parquet file: {}", path.display()))?;

    Ok(())
}

/// Read the processed dataset back from Parquet.
pub fn read_processed(path: &Path) -> Result<DataFrame> {
    anyhow::ensure!(
        path.exists(),
        "Processed dataset not found: {}. Run: credo normalize",
        path.display()
    );

    LazyFrame::scan_parquet(path, Default::default())
        .with_context(|| format!("Failed to open Parquet file: {}", path.display()))?
        .collect()
        .with_context(|| format!("Failed to read Parquet file: {}", path.display()))
}
