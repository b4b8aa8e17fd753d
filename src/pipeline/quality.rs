//! Data-quality statistics over the processed dataset
//!
//! Pure read-only computation; the caller decides where the report goes.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use polars::prelude::*;

use crate::pipeline::target::TARGET_COLUMN;
use crate::pipeline::values::column_to_string_vec;
use crate::report::quality_report::QualityReport;

/// Compute the full quality report for a processed dataset.
pub fn compute_quality_report(df: &DataFrame, dataset_path: &Path) -> Result<QualityReport> {
    df.column(TARGET_COLUMN)
        .with_context(|| format!("Missing required column: {}", TARGET_COLUMN))?;

    let (n_rows, n_cols) = df.shape();

    Ok(QualityReport {
        generated_at: Utc::now().to_rfc3339(),
        dataset_path: dataset_path.display().to_string(),
        n_rows,
        n_cols,
        n_duplicates: count_duplicate_rows(df)?,
        null_rate_by_col: null_rates(df)?,
        target_distribution: target_distribution(df)?,
    })
}

/// Per-column null rate, rounded to six decimals.
pub fn null_rates(df: &DataFrame) -> Result<BTreeMap<String, f64>> {
    let n_rows = df.height();
    let mut rates = BTreeMap::new();

    for col_name in df.get_column_names() {
        let column = df.column(col_name.as_str())?;
        let rate = if n_rows == 0 {
            0.0
        } else {
            column.null_count() as f64 / n_rows as f64
        };
        rates.insert(col_name.to_string(), round6(rate));
    }

    Ok(rates)
}

/// Number of rows that are exact duplicates of an earlier row.
pub fn count_duplicate_rows(df: &DataFrame) -> Result<usize> {
    if df.height() == 0 {
        return Ok(0);
    }

    // Build a row key from every column's string form; nulls get a
    // sentinel that cannot collide with real values.
    let columns: Vec<Vec<Option<String>>> = df
        .get_columns()
        .iter()
        .map(column_to_string_vec)
        .collect::<Result<_>>()?;

    let mut seen = HashMap::new();
    let mut duplicates = 0;
    for row in 0..df.height() {
        let key: Vec<String> = columns
            .iter()
            .map(|col| col[row].clone().unwrap_or_else(|| "\u{0}null".to_string()))
            .collect();
        let count = seen.entry(key).or_insert(0usize);
        if *count > 0 {
            duplicates += 1;
        }
        *count += 1;
    }

    Ok(duplicates)
}

/// Label class counts keyed by the label's string form.
pub fn target_distribution(df: &DataFrame) -> Result<BTreeMap<String, u64>> {
    let target = df
        .column(TARGET_COLUMN)
        .with_context(|| format!("Missing required column: {}", TARGET_COLUMN))?;

    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for value in column_to_string_vec(target)? {
        let key = value.unwrap_or_else(|| "null".to_string());
        *counts.entry(key).or_insert(0) += 1;
    }

    Ok(counts)
}

fn round6(v: f64) -> f64 {
    (v * 1e6).round() / 1e6
}
