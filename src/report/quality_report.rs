//! Data-quality report document and export

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Flat key-value quality report, regenerated wholesale each run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    pub generated_at: String,
    pub dataset_path: String,
    pub n_rows: usize,
    pub n_cols: usize,
    pub n_duplicates: usize,
    pub null_rate_by_col: BTreeMap<String, f64>,
    pub target_distribution: BTreeMap<String, u64>,
}

/// Write the quality report to a JSON file, creating parent directories.
pub fn export_quality_report(report: &QualityReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize quality report to JSON")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write quality report to {}", path.display()))?;

    Ok(())
}
