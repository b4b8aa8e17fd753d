//! Validation metrics report for a training run

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Held-out validation metrics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrainingMetrics {
    /// Discrimination: area under the ROC curve.
    pub val_auc: f64,
    /// Calibration: mean squared error of probability vs outcome.
    pub val_brier: f64,
}

/// Write the metrics report to a JSON file, creating parent directories.
pub fn export_metrics(metrics: &TrainingMetrics, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(metrics)
        .context("Failed to serialize metrics report to JSON")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write metrics report to {}", path.display()))?;

    Ok(())
}
