//! Gradient-boosted default-risk trainer
//!
//! Fits the one-hot encoder, performs the seeded stratified split, trains
//! a boosted-tree classifier with logistic loss, and evaluates AUC and
//! Brier score on the held-out partition.

use std::collections::HashSet;

use anyhow::{Context, Result};
use chrono::Utc;
use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::model::{ModelArtifact, ModelInfo};
use crate::pipeline::encode::Encoder;
use crate::pipeline::metrics::{brier_score, roc_auc};
use crate::pipeline::split::stratified_split;
use crate::pipeline::target::TARGET_COLUMN;
use crate::report::model_report::TrainingMetrics;

/// Training hyperparameters. Defaults are baseline values, not tuned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainParams {
    pub seed: u64,
    pub valid_fraction: f64,
    pub iterations: usize,
    pub shrinkage: f64,
    pub max_depth: u32,
    /// Row subsampling per iteration. 1.0 keeps training deterministic.
    pub data_sample_ratio: f64,
    /// Feature subsampling per tree. 1.0 keeps training deterministic.
    pub feature_sample_ratio: f64,
}

impl Default for TrainParams {
    fn default() -> Self {
        Self {
            seed: 42,
            valid_fraction: 0.2,
            iterations: 300,
            shrinkage: 0.05,
            max_depth: 6,
            data_sample_ratio: 1.0,
            feature_sample_ratio: 1.0,
        }
    }
}

/// Everything a training run produces.
#[derive(Debug)]
pub struct TrainOutcome {
    pub artifact: ModelArtifact,
    pub metrics: TrainingMetrics,
}

/// Train on a processed dataset.
pub fn train(df: &DataFrame, params: &TrainParams) -> Result<TrainOutcome> {
    let target = df
        .column(TARGET_COLUMN)
        .with_context(|| format!("Missing required column: {}", TARGET_COLUMN))?;

    let labels: Vec<i32> = target
        .cast(&DataType::Int32)?
        .i32()?
        .into_iter()
        .map(|v| v.context("Null value in target column"))
        .collect::<Result<_>>()?;

    let classes: HashSet<i32> = labels.iter().copied().collect();
    anyhow::ensure!(
        classes.len() >= 2,
        "Target column has fewer than two classes present; cannot train a classifier"
    );

    let encoder = Encoder::fit(df, TARGET_COLUMN)?;
    let rows = encoder.transform(df)?;

    let (train_idx, valid_idx) =
        stratified_split(&labels, params.valid_fraction, params.seed)?;
    anyhow::ensure!(
        !valid_idx.is_empty(),
        "Validation partition is empty; increase the dataset size or valid_fraction"
    );

    // The boosting library's logistic loss expects ±1 labels.
    let mut train_data: DataVec = train_idx
        .iter()
        .map(|&i| {
            Data::new_training_data(
                rows[i].clone(),
                1.0,
                if labels[i] == 1 { 1.0 } else { -1.0 },
                None,
            )
        })
        .collect();

    let mut config = Config::new();
    config.set_feature_size(encoder.width());
    config.set_max_depth(params.max_depth);
    config.set_iterations(params.iterations);
    config.set_shrinkage(params.shrinkage as f32);
    config.set_data_sample_ratio(params.data_sample_ratio);
    config.set_feature_sample_ratio(params.feature_sample_ratio);
    config.set_loss("LogLikelyhood");

    let mut model = GBDT::new(&config);
    model.fit(&mut train_data);

    let valid_data: DataVec = valid_idx
        .iter()
        .map(|&i| Data::new_test_data(rows[i].clone(), None))
        .collect();
    let predictions = model.predict(&valid_data);

    let probabilities: Vec<f64> = predictions
        .iter()
        .map(|&p| (p as f64).clamp(0.0, 1.0))
        .collect();
    let valid_labels: Vec<i32> = valid_idx.iter().map(|&i| labels[i]).collect();

    let metrics = TrainingMetrics {
        val_auc: roc_auc(&valid_labels, &probabilities)?,
        val_brier: brier_score(&valid_labels, &probabilities)?,
    };

    let info = ModelInfo {
        model_type: "gbdt".to_string(),
        trained_at: Utc::now().to_rfc3339(),
        n_features: encoder.width(),
        train_rows: train_idx.len(),
        val_rows: valid_idx.len(),
        feature_names: encoder.feature_names.clone(),
        encoder,
        params: params.clone(),
    };

    Ok(TrainOutcome {
        artifact: ModelArtifact { model, info },
        metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable_frame(n: usize) -> DataFrame {
        // High loan amounts default, low ones repay; grades follow suit
        let amounts: Vec<f64> = (0..n).map(|i| if i % 2 == 0 { 1000.0 } else { 30000.0 }).collect();
        let grades: Vec<&str> = (0..n).map(|i| if i % 2 == 0 { "A" } else { "F" }).collect();
        let targets: Vec<i32> = (0..n).map(|i| (i % 2) as i32).collect();

        df! {
            "loan_amnt" => amounts,
            "grade" => grades,
            "target" => targets,
        }
        .unwrap()
    }

    fn small_params() -> TrainParams {
        TrainParams {
            iterations: 20,
            max_depth: 3,
            ..TrainParams::default()
        }
    }

    #[test]
    fn test_train_on_separable_data() {
        let df = separable_frame(100);
        let outcome = train(&df, &small_params()).unwrap();

        assert!(
            outcome.metrics.val_auc > 0.9,
            "separable data should give high AUC, got {}",
            outcome.metrics.val_auc
        );
        assert!(outcome.metrics.val_brier < 0.25);
    }

    #[test]
    fn test_feature_names_match_encoder() {
        let df = separable_frame(60);
        let outcome = train(&df, &small_params()).unwrap();

        let info = &outcome.artifact.info;
        assert_eq!(info.feature_names, info.encoder.feature_names);
        assert_eq!(info.n_features, info.feature_names.len());
        assert_eq!(info.train_rows + info.val_rows, 60);
    }

    #[test]
    fn test_single_class_label_rejected() {
        let df = df! {
            "loan_amnt" => [1.0f64, 2.0, 3.0, 4.0],
            "target" => [1i32, 1, 1, 1],
        }
        .unwrap();

        let result = train(&df, &small_params());
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("fewer than two classes"));
    }

    #[test]
    fn test_missing_target_rejected() {
        let df = df! {
            "loan_amnt" => [1.0f64, 2.0],
        }
        .unwrap();

        assert!(train(&df, &small_params()).is_err());
    }

    #[test]
    fn test_training_reproducible_with_same_seed() {
        let df = separable_frame(80);
        let params = small_params();

        let a = train(&df, &params).unwrap();
        let b = train(&df, &params).unwrap();

        assert_eq!(a.metrics.val_auc, b.metrics.val_auc);
        assert_eq!(a.metrics.val_brier, b.metrics.val_brier);
    }
}
