//! Persisted model artifact: trained booster plus the scoring schema
//!
//! An artifact directory holds two files:
//! - `model.gbdt` — the serialized tree ensemble
//! - `model_info.json` — the encoder, the ordered feature-name list, and
//!   run metadata
//!
//! The artifact is immutable once written; the scoring service loads it
//! read-only at startup.

use std::fmt;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use serde::{Deserialize, Serialize};

use crate::pipeline::encode::Encoder;
use crate::pipeline::trainer::TrainParams;

/// Serialized model file name inside the artifact directory.
pub const MODEL_FILE: &str = "model.gbdt";

/// Metadata file name inside the artifact directory.
pub const MODEL_INFO_FILE: &str = "model_info.json";

/// Metadata persisted alongside the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub trained_at: String,
    pub n_features: usize,
    pub train_rows: usize,
    pub val_rows: usize,
    /// Authoritative encoded column order — the scoring contract.
    pub feature_names: Vec<String>,
    pub encoder: Encoder,
    pub params: TrainParams,
}

/// A trained model bundled with its scoring schema.
pub struct ModelArtifact {
    pub model: GBDT,
    pub info: ModelInfo,
}

// The tree ensemble has no Debug impl of its own; show the metadata only.
impl fmt::Debug for ModelArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelArtifact")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

impl ModelArtifact {
    /// Persist the artifact into a directory.
    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create artifact directory: {}", dir.display()))?;

        let model_path = dir.join(MODEL_FILE);
        let model_str = model_path
            .to_str()
            .with_context(|| format!("Artifact path is not valid UTF-8: {}", model_path.display()))?;
        self.model
            .save_model(model_str)
            .map_err(|e| anyhow!("Failed to save model to {}: {}", model_path.display(), e))?;

        let info_path = dir.join(MODEL_INFO_FILE);
        let json = serde_json::to_string_pretty(&self.info)
            .context("Failed to serialize model info to JSON")?;
        std::fs::write(&info_path, json)
            .with_context(|| format!("Failed to write model info to {}", info_path.display()))?;

        Ok(())
    }

    /// Load an artifact from a directory. Missing or corrupt files are
    /// fatal — the scoring service refuses to start without a model.
    pub fn load(dir: &Path) -> Result<Self> {
        let info_path = dir.join(MODEL_INFO_FILE);
        anyhow::ensure!(
            info_path.exists(),
            "Model artifact not found at {}. Run: credo train",
            dir.display()
        );

        let info_json = std::fs::read_to_string(&info_path)
            .with_context(|| format!("Failed to read {}", info_path.display()))?;
        let info: ModelInfo = serde_json::from_str(&info_json)
            .with_context(|| format!("Corrupt model info file: {}", info_path.display()))?;

        anyhow::ensure!(
            info.feature_names == info.encoder.feature_names,
            "Corrupt model artifact: persisted feature list does not match the encoder schema"
        );

        let model_path = dir.join(MODEL_FILE);
        anyhow::ensure!(
            model_path.exists(),
            "Model file not found: {}",
            model_path.display()
        );
        let model_str = model_path
            .to_str()
            .with_context(|| format!("Artifact path is not valid UTF-8: {}", model_path.display()))?;
        let model = GBDT::load_model(model_str)
            .map_err(|e| anyhow!("Failed to load model from {}: {}", model_path.display(), e))?;

        Ok(Self { model, info })
    }

    /// Predicted default probability for one encoded feature vector.
    pub fn predict_proba(&self, features: Vec<f32>) -> f64 {
        let data: DataVec = vec![Data::new_test_data(features, None)];
        let predictions = self.model.predict(&data);
        (predictions.first().copied().unwrap_or_default() as f64).clamp(0.0, 1.0)
    }
}
