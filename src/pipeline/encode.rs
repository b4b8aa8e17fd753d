//! One-hot feature encoding shared by training and scoring
//!
//! The [`Encoder`] is fitted once on the processed dataset and persisted
//! inside the model artifact. Its flattened feature-name list is the
//! scoring contract: the service must produce vectors with exactly the
//! same columns, in the same order, as training did.
//!
//! Encoding rules:
//! - numeric columns pass through, with a `<col>_nan` missing indicator
//!   and a zero fill for nulls
//! - categorical columns expand to one 0/1 column per category observed at
//!   fit time, plus a `<col>_nan` missing bucket
//! - category values never seen at fit time encode as all-zeros

use std::collections::{BTreeSet, HashSet};

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::pipeline::values::{column_to_f64_vec, column_to_string_vec};

/// Missing-indicator suffix, matching the `dummy_na` naming convention.
const MISSING_SUFFIX: &str = "nan";

/// Per-request encoding failures, reported by the scoring service without
/// affecting availability.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    #[error("missing required field '{0}'")]
    MissingField(String),
    #[error("field '{field}' has wrong type: expected {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },
}

/// How a raw column is encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeatureKind {
    Numeric,
    Categorical { categories: Vec<String> },
}

/// One raw column of the scoring schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub column: String,
    pub kind: FeatureKind,
}

/// Deterministic one-hot encoder fitted at training time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encoder {
    /// Raw columns in dataset order.
    pub specs: Vec<FeatureSpec>,
    /// Flattened encoded column names, in output order.
    pub feature_names: Vec<String>,
}

/// Replace runs of characters outside `[0-9A-Za-z_]` with a single `_`.
///
/// Tree-model backends are picky about special characters in feature
/// names, so encoded names are cleaned the same way at fit and score time.
pub fn sanitize_feature_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_sep = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            out.push(ch);
            last_was_sep = false;
        } else if !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
    }
    out
}

impl Encoder {
    /// Fit the encoder on every non-target column of the frame.
    ///
    /// Numeric dtypes become [`FeatureKind::Numeric`]; everything else is
    /// treated as categorical with the sorted set of observed values.
    pub fn fit(df: &DataFrame, target: &str) -> Result<Self> {
        let mut specs = Vec::new();
        let mut feature_names = Vec::new();
        let mut seen = HashSet::new();

        for col_name in df.get_column_names() {
            if col_name.as_str() == target {
                continue;
            }
            let column = df.column(col_name.as_str())?;
            let base = sanitize_feature_name(col_name.as_str());

            let kind = if column.dtype().is_primitive_numeric() {
                push_unique(&mut feature_names, &mut seen, base.clone());
                push_unique(
                    &mut feature_names,
                    &mut seen,
                    format!("{}_{}", base, MISSING_SUFFIX),
                );
                FeatureKind::Numeric
            } else {
                let values = column_to_string_vec(column)?;
                let categories: Vec<String> =
                    values.into_iter().flatten().collect::<BTreeSet<_>>().into_iter().collect();
                for category in &categories {
                    push_unique(
                        &mut feature_names,
                        &mut seen,
                        format!("{}_{}", base, sanitize_feature_name(category)),
                    );
                }
                push_unique(
                    &mut feature_names,
                    &mut seen,
                    format!("{}_{}", base, MISSING_SUFFIX),
                );
                FeatureKind::Categorical { categories }
            };

            specs.push(FeatureSpec {
                column: col_name.to_string(),
                kind,
            });
        }

        anyhow::ensure!(
            !specs.is_empty(),
            "Dataset has no feature columns besides '{}'",
            target
        );

        Ok(Self {
            specs,
            feature_names,
        })
    }

    /// Number of encoded columns.
    pub fn width(&self) -> usize {
        self.feature_names.len()
    }

    /// Raw fields the scoring service requires in every request.
    pub fn required_fields(&self) -> Vec<&str> {
        self.specs.iter().map(|s| s.column.as_str()).collect()
    }

    /// Encode a whole frame into fixed-order rows for training.
    pub fn transform(&self, df: &DataFrame) -> Result<Vec<Vec<f32>>> {
        let n_rows = df.height();
        let mut rows = vec![vec![0.0f32; self.width()]; n_rows];
        let mut offset = 0;

        for spec in &self.specs {
            let column = df
                .column(&spec.column)
                .with_context(|| format!("Encoder column '{}' not found", spec.column))?;

            match &spec.kind {
                FeatureKind::Numeric => {
                    let values = column_to_f64_vec(column)?;
                    for (i, value) in values.iter().enumerate() {
                        match value {
                            Some(v) => rows[i][offset] = *v as f32,
                            None => rows[i][offset + 1] = 1.0,
                        }
                    }
                    offset += 2;
                }
                FeatureKind::Categorical { categories } => {
                    let values = column_to_string_vec(column)?;
                    for (i, value) in values.iter().enumerate() {
                        match value {
                            Some(v) => {
                                if let Some(j) = categories.iter().position(|c| c == v) {
                                    rows[i][offset + j] = 1.0;
                                }
                            }
                            None => rows[i][offset + categories.len()] = 1.0,
                        }
                    }
                    offset += categories.len() + 1;
                }
            }
        }

        Ok(rows)
    }

    /// Encode a single JSON feature mapping for scoring.
    ///
    /// Every raw column is required; JSON null routes to the missing
    /// bucket; unknown categories encode as all-zeros; extra fields are
    /// ignored.
    pub fn encode_row(
        &self,
        features: &serde_json::Map<String, Value>,
    ) -> Result<Vec<f32>, EncodeError> {
        let mut row = vec![0.0f32; self.width()];
        let mut offset = 0;

        for spec in &self.specs {
            let value = features
                .get(&spec.column)
                .ok_or_else(|| EncodeError::MissingField(spec.column.clone()))?;

            match &spec.kind {
                FeatureKind::Numeric => {
                    match value {
                        Value::Number(n) => {
                            let v = n.as_f64().ok_or_else(|| EncodeError::WrongType {
                                field: spec.column.clone(),
                                expected: "number",
                            })?;
                            row[offset] = v as f32;
                        }
                        Value::Null => row[offset + 1] = 1.0,
                        _ => {
                            return Err(EncodeError::WrongType {
                                field: spec.column.clone(),
                                expected: "number",
                            })
                        }
                    }
                    offset += 2;
                }
                FeatureKind::Categorical { categories } => {
                    match value {
                        Value::String(s) => {
                            if let Some(j) = categories.iter().position(|c| c == s) {
                                row[offset + j] = 1.0;
                            }
                        }
                        Value::Null => row[offset + categories.len()] = 1.0,
                        _ => {
                            return Err(EncodeError::WrongType {
                                field: spec.column.clone(),
                                expected: "string",
                            })
                        }
                    }
                    offset += categories.len() + 1;
                }
            }
        }

        Ok(row)
    }
}

fn push_unique(names: &mut Vec<String>, seen: &mut HashSet<String>, base: String) {
    let mut name = base.clone();
    let mut suffix = 2;
    while !seen.insert(name.clone()) {
        name = format!("{}_{}", base, suffix);
        suffix += 1;
    }
    names.push(name);
}
