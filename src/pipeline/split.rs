//! Seeded stratified train/validation split
//!
//! Reproducibility invariant: the same labels and the same seed always
//! produce the same partition. Class proportions are preserved by
//! splitting within each label group.

use std::collections::BTreeMap;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Split row indices into (train, validation) partitions, stratified on
/// the label.
pub fn stratified_split(
    labels: &[i32],
    valid_fraction: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>)> {
    anyhow::ensure!(
        (0.0..1.0).contains(&valid_fraction),
        "valid_fraction must be in [0, 1), got {}",
        valid_fraction
    );
    anyhow::ensure!(!labels.is_empty(), "Cannot split an empty dataset");

    // BTreeMap keeps class iteration order deterministic
    let mut by_class: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
    for (i, &label) in labels.iter().enumerate() {
        by_class.entry(label).or_default().push(i);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut valid = Vec::new();

    for (_, mut indices) in by_class {
        indices.shuffle(&mut rng);

        let mut n_valid = (indices.len() as f64 * valid_fraction).round() as usize;
        // Keep at least one training row per class
        if n_valid == indices.len() && n_valid > 0 {
            n_valid -= 1;
        }

        valid.extend_from_slice(&indices[..n_valid]);
        train.extend_from_slice(&indices[n_valid..]);
    }

    train.sort_unstable();
    valid.sort_unstable();

    Ok((train, valid))
}
