//! Validation metrics: discrimination (AUC) and calibration (Brier score)

use anyhow::Result;

/// Area under the ROC curve, computed via the rank-sum (Mann-Whitney)
/// statistic with tied scores assigned their average rank.
pub fn roc_auc(labels: &[i32], scores: &[f64]) -> Result<f64> {
    anyhow::ensure!(
        labels.len() == scores.len(),
        "labels and scores must have the same length"
    );
    anyhow::ensure!(!labels.is_empty(), "Cannot compute AUC on an empty set");

    let n_pos = labels.iter().filter(|&&l| l == 1).count();
    let n_neg = labels.len() - n_pos;
    anyhow::ensure!(
        n_pos > 0 && n_neg > 0,
        "AUC requires both classes present in the validation set"
    );

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[a]
            .partial_cmp(&scores[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Average ranks over ties
    let mut ranks = vec![0.0f64; scores.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        let avg_rank = (i + j) as f64 / 2.0 + 1.0;
        for k in i..=j {
            ranks[order[k]] = avg_rank;
        }
        i = j + 1;
    }

    let rank_sum_pos: f64 = labels
        .iter()
        .zip(ranks.iter())
        .filter(|(&l, _)| l == 1)
        .map(|(_, &r)| r)
        .sum();

    let n_pos = n_pos as f64;
    let n_neg = n_neg as f64;
    Ok((rank_sum_pos - n_pos * (n_pos + 1.0) / 2.0) / (n_pos * n_neg))
}

/// Brier score: mean squared error between predicted probability and the
/// binary outcome. Lower is better; 0.25 is the score of a constant 0.5.
pub fn brier_score(labels: &[i32], scores: &[f64]) -> Result<f64> {
    anyhow::ensure!(
        labels.len() == scores.len(),
        "labels and scores must have the same length"
    );
    anyhow::ensure!(
        !labels.is_empty(),
        "Cannot compute Brier score on an empty set"
    );

    let sum: f64 = labels
        .iter()
        .zip(scores.iter())
        .map(|(&l, &p)| (p - l as f64).powi(2))
        .sum();
    Ok(sum / labels.len() as f64)
}
