//! Binary target construction from the loan status field
//!
//! The raw `loan_status` column is the only source of the label, so it must
//! never survive into the features consumed by training or scoring. The
//! functions here build the 0/1 target from a fixed status mapping, exclude
//! rows whose status is unmapped (in-progress or ambiguous loans), and drop
//! the status column unconditionally.

use anyhow::{Context, Result};
use polars::prelude::*;

use crate::pipeline::values::column_to_string_vec;

/// Raw column the label is derived from.
pub const STATUS_COLUMN: &str = "loan_status";

/// Derived binary label column: 1 = default-like outcome, 0 = fully paid.
pub const TARGET_COLUMN: &str = "target";

/// Statuses that map to 1 (default-like outcomes).
pub const BAD_STATUSES: &[&str] = &[
    "Charged Off",
    "Default",
    "Late (31-120 days)",
    "Late (16-30 days)",
    "Does not meet the credit policy. Status:Charged Off",
];

/// Statuses that map to 0 (loan repaid in full).
pub const GOOD_STATUSES: &[&str] = &[
    "Fully Paid",
    "Does not meet the credit policy. Status:Fully Paid",
];

/// Map a single status value to its label, or None when unmapped.
pub fn map_status(status: &str) -> Option<i32> {
    if BAD_STATUSES.contains(&status) {
        Some(1)
    } else if GOOD_STATUSES.contains(&status) {
        Some(0)
    } else {
        None
    }
}

/// Build the per-row label mask.
///
/// Returns a Vec<Option<i32>> where:
/// - Some(1) for default-like statuses
/// - Some(0) for fully-paid statuses
/// - None for unmapped statuses (row is excluded downstream)
pub fn build_target_mask(df: &DataFrame) -> Result<Vec<Option<i32>>> {
    let status_col = df.column(STATUS_COLUMN).with_context(|| {
        format!("Status column '{}' not found in raw dataset", STATUS_COLUMN)
    })?;

    let values = column_to_string_vec(status_col)?;

    Ok(values
        .iter()
        .map(|v| v.as_deref().and_then(map_status))
        .collect())
}

/// Attach the binary target to the frame, drop rows with an unmapped
/// status, and remove the status column.
pub fn attach_target(df: &DataFrame) -> Result<DataFrame> {
    let mask = build_target_mask(df)?;

    let keep: BooleanChunked = mask.iter().map(|v| v.is_some()).collect();
    let mut out = df.filter(&keep)?;

    let labels: Vec<i32> = mask.into_iter().flatten().collect();
    out.with_column(Column::new(TARGET_COLUMN.into(), labels))?;

    out.drop(STATUS_COLUMN)
        .with_context(|| format!("Failed to drop status column '{}'", STATUS_COLUMN))
}

/// Count how many rows map to each label and how many are excluded.
pub fn count_mapped_rows(mask: &[Option<i32>]) -> (usize, usize, usize) {
    let bad = mask.iter().filter(|v| **v == Some(1)).count();
    let good = mask.iter().filter(|v| **v == Some(0)).count();
    let excluded = mask.iter().filter(|v| v.is_none()).count();
    (bad, good, excluded)
}
