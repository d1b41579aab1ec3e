//! Lag and rolling-window features over the sales series
//!
//! All computations run over the date-ordered series with the
//! to-be-predicted row already appended, so the target row draws its
//! antecedent context from the same continuous series as the history.
//! Missing values (unparseable dates, the target row itself) never feed
//! a window; positions without enough history default to zero.

use crate::error::{PredictError, Result};
use std::collections::HashMap;
use std::hash::Hash;

/// Lag and rolling aggregates for one series position
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LagFeatures {
    pub lag_1: f64,
    pub lag_7: f64,
    pub lag_30: f64,
    pub roll_7: f64,
    pub roll_30: f64,
}

impl LagFeatures {
    /// Feature values keyed by their trained column names
    pub fn named(&self) -> [(&'static str, f64); 5] {
        [
            ("sales_lag_1", self.lag_1),
            ("sales_lag_7", self.lag_7),
            ("sales_lag_30", self.lag_30),
            ("sales_roll_7", self.roll_7),
            ("sales_roll_30", self.roll_30),
        ]
    }
}

/// Value `k` positions earlier, zero when the position has no antecedent
/// or the antecedent is missing.
fn shifted(values: &[Option<f64>], index: usize, k: usize) -> f64 {
    if index >= k {
        values[index - k].unwrap_or(0.0)
    } else {
        0.0
    }
}

/// Mean of the observed values in the trailing window `[index - window,
/// index)`. The window sits on the shifted-by-one series, so the value at
/// `index` itself never leaks into its own feature. Requires at least one
/// observation, else zero.
fn trailing_mean(values: &[Option<f64>], index: usize, window: usize) -> f64 {
    let start = index.saturating_sub(window);
    let mut sum = 0.0;
    let mut count = 0usize;

    for value in values[start..index].iter().flatten() {
        sum += value;
        count += 1;
    }

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Compute lag and rolling features for every position of a single
/// ordered series.
pub fn lag_features(values: &[Option<f64>]) -> Vec<LagFeatures> {
    (0..values.len())
        .map(|i| LagFeatures {
            lag_1: shifted(values, i, 1),
            lag_7: shifted(values, i, 7),
            lag_30: shifted(values, i, 30),
            roll_7: trailing_mean(values, i, 7),
            roll_30: trailing_mean(values, i, 30),
        })
        .collect()
}

/// Compute lag and rolling features for a series holding several
/// interleaved groups.
///
/// The series is partitioned by key into independent ordered
/// subsequences, each subsequence is scanned on its own, and results are
/// scattered back to the original positions. Rows of different groups
/// never contaminate each other's statistics.
pub fn lag_features_grouped<K>(keys: &[K], values: &[Option<f64>]) -> Result<Vec<LagFeatures>>
where
    K: Eq + Hash,
{
    if keys.len() != values.len() {
        return Err(PredictError::Internal(format!(
            "Group keys ({}) and values ({}) must have the same length",
            keys.len(),
            values.len()
        )));
    }

    // Partition original indices by key, preserving series order
    let mut partitions: HashMap<&K, Vec<usize>> = HashMap::new();
    for (index, key) in keys.iter().enumerate() {
        partitions.entry(key).or_default().push(index);
    }

    let mut out = vec![LagFeatures::default(); values.len()];
    for indices in partitions.values() {
        let group_values: Vec<Option<f64>> = indices.iter().map(|&i| values[i]).collect();
        let group_features = lag_features(&group_values);
        for (&original, features) in indices.iter().zip(group_features) {
            out[original] = features;
        }
    }

    Ok(out)
}
