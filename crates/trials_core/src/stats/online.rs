//! Online mean/variance recurrences.
//!
//! For the 1-based sample index `k`, previous mean `avg0` and new value `x`:
//!
//! ```text
//! avg1 = (x + (k - 1) * avg0) / k
//! var1 = (1 - 1/k) * var0 + (k + 1) * (avg1 - avg0)^2
//! ```
//!
//! The variance recurrence weights the mean shift by `k + 1`, not the
//! `k - 1` of Welford's method. Results are reproduced exactly as written.

use serde::{Deserialize, Serialize};

use crate::types::error::CoreError;

#[inline]
fn check_index(k: u64) -> Result<(), CoreError> {
    if k == 0 {
        return Err(CoreError::invalid_argument(
            "sample index k must be positive (0)",
        ));
    }
    Ok(())
}

/// Cumulative moving average after folding in sample `k`.
///
/// # Errors
///
/// Returns `CoreError::InvalidArgument` when `k == 0`.
#[inline]
pub fn update_mean(k: u64, avg0: f64, x: f64) -> Result<f64, CoreError> {
    check_index(k)?;
    let w = 1.0 / k as f64;
    Ok(w * (x + (k - 1) as f64 * avg0))
}

/// Variance estimate after the mean moved from `avg0` to `avg1` at sample `k`.
///
/// # Errors
///
/// Returns `CoreError::InvalidArgument` when `k == 0`.
#[inline]
pub fn update_variance(k: u64, var0: f64, avg0: f64, avg1: f64) -> Result<f64, CoreError> {
    check_index(k)?;
    let w = 1.0 - 1.0 / k as f64;
    let d = avg1 - avg0;
    Ok(w * var0 + (k + 1) as f64 * d * d)
}

/// Running `(k, mean, variance)` state.
///
/// Starts at `(0, 0.0, 0.0)`; each [`push`](Self::push) increments `k` and
/// applies both recurrences. State is never rolled back.
///
/// # Examples
///
/// ```rust
/// use trials_core::stats::RunningStats;
///
/// let mut stats = RunningStats::new();
/// for x in [1.0, 2.0, 3.0, 4.0, 5.0] {
///     stats.push(x).unwrap();
/// }
/// assert_eq!(stats.mean(), 3.0);
/// assert_eq!(stats.count(), 5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    variance: f64,
}

impl RunningStats {
    /// Empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one value into the estimate.
    pub fn push(&mut self, x: f64) -> Result<(), CoreError> {
        let k = self.count + 1;
        let avg0 = self.mean;
        let avg1 = update_mean(k, avg0, x)?;
        self.variance = update_variance(k, self.variance, avg0, avg1)?;
        self.mean = avg1;
        self.count = k;
        Ok(())
    }

    /// Number of samples folded in.
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Current mean estimate.
    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Current variance estimate.
    #[inline]
    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Resets to the empty state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
