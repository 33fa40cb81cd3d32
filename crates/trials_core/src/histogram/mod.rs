//! Fixed-width frequency histogram over a real interval.
//!
//! `Histogram::new(n, min, max)` partitions `[min, max]` into `n` bins of
//! width `delta = (max - min) / n`. Bin `i` spans
//! `[min + i*delta, min + (i+1)*delta]`; the last upper bound is pinned to
//! `max` so the bins cover the interval exactly.
//!
//! Placement tests upper bounds only: a value goes into the first bin whose
//! upper bound is `>= value`. Values below `min` therefore land in bin 0.

use serde::{Deserialize, Serialize};

use crate::types::error::CoreError;

/// One histogram bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    /// Lower edge (informational, never tested).
    pub lower: f64,
    /// Inclusive upper edge.
    pub upper: f64,
    /// Number of values placed in this bin.
    pub count: u64,
    /// Display label, the decimal bin index.
    pub label: String,
}

/// Fixed-width bin accumulator.
///
/// # Examples
///
/// ```rust
/// use trials_core::histogram::Histogram;
///
/// let mut histogram = Histogram::new(4, 0.0, 1.0).unwrap();
/// assert_eq!(histogram.add(0.3).unwrap(), 1);
/// assert_eq!(histogram.add(0.25).unwrap(), 0);
/// assert_eq!(histogram.total(), 2);
/// assert!(histogram.add(1.5).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    min: f64,
    max: f64,
    delta: f64,
    bins: Vec<Bin>,
    total: u64,
}

impl Histogram {
    /// Creates `num_bins` empty bins over `[min_value, max_value]`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidArgument` if `max_value <= min_value`
    /// (including NaN bounds) or `num_bins == 0`.
    pub fn new(num_bins: usize, min_value: f64, max_value: f64) -> Result<Self, CoreError> {
        if min_value.is_nan() || max_value.is_nan() || max_value <= min_value {
            return Err(CoreError::invalid_argument(format!(
                "max value {} not greater than min value {}",
                max_value, min_value
            )));
        }
        if num_bins == 0 {
            return Err(CoreError::invalid_argument("bin count must be positive"));
        }

        let delta = (max_value - min_value) / num_bins as f64;
        let bins = (0..num_bins)
            .map(|i| {
                let upper = if i + 1 == num_bins {
                    max_value
                } else {
                    min_value + (i + 1) as f64 * delta
                };
                Bin {
                    lower: min_value + i as f64 * delta,
                    upper,
                    count: 0,
                    label: i.to_string(),
                }
            })
            .collect();

        Ok(Self {
            min: min_value,
            max: max_value,
            delta,
            bins,
            total: 0,
        })
    }

    /// Places `value` in the first bin whose upper bound is `>= value` and
    /// returns that bin's index.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::OutOfRange` when the value exceeds the last upper
    /// bound (or is NaN). No state changes in that case.
    pub fn add(&mut self, value: f64) -> Result<usize, CoreError> {
        let index = self.bin_index(value).ok_or(CoreError::OutOfRange {
            value,
            upper: self.max,
        })?;
        self.bins[index].count += 1;
        self.total += 1;
        Ok(index)
    }

    /// Index of the bin `value` would be placed in, without mutating.
    pub fn bin_index(&self, value: f64) -> Option<usize> {
        self.bins.iter().position(|bin| value <= bin.upper)
    }

    /// Zeroes all counts and the total. Bins are kept.
    pub fn clear(&mut self) {
        for bin in self.bins.iter_mut() {
            bin.count = 0;
        }
        self.total = 0;
    }

    /// All bins in order.
    #[inline]
    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    /// Counts in bin order.
    pub fn counts(&self) -> Vec<u64> {
        self.bins.iter().map(|b| b.count).collect()
    }

    /// Number of values placed since construction or the last clear.
    #[inline]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of bins.
    #[inline]
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// Always false; a histogram has at least one bin.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Bin width.
    #[inline]
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Lower bound of the domain.
    #[inline]
    pub fn min_value(&self) -> f64 {
        self.min
    }

    /// Upper bound of the domain.
    #[inline]
    pub fn max_value(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_construction() {
        let histogram = Histogram::new(50, 0.0, 1.0).unwrap();
        assert_eq!(histogram.len(), 50);
        assert_relative_eq!(histogram.delta(), 0.02);
        assert_eq!(histogram.bins()[0].lower, 0.0);
        assert_eq!(histogram.bins()[49].upper, 1.0);
        assert_eq!(histogram.bins()[7].label, "7");
        assert_eq!(histogram.total(), 0);
    }

    #[test]
    fn test_offset_domain_bounds() {
        let histogram = Histogram::new(4, 2.0, 4.0).unwrap();
        let uppers: Vec<f64> = histogram.bins().iter().map(|b| b.upper).collect();
        assert_eq!(uppers, vec![2.5, 3.0, 3.5, 4.0]);
        assert_eq!(histogram.bins()[2].lower, 3.0);
    }

    #[test]
    fn test_invalid_domain() {
        assert!(matches!(
            Histogram::new(10, 1.0, 1.0),
            Err(CoreError::InvalidArgument(_))
        ));
        assert!(matches!(
            Histogram::new(10, 2.0, 1.0),
            Err(CoreError::InvalidArgument(_))
        ));
        assert!(Histogram::new(10, f64::NAN, 1.0).is_err());
        assert!(Histogram::new(0, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_upper_bound_inclusive() {
        let mut histogram = Histogram::new(2, 0.0, 1.0).unwrap();
        assert_eq!(histogram.add(0.5).unwrap(), 0);
        assert_eq!(histogram.add(1.0).unwrap(), 1);
        assert_eq!(histogram.counts(), vec![1, 1]);
    }

    #[test]
    fn test_below_minimum_lands_in_first_bin() {
        let mut histogram = Histogram::new(5, 0.0, 1.0).unwrap();
        assert_eq!(histogram.add(-3.0).unwrap(), 0);
        assert_eq!(histogram.bins()[0].count, 1);
    }

    #[test]
    fn test_out_of_range_leaves_state() {
        let mut histogram = Histogram::new(5, 0.0, 1.0).unwrap();
        histogram.add(0.1).unwrap();
        let before = histogram.clone();

        let err = histogram.add(1.0 + 1e-9).unwrap_err();
        assert!(matches!(err, CoreError::OutOfRange { upper, .. } if upper == 1.0));
        assert!(histogram.add(f64::NAN).is_err());
        assert_eq!(histogram, before);
    }

    #[test]
    fn test_add_twice() {
        let mut histogram = Histogram::new(10, 0.0, 1.0).unwrap();
        histogram.add(0.33).unwrap();
        histogram.add(0.33).unwrap();
        assert_eq!(histogram.bins()[3].count, 2);
        assert_eq!(histogram.total(), 2);
    }

    #[test]
    fn test_clear_keeps_bins() {
        let mut histogram = Histogram::new(3, -1.0, 1.0).unwrap();
        histogram.add(0.0).unwrap();
        histogram.add(0.9).unwrap();
        histogram.clear();

        assert_eq!(histogram.total(), 0);
        assert_eq!(histogram.counts(), vec![0, 0, 0]);
        assert_eq!(histogram.len(), 3);
        assert_eq!(histogram.bins()[2].upper, 1.0);
    }

    proptest! {
        #[test]
        fn test_sum_equals_total(values in prop::collection::vec(-0.5f64..1.0, 0..200), bins in 1usize..64) {
            let mut histogram = Histogram::new(bins, 0.0, 1.0).unwrap();
            for v in values.iter() {
                histogram.add(*v).unwrap();
            }
            let sum: u64 = histogram.bins().iter().map(|b| b.count).sum();
            prop_assert_eq!(sum, histogram.total());
            prop_assert_eq!(sum, values.len() as u64);
        }

        #[test]
        fn test_add_is_additive(value in 0.0f64..=1.0, bins in 1usize..64) {
            let mut histogram = Histogram::new(bins, 0.0, 1.0).unwrap();
            let i = histogram.add(value).unwrap();
            let before = histogram.bins()[i].count;
            let total = histogram.total();

            histogram.add(value).unwrap();
            histogram.add(value).unwrap();
            prop_assert_eq!(histogram.bins()[i].count, before + 2);
            prop_assert_eq!(histogram.total(), total + 2);
        }

        #[test]
        fn test_bins_contiguous(min in -100.0f64..100.0, width in 0.001f64..100.0, bins in 1usize..128) {
            let histogram = Histogram::new(bins, min, min + width).unwrap();
            prop_assert_eq!(histogram.bins()[0].lower, min);
            prop_assert_eq!(histogram.bins()[bins - 1].upper, min + width);
            for pair in histogram.bins().windows(2) {
                prop_assert!(pair[0].upper <= pair[1].upper);
            }
        }
    }
}
