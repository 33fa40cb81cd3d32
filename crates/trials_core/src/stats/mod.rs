//! Single-pass statistics and domain scaling.
//!
//! - [`update_mean`] / [`update_variance`]: the two recurrences applied per sample
//! - [`RunningStats`]: `(k, mean, variance)` state folded one sample at a time
//! - [`scale`]: linear map from the integer source domain to the real target domain

mod online;

pub use online::{update_mean, update_variance, RunningStats};

use crate::types::error::CoreError;

/// Maps `raw` from `[lmin, lmax]` onto `[dmin, dmax]`.
///
/// `scaled = dmin + (raw - lmin) * (dmax - dmin) / (lmax - lmin)`
///
/// # Errors
///
/// Returns `CoreError::InvalidArgument` when `lmax == lmin`.
///
/// # Examples
///
/// ```rust
/// use trials_core::stats::scale;
///
/// assert_eq!(scale(10, -40, 60, 0.0, 1.0).unwrap(), 0.5);
/// assert!(scale(3, 3, 3, 0.0, 1.0).is_err());
/// ```
#[inline]
pub fn scale(raw: i32, lmin: i32, lmax: i32, dmin: f64, dmax: f64) -> Result<f64, CoreError> {
    if lmax == lmin {
        return Err(CoreError::invalid_argument(format!(
            "degenerate source domain [{}, {}]",
            lmin, lmax
        )));
    }
    let offset = raw as i64 - lmin as i64;
    let width = lmax as i64 - lmin as i64;
    Ok(dmin + offset as f64 * (dmax - dmin) / width as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_scale_endpoints() {
        assert_eq!(scale(-40, -40, 60, 0.0, 1.0).unwrap(), 0.0);
        assert_eq!(scale(60, -40, 60, 0.0, 1.0).unwrap(), 1.0);
        assert_relative_eq!(scale(0, 0, 3, -1.0, 2.0).unwrap(), -1.0);
        assert_relative_eq!(scale(2, 0, 3, -1.0, 2.0).unwrap(), 1.0);
    }

    #[test]
    fn test_scale_full_i32_range_does_not_overflow() {
        let lo = i32::MIN + 1;
        let hi = i32::MAX - 1;
        assert_eq!(scale(lo, lo, hi, 0.0, 1.0).unwrap(), 0.0);
        assert_eq!(scale(hi, lo, hi, 0.0, 1.0).unwrap(), 1.0);
    }

    #[test]
    fn test_scale_degenerate_domain() {
        assert!(matches!(
            scale(5, 5, 5, 0.0, 1.0),
            Err(CoreError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_scale_outside_source_domain() {
        // Values outside [lmin, lmax] extrapolate linearly
        assert_relative_eq!(scale(-1, 0, 10, 0.0, 1.0).unwrap(), -0.1);
    }
}
