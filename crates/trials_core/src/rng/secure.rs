//! Cryptographically secure source backed by the operating system.

use rand::rngs::OsRng;
use rand::RngCore;

use super::{check_range, span, RandomSource};
use crate::types::error::CoreError;

/// 2^32, the normalisation divisor for one 32-bit draw.
const U32_RANGE: f64 = 4_294_967_296.0;

/// Integers derived from OS entropy.
///
/// Each draw takes four bytes of entropy as an unsigned 32-bit value `x`,
/// normalises it to `u = x / 2^32` in `[0, 1)` and returns
/// `floor(min + (max - min + 1) * u)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CryptographicRandom;

impl CryptographicRandom {
    /// Creates a new OS-backed source.
    pub fn new() -> Self {
        Self
    }

    /// Uniform value in `[0, 1)` from 32 bits of entropy.
    pub fn next_unit(&mut self) -> Result<f64, CoreError> {
        let mut data = [0u8; 4];
        OsRng
            .try_fill_bytes(&mut data)
            .map_err(|e| CoreError::EntropyUnavailable(e.to_string()))?;
        Ok(u32::from_le_bytes(data) as f64 / U32_RANGE)
    }
}

/// Maps a unit value onto `[min, max]`.
#[inline]
pub(crate) fn map_unit(min: i32, max: i32, u: f64) -> i32 {
    let value = (min as f64 + span(min, max) as f64 * u).floor();
    // u < 1 keeps the value at most max; the clamp only guards rounding at the extremes
    value.clamp(min as f64, max as f64) as i32
}

impl RandomSource for CryptographicRandom {
    fn next(&mut self, min: i32, max: i32) -> Result<i32, CoreError> {
        check_range(min, max)?;
        let u = self.next_unit()?;
        Ok(map_unit(min, max, u))
    }

    fn name(&self) -> &'static str {
        "cryptographic"
    }
}
