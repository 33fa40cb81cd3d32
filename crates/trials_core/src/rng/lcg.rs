//! Linear congruential generator.
//!
//! State update `s <- (a*s + c) mod m` with `a = 1103515245`, `c = 12345`,
//! `m = 2^31`. Output is `(s mod (max - min + 1)) + min`.
//!
//! When `max - min + 1` does not divide `m` the low residues are slightly
//! over-represented. That bias is part of the generator's contract and is not
//! corrected.

use super::{check_range, span, RandomSource};
use crate::types::error::CoreError;

/// Multiplier `a`.
pub const LCG_MULTIPLIER: u64 = 1_103_515_245;
/// Increment `c`.
pub const LCG_INCREMENT: u64 = 12_345;
/// Modulus `m = 2^31`.
pub const LCG_MODULUS: u64 = 1 << 31;

/// Deterministic generator with 32-bit unsigned state.
///
/// # Examples
///
/// ```rust
/// use trials_core::rng::{LinearCongruentialRandom, RandomSource};
///
/// let mut rng = LinearCongruentialRandom::new(0);
/// let first: Vec<i32> = (0..3).map(|_| rng.next(0, 99).unwrap()).collect();
/// assert_eq!(first, vec![45, 6, 75]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinearCongruentialRandom {
    state: u32,
}

impl LinearCongruentialRandom {
    /// Creates a generator with the given seed (0 by default).
    #[inline]
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Current internal state.
    #[inline]
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Advances the state once and returns it.
    #[inline]
    pub fn advance(&mut self) -> u32 {
        let next = (LCG_MULTIPLIER * self.state as u64 + LCG_INCREMENT) % LCG_MODULUS;
        self.state = next as u32;
        self.state
    }
}

impl RandomSource for LinearCongruentialRandom {
    #[inline]
    fn next(&mut self, min: i32, max: i32) -> Result<i32, CoreError> {
        check_range(min, max)?;
        let s = self.advance() as i64;
        Ok((s % span(min, max) + min as i64) as i32)
    }

    fn name(&self) -> &'static str {
        "linear_congruential"
    }
}
