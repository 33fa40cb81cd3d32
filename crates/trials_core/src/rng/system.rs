//! General-purpose pseudo-random source.
//!
//! Wraps `rand::StdRng`. Seeded from process entropy by default; an explicit
//! seed makes the sequence reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{check_range, RandomSource};
use crate::types::error::CoreError;

/// Uniform pseudo-random integers over `[min, max]`.
///
/// Not intended for security-sensitive use; see
/// [`CryptographicRandom`](super::CryptographicRandom) for that.
///
/// # Examples
///
/// ```rust
/// use trials_core::rng::{RandomSource, SystemPseudoRandom};
///
/// let mut a = SystemPseudoRandom::from_seed(12345);
/// let mut b = SystemPseudoRandom::from_seed(12345);
///
/// // Same seed produces identical sequences
/// assert_eq!(a.next(-40, 60).unwrap(), b.next(-40, 60).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct SystemPseudoRandom {
    inner: StdRng,
    /// Seed used for initialisation, if one was given.
    seed: Option<u64>,
}

impl SystemPseudoRandom {
    /// Creates a generator seeded from process entropy.
    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Creates a generator initialised with the given seed.
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Returns the seed used for initialisation, `None` when entropy-seeded.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl Default for SystemPseudoRandom {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for SystemPseudoRandom {
    #[inline]
    fn next(&mut self, min: i32, max: i32) -> Result<i32, CoreError> {
        check_range(min, max)?;
        Ok(self.inner.gen_range(min..=max))
    }

    fn name(&self) -> &'static str {
        "system"
    }
}
