//! # Random Number Sources
//!
//! This module provides the integer generators a trial run draws from. Every
//! generator implements [`RandomSource`], which yields integers in an
//! inclusive `[min, max]` range and rejects inverted ranges.
//!
//! ## Variants
//!
//! - [`SystemPseudoRandom`]: general-purpose generator seeded from process
//!   entropy (or an explicit seed for reproducible runs)
//! - [`CryptographicRandom`]: operating-system entropy, 32 bits per draw
//! - [`LinearCongruentialRandom`]: deterministic `s <- (a*s + c) mod 2^31`
//! - [`ConstantRandom`]: always the same configured value
//!
//! ## Strategy Selection
//!
//! [`RandomnessSource`] is a closed enum over the four variants. Callers pick
//! one explicitly, either directly or through a serialisable [`SourceKind`].
//! Dispatch is static; there is no global registry.
//!
//! ```rust
//! use trials_core::rng::{RandomSource, RandomnessSource, SourceKind};
//!
//! let mut source = RandomnessSource::from_kind(&SourceKind::LinearCongruential { seed: 0 });
//! assert_eq!(source.next(0, 99).unwrap(), 45);
//! ```

mod constant;
mod lcg;
mod secure;
mod source;
mod system;

pub use constant::ConstantRandom;
pub use lcg::{LinearCongruentialRandom, LCG_INCREMENT, LCG_MODULUS, LCG_MULTIPLIER};
pub use secure::CryptographicRandom;
pub use source::{RandomnessSource, SourceKind};
pub use system::SystemPseudoRandom;

use crate::types::error::CoreError;

/// Capability shared by all random sources.
pub trait RandomSource {
    /// Draws one integer from the inclusive range `[min, max]`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidArgument` when `min > max`.
    fn next(&mut self, min: i32, max: i32) -> Result<i32, CoreError>;

    /// Short identifier used in logs and reports.
    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    #[inline]
    fn next(&mut self, min: i32, max: i32) -> Result<i32, CoreError> {
        (**self).next(min, max)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

#[inline]
pub(crate) fn check_range(min: i32, max: i32) -> Result<(), CoreError> {
    if min > max {
        return Err(CoreError::inverted_range(min, max));
    }
    Ok(())
}

/// Number of integers in `[min, max]`, which can exceed `i32` capacity.
#[inline]
pub(crate) fn span(min: i32, max: i32) -> i64 {
    max as i64 - min as i64 + 1
}
