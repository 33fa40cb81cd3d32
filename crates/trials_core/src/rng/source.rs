//! Closed strategy enum over the four random sources.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    ConstantRandom, CryptographicRandom, LinearCongruentialRandom, RandomSource,
    SystemPseudoRandom,
};
use crate::types::error::CoreError;

/// Serialisable choice of random source, plus its seed where applicable.
///
/// # Examples
///
/// ```rust
/// use trials_core::rng::SourceKind;
///
/// let kind = SourceKind::LinearCongruential { seed: 7 };
/// assert_eq!(kind.name(), "linear_congruential");
/// assert_eq!(SourceKind::default().name(), "system");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceKind {
    /// General-purpose generator; entropy-seeded unless `seed` is given.
    System {
        /// Optional seed for reproducible runs.
        #[serde(default)]
        seed: Option<u64>,
    },
    /// Operating-system entropy.
    Cryptographic,
    /// Deterministic congruential generator.
    LinearCongruential {
        /// Initial state.
        #[serde(default)]
        seed: u32,
    },
    /// Always the same value.
    Constant {
        /// Value returned on every draw.
        value: i32,
    },
}

impl SourceKind {
    /// Short identifier used in logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::System { .. } => "system",
            Self::Cryptographic => "cryptographic",
            Self::LinearCongruential { .. } => "linear_congruential",
            Self::Constant { .. } => "constant",
        }
    }

    /// Same kind reseeded with `seed`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidArgument` if the kind takes no seed, or if
    /// `seed` does not fit the congruential generator's 32-bit state.
    pub fn with_seed(self, seed: u64) -> Result<Self, CoreError> {
        match self {
            Self::System { .. } => Ok(Self::System { seed: Some(seed) }),
            Self::LinearCongruential { .. } => u32::try_from(seed)
                .map(|seed| Self::LinearCongruential { seed })
                .map_err(|_| {
                    CoreError::invalid_argument(format!(
                        "seed {} exceeds the 32-bit linear_congruential state",
                        seed
                    ))
                }),
            Self::Cryptographic | Self::Constant { .. } => Err(CoreError::invalid_argument(
                format!("{} source takes no seed", self.name()),
            )),
        }
    }
}

impl Default for SourceKind {
    fn default() -> Self {
        Self::System { seed: None }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One of the four random sources, selected explicitly by the caller.
#[derive(Debug, Clone)]
pub enum RandomnessSource {
    /// See [`SystemPseudoRandom`].
    System(SystemPseudoRandom),
    /// See [`CryptographicRandom`].
    Cryptographic(CryptographicRandom),
    /// See [`LinearCongruentialRandom`].
    LinearCongruential(LinearCongruentialRandom),
    /// See [`ConstantRandom`].
    Constant(ConstantRandom),
}

impl RandomnessSource {
    /// Builds a fresh source for the given choice.
    pub fn from_kind(kind: &SourceKind) -> Self {
        match *kind {
            SourceKind::System { seed: Some(seed) } => {
                Self::System(SystemPseudoRandom::from_seed(seed))
            }
            SourceKind::System { seed: None } => Self::System(SystemPseudoRandom::from_entropy()),
            SourceKind::Cryptographic => Self::Cryptographic(CryptographicRandom::new()),
            SourceKind::LinearCongruential { seed } => {
                Self::LinearCongruential(LinearCongruentialRandom::new(seed))
            }
            SourceKind::Constant { value } => Self::Constant(ConstantRandom::new(value)),
        }
    }
}

impl From<SourceKind> for RandomnessSource {
    fn from(kind: SourceKind) -> Self {
        Self::from_kind(&kind)
    }
}

impl RandomSource for RandomnessSource {
    #[inline]
    fn next(&mut self, min: i32, max: i32) -> Result<i32, CoreError> {
        match self {
            Self::System(rng) => rng.next(min, max),
            Self::Cryptographic(rng) => rng.next(min, max),
            Self::LinearCongruential(rng) => rng.next(min, max),
            Self::Constant(rng) => rng.next(min, max),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::System(rng) => rng.name(),
            Self::Cryptographic(rng) => rng.name(),
            Self::LinearCongruential(rng) => rng.name(),
            Self::Constant(rng) => rng.name(),
        }
    }
}
