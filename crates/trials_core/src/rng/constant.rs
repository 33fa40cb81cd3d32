//! Fixed-value source for fully deterministic runs.

use serde::{Deserialize, Serialize};

use super::{check_range, RandomSource};
use crate::types::error::CoreError;

/// Always returns the configured value.
///
/// The requested range is only checked for `min <= max`; the value itself is
/// returned even when it lies outside `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantRandom {
    value: i32,
}

impl ConstantRandom {
    /// Creates a source that always yields `value`.
    pub fn new(value: i32) -> Self {
        Self { value }
    }

    /// The configured value.
    pub fn value(&self) -> i32 {
        self.value
    }
}

impl RandomSource for ConstantRandom {
    #[inline]
    fn next(&mut self, min: i32, max: i32) -> Result<i32, CoreError> {
        check_range(min, max)?;
        Ok(self.value)
    }

    fn name(&self) -> &'static str {
        "constant"
    }
}
