//! Sample index to pixel offset mapping with match tracking.
//!
//! `offset(k) = floor((W*H - 1) * k / (N - 1))` for `k` in `[0, N)`. The
//! sequence is non-decreasing, starts at 0 and ends at `W*H - 1`. Computed in
//! integer arithmetic so both endpoints are exact for every `(W, H, N)`.
//!
//! Consecutive samples sharing an offset form a pixel group. Entering a new
//! group marks every pixel from the previous offset (exclusive) to the new
//! one (inclusive) as unmatched; the first draw equal to the target within
//! the group marks the current pixel as matched.

use serde::{Deserialize, Serialize};

use super::{Canvas, PixelState};
use crate::types::error::CoreError;

/// Match bookkeeping for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCounters {
    /// Pixel groups marked matched.
    pub pixels_set: u64,
    /// Draws compared against the target while their group was unmatched.
    pub pixels_tested: u64,
}

/// Maps samples onto a [`Canvas`] and records target matches.
///
/// # Examples
///
/// ```rust
/// use trials_core::canvas::{PixelMapper, PixelState};
///
/// let mut mapper = PixelMapper::new(2, 2, 4, 7).unwrap();
/// assert_eq!(mapper.offset(3).unwrap(), 3);
///
/// mapper.observe(0, 7).unwrap();
/// mapper.observe(1, 1).unwrap();
/// assert_eq!(mapper.canvas().get(0), Some(PixelState::Matched));
/// assert_eq!(mapper.canvas().get(1), Some(PixelState::Unmatched));
/// assert_eq!(mapper.counters().pixels_set, 1);
/// ```
#[derive(Debug, Clone)]
pub struct PixelMapper {
    canvas: Canvas,
    samples: u64,
    target: i32,
    /// Last emitted offset, `None` before the first sample.
    cursor: Option<usize>,
    group_matched: bool,
    counters: MatchCounters,
}

impl PixelMapper {
    /// Creates a mapper over a blank `width x height` canvas for `samples` draws.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidArgument` when `samples <= 1` or a canvas
    /// dimension is zero.
    pub fn new(width: usize, height: usize, samples: u64, target: i32) -> Result<Self, CoreError> {
        if samples <= 1 {
            return Err(CoreError::invalid_argument(format!(
                "sample count must exceed 1 ({})",
                samples
            )));
        }
        Ok(Self {
            canvas: Canvas::new(width, height)?,
            samples,
            target,
            cursor: None,
            group_matched: false,
            counters: MatchCounters::default(),
        })
    }

    /// Canvas offset of sample `k`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidArgument` when `k >= samples`.
    pub fn offset(&self, k: u64) -> Result<usize, CoreError> {
        if k >= self.samples {
            return Err(CoreError::invalid_argument(format!(
                "sample index {} outside [0, {})",
                k, self.samples
            )));
        }
        let last = (self.canvas.len() - 1) as u128;
        Ok((last * k as u128 / (self.samples - 1) as u128) as usize)
    }

    /// Records sample `k` with raw draw `raw`. Returns `true` when this draw
    /// marked its pixel as matched.
    pub fn observe(&mut self, k: u64, raw: i32) -> Result<bool, CoreError> {
        let next = self.offset(k)?;
        let entered = match self.cursor {
            None => Some(0),
            Some(p) if next > p => Some(p + 1),
            Some(_) => None,
        };

        if let Some(first) = entered {
            for offset in first..=next {
                self.canvas.set(offset, PixelState::Unmatched);
            }
            self.cursor = Some(next);
            self.group_matched = false;
        }

        if self.group_matched {
            return Ok(false);
        }

        let matched = raw == self.target;
        if matched {
            self.group_matched = true;
            self.canvas.set(next, PixelState::Matched);
            self.counters.pixels_set += 1;
        }
        self.counters.pixels_tested += 1;
        Ok(matched)
    }

    /// Clears the canvas and counters for a new run.
    pub fn reset(&mut self) {
        self.canvas.clear();
        self.cursor = None;
        self.group_matched = false;
        self.counters = MatchCounters::default();
    }

    /// Current canvas.
    #[inline]
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Consumes the mapper, returning its canvas.
    pub fn into_canvas(self) -> Canvas {
        self.canvas
    }

    /// Match counters so far.
    #[inline]
    pub fn counters(&self) -> MatchCounters {
        self.counters
    }

    /// Target value compared against each draw.
    #[inline]
    pub fn target(&self) -> i32 {
        self.target
    }

    /// Total sample count the mapping spans.
    #[inline]
    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// Last emitted offset.
    #[inline]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }
}
