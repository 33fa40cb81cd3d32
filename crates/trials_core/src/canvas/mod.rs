//! Pixel canvas and the sample-to-pixel mapping drawn onto it.
//!
//! - [`Canvas`]: `width x height` grid of [`PixelState`]s
//! - [`PixelMapper`]: maps sample index `k` to a canvas offset and marks
//!   pixel groups that saw at least one draw equal to the match target

mod mapper;

pub use mapper::{MatchCounters, PixelMapper};

use serde::{Deserialize, Serialize};

use crate::types::error::CoreError;

/// Match state of one pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelState {
    /// Not reached yet in the current run.
    #[default]
    Blank,
    /// Reached, no matching draw in its group.
    Unmatched,
    /// At least one draw in its group equalled the target.
    Matched,
}

impl PixelState {
    /// BGRA bytes used when rendering.
    #[inline]
    pub fn bgra(self) -> [u8; 4] {
        match self {
            Self::Blank => [0, 0, 0, 0],
            Self::Unmatched => [0, 0, 0, 255],
            Self::Matched => [255, 255, 255, 255],
        }
    }
}

/// Row-major pixel grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<PixelState>,
}

impl Canvas {
    /// Creates a blank canvas.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidArgument` if either dimension is zero.
    pub fn new(width: usize, height: usize) -> Result<Self, CoreError> {
        if width == 0 || height == 0 {
            return Err(CoreError::invalid_argument(format!(
                "canvas dimensions must be positive ({} x {})",
                width, height
            )));
        }
        let len = width.checked_mul(height).ok_or_else(|| {
            CoreError::invalid_argument(format!("canvas {} x {} too large", width, height))
        })?;
        Ok(Self {
            width,
            height,
            pixels: vec![PixelState::Blank; len],
        })
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels, `width * height`.
    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Always false for a constructed canvas.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// State at a linear offset.
    #[inline]
    pub fn get(&self, offset: usize) -> Option<PixelState> {
        self.pixels.get(offset).copied()
    }

    /// Sets the state at a linear offset. Offsets past the end are ignored.
    #[inline]
    pub fn set(&mut self, offset: usize, state: PixelState) {
        if let Some(pixel) = self.pixels.get_mut(offset) {
            *pixel = state;
        }
    }

    /// `(x, y)` of a linear offset.
    #[inline]
    pub fn coords(&self, offset: usize) -> (usize, usize) {
        let y = offset / self.width;
        (offset - self.width * y, y)
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[PixelState] {
        &self.pixels
    }

    /// Number of pixels in the given state.
    pub fn count(&self, state: PixelState) -> usize {
        self.pixels.iter().filter(|&&p| p == state).count()
    }

    /// Resets every pixel to [`PixelState::Blank`].
    pub fn clear(&mut self) {
        self.pixels.fill(PixelState::Blank);
    }

    /// Renders `width * height * 4` BGRA bytes.
    pub fn to_bgra(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.bgra()).collect()
    }
}
