// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// RasterImage — a pixel buffer plus the metadata the filters need.

use imgm_core::error::{ImgmError, Result};

use crate::buffer::{Pixel, PixelBuffer};

/// Decoded image: geometry, max intensity, the binary flag, and the pixel
/// buffer it owns exclusively.
///
/// Filters never write into the current buffer. They build a new one and
/// hand it to [`RasterImage::replace`], which swaps buffer and dimensions in a
/// single step, so width and height always describe the installed buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage<P: Pixel> {
    buffer: PixelBuffer<P>,
    max_value: u8,
    is_binary: bool,
}

impl<P: Pixel> RasterImage<P> {
    /// Wrap a decoded buffer. Both dimensions must be positive.
    pub fn new(buffer: PixelBuffer<P>, max_value: u8) -> Result<Self> {
        ensure_positive(buffer.width(), buffer.height())?;
        Ok(Self {
            buffer,
            max_value,
            is_binary: false,
        })
    }

    /// Convenience constructor from a flat pixel vector.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<P>, max_value: u8) -> Result<Self> {
        Self::new(PixelBuffer::from_vec(width, height, pixels)?, max_value)
    }

    pub fn width(&self) -> usize {
        self.buffer.width()
    }

    pub fn height(&self) -> usize {
        self.buffer.height()
    }

    /// Brightest representable value (255 for color, format-declared for gray).
    pub fn max_value(&self) -> u8 {
        self.max_value
    }

    /// Set by threshold-to-binary; required by erode and dilate.
    pub fn is_binary(&self) -> bool {
        self.is_binary
    }

    pub fn buffer(&self) -> &PixelBuffer<P> {
        &self.buffer
    }

    pub fn pixels(&self) -> &[P] {
        self.buffer.as_slice()
    }

    pub fn get(&self, x: usize, y: usize) -> Result<P> {
        self.buffer.get(x, y)
    }

    /// Install a new buffer (and with it new dimensions). The previous buffer
    /// is dropped.
    pub fn replace(&mut self, buffer: PixelBuffer<P>) -> Result<()> {
        ensure_positive(buffer.width(), buffer.height())?;
        self.buffer = buffer;
        Ok(())
    }

    pub(crate) fn mark_binary(&mut self) {
        self.is_binary = true;
    }
}

fn ensure_positive(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(ImgmError::InvalidDimensions { width, height });
    }
    Ok(())
}
