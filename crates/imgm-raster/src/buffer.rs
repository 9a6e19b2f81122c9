// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pixel types and the flat row-major pixel buffer.

use imgm_core::error::{ImgmError, Result};

/// A pixel made of one or more 8-bit channels.
///
/// Filters are written once against this trait and work for both grayscale
/// and color images; the only thing that differs is `CHANNELS`.
pub trait Pixel: Copy + Default + PartialEq + Eq + std::fmt::Debug {
    /// Number of 8-bit channels in one pixel.
    const CHANNELS: usize;

    /// Value of channel `index` (`index < CHANNELS`).
    fn channel(&self, index: usize) -> u8;

    /// Build a pixel channel by channel.
    fn from_channels(f: impl FnMut(usize) -> u8) -> Self;

    /// Grayscale intensity of the pixel.
    fn luma(&self) -> u8;

    /// A pixel with every channel set to `value`.
    fn splat(value: u8) -> Self {
        Self::from_channels(|_| value)
    }

    /// Apply `f` to every channel.
    fn map(self, mut f: impl FnMut(u8) -> u8) -> Self {
        Self::from_channels(|c| f(self.channel(c)))
    }

    /// True when every channel equals `value`.
    fn is_uniform(&self, value: u8) -> bool {
        (0..Self::CHANNELS).all(|c| self.channel(c) == value)
    }
}

/// Single-channel 8-bit gray pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Gray8(pub u8);

impl Pixel for Gray8 {
    const CHANNELS: usize = 1;

    fn channel(&self, _index: usize) -> u8 {
        self.0
    }

    fn from_channels(mut f: impl FnMut(usize) -> u8) -> Self {
        Self(f(0))
    }

    fn luma(&self) -> u8 {
        self.0
    }
}

/// 24-bit color pixel, stored blue-green-red to match the BMP layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb24 {
    pub b: u8,
    pub g: u8,
    pub r: u8,
}

impl Rgb24 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { b, g, r }
    }

    /// Build from on-disk byte order.
    pub const fn from_bgr(bytes: [u8; 3]) -> Self {
        Self {
            b: bytes[0],
            g: bytes[1],
            r: bytes[2],
        }
    }

    /// On-disk byte order.
    pub const fn to_bgr(self) -> [u8; 3] {
        [self.b, self.g, self.r]
    }
}

impl Pixel for Rgb24 {
    const CHANNELS: usize = 3;

    // Channel order follows the storage order: 0 = blue, 1 = green, 2 = red.
    fn channel(&self, index: usize) -> u8 {
        match index {
            0 => self.b,
            1 => self.g,
            _ => self.r,
        }
    }

    fn from_channels(mut f: impl FnMut(usize) -> u8) -> Self {
        let b = f(0);
        let g = f(1);
        let r = f(2);
        Self { b, g, r }
    }

    /// Per-channel thirds, truncated before summing: `r/3 + g/3 + b/3`.
    fn luma(&self) -> u8 {
        self.r / 3 + self.g / 3 + self.b / 3
    }
}

/// Fixed-size, row-major pixel container (`index = x + y * width`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer<P> {
    width: usize,
    height: usize,
    data: Vec<P>,
}

impl<P: Pixel> PixelBuffer<P> {
    /// A buffer of default (zero) pixels.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![P::default(); len],
        })
    }

    /// Wrap an existing pixel vector; its length must be `width * height`.
    pub fn from_vec(width: usize, height: usize, data: Vec<P>) -> Result<Self> {
        let expected = checked_len(width, height)?;
        if data.len() != expected {
            return Err(ImgmError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel in row-major
    /// order. The first error aborts construction.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> Result<P>,
    ) -> Result<Self> {
        let len = checked_len(width, height)?;
        let mut data = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y)?);
            }
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_slice(&self) -> &[P] {
        &self.data
    }

    /// Iterate over rows, top to bottom.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[P]> {
        // chunks_exact(0) panics; an empty buffer simply has no rows.
        self.data.chunks_exact(self.width.max(1))
    }

    /// Flat index of `(x, y)`.
    pub fn index_of(&self, x: usize, y: usize) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(ImgmError::IndexOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(x + y * self.width)
    }

    pub fn get(&self, x: usize, y: usize) -> Result<P> {
        let idx = self.index_of(x, y)?;
        Ok(self.data[idx])
    }

    pub fn set(&mut self, x: usize, y: usize, value: P) -> Result<()> {
        let idx = self.index_of(x, y)?;
        self.data[idx] = value;
        Ok(())
    }
}

fn checked_len(width: usize, height: usize) -> Result<usize> {
    width
        .checked_mul(height)
        .ok_or(ImgmError::InvalidDimensions { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_major_indexing() {
        let buf = PixelBuffer::from_vec(3, 2, (0u8..6).map(Gray8).collect()).expect("valid");
        assert_eq!(buf.index_of(2, 1).expect("in bounds"), 5);
        assert_eq!(buf.get(0, 1).expect("in bounds"), Gray8(3));
        assert_eq!(buf.get(2, 0).expect("in bounds"), Gray8(2));
    }

    #[test]
    fn out_of_range_access_is_an_error() {
        let mut buf = PixelBuffer::<Gray8>::new(2, 2).expect("valid");
        assert!(matches!(
            buf.get(2, 0),
            Err(ImgmError::IndexOutOfBounds { x: 2, y: 0, width: 2, height: 2 })
        ));
        assert!(buf.set(0, 5, Gray8(1)).is_err());
    }

    #[test]
    fn from_vec_rejects_wrong_length() {
        let err = PixelBuffer::from_vec(2, 2, vec![Gray8(0); 3]).unwrap_err();
        assert!(matches!(err, ImgmError::SizeMismatch { expected: 4, actual: 3 }));
    }

    #[test]
    fn from_fn_fills_in_row_major_order() {
        let buf = PixelBuffer::from_fn(2, 2, |x, y| Ok(Gray8((x + 10 * y) as u8))).expect("valid");
        assert_eq!(buf.as_slice(), &[Gray8(0), Gray8(1), Gray8(10), Gray8(11)]);
        let rows: Vec<_> = buf.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], &[Gray8(10), Gray8(11)]);
    }

    #[test]
    fn rgb_luma_truncates_each_third() {
        // 100/3 + 101/3 + 102/3 = 33 + 33 + 34
        assert_eq!(Rgb24::new(100, 101, 102).luma(), 100);
        assert_eq!(Rgb24::new(2, 2, 2).luma(), 0);
        assert_eq!(Rgb24::new(255, 255, 255).luma(), 255);
    }

    #[test]
    fn rgb_channels_follow_storage_order() {
        let px = Rgb24::from_bgr([1, 2, 3]);
        assert_eq!((px.channel(0), px.channel(1), px.channel(2)), (1, 2, 3));
        assert_eq!(px.r, 3);
        assert_eq!(px.to_bgr(), [1, 2, 3]);
        assert_eq!(px.map(|c| c * 2), Rgb24::from_bgr([2, 4, 6]));
        assert!(Rgb24::splat(7).is_uniform(7));
    }
}
