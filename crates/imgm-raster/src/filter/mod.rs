// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Filter library — point, neighbourhood, morphological and geometric
// transforms shared by every image format.
//
// Each kernel is a pure function from a source buffer to a freshly allocated
// output buffer. The `Transform` trait wires them to an owning image: read
// the current buffer, build the new one, then install it in one step.

pub mod geometry;
pub mod morph;
pub mod neighborhood;
pub mod point;

use std::ops::Range;

use imgm_core::error::{ImgmError, Result};
use tracing::{debug, instrument};

use crate::buffer::Pixel;
use crate::raster::RasterImage;

/// Default erode window radius (7x7).
pub const DEFAULT_ERODE_RADIUS: usize = 3;

/// Default dilate window radius (5x5).
pub const DEFAULT_DILATE_RADIUS: usize = 2;

/// Largest pixel count a resize may produce.
pub const MAX_PIXELS: usize = 1 << 28;

/// Image operations available on anything that owns a [`RasterImage`].
///
/// Every method leaves the image untouched when it returns an error.
pub trait Transform {
    type Pixel: Pixel;

    fn raster(&self) -> &RasterImage<Self::Pixel>;

    fn raster_mut(&mut self) -> &mut RasterImage<Self::Pixel>;

    /// Reject target dimensions the owning format cannot represent. Runs
    /// before any buffer is built.
    fn check_dimensions(&self, width: usize, height: usize) -> Result<()> {
        ensure_pixel_budget(width, height)
    }

    /// Called after an operation installed a buffer with new dimensions.
    /// Formats that mirror the geometry in their headers update it here.
    fn dimensions_changed(&mut self) {}

    // -- Point operations -----------------------------------------------------

    /// Invert every channel: `max_value - v`.
    #[instrument(skip(self))]
    fn to_negative(&mut self) -> Result<()> {
        let raster = self.raster();
        let out = point::negative(raster.buffer(), raster.max_value())?;
        self.raster_mut().replace(out)
    }

    /// Collapse color to `r/3 + g/3 + b/3` on every channel. Gray is a no-op.
    #[instrument(skip(self))]
    fn to_grayscale(&mut self) -> Result<()> {
        let out = point::grayscale(self.raster().buffer())?;
        self.raster_mut().replace(out)
    }

    /// Threshold to black / max intensity and mark the image binary.
    #[instrument(skip(self))]
    fn to_binary(&mut self, threshold: i32) -> Result<()> {
        let raster = self.raster();
        let out = point::threshold(raster.buffer(), threshold, raster.max_value())?;
        let raster = self.raster_mut();
        raster.replace(out)?;
        raster.mark_binary();
        Ok(())
    }

    // -- Neighbourhood operations ---------------------------------------------

    /// 3x3 box average; the outermost ring is copied unchanged.
    #[instrument(skip(self))]
    fn blur(&mut self) -> Result<()> {
        let out = neighborhood::box_blur(self.raster().buffer())?;
        self.raster_mut().replace(out)
    }

    /// Sobel gradient magnitude on the grayscale image.
    #[instrument(skip(self))]
    fn edge_filter(&mut self) -> Result<()> {
        let raster = self.raster();
        let out = neighborhood::sobel(raster.buffer(), raster.max_value())?;
        self.raster_mut().replace(out)
    }

    /// Median filter over a `size` x `size` window.
    #[instrument(skip(self))]
    fn denoise(&mut self, size: usize) -> Result<()> {
        let out = neighborhood::median_filter(self.raster().buffer(), size)?;
        self.raster_mut().replace(out)
    }

    // -- Morphology -----------------------------------------------------------

    fn erode(&mut self) -> Result<()> {
        self.erode_with_radius(DEFAULT_ERODE_RADIUS)
    }

    /// Grow the black region. Requires a binary image.
    #[instrument(skip(self))]
    fn erode_with_radius(&mut self, radius: usize) -> Result<()> {
        let raster = self.raster();
        if !raster.is_binary() {
            return Err(ImgmError::NotInBinaryFormat);
        }
        let out = morph::erode(raster.buffer(), radius)?;
        self.raster_mut().replace(out)
    }

    fn dilate(&mut self) -> Result<()> {
        self.dilate_with_radius(DEFAULT_DILATE_RADIUS)
    }

    /// Grow the white region. Requires a binary image.
    #[instrument(skip(self))]
    fn dilate_with_radius(&mut self, radius: usize) -> Result<()> {
        let raster = self.raster();
        if !raster.is_binary() {
            return Err(ImgmError::NotInBinaryFormat);
        }
        let out = morph::dilate(raster.buffer(), radius, raster.max_value())?;
        self.raster_mut().replace(out)
    }

    // -- Geometry -------------------------------------------------------------

    /// Resize to `width` x `height`, picking scale-up when either dimension
    /// grows and box-average scale-down otherwise.
    #[instrument(skip(self))]
    fn scale(&mut self, width: usize, height: usize) -> Result<()> {
        let raster = self.raster();
        if width > raster.width() || height > raster.height() {
            self.scale_up(width, height)
        } else {
            self.scale_down(width, height)
        }
    }

    /// Nearest-neighbour resize.
    fn scale_up(&mut self, width: usize, height: usize) -> Result<()> {
        self.check_dimensions(width, height)?;
        let out = geometry::nearest(self.raster().buffer(), width, height)?;
        self.raster_mut().replace(out)?;
        self.dimensions_changed();
        debug!(width, height, "Scaled up");
        Ok(())
    }

    /// Box-average resize.
    fn scale_down(&mut self, width: usize, height: usize) -> Result<()> {
        self.check_dimensions(width, height)?;
        let out = geometry::box_average(self.raster().buffer(), width, height)?;
        self.raster_mut().replace(out)?;
        self.dimensions_changed();
        debug!(width, height, "Scaled down");
        Ok(())
    }

    /// Rotate about the centre by `degree` degrees, keeping the canvas size.
    #[instrument(skip(self))]
    fn rotate(&mut self, degree: f32) -> Result<()> {
        let out = geometry::rotate(self.raster().buffer(), degree)?;
        self.raster_mut().replace(out)
    }
}

impl<P: Pixel> Transform for RasterImage<P> {
    type Pixel = P;

    fn raster(&self) -> &RasterImage<P> {
        self
    }

    fn raster_mut(&mut self) -> &mut RasterImage<P> {
        self
    }
}

/// Fail with `InvalidDimensions` when `width * height` overflows or exceeds
/// [`MAX_PIXELS`].
pub(crate) fn ensure_pixel_budget(width: usize, height: usize) -> Result<()> {
    match width.checked_mul(height) {
        Some(pixels) if pixels <= MAX_PIXELS => Ok(()),
        _ => Err(ImgmError::InvalidDimensions { width, height }),
    }
}

/// Square window of `radius` around `(x, y)`, clipped to the image.
pub(crate) fn clipped_window(
    x: usize,
    y: usize,
    radius: usize,
    width: usize,
    height: usize,
) -> (Range<usize>, Range<usize>) {
    let xs = x.saturating_sub(radius)..x.saturating_add(radius).saturating_add(1).min(width);
    let ys = y.saturating_sub(radius)..y.saturating_add(radius).saturating_add(1).min(height);
    (xs, ys)
}
