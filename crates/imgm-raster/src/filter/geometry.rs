// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Geometric kernels — nearest-neighbour and box-average resampling, rotation.

use imgm_core::error::{ImgmError, Result};
use tracing::debug;

use crate::buffer::{Pixel, PixelBuffer};

/// Sample the source at `(dx * src_w / dst_w, dy * src_h / dst_h)`.
pub fn nearest<P: Pixel>(src: &PixelBuffer<P>, width: usize, height: usize) -> Result<PixelBuffer<P>> {
    ensure_target(width, height)?;
    let (sw, sh) = (src.width(), src.height());
    PixelBuffer::from_fn(width, height, |x, y| src.get(x * sw / width, y * sh / height))
}

/// Average a box of `ceil(src / dst)` samples per axis starting at
/// `dst * src / dst_dim`, clamped to the source.
pub fn box_average<P: Pixel>(
    src: &PixelBuffer<P>,
    width: usize,
    height: usize,
) -> Result<PixelBuffer<P>> {
    ensure_target(width, height)?;
    let (sw, sh) = (src.width(), src.height());
    let box_w = sw.div_ceil(width).max(1);
    let box_h = sh.div_ceil(height).max(1);
    debug!(box_w, box_h, "Box size");

    PixelBuffer::from_fn(width, height, |x, y| {
        let x0 = x * sw / width;
        let y0 = y * sh / height;
        let xs = x0..(x0 + box_w).min(sw);
        let ys = y0..(y0 + box_h).min(sh);

        let mut sums = [0u32; 3];
        let mut count = 0u32;
        for sy in ys {
            for sx in xs.clone() {
                let px = src.get(sx, sy)?;
                for (c, sum) in sums.iter_mut().enumerate().take(P::CHANNELS) {
                    *sum += u32::from(px.channel(c));
                }
                count += 1;
            }
        }
        let count = count.max(1);
        Ok(P::from_channels(|c| (sums[c] / count) as u8))
    })
}

/// Rotate by `degree` about the image centre, same canvas size. Each
/// destination pixel pulls from the inverse-rotated source position; pixels
/// with no source stay zero.
pub fn rotate<P: Pixel>(src: &PixelBuffer<P>, degree: f32) -> Result<PixelBuffer<P>> {
    let (w, h) = (src.width(), src.height());
    let cx = w as f64 / 2.0;
    let cy = h as f64 / 2.0;
    let radians = -f64::from(degree).to_radians();
    let (sin, cos) = radians.sin_cos();

    PixelBuffer::from_fn(w, h, |x, y| {
        let dx = x as f64 - cx;
        let dy = y as f64 - cy;
        let sx = (dx * cos + dy * sin + cx) as i64;
        let sy = (dy * cos - dx * sin + cy) as i64;
        match (usize::try_from(sx), usize::try_from(sy)) {
            (Ok(sx), Ok(sy)) if sx < w && sy < h => src.get(sx, sy),
            _ => Ok(P::default()),
        }
    })
}

fn ensure_target(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(ImgmError::InvalidDimensions { width, height });
    }
    Ok(())
}
