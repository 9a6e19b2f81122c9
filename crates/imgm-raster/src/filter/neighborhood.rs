// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Neighbourhood kernels — box blur, Sobel edges, median denoise.

use imgm_core::error::Result;
use tracing::debug;

use super::clipped_window;
use super::point;
use crate::buffer::{Pixel, PixelBuffer};
use crate::tools::median;

const SOBEL_X: [[i32; 3]; 3] = [[1, 0, -1], [2, 0, -2], [1, 0, -1]];
const SOBEL_Y: [[i32; 3]; 3] = [[1, 2, 1], [0, 0, 0], [-1, -2, -1]];

/// 3x3 mean per channel. Pixels on the outer ring are copied unchanged.
pub fn box_blur<P: Pixel>(src: &PixelBuffer<P>) -> Result<PixelBuffer<P>> {
    let (w, h) = (src.width(), src.height());
    PixelBuffer::from_fn(w, h, |x, y| {
        let centre = src.get(x, y)?;
        if x == 0 || y == 0 || x + 1 >= w || y + 1 >= h {
            return Ok(centre);
        }
        let mut sums = [0u32; 3];
        for ny in y - 1..=y + 1 {
            for nx in x - 1..=x + 1 {
                let px = src.get(nx, ny)?;
                for (c, sum) in sums.iter_mut().enumerate().take(P::CHANNELS) {
                    *sum += u32::from(px.channel(c));
                }
            }
        }
        Ok(P::from_channels(|c| (sums[c] / 9) as u8))
    })
}

/// Sobel gradient magnitude of the grayscale image, clamped to `max_value`.
/// Neighbours outside the image repeat the nearest edge pixel.
pub fn sobel<P: Pixel>(src: &PixelBuffer<P>, max_value: u8) -> Result<PixelBuffer<P>> {
    let gray = point::grayscale(src)?;
    let (w, h) = (gray.width(), gray.height());
    PixelBuffer::from_fn(w, h, |x, y| {
        let mut gx = 0i32;
        let mut gy = 0i32;
        for (ky, dy) in (-1isize..=1).enumerate() {
            for (kx, dx) in (-1isize..=1).enumerate() {
                let nx = clamp_offset(x, dx, w);
                let ny = clamp_offset(y, dy, h);
                let v = i32::from(gray.get(nx, ny)?.channel(0));
                gx += SOBEL_X[ky][kx] * v;
                gy += SOBEL_Y[ky][kx] * v;
            }
        }
        let magnitude = f64::from(gx * gx + gy * gy).sqrt().round();
        Ok(P::splat(magnitude.min(f64::from(max_value)) as u8))
    })
}

/// Per-channel median over a `size` x `size` window clipped to the image.
pub fn median_filter<P: Pixel>(src: &PixelBuffer<P>, size: usize) -> Result<PixelBuffer<P>> {
    let (w, h) = (src.width(), src.height());
    let radius = size.saturating_sub(1) / 2;
    debug!(size, radius, "Median window");
    let mut samples: Vec<Vec<u8>> = vec![Vec::new(); P::CHANNELS];
    PixelBuffer::from_fn(w, h, |x, y| {
        let (xs, ys) = clipped_window(x, y, radius, w, h);
        samples.iter_mut().for_each(Vec::clear);
        for ny in ys {
            for nx in xs.clone() {
                let px = src.get(nx, ny)?;
                for (c, bucket) in samples.iter_mut().enumerate() {
                    bucket.push(px.channel(c));
                }
            }
        }
        Ok(P::from_channels(|c| median(&mut samples[c])))
    })
}

fn clamp_offset(pos: usize, delta: isize, len: usize) -> usize {
    pos.saturating_add_signed(delta).min(len.saturating_sub(1))
}
