// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Binary morphology: erode grows black, dilate grows white.

use imgm_core::error::Result;

use super::clipped_window;
use crate::buffer::{Pixel, PixelBuffer};

/// Any black pixel inside the window turns the output pixel black.
pub fn erode<P: Pixel>(src: &PixelBuffer<P>, radius: usize) -> Result<PixelBuffer<P>> {
    spread(src, radius, 0)
}

/// Any `max_value` pixel inside the window turns the output pixel white.
pub fn dilate<P: Pixel>(src: &PixelBuffer<P>, radius: usize, max_value: u8) -> Result<PixelBuffer<P>> {
    spread(src, radius, max_value)
}

fn spread<P: Pixel>(src: &PixelBuffer<P>, radius: usize, level: u8) -> Result<PixelBuffer<P>> {
    let (w, h) = (src.width(), src.height());
    PixelBuffer::from_fn(w, h, |x, y| {
        let (xs, ys) = clipped_window(x, y, radius, w, h);
        for ny in ys {
            for nx in xs.clone() {
                if src.get(nx, ny)?.is_uniform(level) {
                    return Ok(P::splat(level));
                }
            }
        }
        src.get(x, y)
    })
}
