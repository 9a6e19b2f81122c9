// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-pixel kernels: negative, grayscale, threshold.

use imgm_core::error::Result;

use crate::buffer::{Pixel, PixelBuffer};

pub fn negative<P: Pixel>(src: &PixelBuffer<P>, max_value: u8) -> Result<PixelBuffer<P>> {
    map_pixels(src, |px| px.map(|v| max_value.wrapping_sub(v)))
}

pub fn grayscale<P: Pixel>(src: &PixelBuffer<P>) -> Result<PixelBuffer<P>> {
    map_pixels(src, |px| P::splat(px.luma()))
}

/// `luma <= threshold` becomes 0, everything else `max_value`.
pub fn threshold<P: Pixel>(
    src: &PixelBuffer<P>,
    threshold: i32,
    max_value: u8,
) -> Result<PixelBuffer<P>> {
    map_pixels(src, |px| {
        if i32::from(px.luma()) <= threshold {
            P::splat(0)
        } else {
            P::splat(max_value)
        }
    })
}

fn map_pixels<P: Pixel>(src: &PixelBuffer<P>, mut f: impl FnMut(P) -> P) -> Result<PixelBuffer<P>> {
    PixelBuffer::from_vec(
        src.width(),
        src.height(),
        src.as_slice().iter().map(|&px| f(px)).collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{Gray8, Rgb24};

    fn gray_buf(px: &[u8]) -> PixelBuffer<Gray8> {
        PixelBuffer::from_vec(px.len(), 1, px.iter().copied().map(Gray8).collect()).expect("valid")
    }

    #[test]
    fn negative_twice_is_identity() {
        let src = gray_buf(&[0, 1, 127, 128, 254, 255]);
        let once = negative(&src, 255).expect("negative");
        assert_eq!(negative(&once, 255).expect("negative"), src);
    }

    #[test]
    fn negative_against_lower_max_wraps_consistently() {
        // Samples above a declared max still round-trip.
        let src = gray_buf(&[0, 15, 200]);
        let once = negative(&src, 15).expect("negative");
        assert_eq!(once.as_slice()[..2], [Gray8(15), Gray8(0)]);
        assert_eq!(negative(&once, 15).expect("negative"), src);
    }

    #[test]
    fn threshold_yields_two_levels() {
        let src = gray_buf(&(0..=255).collect::<Vec<u8>>());
        let out = threshold(&src, 100, 200).expect("threshold");
        assert!(out.as_slice().iter().all(|p| p.0 == 0 || p.0 == 200));
        assert_eq!(out.as_slice()[100], Gray8(0));
        assert_eq!(out.as_slice()[101], Gray8(200));
    }

    #[test]
    fn threshold_accepts_out_of_range_values() {
        let src = gray_buf(&[0, 255]);
        assert!(threshold(&src, -1, 255).expect("t").as_slice().iter().all(|p| p.0 == 255));
        assert!(threshold(&src, 1000, 255).expect("t").as_slice().iter().all(|p| p.0 == 0));
    }

    #[test]
    fn grayscale_copies_luma_to_all_channels() {
        let src = PixelBuffer::from_vec(1, 1, vec![Rgb24::new(90, 60, 30)]).expect("valid");
        let out = grayscale(&src).expect("gray");
        assert_eq!(out.as_slice(), &[Rgb24::splat(60)]);
    }
}
