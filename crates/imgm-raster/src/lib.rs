// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// imgm — Raster images: pixel buffers, BMP/PGM codecs and the filter library.

pub mod buffer;
pub mod codec;
pub mod filter;
pub mod image;
pub mod raster;
pub mod tools;

pub use buffer::{Gray8, Pixel, PixelBuffer, Rgb24};
pub use codec::Codec;
pub use codec::bmp::BmpImage;
pub use codec::pgm::PgmImage;
pub use filter::Transform;
pub use image::Image;
pub use raster::RasterImage;
pub use tools::median;
