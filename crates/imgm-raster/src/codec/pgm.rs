// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PGM codec — binary portable graymap (`P5`), one byte per sample.

use imgm_core::config::CodecConfig;
use imgm_core::error::{ImgmError, Result};
use imgm_core::types::ImageFormat;
use tracing::{debug, instrument};

use super::{ByteCursor, Codec};
use crate::buffer::{Gray8, PixelBuffer};
use crate::filter::Transform;
use crate::raster::RasterImage;

const DEFAULT_SEPARATOR: u8 = b' ';

/// A decoded 8-bit PGM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgmImage {
    raster: RasterImage<Gray8>,
    /// Whitespace byte after the signature, width, height and max value.
    separators: [u8; 4],
}

impl PgmImage {
    /// Wrap an in-memory raster. The header is written space-separated.
    pub fn new(raster: RasterImage<Gray8>) -> Self {
        Self {
            raster,
            separators: [DEFAULT_SEPARATOR; 4],
        }
    }

    pub fn width(&self) -> usize {
        self.raster.width()
    }

    pub fn height(&self) -> usize {
        self.raster.height()
    }

    pub fn max_value(&self) -> u8 {
        self.raster.max_value()
    }

    pub fn separators(&self) -> [u8; 4] {
        self.separators
    }
}

impl Codec for PgmImage {
    const FORMAT: ImageFormat = ImageFormat::Pgm;

    #[instrument(skip_all, fields(bytes = data.len()))]
    fn decode(data: &[u8], _config: &CodecConfig) -> Result<Self> {
        Self::validate(data)?;
        let mut cur = ByteCursor::new(data);
        cur.seek(2)?;

        let mut separators = [DEFAULT_SEPARATOR; 4];
        let first = cur.u8()?;
        if !is_whitespace(first) {
            return Err(ImgmError::MalformedHeader(format!(
                "expected whitespace after the signature, found byte {first:#04x}"
            )));
        }
        separators[0] = first;

        let (width, separator) = read_token(&mut cur, "width")?;
        separators[1] = separator;
        let (height, separator) = read_token(&mut cur, "height")?;
        separators[2] = separator;
        let (max_value, separator) = read_token(&mut cur, "max value")?;
        separators[3] = separator;
        debug!(width, height, max_value, "Header read");

        if width == 0 || height == 0 {
            return Err(ImgmError::UnsupportedMetadata(format!(
                "dimensions {width}x{height}"
            )));
        }
        let max_value = match u8::try_from(max_value) {
            Ok(v) if v > 0 => v,
            _ => {
                return Err(ImgmError::UnsupportedMetadata(format!(
                    "max value {max_value} (only 1..=255 is supported)"
                )));
            }
        };

        let len = width
            .checked_mul(height)
            .ok_or(ImgmError::InvalidDimensions { width, height })?;
        let body = cur.take(len)?;
        let extra = cur.len() - cur.position();
        if extra > 0 {
            debug!(extra, "Ignoring bytes after the pixel data");
        }

        let pixels = body.iter().copied().map(Gray8).collect();
        let raster = RasterImage::new(PixelBuffer::from_vec(width, height, pixels)?, max_value)?;
        Ok(Self { raster, separators })
    }

    fn encode(&self) -> Vec<u8> {
        let [after_sig, after_w, after_h, after_max] = self.separators;
        let mut out = Vec::with_capacity(16 + self.width() * self.height());
        out.extend_from_slice(&Self::FORMAT.signature());
        out.push(after_sig);
        out.extend_from_slice(self.width().to_string().as_bytes());
        out.push(after_w);
        out.extend_from_slice(self.height().to_string().as_bytes());
        out.push(after_h);
        out.extend_from_slice(self.max_value().to_string().as_bytes());
        out.push(after_max);
        out.extend(self.raster.pixels().iter().map(|px| px.0));
        out
    }
}

impl Transform for PgmImage {
    type Pixel = Gray8;

    fn raster(&self) -> &RasterImage<Gray8> {
        &self.raster
    }

    fn raster_mut(&mut self) -> &mut RasterImage<Gray8> {
        &mut self.raster
    }
}

fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

/// Skip leading whitespace, then read a decimal token. Returns the value and
/// the single whitespace byte that ended it.
fn read_token(cur: &mut ByteCursor<'_>, name: &str) -> Result<(usize, u8)> {
    while cur.peek().is_some_and(is_whitespace) {
        cur.u8()?;
    }
    let mut value: usize = 0;
    let mut digits = 0;
    loop {
        let byte = cur.u8()?;
        match byte {
            b'0'..=b'9' => {
                value = value
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(usize::from(byte - b'0')))
                    .ok_or_else(|| ImgmError::MalformedHeader(format!("{name} is too large")))?;
                digits += 1;
            }
            b if is_whitespace(b) && digits > 0 => return Ok((value, b)),
            b => {
                return Err(ImgmError::MalformedHeader(format!(
                    "unexpected byte {b:#04x} in {name}"
                )));
            }
        }
    }
}
