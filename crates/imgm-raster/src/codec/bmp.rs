// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// BMP codec — uncompressed 24-bit Windows bitmaps with a 40-byte info header.
//
// Bytes the decoder does not interpret (anything between the info header and
// the pixel array, and everything after the pixel array) are kept verbatim
// so an unmodified image saves back byte-for-byte.

use imgm_core::config::CodecConfig;
use imgm_core::error::{ImgmError, Result};
use imgm_core::types::ImageFormat;
use tracing::{debug, instrument, warn};

use super::{ByteCursor, Codec};
use crate::buffer::{PixelBuffer, Rgb24};
use crate::filter::{Transform, ensure_pixel_budget};
use crate::raster::RasterImage;

const SIGNATURE_LEN: usize = 2;
const HEADERS_LEN: usize = SIGNATURE_LEN + BmpFileHeader::LEN + BmpInfoHeader::LEN;
const BYTES_PER_PIXEL: usize = 3;

/// The part of the file header that follows the `BM` signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpFileHeader {
    pub file_size: u32,
    pub reserved1: u16,
    pub reserved2: u16,
    /// Offset of the pixel array from the start of the file.
    pub data_offset: u32,
}

impl BmpFileHeader {
    pub const LEN: usize = 12;

    fn read(cur: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(Self {
            file_size: cur.u32_le()?,
            reserved1: cur.u16_le()?,
            reserved2: cur.u16_le()?,
            data_offset: cur.u32_le()?,
        })
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.file_size.to_le_bytes());
        out.extend_from_slice(&self.reserved1.to_le_bytes());
        out.extend_from_slice(&self.reserved2.to_le_bytes());
        out.extend_from_slice(&self.data_offset.to_le_bytes());
    }
}

/// BITMAPINFOHEADER.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpInfoHeader {
    pub header_size: u32,
    pub width: i32,
    pub height: i32,
    pub planes: u16,
    pub bit_count: u16,
    pub compression: u32,
    pub image_size: u32,
    pub x_pixels_per_meter: i32,
    pub y_pixels_per_meter: i32,
    pub colors_used: u32,
    pub colors_important: u32,
}

impl BmpInfoHeader {
    pub const LEN: usize = 40;

    fn read(cur: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(Self {
            header_size: cur.u32_le()?,
            width: cur.i32_le()?,
            height: cur.i32_le()?,
            planes: cur.u16_le()?,
            bit_count: cur.u16_le()?,
            compression: cur.u32_le()?,
            image_size: cur.u32_le()?,
            x_pixels_per_meter: cur.i32_le()?,
            y_pixels_per_meter: cur.i32_le()?,
            colors_used: cur.u32_le()?,
            colors_important: cur.u32_le()?,
        })
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.header_size.to_le_bytes());
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.extend_from_slice(&self.planes.to_le_bytes());
        out.extend_from_slice(&self.bit_count.to_le_bytes());
        out.extend_from_slice(&self.compression.to_le_bytes());
        out.extend_from_slice(&self.image_size.to_le_bytes());
        out.extend_from_slice(&self.x_pixels_per_meter.to_le_bytes());
        out.extend_from_slice(&self.y_pixels_per_meter.to_le_bytes());
        out.extend_from_slice(&self.colors_used.to_le_bytes());
        out.extend_from_slice(&self.colors_important.to_le_bytes());
    }
}

/// A decoded 24-bit BMP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BmpImage {
    file_header: BmpFileHeader,
    info_header: BmpInfoHeader,
    header_gap: Vec<u8>,
    trailing: Vec<u8>,
    raster: RasterImage<Rgb24>,
    resized: bool,
}

impl BmpImage {
    // -- Construction ---------------------------------------------------------

    /// Wrap an in-memory raster with fresh headers.
    pub fn new(raster: RasterImage<Rgb24>) -> Result<Self> {
        let (width, height) = header_dimensions(raster.width(), raster.height())?;
        let image_size = pixel_array_len(raster.width(), raster.height());
        let file_size = HEADERS_LEN + image_size;
        Ok(Self {
            file_header: BmpFileHeader {
                file_size: clamp_u32(file_size),
                reserved1: 0,
                reserved2: 0,
                data_offset: clamp_u32(HEADERS_LEN),
            },
            info_header: BmpInfoHeader {
                header_size: BmpInfoHeader::LEN as u32,
                width,
                height,
                planes: 1,
                bit_count: 24,
                compression: 0,
                image_size: clamp_u32(image_size),
                x_pixels_per_meter: 0,
                y_pixels_per_meter: 0,
                colors_used: 0,
                colors_important: 0,
            },
            header_gap: Vec::new(),
            trailing: Vec::new(),
            raster,
            resized: false,
        })
    }

    // -- Accessors ------------------------------------------------------------

    pub fn file_header(&self) -> &BmpFileHeader {
        &self.file_header
    }

    pub fn info_header(&self) -> &BmpInfoHeader {
        &self.info_header
    }

    /// Bytes between the info header and the pixel array.
    pub fn header_gap(&self) -> &[u8] {
        &self.header_gap
    }

    /// Bytes after the pixel array, through end of file.
    pub fn trailing(&self) -> &[u8] {
        &self.trailing
    }

    pub fn width(&self) -> usize {
        self.raster.width()
    }

    pub fn height(&self) -> usize {
        self.raster.height()
    }

    /// The file-size field as it will be written. After a resize this is
    /// headers plus unpadded pixel bytes plus the trailing blob; padding and
    /// the header gap are not counted.
    pub fn declared_file_size(&self) -> u32 {
        if self.resized {
            clamp_u32(
                HEADERS_LEN + BYTES_PER_PIXEL * self.width() * self.height() + self.trailing.len(),
            )
        } else {
            self.file_header.file_size
        }
    }
}

impl Codec for BmpImage {
    const FORMAT: ImageFormat = ImageFormat::Bmp;

    #[instrument(skip_all, fields(bytes = data.len()))]
    fn decode(data: &[u8], config: &CodecConfig) -> Result<Self> {
        Self::validate(data)?;
        let mut cur = ByteCursor::new(data);
        cur.seek(SIGNATURE_LEN)?;
        let file_header = BmpFileHeader::read(&mut cur)?;
        let info_header = BmpInfoHeader::read(&mut cur)?;
        debug!(?file_header, ?info_header, "Headers read");

        if info_header.header_size as usize != BmpInfoHeader::LEN {
            warn!(
                header_size = info_header.header_size,
                "Only the 40-byte BMP info header is supported"
            );
            if config.strict_bmp_header {
                return Err(ImgmError::UnsupportedMetadata(format!(
                    "info header of {} bytes (only 40 is supported)",
                    info_header.header_size
                )));
            }
        }
        if info_header.bit_count != 24 {
            return Err(ImgmError::UnsupportedMetadata(format!(
                "{} bits per pixel (only 24 is supported)",
                info_header.bit_count
            )));
        }
        if info_header.compression != 0 {
            return Err(ImgmError::UnsupportedMetadata(format!(
                "compression method {} (only uncompressed is supported)",
                info_header.compression
            )));
        }
        if info_header.width <= 0 {
            return Err(ImgmError::UnsupportedMetadata(format!(
                "width {}",
                info_header.width
            )));
        }
        if info_header.height <= 0 {
            return Err(ImgmError::UnsupportedMetadata(format!(
                "height {} (top-down and empty bitmaps are not supported)",
                info_header.height
            )));
        }

        let offset = file_header.data_offset as usize;
        if offset < HEADERS_LEN {
            return Err(ImgmError::MalformedHeader(format!(
                "pixel data offset {offset} overlaps the headers"
            )));
        }
        let header_gap = cur.take(offset - HEADERS_LEN)?.to_vec();

        let width = info_header.width as usize;
        let height = info_header.height as usize;
        let stride = row_stride(width);
        let needed = stride
            .checked_mul(height)
            .and_then(|len| len.checked_add(offset))
            .ok_or(ImgmError::InvalidDimensions { width, height })?;
        if needed > data.len() {
            return Err(ImgmError::Truncated {
                expected: needed,
                actual: data.len(),
            });
        }
        let mut pixels = vec![Rgb24::default(); width * height];
        // Rows are stored bottom-up; the buffer is top-down.
        for row in pixels.chunks_exact_mut(width).rev() {
            let bytes = cur.take(stride)?;
            for (px, bgr) in row.iter_mut().zip(bytes.chunks_exact(BYTES_PER_PIXEL)) {
                *px = Rgb24::from_bgr([bgr[0], bgr[1], bgr[2]]);
            }
        }
        let trailing = cur.rest().to_vec();
        debug!(
            gap = header_gap.len(),
            trailing = trailing.len(),
            "Pixel array read"
        );

        let raster = RasterImage::new(PixelBuffer::from_vec(width, height, pixels)?, u8::MAX)?;
        Ok(Self {
            file_header,
            info_header,
            header_gap,
            trailing,
            raster,
            resized: false,
        })
    }

    fn encode(&self) -> Vec<u8> {
        let (width, height) = (self.width(), self.height());
        let stride = row_stride(width);
        let padding = stride - BYTES_PER_PIXEL * width;

        let mut out = Vec::with_capacity(
            HEADERS_LEN + self.header_gap.len() + stride * height + self.trailing.len(),
        );
        out.extend_from_slice(&Self::FORMAT.signature());
        BmpFileHeader {
            file_size: self.declared_file_size(),
            ..self.file_header
        }
        .write(&mut out);
        self.info_header.write(&mut out);
        out.extend_from_slice(&self.header_gap);
        for row in self.raster.buffer().rows().rev() {
            for px in row {
                out.extend_from_slice(&px.to_bgr());
            }
            out.extend(std::iter::repeat_n(0u8, padding));
        }
        out.extend_from_slice(&self.trailing);
        out
    }
}

impl Transform for BmpImage {
    type Pixel = Rgb24;

    fn raster(&self) -> &RasterImage<Rgb24> {
        &self.raster
    }

    fn raster_mut(&mut self) -> &mut RasterImage<Rgb24> {
        &mut self.raster
    }

    fn check_dimensions(&self, width: usize, height: usize) -> Result<()> {
        ensure_pixel_budget(width, height)?;
        header_dimensions(width, height)?;
        let total = pixel_array_len(width, height)
            .checked_add(HEADERS_LEN + self.header_gap.len() + self.trailing.len());
        match total {
            Some(total) if u32::try_from(total).is_ok() => Ok(()),
            _ => Err(ImgmError::InvalidDimensions { width, height }),
        }
    }

    fn dimensions_changed(&mut self) {
        let (width, height) = (self.width(), self.height());
        // check_dimensions already proved both fit.
        self.info_header.width = i32::try_from(width).unwrap_or(i32::MAX);
        self.info_header.height = i32::try_from(height).unwrap_or(i32::MAX);
        self.info_header.image_size = clamp_u32(pixel_array_len(width, height));
        self.resized = true;
    }
}

/// Bytes per row including padding to a 4-byte boundary.
fn row_stride(width: usize) -> usize {
    let row = BYTES_PER_PIXEL * width;
    row + (4 - row % 4) % 4
}

fn pixel_array_len(width: usize, height: usize) -> usize {
    row_stride(width).saturating_mul(height)
}

fn header_dimensions(width: usize, height: usize) -> Result<(i32, i32)> {
    match (i32::try_from(width), i32::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok((w, h)),
        _ => Err(ImgmError::InvalidDimensions { width, height }),
    }
}

fn clamp_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Pixel;

    /// Hand-assembled 2x2 bitmap: bottom row blue, green; top row red, white.
    /// Each 6-byte row is padded with two bytes.
    fn two_by_two(info_size: u32, gap: &[u8], trailing: &[u8]) -> Vec<u8> {
        let offset = (HEADERS_LEN + gap.len()) as u32;
        let file_size = offset + 16 + trailing.len() as u32;
        let mut out = b"BM".to_vec();
        out.extend_from_slice(&file_size.to_le_bytes());
        out.extend_from_slice(&[0; 4]);
        out.extend_from_slice(&offset.to_le_bytes());
        out.extend_from_slice(&info_size.to_le_bytes());
        out.extend_from_slice(&2i32.to_le_bytes());
        out.extend_from_slice(&2i32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&24u16.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&[0; 16]);
        out.extend_from_slice(gap);
        out.extend_from_slice(&[255, 0, 0, 0, 255, 0, 0, 0]);
        out.extend_from_slice(&[0, 0, 255, 255, 255, 255, 0, 0]);
        out.extend_from_slice(trailing);
        out
    }

    fn strict() -> CodecConfig {
        CodecConfig::default()
    }

    #[test]
    fn decodes_bottom_up_rows_into_top_down_buffer() {
        let img = BmpImage::decode(&two_by_two(40, &[], &[]), &strict()).expect("decode");
        assert_eq!((img.width(), img.height()), (2, 2));
        let raster = img.raster();
        assert_eq!(raster.get(0, 0).expect("px"), Rgb24::new(255, 0, 0));
        assert_eq!(raster.get(1, 0).expect("px"), Rgb24::splat(255));
        assert_eq!(raster.get(0, 1).expect("px"), Rgb24::new(0, 0, 255));
        assert_eq!(raster.get(1, 1).expect("px"), Rgb24::new(0, 255, 0));
        assert_eq!(raster.max_value(), 255);
    }

    #[test]
    fn unmodified_image_encodes_byte_for_byte() {
        let bytes = two_by_two(40, &[1, 2, 3, 4], b"trailer");
        let img = BmpImage::decode(&bytes, &strict()).expect("decode");
        assert_eq!(img.header_gap(), &[1, 2, 3, 4]);
        assert_eq!(img.trailing(), b"trailer");
        assert_eq!(img.encode(), bytes);
    }

    #[test]
    fn rejects_wrong_signature() {
        let mut bytes = two_by_two(40, &[], &[]);
        bytes[0] = b'X';
        assert!(matches!(
            BmpImage::decode(&bytes, &strict()),
            Err(ImgmError::SignatureMismatch { .. })
        ));
    }

    #[test]
    fn strict_mode_rejects_extended_info_header() {
        // A 108-byte header: the extra 68 bytes sit before the pixel offset.
        let bytes = two_by_two(108, &[0; 68], &[]);
        assert!(matches!(
            BmpImage::decode(&bytes, &strict()),
            Err(ImgmError::UnsupportedMetadata(_))
        ));

        let lenient = CodecConfig {
            strict_bmp_header: false,
        };
        let img = BmpImage::decode(&bytes, &lenient).expect("best-effort decode");
        assert_eq!(img.header_gap().len(), 68);
        assert_eq!(img.encode(), bytes);
    }

    #[test]
    fn rejects_other_bit_depths() {
        let mut bytes = two_by_two(40, &[], &[]);
        bytes[28] = 32;
        assert!(matches!(
            BmpImage::decode(&bytes, &strict()),
            Err(ImgmError::UnsupportedMetadata(msg)) if msg.contains("32")
        ));
    }

    #[test]
    fn rejects_top_down_bitmaps() {
        let mut bytes = two_by_two(40, &[], &[]);
        bytes[22..26].copy_from_slice(&(-2i32).to_le_bytes());
        assert!(matches!(
            BmpImage::decode(&bytes, &strict()),
            Err(ImgmError::UnsupportedMetadata(_))
        ));
    }

    #[test]
    fn short_pixel_array_is_truncated() {
        let mut bytes = two_by_two(40, &[], &[]);
        bytes.truncate(bytes.len() - 3);
        assert!(matches!(
            BmpImage::decode(&bytes, &strict()),
            Err(ImgmError::Truncated { expected: 70, actual: 67 })
        ));
        assert!(matches!(
            BmpImage::decode(&bytes[..20], &strict()),
            Err(ImgmError::Truncated { .. })
        ));
    }

    #[test]
    fn resize_updates_headers_and_size_field() {
        let mut img = BmpImage::decode(&two_by_two(40, &[9, 9], b"xyz"), &strict()).expect("decode");
        img.scale(3, 1).expect("scale");
        assert_eq!(img.info_header().width, 3);
        assert_eq!(img.info_header().height, 1);
        assert_eq!(img.info_header().image_size, 12);
        // 54 + 3*3*1 + 3 trailing
        assert_eq!(img.declared_file_size(), 66);

        let encoded = img.encode();
        assert_eq!(&encoded[2..6], &66u32.to_le_bytes());
        // headers + gap + one padded row + trailer
        assert_eq!(encoded.len(), 54 + 2 + 12 + 3);
        assert!(encoded.ends_with(b"xyz"));
    }

    #[test]
    fn filters_without_resize_keep_declared_size() {
        let bytes = two_by_two(40, &[], &[]);
        let mut img = BmpImage::decode(&bytes, &strict()).expect("decode");
        img.to_negative().expect("negative");
        assert_eq!(img.declared_file_size(), img.file_header().file_size);
        assert_eq!(img.raster().get(1, 0).expect("px"), Rgb24::splat(0));
    }

    #[test]
    fn fresh_image_round_trips() {
        let raster = RasterImage::from_pixels(
            3,
            2,
            (0..6u8).map(|i| Rgb24::new(i, i * 2, i * 3)).collect(),
            255,
        )
        .expect("valid");
        let img = BmpImage::new(raster).expect("new");
        let bytes = img.encode();
        assert_eq!(bytes.len(), 54 + 2 * 12);
        assert_eq!(img.file_header().file_size as usize, bytes.len());
        assert_eq!(BmpImage::decode(&bytes, &strict()).expect("decode"), img);
    }
}
