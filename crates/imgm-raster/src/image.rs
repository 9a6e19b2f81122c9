// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Format-agnostic image handle — picks the codec from the path or the
// leading bytes and forwards every transform to it.

use std::path::Path;

use imgm_core::config::CodecConfig;
use imgm_core::error::{ImgmError, Result};
use imgm_core::types::ImageFormat;
use tracing::{debug, instrument, warn};

use crate::codec::Codec;
use crate::codec::bmp::BmpImage;
use crate::codec::pgm::PgmImage;
use crate::filter::Transform;

/// An opened image of any supported format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Image {
    Bmp(BmpImage),
    Pgm(PgmImage),
}

/// Expands to `$body` with `$img` bound to the inner codec value.
macro_rules! dispatch {
    ($self:expr, $img:ident => $body:expr) => {
        match $self {
            Image::Bmp($img) => $body,
            Image::Pgm($img) => $body,
        }
    };
}

impl Image {
    // -- Construction ---------------------------------------------------------

    /// Open `path`, choosing the codec by extension and falling back to the
    /// file signature when the extension is unknown.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>, config: &CodecConfig) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| ImgmError::FileOpen {
            path: path.display().to_string(),
            source,
        })?;

        let by_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ImageFormat::from_extension);
        let format = match by_extension {
            Some(format) => format,
            None => ImageFormat::from_signature(&data).ok_or_else(|| {
                ImgmError::UnsupportedFormat(format!(
                    "{} has neither a .bmp/.pgm extension nor a known signature",
                    path.display()
                ))
            })?,
        };
        debug!(%format, by_extension = by_extension.is_some(), "Format selected");
        Self::decode(format, &data, config)
    }

    /// Decode in-memory bytes as `format`.
    pub fn decode(format: ImageFormat, data: &[u8], config: &CodecConfig) -> Result<Self> {
        Ok(match format {
            ImageFormat::Bmp => Self::Bmp(BmpImage::decode(data, config)?),
            ImageFormat::Pgm => Self::Pgm(PgmImage::decode(data, config)?),
        })
    }

    // -- Accessors ------------------------------------------------------------

    pub fn format(&self) -> ImageFormat {
        match self {
            Self::Bmp(_) => ImageFormat::Bmp,
            Self::Pgm(_) => ImageFormat::Pgm,
        }
    }

    pub fn width(&self) -> usize {
        dispatch!(self, img => img.raster().width())
    }

    pub fn height(&self) -> usize {
        dispatch!(self, img => img.raster().height())
    }

    pub fn is_binary(&self) -> bool {
        dispatch!(self, img => img.raster().is_binary())
    }

    // -- Output ---------------------------------------------------------------

    pub fn encode(&self) -> Vec<u8> {
        dispatch!(self, img => img.encode())
    }

    /// Save in the image's own format, whatever extension `path` carries.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = self.format();
        if !has_extension_of(path, format) {
            warn!(
                path = %path.display(),
                %format,
                "Output extension does not match the image format, writing it unchanged"
            );
        }
        dispatch!(self, img => img.save(path))
    }

    // -- Transforms -----------------------------------------------------------

    pub fn to_negative(&mut self) -> Result<()> {
        dispatch!(self, img => img.to_negative())
    }

    pub fn to_grayscale(&mut self) -> Result<()> {
        dispatch!(self, img => img.to_grayscale())
    }

    pub fn to_binary(&mut self, threshold: i32) -> Result<()> {
        dispatch!(self, img => img.to_binary(threshold))
    }

    pub fn blur(&mut self) -> Result<()> {
        dispatch!(self, img => img.blur())
    }

    pub fn edge_filter(&mut self) -> Result<()> {
        dispatch!(self, img => img.edge_filter())
    }

    pub fn denoise(&mut self, size: usize) -> Result<()> {
        dispatch!(self, img => img.denoise(size))
    }

    pub fn erode(&mut self, radius: usize) -> Result<()> {
        dispatch!(self, img => img.erode_with_radius(radius))
    }

    pub fn dilate(&mut self, radius: usize) -> Result<()> {
        dispatch!(self, img => img.dilate_with_radius(radius))
    }

    pub fn scale(&mut self, width: usize, height: usize) -> Result<()> {
        dispatch!(self, img => img.scale(width, height))
    }

    pub fn rotate(&mut self, degree: f32) -> Result<()> {
        dispatch!(self, img => img.rotate(degree))
    }
}

impl From<BmpImage> for Image {
    fn from(img: BmpImage) -> Self {
        Self::Bmp(img)
    }
}

impl From<PgmImage> for Image {
    fn from(img: PgmImage) -> Self {
        Self::Pgm(img)
    }
}

/// Whether `path` ends in the canonical extension of `format`, ignoring case.
fn has_extension_of(path: &Path, format: ImageFormat) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(format.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Gray8;
    use crate::raster::RasterImage;

    fn pgm_bytes() -> Vec<u8> {
        let raster = RasterImage::from_pixels(2, 2, vec![Gray8(10), Gray8(20), Gray8(30), Gray8(40)], 255)
            .expect("valid");
        PgmImage::new(raster).encode()
    }

    #[test]
    fn open_sniffs_unknown_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scan.raw");
        std::fs::write(&path, pgm_bytes()).expect("write");
        let img = Image::open(&path, &CodecConfig::default()).expect("open");
        assert_eq!(img.format(), ImageFormat::Pgm);
        assert_eq!((img.width(), img.height()), (2, 2));
    }

    #[test]
    fn extension_wins_over_content() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("really-pgm.BMP");
        std::fs::write(&path, pgm_bytes()).expect("write");
        assert!(matches!(
            Image::open(&path, &CodecConfig::default()),
            Err(ImgmError::SignatureMismatch { .. })
        ));
    }

    #[test]
    fn unknown_extension_and_signature_is_unsupported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").expect("write");
        assert!(matches!(
            Image::open(&path, &CodecConfig::default()),
            Err(ImgmError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn missing_file_is_file_open_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(matches!(
            Image::open(dir.path().join("absent.bmp"), &CodecConfig::default()),
            Err(ImgmError::FileOpen { .. })
        ));
    }

    #[test]
    fn extension_check_ignores_case() {
        assert!(has_extension_of(Path::new("out/a.PGM"), ImageFormat::Pgm));
        assert!(has_extension_of(Path::new("b.bmp"), ImageFormat::Bmp));
        assert!(!has_extension_of(Path::new("b.bmp"), ImageFormat::Pgm));
        assert!(!has_extension_of(Path::new("noext"), ImageFormat::Bmp));
    }

    #[test]
    fn save_keeps_native_format_under_foreign_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("gray.bmp");
        let img = Image::decode(ImageFormat::Pgm, &pgm_bytes(), &CodecConfig::default())
            .expect("decode");
        img.save(&path).expect("save");
        assert_eq!(std::fs::read(&path).expect("read back"), pgm_bytes());
    }

    #[test]
    fn transforms_forward_to_inner_image() {
        let mut img = Image::decode(ImageFormat::Pgm, &pgm_bytes(), &CodecConfig::default())
            .expect("decode");
        assert!(matches!(img.erode(3), Err(ImgmError::NotInBinaryFormat)));
        img.to_binary(25).expect("binary");
        assert!(img.is_binary());
        img.dilate(1).expect("dilate");
        img.scale(4, 4).expect("scale");
        assert_eq!((img.width(), img.height()), (4, 4));
    }
}
