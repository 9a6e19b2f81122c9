// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Codec layer — shared read/write plumbing for the on-disk formats.

pub mod bmp;
pub mod pgm;

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use imgm_core::config::CodecConfig;
use imgm_core::error::{ImgmError, Result};
use imgm_core::types::ImageFormat;
use tracing::{debug, info, instrument};

/// A decoded image format that can round-trip through bytes and files.
///
/// Implementors supply `decode` and `encode`; file handling, signature checks
/// and error mapping come from the provided methods.
pub trait Codec: Sized {
    const FORMAT: ImageFormat;

    /// Check the leading magic bytes.
    fn validate(data: &[u8]) -> Result<()> {
        let expected = Self::FORMAT.signature();
        match data.get(..2) {
            Some(found) if found == expected => Ok(()),
            found => Err(ImgmError::SignatureMismatch {
                expected: String::from_utf8_lossy(&expected).into_owned(),
                found: String::from_utf8_lossy(found.unwrap_or(data)).into_owned(),
            }),
        }
    }

    /// Parse a complete file held in memory.
    fn decode(data: &[u8], config: &CodecConfig) -> Result<Self>;

    /// Serialize to the complete on-disk byte layout.
    fn encode(&self) -> Vec<u8>;

    /// Read everything from `reader` and decode it.
    fn read_from(mut reader: impl Read, config: &CodecConfig) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::decode(&data, config)
    }

    /// Open and decode the file at `path`.
    #[instrument(skip_all, fields(path = %path.as_ref().display(), format = %Self::FORMAT))]
    fn open(path: impl AsRef<Path>, config: &CodecConfig) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| ImgmError::FileOpen {
            path: path.display().to_string(),
            source,
        })?;
        debug!(bytes = data.len(), "File read");
        let image = Self::decode(&data, config)?;
        info!("Image loaded");
        Ok(image)
    }

    fn write_to(&self, mut writer: impl Write) -> Result<()> {
        writer.write_all(&self.encode())?;
        writer.flush()?;
        Ok(())
    }

    /// Encode and write to `path`, replacing any existing file.
    #[instrument(skip_all, fields(path = %path.as_ref().display(), format = %Self::FORMAT))]
    fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let to_save_error = |source| ImgmError::ImageSave {
            path: path.display().to_string(),
            source,
        };
        let file = File::create(path).map_err(to_save_error)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&self.encode()).map_err(to_save_error)?;
        writer.flush().map_err(to_save_error)?;
        info!("Image saved");
        Ok(())
    }
}

/// Little-endian reader over an in-memory file. Every read past the end
/// reports how many bytes the file would have needed.
pub(crate) struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(ImgmError::Truncated {
                expected: pos,
                actual: self.data.len(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    pub(crate) fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    pub(crate) fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.saturating_add(n);
        let bytes = self.data.get(self.pos..end).ok_or(ImgmError::Truncated {
            expected: end,
            actual: self.data.len(),
        })?;
        self.pos = end;
        Ok(bytes)
    }

    pub(crate) fn rest(&mut self) -> &'a [u8] {
        let rest = &self.data[self.pos..];
        self.pos = self.data.len();
        rest
    }

    pub(crate) fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub(crate) fn u16_le(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.array()?))
    }

    pub(crate) fn u32_le(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    pub(crate) fn i32_le(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.array()?))
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::bmp::BmpImage;
    use crate::codec::pgm::PgmImage;

    #[test]
    fn stream_round_trip() {
        let bytes = b"P5\n2 1\n255\n\x07\x09".to_vec();
        let img = PgmImage::read_from(std::io::Cursor::new(&bytes), &CodecConfig::default())
            .expect("read");
        let mut out = Vec::new();
        img.write_to(&mut out).expect("write");
        assert_eq!(out, bytes);
    }

    #[test]
    fn validate_reports_found_bytes() {
        match BmpImage::validate(b"P5 1 1 255 ") {
            Err(ImgmError::SignatureMismatch { expected, found }) => {
                assert_eq!(expected, "BM");
                assert_eq!(found, "P5");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(BmpImage::validate(b"B").is_err());
        assert!(PgmImage::validate(b"P5").is_ok());
    }

    #[test]
    fn cursor_reads_little_endian() {
        let data = [0x34, 0x12, 0x78, 0x56, 0x34, 0x12, 0xff, 0xff, 0xff, 0xff];
        let mut cur = ByteCursor::new(&data);
        assert_eq!(cur.u16_le().expect("u16"), 0x1234);
        assert_eq!(cur.u32_le().expect("u32"), 0x1234_5678);
        assert_eq!(cur.i32_le().expect("i32"), -1);
        assert_eq!(cur.position(), 10);
        assert!(cur.rest().is_empty());
    }

    #[test]
    fn cursor_reports_truncation() {
        let mut cur = ByteCursor::new(&[1, 2, 3]);
        cur.u8().expect("first byte");
        assert!(matches!(
            cur.u32_le(),
            Err(ImgmError::Truncated { expected: 5, actual: 3 })
        ));
        // A failed read does not advance.
        assert_eq!(cur.position(), 1);
        assert!(cur.seek(4).is_err());
        cur.seek(3).expect("seek to end");
        assert_eq!(cur.peek(), None);
    }
}
