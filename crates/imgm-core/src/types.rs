// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types shared by the raster library and the command line.

use serde::{Deserialize, Serialize};

/// Supported on-disk raster formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageFormat {
    /// Windows bitmap, uncompressed 24 bits per pixel.
    Bmp,
    /// Binary portable graymap (`P5`), 8 bits per pixel.
    Pgm,
}

impl ImageFormat {
    /// The two magic bytes every file of this format starts with.
    pub fn signature(&self) -> [u8; 2] {
        match self {
            Self::Bmp => *b"BM",
            Self::Pgm => *b"P5",
        }
    }

    /// Canonical lowercase file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Bmp => "bmp",
            Self::Pgm => "pgm",
        }
    }

    /// Infer the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "bmp" | "dib" => Some(Self::Bmp),
            "pgm" => Some(Self::Pgm),
            _ => None,
        }
    }

    /// Infer the format from the leading bytes of a file.
    pub fn from_signature(data: &[u8]) -> Option<Self> {
        match data.get(..2)? {
            b"BM" => Some(Self::Bmp),
            b"P5" => Some(Self::Pgm),
            _ => None,
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bmp => write!(f, "BMP"),
            Self::Pgm => write!(f, "PGM"),
        }
    }
}

/// Classification of errors, used by the command line to pick an exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClass {
    /// Bad command-line usage or transform chain.
    Usage,
    /// The input could not be opened or is not a supported image.
    Input,
    /// A transform could not be applied in the current state.
    Processing,
    /// The result could not be written.
    Output,
}

impl ErrorClass {
    /// Process exit code reported for this class.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage => 2,
            Self::Input => 3,
            Self::Processing => 4,
            Self::Output => 5,
        }
    }
}
