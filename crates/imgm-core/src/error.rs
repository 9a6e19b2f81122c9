// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for imgm.

use thiserror::Error;

/// Top-level error type for all imgm operations.
#[derive(Debug, Error)]
pub enum ImgmError {
    // -- Reading --
    #[error("could not open {path}: {source}")]
    FileOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("signature mismatch: expected {expected:?}, found {found:?}")]
    SignatureMismatch { expected: String, found: String },

    #[error("unsupported metadata: {0}")]
    UnsupportedMetadata(String),

    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("file truncated: needed {expected} bytes, only {actual} available")]
    Truncated { expected: usize, actual: usize },

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    // -- Processing --
    #[error("the image data needs to be in binary format")]
    NotInBinaryFormat,

    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("buffer size mismatch: expected {expected} pixels, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("pixel ({x}, {y}) is outside a {width}x{height} buffer")]
    IndexOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    // -- Writing --
    #[error("could not save image to {path}: {source}")]
    ImageSave {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // -- Front end --
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("could not read configuration {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ImgmError>;
