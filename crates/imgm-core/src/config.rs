// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ImgmError, Result};

/// Persistent settings for the editor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Decoder behaviour.
    pub codec: CodecConfig,
    /// Filter parameters.
    pub filters: FilterConfig,
}

/// How strictly the decoders treat unusual headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Reject BMP files whose info header is not the 40-byte variant.
    /// When false, such files only log a warning and are decoded best-effort.
    pub strict_bmp_header: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            strict_bmp_header: true,
        }
    }
}

/// Window sizes for the morphological filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Radius of the erode window (3 gives a 7x7 window).
    pub erode_radius: usize,
    /// Radius of the dilate window (2 gives a 5x5 window).
    pub dilate_radius: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            erode_radius: 3,
            dilate_radius: 2,
        }
    }
}

impl AppConfig {
    /// Load settings from a JSON file. Fields missing from the file keep
    /// their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data =
            std::fs::read_to_string(path.as_ref()).map_err(|source| ImgmError::ConfigRead {
                path: path.as_ref().display().to_string(),
                source,
            })?;
        let config: Self = serde_json::from_str(&data)?;
        debug!(path = %path.as_ref().display(), ?config, "Configuration loaded");
        Ok(config)
    }

    /// Write settings to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}
