// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line definition.

use std::path::PathBuf;

use clap::Parser;

/// Apply a chain of filters to a 24-bit BMP or 8-bit PGM image.
///
/// Options must come before the chain. The chain runs left to right, e.g.
/// `imgm -i in.bmp -ib 128 -e -o eroded.bmp -rs 64 64 -o small.bmp`.
#[derive(Debug, Parser)]
#[command(name = "imgm", version, about)]
pub struct CliArgs {
    /// Image to open (.bmp or .pgm; other extensions are sniffed)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,

    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Operations, applied in order:
    /// -o PATH | -rs W H | -n | -b 1 | -dn SIZE | -g 1 | -ib T | -e | -d | -r DEG | -gs
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "CHAIN")]
    pub chain: Vec<String>,
}
