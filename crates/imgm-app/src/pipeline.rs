// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Transform chain — parses the ordered operation flags and runs them against
// an opened image.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use imgm_core::config::FilterConfig;
use imgm_core::error::{ImgmError, Result};
use imgm_raster::Image;
use tracing::{info, instrument};

/// One step of the chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Save(PathBuf),
    Scale { width: usize, height: usize },
    Negative,
    Blur,
    Denoise(usize),
    EdgeFilter,
    Binary(i32),
    Erode,
    Dilate,
    Rotate(f32),
    Grayscale,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Save(path) => write!(f, "save to {}", path.display()),
            Self::Scale { width, height } => write!(f, "scale to {width}x{height}"),
            Self::Negative => write!(f, "negative"),
            Self::Blur => write!(f, "blur"),
            Self::Denoise(size) => write!(f, "denoise ({size})"),
            Self::EdgeFilter => write!(f, "edge filter"),
            Self::Binary(threshold) => write!(f, "binary (threshold {threshold})"),
            Self::Erode => write!(f, "erode"),
            Self::Dilate => write!(f, "dilate"),
            Self::Rotate(degree) => write!(f, "rotate {degree} degrees"),
            Self::Grayscale => write!(f, "grayscale"),
        }
    }
}

/// Parse the whole chain up front so grammar errors surface before any I/O.
pub fn parse_chain(args: &[String]) -> Result<Vec<Operation>> {
    let mut ops = Vec::new();
    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let mut param = |what: &str| {
            iter.next().map(String::as_str).ok_or_else(|| {
                ImgmError::InvalidArgument(format!("{flag} expects {what}"))
            })
        };
        let op = match flag.as_str() {
            "-o" => Operation::Save(PathBuf::from(param("an output path")?)),
            "-rs" => {
                let width = number(flag, param("a width")?)?;
                let height = number(flag, param("a height")?)?;
                Operation::Scale { width, height }
            }
            "-n" => Operation::Negative,
            "-b" => {
                filter_type(flag, param("a blur type")?)?;
                Operation::Blur
            }
            "-dn" => Operation::Denoise(number(flag, param("a window size")?)?),
            "-g" => {
                filter_type(flag, param("an edge filter type")?)?;
                Operation::EdgeFilter
            }
            "-ib" => Operation::Binary(number(flag, param("a threshold")?)?),
            "-e" => Operation::Erode,
            "-d" => Operation::Dilate,
            "-r" => {
                let degree: f32 = number(flag, param("an angle in degrees")?)?;
                if !degree.is_finite() {
                    return Err(ImgmError::InvalidArgument(format!(
                        "{flag} needs a finite angle"
                    )));
                }
                Operation::Rotate(degree)
            }
            "-gs" => Operation::Grayscale,
            other => {
                return Err(ImgmError::InvalidArgument(format!(
                    "unknown operation {other:?}"
                )));
            }
        };
        ops.push(op);
    }
    Ok(ops)
}

/// Run `ops` in order. The first failure stops the chain; saves that already
/// happened stay on disk.
#[instrument(skip_all, fields(steps = ops.len()))]
pub fn execute(image: &mut Image, ops: &[Operation], filters: &FilterConfig) -> Result<()> {
    for op in ops {
        info!(%op, "Applying");
        match op {
            Operation::Save(path) => image.save(path)?,
            Operation::Scale { width, height } => image.scale(*width, *height)?,
            Operation::Negative => image.to_negative()?,
            Operation::Blur => image.blur()?,
            Operation::Denoise(size) => image.denoise(*size)?,
            Operation::EdgeFilter => image.edge_filter()?,
            Operation::Binary(threshold) => image.to_binary(*threshold)?,
            Operation::Erode => image.erode(filters.erode_radius)?,
            Operation::Dilate => image.dilate(filters.dilate_radius)?,
            Operation::Rotate(degree) => image.rotate(*degree)?,
            Operation::Grayscale => image.to_grayscale()?,
        }
    }
    Ok(())
}

fn number<T: FromStr>(flag: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| ImgmError::InvalidArgument(format!("{flag} got {value:?}, which is not a valid number")))
}

/// Only type 1 exists for `-b` (average) and `-g` (Sobel).
fn filter_type(flag: &str, value: &str) -> Result<()> {
    match number::<u32>(flag, value)? {
        1 => Ok(()),
        other => Err(ImgmError::InvalidArgument(format!(
            "{flag} type {other} is not supported (only 1)"
        ))),
    }
}
