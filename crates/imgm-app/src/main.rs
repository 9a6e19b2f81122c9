// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// imgm — BMP/PGM raster editor
//
// Entry point. Initialises logging, loads configuration, parses the transform
// chain, then opens the input and runs the chain against it.

mod cli;
mod pipeline;

use std::process::ExitCode;

use clap::Parser;
use imgm_core::config::AppConfig;
use imgm_core::error::Result;
use imgm_core::human_errors::humanize_error;
use imgm_raster::Image;

use cli::CliArgs;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
        )
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "imgm failed");
            let human = humanize_error(&err);
            eprintln!("{}", human.message);
            eprintln!("  {}", human.suggestion);
            ExitCode::from(human.exit_code())
        }
    }
}

fn run(args: &CliArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    let ops = pipeline::parse_chain(&args.chain)?;
    if ops.is_empty() {
        tracing::warn!("No operations given; the input is only validated");
    }

    let mut image = Image::open(&args.input, &config.codec)?;
    tracing::info!(
        format = %image.format(),
        width = image.width(),
        height = image.height(),
        "Input opened"
    );
    pipeline::execute(&mut image, &ops, &config.filters)
}
