// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end runs of the imgm binary: chain execution and exit codes.

use std::path::Path;
use std::process::{Command, Output};

fn imgm(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_imgm"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run imgm")
}

fn write_pgm(path: &Path, pixels: &[u8], width: usize) {
    let mut bytes = format!("P5\n{} {}\n255\n", width, pixels.len() / width).into_bytes();
    bytes.extend_from_slice(pixels);
    std::fs::write(path, bytes).expect("write fixture");
}

fn arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}

#[test]
fn negative_chain_writes_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("in.pgm");
    let output = dir.path().join("out.pgm");
    write_pgm(&input, &[10, 20, 30, 40], 2);

    let run = imgm(&["-i", arg(&input), "-n", "-o", arg(&output)]);
    assert!(run.status.success(), "stderr: {}", String::from_utf8_lossy(&run.stderr));

    let saved = std::fs::read(&output).expect("read output");
    assert_eq!(saved, b"P5\n2 2\n255\n\xf5\xeb\xe1\xd7");
}

#[test]
fn missing_input_exits_with_input_code() {
    let dir = tempfile::tempdir().expect("tempdir");
    let run = imgm(&["-i", arg(&dir.path().join("absent.bmp")), "-n"]);
    assert_eq!(run.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&run.stderr).contains("couldn't be found"));
}

#[test]
fn erode_before_threshold_exits_with_processing_code() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("in.pgm");
    write_pgm(&input, &[0, 255, 0, 255], 2);
    let run = imgm(&["-i", arg(&input), "-e"]);
    assert_eq!(run.status.code(), Some(4));
}

#[test]
fn bad_chain_fails_before_opening_input() {
    let dir = tempfile::tempdir().expect("tempdir");
    // The input does not exist, yet the chain error wins.
    let run = imgm(&["-i", arg(&dir.path().join("absent.pgm")), "-b", "7"]);
    assert_eq!(run.status.code(), Some(2));
}

#[test]
fn unwritable_output_exits_with_output_code() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("in.pgm");
    write_pgm(&input, &[1, 2, 3, 4], 2);
    let output = dir.path().join("missing-dir").join("out.pgm");
    let run = imgm(&["-i", arg(&input), "-n", "-o", arg(&output)]);
    assert_eq!(run.status.code(), Some(5));
}
