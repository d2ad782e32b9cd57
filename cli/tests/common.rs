//! # Pressure CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration test crates in `cli/tests/`. Each test
//! file declares `mod common;` and runs the compiled `pressure` binary through
//! `assert_cmd`.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::path::Path;

/// # Get Pressure Command (`pressure_cmd`)
///
/// Returns an `assert_cmd::Command` for the compiled `pressure` binary.
///
/// ## Panics
/// Panics if the binary cannot be found via `Command::cargo_bin`.
pub fn pressure_cmd() -> Command {
    Command::cargo_bin("pressure").expect("Failed to find pressure binary for testing")
}

/// A `pressure` command isolated from the developer's own configuration:
/// it runs in `dir`, points `PRESSURE_CONFIG` at a file that does not exist
/// and marks `dir` as a repository root so the project config search stops there.
pub fn isolated_cmd(dir: &Path) -> Command {
    std::fs::create_dir_all(dir.join(".git")).expect("Failed to create .git marker");
    let mut cmd = pressure_cmd();
    cmd.current_dir(dir)
        .env("PRESSURE_CONFIG", dir.join("no-such-config.toml"))
        .env_remove("RUST_LOG");
    cmd
}
