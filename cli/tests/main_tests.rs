//! # Pressure CLI Main Integration Tests
//!
//! File: cli/tests/main_tests.rs
//!
//! ## Overview
//!
//! Verifies top-level behavior of the `pressure` binary: `--help`,
//! `--version`, unknown subcommands and the `formats` listing.
//!

mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_main_help_flag() {
    pressure_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("compress"))
        .stdout(predicate::str::contains("decompress"));
}

#[test]
fn test_main_version_flag() {
    pressure_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_subcommand_fails() {
    pressure_cmd().arg("explode").assert().failure();
}

#[test]
fn test_formats_lists_all_formats() {
    let dir = tempfile::tempdir().unwrap();
    isolated_cmd(dir.path())
        .arg("formats")
        .assert()
        .success()
        .stdout(predicate::str::contains("zip"))
        .stdout(predicate::str::contains("bzip2"))
        .stdout(predicate::str::contains("first file only"))
        .stdout(predicate::str::contains("rar"));
}
