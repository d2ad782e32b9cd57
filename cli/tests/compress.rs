//! # Pressure CLI Compress Integration Tests
//!
//! File: cli/tests/compress.rs
//!
//! ## Overview
//!
//! Integration tests for `pressure compress`. Archives written by the binary
//! are checked with the `tar` and `flate2` crates where possible, so these
//! tests also confirm the output is readable by other tools.
//!

mod common;
use common::*;
use predicates::prelude::*;
use std::fs;
use std::io::Read;
use tempfile::tempdir;

/// Reads `(path, content)` pairs from a plain TAR file using the `tar` crate.
fn tar_entries(bytes: &[u8]) -> Vec<(String, String)> {
    let mut archive = tar::Archive::new(bytes);
    archive
        .entries()
        .unwrap()
        .map(|entry| {
            let mut entry = entry.unwrap();
            let path = entry.path().unwrap().to_string_lossy().into_owned();
            let mut content = String::new();
            entry.read_to_string(&mut content).unwrap();
            (path, content)
        })
        .collect()
}

#[test]
fn test_compress_tar_with_explicit_output() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "alpha").unwrap();
    fs::write(dir.path().join("b.txt"), "bravo").unwrap();

    isolated_cmd(dir.path())
        .args(["compress", "--no-progress", "-f", "tar", "-o", "out.tar", "a.txt", "b.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created out.tar"));

    let bytes = fs::read(dir.path().join("out.tar")).unwrap();
    assert_eq!(bytes.len() % 512, 0);
    assert_eq!(
        tar_entries(&bytes),
        vec![
            ("a.txt".to_string(), "alpha".to_string()),
            ("b.txt".to_string(), "bravo".to_string()),
        ]
    );
}

#[test]
fn test_compress_gzip_default_name_bundles_tar() {
    let dir = tempdir().unwrap();
    for name in ["one.txt", "two.txt", "three.txt"] {
        fs::write(dir.path().join(name), name).unwrap();
    }

    isolated_cmd(dir.path())
        .args(["compress", "--no-progress", "-f", "gzip", "one.txt", "two.txt", "three.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("archive.tar.gz"));

    let packed = fs::read(dir.path().join("archive.tar.gz")).unwrap();
    let mut tar_bytes = Vec::new();
    flate2::read::GzDecoder::new(&packed[..])
        .read_to_end(&mut tar_bytes)
        .unwrap();
    let names: Vec<String> = tar_entries(&tar_bytes).into_iter().map(|(p, _)| p).collect();
    assert_eq!(names, vec!["one.txt", "two.txt", "three.txt"]);
}

#[test]
fn test_compress_single_file_defaults_to_zip() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("report.txt"), "quarterly numbers").unwrap();

    isolated_cmd(dir.path())
        .args(["compress", "--no-progress", "report.txt"])
        .assert()
        .success();

    let packed = fs::read(dir.path().join("report.txt.zip")).unwrap();
    assert_eq!(&packed[..4], b"PK\x03\x04");
}

#[test]
fn test_compress_current_directory_is_named_after_it() {
    let dir = tempdir().unwrap();
    let project = dir.path().join("project");
    fs::create_dir_all(project.join("src")).unwrap();
    fs::write(project.join("src/lib.rs"), "pub fn f() {}").unwrap();
    fs::write(project.join("README.md"), "# project").unwrap();

    isolated_cmd(&project)
        .args(["compress", "--no-progress", "-f", "tar", "."])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created project.tar"));

    let bytes = fs::read(project.join("project.tar")).unwrap();
    let names: Vec<String> = tar_entries(&bytes).into_iter().map(|(p, _)| p).collect();
    assert_eq!(names, vec!["project/README.md", "project/src/lib.rs"]);
}

#[test]
fn test_compress_uses_project_default_format() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".pressure.toml"), "[compress]\ndefault_format = \"bzip2\"\n").unwrap();
    fs::write(dir.path().join("data.csv"), "a,b\n1,2\n").unwrap();

    isolated_cmd(dir.path())
        .args(["compress", "--no-progress", "data.csv"])
        .assert()
        .success();

    let packed = fs::read(dir.path().join("data.csv.bz2")).unwrap();
    assert_eq!(&packed[..3], b"BZh");
}

#[test]
fn test_compress_rar_is_unsupported() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "a").unwrap();

    isolated_cmd(dir.path())
        .args(["compress", "--no-progress", "-f", "rar", "a.txt"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: Unsupported format"));
    assert!(!dir.path().join("a.txt.rar").exists());
}

#[test]
fn test_compress_missing_input_fails() {
    let dir = tempdir().unwrap();
    isolated_cmd(dir.path())
        .args(["compress", "--no-progress", "-f", "tar", "ghost.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Compression failed"))
        .stderr(predicate::str::contains("ghost.txt"));
}

#[test]
fn test_compress_rejects_invalid_config() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".pressure.toml"), "[compress]\ngzip_level = 42\n").unwrap();
    fs::write(dir.path().join("a.txt"), "a").unwrap();

    isolated_cmd(dir.path())
        .args(["compress", "--no-progress", "a.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load Pressure configuration"));
}
