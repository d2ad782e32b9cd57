//! # Pressure CLI Decompress Integration Tests
//!
//! File: cli/tests/decompress.rs
//!
//! ## Overview
//!
//! Integration tests for `pressure decompress`, including archives produced
//! by other tools (the `tar` and `flate2` crates) and full compress/decompress
//! round trips through the binary.
//!

mod common;
use common::*;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use tempfile::tempdir;

#[test]
fn test_decompress_foreign_tar_gz() {
    let dir = tempdir().unwrap();

    let mut builder = tar::Builder::new(Vec::new());
    let mut header = tar::Header::new_ustar();
    header.set_size(5);
    header.set_mode(0o644);
    header.set_mtime(1_700_000_000);
    header.set_cksum();
    builder
        .append_data(&mut header, "notes/hello.txt", &b"hello"[..])
        .unwrap();
    let tar_bytes = builder.into_inner().unwrap();
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&tar_bytes).unwrap();
    fs::write(dir.path().join("bundle.tar.gz"), encoder.finish().unwrap()).unwrap();

    isolated_cmd(dir.path())
        .args(["decompress", "--no-progress", "-o", "out", "bundle.tar.gz"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Extracted 1 file(s)"));
    assert_eq!(
        fs::read_to_string(dir.path().join("out/notes/hello.txt")).unwrap(),
        "hello"
    );
}

/// Appends an entry whose name is written byte for byte, the way GNU tar
/// stores `./`-relative paths from `tar -cf x.tar -C dir .`.
fn append_raw(builder: &mut tar::Builder<Vec<u8>>, name: &str, kind: tar::EntryType, data: &[u8]) {
    let mut header = tar::Header::new_ustar();
    header.as_old_mut().name[..name.len()].copy_from_slice(name.as_bytes());
    header.set_entry_type(kind);
    header.set_size(data.len() as u64);
    header.set_mode(0o755);
    header.set_mtime(1_700_000_000);
    header.set_cksum();
    builder.append(&header, data).unwrap();
}

#[test]
fn test_decompress_tar_with_current_directory_entry() {
    let dir = tempdir().unwrap();

    let mut builder = tar::Builder::new(Vec::new());
    append_raw(&mut builder, "./", tar::EntryType::Directory, b"");
    append_raw(&mut builder, "./docs/", tar::EntryType::Directory, b"");
    append_raw(&mut builder, "./docs/readme.md", tar::EntryType::Regular, b"# docs");
    append_raw(&mut builder, "./a.txt", tar::EntryType::Regular, b"hi");
    fs::write(dir.path().join("dot.tar"), builder.into_inner().unwrap()).unwrap();

    isolated_cmd(dir.path())
        .args(["decompress", "--no-progress", "-o", "out", "dot.tar"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Extracted 2 file(s)"));
    assert_eq!(fs::read_to_string(dir.path().join("out/a.txt")).unwrap(), "hi");
    assert_eq!(
        fs::read_to_string(dir.path().join("out/docs/readme.md")).unwrap(),
        "# docs"
    );
}

#[test]
fn test_round_trip_directory_through_bzip2() {
    let dir = tempdir().unwrap();
    let site = dir.path().join("site");
    fs::create_dir_all(site.join("css")).unwrap();
    fs::write(site.join("index.html"), "<h1>hi</h1>").unwrap();
    fs::write(site.join("css/app.css"), "h1 { color: red }").unwrap();

    isolated_cmd(dir.path())
        .args(["compress", "--no-progress", "-f", "bzip2", "site"])
        .assert()
        .success()
        .stdout(predicate::str::contains("site.tar.bz2"));

    isolated_cmd(dir.path())
        .args(["decompress", "--no-progress", "-o", "restored", "site.tar.bz2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Extracted 2 file(s)"));
    assert_eq!(
        fs::read_to_string(dir.path().join("restored/site/css/app.css")).unwrap(),
        "h1 { color: red }"
    );
}

#[test]
fn test_round_trip_z_keeps_first_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("first.txt"), "first").unwrap();
    fs::write(dir.path().join("second.txt"), "second").unwrap();

    isolated_cmd(dir.path())
        .args(["compress", "--no-progress", "-f", "z", "-o", "first.txt.Z", "first.txt", "second.txt"])
        .assert()
        .success();

    isolated_cmd(dir.path())
        .args(["decompress", "--no-progress", "-o", "out", "first.txt.Z"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Extracted 1 file(s)"));
    assert_eq!(fs::read_to_string(dir.path().join("out/first.txt")).unwrap(), "first");
    assert!(!dir.path().join("out/second.txt").exists());
}

#[test]
fn test_round_trip_zip() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.md"), "# A").unwrap();
    fs::write(dir.path().join("b.md"), "# B").unwrap();

    isolated_cmd(dir.path())
        .args(["compress", "--no-progress", "-f", "zip", "a.md", "b.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("archive.zip"));
    isolated_cmd(dir.path())
        .args(["decompress", "--no-progress", "-o", "out", "archive.zip"])
        .assert()
        .success();
    assert_eq!(fs::read_to_string(dir.path().join("out/b.md")).unwrap(), "# B");
}

#[test]
fn test_decompress_corrupt_tar_reports_checksum() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "a").unwrap();
    isolated_cmd(dir.path())
        .args(["compress", "--no-progress", "-f", "tar", "-o", "a.tar", "a.txt"])
        .assert()
        .success();

    let archive = dir.path().join("a.tar");
    let mut bytes = fs::read(&archive).unwrap();
    bytes[0] = b'b';
    fs::write(&archive, bytes).unwrap();

    isolated_cmd(dir.path())
        .args(["decompress", "--no-progress", "-o", "out", "a.tar"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Checksum mismatch in entry 0"));
}

#[test]
fn test_decompress_rar_is_unsupported() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("x.rar"), "Rar!").unwrap();
    isolated_cmd(dir.path())
        .args(["decompress", "--no-progress", "-o", "out", "x.rar"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("RAR requires an external library"));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_decompress_tar_never_keeps_inner_tarball() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("x"), "x").unwrap();
    fs::write(dir.path().join("y"), "y").unwrap();
    isolated_cmd(dir.path())
        .args(["compress", "--no-progress", "-f", "gzip", "-o", "pair.tar.gz", "x", "y"])
        .assert()
        .success();

    isolated_cmd(dir.path())
        .args(["decompress", "--no-progress", "--tar", "never", "-o", "out", "pair.tar.gz"])
        .assert()
        .success();
    let inner = fs::read(dir.path().join("out/pair.tar")).unwrap();
    assert_eq!(inner.len() % 512, 0);
    assert!(!dir.path().join("out/x").exists());
}
