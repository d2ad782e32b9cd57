//! # Pressure Archive Formats (`common::archive::format`)
//!
//! File: cli/src/common/archive/format.rs
//!
//! ## Overview
//!
//! This module defines the closed set of formats Pressure knows about, how a
//! format is detected from a file name, and, in exactly one place, what each
//! format means for the orchestrator (`CompressionFormat::strategy`). Both
//! compression and decompression dispatch on the returned `Strategy`, so
//! adding behaviour for a format never means touching two match statements.
//!
//! ## Detection
//!
//! Detection looks at the file extension only, case-insensitively:
//!
//! | extension      | format |
//! |----------------|--------|
//! | `zip`          | zip    |
//! | `gz`, `gzip`   | gzip   |
//! | `tar`          | tar    |
//! | `bz2`, `bzip2` | bzip2  |
//! | `Z`, `z`       | z      |
//! | `rar`          | rar    |
//! | anything else  | zip    |
//!
//! Content is never sniffed; a mismatched file fails later with the codec's
//! own decode error.
//!
use crate::common::archive::compression::StreamCodec;
use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// # Compression Format (`CompressionFormat`)
///
/// Every format Pressure recognises. `Rar` is recognised so it can be
/// rejected with a clear message; it has no codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionFormat {
    Zip,
    Gzip,
    Tar,
    Bzip2,
    Z,
    Rar,
}

/// How a format is produced and consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Pressure's own TAR codec.
    Tar,
    /// The ZIP container crate, which handles many entries natively.
    Zip,
    /// A single-stream codec; `multi_file` says what happens to extra inputs.
    Stream {
        codec: StreamCodec,
        multi_file: MultiFile,
    },
    /// Recognised but not implemented.
    Unsupported { reason: &'static str },
}

/// What a single-stream format does when handed more than one input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiFile {
    /// Bundle every input into a TAR stream first (tar.gz, tar.bz2).
    BundleAsTar,
    /// Compress the first input only; the rest are ignored.
    FirstOnly,
}

impl Strategy {
    /// True when `file_count` inputs go through a TAR stream before the codec.
    pub fn bundles_as_tar(self, file_count: usize) -> bool {
        matches!(
            self,
            Strategy::Stream {
                multi_file: MultiFile::BundleAsTar,
                ..
            }
        ) && file_count > 1
    }
}

impl CompressionFormat {
    pub const ALL: [CompressionFormat; 6] = [
        CompressionFormat::Zip,
        CompressionFormat::Gzip,
        CompressionFormat::Tar,
        CompressionFormat::Bzip2,
        CompressionFormat::Z,
        CompressionFormat::Rar,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CompressionFormat::Zip => "zip",
            CompressionFormat::Gzip => "gzip",
            CompressionFormat::Tar => "tar",
            CompressionFormat::Bzip2 => "bzip2",
            CompressionFormat::Z => "z",
            CompressionFormat::Rar => "rar",
        }
    }

    /// The single mapping from format to orchestration behaviour.
    pub fn strategy(self) -> Strategy {
        match self {
            CompressionFormat::Zip => Strategy::Zip,
            CompressionFormat::Tar => Strategy::Tar,
            CompressionFormat::Gzip => Strategy::Stream {
                codec: StreamCodec::Gzip,
                multi_file: MultiFile::BundleAsTar,
            },
            CompressionFormat::Bzip2 => Strategy::Stream {
                codec: StreamCodec::Bzip2,
                multi_file: MultiFile::BundleAsTar,
            },
            CompressionFormat::Z => Strategy::Stream {
                codec: StreamCodec::Z,
                multi_file: MultiFile::FirstOnly,
            },
            CompressionFormat::Rar => Strategy::Unsupported {
                reason: "RAR requires an external library",
            },
        }
    }

    /// Maps a bare extension (no dot) to a format. Unknown extensions map to zip.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "zip" => CompressionFormat::Zip,
            "gz" | "gzip" => CompressionFormat::Gzip,
            "tar" => CompressionFormat::Tar,
            "bz2" | "bzip2" => CompressionFormat::Bzip2,
            "z" => CompressionFormat::Z,
            "rar" => CompressionFormat::Rar,
            _ => CompressionFormat::Zip,
        }
    }

    /// Detects the format of `path` from its last extension.
    pub fn detect(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(CompressionFormat::Zip)
    }

    /// Canonical file extension (no dot).
    pub fn extension(self) -> &'static str {
        match self {
            CompressionFormat::Zip => "zip",
            CompressionFormat::Gzip => "gz",
            CompressionFormat::Tar => "tar",
            CompressionFormat::Bzip2 => "bz2",
            CompressionFormat::Z => "Z",
            CompressionFormat::Rar => "rar",
        }
    }

    /// Extension for an output built from `file_count` inputs: `tar.gz` and
    /// `tar.bz2` when the inputs get bundled, the canonical one otherwise.
    pub fn output_extension(self, file_count: usize) -> String {
        if self.strategy().bundles_as_tar(file_count) {
            format!("tar.{}", self.extension())
        } else {
            self.extension().to_string()
        }
    }

    /// Human-readable summary of what happens with several inputs.
    pub fn multi_file_behaviour(self) -> &'static str {
        match self.strategy() {
            Strategy::Tar | Strategy::Zip => "all files in one archive",
            Strategy::Stream {
                multi_file: MultiFile::BundleAsTar,
                ..
            } => "bundled as tar, then compressed",
            Strategy::Stream {
                multi_file: MultiFile::FirstOnly,
                ..
            } => "first file only",
            Strategy::Unsupported { .. } => "unsupported",
        }
    }
}

impl fmt::Display for CompressionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// # TAR Intent (`TarIntent`)
///
/// Whether the payload of a gzip/bzip2 file should be unpacked as a TAR
/// stream. This is the caller's intent; the payload is never inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TarIntent {
    /// Unpack when the name says so (`photos.tar.gz`, `logs.TAR.bz2`).
    #[default]
    Auto,
    /// Always unpack the payload as TAR.
    Always,
    /// Always write the payload out as a single file.
    Never,
}

impl TarIntent {
    pub fn wants_tar(self, archive: &Path) -> bool {
        match self {
            TarIntent::Always => true,
            TarIntent::Never => false,
            TarIntent::Auto => archive
                .file_stem()
                .map(Path::new)
                .and_then(|stem| stem.extension())
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("tar")),
        }
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_extension_table() {
        let cases = [
            ("test.zip", CompressionFormat::Zip),
            ("test.gz", CompressionFormat::Gzip),
            ("test.gzip", CompressionFormat::Gzip),
            ("test.tar", CompressionFormat::Tar),
            ("test.bz2", CompressionFormat::Bzip2),
            ("test.bzip2", CompressionFormat::Bzip2),
            ("test.Z", CompressionFormat::Z),
            ("test.z", CompressionFormat::Z),
            ("test.rar", CompressionFormat::Rar),
            ("archive.tar.gz", CompressionFormat::Gzip),
            ("archive.tar.bz2", CompressionFormat::Bzip2),
        ];
        for (name, expected) in cases {
            assert_eq!(CompressionFormat::detect(Path::new(name)), expected, "{}", name);
        }
    }

    #[test]
    fn test_detect_is_case_insensitive() {
        assert_eq!(CompressionFormat::detect(Path::new("test.ZIP")), CompressionFormat::Zip);
        assert_eq!(CompressionFormat::detect(Path::new("TEST.TAR")), CompressionFormat::Tar);
        assert_eq!(CompressionFormat::detect(Path::new("x.Gz")), CompressionFormat::Gzip);
    }

    #[test]
    fn test_detect_defaults_to_zip() {
        assert_eq!(CompressionFormat::detect(Path::new("test.unknown")), CompressionFormat::Zip);
        assert_eq!(CompressionFormat::detect(Path::new("no_extension")), CompressionFormat::Zip);
        assert_eq!(CompressionFormat::detect(Path::new("archive.tgz")), CompressionFormat::Zip);
    }

    #[test]
    fn test_strategy_mapping() {
        assert_eq!(CompressionFormat::Tar.strategy(), Strategy::Tar);
        assert_eq!(CompressionFormat::Zip.strategy(), Strategy::Zip);
        assert!(matches!(
            CompressionFormat::Z.strategy(),
            Strategy::Stream { codec: StreamCodec::Z, multi_file: MultiFile::FirstOnly }
        ));
        assert!(matches!(CompressionFormat::Rar.strategy(), Strategy::Unsupported { .. }));
        assert!(CompressionFormat::Gzip.strategy().bundles_as_tar(2));
        assert!(!CompressionFormat::Gzip.strategy().bundles_as_tar(1));
        assert!(!CompressionFormat::Z.strategy().bundles_as_tar(3));
        assert!(!CompressionFormat::Tar.strategy().bundles_as_tar(3));
    }

    #[test]
    fn test_output_extension() {
        assert_eq!(CompressionFormat::Gzip.output_extension(1), "gz");
        assert_eq!(CompressionFormat::Gzip.output_extension(3), "tar.gz");
        assert_eq!(CompressionFormat::Bzip2.output_extension(2), "tar.bz2");
        assert_eq!(CompressionFormat::Z.output_extension(2), "Z");
        assert_eq!(CompressionFormat::Zip.output_extension(5), "zip");
    }

    #[test]
    fn test_extensions_detect_back_to_their_format() {
        for format in CompressionFormat::ALL {
            let name = format!("file.{}", format.extension());
            assert_eq!(CompressionFormat::detect(Path::new(&name)), format);
        }
    }

    #[test]
    fn test_tar_intent() {
        assert!(TarIntent::Auto.wants_tar(Path::new("bundle.tar.gz")));
        assert!(TarIntent::Auto.wants_tar(Path::new("/tmp/x/LOGS.TAR.bz2")));
        assert!(!TarIntent::Auto.wants_tar(Path::new("notes.txt.gz")));
        assert!(!TarIntent::Auto.wants_tar(Path::new("notes.gz")));
        assert!(TarIntent::Always.wants_tar(Path::new("notes.gz")));
        assert!(!TarIntent::Never.wants_tar(Path::new("bundle.tar.gz")));
    }
}
