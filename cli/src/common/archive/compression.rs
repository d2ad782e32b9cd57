//! # Pressure Single-Stream Compressors (`common::archive::compression`)
//!
//! File: cli/src/common/archive/compression.rs
//!
//! ## Overview
//!
//! This module wraps the codec crates that turn one byte stream into another:
//! gzip (`flate2`), bzip2 (`bzip2`) and the LZ block codec behind the legacy
//! "Z" format (`lz4_flex`). None of them know anything about files, entries or
//! TAR; multi-file handling is the orchestrator's job.
//!
//! ## Architecture
//!
//! - **`StreamCompressor`**: the seam every codec implements
//!   (`compress(bytes) -> bytes`, `decompress(bytes) -> bytes`).
//! - **`StreamCodec`**: closed enum naming the three codecs, used by the
//!   format strategy table to pick one.
//! - **`CodecSettings`**: compression levels, taken from configuration.
//!
//! The "Z" codec stores the LZ4 block with a 4-byte little-endian length
//! prefix so decompression knows the output size up front.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::archive::compression::{CodecSettings, StreamCodec};
//!
//! let gzip = StreamCodec::Gzip.compressor(&CodecSettings::default());
//! let packed = gzip.compress(b"Some data to compress")?;
//! assert_eq!(gzip.decompress(&packed)?, b"Some data to compress");
//! ```
//!
use crate::core::error::Result;
use anyhow::{anyhow, Context};
use std::io::{Read, Write};

/// Default gzip level (flate2's "default" trade-off).
pub const DEFAULT_GZIP_LEVEL: u32 = 6;
/// Default bzip2 block size level.
pub const DEFAULT_BZIP2_LEVEL: u32 = 9;

/// Upper bound on the LZ4 block expansion ratio.
const MAX_LZ_EXPANSION: usize = 255;

/// A codec that transforms one in-memory byte stream into another.
pub trait StreamCompressor: Send + Sync {
    /// Short lowercase codec name used in logs and messages.
    fn name(&self) -> &'static str;

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>>;

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>>;
}

/// Tunable knobs for the codecs that have any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecSettings {
    pub gzip_level: u32,
    pub bzip2_level: u32,
}

impl Default for CodecSettings {
    fn default() -> Self {
        Self {
            gzip_level: DEFAULT_GZIP_LEVEL,
            bzip2_level: DEFAULT_BZIP2_LEVEL,
        }
    }
}

/// The single-stream codecs Pressure can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamCodec {
    Gzip,
    Bzip2,
    Z,
}

impl StreamCodec {
    /// Returns the codec implementation configured with `settings`.
    pub fn compressor(self, settings: &CodecSettings) -> Box<dyn StreamCompressor> {
        match self {
            StreamCodec::Gzip => Box::new(GzipCompressor {
                level: settings.gzip_level,
            }),
            StreamCodec::Bzip2 => Box::new(Bzip2Compressor {
                level: settings.bzip2_level,
            }),
            StreamCodec::Z => Box::new(LzCompressor),
        }
    }
}

/// gzip via `flate2`.
#[derive(Debug)]
pub struct GzipCompressor {
    level: u32,
}

impl StreamCompressor for GzipCompressor {
    fn name(&self) -> &'static str {
        "gzip"
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = flate2::write::GzEncoder::new(
            Vec::with_capacity(input.len() / 2),
            flate2::Compression::new(self.level),
        );
        encoder
            .write_all(input)
            .context("Failed to write data into the gzip encoder")?;
        encoder
            .finish()
            .context("Failed to finish gzip compression stream")
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        flate2::read::GzDecoder::new(input)
            .read_to_end(&mut output)
            .context("Failed to decode gzip stream")?;
        Ok(output)
    }
}

/// bzip2 via the `bzip2` crate.
#[derive(Debug)]
pub struct Bzip2Compressor {
    level: u32,
}

impl StreamCompressor for Bzip2Compressor {
    fn name(&self) -> &'static str {
        "bzip2"
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = bzip2::write::BzEncoder::new(
            Vec::with_capacity(input.len() / 2),
            bzip2::Compression::new(self.level),
        );
        encoder
            .write_all(input)
            .context("Failed to write data into the bzip2 encoder")?;
        encoder
            .finish()
            .context("Failed to finish bzip2 compression stream")
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        bzip2::read::BzDecoder::new(input)
            .read_to_end(&mut output)
            .context("Failed to decode bzip2 stream")?;
        Ok(output)
    }
}

/// LZ4 block codec backing the legacy "Z" format.
#[derive(Debug)]
pub struct LzCompressor;

impl StreamCompressor for LzCompressor {
    fn name(&self) -> &'static str {
        "z"
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        Ok(lz4_flex::block::compress_prepend_size(input))
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let prefix: [u8; 4] = input
            .get(..4)
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or_else(|| anyhow!("Z stream is too short to carry its length prefix"))?;
        let declared = u32::from_le_bytes(prefix) as usize;
        // Declared size must be reachable from this many input bytes.
        if declared > input.len().saturating_mul(MAX_LZ_EXPANSION) {
            anyhow::bail!(
                "Z stream declares {} bytes, which {} input bytes cannot hold",
                declared,
                input.len()
            );
        }
        lz4_flex::block::decompress_size_prepended(input).context("Failed to decode Z stream")
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [StreamCodec; 3] = [StreamCodec::Gzip, StreamCodec::Bzip2, StreamCodec::Z];

    fn sample() -> Vec<u8> {
        b"the quick brown fox jumps over the lazy dog\n".repeat(64)
    }

    #[test]
    fn test_codecs_restore_input() -> Result<()> {
        for codec in ALL {
            let compressor = codec.compressor(&CodecSettings::default());
            let packed = compressor.compress(&sample())?;
            assert!(packed.len() < sample().len(), "{} did not shrink input", compressor.name());
            assert_eq!(compressor.decompress(&packed)?, sample());
        }
        Ok(())
    }

    #[test]
    fn test_codecs_handle_empty_input() -> Result<()> {
        for codec in ALL {
            let compressor = codec.compressor(&CodecSettings::default());
            let packed = compressor.compress(&[])?;
            assert!(compressor.decompress(&packed)?.is_empty());
        }
        Ok(())
    }

    #[test]
    fn test_codecs_reject_garbage() {
        let garbage = b"definitely not compressed data";
        for codec in ALL {
            let compressor = codec.compressor(&CodecSettings::default());
            assert!(
                compressor.decompress(garbage).is_err(),
                "{} accepted garbage",
                compressor.name()
            );
        }
    }

    #[test]
    fn test_z_rejects_implausible_length_prefix() {
        let mut packed = LzCompressor.compress(b"tiny").unwrap();
        packed[..4].copy_from_slice(&u32::MAX.to_le_bytes());
        let err = LzCompressor.decompress(&packed).unwrap_err();
        assert!(err.to_string().contains("cannot hold"));
        assert!(LzCompressor.decompress(&[1, 0]).is_err());
    }

    #[test]
    fn test_gzip_output_is_standard_gzip() -> Result<()> {
        let packed = StreamCodec::Gzip
            .compressor(&CodecSettings { gzip_level: 9, ..Default::default() })
            .compress(b"hello")?;
        assert_eq!(&packed[..2], &[0x1f, 0x8b]);
        Ok(())
    }

    #[test]
    fn test_bzip2_output_has_magic() -> Result<()> {
        let packed = StreamCodec::Bzip2
            .compressor(&CodecSettings { bzip2_level: 1, ..Default::default() })
            .compress(b"hello")?;
        assert_eq!(&packed[..3], b"BZh");
        assert_eq!(packed[3], b'1');
        Ok(())
    }
}
