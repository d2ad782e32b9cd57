//! # Pressure Archive Engine (`common::archive`)
//!
//! File: cli/src/common/archive/mod.rs
//!
//! ## Overview
//!
//! This module holds everything that turns files into archives and back. The
//! commands only ever talk to the `orchestrator`; the rest are the pieces it
//! composes.
//!
//! ## Architecture
//!
//! - **`tar`**: Pressure's own ustar codec (headers, checksums, padding,
//!   end-of-archive marker) over in-memory entries.
//! - **`compression`**: single-stream codecs (gzip, bzip2, Z) behind the
//!   `StreamCompressor` trait.
//! - **`zip`**: the ZIP container, delegated to the `zip` crate.
//! - **`format`**: format detection and the format-to-strategy table.
//! - **`inputs`**: expansion of user paths (files and directories) into
//!   named archive inputs.
//! - **`progress`**: the monotonic progress reporter.
//! - **`orchestrator`**: sequencing, progress and error surfacing for whole
//!   compress/decompress operations.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::archive::orchestrator::Orchestrator;
//! use crate::common::archive::format::{CompressionFormat, TarIntent};
//!
//! let orchestrator = Orchestrator::default();
//! orchestrator.compress_files(&files, Path::new("logs.tar.bz2"), CompressionFormat::Bzip2, &mut |_| {})?;
//! orchestrator.decompress_file(Path::new("logs.tar.bz2"), Path::new("out"), TarIntent::Auto, &mut |_| {})?;
//! ```
//!

pub mod compression;
pub mod format;
pub mod inputs;
pub mod orchestrator;
pub mod progress;
pub mod tar;
pub mod zip;
