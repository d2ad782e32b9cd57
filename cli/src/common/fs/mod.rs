//! # Pressure Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! This module is the entry point for filesystem helpers used around the
//! archive engine. The codecs themselves work on byte buffers; reading inputs,
//! writing outputs and creating directories all go through here.
//!
//! ## Architecture
//!
//! - **`io`**: ensuring directories exist, whole-file reads and writes,
//!   best-effort removal and modification times.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::fs::io;
//! use std::path::Path;
//!
//! io::ensure_dir_exists(Path::new("./unpacked"))?;
//! let bytes = io::read_file_bytes(Path::new("./archive.tar"))?;
//! ```
//!

/// Contains basic file I/O operations (e.g., `ensure_dir_exists`, `read_file_bytes`, `write_bytes_to_file`).
pub mod io;
