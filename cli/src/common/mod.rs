//! # Pressure Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!

//! ## Overview
//!
//! This module is the root of the shared utility modules used by the Pressure
//! commands. It keeps command-specific logic (`commands::`) apart from the
//! archive engine and the helpers it relies on.
//!
//! ## Architecture
//!
//! - **`archive`**: The archive engine: TAR codec, stream codecs, ZIP
//!   container, format table and the orchestrator that composes them.
//! - **`fs`**: Filesystem I/O helpers (`io`).
//! - **`ui`**: Terminal presentation, currently the progress bar.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::{archive, fs, ui};
//!
//! let bar = ui::progress::new_bar("Compressing", true);
//! fs::io::ensure_dir_exists(Path::new("./out"))?;
//! let format = archive::format::CompressionFormat::detect(Path::new("logs.tar.gz"));
//! ```
//!

/// The archive engine (TAR codec, compressors, ZIP, orchestrator).
pub mod archive;
/// Utilities for filesystem operations.
pub mod fs;
/// Utilities for terminal user interface elements (progress bars).
pub mod ui;
