//! # Pressure Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! This module centralizes the filesystem input/output operations Pressure
//! needs around its archive codecs. It provides thin wrappers around
//! `std::fs` that add context to every error, so a failed read or write names
//! the path involved.
//!
//! ## Architecture
//!
//! - **`ensure_dir_exists`**: Creates a directory (and parents) if missing, and
//!   rejects a path that exists but is not a directory.
//! - **`read_file_bytes`** / **`read_file_to_string`**: Whole-file reads.
//! - **`write_bytes_to_file`**: Writes a buffer, creating parent directories
//!   first and overwriting any existing file.
//! - **`remove_file_best_effort`**: Deletes a file, logging rather than
//!   returning failures.
//! - **`modified_secs`**: File modification time as whole Unix seconds.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::fs::io;
//! use std::path::Path;
//!
//! let data = io::read_file_bytes(Path::new("./notes.txt"))?;
//! io::write_bytes_to_file(Path::new("./out/nested/notes.txt"), &data)?;
//! ```
//!
use crate::core::error::{PressError, Result};
use anyhow::Context;
use std::fs;
use std::path::Path;
use std::time::UNIX_EPOCH;
use tracing::{debug, warn};

/// Ensures that a directory exists at the specified path.
///
/// If the path does not exist, this function creates the directory, including
/// any necessary parent directories (similar to `mkdir -p`). If the path
/// already exists but is not a directory, a `PressError::InvalidInput` is
/// returned.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        debug!("Created directory: {:?}", path);
    } else if !path.is_dir() {
        anyhow::bail!(PressError::InvalidInput(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    }
    Ok(())
}

/// Reads the entire content of a file into a byte buffer.
pub fn read_file_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read file {:?}", path))
}

/// Reads the entire content of a file into a string.
pub fn read_file_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file {:?}", path))
}

/// Writes `content` to `path`, overwriting it if it exists.
///
/// The parent directory of `path` is created first when missing.
pub fn write_bytes_to_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir_exists(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write to file {:?}", path))?;
    debug!("Wrote {} bytes to {:?}", content.len(), path);
    Ok(())
}

/// Removes a file if it exists. Failures are logged and otherwise ignored.
pub fn remove_file_best_effort(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!("Removed file {:?}", path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Could not remove {:?}: {}", path, e),
    }
}

/// Modification time of `path` in whole seconds since the Unix epoch.
/// Times before the epoch read as 0.
pub fn modified_secs(path: &Path) -> Result<u64> {
    let modified = fs::metadata(path)
        .and_then(|meta| meta.modified())
        .with_context(|| format!("Failed to read modification time of {:?}", path))?;
    Ok(modified
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0))
}
