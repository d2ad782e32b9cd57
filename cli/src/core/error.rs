//! # Pressure Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error taxonomy used throughout Pressure. Every
//! failure that reaches a caller carries one of the `PressError` kinds as its
//! root cause, with a human-readable message.
//!
//! ## Architecture
//!
//! The error system consists of three pieces:
//! - `PressError`: A custom error enum using `thiserror` for the specific error kinds
//! - `Result<T>`: A type alias for `anyhow::Result<T>` used by the application layer
//! - `CodecResult<T>`: A strongly typed result used by the pure TAR codec
//!
//! The kinds split into three groups:
//! - Request errors: `InvalidInput`, `UnsupportedFormat`
//! - Pipeline errors: `CompressionFailed` (write path), `DecompressionFailed` (read path)
//! - TAR structure errors: `MalformedArchive`, `ChecksumMismatch`, `ArchiveTooLarge`
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error kind
//! if files.is_empty() {
//!     anyhow::bail!(PressError::InvalidInput("No files to compress".into()));
//! }
//!
//! // Pattern matching on error kinds
//! match orchestrator.compress_files(&files, &output, format, &mut |_| {}) {
//!     Ok(path) => println!("Created {}", path.display()),
//!     Err(e) if matches!(e.downcast_ref::<PressError>(), Some(PressError::UnsupportedFormat(_))) => {
//!         println!("Pick another format.");
//!     }
//!     Err(e) => return Err(e),
//! }
//! ```
//!
use thiserror::Error;

/// Custom error type for Pressure.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PressError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Compression failed: {0}")]
    CompressionFailed(String),

    #[error("Decompression failed: {0}")]
    DecompressionFailed(String),

    #[error("Malformed archive: {0}")]
    MalformedArchive(String),

    /// `index` is the zero-based position of the offending header in the stream.
    #[error("Checksum mismatch in entry {index}: header records {recorded}, computed {computed}")]
    ChecksumMismatch {
        index: usize,
        recorded: u32,
        computed: u32,
    },

    #[error("Archive too large: {0}")]
    ArchiveTooLarge(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Type alias for Result using anyhow::Error for broad compatibility.
/// The root cause of an error is a `PressError` wherever one applies.
pub type Result<T> = anyhow::Result<T>;

/// Result type for the TAR codec, which never needs anything beyond `PressError`.
pub type CodecResult<T> = std::result::Result<T, PressError>;

/// Returns the `PressError` at the root of an `anyhow` error, if there is one.
pub fn press_error(err: &anyhow::Error) -> Option<&PressError> {
    err.downcast_ref::<PressError>()
}

/// Turns an arbitrary pipeline failure into a typed one.
///
/// Errors that already are a `PressError` pass through untouched (codec errors
/// must reach the caller unchanged); anything else (I/O, zip, bzip2, ...) is
/// flattened into the kind produced by `wrap`, keeping the full context chain
/// in the message.
pub fn surface(err: anyhow::Error, wrap: fn(String) -> PressError) -> anyhow::Error {
    if press_error(&err).is_some() {
        return err;
    }
    anyhow::Error::new(wrap(format!("{err:#}")))
}
