//! # Pressure Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the top-level commands of the Pressure CLI so that
//! `main.rs` can route to them.
//!
//! ## Commands
//!
//! - `compress`: Pack files and directories into an archive
//! - `decompress`: Unpack an archive into a directory
//! - `formats`: List the supported formats
//!
//! Each command defines its own arguments structure and an async handler.
//!

/// `pressure compress`.
pub mod compress;
/// `pressure decompress`.
pub mod decompress;
/// `pressure formats`.
pub mod formats;
