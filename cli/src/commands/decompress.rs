//! # Pressure Decompress Command
//!
//! File: cli/src/commands/decompress.rs
//!
//! ## Overview
//!
//! This module implements `pressure decompress`, which unpacks an archive into
//! a directory. The format comes from the archive's extension; content is
//! never sniffed.
//!
//! For `.gz` and `.bz2` files, `--tar` decides whether the decompressed
//! payload is unpacked as a TAR stream (`auto` looks for `.tar` before the
//! last extension, as in `logs.tar.gz`).
//!
//! ## Examples
//!
//! ```bash
//! # Unpack into the configured output directory (current dir by default)
//! pressure decompress backup.tar.gz
//!
//! # Unpack into a chosen directory
//! pressure decompress -o ./restored photos.zip
//!
//! # Keep the inner tarball instead of unpacking it
//! pressure decompress --tar never backup.tar.gz
//! ```
//!
use crate::common::archive::format::TarIntent;
use crate::common::archive::orchestrator::Orchestrator;
use crate::common::ui::progress;
use crate::core::config;
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};

/// # Decompress Arguments (`DecompressArgs`)
#[derive(Parser, Debug)]
pub struct DecompressArgs {
    /// The archive to unpack.
    archive: PathBuf,

    /// Optional: Directory to extract into. Defaults to `decompress.output_dir`
    /// from the configuration (the current directory unless configured).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Optional: Whether gzip/bzip2 payloads are unpacked as TAR.
    #[arg(long = "tar", value_enum)]
    tar: Option<TarIntent>,

    /// Do not draw a progress bar.
    #[arg(long)]
    no_progress: bool,
}

/// # Handle Decompress Command (`handle_decompress`)
///
/// Resolves the output directory and TAR intent from arguments and
/// configuration, then runs the orchestrator with a progress bar attached.
pub async fn handle_decompress(args: DecompressArgs) -> Result<()> {
    info!("Handling decompress command...");
    debug!("Decompress args: {:?}", args);

    let cfg = config::load_config().context("Failed to load Pressure configuration")?;
    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&cfg.decompress.output_dir));
    let intent = args.tar.unwrap_or(cfg.decompress.unpack_tar);

    let bar = progress::new_bar("Extracting", cfg.ui.progress && !args.no_progress);
    let (tx, renderer) = progress::spawn_renderer(bar);
    let result = Orchestrator::new(cfg.codec_settings())
        .decompress(args.archive, output_dir.clone(), intent, tx)
        .await;
    renderer.await.context("Progress bar task failed")?;

    let extracted = result?;
    for path in &extracted {
        debug!("Wrote {}", path.display());
    }
    println!(
        "Extracted {} file(s) to {}",
        extracted.len(),
        output_dir.display()
    );
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = DecompressArgs::try_parse_from([
            "decompress",
            "--tar",
            "never",
            "-o",
            "out",
            "--no-progress",
            "logs.tar.gz",
        ])
        .unwrap();
        assert_eq!(args.archive, PathBuf::from("logs.tar.gz"));
        assert_eq!(args.output, Some(PathBuf::from("out")));
        assert_eq!(args.tar, Some(TarIntent::Never));
        assert!(args.no_progress);
    }

    #[test]
    fn test_args_defaults() {
        let args = DecompressArgs::try_parse_from(["decompress", "a.zip"]).unwrap();
        assert_eq!(args.output, None);
        assert_eq!(args.tar, None);
        assert!(DecompressArgs::try_parse_from(["decompress", "--tar", "maybe", "a.gz"]).is_err());
    }
}
