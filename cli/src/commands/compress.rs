//! # Pressure Compress Command
//!
//! File: cli/src/commands/compress.rs
//!
//! ## Overview
//!
//! This module implements `pressure compress`, which packs one or more files
//! or directories into a single archive.
//!
//! ## Architecture
//!
//! The command flow follows these steps:
//! 1. Parse command arguments (inputs, output path, format, progress toggle).
//! 2. Load the Pressure configuration for the default format, codec levels and
//!    the progress preference.
//! 3. Determine the output path: either `--output` or a default name in the
//!    current directory (`<name>.<ext>` for one input, `archive.<ext>` for
//!    several, with `tar.gz` / `tar.bz2` when the inputs get bundled).
//! 4. Run the orchestrator on the blocking pool while a progress bar task
//!    drains its progress channel.
//! 5. Print the path of the archive written.
//!
//! ## Examples
//!
//! ```bash
//! # Zip a single file (format from config, zip by default)
//! pressure compress report.pdf
//!
//! # Bundle a directory and two files into a gzipped tarball
//! pressure compress -f gzip -o backup.tar.gz src/ Cargo.toml README.md
//!
//! # Legacy Z format, no progress bar
//! pressure compress -f z --no-progress notes.txt
//! ```
//!
use crate::common::archive::format::CompressionFormat;
use crate::common::archive::inputs;
use crate::common::archive::orchestrator::Orchestrator;
use crate::common::ui::progress;
use crate::core::config;
use crate::core::error::{surface, PressError, Result};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};

/// Base name for archives built from several inputs.
const MULTI_INPUT_BASE_NAME: &str = "archive";

/// # Compress Arguments (`CompressArgs`)
///
/// Defines the command-line arguments accepted by `pressure compress`.
#[derive(Parser, Debug)]
pub struct CompressArgs {
    /// Files or directories to put in the archive. Directories are added recursively.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Optional: Path of the archive to write. Defaults to a name derived from the
    /// inputs and the format, in the current directory.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Optional: Archive format. Defaults to `compress.default_format` from the
    /// configuration (zip unless configured otherwise).
    #[arg(short, long, value_enum)]
    format: Option<CompressionFormat>,

    /// Do not draw a progress bar.
    #[arg(long)]
    no_progress: bool,
}

/// # Handle Compress Command (`handle_compress`)
///
/// Loads configuration, works out the format and output path, and runs the
/// orchestrator with a progress bar attached.
///
/// ## Returns
///
/// * `Result<()>`: `Ok(())` once the archive is written, or the orchestrator's
///   error (its root cause is a `PressError`).
pub async fn handle_compress(args: CompressArgs) -> Result<()> {
    info!("Handling compress command...");
    debug!("Compress args: {:?}", args);

    let cfg = config::load_config().context("Failed to load Pressure configuration")?;
    let format = args.format.unwrap_or(cfg.compress.default_format);

    let files = inputs::collect_inputs(&args.files)
        .map_err(|e| surface(e, PressError::CompressionFailed))?;
    let output = match &args.output {
        Some(path) => path.clone(),
        None => {
            let default = default_output(&args.files, format, files.len());
            info!("No output specified, using default: {}", default.display());
            default
        }
    };

    let bar = progress::new_bar("Compressing", cfg.ui.progress && !args.no_progress);
    let (tx, renderer) = progress::spawn_renderer(bar);
    let result = Orchestrator::new(cfg.codec_settings())
        .compress(files, output, format, tx)
        .await;
    renderer.await.context("Progress bar task failed")?;

    let written = result?;
    println!("Created {}", written.display());
    Ok(())
}

/// Default archive name: `<input name>.<ext>` for a single input path,
/// `archive.<ext>` otherwise. `file_count` is the number of files after
/// directories are expanded.
fn default_output(paths: &[PathBuf], format: CompressionFormat, file_count: usize) -> PathBuf {
    let extension = format.output_extension(file_count);
    let base = match paths {
        [single] => inputs::base_name(single)
            .unwrap_or_else(|_| MULTI_INPUT_BASE_NAME.to_string()),
        _ => MULTI_INPUT_BASE_NAME.to_string(),
    };
    PathBuf::from(format!("{}.{}", base, extension))
}
