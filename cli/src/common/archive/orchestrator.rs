//! # Archive Orchestrator (`common::archive::orchestrator`)
//!
//! File: cli/src/common/archive/orchestrator.rs
//!
//! ## Overview
//!
//! The orchestrator is the one entry point the commands use. Given input
//! files and a target format, it picks the strategy from
//! `CompressionFormat::strategy`, runs the TAR codec, the ZIP container or a
//! single-stream codec (or TAR followed by one), writes the result and
//! reports progress along the way. Decompression is the mirror image, with
//! the format detected from the archive's extension.
//!
//! ## Architecture
//!
//! - **Blocking core**: `compress_files` / `decompress_file` do all the work on
//!   the calling thread and report progress through a `&mut dyn FnMut(f64)`.
//!   `compress_inputs` is the same as `compress_files` for callers that have
//!   already expanded their paths with `inputs::collect_inputs`.
//! - **Async wrappers**: `compress` / `decompress` move the blocking core onto
//!   tokio's blocking pool and forward progress values through an unbounded
//!   channel, so a UI task can render them while the work runs.
//!
//! ## Error Surface
//!
//! Validation failures (`InvalidInput`, `UnsupportedFormat`) are raised before
//! any progress is emitted. Once work starts, codec errors (`MalformedArchive`,
//! `ChecksumMismatch`, `ArchiveTooLarge`, ...) pass through unchanged; any
//! other failure (I/O, codec crate errors) is wrapped into
//! `CompressionFailed` or `DecompressionFailed`.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::archive::orchestrator::Orchestrator;
//! use crate::common::archive::format::{CompressionFormat, TarIntent};
//!
//! let orchestrator = Orchestrator::default();
//! orchestrator.compress_files(&files, Path::new("out.tar.gz"), CompressionFormat::Gzip, &mut |p| {
//!     println!("{:.0}%", p * 100.0);
//! })?;
//! ```
//!
use crate::common::archive::compression::CodecSettings;
use crate::common::archive::format::{CompressionFormat, MultiFile, Strategy, TarIntent};
use crate::common::archive::inputs::{self, InputFile};
use crate::common::archive::progress::{ProgressReporter, TAR_STAGE_SHARE};
use crate::common::archive::tar::{self, ArchiveEntry};
use crate::common::archive::zip;
use crate::common::fs::io;
use crate::core::error::{surface, PressError, Result};
use anyhow::anyhow;
use std::path::{Component, Path, PathBuf};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

/// File name used when a single-stream archive's name yields nothing usable.
const FALLBACK_OUTPUT_NAME: &str = "output";

/// Drives compression and decompression for every supported format.
#[derive(Debug, Clone, Copy, Default)]
pub struct Orchestrator {
    settings: CodecSettings,
}

impl Orchestrator {
    pub fn new(settings: CodecSettings) -> Self {
        Self { settings }
    }

    /// Compresses `files` into `output` using `format`.
    ///
    /// Returns the path of the archive written.
    pub fn compress_files(
        &self,
        files: &[PathBuf],
        output: &Path,
        format: CompressionFormat,
        on_progress: &mut dyn FnMut(f64),
    ) -> Result<PathBuf> {
        if files.is_empty() {
            anyhow::bail!(PressError::InvalidInput("No files to compress".to_string()));
        }
        supported(format, "compress to")?;
        let inputs = inputs::collect_inputs(files)
            .map_err(|e| surface(e, PressError::CompressionFailed))?;
        self.compress_inputs(&inputs, output, format, on_progress)
    }

    /// Compresses inputs already expanded by `inputs::collect_inputs`.
    pub fn compress_inputs(
        &self,
        inputs: &[InputFile],
        output: &Path,
        format: CompressionFormat,
        on_progress: &mut dyn FnMut(f64),
    ) -> Result<PathBuf> {
        if inputs.is_empty() {
            anyhow::bail!(PressError::InvalidInput("No files to compress".to_string()));
        }
        let strategy = supported(format, "compress to")?;

        let mut progress = ProgressReporter::new(on_progress);
        progress.start();
        info!(
            "Compressing {} file(s) into {:?} as {}",
            inputs.len(),
            output,
            format
        );
        self.run_compression(inputs, output, strategy, &mut progress)
            .map_err(|e| surface(e, PressError::CompressionFailed))?;
        progress.finish();
        info!("Created {:?}", output);
        Ok(output.to_path_buf())
    }

    fn run_compression(
        &self,
        inputs: &[InputFile],
        output: &Path,
        strategy: Strategy,
        progress: &mut ProgressReporter<'_>,
    ) -> Result<()> {
        match strategy {
            Strategy::Tar => {
                let entries = inputs::load_entries(inputs, |done, total| {
                    progress.units(done, total)
                })?;
                let stream = tar::encode(&entries)?;
                io::write_bytes_to_file(output, &stream)
            }
            Strategy::Zip => zip::create_archive(output, inputs, &mut |done, total| {
                progress.units(done, total)
            }),
            Strategy::Stream { codec, multi_file } => {
                let compressor = codec.compressor(&self.settings);
                let payload = if strategy.bundles_as_tar(inputs.len()) {
                    let entries = inputs::load_entries(inputs, |_, _| {})?;
                    let stream = tar::encode(&entries)?;
                    debug!(
                        "Bundled {} file(s) into a {}-byte TAR stream",
                        entries.len(),
                        stream.len()
                    );
                    progress.stage(TAR_STAGE_SHARE);
                    stream
                } else {
                    warn_if_ignoring(inputs, multi_file);
                    io::read_file_bytes(&inputs[0].source)?
                };
                let compressed = compressor.compress(&payload)?;
                drop(payload);
                debug!(
                    "{} produced {} bytes",
                    compressor.name(),
                    compressed.len()
                );
                io::write_bytes_to_file(output, &compressed)
            }
            Strategy::Unsupported { reason } => {
                anyhow::bail!(PressError::UnsupportedFormat(reason.to_string()))
            }
        }
    }

    /// Decompresses `archive` into `output_dir`, detecting the format from the
    /// archive's extension.
    ///
    /// Returns the paths of the files written.
    pub fn decompress_file(
        &self,
        archive: &Path,
        output_dir: &Path,
        intent: TarIntent,
        on_progress: &mut dyn FnMut(f64),
    ) -> Result<Vec<PathBuf>> {
        let format = CompressionFormat::detect(archive);
        let strategy = supported(format, "decompress")?;

        let mut progress = ProgressReporter::new(on_progress);
        progress.start();
        info!("Decompressing {:?} ({}) into {:?}", archive, format, output_dir);
        let extracted = self
            .run_decompression(archive, output_dir, strategy, intent, &mut progress)
            .map_err(|e| surface(e, PressError::DecompressionFailed))?;
        progress.finish();
        info!("Extracted {} file(s) into {:?}", extracted.len(), output_dir);
        Ok(extracted)
    }

    fn run_decompression(
        &self,
        archive: &Path,
        output_dir: &Path,
        strategy: Strategy,
        intent: TarIntent,
        progress: &mut ProgressReporter<'_>,
    ) -> Result<Vec<PathBuf>> {
        io::ensure_dir_exists(output_dir)?;
        match strategy {
            Strategy::Tar => {
                let stream = io::read_file_bytes(archive)?;
                let entries = tar::decode(&stream)?;
                extract_entries(entries, output_dir, progress)
            }
            Strategy::Zip => zip::extract_archive(archive, output_dir, &mut |done, total| {
                progress.units(done, total)
            }),
            Strategy::Stream { codec, multi_file } => {
                let compressed = io::read_file_bytes(archive)?;
                let compressor = codec.compressor(&self.settings);
                let payload = compressor.decompress(&compressed)?;
                drop(compressed);
                debug!("{} restored {} bytes", compressor.name(), payload.len());

                if multi_file == MultiFile::BundleAsTar && intent.wants_tar(archive) {
                    let entries = tar::decode(&payload)?;
                    drop(payload);
                    extract_entries(entries, output_dir, progress)
                } else {
                    let target = output_dir.join(stream_output_name(archive));
                    io::write_bytes_to_file(&target, &payload)?;
                    progress.units(1, 1);
                    Ok(vec![target])
                }
            }
            Strategy::Unsupported { reason } => {
                anyhow::bail!(PressError::UnsupportedFormat(reason.to_string()))
            }
        }
    }

    /// Async form of `compress_inputs`. The work runs on the blocking pool and
    /// each progress value is sent on `progress`; a closed receiver is ignored.
    pub async fn compress(
        &self,
        inputs: Vec<InputFile>,
        output: PathBuf,
        format: CompressionFormat,
        progress: UnboundedSender<f64>,
    ) -> Result<PathBuf> {
        let orchestrator = *self;
        tokio::task::spawn_blocking(move || {
            orchestrator.compress_inputs(&inputs, &output, format, &mut |value| {
                let _ = progress.send(value);
            })
        })
        .await
        .map_err(|e| {
            anyhow!(PressError::CompressionFailed(format!(
                "Compression worker stopped: {}",
                e
            )))
        })?
    }

    /// Async form of `decompress_file`.
    pub async fn decompress(
        &self,
        archive: PathBuf,
        output_dir: PathBuf,
        intent: TarIntent,
        progress: UnboundedSender<f64>,
    ) -> Result<Vec<PathBuf>> {
        let orchestrator = *self;
        tokio::task::spawn_blocking(move || {
            orchestrator.decompress_file(&archive, &output_dir, intent, &mut |value| {
                let _ = progress.send(value);
            })
        })
        .await
        .map_err(|e| {
            anyhow!(PressError::DecompressionFailed(format!(
                "Decompression worker stopped: {}",
                e
            )))
        })?
    }
}

/// Returns the strategy for `format`, or `UnsupportedFormat` for formats with
/// no implementation.
fn supported(format: CompressionFormat, action: &str) -> Result<Strategy> {
    match format.strategy() {
        Strategy::Unsupported { reason } => Err(anyhow!(PressError::UnsupportedFormat(format!(
            "Cannot {} {}: {}",
            action, format, reason
        )))),
        strategy => Ok(strategy),
    }
}

fn warn_if_ignoring(inputs: &[InputFile], multi_file: MultiFile) {
    if multi_file == MultiFile::FirstOnly && inputs.len() > 1 {
        warn!(
            "This format holds a single file; compressing '{}' and ignoring {} other(s)",
            inputs[0].name,
            inputs.len() - 1
        );
    }
}

/// Writes decoded TAR entries below `output_dir`.
fn extract_entries(
    entries: Vec<ArchiveEntry>,
    output_dir: &Path,
    progress: &mut ProgressReporter<'_>,
) -> Result<Vec<PathBuf>> {
    let total = entries.len();
    let mut extracted = Vec::new();
    for (index, entry) in entries.into_iter().enumerate() {
        let relative = safe_relative_path(entry.path())?;
        if entry.is_dir() {
            // `./` names the output directory itself.
            if !relative.as_os_str().is_empty() {
                io::ensure_dir_exists(&output_dir.join(relative))?;
            }
        } else if relative.as_os_str().is_empty() {
            anyhow::bail!(PressError::DecompressionFailed(format!(
                "Entry '{}' has no usable path",
                entry.path()
            )));
        } else {
            let target = output_dir.join(relative);
            io::write_bytes_to_file(&target, entry.content())?;
            extracted.push(target);
        }
        progress.units(index + 1, total);
    }
    Ok(extracted)
}

/// Converts an entry path into a relative path that stays inside the output
/// directory. Absolute paths and `..` components are refused; `.` yields an
/// empty path.
fn safe_relative_path(entry_path: &str) -> Result<PathBuf> {
    let mut clean = PathBuf::new();
    for component in Path::new(entry_path).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            _ => anyhow::bail!(PressError::DecompressionFailed(format!(
                "Entry '{}' escapes the output directory",
                entry_path
            ))),
        }
    }
    Ok(clean)
}

/// `notes.txt.gz` -> `notes.txt`.
fn stream_output_name(archive: &Path) -> PathBuf {
    archive
        .file_stem()
        .filter(|stem| !stem.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(FALLBACK_OUTPUT_NAME))
}
