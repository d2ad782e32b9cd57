//! # ZIP Container Support (`common::archive::zip`)
//!
//! File: cli/src/common/archive/zip.rs
//!
//! ## Overview
//!
//! ZIP handles many entries natively, so Pressure hands the whole job to the
//! `zip` crate rather than layering it on its own TAR codec. Entries are
//! written with Deflate. On extraction every entry name goes through
//! `enclosed_name`, which refuses absolute paths and `..` traversal.
//!
//! Both directions call `on_entry(done, total)` once per entry so the
//! orchestrator can report progress.
//!
use crate::common::archive::inputs::InputFile;
use crate::common::fs::io;
use crate::core::error::{PressError, Result};
use ::zip::write::SimpleFileOptions;
use ::zip::{CompressionMethod, ZipArchive, ZipWriter};
use anyhow::{anyhow, Context};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Most bytes reserved up front for one entry; larger entries grow as they inflate.
const PREALLOC_LIMIT: u64 = 1 << 20;

/// Writes `inputs` into a new ZIP file at `output`, replacing any existing file.
pub fn create_archive(
    output: &Path,
    inputs: &[InputFile],
    on_entry: &mut dyn FnMut(usize, usize),
) -> Result<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        io::ensure_dir_exists(parent)?;
    }
    io::remove_file_best_effort(output);
    let file = File::create(output)
        .with_context(|| format!("Failed to create ZIP file {:?}", output))?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let total = inputs.len();
    for (index, input) in inputs.iter().enumerate() {
        let data = io::read_file_bytes(&input.source)?;
        writer
            .start_file(input.name.as_str(), options)
            .with_context(|| format!("Failed to start ZIP entry '{}'", input.name))?;
        writer
            .write_all(&data)
            .with_context(|| format!("Failed to write ZIP entry '{}'", input.name))?;
        debug!("Added '{}' ({} bytes) to {:?}", input.name, data.len(), output);
        on_entry(index + 1, total);
    }
    writer
        .finish()
        .with_context(|| format!("Failed to finalize ZIP file {:?}", output))?;
    Ok(())
}

/// Extracts every entry of the ZIP file at `archive` below `output_dir`.
/// Returns the paths of the files written (directories are created, not listed).
pub fn extract_archive(
    archive: &Path,
    output_dir: &Path,
    on_entry: &mut dyn FnMut(usize, usize),
) -> Result<Vec<PathBuf>> {
    let file =
        File::open(archive).with_context(|| format!("Failed to open ZIP file {:?}", archive))?;
    let mut zip = ZipArchive::new(file)
        .with_context(|| format!("Failed to read ZIP directory of {:?}", archive))?;

    let total = zip.len();
    let mut extracted = Vec::new();
    for index in 0..total {
        let mut entry = zip
            .by_index(index)
            .with_context(|| format!("Failed to read ZIP entry {}", index))?;
        let relative = entry.enclosed_name().ok_or_else(|| {
            anyhow!(PressError::DecompressionFailed(format!(
                "ZIP entry '{}' escapes the output directory",
                entry.name()
            )))
        })?;
        let target = output_dir.join(relative);

        if entry.is_dir() {
            io::ensure_dir_exists(&target)?;
        } else {
            let mut data = Vec::with_capacity(capacity_hint(entry.size()));
            entry
                .read_to_end(&mut data)
                .with_context(|| format!("Failed to inflate ZIP entry '{}'", entry.name()))?;
            io::write_bytes_to_file(&target, &data)?;
            extracted.push(target);
        }
        on_entry(index + 1, total);
    }
    debug!("Extracted {} file(s) from {:?}", extracted.len(), archive);
    Ok(extracted)
}

/// Buffer reservation for an entry whose header declares `declared` bytes.
/// The header is untrusted, so the hint is capped.
fn capacity_hint(declared: u64) -> usize {
    usize::try_from(declared.min(PREALLOC_LIMIT)).unwrap_or(0)
}
