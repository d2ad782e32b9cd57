//! # Compression Inputs (`common::archive::inputs`)
//!
//! File: cli/src/common/archive/inputs.rs
//!
//! Turns the paths a user hands to `compress` into a flat list of files, each
//! with the name it will carry inside an archive. A plain file is stored under
//! its file name; a directory is walked recursively (sorted, symlinks not
//! followed) and every regular file beneath it is stored as
//! `<dirname>/<relative/path>`.
//!
use crate::common::archive::tar::ArchiveEntry;
use crate::common::fs::io;
use crate::core::error::{PressError, Result};
use anyhow::{anyhow, Context};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// A file to be archived and its `/`-separated name inside the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub source: PathBuf,
    pub name: String,
}

/// Expands `paths` into the files to archive, in input order.
pub fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<InputFile>> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.is_dir() {
            let root = base_name(path)?;
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry.with_context(|| format!("Failed to walk directory {:?}", path))?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let relative = entry
                    .path()
                    .strip_prefix(path)
                    .with_context(|| format!("{:?} is not inside {:?}", entry.path(), path))?;
                let name = archive_name(&Path::new(&root).join(relative));
                inputs.push(InputFile {
                    source: entry.into_path(),
                    name,
                });
            }
        } else {
            inputs.push(InputFile {
                source: path.clone(),
                name: base_name(path)?,
            });
        }
    }
    if inputs.is_empty() {
        anyhow::bail!(PressError::InvalidInput(
            "The given directories contain no files".to_string()
        ));
    }
    debug!("Collected {} input file(s)", inputs.len());
    Ok(inputs)
}

/// Reads every input into a TAR entry, calling `on_loaded(done, total)` after each.
pub fn load_entries(
    inputs: &[InputFile],
    mut on_loaded: impl FnMut(usize, usize),
) -> Result<Vec<ArchiveEntry>> {
    let total = inputs.len();
    let mut entries = Vec::with_capacity(total);
    for (index, input) in inputs.iter().enumerate() {
        entries.push(load_entry(input)?);
        on_loaded(index + 1, total);
    }
    Ok(entries)
}

fn load_entry(input: &InputFile) -> Result<ArchiveEntry> {
    let content = io::read_file_bytes(&input.source)?;
    let modified_at = io::modified_secs(&input.source)?;
    Ok(ArchiveEntry::file(input.name.clone(), modified_at, content))
}

/// Last component of `path`; `.` and friends resolve through the real path.
pub fn base_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .or_else(|| {
            path.canonicalize()
                .ok()
                .and_then(|real| real.file_name().map(|name| name.to_string_lossy().into_owned()))
        })
        .ok_or_else(|| anyhow!(PressError::InvalidInput(format!("{:?} has no file name", path))))
}

fn archive_name(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
