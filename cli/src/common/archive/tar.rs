//! # Pressure TAR Codec (`common::archive::tar`)
//!
//! File: cli/src/common/archive/tar.rs
//!
//! ## Overview
//!
//! This module builds TAR archives byte-for-byte and parses TAR byte streams
//! back into entries. It is the one archive format Pressure implements itself;
//! every other format is delegated to a codec crate. The codec is pure: it
//! works on byte buffers only, never touches the filesystem, and keeps no state
//! between calls, so it can be used from any number of threads at once.
//!
//! ## Architecture
//!
//! - **`ArchiveEntry`**: One archive member (path, mtime, kind, content). The
//!   size is always the content length.
//! - **`TarHeader`**: The fixed 512-byte ustar header record. All byte offsets
//!   live in the `field` constants and are only touched by
//!   `TarHeader::to_bytes` and `TarHeader::parse`.
//! - **`encode`**: header, content, zero padding to the next 512-byte boundary
//!   for every entry, then two all-zero blocks.
//! - **`decode`**: the reverse, validating stream length and every header
//!   checksum along the way.
//!
//! Long names (GNU/PAX extensions), links, sparse files and ownership are not
//! supported. Paths longer than the 100-byte name field are rejected rather
//! than truncated.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::archive::tar::{self, ArchiveEntry};
//!
//! let entries = vec![
//!     ArchiveEntry::file("a.txt", 1_700_000_000, b"hello".to_vec()),
//!     ArchiveEntry::file("b.txt", 1_700_000_000, b"world".to_vec()),
//! ];
//! let stream = tar::encode(&entries)?;
//! assert_eq!(stream.len() % tar::BLOCK_SIZE, 0);
//!
//! let decoded = tar::decode(&stream)?;
//! assert_eq!(decoded, entries);
//! ```
//!
use crate::core::error::{CodecResult, PressError};
use tracing::{debug, trace};

/// Size of a TAR header record and the unit all content is padded to.
pub const BLOCK_SIZE: usize = 512;

/// Two zero blocks mark the end of an archive.
pub const END_OF_ARCHIVE_LEN: usize = 2 * BLOCK_SIZE;

/// Capacity of the header name field in bytes.
pub const NAME_FIELD_LEN: usize = 100;

/// Largest value an 11-digit octal field can hold (8 GiB - 1 for sizes).
pub const MAX_OCTAL_11: u64 = 0o777_7777_7777;

const USTAR_MAGIC: &[u8; 6] = b"ustar\0";
const USTAR_VERSION: &[u8; 2] = b"00";

/// Byte ranges of the ustar header fields.
mod field {
    use std::ops::Range;

    pub(super) const NAME: Range<usize> = 0..100;
    pub(super) const MODE: Range<usize> = 100..108;
    pub(super) const UID: Range<usize> = 108..116;
    pub(super) const GID: Range<usize> = 116..124;
    pub(super) const SIZE: Range<usize> = 124..136;
    pub(super) const MTIME: Range<usize> = 136..148;
    pub(super) const CHECKSUM: Range<usize> = 148..156;
    pub(super) const TYPE_FLAG: usize = 156;
    pub(super) const LINK_NAME: Range<usize> = 157..257;
    pub(super) const MAGIC: Range<usize> = 257..263;
    pub(super) const VERSION: Range<usize> = 263..265;
    pub(super) const PREFIX: Range<usize> = 345..500;
}

/// What kind of filesystem object an entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    fn type_flag(self) -> u8 {
        match self {
            EntryKind::File => b'0',
            EntryKind::Directory => b'5',
        }
    }

    fn default_mode(self) -> u32 {
        match self {
            EntryKind::File => 0o644,
            EntryKind::Directory => 0o755,
        }
    }
}

/// # Archive Entry (`ArchiveEntry`)
///
/// A single archive member held fully in memory. Entries are immutable once
/// built; the codec only ever borrows them. Directory entries never carry
/// content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    path: String,
    modified_at: u64,
    kind: EntryKind,
    content: Vec<u8>,
}

impl ArchiveEntry {
    /// Creates a regular file entry. `path` is relative and `/`-separated.
    pub fn file(path: impl Into<String>, modified_at: u64, content: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            modified_at,
            kind: EntryKind::File,
            content,
        }
    }

    /// Creates a directory entry (no content).
    pub fn directory(path: impl Into<String>, modified_at: u64) -> Self {
        Self {
            path: path.into(),
            modified_at,
            kind: EntryKind::Directory,
            content: Vec::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Content length in bytes.
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    /// Modification time in whole seconds since the Unix epoch.
    pub fn modified_at(&self) -> u64 {
        self.modified_at
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

/// # TAR Header Record (`TarHeader`)
///
/// The decoded form of one 512-byte ustar header. Only the fields Pressure
/// reads or writes are represented; user/group names and device numbers are
/// left zeroed on write and ignored on read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TarHeader {
    pub name: String,
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    pub size: u64,
    pub mtime: u64,
    pub type_flag: u8,
    pub link_name: String,
}

impl TarHeader {
    /// Builds the header describing `entry`. Ownership is always 0/0.
    pub fn for_entry(entry: &ArchiveEntry) -> Self {
        let name = match entry.kind {
            EntryKind::Directory if !entry.path.ends_with('/') => format!("{}/", entry.path),
            _ => entry.path.clone(),
        };
        Self {
            name,
            mode: entry.kind.default_mode(),
            uid: 0,
            gid: 0,
            size: entry.size(),
            mtime: entry.modified_at,
            type_flag: entry.kind.type_flag(),
            link_name: String::new(),
        }
    }

    /// Serializes the header into its 512-byte on-disk form, checksum included.
    ///
    /// ## Errors
    ///
    /// - `ArchiveTooLarge` if the name or link name does not fit its field, or
    ///   if size/mtime need more than 11 octal digits.
    /// - `InvalidInput` if the name is empty.
    pub fn to_bytes(&self) -> CodecResult<[u8; BLOCK_SIZE]> {
        let mut block = [0u8; BLOCK_SIZE];

        if self.name.is_empty() {
            return Err(PressError::InvalidInput(
                "TAR entry path cannot be empty".to_string(),
            ));
        }
        write_text(&mut block[field::NAME], &self.name, "entry path")?;
        write_octal(&mut block[field::MODE], u64::from(self.mode), "mode")?;
        write_octal(&mut block[field::UID], u64::from(self.uid), "uid")?;
        write_octal(&mut block[field::GID], u64::from(self.gid), "gid")?;
        write_octal(&mut block[field::SIZE], self.size, "size")?;
        write_octal(&mut block[field::MTIME], self.mtime, "modification time")?;
        block[field::TYPE_FLAG] = self.type_flag;
        write_text(&mut block[field::LINK_NAME], &self.link_name, "link name")?;
        block[field::MAGIC].copy_from_slice(USTAR_MAGIC);
        block[field::VERSION].copy_from_slice(USTAR_VERSION);

        // Six octal digits, NUL, space.
        let checksum = format!("{:06o}\0 ", header_checksum(&block));
        block[field::CHECKSUM].copy_from_slice(checksum.as_bytes());
        Ok(block)
    }

    /// Parses and validates one header block. `index` is the header's position
    /// in the stream and only feeds error messages.
    ///
    /// ## Errors
    ///
    /// - `ChecksumMismatch` if the recorded checksum disagrees with the block.
    /// - `MalformedArchive` for unreadable checksum, size or mtime fields, or a
    ///   name that is not UTF-8.
    pub fn parse(block: &[u8], index: usize) -> CodecResult<Self> {
        if block.len() != BLOCK_SIZE {
            return Err(PressError::MalformedArchive(format!(
                "entry {index}: header is {} bytes, expected {BLOCK_SIZE}",
                block.len()
            )));
        }

        let recorded = parse_octal(&block[field::CHECKSUM])
            .and_then(|value| u32::try_from(value).ok())
            .ok_or_else(|| {
                PressError::MalformedArchive(format!("entry {index}: unreadable checksum field"))
            })?;
        let computed = header_checksum(block);
        if recorded != computed {
            return Err(PressError::ChecksumMismatch {
                index,
                recorded,
                computed,
            });
        }

        let mut name = read_text(&block[field::NAME], index, "name")?;
        if &block[field::MAGIC][..5] == b"ustar" {
            let prefix = read_text(&block[field::PREFIX], index, "prefix")?;
            if !prefix.is_empty() {
                name = format!("{}/{}", prefix.trim_end_matches('/'), name);
            }
        }

        let size = parse_octal(&block[field::SIZE]).ok_or_else(|| {
            PressError::MalformedArchive(format!("entry {index} ('{name}'): invalid size field"))
        })?;
        let mtime = parse_octal(&block[field::MTIME]).ok_or_else(|| {
            PressError::MalformedArchive(format!(
                "entry {index} ('{name}'): invalid modification time field"
            ))
        })?;

        Ok(Self {
            mode: parse_octal_u32(&block[field::MODE]),
            uid: parse_octal_u32(&block[field::UID]),
            gid: parse_octal_u32(&block[field::GID]),
            size,
            mtime,
            type_flag: block[field::TYPE_FLAG],
            link_name: read_text(&block[field::LINK_NAME], index, "link name")?,
            name,
        })
    }
}

/// # Encode TAR Stream (`encode`)
///
/// Serializes `entries`, in order, into a complete TAR byte stream: one header
/// per entry, the entry's content, zero padding to the next 512-byte boundary,
/// and finally two all-zero blocks. An empty slice yields exactly 1024 zero
/// bytes.
///
/// ## Errors
///
/// Returns `ArchiveTooLarge` if any entry's path exceeds the 100-byte name
/// field or its size/mtime exceeds 11 octal digits. Nothing is returned for a
/// partially encoded stream.
pub fn encode(entries: &[ArchiveEntry]) -> CodecResult<Vec<u8>> {
    let capacity = entries
        .iter()
        .map(|entry| BLOCK_SIZE + padded_len(entry.content.len()))
        .sum::<usize>()
        + END_OF_ARCHIVE_LEN;
    let mut stream = Vec::with_capacity(capacity);

    for entry in entries {
        let header = TarHeader::for_entry(entry);
        stream.extend_from_slice(&header.to_bytes()?);
        stream.extend_from_slice(&entry.content);
        stream.resize(stream.len() + padding_for(entry.content.len()), 0);
        trace!(
            "Encoded TAR entry '{}' ({} bytes)",
            entry.path,
            entry.content.len()
        );
    }

    stream.resize(stream.len() + END_OF_ARCHIVE_LEN, 0);
    debug!(
        "Encoded {} TAR entries into {} bytes",
        entries.len(),
        stream.len()
    );
    Ok(stream)
}

/// # Decode TAR Stream (`decode`)
///
/// Parses a TAR byte stream into its entries, in stream order. Decoding stops
/// at the first all-zero header block; a missing second terminator block or
/// extra trailing zero blocks are tolerated. Directory headers come back as
/// `EntryKind::Directory` entries so the caller can create them. Links, device
/// nodes and extension headers are skipped together with their data.
///
/// ## Errors
///
/// - `MalformedArchive` if the stream length is not a multiple of 512 or is
///   shorter than 1024 bytes, if a header field is unreadable, or if an
///   entry's content runs past the end of the stream.
/// - `ChecksumMismatch` naming the zero-based index of a corrupted header.
pub fn decode(stream: &[u8]) -> CodecResult<Vec<ArchiveEntry>> {
    if stream.len() % BLOCK_SIZE != 0 {
        return Err(PressError::MalformedArchive(format!(
            "stream length {} is not a multiple of {BLOCK_SIZE}",
            stream.len()
        )));
    }
    if stream.len() < END_OF_ARCHIVE_LEN {
        return Err(PressError::MalformedArchive(format!(
            "stream length {} is shorter than the {END_OF_ARCHIVE_LEN}-byte end-of-archive marker",
            stream.len()
        )));
    }

    let mut entries = Vec::new();
    let mut offset = 0;
    let mut index = 0;

    while offset + BLOCK_SIZE <= stream.len() {
        let block = &stream[offset..offset + BLOCK_SIZE];
        if block.iter().all(|&byte| byte == 0) {
            trace!("End-of-archive block at offset {}", offset);
            break;
        }

        let header = TarHeader::parse(block, index)?;
        offset += BLOCK_SIZE;

        let remaining = stream.len() - offset;
        let size = usize::try_from(header.size)
            .ok()
            .filter(|size| *size <= remaining)
            .ok_or_else(|| {
                PressError::MalformedArchive(format!(
                    "entry {index} ('{}') declares {} bytes but only {remaining} remain",
                    header.name, header.size
                ))
            })?;
        let content = &stream[offset..offset + size];

        match header.type_flag {
            // Pre-POSIX archives mark directories with a trailing slash only.
            b'0' | b'\0' | b'7' if header.name.ends_with('/') => {
                entries.push(ArchiveEntry::directory(
                    header.name.trim_end_matches('/'),
                    header.mtime,
                ));
            }
            b'0' | b'\0' | b'7' => {
                entries.push(ArchiveEntry::file(
                    header.name,
                    header.mtime,
                    content.to_vec(),
                ));
            }
            b'5' => {
                entries.push(ArchiveEntry::directory(
                    header.name.trim_end_matches('/'),
                    header.mtime,
                ));
            }
            other => {
                debug!(
                    "Skipping TAR entry {} ('{}') with unsupported type flag {:?}",
                    index, header.name, other as char
                );
            }
        }

        offset += size + padding_for(size);
        index += 1;
    }

    debug!("Decoded {} TAR entries from {} bytes", entries.len(), stream.len());
    Ok(entries)
}

/// Zero bytes needed after `len` content bytes to reach a block boundary.
fn padding_for(len: usize) -> usize {
    (BLOCK_SIZE - len % BLOCK_SIZE) % BLOCK_SIZE
}

fn padded_len(len: usize) -> usize {
    len + padding_for(len)
}

/// Sum of all header bytes with the checksum field counted as eight spaces.
fn header_checksum(block: &[u8]) -> u32 {
    block
        .iter()
        .enumerate()
        .map(|(i, &byte)| {
            if field::CHECKSUM.contains(&i) {
                u32::from(b' ')
            } else {
                u32::from(byte)
            }
        })
        .sum()
}

/// Writes `value` as zero-padded octal filling all but the last byte of
/// `dest`, which stays NUL.
fn write_octal(dest: &mut [u8], value: u64, what: &str) -> CodecResult<()> {
    let digits = dest.len() - 1;
    let text = format!("{:0width$o}", value, width = digits);
    if text.len() > digits {
        return Err(PressError::ArchiveTooLarge(format!(
            "{what} {value} does not fit in {digits} octal digits"
        )));
    }
    dest[..digits].copy_from_slice(text.as_bytes());
    Ok(())
}

fn write_text(dest: &mut [u8], text: &str, what: &str) -> CodecResult<()> {
    let bytes = text.as_bytes();
    if bytes.len() > dest.len() {
        return Err(PressError::ArchiveTooLarge(format!(
            "{what} '{text}' is {} bytes; the TAR header field holds at most {}",
            bytes.len(),
            dest.len()
        )));
    }
    dest[..bytes.len()].copy_from_slice(bytes);
    Ok(())
}

/// Reads a NUL-terminated (or field-filling) text field.
fn read_text(field: &[u8], index: usize, what: &str) -> CodecResult<String> {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8(field[..end].to_vec()).map_err(|_| {
        PressError::MalformedArchive(format!("entry {index}: {what} is not valid UTF-8"))
    })
}

/// Parses an octal numeric field. Leading spaces are skipped and the number
/// ends at the first NUL or space. An empty field reads as zero.
fn parse_octal(field: &[u8]) -> Option<u64> {
    field
        .iter()
        .skip_while(|&&b| b == b' ')
        .take_while(|&&b| b != 0 && b != b' ')
        .try_fold(0u64, |acc, &b| {
            if !(b'0'..=b'7').contains(&b) {
                return None;
            }
            acc.checked_mul(8)?.checked_add(u64::from(b - b'0'))
        })
}

fn parse_octal_u32(field: &[u8]) -> u32 {
    parse_octal(field)
        .and_then(|value| u32::try_from(value).ok())
        .unwrap_or(0)
}
