//! WAD directory reader.
//!
//! A WAD starts with a 12-byte header: a 4-byte ASCII magic (`IWAD` or
//! `PWAD`), a little-endian `i32` lump count, and a little-endian `i32`
//! offset of the directory table. The directory holds one 16-byte entry per
//! lump: `i32` data offset, `i32` data size, and an 8-byte NUL-padded name.
//!
//! Only the header and directory are read. A header that is short, has an
//! unknown magic, or points its directory outside the file is reported as
//! [`WadKind::Unrecognized`] rather than as an error; only genuine I/O
//! failures are returned as `Err`.

use std::fs::File;
use std::io::{BufReader, ErrorKind, SeekFrom};
use std::path::Path;

use thiserror::Error;
use wadshelf_core::ReadSeek;
use wadshelf_core::util::read_ascii;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Header size: magic (4) + lump count (4) + directory offset (4).
const HEADER_SIZE: u64 = 12;

/// Size of one directory entry: offset (4) + size (4) + name (8).
const DIRECTORY_ENTRY_SIZE: u64 = 16;

const IWAD_MAGIC: &[u8; 4] = b"IWAD";
const PWAD_MAGIC: &[u8; 4] = b"PWAD";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Errors that can occur while reading a WAD.
#[derive(Debug, Error)]
pub enum WadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Lump '{name}' lies outside the file")]
    LumpOutOfRange { name: String },
}

/// Container kind, decided by the magic signature at offset 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WadKind {
    /// Base game data ("internal WAD").
    Iwad,
    /// Add-on data ("patch WAD").
    Pwad,
    /// Unknown magic or a malformed/truncated header.
    Unrecognized,
}

impl WadKind {
    fn from_magic(magic: &[u8; 4]) -> Self {
        if magic == IWAD_MAGIC {
            WadKind::Iwad
        } else if magic == PWAD_MAGIC {
            WadKind::Pwad
        } else {
            WadKind::Unrecognized
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, WadKind::Unrecognized)
    }
}

/// A named data region listed in the directory table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lump {
    pub name: String,
    pub offset: u32,
    pub length: u32,
}

/// The parsed directory of a WAD, in on-disk order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WadDirectory {
    pub kind: WadKind,
    pub lumps: Vec<Lump>,
}

impl WadDirectory {
    fn unrecognized() -> Self {
        Self {
            kind: WadKind::Unrecognized,
            lumps: Vec::new(),
        }
    }

    /// Level marker lumps, sorted by name.
    pub fn map_markers(&self) -> Vec<&Lump> {
        map_marker_lumps(&self.lumps)
    }

    /// Names of the level marker lumps, sorted.
    pub fn map_names(&self) -> Vec<String> {
        self.map_markers()
            .into_iter()
            .map(|l| l.name.clone())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Read a little-endian i32 from a byte slice.
fn read_i32_le(buf: &[u8], offset: usize) -> i32 {
    i32::from_le_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}

/// Read the header and directory table of a WAD.
///
/// The reader is left positioned somewhere inside the directory; callers
/// that reuse it must seek.
pub fn read_directory(reader: &mut dyn ReadSeek) -> Result<WadDirectory, WadError> {
    let file_size = reader.seek(SeekFrom::End(0))?;
    if file_size < HEADER_SIZE {
        return Ok(WadDirectory::unrecognized());
    }

    reader.seek(SeekFrom::Start(0))?;
    let mut header = [0u8; HEADER_SIZE as usize];
    match reader.read_exact(&mut header) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
            return Ok(WadDirectory::unrecognized());
        }
        Err(e) => return Err(e.into()),
    }

    let magic: [u8; 4] = [header[0], header[1], header[2], header[3]];
    let kind = WadKind::from_magic(&magic);
    if !kind.is_recognized() {
        return Ok(WadDirectory::unrecognized());
    }

    let lump_count = read_i32_le(&header, 4);
    let table_offset = read_i32_le(&header, 8);
    if lump_count < 0 || table_offset < 0 {
        log::debug!("WAD header has negative count/offset ({lump_count}, {table_offset})");
        return Ok(WadDirectory::unrecognized());
    }

    let lump_count = lump_count as u64;
    let table_offset = table_offset as u64;
    let table_size = lump_count * DIRECTORY_ENTRY_SIZE;

    if lump_count > 0 && table_offset < HEADER_SIZE {
        return Ok(WadDirectory::unrecognized());
    }
    // Bounding the table by the file size also bounds the allocation below.
    if table_offset + table_size > file_size {
        log::debug!(
            "WAD directory ({} entries at {}) extends past end of file ({} bytes)",
            lump_count,
            table_offset,
            file_size
        );
        return Ok(WadDirectory::unrecognized());
    }

    reader.seek(SeekFrom::Start(table_offset))?;
    let mut table = vec![0u8; table_size as usize];
    match reader.read_exact(&mut table) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
            return Ok(WadDirectory::unrecognized());
        }
        Err(e) => return Err(e.into()),
    }

    let mut lumps = Vec::with_capacity(lump_count as usize);
    for entry in table.chunks_exact(DIRECTORY_ENTRY_SIZE as usize) {
        let offset = read_i32_le(entry, 0);
        let length = read_i32_le(entry, 4);
        if offset < 0 || length < 0 {
            return Ok(WadDirectory::unrecognized());
        }
        lumps.push(Lump {
            name: read_ascii(&entry[8..16]),
            offset: offset as u32,
            length: length as u32,
        });
    }

    Ok(WadDirectory { kind, lumps })
}

/// Load the payload of a single lump.
///
/// This is the only function in the crate that reads lump data.
pub fn read_lump_data(reader: &mut dyn ReadSeek, lump: &Lump) -> Result<Vec<u8>, WadError> {
    let file_size = reader.seek(SeekFrom::End(0))?;
    if lump.offset as u64 + lump.length as u64 > file_size {
        return Err(WadError::LumpOutOfRange {
            name: lump.name.clone(),
        });
    }
    reader.seek(SeekFrom::Start(lump.offset as u64))?;
    let mut data = vec![0u8; lump.length as usize];
    reader.read_exact(&mut data)?;
    Ok(data)
}

// ---------------------------------------------------------------------------
// Level markers
// ---------------------------------------------------------------------------

/// Whether a lump name follows a level-naming convention.
///
/// Accepts `MAPn`/`MAPnn` and `ExMy`/`ExMyy` (one episode digit), ignoring
/// case.
pub fn is_map_marker(name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    let bytes = upper.as_bytes();

    let digits_ok = |d: &[u8]| (1..=2).contains(&d.len()) && d.iter().all(u8::is_ascii_digit);

    if let Some(rest) = upper.strip_prefix("MAP") {
        return digits_ok(rest.as_bytes());
    }

    bytes.len() >= 4
        && bytes[0] == b'E'
        && bytes[1].is_ascii_digit()
        && bytes[2] == b'M'
        && digits_ok(&bytes[3..])
}

/// Filter level marker lumps and sort them by name.
///
/// Only names are inspected; no lump data is touched.
pub fn map_marker_lumps(lumps: &[Lump]) -> Vec<&Lump> {
    let mut markers: Vec<&Lump> = lumps.iter().filter(|l| is_map_marker(&l.name)).collect();
    markers.sort_by(|a, b| a.name.cmp(&b.name));
    markers
}

/// Open a WAD file and return its sorted level marker names.
///
/// Unrecognized files yield an empty list. The file handle is dropped on
/// every path, including errors.
pub fn read_map_names(path: &Path) -> Result<Vec<String>, WadError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let directory = read_directory(&mut reader)?;
    Ok(directory.map_names())
}

/// Level markers of a WAD file as a display string (`"MAP01, MAP02"`).
pub fn map_string_from_wad(path: &Path) -> Result<String, WadError> {
    Ok(read_map_names(path)?.join(", "))
}

#[cfg(test)]
#[path = "tests/wad_tests.rs"]
mod tests;
