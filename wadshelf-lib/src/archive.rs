//! Read-only access to the files of a game archive.
//!
//! Zip-based containers (`.zip`, `.pk3`, `.ipk3`, `.pke`) are read through
//! the `zip` crate. Plain game files (`.wad`, `.deh`, `.bex`) are presented
//! as an archive with a single entry that needs no extraction, so the
//! ingestion pipeline can treat both the same way.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use wadshelf_core::util::{base_name, dotted_extension, has_extension};

use crate::error::ArchiveError;

/// Zip-based archive extensions.
pub const ARCHIVE_EXTENSIONS: &[&str] = &[".zip", ".pk3", ".ipk3", ".pke"];

/// Game files that are catalogued as-is.
pub const PLAIN_EXTENSIONS: &[&str] = &[".wad", ".deh", ".bex"];

/// One file inside an archive.
///
/// Entries are plain values; extraction goes back through the
/// [`ArchiveReader`] they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Base name without any directory part (`"MAP01.wad"`).
    pub name: String,
    /// Name as stored in the archive, or the file path for plain files.
    pub full_name: String,
    /// Uncompressed size in bytes.
    pub length: u64,
    /// Whether the entry must be written out before it can be read as a file.
    pub extract_required: bool,
    index: usize,
}

impl ArchiveEntry {
    /// Lowercased dotted extension of the entry name.
    pub fn extension(&self) -> Option<String> {
        dotted_extension(&self.name)
    }
}

/// An open archive.
pub trait ArchiveReader {
    /// Path of the archive on disk.
    fn path(&self) -> &Path;

    /// All file entries, in archive order. Directories are not listed.
    fn entries(&self) -> &[ArchiveEntry];

    /// Write an entry's uncompressed bytes to `dest`, replacing any file there.
    fn extract_to(&mut self, entry: &ArchiveEntry, dest: &Path) -> Result<(), ArchiveError>;

    /// Read up to `limit` bytes of an entry into memory.
    fn read_entry(&mut self, entry: &ArchiveEntry, limit: u64) -> Result<Vec<u8>, ArchiveError>;
}

/// Entries whose name has one of `extensions` (dotted, case-insensitive).
///
/// Names without a dot never match.
pub fn entries_by_extension<'a>(
    entries: &'a [ArchiveEntry],
    extensions: &[&str],
) -> Vec<&'a ArchiveEntry> {
    entries
        .iter()
        .filter(|e| e.name.contains('.') && has_extension(&e.name, extensions))
        .collect()
}

/// Whether a file name is a zip-based archive.
pub fn is_archive_name(name: &str) -> bool {
    has_extension(name, ARCHIVE_EXTENSIONS)
}

/// Whether a file name is a game file catalogued without unpacking.
pub fn is_plain_name(name: &str) -> bool {
    has_extension(name, PLAIN_EXTENSIONS)
}

/// Open a game file by path, choosing the reader from its extension.
pub fn open_archive(path: &Path) -> Result<Box<dyn ArchiveReader>, ArchiveError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    if is_archive_name(name) {
        Ok(Box::new(ZipArchiveReader::open(path)?))
    } else if is_plain_name(name) {
        Ok(Box::new(FileArchiveReader::open(path)?))
    } else {
        Err(ArchiveError::Unsupported(name.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Zip containers
// ---------------------------------------------------------------------------

pub struct ZipArchiveReader {
    path: PathBuf,
    archive: zip::ZipArchive<BufReader<File>>,
    entries: Vec<ArchiveEntry>,
}

impl ZipArchiveReader {
    pub fn open(path: &Path) -> Result<Self, ArchiveError> {
        let file = File::open(path).map_err(|e| ArchiveError::open(path, e))?;
        let mut archive =
            zip::ZipArchive::new(BufReader::new(file)).map_err(|e| ArchiveError::open(path, e))?;

        let mut entries = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let file = archive
                .by_index(index)
                .map_err(|e| ArchiveError::open(path, e))?;
            if file.is_dir() {
                continue;
            }
            let full_name = file.name().to_string();
            entries.push(ArchiveEntry {
                name: base_name(&full_name).to_string(),
                full_name,
                length: file.size(),
                extract_required: true,
                index,
            });
        }
        log::debug!("{}: {} entries", path.display(), entries.len());

        Ok(Self {
            path: path.to_path_buf(),
            archive,
            entries,
        })
    }
}

impl ArchiveReader for ZipArchiveReader {
    fn path(&self) -> &Path {
        &self.path
    }

    fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    fn extract_to(&mut self, entry: &ArchiveEntry, dest: &Path) -> Result<(), ArchiveError> {
        let mut file = self.archive.by_index(entry.index)?;
        let mut out = File::create(dest)?;
        io::copy(&mut file, &mut out)?;
        Ok(())
    }

    fn read_entry(&mut self, entry: &ArchiveEntry, limit: u64) -> Result<Vec<u8>, ArchiveError> {
        let file = self.archive.by_index(entry.index)?;
        let mut data = Vec::with_capacity(entry.length.min(limit) as usize);
        file.take(limit).read_to_end(&mut data)?;
        Ok(data)
    }
}

// ---------------------------------------------------------------------------
// Plain files
// ---------------------------------------------------------------------------

/// A plain game file seen as a one-entry archive.
pub struct FileArchiveReader {
    path: PathBuf,
    entries: Vec<ArchiveEntry>,
}

impl FileArchiveReader {
    pub fn open(path: &Path) -> Result<Self, ArchiveError> {
        let meta = std::fs::metadata(path).map_err(|e| ArchiveError::open(path, e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            path: path.to_path_buf(),
            entries: vec![ArchiveEntry {
                name,
                full_name: path.to_string_lossy().into_owned(),
                length: meta.len(),
                extract_required: false,
                index: 0,
            }],
        })
    }

    fn check(&self, entry: &ArchiveEntry) -> Result<(), ArchiveError> {
        if self.entries.first() == Some(entry) {
            Ok(())
        } else {
            Err(ArchiveError::NoSuchEntry(entry.index))
        }
    }
}

impl ArchiveReader for FileArchiveReader {
    fn path(&self) -> &Path {
        &self.path
    }

    fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    fn extract_to(&mut self, entry: &ArchiveEntry, dest: &Path) -> Result<(), ArchiveError> {
        self.check(entry)?;
        std::fs::copy(&self.path, dest)?;
        Ok(())
    }

    fn read_entry(&mut self, entry: &ArchiveEntry, limit: u64) -> Result<Vec<u8>, ArchiveError> {
        self.check(entry)?;
        let mut data = Vec::new();
        File::open(&self.path)?.take(limit).read_to_end(&mut data)?;
        Ok(data)
    }
}
