//! Scratch-directory extraction with name-and-length deduplication.
//!
//! Extracted entries are written as `<stem>_<token><ext>` and are never
//! deleted, so later runs find them again. A cached file is reused when its
//! name starts with the entry's `<stem>_` prefix and its length equals the
//! entry's length. Same-named entries of different sizes therefore get
//! separate files; same-named entries of equal size share one.

use std::path::{Path, PathBuf};

use uuid::Uuid;
use wadshelf_core::util::stem;

use crate::archive::{ArchiveEntry, ArchiveReader};
use crate::error::CacheError;

/// A materialized archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFile {
    /// A readable file: the cached copy, or the original for plain files.
    pub path: PathBuf,
    /// The entry this file came from.
    pub entry: ArchiveEntry,
    /// Whether an existing scratch file was reused instead of extracting.
    pub reused: bool,
}

/// Extraction cache rooted at a scratch directory.
#[derive(Debug, Clone)]
pub struct ContentCache {
    scratch_dir: PathBuf,
}

impl ContentCache {
    /// Use `scratch_dir`, creating it if needed.
    pub fn new(scratch_dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let scratch_dir = scratch_dir.into();
        std::fs::create_dir_all(&scratch_dir).map_err(|source| CacheError::ScratchDir {
            path: scratch_dir.clone(),
            source,
        })?;
        Ok(Self { scratch_dir })
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// Make `entry` available as a file on disk.
    pub fn materialize(
        &self,
        reader: &mut dyn ArchiveReader,
        entry: &ArchiveEntry,
    ) -> Result<ExtractedFile, CacheError> {
        if !entry.extract_required {
            return Ok(ExtractedFile {
                path: PathBuf::from(&entry.full_name),
                entry: entry.clone(),
                reused: false,
            });
        }

        let prefix = format!("{}_", stem(&entry.name));
        if let Some(path) = self.find_cached(&prefix, entry.length)? {
            log::debug!("Reusing {} for {}", path.display(), entry.full_name);
            return Ok(ExtractedFile {
                path,
                entry: entry.clone(),
                reused: true,
            });
        }

        let extension = Path::new(&entry.name)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let token = Uuid::new_v4().simple();
        let path = self
            .scratch_dir
            .join(format!("{prefix}{token}{extension}"));

        if let Err(e) = reader.extract_to(entry, &path) {
            // A partial file could later pass the length check by accident.
            let _ = std::fs::remove_file(&path);
            return Err(e.into());
        }
        log::debug!("Extracted {} to {}", entry.full_name, path.display());

        Ok(ExtractedFile {
            path,
            entry: entry.clone(),
            reused: false,
        })
    }

    /// First scratch file (by name) with the given prefix and length.
    ///
    /// The prefix comparison ignores case.
    fn find_cached(&self, prefix: &str, length: u64) -> Result<Option<PathBuf>, CacheError> {
        let prefix = prefix.to_lowercase();
        let mut candidates: Vec<(String, PathBuf)> = std::fs::read_dir(&self.scratch_dir)?
            .flatten()
            .filter_map(|e| {
                let name = e.file_name().to_str()?.to_string();
                name.to_lowercase()
                    .starts_with(&prefix)
                    .then(|| (name, e.path()))
            })
            .collect();
        candidates.sort();

        for (_, path) in candidates {
            match std::fs::metadata(&path) {
                Ok(meta) if meta.is_file() && meta.len() == length => return Ok(Some(path)),
                Ok(_) => {}
                Err(e) => log::debug!("Skipping {}: {}", path.display(), e),
            }
        }
        Ok(None)
    }
}
