//! The on-disk game file directory.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

/// Lists the file names of a library directory.
pub trait DirectorySource {
    fn all_names(&self) -> io::Result<BTreeSet<String>>;
}

/// A flat directory of game files.
///
/// Only regular files directly inside the directory count; subdirectories
/// and names that are not valid UTF-8 are skipped.
#[derive(Debug, Clone)]
pub struct GameFileDirectory {
    root: PathBuf,
}

impl GameFileDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Remove a file from the directory. Returns `false` if it was not there.
    pub fn delete(&self, name: &str) -> io::Result<bool> {
        match std::fs::remove_file(self.path_of(name)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

impl DirectorySource for GameFileDirectory {
    fn all_names(&self) -> io::Result<BTreeSet<String>> {
        let mut names = BTreeSet::new();
        for entry in std::fs::read_dir(&self.root)?.flatten() {
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => {
                    names.insert(name);
                }
                Err(raw) => log::warn!("Skipping non-UTF-8 file name {:?}", raw),
            }
        }
        Ok(names)
    }
}
