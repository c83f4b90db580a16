use std::path::PathBuf;

use thiserror::Error;
use wadshelf_core::StoreError;
use wadshelf_wad::WadError;

/// Errors from opening or reading an archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The container could not be opened at all.
    #[error("Cannot open archive {}: {reason}", path.display())]
    Open { path: PathBuf, reason: String },

    /// The file extension is neither an archive nor a plain game file type.
    #[error("Unsupported file type: {0}")]
    Unsupported(String),

    #[error("Archive entry #{0} does not exist")]
    NoSuchEntry(usize),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArchiveError {
    pub fn open(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Open {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Errors from materializing an archive entry in the scratch directory.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Scratch directory {} is unusable: {source}", path.display())]
    ScratchDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that turn a single file into an invalid sync outcome.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("not found")]
    NotFound(PathBuf),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("Invalid WAD: {0}")]
    Wad(#[from] WadError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from loading or saving the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Cannot serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}
