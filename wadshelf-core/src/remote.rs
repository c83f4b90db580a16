//! Remote metadata source boundary.

use thiserror::Error;

use crate::record::CatalogRecord;

/// Errors from a remote metadata source.
///
/// Any of these means the source as a whole is unusable for the current
/// operation, not that one particular file is bad.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Remote metadata source unreachable: {0}")]
    Unreachable(String),

    #[error("Malformed response from remote metadata source: {0}")]
    Malformed(String),
}

/// Looks up published metadata for a file by name.
pub trait RemoteMetadataSource {
    /// Every remote entry whose file name matches `name`.
    ///
    /// Returned records carry no `id`; `file_size` is the published size.
    fn find_by_name(&self, name: &str) -> Result<Vec<CatalogRecord>, RemoteError>;
}
