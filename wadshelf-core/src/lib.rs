//! Shared data model for the wadshelf library.
//!
//! Defines the catalog record that every other crate reads and writes, the
//! narrow store/remote traits the sync engine talks through, and a handful of
//! byte and file-name helpers.

use std::io::{Read, Seek};

pub mod record;
pub mod remote;
pub mod store;
pub mod util;

pub use record::{CatalogRecord, DEFAULT_UPDATE_FIELDS, FieldParseError, IwadRecord, RecordField};
pub use remote::{RemoteError, RemoteMetadataSource};
pub use store::{CatalogStore, StoreError};

/// A reader that implements both Read and Seek.
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}
