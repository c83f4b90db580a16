//! Catalog store boundary.
//!
//! The sync engine never talks to a database directly. It reads and writes
//! records through [`CatalogStore`], which `wadshelf-db` implements on SQLite.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::record::{CatalogRecord, IwadRecord, RecordField};

/// Errors raised by a catalog store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend failed (I/O, SQL, constraint violation).
    #[error("Catalog store error: {0}")]
    Backend(String),

    /// An update was attempted on a record that has no id yet.
    #[error("Record '{0}' has not been persisted")]
    NotPersisted(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Read/write access to the persisted catalog.
///
/// Failures are scoped to the record being read or written; callers decide
/// whether that aborts anything beyond the current record.
pub trait CatalogStore {
    /// Look up a record by its unique file name.
    fn get_record_by_name(&self, name: &str) -> Result<Option<CatalogRecord>, StoreError>;

    /// All file names currently in the catalog.
    fn all_names(&self) -> Result<BTreeSet<String>, StoreError>;

    /// Insert a new record. On success `record.id` is set.
    fn insert(&self, record: &mut CatalogRecord) -> Result<(), StoreError>;

    /// Write only `fields` of an existing record.
    fn update(&self, record: &CatalogRecord, fields: &[RecordField]) -> Result<(), StoreError>;

    /// Remove a record by file name. Returns `true` if a row was deleted.
    fn delete_by_name(&self, name: &str) -> Result<bool, StoreError>;

    /// Register `record` as the IWAD `iwad` and link it, writing its title
    /// and `iwad_id` in the same step. Either both writes land or neither
    /// does. On success `record.iwad_id` is set and the IWAD id returned.
    fn register_iwad(
        &self,
        iwad: &IwadRecord,
        record: &mut CatalogRecord,
    ) -> Result<i64, StoreError>;

    /// Ids of catalog records that are registered as IWADs.
    fn iwad_record_ids(&self) -> Result<BTreeSet<i64>, StoreError>;
}
