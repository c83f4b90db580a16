//! [`CatalogStore`] implementation backed by a SQLite connection.

use std::collections::BTreeSet;
use std::path::Path;

use rusqlite::Connection;
use wadshelf_core::{CatalogRecord, CatalogStore, IwadRecord, RecordField, StoreError};

use crate::operations::{self, OperationError};
use crate::queries;
use crate::schema::{self, SchemaError};

impl From<OperationError> for StoreError {
    fn from(e: OperationError) -> Self {
        match e {
            OperationError::NotPersisted(name) => StoreError::NotPersisted(name),
            other => StoreError::backend(other.to_string()),
        }
    }
}

/// The library catalog stored in a SQLite database.
pub struct SqliteCatalog {
    conn: Connection,
}

impl SqliteCatalog {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Open or create the catalog database at `path`.
    pub fn open(path: &Path) -> Result<Self, SchemaError> {
        Ok(Self::new(schema::open_database(path)?))
    }

    /// An empty in-memory catalog.
    pub fn memory() -> Result<Self, SchemaError> {
        Ok(Self::new(schema::open_memory()?))
    }

    /// The underlying connection, for queries the store trait doesn't cover.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl CatalogStore for SqliteCatalog {
    fn get_record_by_name(&self, name: &str) -> Result<Option<CatalogRecord>, StoreError> {
        Ok(queries::find_game_file_by_name(&self.conn, name)?)
    }

    fn all_names(&self) -> Result<BTreeSet<String>, StoreError> {
        Ok(queries::all_file_names(&self.conn)?)
    }

    fn insert(&self, record: &mut CatalogRecord) -> Result<(), StoreError> {
        let id = operations::insert_game_file(&self.conn, record)?;
        record.id = Some(id);
        Ok(())
    }

    fn update(&self, record: &CatalogRecord, fields: &[RecordField]) -> Result<(), StoreError> {
        Ok(operations::update_game_file(&self.conn, record, fields)?)
    }

    fn delete_by_name(&self, name: &str) -> Result<bool, StoreError> {
        Ok(operations::delete_game_file_by_name(&self.conn, name)?)
    }

    fn register_iwad(
        &self,
        iwad: &IwadRecord,
        record: &mut CatalogRecord,
    ) -> Result<i64, StoreError> {
        let iwad_id = operations::register_iwad(&self.conn, iwad, record)?;
        record.iwad_id = Some(iwad_id);
        Ok(iwad_id)
    }

    fn iwad_record_ids(&self) -> Result<BTreeSet<i64>, StoreError> {
        Ok(queries::iwad_game_file_ids(&self.conn)?)
    }
}
