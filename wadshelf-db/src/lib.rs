//! SQLite persistence layer for the library catalog.
//!
//! Provides schema creation, CRUD operations, query APIs, and the
//! [`SqliteCatalog`] store used by the sync engine, backed by SQLite
//! (via rusqlite with the bundled feature).

pub mod catalog;
pub mod operations;
pub mod queries;
pub mod schema;

pub use catalog::SqliteCatalog;
pub use operations::{
    OperationError, delete_game_file_by_name, insert_game_file, insert_iwad, register_iwad,
    update_game_file,
};
pub use queries::{
    CatalogStats, all_file_names, catalog_stats, find_game_file_by_id, find_game_file_by_name,
    iwad_game_file_ids, list_game_files, list_iwads,
};
pub use schema::{SchemaError, open_database, open_memory};
