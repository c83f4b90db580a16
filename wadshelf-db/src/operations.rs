//! Insert, update, and delete operations for game files and IWADs.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::ToSql;
use rusqlite::{Connection, params};
use thiserror::Error;
use wadshelf_core::{CatalogRecord, IwadRecord, RecordField};

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Entity not found: {entity_type} with id '{id}'")]
    NotFound { entity_type: String, id: String },
    #[error("Game file '{0}' has no id; insert it before updating")]
    NotPersisted(String),
}

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ── Game File Operations ────────────────────────────────────────────────────

/// Insert a new game file. Returns the generated ID.
///
/// Fails with a constraint error if a game file with the same name exists.
pub fn insert_game_file(conn: &Connection, record: &CatalogRecord) -> Result<i64, OperationError> {
    conn.execute(
        "INSERT INTO game_files (file_name, file_size, title, author, description, rating,
                                 release_date, downloaded, last_played, minutes_played,
                                 comments, map, map_count, iwad_id, source_port_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            record.file_name,
            record.file_size as i64,
            record.title,
            record.author,
            record.description,
            record.rating,
            record.release_date.map(format_date),
            record.downloaded.map(format_datetime),
            record.last_played.map(format_datetime),
            record.minutes_played,
            record.comments,
            record.map,
            record.map_count,
            record.iwad_id,
            record.source_port_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Write only the listed columns of an existing game file.
///
/// An empty field list is a no-op.
pub fn update_game_file(
    conn: &Connection,
    record: &CatalogRecord,
    fields: &[RecordField],
) -> Result<(), OperationError> {
    let id = record
        .id
        .ok_or_else(|| OperationError::NotPersisted(record.file_name.clone()))?;

    let fields: BTreeSet<RecordField> = fields.iter().copied().collect();
    if fields.is_empty() {
        return Ok(());
    }

    let mut assignments = Vec::with_capacity(fields.len());
    let mut values: Vec<Box<dyn ToSql>> = Vec::with_capacity(fields.len() + 1);
    for (i, field) in fields.iter().enumerate() {
        assignments.push(format!("{} = ?{}", field.as_str(), i + 1));
        values.push(field_value(record, *field));
    }
    values.push(Box::new(id));

    let sql = format!(
        "UPDATE game_files SET {}, updated_at = datetime('now') WHERE id = ?{}",
        assignments.join(", "),
        values.len()
    );
    let params: Vec<&dyn ToSql> = values.iter().map(|v| v.as_ref()).collect();
    let changed = conn.execute(&sql, params.as_slice())?;
    if changed == 0 {
        return Err(OperationError::NotFound {
            entity_type: "game_file".to_string(),
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Delete a game file by name. Returns `true` if a row was removed.
///
/// An IWAD row pointing at the file is removed with it, and any game file
/// that was played with that IWAD loses its association.
pub fn delete_game_file_by_name(conn: &Connection, name: &str) -> Result<bool, OperationError> {
    let changed = conn.execute("DELETE FROM game_files WHERE file_name = ?1", params![name])?;
    Ok(changed > 0)
}

// ── IWAD Operations ─────────────────────────────────────────────────────────

/// Register a game file as an IWAD. Returns the generated ID.
pub fn insert_iwad(conn: &Connection, iwad: &IwadRecord) -> Result<i64, OperationError> {
    conn.execute(
        "INSERT INTO iwads (game_file_id, name, file_name) VALUES (?1, ?2, ?3)",
        params![iwad.record_id, iwad.name, iwad.file_name],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Insert an IWAD row for `record` and link the record to it, writing the
/// record's title and new `iwad_id`. Both writes share one transaction.
pub fn register_iwad(
    conn: &Connection,
    iwad: &IwadRecord,
    record: &CatalogRecord,
) -> Result<i64, OperationError> {
    let tx = conn.unchecked_transaction()?;
    let iwad_id = insert_iwad(&tx, iwad)?;
    let linked = CatalogRecord {
        iwad_id: Some(iwad_id),
        ..record.clone()
    };
    update_game_file(&tx, &linked, &[RecordField::Title, RecordField::IwadId])?;
    tx.commit()?;
    Ok(iwad_id)
}

// ── Value Conversion ────────────────────────────────────────────────────────

/// The SQL value of one record column.
fn field_value(record: &CatalogRecord, field: RecordField) -> Box<dyn ToSql> {
    match field {
        RecordField::FileSize => Box::new(record.file_size as i64),
        RecordField::Title => Box::new(record.title.clone()),
        RecordField::Author => Box::new(record.author.clone()),
        RecordField::Description => Box::new(record.description.clone()),
        RecordField::Rating => Box::new(record.rating),
        RecordField::ReleaseDate => Box::new(record.release_date.map(format_date)),
        RecordField::Downloaded => Box::new(record.downloaded.map(format_datetime)),
        RecordField::LastPlayed => Box::new(record.last_played.map(format_datetime)),
        RecordField::MinutesPlayed => Box::new(record.minutes_played),
        RecordField::Comments => Box::new(record.comments.clone()),
        RecordField::Map => Box::new(record.map.clone()),
        RecordField::MapCount => Box::new(record.map_count),
        RecordField::IwadId => Box::new(record.iwad_id),
        RecordField::SourcePortId => Box::new(record.source_port_id),
    }
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn format_datetime(datetime: NaiveDateTime) -> String {
    datetime.format(DATETIME_FORMAT).to_string()
}
