//! Read queries for the catalog database.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension, params};
use wadshelf_core::{CatalogRecord, IwadRecord};

use crate::operations::{DATE_FORMAT, DATETIME_FORMAT, OperationError};

const GAME_FILE_COLUMNS: &str = "id, file_name, file_size, title, author, description, rating,
     release_date, downloaded, last_played, minutes_played, comments, map, map_count,
     iwad_id, source_port_id";

// ── Game File Lookups ───────────────────────────────────────────────────────

/// Find a game file by its exact file name.
pub fn find_game_file_by_name(
    conn: &Connection,
    name: &str,
) -> Result<Option<CatalogRecord>, OperationError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {GAME_FILE_COLUMNS} FROM game_files WHERE file_name = ?1"
    ))?;
    stmt.query_row(params![name], row_to_record)
        .optional()
        .map_err(Into::into)
}

/// Find a game file by ID.
pub fn find_game_file_by_id(
    conn: &Connection,
    id: i64,
) -> Result<Option<CatalogRecord>, OperationError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {GAME_FILE_COLUMNS} FROM game_files WHERE id = ?1"
    ))?;
    stmt.query_row(params![id], row_to_record)
        .optional()
        .map_err(Into::into)
}

/// All game files, ordered by file name.
pub fn list_game_files(conn: &Connection) -> Result<Vec<CatalogRecord>, OperationError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {GAME_FILE_COLUMNS} FROM game_files ORDER BY file_name"
    ))?;
    let rows = stmt.query_map([], row_to_record)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// All game file names.
pub fn all_file_names(conn: &Connection) -> Result<BTreeSet<String>, OperationError> {
    let mut stmt = conn.prepare("SELECT file_name FROM game_files")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    rows.collect::<Result<BTreeSet<_>, _>>().map_err(Into::into)
}

// ── IWAD Lookups ────────────────────────────────────────────────────────────

/// All registered IWADs, ordered by name.
pub fn list_iwads(conn: &Connection) -> Result<Vec<IwadRecord>, OperationError> {
    let mut stmt =
        conn.prepare("SELECT id, game_file_id, name, file_name FROM iwads ORDER BY name")?;
    let rows = stmt.query_map([], |row| {
        Ok(IwadRecord {
            id: row.get(0)?,
            record_id: row.get(1)?,
            name: row.get(2)?,
            file_name: row.get(3)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// IDs of the game files that hold a registered IWAD.
pub fn iwad_game_file_ids(conn: &Connection) -> Result<BTreeSet<i64>, OperationError> {
    let mut stmt = conn.prepare("SELECT game_file_id FROM iwads")?;
    let rows = stmt.query_map([], |row| row.get::<_, i64>(0))?;
    rows.collect::<Result<BTreeSet<_>, _>>().map_err(Into::into)
}

// ── Statistics ──────────────────────────────────────────────────────────────

/// Summary counts for the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub game_files: i64,
    pub iwads: i64,
    pub total_bytes: i64,
    pub with_maps: i64,
    pub with_title: i64,
}

pub fn catalog_stats(conn: &Connection) -> Result<CatalogStats, OperationError> {
    let (game_files, total_bytes, with_maps, with_title) = conn.query_row(
        "SELECT COUNT(*),
                COALESCE(SUM(file_size), 0),
                COUNT(map_count),
                COUNT(NULLIF(title, ''))
         FROM game_files",
        [],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
    )?;
    let iwads = conn.query_row("SELECT COUNT(*) FROM iwads", [], |row| row.get(0))?;
    Ok(CatalogStats {
        game_files,
        iwads,
        total_bytes,
        with_maps,
        with_title,
    })
}

// ── Row Mapping Helpers ─────────────────────────────────────────────────────

/// Map a `game_files` row selected with [`GAME_FILE_COLUMNS`].
///
/// Dates that do not parse are read as unset.
fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<CatalogRecord> {
    let file_size: i64 = row.get(2)?;
    let release_date: Option<String> = row.get(7)?;
    let downloaded: Option<String> = row.get(8)?;
    let last_played: Option<String> = row.get(9)?;
    Ok(CatalogRecord {
        id: row.get(0)?,
        file_name: row.get(1)?,
        file_size: file_size.max(0) as u64,
        title: row.get(3)?,
        author: row.get(4)?,
        description: row.get(5)?,
        rating: row.get(6)?,
        release_date: release_date.and_then(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT).ok()),
        downloaded: downloaded.and_then(|s| parse_datetime(&s)),
        last_played: last_played.and_then(|s| parse_datetime(&s)),
        minutes_played: row.get(10)?,
        comments: row.get(11)?,
        map: row.get(12)?,
        map_count: row.get(13)?,
        iwad_id: row.get(14)?,
        source_port_id: row.get(15)?,
    })
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT).ok()
}
