//! Catalog record types.
//!
//! A [`CatalogRecord`] is the in-memory copy of one row of the user's library.
//! The store owns the persisted row; the engine mutates a transient copy and
//! hands it back to the store together with the list of fields it touched.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};

// ── Record ──────────────────────────────────────────────────────────────────

/// One file in the library catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogRecord {
    /// Store-assigned identity. `None` until the record has been inserted.
    pub id: Option<i64>,
    /// Base file name, unique within the catalog (e.g. `"scythe.zip"`).
    pub file_name: String,
    /// Size of the file on disk in bytes.
    pub file_size: u64,
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub release_date: Option<NaiveDate>,
    pub downloaded: Option<NaiveDateTime>,
    pub last_played: Option<NaiveDateTime>,
    pub minutes_played: i64,
    pub comments: Option<String>,
    /// Level markers joined with `", "` (e.g. `"MAP01, MAP02"`).
    pub map: Option<String>,
    pub map_count: Option<u32>,
    /// IWAD this file is played with, or the IWAD row this file *is*.
    pub iwad_id: Option<i64>,
    pub source_port_id: Option<i64>,
}

impl CatalogRecord {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, file_size: u64) -> Self {
        self.file_size = file_size;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set `map` and `map_count` from a list of level marker names.
    ///
    /// An empty list clears both fields.
    pub fn set_maps(&mut self, markers: &[String]) {
        if markers.is_empty() {
            self.map = None;
            self.map_count = None;
        } else {
            self.map = Some(markers.join(", "));
            self.map_count = Some(markers.len() as u32);
        }
    }

    /// The level markers stored in `map`, in stored order.
    pub fn maps(&self) -> Vec<String> {
        self.map
            .as_deref()
            .map(|m| {
                m.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Title for display: the stored title, or the file name when unset.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.file_name)
    }
}

// ── Fields ──────────────────────────────────────────────────────────────────

/// A single updatable column of a [`CatalogRecord`].
///
/// Store updates and metadata merges are always expressed as a record plus a
/// list of these, so only the named columns are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordField {
    FileSize,
    Title,
    Author,
    Description,
    Rating,
    ReleaseDate,
    Downloaded,
    LastPlayed,
    MinutesPlayed,
    Comments,
    Map,
    MapCount,
    IwadId,
    SourcePortId,
}

/// Fields offered when updating a record from another source.
pub const DEFAULT_UPDATE_FIELDS: &[RecordField] = &[
    RecordField::Author,
    RecordField::Title,
    RecordField::Description,
    RecordField::Downloaded,
    RecordField::LastPlayed,
    RecordField::ReleaseDate,
    RecordField::Comments,
    RecordField::Rating,
    RecordField::Map,
    RecordField::MapCount,
];

impl RecordField {
    pub const ALL: &'static [RecordField] = &[
        RecordField::FileSize,
        RecordField::Title,
        RecordField::Author,
        RecordField::Description,
        RecordField::Rating,
        RecordField::ReleaseDate,
        RecordField::Downloaded,
        RecordField::LastPlayed,
        RecordField::MinutesPlayed,
        RecordField::Comments,
        RecordField::Map,
        RecordField::MapCount,
        RecordField::IwadId,
        RecordField::SourcePortId,
    ];

    /// Snake-case name, also used as the column name by the SQLite store.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordField::FileSize => "file_size",
            RecordField::Title => "title",
            RecordField::Author => "author",
            RecordField::Description => "description",
            RecordField::Rating => "rating",
            RecordField::ReleaseDate => "release_date",
            RecordField::Downloaded => "downloaded",
            RecordField::LastPlayed => "last_played",
            RecordField::MinutesPlayed => "minutes_played",
            RecordField::Comments => "comments",
            RecordField::Map => "map",
            RecordField::MapCount => "map_count",
            RecordField::IwadId => "iwad_id",
            RecordField::SourcePortId => "source_port_id",
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a [`RecordField`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown record field '{0}'")]
pub struct FieldParseError(pub String);

impl FromStr for RecordField {
    type Err = FieldParseError;

    /// Accepts the snake-case name or the same name without underscores,
    /// case-insensitively (`release_date`, `ReleaseDate`, `releasedate`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        RecordField::ALL
            .iter()
            .copied()
            .find(|f| f.as_str().replace('_', "") == wanted)
            .ok_or_else(|| FieldParseError(s.to_string()))
    }
}

// ── IWAD ────────────────────────────────────────────────────────────────────

/// A base game container registered for use by other catalog files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IwadRecord {
    pub id: Option<i64>,
    /// Catalog record that holds the IWAD file.
    pub record_id: i64,
    pub name: String,
    pub file_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_maps_joins_and_counts() {
        let mut record = CatalogRecord::new("test.zip");
        record.set_maps(&["MAP01".to_string(), "MAP02".to_string()]);
        assert_eq!(record.map.as_deref(), Some("MAP01, MAP02"));
        assert_eq!(record.map_count, Some(2));
        assert_eq!(record.maps(), vec!["MAP01", "MAP02"]);

        record.set_maps(&[]);
        assert_eq!(record.map, None);
        assert_eq!(record.map_count, None);
        assert!(record.maps().is_empty());
    }

    #[test]
    fn display_title_falls_back_to_file_name() {
        let record = CatalogRecord::new("av.zip");
        assert_eq!(record.display_title(), "av.zip");
        let record = record.with_title("Alien Vendetta");
        assert_eq!(record.display_title(), "Alien Vendetta");
    }

    #[test]
    fn field_parse_accepts_variants() {
        assert_eq!("release_date".parse(), Ok(RecordField::ReleaseDate));
        assert_eq!("ReleaseDate".parse(), Ok(RecordField::ReleaseDate));
        assert_eq!("MAPCOUNT".parse(), Ok(RecordField::MapCount));
        assert!("bogus".parse::<RecordField>().is_err());
    }

    #[test]
    fn field_names_round_trip() {
        for field in RecordField::ALL {
            assert_eq!(field.as_str().parse::<RecordField>(), Ok(*field));
        }
    }
}
