//! Remote metadata reconciliation.
//!
//! For each catalog file, the remote source is asked for entries with the
//! same file name. One entry is picked (the only one, or the only one with
//! the same byte size); anything less certain is handed to a
//! [`Disambiguator`], which may decline. The picked entry's values are then
//! copied into the local record, restricted to a caller-chosen field set.
//!
//! Registered IWADs whose game has no published metadata are never looked
//! up; they are reported back as warnings instead.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use wadshelf_core::{
    CatalogRecord, CatalogStore, DEFAULT_UPDATE_FIELDS, RecordField, RemoteError,
    RemoteMetadataSource, StoreError,
};
use wadshelf_lib::CancelToken;
use wadshelf_wad::iwad_info;

use crate::progress::RefreshProgress;

#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The remote source cannot be reached; the whole refresh stops.
    #[error("Metadata source unreachable: {0}")]
    Unreachable(String),
    #[error("Metadata source returned an invalid response: {0}")]
    Malformed(String),
    #[error("Catalog error: {0}")]
    Store(#[from] StoreError),
}

impl From<RemoteError> for ReconcileError {
    fn from(e: RemoteError) -> Self {
        match e {
            RemoteError::Unreachable(msg) => Self::Unreachable(msg),
            RemoteError::Malformed(msg) => Self::Malformed(msg),
        }
    }
}

/// Fields a metadata refresh writes unless told otherwise:
/// [`DEFAULT_UPDATE_FIELDS`] without comments and level lists.
pub fn default_refresh_fields() -> Vec<RecordField> {
    DEFAULT_UPDATE_FIELDS
        .iter()
        .copied()
        .filter(|f| {
            !matches!(
                f,
                RecordField::Comments | RecordField::Map | RecordField::MapCount
            )
        })
        .collect()
}

// ── Selection ───────────────────────────────────────────────────────────────

/// Which remote entry, if any, describes a local file.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection<'a> {
    Selected(&'a CatalogRecord),
    NotFound,
    /// More than one plausible entry; the remaining candidates.
    Ambiguous(Vec<&'a CatalogRecord>),
}

/// Pick the remote entry for `local`.
///
/// A single candidate is taken as-is. Otherwise candidates are narrowed to
/// those whose size equals the local file size; if exactly one remains it
/// is taken. Anything else is ambiguous, listing the size matches, or every
/// candidate when none matched by size.
pub fn select_remote<'a>(local: &CatalogRecord, candidates: &'a [CatalogRecord]) -> Selection<'a> {
    match candidates {
        [] => Selection::NotFound,
        [only] => Selection::Selected(only),
        _ => {
            let same_size: Vec<&CatalogRecord> = candidates
                .iter()
                .filter(|c| c.file_size == local.file_size)
                .collect();
            match same_size.as_slice() {
                [only] => Selection::Selected(only),
                [] => Selection::Ambiguous(candidates.iter().collect()),
                _ => Selection::Ambiguous(same_size),
            }
        }
    }
}

/// Resolves ambiguous matches, for example by asking the user.
pub trait Disambiguator {
    /// Index into `candidates` of the entry to use, or `None` to skip the file.
    fn choose(&self, local: &CatalogRecord, candidates: &[&CatalogRecord]) -> Option<usize>;
}

/// Leaves every ambiguous match unresolved.
pub struct DeferDisambiguator;

impl Disambiguator for DeferDisambiguator {
    fn choose(&self, _local: &CatalogRecord, _candidates: &[&CatalogRecord]) -> Option<usize> {
        None
    }
}

// ── Merge ───────────────────────────────────────────────────────────────────

/// Copy `fields` from `remote` into `local` where the remote has a value
/// that differs. Returns the fields that changed, in `fields` order.
///
/// Empty remote values never overwrite local ones.
pub fn merge_fields(
    local: &mut CatalogRecord,
    remote: &CatalogRecord,
    fields: &[RecordField],
) -> Vec<RecordField> {
    fn copy<T: Clone + PartialEq>(local: &mut Option<T>, remote: &Option<T>) -> bool {
        match remote {
            Some(value) if local.as_ref() != Some(value) => {
                *local = Some(value.clone());
                true
            }
            _ => false,
        }
    }

    let mut seen = BTreeSet::new();
    let mut changed = Vec::new();
    for &field in fields {
        if !seen.insert(field) {
            continue;
        }
        let did_change = match field {
            RecordField::FileSize => {
                let differs = remote.file_size > 0 && remote.file_size != local.file_size;
                if differs {
                    local.file_size = remote.file_size;
                }
                differs
            }
            RecordField::Title => copy(&mut local.title, &remote.title),
            RecordField::Author => copy(&mut local.author, &remote.author),
            RecordField::Description => copy(&mut local.description, &remote.description),
            RecordField::Rating => copy(&mut local.rating, &remote.rating),
            RecordField::ReleaseDate => copy(&mut local.release_date, &remote.release_date),
            RecordField::Downloaded => copy(&mut local.downloaded, &remote.downloaded),
            RecordField::LastPlayed => copy(&mut local.last_played, &remote.last_played),
            RecordField::MinutesPlayed => {
                let differs =
                    remote.minutes_played > 0 && remote.minutes_played != local.minutes_played;
                if differs {
                    local.minutes_played = remote.minutes_played;
                }
                differs
            }
            RecordField::Comments => copy(&mut local.comments, &remote.comments),
            RecordField::Map => copy(&mut local.map, &remote.map),
            RecordField::MapCount => copy(&mut local.map_count, &remote.map_count),
            RecordField::IwadId => copy(&mut local.iwad_id, &remote.iwad_id),
            RecordField::SourcePortId => copy(&mut local.source_port_id, &remote.source_port_id),
        };
        if did_change {
            changed.push(field);
        }
    }
    changed
}

// ── Refresh ─────────────────────────────────────────────────────────────────

/// What happened to one file during a refresh.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataOutcome {
    /// Remote values were written; the fields that changed.
    Updated(Vec<RecordField>),
    /// A remote entry was found but matched the local record.
    Unchanged,
    NotFound,
    /// Several candidates and no choice was made.
    Ambiguous(usize),
    /// Registered IWAD without published metadata.
    IwadExcluded,
    /// The catalog could not read or write this record.
    Failed(String),
}

impl fmt::Display for MetadataOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Updated(fields) => {
                let names: Vec<&str> = fields.iter().map(|f| f.as_str()).collect();
                write!(f, "updated ({})", names.join(", "))
            }
            Self::Unchanged => f.write_str("unchanged"),
            Self::NotFound => f.write_str("not found"),
            Self::Ambiguous(n) => write!(f, "{n} candidates, skipped"),
            Self::IwadExcluded => f.write_str("IWAD, skipped"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Options for a metadata refresh.
pub struct RefreshOptions {
    /// Fields copied from the remote entry.
    pub fields: Vec<RecordField>,
    /// Library directory holding the files. When set, remote candidates are
    /// matched against each file's size on disk rather than the size the
    /// catalog last recorded.
    pub library_dir: Option<PathBuf>,
}

impl Default for RefreshOptions {
    fn default() -> Self {
        Self {
            fields: default_refresh_fields(),
            library_dir: None,
        }
    }
}

/// Replace the catalog size of `record` with its current size on disk.
/// Files that can't be read keep the catalog value.
fn fill_size_from_disk(record: &mut CatalogRecord, library_dir: &Path) {
    match std::fs::metadata(library_dir.join(&record.file_name)) {
        Ok(meta) if meta.len() != record.file_size => {
            log::debug!(
                "{}: catalog size {} differs from disk size {}",
                record.file_name,
                record.file_size,
                meta.len()
            );
            record.file_size = meta.len();
        }
        Ok(_) => {}
        Err(e) => log::debug!("{}: using catalog size: {}", record.file_name, e),
    }
}

/// Per-file outcomes of a refresh, in processing order.
#[derive(Debug, Clone, Default)]
pub struct RefreshReport {
    pub outcomes: Vec<(String, MetadataOutcome)>,
    pub cancelled: bool,
}

impl RefreshReport {
    /// Files skipped because they are IWADs without published metadata.
    pub fn iwad_warnings(&self) -> Vec<&str> {
        self.names_where(|o| matches!(o, MetadataOutcome::IwadExcluded))
    }

    pub fn updated(&self) -> Vec<&str> {
        self.names_where(|o| matches!(o, MetadataOutcome::Updated(_)))
    }

    pub fn ambiguous(&self) -> Vec<&str> {
        self.names_where(|o| matches!(o, MetadataOutcome::Ambiguous(_)))
    }

    pub fn not_found(&self) -> Vec<&str> {
        self.names_where(|o| matches!(o, MetadataOutcome::NotFound))
    }

    pub fn outcome(&self, name: &str) -> Option<&MetadataOutcome> {
        self.outcomes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, o)| o)
    }

    fn names_where(&self, pred: impl Fn(&MetadataOutcome) -> bool) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, o)| pred(o))
            .map(|(n, _)| n.as_str())
            .collect()
    }
}

/// Whether a catalog record is a registered IWAD whose known-IWAD table
/// entry says it has no published metadata. Registered IWADs the table
/// doesn't recognise are looked up like any other file.
fn is_excluded_iwad(record: &CatalogRecord, iwad_ids: &BTreeSet<i64>) -> bool {
    let registered = record.id.is_some_and(|id| iwad_ids.contains(&id));
    registered && iwad_info(&record.file_name).is_some_and(|info| !info.has_metadata)
}

/// Refresh catalog metadata for `names` from a remote source.
///
/// Catalog failures affect only the file concerned. A remote failure stops
/// the refresh and is returned as the error; updates already written stay.
pub fn refresh_metadata(
    store: &dyn CatalogStore,
    remote: &dyn RemoteMetadataSource,
    names: &[String],
    options: &RefreshOptions,
    disambiguator: &dyn Disambiguator,
    progress: &dyn RefreshProgress,
    cancel: &CancelToken,
) -> Result<RefreshReport, ReconcileError> {
    let iwad_ids = store.iwad_record_ids()?;
    let mut report = RefreshReport::default();
    let total = names.len();

    for (i, name) in names.iter().enumerate() {
        if cancel.is_cancelled() {
            report.cancelled = true;
            break;
        }
        progress.on_file(i + 1, total, name);

        let outcome = match store.get_record_by_name(name) {
            Ok(Some(mut local)) if !is_excluded_iwad(&local, &iwad_ids) => {
                if let Some(dir) = &options.library_dir {
                    fill_size_from_disk(&mut local, dir);
                }
                let candidates = remote.find_by_name(name).inspect_err(|e| {
                    log::error!("Metadata lookup failed at {}: {}", name, e);
                })?;
                reconcile_one(store, &mut local, &candidates, &options.fields, disambiguator)
            }
            Ok(Some(_)) => MetadataOutcome::IwadExcluded,
            Ok(None) => MetadataOutcome::Failed("not in catalog".to_string()),
            Err(e) => MetadataOutcome::Failed(e.to_string()),
        };

        progress.on_outcome(name, &outcome);
        report.outcomes.push((name.clone(), outcome));
    }

    log::info!(
        "Metadata refresh: {} updated, {} not found, {} ambiguous, {} IWADs skipped",
        report.updated().len(),
        report.not_found().len(),
        report.ambiguous().len(),
        report.iwad_warnings().len()
    );
    Ok(report)
}

fn reconcile_one(
    store: &dyn CatalogStore,
    local: &mut CatalogRecord,
    candidates: &[CatalogRecord],
    fields: &[RecordField],
    disambiguator: &dyn Disambiguator,
) -> MetadataOutcome {
    let chosen = match select_remote(local, candidates) {
        Selection::Selected(remote) => remote,
        Selection::NotFound => return MetadataOutcome::NotFound,
        Selection::Ambiguous(options) => {
            match disambiguator
                .choose(local, &options)
                .and_then(|i| options.get(i).copied())
            {
                Some(remote) => remote,
                None => return MetadataOutcome::Ambiguous(options.len()),
            }
        }
    };

    let changed = merge_fields(local, chosen, fields);
    if changed.is_empty() {
        return MetadataOutcome::Unchanged;
    }
    match store.update(local, &changed) {
        Ok(()) => MetadataOutcome::Updated(changed),
        Err(e) => MetadataOutcome::Failed(e.to_string()),
    }
}

/// Which of `names` a remote lookup knows about, with their entries.
///
/// `lookup` is usually [`RemoteMetadataSource::find_by_name`], or a
/// source-specific search when the caller needs more than catalog fields
/// (download locations, for instance). Used to offer re-downloads for
/// catalog files missing from disk. The first lookup failure stops the scan.
pub fn find_remote<T, E>(
    names: &[String],
    mut lookup: impl FnMut(&str) -> Result<Vec<T>, E>,
) -> Result<Vec<(String, Vec<T>)>, ReconcileError>
where
    ReconcileError: From<E>,
{
    let mut found = Vec::new();
    for name in names {
        let entries = lookup(name)?;
        if !entries.is_empty() {
            found.push((name.clone(), entries));
        }
    }
    Ok(found)
}
