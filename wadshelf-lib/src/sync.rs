//! Batch sync of library files into the catalog.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use wadshelf_core::CatalogStore;

use crate::cache::ContentCache;
use crate::descriptor::DEFAULT_DATE_FORMATS;
use crate::events::{CancelToken, SyncEvents};
use crate::ingest::{IngestOutcome, IngestReport, IngestionPipeline};

/// Final classification of one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Added,
    Updated,
    Skipped,
    Invalid(String),
}

/// A file that could not be ingested, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidFile {
    pub file_name: String,
    pub reason: String,
}

/// Everything a sync run did, in processing order.
///
/// Each processed name appears in exactly one of `added`, `updated`,
/// `skipped`, or `invalid`. A cancelled run lists only the files processed
/// before cancellation.
#[derive(Debug, Clone, Default)]
pub struct SyncResult {
    pub added: Vec<String>,
    pub updated: Vec<String>,
    pub skipped: Vec<String>,
    pub invalid: Vec<InvalidFile>,
    /// Per-file details for every file that did not end up invalid.
    pub reports: Vec<IngestReport>,
    pub cancelled: bool,
}

impl SyncResult {
    /// Number of distinct files that reached an outcome.
    pub fn processed(&self) -> usize {
        self.added.len() + self.updated.len() + self.skipped.len() + self.invalid.len()
    }

    /// The outcome recorded for `file_name`, if it was processed.
    pub fn outcome(&self, file_name: &str) -> Option<SyncOutcome> {
        if self.added.iter().any(|f| f == file_name) {
            Some(SyncOutcome::Added)
        } else if self.updated.iter().any(|f| f == file_name) {
            Some(SyncOutcome::Updated)
        } else if self.skipped.iter().any(|f| f == file_name) {
            Some(SyncOutcome::Skipped)
        } else {
            self.invalid
                .iter()
                .find(|i| i.file_name == file_name)
                .map(|i| SyncOutcome::Invalid(i.reason.clone()))
        }
    }

    /// Added or updated files that contain an IWAD.
    pub fn iwad_files(&self) -> Vec<&str> {
        self.reports
            .iter()
            .filter(|r| r.outcome != IngestOutcome::Skipped && r.is_iwad())
            .map(|r| r.file_name.as_str())
            .collect()
    }
}

/// Runs the ingestion pipeline over a batch of library files.
///
/// The engine holds no state between runs; everything a run produced is in
/// the returned [`SyncResult`].
pub struct LibrarySyncEngine<'a> {
    library_dir: PathBuf,
    cache: ContentCache,
    store: &'a dyn CatalogStore,
    date_formats: Vec<String>,
}

impl<'a> LibrarySyncEngine<'a> {
    pub fn new(
        library_dir: impl Into<PathBuf>,
        cache: ContentCache,
        store: &'a dyn CatalogStore,
    ) -> Self {
        Self {
            library_dir: library_dir.into(),
            cache,
            store,
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn with_date_formats(mut self, formats: Vec<String>) -> Self {
        self.date_formats = formats;
        self
    }

    pub fn library_dir(&self) -> &Path {
        &self.library_dir
    }

    /// Ingest `files` (names relative to the library directory) in order.
    ///
    /// Repeated names are processed once. Per-file failures are collected
    /// in [`SyncResult::invalid`] and never stop the batch. `cancel` is
    /// checked before each file.
    pub fn execute(
        &self,
        files: &[String],
        events: &dyn SyncEvents,
        cancel: &CancelToken,
    ) -> SyncResult {
        let mut seen = HashSet::new();
        let files: Vec<&str> = files
            .iter()
            .map(String::as_str)
            .filter(|f| seen.insert(*f))
            .collect();
        let total = files.len();

        let pipeline = IngestionPipeline::new(&self.library_dir, &self.cache, self.store)
            .with_events(events)
            .with_date_formats(self.date_formats.clone());

        let mut result = SyncResult::default();
        for (i, name) in files.iter().enumerate() {
            if cancel.is_cancelled() {
                log::info!("Sync cancelled after {} of {} files", i, total);
                result.cancelled = true;
                break;
            }
            events.on_progress(i + 1, total, name);

            match pipeline.ingest(name) {
                Ok(report) => {
                    let bucket = match report.outcome {
                        IngestOutcome::Added => &mut result.added,
                        IngestOutcome::Updated => &mut result.updated,
                        IngestOutcome::Skipped => &mut result.skipped,
                    };
                    bucket.push(name.to_string());
                    result.reports.push(report);
                }
                Err(e) => {
                    log::debug!("{}: {}", name, e);
                    result.invalid.push(InvalidFile {
                        file_name: name.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        log::debug!(
            "Sync finished: {} added, {} updated, {} unchanged, {} invalid",
            result.added.len(),
            result.updated.len(),
            result.skipped.len(),
            result.invalid.len()
        );
        result
    }
}
