//! Per-file ingestion: classify, unpack, parse, and persist one catalog record.
//!
//! Every game file is opened as an archive (plain files become a one-entry
//! archive). Each contained `.wad` is materialized through the
//! [`ContentCache`] and its directory read for level markers. The combined,
//! sorted marker list and the file size are then compared with the stored
//! record to decide between added, updated, and unchanged.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use wadshelf_core::util::stem;
use wadshelf_core::{CatalogRecord, CatalogStore, RecordField};
use wadshelf_wad::{WadKind, iwad_title, read_directory};

use crate::archive::{ArchiveEntry, ArchiveReader, entries_by_extension, open_archive};
use crate::cache::ContentCache;
use crate::descriptor::{DEFAULT_DATE_FORMATS, TextDescriptor, parse_descriptor};
use crate::error::IngestError;
use crate::events::{SilentEvents, SyncEvents};

/// Largest descriptor text read from an archive.
const DESCRIPTOR_LIMIT: u64 = 256 * 1024;

/// What ingestion did with a file that could be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Added,
    Updated,
    /// The stored record already matches the file.
    Skipped,
}

/// A WAD found in the ingested file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerReport {
    /// Entry name inside the archive, or the file path for plain files.
    pub entry_name: String,
    /// Readable copy of the container.
    pub path: PathBuf,
    pub kind: WadKind,
    /// Sorted level marker names.
    pub maps: Vec<String>,
    /// Whether the scratch copy came from an earlier extraction.
    pub reused: bool,
}

/// Result of ingesting one file.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    pub file_name: String,
    pub outcome: IngestOutcome,
    /// The record as stored after ingestion.
    pub record: CatalogRecord,
    /// Fields written by an update. Empty for added and skipped files.
    pub changed_fields: Vec<RecordField>,
    pub containers: Vec<ContainerReport>,
}

impl IngestReport {
    /// Whether any contained WAD carries the IWAD signature.
    pub fn is_iwad(&self) -> bool {
        self.containers.iter().any(|c| c.kind == WadKind::Iwad)
    }
}

/// Ingests files from one library directory into a catalog store.
pub struct IngestionPipeline<'a> {
    library_dir: PathBuf,
    cache: &'a ContentCache,
    store: &'a dyn CatalogStore,
    events: &'a dyn SyncEvents,
    date_formats: Vec<String>,
}

impl<'a> IngestionPipeline<'a> {
    pub fn new(
        library_dir: impl Into<PathBuf>,
        cache: &'a ContentCache,
        store: &'a dyn CatalogStore,
    ) -> Self {
        Self {
            library_dir: library_dir.into(),
            cache,
            store,
            events: &SilentEvents,
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Receive data requests for new records.
    pub fn with_events(mut self, events: &'a dyn SyncEvents) -> Self {
        self.events = events;
        self
    }

    /// Date formats for descriptor release dates, tried in order.
    pub fn with_date_formats(mut self, formats: Vec<String>) -> Self {
        self.date_formats = formats;
        self
    }

    /// Ingest the library file called `name`.
    ///
    /// Any error means the file could not be classified; the store is left
    /// untouched unless the final insert or update was what failed.
    pub fn ingest(&self, name: &str) -> Result<IngestReport, IngestError> {
        let path = self.library_dir.join(name);
        if !path.is_file() {
            return Err(IngestError::NotFound(path));
        }
        let file_size = std::fs::metadata(&path)?.len();

        let mut reader = open_archive(&path)?;
        let containers = self.scan_containers(reader.as_mut())?;
        let maps = merged_maps(&containers);
        let is_iwad = containers.iter().any(|c| c.kind == WadKind::Iwad);

        let (outcome, record, changed_fields) = match self.store.get_record_by_name(name)? {
            None => {
                let record = self.add(name, file_size, &maps, is_iwad, reader.as_mut())?;
                (IngestOutcome::Added, record, Vec::new())
            }
            Some(existing) => self.refresh(existing, file_size, &maps, is_iwad)?,
        };
        log::debug!("{}: {:?} ({} maps)", name, outcome, maps.len());

        Ok(IngestReport {
            file_name: name.to_string(),
            outcome,
            record,
            changed_fields,
            containers,
        })
    }

    /// Materialize and parse every `.wad` in the archive.
    fn scan_containers(
        &self,
        reader: &mut dyn ArchiveReader,
    ) -> Result<Vec<ContainerReport>, IngestError> {
        let wads: Vec<ArchiveEntry> = entries_by_extension(reader.entries(), &[".wad"])
            .into_iter()
            .cloned()
            .collect();

        let mut reports = Vec::with_capacity(wads.len());
        for entry in &wads {
            let extracted = self.cache.materialize(reader, entry)?;
            let file = File::open(&extracted.path)?;
            let directory = read_directory(&mut BufReader::new(file))?;
            if !directory.kind.is_recognized() {
                log::debug!("{}: not a recognized WAD", entry.full_name);
            }
            reports.push(ContainerReport {
                entry_name: entry.full_name.clone(),
                path: extracted.path,
                kind: directory.kind,
                maps: directory.map_names(),
                reused: extracted.reused,
            });
        }
        Ok(reports)
    }

    fn add(
        &self,
        name: &str,
        file_size: u64,
        maps: &[String],
        is_iwad: bool,
        reader: &mut dyn ArchiveReader,
    ) -> Result<CatalogRecord, IngestError> {
        let mut record = CatalogRecord::new(name).with_size(file_size);
        record.set_maps(maps);

        if let Some(descriptor) = self.read_descriptor(name, reader) {
            descriptor.apply_to(&mut record);
        }
        if is_iwad {
            record.title = Some(iwad_title(name));
        }

        self.events.on_data_needed(&mut record);
        self.store.insert(&mut record)?;
        Ok(record)
    }

    fn refresh(
        &self,
        mut record: CatalogRecord,
        file_size: u64,
        maps: &[String],
        is_iwad: bool,
    ) -> Result<(IngestOutcome, CatalogRecord, Vec<RecordField>), IngestError> {
        let mut changed = Vec::new();
        if record.file_size != file_size {
            record.file_size = file_size;
            changed.push(RecordField::FileSize);
        }
        if record.maps() != maps {
            record.set_maps(maps);
            changed.extend([RecordField::Map, RecordField::MapCount]);
        }
        if is_iwad && record.title.as_deref().is_none_or(str::is_empty) {
            record.title = Some(iwad_title(&record.file_name));
            changed.push(RecordField::Title);
        }

        if changed.is_empty() {
            return Ok((IngestOutcome::Skipped, record, changed));
        }
        self.store.update(&record, &changed)?;
        Ok((IngestOutcome::Updated, record, changed))
    }

    /// Parse the archive's text descriptor, preferring one named after the
    /// archive. Read failures are logged and ignored.
    fn read_descriptor(&self, name: &str, reader: &mut dyn ArchiveReader) -> Option<TextDescriptor> {
        let archive_stem = stem(name);
        let entry = {
            let texts = entries_by_extension(reader.entries(), &[".txt"]);
            texts
                .iter()
                .find(|e| stem(&e.name).eq_ignore_ascii_case(archive_stem))
                .or_else(|| texts.first())
                .map(|e| (*e).clone())?
        };

        let bytes = match reader.read_entry(&entry, DESCRIPTOR_LIMIT) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("{}: cannot read {}: {}", name, entry.full_name, e);
                return None;
            }
        };
        let descriptor = parse_descriptor(&String::from_utf8_lossy(&bytes), &self.date_formats);
        (!descriptor.is_empty()).then_some(descriptor)
    }
}

/// All level markers across containers, sorted and de-duplicated.
fn merged_maps(containers: &[ContainerReport]) -> Vec<String> {
    containers
        .iter()
        .flat_map(|c| c.maps.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
