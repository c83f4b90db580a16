use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use tempfile::TempDir;
use wadshelf_core::{CatalogRecord, CatalogStore, IwadRecord, RecordField, StoreError};
use wadshelf_db::SqliteCatalog;
use wadshelf_lib::{
    CancelToken, ContentCache, LibrarySyncEngine, SilentEvents, SyncEvents, SyncOutcome,
    SyncResult, diff_names,
};
use zip::write::SimpleFileOptions;

// ── Fixtures ────────────────────────────────────────────────────────────────

/// Build a WAD image with the given magic and lump names (all zero-length
/// except for a small padding lump so sizes differ between fixtures).
fn make_wad(magic: &[u8; 4], lumps: &[&str], padding: usize) -> Vec<u8> {
    let data_len = padding as u32;
    let table_offset = 12 + data_len;

    let mut wad = Vec::new();
    wad.extend_from_slice(magic);
    wad.extend_from_slice(&(lumps.len() as i32).to_le_bytes());
    wad.extend_from_slice(&(table_offset as i32).to_le_bytes());
    wad.extend(std::iter::repeat_n(0u8, padding));
    for name in lumps {
        wad.extend_from_slice(&12i32.to_le_bytes());
        wad.extend_from_slice(&0i32.to_le_bytes());
        let mut raw = [0u8; 8];
        raw[..name.len()].copy_from_slice(name.as_bytes());
        wad.extend_from_slice(&raw);
    }
    wad
}

fn write_zip(path: &Path, files: &[(&str, Vec<u8>)]) {
    let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
    for (name, data) in files {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap();
}

struct Library {
    dir: TempDir,
    store: SqliteCatalog,
}

impl Library {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("games")).unwrap();
        Self {
            dir,
            store: SqliteCatalog::memory().unwrap(),
        }
    }

    fn games(&self) -> std::path::PathBuf {
        self.dir.path().join("games")
    }

    fn temp(&self) -> std::path::PathBuf {
        self.dir.path().join("temp")
    }

    fn write(&self, name: &str, data: &[u8]) {
        std::fs::write(self.games().join(name), data).unwrap();
    }

    fn scratch_count(&self) -> usize {
        std::fs::read_dir(self.temp()).unwrap().count()
    }

    fn sync(&self, files: &[&str]) -> SyncResult {
        self.sync_with(files, &SilentEvents, &CancelToken::new())
    }

    fn sync_with(&self, files: &[&str], events: &dyn SyncEvents, cancel: &CancelToken) -> SyncResult {
        self.sync_into(&self.store, files, events, cancel)
    }

    fn sync_into(
        &self,
        store: &dyn CatalogStore,
        files: &[&str],
        events: &dyn SyncEvents,
        cancel: &CancelToken,
    ) -> SyncResult {
        let cache = ContentCache::new(self.temp()).unwrap();
        let engine = LibrarySyncEngine::new(self.games(), cache, store);
        let files: Vec<String> = files.iter().map(|f| f.to_string()).collect();
        engine.execute(&files, events, cancel)
    }

    fn record(&self, name: &str) -> CatalogRecord {
        self.store.get_record_by_name(name).unwrap().unwrap()
    }
}

/// Wraps a catalog and rejects writes for the named files.
struct FailingWrites<'a> {
    inner: &'a SqliteCatalog,
    broken: BTreeSet<String>,
}

impl<'a> FailingWrites<'a> {
    fn new(inner: &'a SqliteCatalog, broken: &[&str]) -> Self {
        Self {
            inner,
            broken: broken.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn check(&self, name: &str) -> Result<(), StoreError> {
        if self.broken.contains(name) {
            return Err(StoreError::backend("disk I/O error"));
        }
        Ok(())
    }
}

impl CatalogStore for FailingWrites<'_> {
    fn get_record_by_name(&self, name: &str) -> Result<Option<CatalogRecord>, StoreError> {
        self.inner.get_record_by_name(name)
    }

    fn all_names(&self) -> Result<BTreeSet<String>, StoreError> {
        self.inner.all_names()
    }

    fn insert(&self, record: &mut CatalogRecord) -> Result<(), StoreError> {
        self.check(&record.file_name)?;
        self.inner.insert(record)
    }

    fn update(&self, record: &CatalogRecord, fields: &[RecordField]) -> Result<(), StoreError> {
        self.check(&record.file_name)?;
        self.inner.update(record, fields)
    }

    fn delete_by_name(&self, name: &str) -> Result<bool, StoreError> {
        self.inner.delete_by_name(name)
    }

    fn register_iwad(
        &self,
        iwad: &IwadRecord,
        record: &mut CatalogRecord,
    ) -> Result<i64, StoreError> {
        self.check(&record.file_name)?;
        self.inner.register_iwad(iwad, record)
    }

    fn iwad_record_ids(&self) -> Result<BTreeSet<i64>, StoreError> {
        self.inner.iwad_record_ids()
    }
}

fn assert_partitioned(result: &SyncResult, inputs: &[&str]) {
    let mut seen: Vec<&str> = result
        .added
        .iter()
        .chain(&result.updated)
        .chain(&result.skipped)
        .map(String::as_str)
        .chain(result.invalid.iter().map(|i| i.file_name.as_str()))
        .collect();
    seen.sort();
    let mut expected: Vec<&str> = inputs.to_vec();
    expected.sort();
    expected.dedup();
    assert_eq!(seen, expected);
}

// ── Plain WADs ──────────────────────────────────────────────────────────────

#[test]
fn unrecognized_plain_wad_is_added_without_maps() {
    let lib = Library::new();
    lib.write("MAP01.wad", b"this is not a wad file at all");

    let result = lib.sync(&["MAP01.wad"]);
    assert_eq!(result.added, vec!["MAP01.wad"]);

    let record = lib.record("MAP01.wad");
    assert_eq!(record.file_size, 29);
    assert_eq!(record.map, None);
    assert_eq!(record.map_count, None);
    assert_eq!(lib.scratch_count(), 0);
}

#[test]
fn recognized_plain_wad_gets_sorted_maps() {
    let lib = Library::new();
    let wad = make_wad(b"PWAD", &["MAP03", "THINGS", "MAP01", "MAP02"], 0);
    lib.write("MAP01.wad", &wad);

    lib.sync(&["MAP01.wad"]);
    let record = lib.record("MAP01.wad");
    assert_eq!(record.file_size, wad.len() as u64);
    assert_eq!(record.map.as_deref(), Some("MAP01, MAP02, MAP03"));
    assert_eq!(record.map_count, Some(3));
    assert_eq!(record.title, None);
}

#[test]
fn truncated_container_is_added_with_size_only() {
    let lib = Library::new();
    let mut wad = make_wad(b"PWAD", &["MAP01"], 0);
    let past_end = (wad.len() as i32 + 64).to_le_bytes();
    wad[8..12].copy_from_slice(&past_end);
    lib.write("broken.wad", &wad);

    let result = lib.sync(&["broken.wad"]);
    assert_eq!(result.outcome("broken.wad"), Some(SyncOutcome::Added));
    let record = lib.record("broken.wad");
    assert_eq!(record.file_size, wad.len() as u64);
    assert_eq!(record.map, None);
}

#[test]
fn iwad_gets_title_from_table() {
    let lib = Library::new();
    lib.write("doom2.wad", &make_wad(b"IWAD", &["MAP01"], 4));
    lib.write("mystery.wad", &make_wad(b"IWAD", &["E1M1"], 4));

    let result = lib.sync(&["doom2.wad", "mystery.wad"]);
    assert_eq!(lib.record("doom2.wad").title.as_deref(), Some("Doom II: Hell on Earth"));
    assert_eq!(lib.record("mystery.wad").title.as_deref(), Some("MYSTERY"));
    assert_eq!(result.iwad_files(), vec!["doom2.wad", "mystery.wad"]);
}

// ── Archives ────────────────────────────────────────────────────────────────

#[test]
fn archive_aggregates_maps_from_all_wads() {
    let lib = Library::new();
    write_zip(
        &lib.games().join("pack.zip"),
        &[
            ("part2.wad", make_wad(b"PWAD", &["MAP02", "MAP03"], 0)),
            ("part1.wad", make_wad(b"PWAD", &["MAP01", "MAP02"], 8)),
            ("readme.txt", b"nothing useful".to_vec()),
        ],
    );

    let result = lib.sync(&["pack.zip"]);
    assert_eq!(result.added, vec!["pack.zip"]);
    assert_eq!(result.reports[0].containers.len(), 2);

    let record = lib.record("pack.zip");
    assert_eq!(record.map.as_deref(), Some("MAP01, MAP02, MAP03"));
    assert_eq!(record.map_count, Some(3));
}

#[test]
fn archive_entries_are_deduplicated_across_runs() {
    let lib = Library::new();
    let e1m1 = make_wad(b"PWAD", &["E1M1"], 1024 - 28);
    assert_eq!(e1m1.len(), 1024);
    write_zip(
        &lib.games().join("E1M1.pk3"),
        &[("e1m1.wad", e1m1.clone()), ("alt/e1m1.wad", e1m1)],
    );

    let first = lib.sync(&["E1M1.pk3"]);
    assert_eq!(first.added, vec!["E1M1.pk3"]);
    assert_eq!(lib.scratch_count(), 1);

    let second = lib.sync(&["E1M1.pk3"]);
    assert_eq!(second.skipped, vec!["E1M1.pk3"]);
    assert_eq!(lib.scratch_count(), 1);
    assert!(second.reports[0].containers.iter().all(|c| c.reused));
}

#[test]
fn descriptor_fills_new_record() {
    let lib = Library::new();
    write_zip(
        &lib.games().join("scythe.zip"),
        &[
            ("scythe.wad", make_wad(b"PWAD", &["MAP01"], 0)),
            (
                "scythe.txt",
                b"Title : Scythe\nAuthor : Erik Alm\nRelease date : 05/12/2003\n".to_vec(),
            ),
        ],
    );

    lib.sync(&["scythe.zip"]);
    let record = lib.record("scythe.zip");
    assert_eq!(record.title.as_deref(), Some("Scythe"));
    assert_eq!(record.author.as_deref(), Some("Erik Alm"));
    assert_eq!(
        record.release_date,
        chrono::NaiveDate::from_ymd_opt(2003, 5, 12)
    );
}

#[test]
fn corrupt_archive_is_invalid_and_batch_continues() {
    let lib = Library::new();
    lib.write("broken.zip", b"PK but not really");
    lib.write("good.wad", &make_wad(b"PWAD", &["MAP01"], 0));

    let result = lib.sync(&["broken.zip", "good.wad"]);
    assert_eq!(result.invalid.len(), 1);
    assert_eq!(result.invalid[0].file_name, "broken.zip");
    assert_eq!(result.added, vec!["good.wad"]);
    assert!(lib.store.get_record_by_name("broken.zip").unwrap().is_none());
}

// ── Outcomes ────────────────────────────────────────────────────────────────

#[test]
fn missing_and_unsupported_files_are_invalid() {
    let lib = Library::new();
    lib.write("music.pk7", b"7z");

    let result = lib.sync(&["gone.wad", "music.pk7"]);
    assert_eq!(
        result.outcome("gone.wad"),
        Some(SyncOutcome::Invalid("not found".to_string()))
    );
    assert!(matches!(result.outcome("music.pk7"), Some(SyncOutcome::Invalid(_))));
    assert!(result.added.is_empty());
}

#[test]
fn changed_file_is_updated_and_unchanged_is_skipped() {
    let lib = Library::new();
    lib.write("a.wad", &make_wad(b"PWAD", &["MAP01"], 0));
    lib.write("b.wad", &make_wad(b"PWAD", &["MAP01"], 0));
    lib.sync(&["a.wad", "b.wad"]);

    lib.write("a.wad", &make_wad(b"PWAD", &["MAP01", "MAP02"], 0));
    let result = lib.sync(&["a.wad", "b.wad"]);
    assert_eq!(result.updated, vec!["a.wad"]);
    assert_eq!(result.skipped, vec!["b.wad"]);
    assert_eq!(
        result.reports[0].changed_fields,
        vec![RecordField::FileSize, RecordField::Map, RecordField::MapCount]
    );
    assert_eq!(lib.record("a.wad").map_count, Some(2));
}

#[test]
fn failed_insert_is_invalid_and_batch_continues() {
    let lib = Library::new();
    lib.write("bad.wad", &make_wad(b"PWAD", &["MAP01"], 0));
    lib.write("good.wad", &make_wad(b"PWAD", &["MAP02"], 0));
    let store = FailingWrites::new(&lib.store, &["bad.wad"]);

    let result = lib.sync_into(
        &store,
        &["bad.wad", "good.wad"],
        &SilentEvents,
        &CancelToken::new(),
    );

    assert_eq!(result.invalid.len(), 1);
    assert_eq!(result.invalid[0].file_name, "bad.wad");
    assert!(result.invalid[0].reason.contains("disk I/O error"));
    assert_eq!(result.added, vec!["good.wad"]);
    assert!(lib.store.get_record_by_name("bad.wad").unwrap().is_none());
    assert_eq!(lib.record("good.wad").map.as_deref(), Some("MAP02"));
}

#[test]
fn failed_update_is_invalid_and_batch_continues() {
    let lib = Library::new();
    lib.write("a.wad", &make_wad(b"PWAD", &["MAP01"], 0));
    lib.write("b.wad", &make_wad(b"PWAD", &["MAP01"], 0));
    lib.sync(&["a.wad", "b.wad"]);

    lib.write("a.wad", &make_wad(b"PWAD", &["MAP01", "MAP02"], 0));
    lib.write("b.wad", &make_wad(b"PWAD", &["MAP01", "MAP02"], 0));
    let store = FailingWrites::new(&lib.store, &["a.wad"]);
    let result = lib.sync_into(&store, &["a.wad", "b.wad"], &SilentEvents, &CancelToken::new());

    assert_eq!(
        result.outcome("a.wad"),
        Some(SyncOutcome::Invalid(
            "Catalog store error: disk I/O error".to_string()
        ))
    );
    assert_eq!(result.updated, vec!["b.wad"]);
    assert_eq!(lib.record("a.wad").map_count, Some(1));
    assert_eq!(lib.record("b.wad").map_count, Some(2));
}

#[test]
fn every_input_lands_in_one_bucket() {
    let lib = Library::new();
    lib.write("a.wad", &make_wad(b"PWAD", &["MAP01"], 0));
    lib.write("b.deh", b"Patch File for DeHackEd v3.0");
    lib.write("c.zip", b"junk");
    lib.sync(&["a.wad"]);

    let inputs = ["a.wad", "b.deh", "c.zip", "d.wad", "b.deh"];
    let result = lib.sync(&inputs);
    assert_partitioned(&result, &inputs);
    assert_eq!(result.processed(), 4);
}

#[test]
fn cancelled_run_returns_partial_result() {
    struct CancelAfterFirst<'a>(&'a CancelToken);
    impl SyncEvents for CancelAfterFirst<'_> {
        fn on_progress(&self, current: usize, _total: usize, _file_name: &str) {
            if current == 1 {
                self.0.cancel();
            }
        }
        fn on_data_needed(&self, _record: &mut CatalogRecord) {}
    }

    let lib = Library::new();
    for name in ["a.wad", "b.wad", "c.wad"] {
        lib.write(name, &make_wad(b"PWAD", &[], 0));
    }
    let cancel = CancelToken::new();
    let result = lib.sync_with(&["a.wad", "b.wad", "c.wad"], &CancelAfterFirst(&cancel), &cancel);

    assert!(result.cancelled);
    assert_eq!(result.added, vec!["a.wad"]);
    assert!(lib.store.get_record_by_name("b.wad").unwrap().is_none());
}

#[test]
fn data_needed_fires_for_new_records_only() {
    struct FillAuthor(RefCell<Vec<String>>);
    impl SyncEvents for FillAuthor {
        fn on_progress(&self, _current: usize, _total: usize, _file_name: &str) {}
        fn on_data_needed(&self, record: &mut CatalogRecord) {
            self.0.borrow_mut().push(record.file_name.clone());
            record.author = Some("Downloader".to_string());
        }
    }

    let lib = Library::new();
    lib.write("a.wad", &make_wad(b"PWAD", &[], 0));
    let events = FillAuthor(RefCell::new(Vec::new()));
    lib.sync_with(&["a.wad"], &events, &CancelToken::new());
    lib.sync_with(&["a.wad"], &events, &CancelToken::new());

    assert_eq!(*events.0.borrow(), vec!["a.wad"]);
    assert_eq!(lib.record("a.wad").author.as_deref(), Some("Downloader"));
}

#[test]
fn diff_feeds_sync_of_disk_only_files() {
    let lib = Library::new();
    lib.write("old.wad", &make_wad(b"PWAD", &[], 0));
    lib.write("new.wad", &make_wad(b"PWAD", &[], 0));
    lib.sync(&["old.wad"]);
    lib.store
        .insert(&mut CatalogRecord::new("orphan.wad"))
        .unwrap();

    let diff = diff_names(["old.wad", "new.wad"], lib.store.all_names().unwrap());
    let disk_only: Vec<&str> = diff.disk_only.iter().map(String::as_str).collect();
    assert_eq!(disk_only, vec!["new.wad"]);
    assert!(diff.catalog_only.contains("orphan.wad"));

    let result = lib.sync(&disk_only);
    assert_eq!(result.added, vec!["new.wad"]);
}
