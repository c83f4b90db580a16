use wadshelf_core::{CatalogRecord, CatalogStore};
use wadshelf_db::{SqliteCatalog, list_iwads};
use wadshelf_import::register_iwads;

fn catalog_with(files: &[&str]) -> SqliteCatalog {
    let store = SqliteCatalog::memory().unwrap();
    for name in files {
        store.insert(&mut CatalogRecord::new(*name)).unwrap();
    }
    store
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn register_links_record_to_new_iwad_row() {
    let store = catalog_with(&["DOOM2.WAD"]);

    let report = register_iwads(&store, &names(&["DOOM2.WAD"]));

    assert_eq!(report.registered.len(), 1);
    let (name, iwad_id) = &report.registered[0];
    assert_eq!(name, "DOOM2.WAD");

    let record = store.get_record_by_name("DOOM2.WAD").unwrap().unwrap();
    assert_eq!(record.iwad_id, Some(*iwad_id));
    assert_eq!(record.title.as_deref(), Some("Doom II: Hell on Earth"));
    assert!(store.iwad_record_ids().unwrap().contains(&record.id.unwrap()));

    let iwads = list_iwads(store.connection()).unwrap();
    assert_eq!(iwads.len(), 1);
    assert_eq!(iwads[0].file_name, "DOOM2.WAD");
}

#[test]
fn unknown_iwad_gets_uppercased_stem_title() {
    let store = catalog_with(&["mystery.wad"]);
    register_iwads(&store, &names(&["mystery.wad"]));

    let record = store.get_record_by_name("mystery.wad").unwrap().unwrap();
    assert_eq!(record.title.as_deref(), Some("MYSTERY"));
}

#[test]
fn registering_twice_is_a_no_op() {
    let store = catalog_with(&["TNT.WAD"]);
    register_iwads(&store, &names(&["TNT.WAD"]));

    let report = register_iwads(&store, &names(&["TNT.WAD"]));

    assert!(report.registered.is_empty());
    assert_eq!(report.already_registered, vec!["TNT.WAD"]);
    assert_eq!(list_iwads(store.connection()).unwrap().len(), 1);
}

#[test]
fn missing_files_are_reported() {
    let store = catalog_with(&["TNT.WAD"]);

    let report = register_iwads(&store, &names(&["ghost.wad", "TNT.WAD"]));

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "ghost.wad");
    assert_eq!(report.registered.len(), 1);
}

#[test]
fn failed_link_leaves_no_iwad_row() {
    let store = catalog_with(&["DOOM2.WAD"]);
    store
        .connection()
        .execute_batch(
            "CREATE TRIGGER block_updates BEFORE UPDATE ON game_files
             BEGIN SELECT RAISE(FAIL, 'catalog is read-only'); END;",
        )
        .unwrap();

    let report = register_iwads(&store, &names(&["DOOM2.WAD"]));

    assert!(report.registered.is_empty());
    assert_eq!(report.failed.len(), 1);
    assert!(list_iwads(store.connection()).unwrap().is_empty());
    assert!(store.iwad_record_ids().unwrap().is_empty());
    let record = store.get_record_by_name("DOOM2.WAD").unwrap().unwrap();
    assert_eq!(record.iwad_id, None);
    assert_eq!(record.title, None);

    // Once writes succeed again a retry registers exactly one row.
    store
        .connection()
        .execute_batch("DROP TRIGGER block_updates;")
        .unwrap();
    let report = register_iwads(&store, &names(&["DOOM2.WAD"]));
    assert_eq!(report.registered.len(), 1);
    assert_eq!(list_iwads(store.connection()).unwrap().len(), 1);
}
