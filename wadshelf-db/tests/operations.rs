use chrono::NaiveDate;
use wadshelf_core::{CatalogRecord, IwadRecord, RecordField};
use wadshelf_db::*;

fn scythe() -> CatalogRecord {
    let mut record = CatalogRecord::new("scythe.zip").with_size(2_310_442);
    record.title = Some("Scythe".to_string());
    record.author = Some("Erik Alm".to_string());
    record.release_date = NaiveDate::from_ymd_opt(2003, 5, 12);
    record.set_maps(&["MAP01".to_string(), "MAP02".to_string()]);
    record
}

#[test]
fn insert_and_find_game_file() {
    let conn = open_memory().unwrap();
    let id = insert_game_file(&conn, &scythe()).unwrap();

    let found = find_game_file_by_name(&conn, "scythe.zip").unwrap().unwrap();
    assert_eq!(found.id, Some(id));
    assert_eq!(found.file_size, 2_310_442);
    assert_eq!(found.title.as_deref(), Some("Scythe"));
    assert_eq!(found.release_date, NaiveDate::from_ymd_opt(2003, 5, 12));
    assert_eq!(found.map.as_deref(), Some("MAP01, MAP02"));
    assert_eq!(found.map_count, Some(2));
    assert_eq!(found.minutes_played, 0);

    let by_id = find_game_file_by_id(&conn, id).unwrap().unwrap();
    assert_eq!(by_id, found);
}

#[test]
fn find_missing_game_file_is_none() {
    let conn = open_memory().unwrap();
    assert!(find_game_file_by_name(&conn, "nope.wad").unwrap().is_none());
}

#[test]
fn duplicate_file_name_is_rejected() {
    let conn = open_memory().unwrap();
    insert_game_file(&conn, &scythe()).unwrap();
    assert!(matches!(
        insert_game_file(&conn, &scythe()),
        Err(OperationError::Sqlite(_))
    ));
}

#[test]
fn update_writes_only_listed_fields() {
    let conn = open_memory().unwrap();
    let id = insert_game_file(&conn, &scythe()).unwrap();

    let mut changed = scythe();
    changed.id = Some(id);
    changed.title = Some("Scythe (final)".to_string());
    changed.author = Some("Somebody Else".to_string());
    update_game_file(&conn, &changed, &[RecordField::Title]).unwrap();

    let found = find_game_file_by_name(&conn, "scythe.zip").unwrap().unwrap();
    assert_eq!(found.title.as_deref(), Some("Scythe (final)"));
    assert_eq!(found.author.as_deref(), Some("Erik Alm"));
}

#[test]
fn update_can_clear_a_field() {
    let conn = open_memory().unwrap();
    let id = insert_game_file(&conn, &scythe()).unwrap();

    let mut changed = scythe();
    changed.id = Some(id);
    changed.set_maps(&[]);
    update_game_file(&conn, &changed, &[RecordField::Map, RecordField::MapCount]).unwrap();

    let found = find_game_file_by_name(&conn, "scythe.zip").unwrap().unwrap();
    assert_eq!(found.map, None);
    assert_eq!(found.map_count, None);
}

#[test]
fn update_with_no_fields_is_noop() {
    let conn = open_memory().unwrap();
    let id = insert_game_file(&conn, &scythe()).unwrap();
    let mut changed = scythe();
    changed.id = Some(id);
    changed.title = None;
    update_game_file(&conn, &changed, &[]).unwrap();

    let found = find_game_file_by_name(&conn, "scythe.zip").unwrap().unwrap();
    assert_eq!(found.title.as_deref(), Some("Scythe"));
}

#[test]
fn update_requires_id() {
    let conn = open_memory().unwrap();
    assert!(matches!(
        update_game_file(&conn, &scythe(), &[RecordField::Title]),
        Err(OperationError::NotPersisted(_))
    ));
}

#[test]
fn update_unknown_id_is_not_found() {
    let conn = open_memory().unwrap();
    let mut record = scythe();
    record.id = Some(999);
    assert!(matches!(
        update_game_file(&conn, &record, &[RecordField::Title]),
        Err(OperationError::NotFound { .. })
    ));
}

#[test]
fn delete_game_file() {
    let conn = open_memory().unwrap();
    insert_game_file(&conn, &scythe()).unwrap();
    assert!(delete_game_file_by_name(&conn, "scythe.zip").unwrap());
    assert!(!delete_game_file_by_name(&conn, "scythe.zip").unwrap());
    assert!(all_file_names(&conn).unwrap().is_empty());
}

#[test]
fn deleting_iwad_file_unlinks_dependents() {
    let conn = open_memory().unwrap();
    let doom2_id = insert_game_file(&conn, &CatalogRecord::new("DOOM2.zip")).unwrap();
    let iwad_id = insert_iwad(
        &conn,
        &IwadRecord {
            id: None,
            record_id: doom2_id,
            name: "Doom II: Hell on Earth".to_string(),
            file_name: "DOOM2.zip".to_string(),
        },
    )
    .unwrap();

    let mut pwad = scythe();
    pwad.iwad_id = Some(iwad_id);
    insert_game_file(&conn, &pwad).unwrap();
    assert_eq!(iwad_game_file_ids(&conn).unwrap().into_iter().collect::<Vec<_>>(), vec![doom2_id]);

    delete_game_file_by_name(&conn, "DOOM2.zip").unwrap();
    assert!(list_iwads(&conn).unwrap().is_empty());
    let pwad = find_game_file_by_name(&conn, "scythe.zip").unwrap().unwrap();
    assert_eq!(pwad.iwad_id, None);
}

#[test]
fn stats_count_rows() {
    let conn = open_memory().unwrap();
    insert_game_file(&conn, &scythe()).unwrap();
    insert_game_file(&conn, &CatalogRecord::new("empty.wad").with_size(100)).unwrap();

    let stats = catalog_stats(&conn).unwrap();
    assert_eq!(stats.game_files, 2);
    assert_eq!(stats.total_bytes, 2_310_542);
    assert_eq!(stats.with_maps, 1);
    assert_eq!(stats.with_title, 1);
    assert_eq!(stats.iwads, 0);
}

#[test]
fn list_game_files_is_sorted() {
    let conn = open_memory().unwrap();
    for name in ["zdoom.wad", "av.zip", "mm2.zip"] {
        insert_game_file(&conn, &CatalogRecord::new(name)).unwrap();
    }
    let names: Vec<_> = list_game_files(&conn)
        .unwrap()
        .into_iter()
        .map(|r| r.file_name)
        .collect();
    assert_eq!(names, vec!["av.zip", "mm2.zip", "zdoom.wad"]);
}
