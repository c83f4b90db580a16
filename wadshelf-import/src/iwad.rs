//! Register catalog files as IWADs.

use wadshelf_core::{CatalogStore, IwadRecord};
use wadshelf_wad::iwad_title;

/// Result of registering a batch of files as IWADs.
#[derive(Debug, Default)]
pub struct RegisterReport {
    /// Newly registered files with their IWAD ids.
    pub registered: Vec<(String, i64)>,
    /// Files that were already linked to an IWAD.
    pub already_registered: Vec<String>,
    /// Files that could not be registered, with the reason.
    pub failed: Vec<(String, String)>,
}

/// Register each named catalog file as an IWAD.
///
/// A registered file gets an IWAD row named after the file, its title set
/// from the known IWAD table and its `iwad_id` pointing at the new row.
/// Files that already carry an `iwad_id` are left alone.
pub fn register_iwads(store: &dyn CatalogStore, names: &[String]) -> RegisterReport {
    let mut report = RegisterReport::default();

    for name in names {
        let mut record = match store.get_record_by_name(name) {
            Ok(Some(r)) => r,
            Ok(None) => {
                report
                    .failed
                    .push((name.clone(), "not in catalog".to_string()));
                continue;
            }
            Err(e) => {
                report.failed.push((name.clone(), e.to_string()));
                continue;
            }
        };
        if record.iwad_id.is_some() {
            report.already_registered.push(name.clone());
            continue;
        }
        let Some(record_id) = record.id else {
            report
                .failed
                .push((name.clone(), "record has no id".to_string()));
            continue;
        };

        let iwad = IwadRecord {
            id: None,
            record_id,
            name: record.file_name.clone(),
            file_name: record.file_name.clone(),
        };
        record.title = Some(iwad_title(&record.file_name));
        match store.register_iwad(&iwad, &mut record) {
            Ok(iwad_id) => {
                log::info!("Registered {} as IWAD {}", name, iwad_id);
                report.registered.push((name.clone(), iwad_id));
            }
            Err(e) => {
                log::warn!("Failed to register {} as IWAD: {}", name, e);
                report.failed.push((name.clone(), e.to_string()));
            }
        }
    }

    report
}
