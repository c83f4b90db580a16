use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use wadshelf_core::CatalogStore;

use super::{Overrides, load_settings, open_catalog};
use crate::CliError;

/// Print the level markers of a WAD file on disk, or the stored level list
/// of a catalog record.
pub(crate) fn run_maps(overrides: &Overrides, target: &str) -> Result<(), CliError> {
    let path = Path::new(target);
    if path.is_file() {
        let maps = wadshelf_wad::read_map_names(path)
            .map_err(|e| CliError::other(format!("{}: {}", target, e)))?;
        print_maps(target, &maps);
        return Ok(());
    }

    let settings = load_settings(overrides)?;
    let catalog = open_catalog(&settings)?;
    match catalog.get_record_by_name(target)? {
        Some(record) => {
            print_maps(record.display_title(), &record.maps());
            Ok(())
        }
        None => Err(CliError::other(format!(
            "{} is neither a file nor a catalog record",
            target
        ))),
    }
}

fn print_maps(label: &str, maps: &[String]) {
    if maps.is_empty() {
        log::info!(
            "{}: {}",
            label.if_supports_color(Stdout, |t| t.bold()),
            "no levels".if_supports_color(Stdout, |t| t.dimmed()),
        );
        return;
    }
    log::info!(
        "{} ({} levels)",
        label.if_supports_color(Stdout, |t| t.bold()),
        maps.len()
    );
    log::info!("  {}", maps.join(", "));
}
