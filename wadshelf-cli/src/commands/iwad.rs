use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use wadshelf_import::register_iwads;

use super::{Overrides, load_settings, open_catalog, plural};
use crate::{CliError, log_blank};

pub(crate) fn run_iwad_register(overrides: &Overrides, files: Vec<String>) -> Result<(), CliError> {
    let settings = load_settings(overrides)?;
    let catalog = open_catalog(&settings)?;

    let report = register_iwads(&catalog, &files);

    for (name, id) in &report.registered {
        log::info!(
            "  {} {} (IWAD {})",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            name,
            id
        );
    }
    for name in &report.already_registered {
        log::info!(
            "  {} {} {}",
            "-".if_supports_color(Stdout, |t| t.dimmed()),
            name,
            "(already registered)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    for (name, reason) in &report.failed {
        log::info!(
            "  {} {}: {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            name,
            reason
        );
    }

    log_blank();
    log::info!(
        "Registered {}",
        plural(report.registered.len(), "IWAD", "IWADs")
    );
    if !report.failed.is_empty() {
        return Err(CliError::other(format!(
            "{} could not be registered",
            plural(report.failed.len(), "file", "files")
        )));
    }
    Ok(())
}

pub(crate) fn run_iwad_list(overrides: &Overrides) -> Result<(), CliError> {
    let settings = load_settings(overrides)?;
    let catalog = open_catalog(&settings)?;
    let iwads = wadshelf_db::list_iwads(catalog.connection())?;

    if iwads.is_empty() {
        log::info!("No IWADs registered.");
        log::info!("Run 'wadshelf iwad register <FILE>...' to add one.");
        return Ok(());
    }

    log::info!("{}", "Registered IWADs:".if_supports_color(Stdout, |t| t.bold()));
    for iwad in &iwads {
        let title = match wadshelf_db::find_game_file_by_id(catalog.connection(), iwad.record_id)? {
            Some(record) => record.display_title().to_string(),
            None => wadshelf_wad::iwad_title(&iwad.file_name),
        };
        log::info!(
            "  {:>4}  {}  {}",
            iwad.id.unwrap_or_default(),
            iwad.file_name.if_supports_color(Stdout, |t| t.cyan()),
            title,
        );
    }
    Ok(())
}
