use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use wadshelf_lib::settings::{load_settings_string, save_library_path, settings_path};

use super::{Overrides, load_settings};
use crate::{CliError, log_blank};

/// Show the effective settings (file values plus command-line overrides).
pub(crate) fn run_config_show(overrides: &Overrides) -> Result<(), CliError> {
    let path = settings_path();
    let settings = load_settings(overrides)?;

    log::info!(
        "{}",
        "wadshelf Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    log_blank();
    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found, using defaults)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log_blank();

    let library = match &settings.game_file_directory {
        Some(p) => p.display().to_string(),
        None => format!("{} (working directory)", settings.library_dir().display()),
    };
    let fields = [
        ("game_file_directory", library),
        (
            "temp_directory",
            settings.temp_directory.display().to_string(),
        ),
        ("catalog_path", settings.catalog_path.display().to_string()),
        (
            "date_parse_formats",
            settings.date_parse_formats.join(", "),
        ),
        ("idgames.api_url", settings.idgames.api_url.clone()),
        ("idgames.mirror_url", settings.idgames.mirror_url.clone()),
    ];
    for (name, value) in &fields {
        log::info!(
            "  {} {}",
            format!("{}:", name).if_supports_color(Stdout, |t| t.cyan()),
            value,
        );
    }

    if let Some(raw) = load_settings_string() {
        log_blank();
        log::debug!("settings.toml:\n{}", raw);
    }
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    log::info!("{}", settings_path().display());
    Ok(())
}

/// Persist (or clear) the game file directory.
pub(crate) fn run_config_set_library(path: Option<&Path>) -> Result<(), CliError> {
    let absolute = match path {
        Some(p) => Some(std::path::absolute(p)?),
        None => None,
    };
    save_library_path(absolute.as_deref())
        .map_err(|e| CliError::config(format!("Failed to save settings: {}", e)))?;

    match &absolute {
        Some(p) => log::info!(
            "Library directory set to {}",
            p.display().if_supports_color(Stdout, |t| t.cyan())
        ),
        None => log::info!("Library directory cleared"),
    }
    Ok(())
}
