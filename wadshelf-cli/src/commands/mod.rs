pub(crate) mod config;
pub(crate) mod iwad;
pub(crate) mod maps;
pub(crate) mod meta;
pub(crate) mod status;
pub(crate) mod sync;

use std::path::PathBuf;

use wadshelf_db::SqliteCatalog;
use wadshelf_lib::LibrarySettings;

use crate::CliError;

/// Global path flags that take precedence over `settings.toml`.
pub(crate) struct Overrides {
    pub library: Option<PathBuf>,
    pub temp: Option<PathBuf>,
    pub db: Option<PathBuf>,
}

/// Load settings and apply the command-line overrides.
pub(crate) fn load_settings(overrides: &Overrides) -> Result<LibrarySettings, CliError> {
    Ok(LibrarySettings::load()?.with_overrides(
        overrides.library.clone(),
        overrides.temp.clone(),
        overrides.db.clone(),
    ))
}

/// Open (creating if needed) the catalog named by the settings.
pub(crate) fn open_catalog(settings: &LibrarySettings) -> Result<SqliteCatalog, CliError> {
    log::debug!("Catalog: {}", settings.catalog_path.display());
    Ok(SqliteCatalog::open(&settings.catalog_path)?)
}

/// Pluralize a count for summary lines.
pub(crate) fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{} {}", n, if n == 1 { one } else { many })
}
