//! Library settings (`~/.config/wadshelf/settings.toml`).
//!
//! Every field has a default, so a missing file or a file with only a few
//! keys is valid. Frontends apply their command-line overrides on top of the
//! loaded values.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::descriptor::DEFAULT_DATE_FORMATS;
use crate::error::SettingsError;

const APP_DIR: &str = "wadshelf";

pub const DEFAULT_API_URL: &str = "https://www.doomworld.com/idgames/api/api.php";
pub const DEFAULT_MIRROR_URL: &str = "https://youfailit.net/pub/idgames/";

/// Canonical path to the settings file: `~/.config/wadshelf/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join(APP_DIR).join("settings.toml")
}

fn default_temp_directory() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
        .join("temp")
}

fn default_catalog_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("catalog.db")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdGamesSettings {
    /// JSON API endpoint.
    pub api_url: String,
    /// Mirror that serves the archive files.
    pub mirror_url: String,
}

impl Default for IdGamesSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            mirror_url: DEFAULT_MIRROR_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Directory holding the game files. Unset means the working directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_file_directory: Option<PathBuf>,
    /// Scratch directory for extracted archive entries.
    pub temp_directory: PathBuf,
    /// SQLite catalog file.
    pub catalog_path: PathBuf,
    /// `chrono` formats tried, in order, for descriptor release dates.
    pub date_parse_formats: Vec<String>,
    pub idgames: IdGamesSettings,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            game_file_directory: None,
            temp_directory: default_temp_directory(),
            catalog_path: default_catalog_path(),
            date_parse_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
            idgames: IdGamesSettings::default(),
        }
    }
}

impl LibrarySettings {
    /// Load from [`settings_path`], or defaults if the file does not exist.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&settings_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(toml::from_str(&contents)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write to `path` atomically (temp file + rename).
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        write_atomic(path, &toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Apply command-line overrides. `None` keeps the loaded value.
    pub fn with_overrides(
        mut self,
        library: Option<PathBuf>,
        temp: Option<PathBuf>,
        catalog: Option<PathBuf>,
    ) -> Self {
        if library.is_some() {
            self.game_file_directory = library;
        }
        if let Some(temp) = temp {
            self.temp_directory = temp;
        }
        if let Some(catalog) = catalog {
            self.catalog_path = catalog;
        }
        self
    }

    /// The game file directory, falling back to the working directory.
    pub fn library_dir(&self) -> PathBuf {
        match &self.game_file_directory {
            Some(p) => p.clone(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

/// Save (or clear) the game file directory in `settings.toml`.
///
/// Uses `toml::Value` for a surgical update so keys this version doesn't
/// know about are preserved.
pub fn save_library_path(path: Option<&Path>) -> io::Result<()> {
    save_library_path_to(&settings_path(), path)
}

pub fn save_library_path_to(settings: &Path, path: Option<&Path>) -> io::Result<()> {
    let mut doc: toml::Value = if let Ok(contents) = std::fs::read_to_string(settings) {
        contents
            .parse()
            .unwrap_or_else(|_| toml::Value::Table(Default::default()))
    } else {
        toml::Value::Table(Default::default())
    };

    let table = doc
        .as_table_mut()
        .ok_or_else(|| io::Error::other("settings.toml root is not a table"))?;
    match path {
        Some(p) => {
            table.insert(
                "game_file_directory".to_string(),
                toml::Value::String(p.to_string_lossy().into_owned()),
            );
        }
        None => {
            table.remove("game_file_directory");
        }
    }

    let serialized = toml::to_string_pretty(&doc).map_err(io::Error::other)?;
    write_atomic(settings, &serialized)
}

/// Load the settings file as a pretty-printed TOML string for display.
pub fn load_settings_string() -> Option<String> {
    let contents = std::fs::read_to_string(settings_path()).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}

fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)
}
