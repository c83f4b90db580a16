//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use wadshelf_core::RecordField;

#[derive(Parser)]
#[command(name = "wadshelf")]
#[command(about = "Keep a Doom WAD library and its catalog in sync", long_about = None)]
pub(crate) struct Cli {
    /// Game file directory (overrides settings.toml)
    #[arg(short, long, global = true)]
    pub library: Option<PathBuf>,

    /// Scratch directory for extracted archive entries
    #[arg(long, global = true)]
    pub temp: Option<PathBuf>,

    /// Catalog database file
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Read level lists and descriptors of library files into the catalog
    Sync {
        /// File names in the library directory
        files: Vec<String>,

        /// Sync every file in the library directory
        #[arg(short, long, conflicts_with = "files")]
        all: bool,
    },

    /// Compare the library directory with the catalog
    Status {
        /// Add files that are on disk but not in the catalog
        #[arg(long)]
        add: bool,

        /// Remove catalog records whose file is missing from disk
        #[arg(long)]
        delete_orphans: bool,

        /// Delete files on disk that are not in the catalog
        #[arg(long, conflicts_with = "add")]
        delete_untracked: bool,

        /// Look up missing catalog files on idgames
        #[arg(long)]
        find: bool,
    },

    /// Fill catalog metadata from the idgames archive
    Meta {
        /// Catalog file names
        files: Vec<String>,

        /// Refresh every catalog record
        #[arg(short, long, conflicts_with = "files")]
        all: bool,

        /// Fields to copy (e.g., title,author,release_date)
        #[arg(long, value_delimiter = ',')]
        fields: Option<Vec<RecordField>>,

        /// Skip files with several candidates instead of asking
        #[arg(long)]
        no_prompt: bool,
    },

    /// Manage registered IWADs
    Iwad {
        #[command(subcommand)]
        action: IwadAction,
    },

    /// Show the levels of a WAD file or catalog record
    Maps {
        /// Path to a .wad file, or a catalog file name
        target: String,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum IwadAction {
    /// Register catalog files as IWADs
    Register {
        /// Catalog file names
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// List registered IWADs
    List,
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the effective settings
    Show,

    /// Print the settings file path
    Path,

    /// Set the game file directory (omit the path to clear it)
    SetLibrary {
        path: Option<PathBuf>,
    },
}
