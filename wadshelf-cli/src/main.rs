//! wadshelf CLI
//!
//! Command-line interface for keeping a Doom WAD library directory and its
//! catalog database in sync.

mod cli_types;
mod commands;
mod error;
mod logging;
mod spinner;

use clap::Parser;

use cli_types::{Cli, Commands, ConfigAction, IwadAction};
use commands::Overrides;
pub(crate) use error::CliError;
pub(crate) use logging::log_blank;

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);

    let overrides = Overrides {
        library: cli.library,
        temp: cli.temp,
        db: cli.db,
    };
    let quiet = cli.quiet;

    let result = match cli.command {
        Commands::Sync { files, all } => commands::sync::run_sync(&overrides, files, all, quiet),
        Commands::Status {
            add,
            delete_orphans,
            delete_untracked,
            find,
        } => commands::status::run_status(
            &overrides,
            commands::status::StatusActions {
                add,
                delete_orphans,
                delete_untracked,
                find,
            },
            quiet,
        ),
        Commands::Meta {
            files,
            all,
            fields,
            no_prompt,
        } => commands::meta::run_meta(&overrides, files, all, fields, no_prompt),
        Commands::Iwad { action } => match action {
            IwadAction::Register { files } => commands::iwad::run_iwad_register(&overrides, files),
            IwadAction::List => commands::iwad::run_iwad_list(&overrides),
        },
        Commands::Maps { target } => commands::maps::run_maps(&overrides, &target),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(&overrides),
            ConfigAction::Path => commands::config::run_config_path(),
            ConfigAction::SetLibrary { path } => {
                commands::config::run_config_set_library(path.as_deref())
            }
        },
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
