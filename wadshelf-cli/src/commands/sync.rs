use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use wadshelf_db::SqliteCatalog;
use wadshelf_lib::async_util::run_blocking_with_events;
use wadshelf_lib::{
    CancelToken, ChannelEvents, ContentCache, DirectorySource, GameFileDirectory,
    LibrarySettings, LibrarySyncEngine, SyncEvent, SyncResult,
};

use super::{Overrides, load_settings, plural};
use crate::{CliError, log_blank, spinner};

/// Sync named library files (or all of them) into the catalog.
pub(crate) fn run_sync(
    overrides: &Overrides,
    files: Vec<String>,
    all: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let settings = load_settings(overrides)?;
    let files: Vec<String> = if all {
        GameFileDirectory::new(settings.library_dir())
            .all_names()?
            .into_iter()
            .collect()
    } else {
        files
    };

    if files.is_empty() {
        log::warn!("No files to sync. Pass file names or --all.");
        return Ok(());
    }

    let result = sync_files(&settings, files, quiet)?;
    print_sync_result(&result);
    Ok(())
}

/// Run the sync engine on the blocking pool while drawing its progress.
///
/// Ctrl-C cancels the run after the file in progress.
pub(crate) fn sync_files(
    settings: &LibrarySettings,
    files: Vec<String>,
    quiet: bool,
) -> Result<SyncResult, CliError> {
    let library_dir = settings.library_dir();
    let temp_dir = settings.temp_directory.clone();
    let catalog_path = settings.catalog_path.clone();
    let date_formats = settings.date_parse_formats.clone();

    log::info!(
        "Syncing {} in {}",
        plural(files.len(), "file", "files"),
        library_dir
            .display()
            .if_supports_color(Stdout, |t| t.cyan()),
    );

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::runtime(format!("Failed to create tokio runtime: {}", e)))?;
    let cancel = CancelToken::new();
    let job_cancel = cancel.clone();
    let pb = spinner::file_bar(files.len() as u64, quiet);

    let joined = rt.block_on(async {
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });

        run_blocking_with_events(
            move |tx| -> Result<SyncResult, CliError> {
                let store = SqliteCatalog::open(&catalog_path)?;
                let cache = ContentCache::new(temp_dir)?;
                let engine = LibrarySyncEngine::new(library_dir, cache, &store)
                    .with_date_formats(date_formats);
                Ok(engine.execute(&files, &ChannelEvents::new(tx), &job_cancel))
            },
            |event| match event {
                SyncEvent::Progress {
                    current,
                    total,
                    file_name,
                } => {
                    pb.set_length(total as u64);
                    pb.set_position(current.saturating_sub(1) as u64);
                    pb.set_message(file_name);
                }
                SyncEvent::NewRecord(record) => {
                    log::debug!("New record: {}", record.file_name);
                }
            },
        )
        .await
    });
    pb.finish_and_clear();

    joined.map_err(|e| CliError::runtime(format!("Sync task failed: {}", e)))?
}

pub(crate) fn print_sync_result(result: &SyncResult) {
    for name in &result.added {
        log::info!("  {} {}", "+".if_supports_color(Stdout, |t| t.green()), name);
    }
    for name in &result.updated {
        log::info!("  {} {}", "~".if_supports_color(Stdout, |t| t.cyan()), name);
    }
    for invalid in &result.invalid {
        log::info!(
            "  {} {}: {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            invalid.file_name,
            invalid
                .reason
                .if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    log_blank();
    if result.cancelled {
        log::warn!("Sync cancelled");
    }
    log::info!(
        "{}",
        "Sync complete".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Added:    {:>6}", result.added.len());
    log::info!("  Updated:  {:>6}", result.updated.len());
    log::info!("  Skipped:  {:>6}", result.skipped.len());
    if !result.invalid.is_empty() {
        log::info!(
            "  Invalid:  {:>6}",
            result
                .invalid
                .len()
                .if_supports_color(Stdout, |t| t.red()),
        );
    }

    let iwads = result.iwad_files();
    if !iwads.is_empty() {
        log_blank();
        log::info!(
            "IWADs found: {}. Register them with 'wadshelf iwad register {}'.",
            iwads.join(", "),
            iwads.join(" "),
        );
    }
}
