use std::collections::BTreeSet;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use wadshelf_core::{CatalogStore, RemoteError};
use wadshelf_idgames::IdGamesClient;
use wadshelf_import::find_remote;
use wadshelf_lib::{DirectorySource, GameFileDirectory, SyncDiff, diff_names};

use super::sync::{print_sync_result, sync_files};
use super::{Overrides, load_settings, open_catalog, plural};
use crate::spinner::spinner;
use crate::{CliError, log_blank};

/// Follow-up actions requested alongside `status`.
pub(crate) struct StatusActions {
    pub add: bool,
    pub delete_orphans: bool,
    pub delete_untracked: bool,
    pub find: bool,
}

/// Show the directory-versus-catalog diff and apply any requested fixes.
pub(crate) fn run_status(
    overrides: &Overrides,
    actions: StatusActions,
    quiet: bool,
) -> Result<(), CliError> {
    let settings = load_settings(overrides)?;
    let directory = GameFileDirectory::new(settings.library_dir());

    let diff = {
        let catalog = open_catalog(&settings)?;
        let diff = diff_names(directory.all_names()?, catalog.all_names()?);
        print_diff(&diff, &directory);

        if actions.delete_orphans {
            delete_orphans(&catalog, &diff.catalog_only)?;
        }
        diff
    };

    if actions.delete_untracked {
        delete_untracked(&directory, &diff.disk_only);
    }

    if actions.find && !diff.catalog_only.is_empty() {
        let client = IdGamesClient::new(
            settings.idgames.api_url.clone(),
            settings.idgames.mirror_url.clone(),
        )?;
        let missing: Vec<String> = diff.catalog_only.iter().cloned().collect();
        log_blank();
        let pb = spinner(
            format!("Looking up {} on idgames...", plural(missing.len(), "file", "files")),
            quiet,
        );
        let found = find_remote(&missing, |name| {
            client
                .search_by_filename(name)
                .map_err(RemoteError::from)
        });
        pb.finish_and_clear();
        let found = found?;
        if found.is_empty() {
            log::info!("None of the missing files are on idgames.");
        }
        for (name, files) in &found {
            for file in files {
                log::info!(
                    "  {} {} ({})",
                    name.if_supports_color(Stdout, |t| t.bold()),
                    file.title.as_deref().unwrap_or(&file.filename),
                    wadshelf_core::util::format_bytes(file.size.unwrap_or(0)),
                );
                log::info!(
                    "      {}",
                    client
                        .download_url(file)
                        .if_supports_color(Stdout, |t| t.dimmed())
                );
            }
        }
    }

    if actions.add && !diff.disk_only.is_empty() {
        log_blank();
        let files: Vec<String> = diff.disk_only.iter().cloned().collect();
        let result = sync_files(&settings, files, quiet)?;
        print_sync_result(&result);
    }

    Ok(())
}

fn print_diff(diff: &SyncDiff, directory: &GameFileDirectory) {
    log::info!(
        "{} {}",
        "Library:".if_supports_color(Stdout, |t| t.bold()),
        directory.root().display(),
    );
    log::info!("  In both:          {:>6}", diff.both.len());
    log::info!("  Not in catalog:   {:>6}", diff.disk_only.len());
    log::info!("  Missing on disk:  {:>6}", diff.catalog_only.len());

    if diff.is_in_sync() {
        log_blank();
        log::info!(
            "{}",
            "Library and catalog are in sync.".if_supports_color(Stdout, |t| t.green()),
        );
        return;
    }

    print_names("Not in catalog", "+", &diff.disk_only);
    print_names("Missing on disk", "-", &diff.catalog_only);
}

fn print_names(heading: &str, marker: &str, names: &BTreeSet<String>) {
    if names.is_empty() {
        return;
    }
    log_blank();
    log::info!("{}:", heading.if_supports_color(Stdout, |t| t.bold()));
    for name in names {
        log::info!(
            "  {} {}",
            marker.if_supports_color(Stdout, |t| t.dimmed()),
            name
        );
    }
}

fn delete_orphans(catalog: &dyn CatalogStore, names: &BTreeSet<String>) -> Result<(), CliError> {
    let mut removed = 0usize;
    for name in names {
        if catalog.delete_by_name(name)? {
            log::debug!("Removed catalog record {}", name);
            removed += 1;
        }
    }
    log_blank();
    log::info!(
        "Removed {} from the catalog",
        plural(removed, "record", "records")
    );
    Ok(())
}

fn delete_untracked(directory: &GameFileDirectory, names: &BTreeSet<String>) {
    let mut removed = 0usize;
    for name in names {
        match directory.delete(name) {
            Ok(true) => removed += 1,
            Ok(false) => {}
            Err(e) => log::warn!("Failed to delete {}: {}", name, e),
        }
    }
    log_blank();
    log::info!("Deleted {} from disk", plural(removed, "file", "files"));
}
