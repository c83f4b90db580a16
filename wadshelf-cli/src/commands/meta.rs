use std::io::{BufRead, IsTerminal, Write};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use wadshelf_core::{CatalogRecord, CatalogStore, RecordField};
use wadshelf_idgames::IdGamesClient;
use wadshelf_import::{
    DeferDisambiguator, Disambiguator, LogProgress, RefreshOptions, refresh_metadata,
};
use wadshelf_lib::CancelToken;

use super::{Overrides, load_settings, open_catalog, plural};
use crate::{CliError, log_blank};

/// Asks on the terminal which remote entry describes a file.
struct PromptDisambiguator;

impl Disambiguator for PromptDisambiguator {
    fn choose(&self, local: &CatalogRecord, candidates: &[&CatalogRecord]) -> Option<usize> {
        log_blank();
        log::info!(
            "{} has {} matches on idgames (local size {}):",
            local.file_name.if_supports_color(Stdout, |t| t.bold()),
            candidates.len(),
            wadshelf_core::util::format_bytes(local.file_size),
        );
        for (i, c) in candidates.iter().enumerate() {
            log::info!(
                "  {}) {} by {} ({}, {})",
                i + 1,
                c.display_title(),
                c.author.as_deref().unwrap_or("unknown"),
                wadshelf_core::util::format_bytes(c.file_size),
                c.release_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "no date".to_string()),
            );
        }
        print!("Pick a number, or press Enter to skip: ");
        std::io::stdout().flush().ok()?;

        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line).ok()?;
        let pick: usize = line.trim().parse().ok()?;
        pick.checked_sub(1).filter(|i| *i < candidates.len())
    }
}

/// Refresh catalog metadata from idgames.
pub(crate) fn run_meta(
    overrides: &Overrides,
    files: Vec<String>,
    all: bool,
    fields: Option<Vec<RecordField>>,
    no_prompt: bool,
) -> Result<(), CliError> {
    let settings = load_settings(overrides)?;
    let catalog = open_catalog(&settings)?;

    let names: Vec<String> = if all {
        catalog.all_names()?.into_iter().collect()
    } else {
        files
    };
    if names.is_empty() {
        log::warn!("No files to refresh. Pass file names or --all.");
        return Ok(());
    }

    let client = IdGamesClient::new(
        settings.idgames.api_url.clone(),
        settings.idgames.mirror_url.clone(),
    )?;
    let mut options = RefreshOptions {
        library_dir: Some(settings.library_dir()),
        ..RefreshOptions::default()
    };
    if let Some(fields) = fields {
        options.fields = fields;
    }
    let interactive = !no_prompt && std::io::stdin().is_terminal();
    let disambiguator: &dyn Disambiguator = if interactive {
        &PromptDisambiguator
    } else {
        &DeferDisambiguator
    };

    log::info!(
        "Refreshing {} from {}",
        plural(names.len(), "file", "files"),
        settings
            .idgames
            .api_url
            .if_supports_color(Stdout, |t| t.cyan()),
    );
    let report = refresh_metadata(
        &catalog,
        &client,
        &names,
        &options,
        disambiguator,
        &LogProgress,
        &CancelToken::new(),
    )?;

    log_blank();
    log::info!(
        "{}",
        "Metadata refresh complete".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Updated:    {:>6}", report.updated().len());
    log::info!("  Not found:  {:>6}", report.not_found().len());
    log::info!("  Ambiguous:  {:>6}", report.ambiguous().len());

    let iwads = report.iwad_warnings();
    if !iwads.is_empty() {
        log::warn!(
            "Skipped IWADs without idgames metadata: {}",
            iwads.join(", ")
        );
    }
    Ok(())
}
