//! Metadata refresh progress reporting.

use crate::reconcile::MetadataOutcome;

/// Trait for receiving metadata refresh progress updates.
pub trait RefreshProgress {
    /// Called before each file is looked up.
    fn on_file(&self, current: usize, total: usize, name: &str);

    /// Called with the outcome for each file.
    fn on_outcome(&self, name: &str, outcome: &MetadataOutcome);
}

/// A no-op progress reporter that discards all updates.
pub struct SilentProgress;

impl RefreshProgress for SilentProgress {
    fn on_file(&self, _current: usize, _total: usize, _name: &str) {}
    fn on_outcome(&self, _name: &str, _outcome: &MetadataOutcome) {}
}

/// A progress reporter that logs to the `log` crate.
pub struct LogProgress;

impl RefreshProgress for LogProgress {
    fn on_file(&self, current: usize, total: usize, name: &str) {
        log::debug!("  [{}/{}] {}", current, total, name);
    }

    fn on_outcome(&self, name: &str, outcome: &MetadataOutcome) {
        match outcome {
            MetadataOutcome::Failed(reason) => log::warn!("{}: {}", name, reason),
            MetadataOutcome::IwadExcluded => {
                log::warn!("{}: IWAD without published metadata, skipped", name)
            }
            other => log::info!("{}: {}", name, other),
        }
    }
}
