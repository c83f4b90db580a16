//! Catalog enrichment for the wadshelf library.
//!
//! This crate owns everything that changes catalog records from outside the
//! game file directory: reconciling records against a remote metadata
//! source, and registering files as IWADs.

pub mod iwad;
pub mod progress;
pub mod reconcile;

pub use iwad::{RegisterReport, register_iwads};
pub use progress::{LogProgress, RefreshProgress, SilentProgress};
pub use reconcile::{
    DeferDisambiguator, Disambiguator, MetadataOutcome, ReconcileError, RefreshOptions,
    RefreshReport, Selection, default_refresh_fields, find_remote, merge_fields,
    refresh_metadata, select_remote,
};
