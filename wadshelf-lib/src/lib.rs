//! Library sync and archive ingestion for wadshelf.
//!
//! - Archive enumeration and extraction ([`archive`])
//! - Scratch-directory extraction cache ([`cache`])
//! - Directory-versus-catalog diff ([`diff`])
//! - idgames text descriptor parsing ([`descriptor`])
//! - Per-file ingestion ([`ingest`]) and batch sync ([`sync`])
//! - Events and cancellation ([`events`]), settings, and async helpers

pub mod archive;
pub mod async_util;
pub mod cache;
pub mod descriptor;
pub mod diff;
pub mod error;
pub mod events;
pub mod ingest;
pub mod scanner;
pub mod settings;
pub mod sync;

pub use archive::{ArchiveEntry, ArchiveReader, entries_by_extension, open_archive};
pub use cache::{ContentCache, ExtractedFile};
pub use diff::{SyncDiff, diff_names};
pub use error::{ArchiveError, CacheError, IngestError, SettingsError};
pub use events::{CancelToken, ChannelEvents, SilentEvents, SyncEvent, SyncEvents};
pub use ingest::{ContainerReport, IngestOutcome, IngestReport, IngestionPipeline};
pub use scanner::{DirectorySource, GameFileDirectory};
pub use settings::LibrarySettings;
pub use sync::{InvalidFile, LibrarySyncEngine, SyncOutcome, SyncResult};
