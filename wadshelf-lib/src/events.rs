//! Sync notifications and cooperative cancellation.
//!
//! The engine calls a [`SyncEvents`] implementation synchronously from the
//! thread it runs on. Frontends that need the events on another thread use
//! [`ChannelEvents`] and drain the receiver themselves.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc::UnboundedSender;
use wadshelf_core::CatalogRecord;

/// Receives progress and data requests from a running sync.
pub trait SyncEvents {
    /// Called before file `current` (1-based) of `total` is processed.
    fn on_progress(&self, current: usize, total: usize, file_name: &str);

    /// Called for every newly created record before it is inserted.
    ///
    /// Implementations may fill in fields they already know, such as the
    /// title and author of a file the user just downloaded.
    fn on_data_needed(&self, record: &mut CatalogRecord);
}

/// Discards all events.
pub struct SilentEvents;

impl SyncEvents for SilentEvents {
    fn on_progress(&self, _current: usize, _total: usize, _file_name: &str) {}
    fn on_data_needed(&self, _record: &mut CatalogRecord) {}
}

/// An event forwarded over a channel by [`ChannelEvents`].
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    Progress {
        current: usize,
        total: usize,
        file_name: String,
    },
    /// A new record was created; carries the values it will be inserted with.
    NewRecord(CatalogRecord),
}

impl SyncEvent {
    /// Fraction of files started so far (0.0 to 1.0), for progress events.
    pub fn fraction(&self) -> Option<f64> {
        match self {
            Self::Progress { current, total, .. } if *total > 0 => {
                Some(*current as f64 / *total as f64)
            }
            _ => None,
        }
    }
}

/// Forwards events to a tokio channel.
///
/// Records are reported but not modified: a channel cannot answer the
/// synchronous data request.
pub struct ChannelEvents {
    tx: UnboundedSender<SyncEvent>,
}

impl ChannelEvents {
    pub fn new(tx: UnboundedSender<SyncEvent>) -> Self {
        Self { tx }
    }
}

impl SyncEvents for ChannelEvents {
    fn on_progress(&self, current: usize, total: usize, file_name: &str) {
        // A closed receiver only means nobody is watching anymore.
        let _ = self.tx.send(SyncEvent::Progress {
            current,
            total,
            file_name: file_name.to_string(),
        });
    }

    fn on_data_needed(&self, record: &mut CatalogRecord) {
        let _ = self.tx.send(SyncEvent::NewRecord(record.clone()));
    }
}

/// A cloneable flag checked by the engine between files.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!token.is_cancelled());
        clone.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_channel_events_forward() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let events = ChannelEvents::new(tx);
        events.on_progress(1, 4, "a.wad");
        let mut record = CatalogRecord::new("a.wad");
        events.on_data_needed(&mut record);

        let first = rx.try_recv().unwrap();
        assert_eq!(first.fraction(), Some(0.25));
        assert!(matches!(rx.try_recv().unwrap(), SyncEvent::NewRecord(r) if r.file_name == "a.wad"));
    }

    #[test]
    fn test_channel_events_ignore_closed_receiver() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        drop(rx);
        ChannelEvents::new(tx).on_progress(1, 1, "a.wad");
    }
}
