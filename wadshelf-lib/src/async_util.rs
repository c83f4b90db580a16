//! Run a blocking library job off the async runtime while draining its events.
//!
//! The sync engine is synchronous and reports progress through
//! [`SyncEvents`](crate::events::SyncEvents). Frontends that live on a tokio
//! runtime hand the job a [`ChannelEvents`](crate::events::ChannelEvents)
//! sender and process events here as they arrive.

use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinError;
use tokio::time::{Duration, Instant};

/// Maximum time to drain remaining events after the job completes.
/// Guards against a sender that was cloned into something still alive.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Run `job` on the blocking thread pool, calling `on_event` for every event
/// it sends.
///
/// Returns the job's result once it has finished and its events have been
/// handled, or the join error if the job panicked.
pub async fn run_blocking_with_events<E, R, F>(
    job: F,
    mut on_event: impl FnMut(E),
) -> Result<R, JoinError>
where
    E: Send + 'static,
    R: Send + 'static,
    F: FnOnce(UnboundedSender<E>) -> R + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut task = tokio::task::spawn_blocking(move || job(tx));

    let mut result = None;
    let mut event_count: u64 = 0;
    loop {
        tokio::select! {
            r = &mut task => {
                result = Some(r);
                break;
            }
            event = rx.recv() => match event {
                Some(e) => {
                    event_count += 1;
                    on_event(e);
                }
                // The job dropped its sender early.
                None => break,
            }
        }
    }
    let result = match result {
        Some(r) => r,
        None => task.await,
    };

    let deadline = Instant::now() + DRAIN_TIMEOUT;
    loop {
        match tokio::time::timeout_at(deadline, rx.recv()).await {
            Ok(Some(e)) => {
                event_count += 1;
                on_event(e);
            }
            Ok(None) => break,
            Err(_) => {
                log::warn!(
                    "Event drain timed out after {}s, sender still alive",
                    DRAIN_TIMEOUT.as_secs()
                );
                break;
            }
        }
    }
    log::debug!("Blocking job finished ({} events)", event_count);

    result
}
