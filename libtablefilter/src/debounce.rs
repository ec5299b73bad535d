//! Debounced evaluation of free-text filters.
//!
//! Every keystroke in a free-text control reschedules the evaluation: the
//! previous [`DebounceHandle`] is dropped, which aborts its timer, and a new
//! one is spawned. When a timer survives its quiet period it posts a
//! [`FilterEvent`] to the owning table, which then runs one evaluation pass.
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;
use tracing::trace;

use crate::filter::FilterId;

/// Messages posted back to a [`crate::TableFilter`] by its background timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterEvent {
    /// The quiet period of a free-text filter elapsed.
    DebounceElapsed {
        filter: FilterId,
        /// Initialization the timer was scheduled under.
        generation: u64,
        /// Pattern revision the timer was scheduled for.
        revision: u64,
    },
}

/// The single outstanding scheduled evaluation of one free-text filter.
///
/// Dropping the handle cancels the evaluation.
#[derive(Debug)]
pub struct DebounceHandle {
    revision: u64,
    task: AbortHandle,
}

impl DebounceHandle {
    /// Spawns a timer posting `event` on `sender` after `delay`.
    ///
    /// Returns `None` when called outside a tokio runtime.
    pub fn schedule(
        delay: Duration,
        event: FilterEvent,
        sender: UnboundedSender<FilterEvent>,
    ) -> Option<Self> {
        let runtime = Handle::try_current().ok()?;
        let FilterEvent::DebounceElapsed { revision, .. } = event;

        let task = runtime
            .spawn(async move {
                tokio::time::sleep(delay).await;
                trace!(?event, "debounce elapsed");
                // The receiver is gone once the table was dropped.
                let _ = sender.send(event);
            })
            .abort_handle();

        Some(Self { revision, task })
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl Drop for DebounceHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
