//! One-shot delay timers for sleeping replies.

use std::time::Duration;

use tokio::sync::mpsc::WeakUnboundedSender;
use tokio::task::JoinSet;
use tracing::Instrument;

/// Sent to a connection when the reply numbered `seq` may be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wakeup {
    pub seq: u64,
}

/// The outstanding delay timers of one connection.
///
/// Timers are aborted when the set is dropped or [`cancel_all`] is called,
/// so none outlives its connection.
///
/// [`cancel_all`]: DelayTimers::cancel_all
#[derive(Debug, Default)]
pub struct DelayTimers {
    tasks: JoinSet<bool>,
}

impl DelayTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a timer that wakes reply `seq` after `delay`.
    ///
    /// The timer only holds a weak handle to the connection's wakeup channel.
    /// If the channel is gone by the time it fires, the upgrade fails and the
    /// timer does nothing. The task yields `true` if the wakeup was delivered.
    pub fn schedule(&mut self, waker: WeakUnboundedSender<Wakeup>, seq: u64, delay: Duration) {
        self.tasks.spawn(
            async move {
                tokio::time::sleep(delay).await;

                let Some(tx) = waker.upgrade() else {
                    tracing::debug!(seq, "Timer fired after connection closed");
                    return false;
                };
                tx.send(Wakeup { seq }).is_ok()
            }
            .in_current_span(),
        );
    }

    /// Waits for the next timer to finish. Returns `None` when none are
    /// outstanding; an aborted timer yields `Some(false)`.
    pub async fn reap(&mut self) -> Option<bool> {
        let res = self.tasks.join_next().await?;
        Some(res.unwrap_or(false))
    }

    /// Aborts every outstanding timer, returning how many there were.
    pub fn cancel_all(&mut self) -> usize {
        let outstanding = self.tasks.len();
        self.tasks.abort_all();
        outstanding
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
