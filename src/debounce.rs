//! Restartable one-shot timer.
//!
//! [`Debouncer`] runs a callback once the input has been quiet for a fixed
//! delay. Scheduling again before the delay elapses aborts the pending timer
//! and starts a new one, so only the latest call ever fires. Each schedule
//! gets a sequence number; the callback receives it and should confirm it is
//! still current with [`Debouncer::complete`] before acting, which covers a
//! timer that fired just as it was being replaced.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Debounce timer backed by a spawned Tokio task.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    runtime: Handle,
    pending: Option<JoinHandle<()>>,
    sequence: u64,
}

impl Debouncer {
    /// Create a debouncer that spawns its timers on `runtime`.
    pub fn new(delay: Duration, runtime: Handle) -> Self {
        Self {
            delay,
            runtime,
            pending: None,
            sequence: 0,
        }
    }

    /// Quiet period before a scheduled callback fires.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// (Re)start the timer. Any previously scheduled callback is dropped.
    ///
    /// Returns the sequence number handed to `callback`.
    pub fn schedule<F>(&mut self, callback: F) -> u64
    where
        F: FnOnce(u64) + Send + 'static,
    {
        if let Some(previous) = self.pending.take() {
            previous.abort();
        }
        self.sequence += 1;
        let sequence = self.sequence;
        let delay = self.delay;

        log::trace!("Debounce #{} scheduled in {}ms", sequence, delay.as_millis());
        self.pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            callback(sequence);
        }));
        sequence
    }

    /// Drop the pending callback, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                handle.abort();
                log::trace!("Debounce #{} cancelled", self.sequence);
                true
            }
            None => false,
        }
    }

    /// Called from a firing callback: returns `true` and clears the pending
    /// slot if `sequence` is the latest schedule, `false` if it was
    /// superseded or cancelled.
    pub fn complete(&mut self, sequence: u64) -> bool {
        if sequence == self.sequence && self.pending.is_some() {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Whether a callback is waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
