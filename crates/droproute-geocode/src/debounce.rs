//! Single-slot debouncing with a generation counter.
//!
//! Each call to [`Debouncer::run`] takes a new ticket. Only the holder of the
//! newest ticket gets to run its operation after the delay, and its result is
//! dropped if a newer call arrived while the operation was in flight.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Invalidates whatever call is pending or in flight.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Waits out the delay, then runs `operation` unless superseded.
    ///
    /// Returns `None` when a newer `run` or a [`cancel`](Self::cancel)
    /// happened before the operation finished.
    pub async fn run<T, F, Fut>(&self, operation: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        tokio::time::sleep(self.delay).await;
        if !self.is_current(ticket) {
            tracing::trace!(ticket, "debounced call superseded before start");
            return None;
        }

        let output = operation().await;
        if !self.is_current(ticket) {
            tracing::trace!(ticket, "debounced call superseded in flight");
            return None;
        }
        Some(output)
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }
}
