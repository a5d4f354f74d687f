use std::thread;
use std::time::Duration;
use time::OffsetDateTime;

use crate::id::Id;

/// Generator of identifiers tagged with a worker number.
///
/// Each node runs with its own worker number, so identifiers generated by
/// different nodes never collide.
#[derive(Debug, Clone, Copy)]
pub struct WorkerIdGenerator {
    worker: u16,
    next: u16,
}

/// Pause after the sequence wraps, so the next batch lands on a later millisecond.
const SLEEP_DURATION: Duration = Duration::from_millis(1);

impl WorkerIdGenerator {
    #[must_use]
    pub const fn new(worker: u16) -> Self {
        Self { worker, next: 0 }
    }

    /// Generates the next id.
    ///
    /// # Examples
    ///
    /// ```
    /// use bookshelf_common::id::worker::WorkerIdGenerator;
    ///
    /// let mut g = WorkerIdGenerator::new(1);
    /// assert_ne!(g.generate(), g.generate());
    /// ```
    pub fn generate(&mut self) -> Id {
        let id = Id::from_worker_parts(OffsetDateTime::now_utc(), self.worker, self.next);
        if self.advance() {
            thread::sleep(SLEEP_DURATION);
        }
        id
    }

    /// The same as [`Self::generate`] but yields to the runtime instead of
    /// blocking the thread when the sequence wraps.
    #[cfg(feature = "tokio")]
    pub async fn generate_async(&mut self) -> Id {
        let id = Id::from_worker_parts(OffsetDateTime::now_utc(), self.worker, self.next);
        if self.advance() {
            tokio::time::sleep(SLEEP_DURATION).await;
        }
        id
    }

    /// Returns `true` when the sequence wrapped around.
    fn advance(&mut self) -> bool {
        if self.next == u16::MAX {
            self.next = 0;
            true
        } else {
            self.next += 1;
            false
        }
    }
}
