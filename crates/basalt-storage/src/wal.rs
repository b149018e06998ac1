//! Write-ahead log handle.
//!
//! The buffer pool holds a [`LogManager`] for the recovery integration that
//! will eventually need it; nothing in the pool calls into it yet. It
//! dispenses log sequence numbers and tracks the flush horizon.

use std::sync::atomic::{AtomicU64, Ordering};

use basalt_common::types::Lsn;

/// Dispenses log sequence numbers and tracks which are durable.
pub struct LogManager {
    /// Next LSN to hand out.
    next_lsn: AtomicU64,
    /// Highest LSN known to be durable.
    flushed_lsn: AtomicU64,
}

impl LogManager {
    /// Creates a log manager starting at the first valid LSN.
    pub fn new() -> Self {
        Self {
            next_lsn: AtomicU64::new(Lsn::FIRST.as_u64()),
            flushed_lsn: AtomicU64::new(Lsn::INVALID.as_u64()),
        }
    }

    /// Returns the next LSN and advances the counter.
    pub fn next_lsn(&self) -> Lsn {
        Lsn::new(self.next_lsn.fetch_add(1, Ordering::Relaxed))
    }

    /// Highest LSN known to be durable.
    pub fn flushed_lsn(&self) -> Lsn {
        Lsn::new(self.flushed_lsn.load(Ordering::Acquire))
    }

    /// Records that all records up to `lsn` are durable.
    pub fn set_flushed_lsn(&self, lsn: Lsn) {
        self.flushed_lsn.store(lsn.as_u64(), Ordering::Release);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LogManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogManager")
            .field("next_lsn", &self.next_lsn.load(Ordering::Relaxed))
            .field("flushed_lsn", &self.flushed_lsn())
            .finish()
    }
}
