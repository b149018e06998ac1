//! Replacement policies for the buffer pool.
//!
//! The pool depends only on the [`Replacer`] capability set, so alternative
//! policies (clock, LRU-K) can substitute without touching the manager.

use std::collections::VecDeque;

use parking_lot::Mutex;

use super::frame::FrameId;

/// Eviction-policy contract: a bounded, ordered set of frames that are
/// candidates for eviction.
///
/// Every operation takes `&self`; implementations lock themselves so they
/// stay safe to use standalone, even though the pool already serializes its
/// calls behind the manager latch.
pub trait Replacer: Send + Sync {
    /// Removes and returns the next victim, or `None` when no frame can be
    /// evicted.
    fn victim(&self) -> Option<FrameId>;

    /// Removes `frame_id` from the candidate set. No-op when absent. Called
    /// when a frame is freshly pinned or deleted.
    fn pin(&self, frame_id: FrameId);

    /// Adds `frame_id` as the most recently unpinned candidate. No-op when
    /// already present or when the set is at capacity.
    fn unpin(&self, frame_id: FrameId);

    /// Number of frames currently eligible for eviction.
    fn len(&self) -> usize;

    /// Returns true when no frame can be evicted.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Least-recently-unpinned replacement.
///
/// Candidates are kept in unpin order: the front of the queue is the oldest
/// candidate and the next victim, the back is the most recently unpinned.
/// Nothing reorders existing entries; recency is defined purely by
/// [`Replacer::unpin`] calls, never by page accesses.
pub struct LruReplacer {
    queue: Mutex<VecDeque<FrameId>>,
    capacity: usize,
}

impl LruReplacer {
    /// Creates a replacer that tracks at most `capacity` frames.
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }
}

impl Replacer for LruReplacer {
    fn victim(&self) -> Option<FrameId> {
        self.queue.lock().pop_front()
    }

    fn pin(&self, frame_id: FrameId) {
        let mut queue = self.queue.lock();
        if let Some(pos) = queue.iter().position(|&id| id == frame_id) {
            queue.remove(pos);
        }
    }

    fn unpin(&self, frame_id: FrameId) {
        let mut queue = self.queue.lock();
        if queue.iter().any(|&id| id == frame_id) {
            return;
        }
        // At capacity the extra candidate is dropped; the pool never tracks
        // more frames than it owns, so this branch is unreachable from the
        // manager.
        if queue.len() >= self.capacity {
            return;
        }
        queue.push_back(frame_id);
    }

    fn len(&self) -> usize {
        self.queue.lock().len()
    }
}

impl std::fmt::Debug for LruReplacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruReplacer")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}
