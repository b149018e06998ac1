//! In-memory disk manager.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use basalt_common::constants::PAGE_SIZE;
use basalt_common::types::PageId;
use parking_lot::Mutex;

use super::DiskManager;

/// A [`DiskManager`] that keeps pages in a hash map.
///
/// Besides serving as a fileless backing store, it records every write in
/// order, which lets tests assert that dirty victims reach the disk before
/// their frame is reused.
#[derive(Default)]
pub struct MemoryDiskManager {
    pages: Mutex<HashMap<PageId, Vec<u8>>>,
    write_log: Mutex<Vec<PageId>>,
    reads: AtomicU64,
    writes: AtomicU64,
}

impl MemoryDiskManager {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `read_page` calls observed.
    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Number of `write_page` calls observed.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    /// Page ids in the order they were written.
    pub fn write_log(&self) -> Vec<PageId> {
        self.write_log.lock().clone()
    }
}

impl DiskManager for MemoryDiskManager {
    fn read_page(&self, page_id: PageId, buf: &mut [u8]) {
        debug_assert_eq!(buf.len(), PAGE_SIZE);
        self.reads.fetch_add(1, Ordering::Relaxed);
        match self.pages.lock().get(&page_id) {
            Some(data) => buf.copy_from_slice(data),
            None => buf.fill(0),
        }
    }

    fn write_page(&self, page_id: PageId, data: &[u8]) {
        debug_assert_eq!(data.len(), PAGE_SIZE);
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.pages.lock().insert(page_id, data.to_vec());
        self.write_log.lock().push(page_id);
    }
}

impl std::fmt::Debug for MemoryDiskManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDiskManager")
            .field("pages", &self.pages.lock().len())
            .field("reads", &self.read_count())
            .field("writes", &self.write_count())
            .finish()
    }
}
