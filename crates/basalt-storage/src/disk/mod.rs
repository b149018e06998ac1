//! Page-granular disk access.
//!
//! The buffer pool talks to the backing store through the [`DiskManager`]
//! trait: a synchronous block device that reads and writes page-sized
//! blocks addressed by [`PageId`]. Two implementations are provided:
//!
//! - [`FileDiskManager`] — a single database file on the local filesystem
//! - [`MemoryDiskManager`] — an in-memory store with an observable write
//!   log, used by tests

mod file;
mod memory;

pub use file::FileDiskManager;
pub use memory::MemoryDiskManager;

use basalt_common::types::PageId;

/// A synchronous, page-granular block device.
///
/// The buffer pool treats disk I/O as infallible: implementations report
/// faults through their own channels (logging, panics in test doubles)
/// rather than through these methods, and the pool carries no disk-fault
/// error taxonomy.
pub trait DiskManager: Send + Sync {
    /// Reads the block for `page_id` into `buf` (exactly one page).
    fn read_page(&self, page_id: PageId, buf: &mut [u8]);

    /// Writes one page-sized block for `page_id` from `data`.
    fn write_page(&self, page_id: PageId, data: &[u8]);
}
