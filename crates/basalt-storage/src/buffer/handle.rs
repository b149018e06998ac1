//! Typed handles to pinned pages.
//!
//! A [`PageHandle`] is what `new_page` and `fetch_page` return instead of a
//! raw frame pointer: byte access is routed through the frame's own lock,
//! and releasing the pin is an explicit call back into the pool.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use basalt_common::types::PageId;

use super::frame::{Frame, FrameId};

/// Access to a page pinned in the buffer pool.
///
/// The handle does not unpin on drop. The holder must call
/// [`unpin_page`](super::pool::BufferPoolManager::unpin_page) exactly once,
/// passing `true` when the bytes were modified. After that call the handle
/// is stale: reads remain memory-safe but may observe a different page once
/// the frame is reused.
pub struct PageHandle {
    frame: Arc<Frame>,
    page_id: PageId,
}

impl PageHandle {
    pub(crate) fn new(frame: Arc<Frame>, page_id: PageId) -> Self {
        Self { frame, page_id }
    }

    /// Returns the id of the pinned page.
    #[inline]
    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    /// Returns the frame this page occupies.
    #[inline]
    pub fn frame_id(&self) -> FrameId {
        self.frame.frame_id()
    }

    /// Current pin count of the underlying frame.
    #[inline]
    pub fn pin_count(&self) -> u32 {
        self.frame.pin_count()
    }

    /// Whether the underlying frame is marked dirty.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.frame.is_dirty()
    }

    /// Read access to the page bytes.
    #[inline]
    pub fn data(&self) -> impl Deref<Target = [u8]> + '_ {
        PageDataRef {
            guard: self.frame.read_data(),
        }
    }

    /// Write access to the page bytes.
    ///
    /// Writing through the handle does not set the dirty flag; mutation is
    /// reported through `unpin_page(page_id, true)`.
    #[inline]
    pub fn data_mut(&mut self) -> impl DerefMut<Target = [u8]> + '_ {
        PageDataMut {
            guard: self.frame.write_data(),
        }
    }
}

impl std::fmt::Debug for PageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageHandle")
            .field("page_id", &self.page_id)
            .field("frame_id", &self.frame.frame_id())
            .field("pin_count", &self.frame.pin_count())
            .finish()
    }
}

/// Helper struct to provide Deref for page data.
struct PageDataRef<'a> {
    guard: parking_lot::RwLockReadGuard<'a, Vec<u8>>,
}

impl Deref for PageDataRef<'_> {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

/// Helper struct to provide DerefMut for page data.
struct PageDataMut<'a> {
    guard: parking_lot::RwLockWriteGuard<'a, Vec<u8>>,
}

impl Deref for PageDataMut<'_> {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl DerefMut for PageDataMut<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard
    }
}
