//! RAII guards for pinned page access.
//!
//! A guard is the only handle callers ever get to a resident page. It
//! holds both protections at once: the pin (taken before the guard is
//! built, keeping the frame from eviction) and the per-page latch
//! (shared for reads, exclusive for writes). Dropping the guard releases
//! the latch and unpins on every exit path, so pins cannot leak across
//! early returns or errors.

use std::fmt;
use std::ops::{Deref, DerefMut};

use parking_lot::{RwLockReadGuard, RwLockWriteGuard};

use crate::common::{FrameId, PageId};
use crate::storage::page::Page;

use super::buffer_pool_manager::BufferPoolManager;

/// Shared read access to a pinned page.
///
/// Any number of read guards may coexist for the same page.
pub struct PageReadGuard<'a> {
    bpm: &'a BufferPoolManager,
    frame_id: FrameId,
    page_id: PageId,
    latch: RwLockReadGuard<'a, Page>,
}

impl<'a> PageReadGuard<'a> {
    pub(crate) fn new(
        bpm: &'a BufferPoolManager,
        frame_id: FrameId,
        page_id: PageId,
        latch: RwLockReadGuard<'a, Page>,
    ) -> Self {
        Self {
            bpm,
            frame_id,
            page_id,
            latch,
        }
    }

    /// Id of the guarded page.
    #[inline]
    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    /// Release the latch and unpin before end of scope.
    #[inline]
    pub fn release(self) {
        drop(self);
    }
}

impl Deref for PageReadGuard<'_> {
    type Target = Page;

    #[inline]
    fn deref(&self) -> &Page {
        &self.latch
    }
}

impl Drop for PageReadGuard<'_> {
    fn drop(&mut self) {
        self.bpm.unpin_frame(self.frame_id, false);
    }
}

impl fmt::Debug for PageReadGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageReadGuard")
            .field("page_id", &self.page_id)
            .field("frame_id", &self.frame_id)
            .finish_non_exhaustive()
    }
}

/// Exclusive write access to a pinned page.
///
/// At most one write guard exists per page at a time; it excludes all
/// read guards. The page is marked dirty when the guard drops.
pub struct PageWriteGuard<'a> {
    bpm: &'a BufferPoolManager,
    frame_id: FrameId,
    page_id: PageId,
    latch: RwLockWriteGuard<'a, Page>,
}

impl<'a> PageWriteGuard<'a> {
    pub(crate) fn new(
        bpm: &'a BufferPoolManager,
        frame_id: FrameId,
        page_id: PageId,
        latch: RwLockWriteGuard<'a, Page>,
    ) -> Self {
        Self {
            bpm,
            frame_id,
            page_id,
            latch,
        }
    }

    /// Id of the guarded page.
    #[inline]
    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    /// Release the latch and unpin before end of scope.
    #[inline]
    pub fn release(self) {
        drop(self);
    }
}

impl Deref for PageWriteGuard<'_> {
    type Target = Page;

    #[inline]
    fn deref(&self) -> &Page {
        &self.latch
    }
}

impl DerefMut for PageWriteGuard<'_> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Page {
        &mut self.latch
    }
}

impl Drop for PageWriteGuard<'_> {
    fn drop(&mut self) {
        // A write guard conservatively dirties the page: exclusive access
        // was requested, so assume the bytes changed.
        self.bpm.unpin_frame(self.frame_id, true);
    }
}

impl fmt::Debug for PageWriteGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageWriteGuard")
            .field("page_id", &self.page_id)
            .field("frame_id", &self.frame_id)
            .finish_non_exhaustive()
    }
}
