//! Frame - a slot in the buffer pool.
//!
//! A [`Frame`] binds one [`Page`] buffer to its bookkeeping: which page is
//! loaded, how many callers hold a pin, and whether the bytes diverge from
//! disk. Pin count and the page latch are orthogonal protections: the pin
//! keeps the frame from being evicted, the latch keeps the bytes from being
//! mutated concurrently.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use parking_lot::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::common::PageId;
use crate::storage::page::Page;

/// A frame in the buffer pool.
///
/// All fields use interior mutability so a fixed `Vec<Frame>` can be shared
/// across threads without an outer lock:
/// - `page`: `RwLock` - the per-page read/write latch
/// - `page_id`: `Mutex` - which page is bound, if any
/// - `pin_count` / `is_dirty`: atomics
pub struct Frame {
    /// Page bytes, behind the per-page latch.
    page: RwLock<Page>,

    /// Page currently bound to this frame, or `None` if free.
    page_id: Mutex<Option<PageId>>,

    /// Number of active pins.
    pin_count: AtomicU32,

    /// Whether the page bytes have diverged from disk.
    is_dirty: AtomicBool,
}

impl Frame {
    /// Create a new empty frame.
    pub fn new() -> Self {
        Self {
            page: RwLock::new(Page::new()),
            page_id: Mutex::new(None),
            pin_count: AtomicU32::new(0),
            is_dirty: AtomicBool::new(false),
        }
    }

    /// Acquire the shared page latch.
    #[inline]
    pub fn page(&self) -> RwLockReadGuard<'_, Page> {
        self.page.read()
    }

    /// Acquire the exclusive page latch.
    #[inline]
    pub fn page_mut(&self) -> RwLockWriteGuard<'_, Page> {
        self.page.write()
    }

    /// Page bound to this frame, if any.
    #[inline]
    pub fn page_id(&self) -> Option<PageId> {
        *self.page_id.lock()
    }

    /// Bind or unbind a page.
    #[inline]
    pub fn set_page_id(&self, page_id: Option<PageId>) {
        *self.page_id.lock() = page_id;
    }

    /// Increment the pin count. Returns the new count.
    #[inline]
    pub fn pin(&self) -> u32 {
        self.pin_count.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Decrement the pin count if it is positive.
    ///
    /// Returns the new count, or `None` if the count was already zero
    /// (an unpin without a matching pin).
    #[inline]
    pub fn try_unpin(&self) -> Option<u32> {
        self.pin_count
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |count| {
                count.checked_sub(1)
            })
            .ok()
            .map(|old| old - 1)
    }

    /// Current pin count.
    #[inline]
    pub fn pin_count(&self) -> u32 {
        self.pin_count.load(Ordering::Relaxed)
    }

    /// Whether any caller holds a pin.
    #[inline]
    pub fn is_pinned(&self) -> bool {
        self.pin_count() > 0
    }

    /// Mark the page bytes as diverged from disk.
    ///
    /// Monotonic: once dirty, only a successful flush clears the flag.
    #[inline]
    pub fn mark_dirty(&self) {
        self.is_dirty.store(true, Ordering::Relaxed);
    }

    /// Clear the dirty flag (after a successful flush).
    #[inline]
    pub fn clear_dirty(&self) {
        self.is_dirty.store(false, Ordering::Relaxed);
    }

    /// Whether the page bytes have diverged from disk.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.is_dirty.load(Ordering::Relaxed)
    }

    /// Whether the frame could be handed to the replacer as a victim.
    #[inline]
    pub fn is_evictable(&self) -> bool {
        self.page_id().is_some() && !self.is_pinned()
    }

    /// Return the frame to its empty state for reuse.
    pub fn reset(&self) {
        self.page_mut().reset();
        self.set_page_id(None);
        self.pin_count.store(0, Ordering::Relaxed);
        self.is_dirty.store(false, Ordering::Relaxed);
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}
