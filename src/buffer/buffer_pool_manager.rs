//! Buffer Pool Manager - the page cache between callers and disk.
//!
//! The [`BufferPoolManager`] owns a fixed array of frames and maps page ids
//! onto them. Callers never see frames; they get RAII guards
//! ([`PageReadGuard`] / [`PageWriteGuard`]) that pin the page for their
//! lifetime and unpin on drop. When no frame is free, an unpinned victim is
//! chosen by the configured [`Replacer`] and written back first if dirty.
//!
//! # Locking
//! Lock order is page table, then replacer, then disk manager. The fetch
//! fast path takes only the page-table read lock; a miss upgrades to the
//! write lock, re-checks the table (another thread may have loaded the page
//! in the window), and performs the disk read and any eviction write-back
//! while still holding the write lock. That serializes misses, which is the
//! price of never having two frames load the same page.

use std::collections::HashMap;
use std::sync::atomic::Ordering;

use parking_lot::{Mutex, RwLock};

use crate::common::{Error, FrameId, PageId, Result};
use crate::storage::DiskManager;

use super::frame::Frame;
use super::page_guard::{PageReadGuard, PageWriteGuard};
use super::replacer::{LruReplacer, Replacer};
use super::stats::{BufferPoolStats, StatsSnapshot};

/// A fixed-size cache of pages backed by a [`DiskManager`].
pub struct BufferPoolManager {
    /// Fixed frame array; never grows or shrinks after construction.
    frames: Box<[Frame]>,

    /// Which frame holds which page. A page is resident iff it has an
    /// entry here.
    page_table: RwLock<HashMap<PageId, FrameId>>,

    /// Frames that have never held a page, or were released by
    /// `delete_page`.
    free_list: Mutex<Vec<FrameId>>,

    /// Victim-selection policy.
    replacer: Mutex<Box<dyn Replacer>>,

    disk: Mutex<DiskManager>,

    stats: BufferPoolStats,
}

impl BufferPoolManager {
    /// Create a buffer pool with `pool_size` frames and LRU eviction.
    ///
    /// # Panics
    /// Panics if `pool_size` is zero.
    pub fn new(disk: DiskManager, pool_size: usize) -> Self {
        Self::with_replacer(disk, pool_size, Box::new(LruReplacer::new()))
    }

    /// Create a buffer pool with a caller-supplied eviction policy.
    ///
    /// # Panics
    /// Panics if `pool_size` is zero.
    pub fn with_replacer(
        disk: DiskManager,
        pool_size: usize,
        replacer: Box<dyn Replacer>,
    ) -> Self {
        assert!(pool_size > 0, "buffer pool requires at least one frame");

        let frames: Box<[Frame]> = (0..pool_size).map(|_| Frame::new()).collect();
        // Hand out low-numbered frames first.
        let free_list = (0..pool_size).rev().map(FrameId).collect();

        log::debug!("buffer pool created with {} frames", pool_size);
        Self {
            frames,
            page_table: RwLock::new(HashMap::with_capacity(pool_size)),
            free_list: Mutex::new(free_list),
            replacer: Mutex::new(replacer),
            disk: Mutex::new(disk),
            stats: BufferPoolStats::new(),
        }
    }

    /// Fetch a page for shared read access.
    ///
    /// Loads the page from disk if it is not resident. The page stays
    /// pinned until the guard drops.
    ///
    /// # Errors
    /// `Error::PageNotFound` if the page was never allocated;
    /// `Error::PoolExhausted` if every frame is pinned.
    pub fn fetch_page_read(&self, page_id: PageId) -> Result<PageReadGuard<'_>> {
        let frame_id = self.pin_page(page_id)?;
        let latch = self.frames[frame_id.0].page();
        Ok(PageReadGuard::new(self, frame_id, page_id, latch))
    }

    /// Fetch a page for exclusive write access.
    ///
    /// The page is marked dirty when the guard drops.
    ///
    /// # Errors
    /// Same failure modes as [`BufferPoolManager::fetch_page_read`].
    pub fn fetch_page_write(&self, page_id: PageId) -> Result<PageWriteGuard<'_>> {
        let frame_id = self.pin_page(page_id)?;
        let latch = self.frames[frame_id.0].page_mut();
        Ok(PageWriteGuard::new(self, frame_id, page_id, latch))
    }

    /// Allocate a fresh page on disk and return it pinned for writing.
    ///
    /// The new page is zero-filled and already marked dirty, so it reaches
    /// disk even if the caller writes nothing.
    ///
    /// # Errors
    /// `Error::PoolExhausted` if every frame is pinned; `Error::Io` if the
    /// file cannot be extended.
    pub fn new_page(&self) -> Result<PageWriteGuard<'_>> {
        let page_id = self.disk.lock().allocate_page()?;

        let mut page_table = self.page_table.write();
        let frame_id = self.take_free_frame(&mut page_table)?;

        let frame = &self.frames[frame_id.0];
        frame.set_page_id(Some(page_id));
        frame.pin();
        frame.mark_dirty();
        page_table.insert(page_id, frame_id);

        let mut replacer = self.replacer.lock();
        replacer.record_access(frame_id);
        replacer.set_evictable(frame_id, false);
        drop(replacer);
        drop(page_table);

        log::trace!("{} allocated into {}", page_id, frame_id);
        let latch = frame.page_mut();
        Ok(PageWriteGuard::new(self, frame_id, page_id, latch))
    }

    /// Manually release one pin on a resident page.
    ///
    /// Guards unpin automatically; this is the explicit counterpart for
    /// callers doing their own pin accounting. `is_dirty` ors into the
    /// frame's dirty flag, it never clears it.
    ///
    /// # Errors
    /// `Error::InvalidUnpin` if the page is not resident or its pin count
    /// is already zero.
    pub fn unpin_page(&self, page_id: PageId, is_dirty: bool) -> Result<()> {
        let page_table = self.page_table.read();
        let frame_id = *page_table
            .get(&page_id)
            .ok_or(Error::InvalidUnpin(page_id))?;

        let frame = &self.frames[frame_id.0];
        match frame.try_unpin() {
            Some(remaining) => {
                if is_dirty {
                    frame.mark_dirty();
                }
                if remaining == 0 {
                    self.replacer.lock().set_evictable(frame_id, true);
                }
                Ok(())
            }
            None => Err(Error::InvalidUnpin(page_id)),
        }
    }

    /// Write one resident page back to disk and clear its dirty flag.
    ///
    /// A clean page is a no-op. Does not fsync; see
    /// [`BufferPoolManager::sync`].
    ///
    /// # Errors
    /// `Error::PageNotFound` if the page is not resident.
    pub fn flush_page(&self, page_id: PageId) -> Result<()> {
        let page_table = self.page_table.read();
        let frame_id = *page_table
            .get(&page_id)
            .ok_or(Error::PageNotFound(page_id))?;

        let frame = &self.frames[frame_id.0];
        if !frame.is_dirty() {
            return Ok(());
        }
        let latch = frame.page();
        self.disk.lock().write_page(page_id, &latch)?;
        frame.clear_dirty();
        self.stats.pages_written.fetch_add(1, Ordering::Relaxed);

        log::trace!("flushed {}", page_id);
        Ok(())
    }

    /// Write every dirty resident page back to disk, then force the file
    /// to stable storage.
    ///
    /// Clean pages are skipped. This is the clean-shutdown flush.
    pub fn flush_all_pages(&self) -> Result<()> {
        let page_table = self.page_table.read();
        let mut flushed = 0u64;

        for (&page_id, &frame_id) in page_table.iter() {
            let frame = &self.frames[frame_id.0];
            if !frame.is_dirty() {
                continue;
            }
            let latch = frame.page();
            self.disk.lock().write_page(page_id, &latch)?;
            frame.clear_dirty();
            flushed += 1;
        }

        self.stats.pages_written.fetch_add(flushed, Ordering::Relaxed);
        self.disk.lock().sync()?;
        log::debug!("flushed {} dirty pages", flushed);
        Ok(())
    }

    /// Force all previously written pages to stable storage.
    pub fn sync(&self) -> Result<()> {
        self.disk.lock().sync()
    }

    /// Drop a page from the pool, freeing its frame.
    ///
    /// The on-disk page is untouched; ids are never reused, so the slot in
    /// the file simply goes cold. A page that is not resident is a no-op.
    ///
    /// # Errors
    /// `Error::PagePinned` if any caller still holds a pin.
    pub fn delete_page(&self, page_id: PageId) -> Result<()> {
        let mut page_table = self.page_table.write();
        let Some(&frame_id) = page_table.get(&page_id) else {
            return Ok(());
        };

        let frame = &self.frames[frame_id.0];
        if frame.is_pinned() {
            return Err(Error::PagePinned(page_id));
        }

        page_table.remove(&page_id);
        self.replacer.lock().remove(frame_id);
        frame.reset();
        self.free_list.lock().push(frame_id);

        log::trace!("deleted {} from {}", page_id, frame_id);
        Ok(())
    }

    /// Total number of frames.
    #[inline]
    pub fn pool_size(&self) -> usize {
        self.frames.len()
    }

    /// Frames holding no page.
    pub fn free_frame_count(&self) -> usize {
        self.free_list.lock().len()
    }

    /// Number of pages allocated in the backing file.
    pub fn page_count(&self) -> u32 {
        self.disk.lock().page_count()
    }

    /// Current pin count of a resident page, or `None` if not resident.
    pub fn get_pin_count(&self, page_id: PageId) -> Option<u32> {
        let page_table = self.page_table.read();
        page_table
            .get(&page_id)
            .map(|frame_id| self.frames[frame_id.0].pin_count())
    }

    /// Point-in-time copy of the pool's counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Pin `page_id` into a frame, loading it from disk on a miss.
    fn pin_page(&self, page_id: PageId) -> Result<FrameId> {
        // Fast path: the pin happens under the table read lock, so the
        // frame cannot be evicted out from under us (eviction needs the
        // write lock).
        {
            let page_table = self.page_table.read();
            if let Some(&frame_id) = page_table.get(&page_id) {
                self.pin_resident(frame_id);
                self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
                return Ok(frame_id);
            }
        }

        let mut page_table = self.page_table.write();

        // Another thread may have loaded the page between our read and
        // write lock. Re-check before touching the disk.
        if let Some(&frame_id) = page_table.get(&page_id) {
            self.pin_resident(frame_id);
            self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(frame_id);
        }

        // Read before claiming a frame, so a failed read (unallocated id)
        // leaves the pool untouched.
        let image = self.disk.lock().read_page(page_id)?;
        self.stats.pages_read.fetch_add(1, Ordering::Relaxed);

        let frame_id = self.take_free_frame(&mut page_table)?;
        let frame = &self.frames[frame_id.0];
        *frame.page_mut() = image;
        frame.set_page_id(Some(page_id));
        frame.pin();
        page_table.insert(page_id, frame_id);

        let mut replacer = self.replacer.lock();
        replacer.record_access(frame_id);
        replacer.set_evictable(frame_id, false);

        self.stats.cache_misses.fetch_add(1, Ordering::Relaxed);
        log::trace!("{} loaded into {}", page_id, frame_id);
        Ok(frame_id)
    }

    /// Release one pin taken by a guard.
    ///
    /// Guards hold the frame id directly, so no page-table lookup is
    /// needed. Reaching zero hands the frame to the replacer.
    pub(crate) fn unpin_frame(&self, frame_id: FrameId, is_dirty: bool) {
        let frame = &self.frames[frame_id.0];
        if is_dirty {
            frame.mark_dirty();
        }
        match frame.try_unpin() {
            Some(0) => self.replacer.lock().set_evictable(frame_id, true),
            Some(_) => {}
            None => debug_assert!(false, "guard unpin without matching pin on {}", frame_id),
        }
    }

    /// Pin an already-resident frame and tell the replacer about the
    /// access. Caller holds the page-table lock in some mode.
    fn pin_resident(&self, frame_id: FrameId) {
        self.frames[frame_id.0].pin();
        let mut replacer = self.replacer.lock();
        replacer.record_access(frame_id);
        replacer.set_evictable(frame_id, false);
    }

    /// Claim an empty frame, evicting a victim if the free list is dry.
    ///
    /// Caller holds the page-table write lock; a dirty victim is written
    /// back under that lock, which keeps the victim's old mapping and its
    /// bytes consistent for the whole swap.
    fn take_free_frame(&self, page_table: &mut HashMap<PageId, FrameId>) -> Result<FrameId> {
        if let Some(frame_id) = self.free_list.lock().pop() {
            return Ok(frame_id);
        }

        let mut replacer = self.replacer.lock();
        let victim = loop {
            let Some(frame_id) = replacer.evict() else {
                return Err(Error::PoolExhausted {
                    pool_size: self.frames.len(),
                });
            };
            // A guard dropped between two replacer updates can leave a
            // pinned frame marked evictable. Skip it; its next unpin
            // re-registers it.
            if self.frames[frame_id.0].is_evictable() {
                break frame_id;
            }
        };

        let frame = &self.frames[victim.0];
        if let Some(old_id) = frame.page_id() {
            if frame.is_dirty() {
                let latch = frame.page();
                if let Err(err) = self.disk.lock().write_page(old_id, &latch) {
                    // Keep the victim resident and evictable; the caller
                    // sees the I/O error.
                    replacer.record_access(victim);
                    replacer.set_evictable(victim, true);
                    return Err(err);
                }
                self.stats.pages_written.fetch_add(1, Ordering::Relaxed);
            }
            page_table.remove(&old_id);
            self.stats.evictions.fetch_add(1, Ordering::Relaxed);
            log::debug!("evicted {} from {}", old_id, victim);
        }

        frame.reset();
        Ok(victim)
    }
}
