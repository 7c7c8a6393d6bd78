//! Heap file - an unordered collection of records across many pages.
//!
//! Grows the backing file on demand and places records first-fit: every
//! insert walks the pages from the start and takes the first one with
//! room, allocating a fresh page when nothing fits. Record order is
//! whatever placement produced.

use std::sync::Arc;

use crate::buffer::BufferPoolManager;
use crate::common::{Error, PageId, RecordId, Result};
use crate::storage::page::SlottedPage;

use super::record_manager::RecordManager;

/// Unordered record storage spanning the whole backing file.
pub struct HeapFile {
    manager: RecordManager,
}

impl HeapFile {
    pub fn new(bpm: Arc<BufferPoolManager>) -> Self {
        Self {
            manager: RecordManager::new(bpm),
        }
    }

    /// Insert a record into the first page with room, allocating a new
    /// page when every existing one is full.
    ///
    /// First-fit from page 0, so space freed in early pages is refilled
    /// before the file grows.
    ///
    /// # Errors
    /// `Error::PageFull` only if the record cannot fit in an empty page;
    /// otherwise `Error::Io` / `Error::PoolExhausted` from the layers
    /// below.
    pub fn insert(&self, record: &[u8]) -> Result<RecordId> {
        for i in 0..self.manager.buffer_pool().page_count() {
            match self.manager.insert_record(PageId::new(i), record) {
                Err(Error::PageFull { .. }) => continue,
                other => return other,
            }
        }

        let page_id = self.manager.buffer_pool().new_page()?.page_id();
        log::debug!("heap grew to {}", page_id);
        self.manager.insert_record(page_id, record)
    }

    /// Read a record's bytes.
    pub fn read(&self, record_id: RecordId) -> Result<Vec<u8>> {
        self.manager.read_record(record_id)
    }

    /// Update a record, relocating it to another page if it no longer
    /// fits in its own. Returns the possibly-new [`RecordId`].
    pub fn update(&self, record_id: RecordId, record: &[u8]) -> Result<RecordId> {
        match self.manager.update_record(record_id, record) {
            Ok(()) => Ok(record_id),
            Err(Error::PageFull { .. }) => {
                // Delete-then-reinsert; the id changes and the caller
                // must adopt the returned one.
                self.manager.delete_record(record_id)?;
                self.insert(record)
            }
            Err(err) => Err(err),
        }
    }

    /// Delete a record.
    pub fn delete(&self, record_id: RecordId) -> Result<()> {
        self.manager.delete_record(record_id)
    }

    /// Iterate over every live record in page order, then slot order.
    pub fn scan(&self) -> HeapScan<'_> {
        HeapScan {
            heap: self,
            page_id: 0,
            slot: 0,
        }
    }

    /// The record manager this heap is built on.
    pub fn record_manager(&self) -> &RecordManager {
        &self.manager
    }
}

/// Iterator over live records of a [`HeapFile`].
///
/// Pins one page at a time and copies records out, so the scan never
/// blocks writers for longer than one page visit. Records inserted or
/// deleted behind the cursor are not revisited.
pub struct HeapScan<'a> {
    heap: &'a HeapFile,
    page_id: u32,
    slot: u16,
}

impl Iterator for HeapScan<'_> {
    type Item = Result<(RecordId, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        let bpm = self.heap.manager.buffer_pool();
        loop {
            if self.page_id >= bpm.page_count() {
                return None;
            }
            let page_id = PageId::new(self.page_id);
            let guard = match bpm.fetch_page_read(page_id) {
                Ok(guard) => guard,
                Err(err) => return Some(Err(err)),
            };
            let page = SlottedPage::new(guard.as_slice());

            // An uninitialized page reads as zero slots and is skipped.
            while self.slot < page.record_count() {
                let slot = self.slot;
                self.slot += 1;
                if let Some(bytes) = page.record(slot) {
                    return Some(Ok((RecordId::new(page_id, slot), bytes.to_vec())));
                }
            }
            self.page_id += 1;
            self.slot = 0;
        }
    }
}
