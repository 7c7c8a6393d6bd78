//! Record Manager - slotted-page records addressed by [`RecordId`].
//!
//! Thin layer over the buffer pool: every operation fetches the target
//! page through a guard, runs the slotted-page mutation in place, and
//! lets the guard's drop handle unpinning and dirty tracking. All record
//! bytes are opaque; interpretation belongs to the caller.

use std::sync::Arc;

use crate::buffer::BufferPoolManager;
use crate::common::{Error, PageId, RecordId, Result};
use crate::storage::page::slotted::SLOT_ENTRY_SIZE;
use crate::storage::page::{SlottedPage, SlottedPageMut};

/// Record-level operations on slotted pages.
///
/// A [`RecordId`] stays valid until the record is deleted: in-place
/// updates and compaction both preserve slot indices, and tombstoned
/// slots are never reissued.
pub struct RecordManager {
    bpm: Arc<BufferPoolManager>,
}

impl RecordManager {
    pub fn new(bpm: Arc<BufferPoolManager>) -> Self {
        Self { bpm }
    }

    /// Insert a record into the given page.
    ///
    /// Initializes the page's slotted layout on first use. Compacts and
    /// retries once internally before giving up.
    ///
    /// # Errors
    /// `Error::PageFull` if the record does not fit even after
    /// compaction; `Error::PageNotFound` if the page was never allocated.
    pub fn insert_record(&self, page_id: PageId, record: &[u8]) -> Result<RecordId> {
        let mut guard = self.bpm.fetch_page_write(page_id)?;
        let mut page = SlottedPageMut::new(guard.as_mut_slice());
        page.init_if_needed();

        match page.insert(record) {
            Some(slot) => {
                log::trace!("inserted {} bytes at {}", record.len(), RecordId::new(page_id, slot));
                Ok(RecordId::new(page_id, slot))
            }
            None => Err(Error::PageFull {
                page_id,
                needed: record.len() + SLOT_ENTRY_SIZE,
                available: page.as_read().free_space(),
            }),
        }
    }

    /// Read a record's bytes.
    ///
    /// # Errors
    /// `Error::RecordNotFound` if the slot does not exist or holds a
    /// tombstone.
    pub fn read_record(&self, record_id: RecordId) -> Result<Vec<u8>> {
        let guard = self.bpm.fetch_page_read(record_id.page_id)?;
        let page = SlottedPage::new(guard.as_slice());

        page.record(record_id.slot)
            .map(<[u8]>::to_vec)
            .ok_or(Error::RecordNotFound(record_id))
    }

    /// Replace a record's bytes, keeping its [`RecordId`].
    ///
    /// Shrinking updates rewrite in place; growing updates relocate the
    /// payload within the page (compacting first if needed). The slot
    /// index never changes.
    ///
    /// # Errors
    /// `Error::RecordNotFound` for a missing or deleted record;
    /// `Error::PageFull` if the grown record no longer fits in the page.
    pub fn update_record(&self, record_id: RecordId, record: &[u8]) -> Result<()> {
        let mut guard = self.bpm.fetch_page_write(record_id.page_id)?;
        let mut page = SlottedPageMut::new(guard.as_mut_slice());

        if !page.as_read().is_live(record_id.slot) {
            return Err(Error::RecordNotFound(record_id));
        }
        if page.update(record_id.slot, record) {
            Ok(())
        } else {
            Err(Error::PageFull {
                page_id: record_id.page_id,
                needed: record.len(),
                available: page.as_read().free_space(),
            })
        }
    }

    /// Delete a record, leaving a tombstone in its slot.
    ///
    /// The payload bytes are reclaimed by the next compaction; the slot
    /// index is never reused, so stale [`RecordId`]s cannot alias a new
    /// record.
    ///
    /// # Errors
    /// `Error::RecordNotFound` if the record does not exist or was
    /// already deleted.
    pub fn delete_record(&self, record_id: RecordId) -> Result<()> {
        let mut guard = self.bpm.fetch_page_write(record_id.page_id)?;
        let mut page = SlottedPageMut::new(guard.as_mut_slice());

        if page.delete(record_id.slot) {
            Ok(())
        } else {
            Err(Error::RecordNotFound(record_id))
        }
    }

    /// Compact a page, squeezing out holes left by deleted records.
    ///
    /// Live records keep their slot indices; only payload offsets move.
    pub fn compact_page(&self, page_id: PageId) -> Result<()> {
        let mut guard = self.bpm.fetch_page_write(page_id)?;
        let mut page = SlottedPageMut::new(guard.as_mut_slice());
        page.init_if_needed();
        page.compact();
        Ok(())
    }

    /// Contiguous free bytes in a page, before slot-entry overhead.
    pub fn free_space(&self, page_id: PageId) -> Result<usize> {
        let guard = self.bpm.fetch_page_read(page_id)?;
        Ok(SlottedPage::new(guard.as_slice()).free_space())
    }

    /// Number of live records in a page.
    pub fn live_count(&self, page_id: PageId) -> Result<u16> {
        let guard = self.bpm.fetch_page_read(page_id)?;
        Ok(SlottedPage::new(guard.as_slice()).live_count())
    }

    pub(crate) fn buffer_pool(&self) -> &Arc<BufferPoolManager> {
        &self.bpm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DiskManager;
    use tempfile::{tempdir, TempDir};

    fn create_test_manager() -> (TempDir, RecordManager) {
        let dir = tempdir().unwrap();
        let disk = DiskManager::create(dir.path().join("test.db")).unwrap();
        let bpm = Arc::new(BufferPoolManager::new(disk, 8));
        (dir, RecordManager::new(bpm))
    }

    fn new_page(manager: &RecordManager) -> PageId {
        manager.buffer_pool().new_page().unwrap().page_id()
    }

    #[test]
    fn test_insert_and_read() {
        let (_dir, manager) = create_test_manager();
        let page_id = new_page(&manager);

        let rid = manager.insert_record(page_id, b"hello").unwrap();
        assert_eq!(rid.page_id, page_id);
        assert_eq!(rid.slot, 0);

        assert_eq!(manager.read_record(rid).unwrap(), b"hello");
    }

    #[test]
    fn test_slot_indices_sequential() {
        let (_dir, manager) = create_test_manager();
        let page_id = new_page(&manager);

        for expected in 0..5 {
            let rid = manager.insert_record(page_id, b"x").unwrap();
            assert_eq!(rid.slot, expected);
        }
        assert_eq!(manager.live_count(page_id).unwrap(), 5);
    }

    #[test]
    fn test_read_deleted_record() {
        let (_dir, manager) = create_test_manager();
        let page_id = new_page(&manager);

        let rid = manager.insert_record(page_id, b"gone").unwrap();
        manager.delete_record(rid).unwrap();

        let err = manager.read_record(rid).unwrap_err();
        assert!(matches!(err, Error::RecordNotFound(_)));

        // Double delete also fails.
        let err = manager.delete_record(rid).unwrap_err();
        assert!(matches!(err, Error::RecordNotFound(_)));
    }

    #[test]
    fn test_deleted_slot_not_reused() {
        let (_dir, manager) = create_test_manager();
        let page_id = new_page(&manager);

        let first = manager.insert_record(page_id, b"first").unwrap();
        manager.delete_record(first).unwrap();

        let second = manager.insert_record(page_id, b"second").unwrap();
        assert_ne!(second.slot, first.slot);
        assert_eq!(manager.read_record(second).unwrap(), b"second");
    }

    #[test]
    fn test_update_preserves_record_id() {
        let (_dir, manager) = create_test_manager();
        let page_id = new_page(&manager);

        let rid = manager.insert_record(page_id, b"short").unwrap();

        manager.update_record(rid, b"a much longer payload").unwrap();
        assert_eq!(manager.read_record(rid).unwrap(), b"a much longer payload");

        manager.update_record(rid, b"s").unwrap();
        assert_eq!(manager.read_record(rid).unwrap(), b"s");
    }

    #[test]
    fn test_update_missing_record() {
        let (_dir, manager) = create_test_manager();
        let page_id = new_page(&manager);

        let rid = RecordId::new(page_id, 9);
        let err = manager.update_record(rid, b"x").unwrap_err();
        assert!(matches!(err, Error::RecordNotFound(_)));
    }

    #[test]
    fn test_page_full() {
        let (_dir, manager) = create_test_manager();
        let page_id = new_page(&manager);

        manager.insert_record(page_id, &[0u8; 4000]).unwrap();

        let err = manager.insert_record(page_id, &[0u8; 4000]).unwrap_err();
        match err {
            Error::PageFull { needed, available, .. } => {
                assert_eq!(needed, 4004);
                assert!(available < needed);
            }
            other => panic!("expected PageFull, got {other:?}"),
        }
    }

    #[test]
    fn test_insert_reclaims_deleted_space() {
        let (_dir, manager) = create_test_manager();
        let page_id = new_page(&manager);

        // Two records nearly fill the page.
        let a = manager.insert_record(page_id, &[1u8; 2000]).unwrap();
        manager.insert_record(page_id, &[2u8; 2000]).unwrap();
        manager.delete_record(a).unwrap();

        // Fits only after the internal compact reclaims a's bytes.
        let c = manager.insert_record(page_id, &[3u8; 2000]).unwrap();
        assert_eq!(manager.read_record(c).unwrap(), vec![3u8; 2000]);
    }

    #[test]
    fn test_compact_preserves_live_records() {
        let (_dir, manager) = create_test_manager();
        let page_id = new_page(&manager);

        let a = manager.insert_record(page_id, b"aaa").unwrap();
        let b = manager.insert_record(page_id, b"bbb").unwrap();
        let c = manager.insert_record(page_id, b"ccc").unwrap();
        manager.delete_record(b).unwrap();

        let before = manager.free_space(page_id).unwrap();
        manager.compact_page(page_id).unwrap();
        let after = manager.free_space(page_id).unwrap();
        assert!(after > before);

        assert_eq!(manager.read_record(a).unwrap(), b"aaa");
        assert_eq!(manager.read_record(c).unwrap(), b"ccc");
        assert!(matches!(
            manager.read_record(b).unwrap_err(),
            Error::RecordNotFound(_)
        ));
    }

    #[test]
    fn test_empty_record() {
        let (_dir, manager) = create_test_manager();
        let page_id = new_page(&manager);

        let rid = manager.insert_record(page_id, b"").unwrap();
        assert_eq!(manager.read_record(rid).unwrap(), Vec::<u8>::new());

        manager.delete_record(rid).unwrap();
        assert!(matches!(
            manager.read_record(rid).unwrap_err(),
            Error::RecordNotFound(_)
        ));
    }

    #[test]
    fn test_unallocated_page() {
        let (_dir, manager) = create_test_manager();
        let err = manager.insert_record(PageId::new(5), b"x").unwrap_err();
        assert!(matches!(err, Error::PageNotFound(_)));
    }
}
