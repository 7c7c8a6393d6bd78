//! Record identifier type.

use std::fmt;

use crate::common::PageId;

/// Stable (page, slot) address of a stored record.
///
/// The slot index points into the page's slot directory, not at a byte
/// offset, so records may move within their page (e.g. during compaction)
/// without invalidating the id. A RecordId stays valid until the record is
/// deleted; deleted slots are never reused, so stale ids read back as
/// [`RecordNotFound`] instead of aliasing new data.
///
/// [`RecordNotFound`]: crate::common::Error::RecordNotFound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId {
    /// Page holding the record.
    pub page_id: PageId,
    /// Index into the page's slot directory.
    pub slot: u16,
}

impl RecordId {
    /// Create a new RecordId.
    #[inline]
    pub fn new(page_id: PageId, slot: u16) -> Self {
        Self { page_id, slot }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Record({}, {})", self.page_id.0, self.slot)
    }
}
