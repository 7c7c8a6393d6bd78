//! Error types for basaltdb.

use crate::common::{PageId, RecordId};

/// Convenient Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors the storage core can surface.
///
/// The taxonomy separates fatal I/O failures from recoverable conditions
/// (`PoolExhausted`, `PageFull`, `RecordNotFound`) and from caller bugs
/// (`InvalidUnpin`). No operation silently loses a write: a failed flush
/// leaves the page's dirty flag set so the flush can be retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Disk-level read/write/sync failure. Fatal to the calling operation;
    /// not retried internally.
    ///
    /// Addressing a page outside the allocated range is *not* an `Io`
    /// failure: it is a caller error and surfaces as [`Error::PageNotFound`]
    /// so it stays distinguishable from real device trouble.
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    /// The page is not allocated on disk, or not resident where residency
    /// is required (e.g. `flush_page`). Benign in most flows, but
    /// distinguishable for callers that need to assert residency.
    #[error("{0} not found")]
    PageNotFound(PageId),

    /// Every frame in the buffer pool is pinned and none can be evicted.
    /// Recoverable: the caller may retry after releasing pins, or grow the
    /// pool.
    #[error("buffer pool exhausted: all {pool_size} frames pinned")]
    PoolExhausted { pool_size: usize },

    /// Unpin without a matching pin. This is a caller bug and is never
    /// swallowed.
    #[error("unpin without matching pin for {0}")]
    InvalidUnpin(PageId),

    /// Insufficient free space in the page for the requested insert or
    /// update, even after compaction. Recoverable: retry on another page.
    #[error("{page_id} full: need {needed} bytes, {available} available")]
    PageFull {
        page_id: PageId,
        needed: usize,
        available: usize,
    },

    /// Stale or out-of-range RecordId (slot deleted or never issued).
    #[error("{0} not found")]
    RecordNotFound(RecordId),

    /// Attempted to drop a page from the pool while it is still pinned.
    #[error("{0} is still pinned")]
    PagePinned(PageId),
}
