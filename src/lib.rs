//! # basaltdb
//!
//! An embedded storage engine core: fixed-size pages on a single file, a
//! pinning buffer pool with pluggable eviction, and slotted-page record
//! storage on top.
//!
//! ## Architecture
//!
//! ```text
//!  Database
//!     |
//!  HeapFile / RecordManager     records in slotted pages
//!     |
//!  BufferPoolManager            page cache, pin counts, eviction
//!     |
//!  DiskManager                  page-granular file I/O
//! ```
//!
//! Callers address storage by [`PageId`] and [`RecordId`] and access page
//! bytes only through RAII guards, which pin a page for their lifetime
//! and release it on drop. Durability is explicit: writes accumulate in
//! the pool until [`Database::checkpoint`] (or a flush plus sync) pushes
//! them to stable storage.
//!
//! ## Quick Start
//!
//! ```no_run
//! use basaltdb::{Database, DbConfig};
//!
//! # fn main() -> basaltdb::common::Result<()> {
//! let db = Database::open(DbConfig::new("basalt.db"))?;
//!
//! let id = db.heap().insert(b"first record")?;
//! assert_eq!(db.heap().read(id)?, b"first record");
//!
//! for entry in db.heap().scan() {
//!     let (id, bytes) = entry?;
//!     println!("{id}: {} bytes", bytes.len());
//! }
//!
//! db.close()?;
//! # Ok(())
//! # }
//! ```

pub mod buffer;
pub mod common;
mod database;
pub mod record;
pub mod storage;

pub use buffer::{BufferPoolManager, PageReadGuard, PageWriteGuard};
pub use common::{DbConfig, Error, PageId, RecordId, Result, PAGE_SIZE};
pub use database::Database;
pub use record::{HeapFile, RecordManager};
pub use storage::DiskManager;
