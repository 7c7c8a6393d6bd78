//! Database - the top-level handle wiring the storage layers together.

use std::sync::Arc;

use crate::buffer::{BufferPoolManager, StatsSnapshot};
use crate::common::{DbConfig, Result};
use crate::record::HeapFile;
use crate::storage::DiskManager;

/// An open database instance.
///
/// Owns the whole stack: a [`DiskManager`] on one backing file, a
/// [`BufferPoolManager`] caching its pages, and a [`HeapFile`] storing
/// records across them. Cheap to share: every method takes `&self`.
///
/// # Example
/// ```no_run
/// use basaltdb::{Database, DbConfig};
///
/// # fn main() -> basaltdb::common::Result<()> {
/// let db = Database::open(DbConfig::new("basalt.db").pool_size(64))?;
/// let id = db.heap().insert(b"hello")?;
/// assert_eq!(db.heap().read(id)?, b"hello");
/// db.close()?;
/// # Ok(())
/// # }
/// ```
pub struct Database {
    bpm: Arc<BufferPoolManager>,
    heap: HeapFile,
}

impl Database {
    /// Open the database at `config.path`, creating the file if missing.
    pub fn open(config: DbConfig) -> Result<Self> {
        let disk = DiskManager::open_or_create(&config.path)?;
        let bpm = Arc::new(BufferPoolManager::new(disk, config.pool_size));

        log::info!(
            "opened database {} ({} pages, pool of {})",
            config.path.display(),
            bpm.page_count(),
            bpm.pool_size()
        );
        Ok(Self {
            heap: HeapFile::new(Arc::clone(&bpm)),
            bpm,
        })
    }

    /// Record storage over the whole file.
    #[inline]
    pub fn heap(&self) -> &HeapFile {
        &self.heap
    }

    /// The buffer pool, for page-level access and manual flushing.
    #[inline]
    pub fn buffer_pool(&self) -> &Arc<BufferPoolManager> {
        &self.bpm
    }

    /// Write all dirty pages back and force them to stable storage.
    ///
    /// This is the durability point: anything inserted before a
    /// successful checkpoint survives a crash or process exit.
    pub fn checkpoint(&self) -> Result<()> {
        self.bpm.flush_all_pages()
    }

    /// Checkpoint and consume the handle.
    ///
    /// Dropping a `Database` without `close` loses no already-flushed
    /// data but abandons unflushed dirty pages.
    pub fn close(self) -> Result<()> {
        self.checkpoint()
    }

    /// Buffer pool counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.bpm.stats()
    }
}
