//! Disk Manager - low-level file I/O for database pages.
//!
//! The [`DiskManager`] owns the backing file and performs all direct file
//! operations: allocating pages, reading and writing page images, and
//! forcing data to stable storage. It does no caching or locking of its
//! own; the buffer pool serializes access to it.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::common::config::PAGE_SIZE;
use crate::common::{Error, PageId, Result};
use crate::storage::page::Page;

/// Manages page-granular I/O on a single backing file.
///
/// # File Layout
/// A flat sequence of fixed-size pages; page `i` lives at byte offset
/// `i * PAGE_SIZE`. There is no file header: the highest allocated id is
/// recovered from the file length on open, which always holds because
/// allocation zero-extends the file by exactly one page.
///
/// # Durability
/// `write_page` issues a single page-aligned write but does not fsync;
/// call [`DiskManager::sync`] to force everything to stable storage. The
/// database does this as part of a checkpoint.
pub struct DiskManager {
    file: File,
    /// Number of pages allocated in the file.
    page_count: u32,
}

impl DiskManager {
    /// Create a new database file.
    ///
    /// # Errors
    /// Fails if the file already exists or cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(&path)?;

        log::debug!("created backing file {}", path.as_ref().display());
        Ok(Self {
            file,
            page_count: 0,
        })
    }

    /// Open an existing database file.
    ///
    /// # Errors
    /// Fails if the file does not exist or cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(&path)?;

        let file_size = file.metadata()?.len();
        let page_count = (file_size / PAGE_SIZE as u64) as u32;

        log::debug!(
            "opened backing file {} ({} pages)",
            path.as_ref().display(),
            page_count
        );
        Ok(Self { file, page_count })
    }

    /// Open an existing database file, or create it if missing.
    pub fn open_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::open(path)
        } else {
            Self::create(path)
        }
    }

    /// Read a page image from disk.
    ///
    /// A page that was allocated but never written reads back zero-filled,
    /// because allocation extends the file with zeroes.
    ///
    /// # Errors
    /// `Error::PageNotFound` if `page_id` is outside the allocated range;
    /// `Error::Io` on a short or failed read.
    pub fn read_page(&mut self, page_id: PageId) -> Result<Page> {
        if page_id.0 >= self.page_count {
            return Err(Error::PageNotFound(page_id));
        }

        let offset = (page_id.0 as u64) * (PAGE_SIZE as u64);
        self.file.seek(SeekFrom::Start(offset))?;

        let mut page = Page::new();
        self.file.read_exact(page.as_mut_slice())?;

        Ok(page)
    }

    /// Write a page image to disk as a single page-aligned write.
    ///
    /// The page must have been allocated with [`DiskManager::allocate_page`].
    /// Does not fsync; see [`DiskManager::sync`].
    ///
    /// # Errors
    /// `Error::PageNotFound` if `page_id` is outside the allocated range.
    pub fn write_page(&mut self, page_id: PageId, page: &Page) -> Result<()> {
        if page_id.0 >= self.page_count {
            return Err(Error::PageNotFound(page_id));
        }

        let offset = (page_id.0 as u64) * (PAGE_SIZE as u64);
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(page.as_slice())?;

        Ok(())
    }

    /// Allocate a new page at the end of the file and return its id.
    ///
    /// Ids are monotonic; freed ids are never reissued. The new page is
    /// zero-filled on disk.
    pub fn allocate_page(&mut self) -> Result<PageId> {
        let page_id = PageId::new(self.page_count);

        let offset = (page_id.0 as u64) * (PAGE_SIZE as u64);
        self.file.seek(SeekFrom::Start(offset))?;

        let zeros = [0u8; PAGE_SIZE];
        self.file.write_all(&zeros)?;

        self.page_count += 1;
        log::trace!("allocated {}", page_id);
        Ok(page_id)
    }

    /// Force all buffered writes to stable storage.
    ///
    /// A page is durable only after a `write_page` followed by a successful
    /// `sync`.
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    /// Number of pages allocated in the file.
    #[inline]
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Total size of the backing file in bytes.
    #[inline]
    pub fn file_size(&self) -> u64 {
        (self.page_count as u64) * (PAGE_SIZE as u64)
    }
}
