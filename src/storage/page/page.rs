//! Page - the fundamental 4KB unit of storage.
//!
//! A [`Page`] is a raw fixed-size byte buffer, the unit of I/O between disk
//! and memory and of caching in the buffer pool. It carries no metadata of
//! its own: pin counts and dirty flags live on the buffer pool's frames,
//! and record structure is imposed by the slotted layout in
//! [`slotted`](super::slotted).

use std::fmt;

use crate::common::config::PAGE_SIZE;

/// A page of data (4KB, 4KB-aligned).
///
/// Alignment matches the OS page size so the buffer plays well with
/// page-cache granularity and direct I/O.
///
/// `Page` does not implement `Clone` outside of tests: copying 4KB should
/// be an explicit decision, not something that happens behind a `.clone()`.
#[repr(align(4096))]
pub struct Page {
    data: [u8; PAGE_SIZE],
}

impl Page {
    /// Create a new zeroed page.
    #[inline]
    pub fn new() -> Self {
        Self {
            data: [0u8; PAGE_SIZE],
        }
    }

    /// Immutable view of the page bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Mutable view of the page bytes.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Zero out the entire page.
    pub fn reset(&mut self) {
        self.data.fill(0);
    }

    /// Size of a page in bytes.
    #[inline]
    pub const fn size() -> usize {
        PAGE_SIZE
    }

    /// CRC32 checksum of the full page image.
    ///
    /// The checksum is not stored in the page; it is an integrity probe for
    /// callers that want to assert a page image was not torn or corrupted
    /// (the concurrency stress tests compare checksums across threads).
    pub fn checksum(&self) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&self.data);
        hasher.finalize()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

// Debug elides the 4KB payload.
impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page").finish_non_exhaustive()
    }
}

// Clone only available in tests - forces explicit copying in production.
#[cfg(test)]
impl Clone for Page {
    fn clone(&self) -> Self {
        let mut new_page = Page::new();
        new_page.data.copy_from_slice(&self.data);
        new_page
    }
}
