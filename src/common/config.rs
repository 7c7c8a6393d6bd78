//! Configuration for basaltdb.

use std::path::{Path, PathBuf};

/// Size of a page in bytes (4KB).
///
/// Matches the OS page size on most systems, so page-aligned I/O maps
/// cleanly onto the kernel page cache. Slot directory offsets are stored
/// as `u16`, which requires `PAGE_SIZE <= u16::MAX + 1`.
pub const PAGE_SIZE: usize = 4096;

/// Default number of frames in the buffer pool (1MB of cache at 4KB pages).
pub const DEFAULT_POOL_SIZE: usize = 256;

/// Maximum number of pages with a u32 PageId.
pub const MAX_PAGES: u64 = (u32::MAX as u64) + 1;

/// Settings for one open database instance.
///
/// The storage core does not read any global configuration; everything it
/// needs is carried here and handed to [`Database::open`].
///
/// [`Database::open`]: crate::Database::open
///
/// # Example
/// ```
/// use basaltdb::common::DbConfig;
///
/// let config = DbConfig::new("basalt.db").pool_size(64);
/// assert_eq!(config.pool_size, 64);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path of the backing file.
    pub path: PathBuf,
    /// Number of frames in the buffer pool.
    pub pool_size: usize,
}

impl DbConfig {
    /// Create a config for the given backing file with default pool size.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            pool_size: DEFAULT_POOL_SIZE,
        }
    }

    /// Set the buffer pool size in frames.
    ///
    /// # Panics
    /// Panics if `pool_size` is 0.
    pub fn pool_size(mut self, pool_size: usize) -> Self {
        assert!(pool_size > 0, "pool_size must be > 0");
        self.pool_size = pool_size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_is_power_of_two() {
        assert!(PAGE_SIZE.is_power_of_two());
        assert!(PAGE_SIZE <= (u16::MAX as usize) + 1);
    }

    #[test]
    fn test_config_defaults() {
        let config = DbConfig::new("x.db");
        assert_eq!(config.pool_size, DEFAULT_POOL_SIZE);
        assert_eq!(config.path, PathBuf::from("x.db"));
    }

    #[test]
    #[should_panic(expected = "pool_size must be > 0")]
    fn test_config_zero_pool_rejected() {
        let _ = DbConfig::new("x.db").pool_size(0);
    }
}
