//! Buffer pool: frames, guards, eviction policies, and the manager.

mod buffer_pool_manager;
mod frame;
mod page_guard;
pub mod replacer;
mod stats;

pub use buffer_pool_manager::BufferPoolManager;
pub use page_guard::{PageReadGuard, PageWriteGuard};
pub use replacer::{FifoReplacer, LruReplacer, Replacer};
pub use stats::{BufferPoolStats, StatsSnapshot};
