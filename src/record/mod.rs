//! Record storage: slotted-page records and the heap file built on them.

mod heap;
mod record_manager;

pub use heap::{HeapFile, HeapScan};
pub use record_manager::RecordManager;
