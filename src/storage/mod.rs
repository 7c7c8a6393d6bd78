//! Storage layer - disk I/O and page formats.
//!
//! - [`DiskManager`] - page-granular file I/O
//! - [`page`] - the raw [`Page`](page::Page) buffer and the slotted layout

mod disk_manager;
pub mod page;

pub use disk_manager::DiskManager;
