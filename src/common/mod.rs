//! Shared primitives used across basaltdb.
//!
//! - Configuration constants and [`DbConfig`]
//! - The crate-wide [`Error`] / [`Result`] types
//! - Identifiers ([`PageId`], [`FrameId`], [`RecordId`])

pub mod config;
pub mod error;
mod frame_id;
mod page_id;
mod record_id;

pub use config::{DbConfig, DEFAULT_POOL_SIZE, PAGE_SIZE};
pub use error::{Error, Result};
pub use frame_id::FrameId;
pub use page_id::PageId;
pub use record_id::RecordId;
