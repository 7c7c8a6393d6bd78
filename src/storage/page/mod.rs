//! Page types and layout.
//!
//! - [`Page`] - the raw fixed-size data container
//! - [`slotted`] - the slotted record layout imposed on a page's bytes

#[allow(clippy::module_inception)]
mod page;
pub mod slotted;

pub use page::Page;
pub use slotted::{SlottedPage, SlottedPageMut};
