//! Frame identifier type.

use std::fmt;

/// Identifies a frame in the buffer pool.
///
/// `usize` so it indexes `Vec<Frame>` directly: `frames[frame_id.0]`.
/// Frame ids are pool-internal; callers only ever see `PageId`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub usize);

impl FrameId {
    /// Create a new FrameId.
    #[inline]
    pub fn new(id: usize) -> Self {
        FrameId(id)
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame({})", self.0)
    }
}
