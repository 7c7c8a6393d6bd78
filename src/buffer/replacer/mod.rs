//! Eviction policies (replacers).
//!
//! The buffer pool delegates victim selection to a [`Replacer`] so the
//! policy can be swapped without touching any pinning or locking logic.
//! [`LruReplacer`] is the default; [`FifoReplacer`] is the simplest
//! alternative and mostly serves to prove the seam works.

mod fifo;
mod lru;

pub use fifo::FifoReplacer;
pub use lru::LruReplacer;

use crate::common::FrameId;

/// Victim-selection strategy for the buffer pool.
///
/// The pool reports every frame event; the replacer owns only ordering
/// state. Pin bookkeeping stays in the pool: a replacer may only return
/// frames currently marked evictable.
pub trait Replacer: Send {
    /// A frame was accessed (pinned or re-pinned).
    fn record_access(&mut self, frame_id: FrameId);

    /// Mark whether a frame is a legal eviction candidate. The pool flips
    /// this to `true` when a frame's pin count drops to zero and back to
    /// `false` on every pin.
    fn set_evictable(&mut self, frame_id: FrameId, evictable: bool);

    /// Select and remove a victim, or `None` if no frame is evictable.
    fn evict(&mut self) -> Option<FrameId>;

    /// Forget a frame entirely (page deleted from the pool).
    fn remove(&mut self, frame_id: FrameId);

    /// Number of currently evictable frames.
    fn size(&self) -> usize;
}
