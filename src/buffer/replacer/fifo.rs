//! FIFO (First-In-First-Out) replacement.

use std::collections::{HashSet, VecDeque};

use crate::buffer::replacer::Replacer;
use crate::common::FrameId;

/// Evicts frames in load order, ignoring recency.
///
/// Mostly useful as the second implementation behind the [`Replacer`]
/// seam and as a baseline for comparing policies; scans that reload hot
/// pages are better served by [`LruReplacer`](super::LruReplacer).
pub struct FifoReplacer {
    /// Frame ids in arrival order (front = oldest).
    queue: VecDeque<FrameId>,

    /// O(1) membership for the queue.
    in_queue: HashSet<FrameId>,

    /// Frames whose pin count is zero.
    evictable: HashSet<FrameId>,
}

impl FifoReplacer {
    /// Create an empty FIFO replacer.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            in_queue: HashSet::new(),
            evictable: HashSet::new(),
        }
    }
}

impl Replacer for FifoReplacer {
    /// Only the first access matters; re-accesses do not reorder.
    fn record_access(&mut self, frame_id: FrameId) {
        if self.in_queue.insert(frame_id) {
            self.queue.push_back(frame_id);
        }
    }

    fn set_evictable(&mut self, frame_id: FrameId, evictable: bool) {
        if evictable {
            // Re-enqueue frames that were evicted or removed earlier and
            // are now back in circulation.
            if self.in_queue.insert(frame_id) {
                self.queue.push_back(frame_id);
            }
            self.evictable.insert(frame_id);
        } else {
            self.evictable.remove(&frame_id);
        }
    }

    fn evict(&mut self) -> Option<FrameId> {
        // Pinned frames rotate to the back rather than being dropped, so
        // they keep their place in arrival order for the next round.
        for _ in 0..self.queue.len() {
            let frame_id = self.queue.pop_front()?;
            if self.evictable.remove(&frame_id) {
                self.in_queue.remove(&frame_id);
                return Some(frame_id);
            }
            self.queue.push_back(frame_id);
        }
        None
    }

    fn remove(&mut self, frame_id: FrameId) {
        self.evictable.remove(&frame_id);
        if self.in_queue.remove(&frame_id) {
            self.queue.retain(|&f| f != frame_id);
        }
    }

    fn size(&self) -> usize {
        self.evictable.len()
    }
}

impl Default for FifoReplacer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_basic() {
        let mut replacer = FifoReplacer::new();

        for i in 0..3 {
            replacer.record_access(FrameId::new(i));
            replacer.set_evictable(FrameId::new(i), true);
        }
        assert_eq!(replacer.size(), 3);

        assert_eq!(replacer.evict(), Some(FrameId::new(0)));
        assert_eq!(replacer.evict(), Some(FrameId::new(1)));
        assert_eq!(replacer.evict(), Some(FrameId::new(2)));
        assert_eq!(replacer.evict(), None);
    }

    #[test]
    fn test_fifo_skips_pinned() {
        let mut replacer = FifoReplacer::new();

        for i in 0..3 {
            replacer.record_access(FrameId::new(i));
        }
        replacer.set_evictable(FrameId::new(1), true);

        assert_eq!(replacer.evict(), Some(FrameId::new(1)));
        assert_eq!(replacer.evict(), None);
    }

    #[test]
    fn test_fifo_reaccess_no_reorder() {
        let mut replacer = FifoReplacer::new();

        replacer.record_access(FrameId::new(0));
        replacer.record_access(FrameId::new(1));
        replacer.record_access(FrameId::new(0)); // no reorder

        replacer.set_evictable(FrameId::new(0), true);
        replacer.set_evictable(FrameId::new(1), true);

        assert_eq!(replacer.evict(), Some(FrameId::new(0)));
        assert_eq!(replacer.evict(), Some(FrameId::new(1)));
    }

    #[test]
    fn test_fifo_remove() {
        let mut replacer = FifoReplacer::new();

        replacer.record_access(FrameId::new(0));
        replacer.record_access(FrameId::new(1));
        replacer.set_evictable(FrameId::new(0), true);
        replacer.set_evictable(FrameId::new(1), true);

        replacer.remove(FrameId::new(0));

        assert_eq!(replacer.evict(), Some(FrameId::new(1)));
        assert_eq!(replacer.evict(), None);
    }
}
