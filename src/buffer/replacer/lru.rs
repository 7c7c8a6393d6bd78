//! LRU replacement over the unpin/access timeline.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::buffer::replacer::Replacer;
use crate::common::FrameId;

/// Least-recently-used eviction.
///
/// The victim is the evictable frame whose last unpin (or access) is
/// oldest, so a pool of size 2 loaded with A then B, unpinned A then B,
/// evicts A for the next miss.
///
/// Recency is tracked with a stamped queue and lazy invalidation: every
/// touch pushes a fresh `(frame, stamp)` entry and bumps the frame's
/// current stamp; `evict` pops from the front, skipping entries whose
/// stamp is stale. Each touch is O(1) amortized - the contract here is
/// the *ordering*, not the data structure.
pub struct LruReplacer {
    /// Oldest-first queue of (frame, stamp) touches.
    queue: VecDeque<(FrameId, u64)>,

    /// Current stamp per tracked frame; queue entries with an older stamp
    /// are stale.
    stamps: HashMap<FrameId, u64>,

    /// Frames whose pin count is zero.
    evictable: HashSet<FrameId>,

    /// Monotonic touch counter.
    clock: u64,
}

impl LruReplacer {
    /// Create an empty LRU replacer.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            stamps: HashMap::new(),
            evictable: HashSet::new(),
            clock: 0,
        }
    }

    fn touch(&mut self, frame_id: FrameId) {
        self.clock += 1;
        self.stamps.insert(frame_id, self.clock);
        self.queue.push_back((frame_id, self.clock));
    }
}

impl Replacer for LruReplacer {
    fn record_access(&mut self, frame_id: FrameId) {
        self.touch(frame_id);
    }

    fn set_evictable(&mut self, frame_id: FrameId, evictable: bool) {
        if evictable {
            // The unpin itself counts as a use: LRU order is over the
            // unpin timeline, not load order.
            self.touch(frame_id);
            self.evictable.insert(frame_id);
        } else {
            self.evictable.remove(&frame_id);
        }
    }

    fn evict(&mut self) -> Option<FrameId> {
        while let Some((frame_id, stamp)) = self.queue.pop_front() {
            if self.stamps.get(&frame_id) != Some(&stamp) {
                continue; // stale entry, a fresher touch exists
            }
            if self.evictable.remove(&frame_id) {
                self.stamps.remove(&frame_id);
                return Some(frame_id);
            }
            // Pinned frame: drop the entry. Its next unpin re-stamps it.
            self.stamps.remove(&frame_id);
        }
        None
    }

    fn remove(&mut self, frame_id: FrameId) {
        self.stamps.remove(&frame_id);
        self.evictable.remove(&frame_id);
    }

    fn size(&self) -> usize {
        self.evictable.len()
    }
}

impl Default for LruReplacer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_least_recently_unpinned() {
        let mut replacer = LruReplacer::new();

        replacer.record_access(FrameId::new(0));
        replacer.record_access(FrameId::new(1));
        // Unpin order decides: 0 first, then 1.
        replacer.set_evictable(FrameId::new(0), true);
        replacer.set_evictable(FrameId::new(1), true);

        assert_eq!(replacer.evict(), Some(FrameId::new(0)));
        assert_eq!(replacer.evict(), Some(FrameId::new(1)));
        assert_eq!(replacer.evict(), None);
    }

    #[test]
    fn test_unpin_order_beats_access_order() {
        let mut replacer = LruReplacer::new();

        replacer.record_access(FrameId::new(0));
        replacer.record_access(FrameId::new(1));
        replacer.record_access(FrameId::new(2));
        // Unpinned in reverse access order.
        replacer.set_evictable(FrameId::new(2), true);
        replacer.set_evictable(FrameId::new(0), true);
        replacer.set_evictable(FrameId::new(1), true);

        assert_eq!(replacer.evict(), Some(FrameId::new(2)));
        assert_eq!(replacer.evict(), Some(FrameId::new(0)));
        assert_eq!(replacer.evict(), Some(FrameId::new(1)));
    }

    #[test]
    fn test_repin_refreshes_recency() {
        let mut replacer = LruReplacer::new();

        for i in 0..3 {
            replacer.record_access(FrameId::new(i));
            replacer.set_evictable(FrameId::new(i), true);
        }

        // Re-pin and unpin frame 0: it becomes the most recent.
        replacer.set_evictable(FrameId::new(0), false);
        replacer.record_access(FrameId::new(0));
        replacer.set_evictable(FrameId::new(0), true);

        assert_eq!(replacer.evict(), Some(FrameId::new(1)));
        assert_eq!(replacer.evict(), Some(FrameId::new(2)));
        assert_eq!(replacer.evict(), Some(FrameId::new(0)));
    }

    #[test]
    fn test_pinned_frames_skipped() {
        let mut replacer = LruReplacer::new();

        replacer.record_access(FrameId::new(0));
        replacer.record_access(FrameId::new(1));
        replacer.set_evictable(FrameId::new(0), true);
        replacer.set_evictable(FrameId::new(1), true);
        replacer.set_evictable(FrameId::new(0), false); // re-pinned

        assert_eq!(replacer.evict(), Some(FrameId::new(1)));
        assert_eq!(replacer.evict(), None);
    }

    #[test]
    fn test_remove() {
        let mut replacer = LruReplacer::new();

        replacer.record_access(FrameId::new(0));
        replacer.set_evictable(FrameId::new(0), true);
        replacer.remove(FrameId::new(0));

        assert_eq!(replacer.size(), 0);
        assert_eq!(replacer.evict(), None);
    }

    #[test]
    fn test_all_pinned_returns_none() {
        let mut replacer = LruReplacer::new();

        replacer.record_access(FrameId::new(0));
        replacer.record_access(FrameId::new(1));
        assert_eq!(replacer.evict(), None);
    }
}
