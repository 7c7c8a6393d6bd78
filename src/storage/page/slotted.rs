//! Slotted page layout - variable-length records with stable slot addresses.
//!
//! # Layout
//! ```text
//! ┌──────────────┬──────────────────┬───────────────┬─────────────────┐
//! │ header (4B)  │ slot directory → │  free space   │ ← record bytes  │
//! │ count|free_p │ [off u16|len u16]│               │                 │
//! └──────────────┴──────────────────┴───────────────┴─────────────────┘
//! 0              4                  dir_end         free_ptr   PAGE_SIZE
//! ```
//!
//! - header: `[record_count: u16 LE][free_space_pointer: u16 LE]`
//! - slot directory: `record_count` entries of `[offset: u16][length: u16]`,
//!   growing forward from the header
//! - record payloads occupy `[free_space_pointer, PAGE_SIZE)`, growing
//!   backward toward the directory
//! - invariant: `dir_end <= free_space_pointer`
//!
//! A tombstone is a slot with offset and length both zero. Live records
//! always have a non-zero offset (the smallest legal offset is past the
//! header), so a zero-length record stored at a real offset stays
//! distinguishable from a deleted one. Tombstoned slot indices are never
//! reused; compaction rewrites offsets but never slot indices, so every
//! live RecordId survives it and every stale RecordId stays stale.
//!
//! An all-zero page (fresh from the disk manager) has
//! `free_space_pointer == 0` and is treated as uninitialized; writers
//! initialize it lazily on first use.

use crate::common::config::PAGE_SIZE;

/// Size of the page header in bytes.
pub const HEADER_SIZE: usize = 4;

/// Size of one slot directory entry in bytes.
pub const SLOT_ENTRY_SIZE: usize = 4;

/// Largest record payload a single page can hold.
pub const MAX_RECORD_SIZE: usize = PAGE_SIZE - HEADER_SIZE - SLOT_ENTRY_SIZE;

const OFF_RECORD_COUNT: usize = 0;
const OFF_FREE_PTR: usize = 2;

/// One slot directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// Byte offset of the payload within the page (0 for tombstones).
    pub offset: u16,
    /// Payload length in bytes.
    pub length: u16,
}

impl Slot {
    const TOMBSTONE: Slot = Slot {
        offset: 0,
        length: 0,
    };

    /// Whether this entry refers to a live record.
    #[inline]
    pub fn is_live(&self) -> bool {
        self.offset != 0
    }
}

#[inline]
fn read_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

#[inline]
fn write_u16(data: &mut [u8], offset: usize, value: u16) {
    data[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

/// Read-only view of a page interpreted as a slotted page.
#[derive(Clone, Copy)]
pub struct SlottedPage<'a> {
    data: &'a [u8],
}

impl<'a> SlottedPage<'a> {
    /// Interpret `data` as a slotted page.
    ///
    /// # Panics
    /// Panics if `data` is not exactly `PAGE_SIZE` bytes.
    pub fn new(data: &'a [u8]) -> Self {
        assert_eq!(data.len(), PAGE_SIZE, "slotted page must be PAGE_SIZE bytes");
        Self { data }
    }

    /// Number of slot directory entries, tombstones included.
    #[inline]
    pub fn record_count(&self) -> u16 {
        read_u16(self.data, OFF_RECORD_COUNT)
    }

    /// Start of the record area. Zero on an uninitialized page.
    #[inline]
    pub fn free_space_pointer(&self) -> u16 {
        read_u16(self.data, OFF_FREE_PTR)
    }

    /// Whether the page header has been initialized.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.free_space_pointer() != 0
    }

    /// Read a slot directory entry; `None` if out of range.
    pub fn slot(&self, index: u16) -> Option<Slot> {
        if index >= self.record_count() {
            return None;
        }
        let pos = HEADER_SIZE + index as usize * SLOT_ENTRY_SIZE;
        Some(Slot {
            offset: read_u16(self.data, pos),
            length: read_u16(self.data, pos + 2),
        })
    }

    /// Whether `index` refers to a live (non-tombstoned, in-range) record.
    pub fn is_live(&self, index: u16) -> bool {
        self.slot(index).is_some_and(|s| s.is_live())
    }

    /// Payload bytes of a live record; `None` if out of range or deleted.
    pub fn record(&self, index: u16) -> Option<&'a [u8]> {
        let slot = self.slot(index)?;
        if !slot.is_live() {
            return None;
        }
        let start = slot.offset as usize;
        Some(&self.data[start..start + slot.length as usize])
    }

    /// Contiguous free bytes between the slot directory and the record area.
    ///
    /// An uninitialized page reports the capacity it will have once
    /// initialized.
    pub fn free_space(&self) -> usize {
        if !self.is_initialized() {
            return PAGE_SIZE - HEADER_SIZE;
        }
        let dir_end = HEADER_SIZE + self.record_count() as usize * SLOT_ENTRY_SIZE;
        (self.free_space_pointer() as usize).saturating_sub(dir_end)
    }

    /// Number of live records (excludes tombstones).
    pub fn live_count(&self) -> u16 {
        (0..self.record_count()).filter(|&i| self.is_live(i)).count() as u16
    }
}

/// Mutable view of a page interpreted as a slotted page.
pub struct SlottedPageMut<'a> {
    data: &'a mut [u8],
}

impl<'a> SlottedPageMut<'a> {
    /// Interpret `data` as a slotted page for mutation.
    ///
    /// # Panics
    /// Panics if `data` is not exactly `PAGE_SIZE` bytes.
    pub fn new(data: &'a mut [u8]) -> Self {
        assert_eq!(data.len(), PAGE_SIZE, "slotted page must be PAGE_SIZE bytes");
        Self { data }
    }

    /// Read-only view of the same bytes.
    #[inline]
    pub fn as_read(&self) -> SlottedPage<'_> {
        SlottedPage { data: self.data }
    }

    /// Write an empty header: no slots, record area starting at the page end.
    pub fn init(&mut self) {
        write_u16(self.data, OFF_RECORD_COUNT, 0);
        write_u16(self.data, OFF_FREE_PTR, PAGE_SIZE as u16);
    }

    /// Initialize the header if the page is still all-zero.
    pub fn init_if_needed(&mut self) {
        if !self.as_read().is_initialized() {
            self.init();
        }
    }

    /// Insert a record, returning its slot index.
    ///
    /// Needs `record.len() + SLOT_ENTRY_SIZE` free bytes; when short, the
    /// page is compacted once and the check retried. Returns `None` if the
    /// record still does not fit. Tombstoned slots are never reused; the new
    /// record always gets a fresh slot index.
    pub fn insert(&mut self, record: &[u8]) -> Option<u16> {
        if record.len() > MAX_RECORD_SIZE {
            return None;
        }
        self.init_if_needed();

        let needed = record.len() + SLOT_ENTRY_SIZE;
        if self.as_read().free_space() < needed {
            self.compact();
            if self.as_read().free_space() < needed {
                return None;
            }
        }

        let index = self.as_read().record_count();
        let length = record.len() as u16;
        let free_ptr = self.as_read().free_space_pointer();
        let offset = free_ptr - length;

        self.data[offset as usize..free_ptr as usize].copy_from_slice(record);
        write_u16(self.data, OFF_FREE_PTR, offset);
        self.write_slot(index, Slot { offset, length });
        write_u16(self.data, OFF_RECORD_COUNT, index + 1);

        self.debug_check_invariant();
        Some(index)
    }

    /// Overwrite a live record in place, preserving its slot index.
    ///
    /// Shrinks reuse the existing payload bytes; growth relocates the
    /// payload within the page (compacting first when needed) and rewrites
    /// the slot entry. Returns `false` if the slot is not live or the page
    /// cannot hold the new payload; the record is left unchanged in that
    /// case.
    pub fn update(&mut self, index: u16, record: &[u8]) -> bool {
        let Some(slot) = self.as_read().slot(index) else {
            return false;
        };
        if !slot.is_live() || record.len() > MAX_RECORD_SIZE {
            return false;
        }

        let new_len = record.len() as u16;
        if new_len <= slot.length {
            let start = slot.offset as usize;
            self.data[start..start + record.len()].copy_from_slice(record);
            self.write_slot(
                index,
                Slot {
                    offset: slot.offset,
                    length: new_len,
                },
            );
            return true;
        }

        // Growth: the new payload needs fresh space in the free region. The
        // old payload becomes a gap reclaimed by the next compaction.
        if self.as_read().free_space() < record.len() {
            self.compact();
            if self.as_read().free_space() < record.len() {
                return false;
            }
        }

        let free_ptr = self.as_read().free_space_pointer();
        let offset = free_ptr - new_len;
        self.data[offset as usize..free_ptr as usize].copy_from_slice(record);
        write_u16(self.data, OFF_FREE_PTR, offset);
        self.write_slot(
            index,
            Slot {
                offset,
                length: new_len,
            },
        );

        self.debug_check_invariant();
        true
    }

    /// Tombstone a record. Returns `false` if the slot was not live.
    ///
    /// The payload bytes stay in place until the next compaction; the slot
    /// index is retired permanently.
    pub fn delete(&mut self, index: u16) -> bool {
        if !self.as_read().is_live(index) {
            return false;
        }
        self.write_slot(index, Slot::TOMBSTONE);
        true
    }

    /// Pack live payloads against the end of the page, squeezing out gaps
    /// left by deletions and relocating updates.
    ///
    /// Only byte offsets change. Slot indices - and therefore RecordIds -
    /// are preserved, tombstones included.
    pub fn compact(&mut self) {
        let reader = self.as_read();
        let count = reader.record_count();

        let mut live: Vec<(u16, Slot)> = (0..count)
            .filter_map(|i| reader.slot(i).filter(|s| s.is_live()).map(|s| (i, s)))
            .collect();
        // Highest offset first, so each move lands above every payload that
        // has not moved yet.
        live.sort_by(|a, b| b.1.offset.cmp(&a.1.offset));

        let mut write_ptr = PAGE_SIZE as u16;
        for (index, slot) in live {
            let new_offset = write_ptr - slot.length;
            if new_offset != slot.offset {
                self.data.copy_within(
                    slot.offset as usize..(slot.offset + slot.length) as usize,
                    new_offset as usize,
                );
            }
            self.write_slot(
                index,
                Slot {
                    offset: new_offset,
                    length: slot.length,
                },
            );
            write_ptr = new_offset;
        }
        write_u16(self.data, OFF_FREE_PTR, write_ptr);

        self.debug_check_invariant();
    }

    fn write_slot(&mut self, index: u16, slot: Slot) {
        let pos = HEADER_SIZE + index as usize * SLOT_ENTRY_SIZE;
        write_u16(self.data, pos, slot.offset);
        write_u16(self.data, pos + 2, slot.length);
    }

    fn debug_check_invariant(&self) {
        let reader = self.as_read();
        let dir_end = HEADER_SIZE + reader.record_count() as usize * SLOT_ENTRY_SIZE;
        debug_assert!(
            dir_end <= reader.free_space_pointer() as usize,
            "slot directory overlaps record area"
        );
    }
}
