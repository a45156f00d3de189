/// A single TLB slot mapping a page number to the frame holding it
///
/// `frame_index` is a plain index into the page table, the TLB never owns or modifies frames. An
/// entry can go stale when its frame is reused for another page; the translator catches that by
/// comparing the frame's resident page with `page_number`
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TlbEntry {
    pub page_number: u32,
    pub frame_index: usize,
    pub last_used_at: u64,
    pub valid: bool,
}

/// A hit in the TLB: which slot matched, and the frame it points at
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TlbHit {
    pub entry_index: usize,
    pub frame_index: usize,
}

/// Fully associative translation lookaside buffer with least recently used replacement
///
/// A capacity of zero is allowed and behaves as if there were no TLB at all
pub struct Tlb {
    entries: Vec<TlbEntry>,
}

impl Tlb {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: vec![TlbEntry::default(); capacity],
        }
    }

    pub fn lookup(&self, page_number: u32) -> Option<TlbHit> {
        self.entries
            .iter()
            .position(|entry| entry.valid && entry.page_number == page_number)
            .map(|entry_index| TlbHit {
                entry_index,
                frame_index: self.entries[entry_index].frame_index,
            })
    }

    /// Maps a page to a frame, returning the slot used
    ///
    /// A valid entry for the same page is refreshed in place. Otherwise the lowest invalid slot
    /// is filled, and once there are none the least recently used entry is overwritten (lowest
    /// slot on ties)
    ///
    /// # Arguments
    ///
    /// * `page_number`: The virtual page
    /// * `frame_index`: The frame the page table resolved it to
    /// * `sequence`: Sequence number of the current access
    ///
    /// returns: Option<usize>, None only when the TLB has no slots
    pub fn install(&mut self, page_number: u32, frame_index: usize, sequence: u64) -> Option<usize> {
        let slot = self
            .entries
            .iter()
            .position(|entry| entry.valid && entry.page_number == page_number)
            .or_else(|| self.entries.iter().position(|entry| !entry.valid))
            .or_else(|| self.least_recently_used())?;
        self.entries[slot] = TlbEntry {
            page_number,
            frame_index,
            last_used_at: sequence,
            valid: true,
        };
        Some(slot)
    }

    pub fn touch(&mut self, entry_index: usize, sequence: u64) {
        self.entries[entry_index].last_used_at = sequence;
    }

    /// Drops a stale entry, freeing its slot for the next install
    pub fn invalidate(&mut self, entry_index: usize) {
        self.entries[entry_index].valid = false;
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    pub fn valid_entry_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.valid).count()
    }

    pub fn entries(&self) -> &[TlbEntry] {
        &self.entries
    }

    fn least_recently_used(&self) -> Option<usize> {
        let mut victim: Option<usize> = None;
        for (index, entry) in self.entries.iter().enumerate() {
            match victim {
                Some(v) if self.entries[v].last_used_at <= entry.last_used_at => {}
                _ => victim = Some(index),
            }
        }
        victim
    }
}
