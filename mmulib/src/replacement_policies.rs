use crate::page_table::Frame;

/// A victim selection rule for a full page table. Can be used to parameterise a PageTable.
///
/// Policies are only consulted once every frame is resident; filling empty frames in index order
/// is the page table's job
pub trait EvictionPolicy {
    /// Picks the frame to overwrite
    ///
    /// # Arguments
    ///
    /// * `frames`: Every frame of the table, all of them resident
    ///
    /// returns: Option<usize>, the victim's frame index, or None if this policy never evicts
    fn select_victim(&mut self, frames: &[Frame]) -> Option<usize>;
}

/// Index of the frame with the smallest key, the lowest index wins ties
fn lowest_by<F: Fn(&Frame) -> u64>(frames: &[Frame], key: F) -> Option<usize> {
    let mut min_value = u64::MAX;
    let mut min_index = None;
    let mut index = 0;
    while index < frames.len() {
        let value = key(&frames[index]);
        // Strict comparison keeps the first of equal keys
        if min_index.is_none() || value < min_value {
            min_value = value;
            min_index = Some(index);
        }
        index += 1;
    }
    min_index
}

/// First in first out, evicts the frame which was loaded earliest
#[derive(Default)]
pub struct Fifo;

impl EvictionPolicy for Fifo {
    fn select_victim(&mut self, frames: &[Frame]) -> Option<usize> {
        lowest_by(frames, Frame::created_at)
    }
}

/// Least recently used, evicts the frame whose last hit (or load) is oldest
///
/// Recency lives on the frames themselves as access sequence numbers, which the translator
/// refreshes on both TLB and page table hits
#[derive(Default)]
pub struct LeastRecentlyUsed;

impl EvictionPolicy for LeastRecentlyUsed {
    fn select_victim(&mut self, frames: &[Frame]) -> Option<usize> {
        lowest_by(frames, Frame::last_used_at)
    }
}

/// Replace-on-first-empty-slot. Never picks a victim, so the table must have a frame for every
/// virtual page
#[derive(Default)]
pub struct NoEviction;

impl EvictionPolicy for NoEviction {
    fn select_victim(&mut self, _frames: &[Frame]) -> Option<usize> {
        None
    }
}
