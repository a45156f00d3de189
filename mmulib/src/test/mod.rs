mod address;
mod io;
mod report;
mod tlb;

use crate::config::{EvictionPolicyConfig, MmuConfig};

/// A store where every byte holds the low 8 bits of its own offset, so page `p` of size `s`
/// starts with `p * s`
pub fn patterned_store(page_count: usize, page_size: usize) -> Vec<u8> {
    (0..page_count * page_size).map(|i| i as u8).collect()
}

pub fn small_config(frame_count: usize, tlb_size: usize, policy: EvictionPolicyConfig) -> MmuConfig {
    MmuConfig {
        page_size: 4,
        page_bits: 8,
        frame_count,
        tlb_size,
        replacement_policy: policy,
    }
}

/// Deterministic pseudo-random addresses, with a skew towards a small working set so every
/// access kind shows up
pub fn address_stream(count: usize, seed: u64) -> Vec<u32> {
    let mut state = seed;
    (0..count)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let bits = (state >> 33) as u32;
            if bits % 4 == 0 {
                bits & 0xFFFF
            } else {
                bits & 0x0FFF
            }
        })
        .collect()
}
