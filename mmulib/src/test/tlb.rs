use crate::tlb::{Tlb, TlbHit};

#[test]
fn fills_invalid_slots_in_order() {
    let mut tlb = Tlb::new(3);
    assert_eq!(tlb.lookup(7), None);
    assert_eq!(tlb.install(7, 2, 0), Some(0));
    assert_eq!(tlb.install(9, 0, 1), Some(1));
    assert_eq!(tlb.valid_entry_count(), 2);
    assert_eq!(tlb.lookup(9), Some(TlbHit { entry_index: 1, frame_index: 0 }));
}

#[test]
fn evicts_least_recently_used_entry() {
    let mut tlb = Tlb::new(2);
    tlb.install(1, 0, 0);
    tlb.install(2, 1, 1);
    tlb.touch(0, 2);
    // Slot 1 (last used at 1) goes
    assert_eq!(tlb.install(3, 2, 3), Some(1));
    assert_eq!(tlb.lookup(2), None);
    assert_eq!(tlb.lookup(1).map(|hit| hit.frame_index), Some(0));
    assert_eq!(tlb.lookup(3).map(|hit| hit.frame_index), Some(2));
}

#[test]
fn ties_go_to_lowest_slot() {
    let mut tlb = Tlb::new(3);
    for page in 0..3 {
        tlb.install(page, page as usize, 4);
    }
    assert_eq!(tlb.install(10, 0, 5), Some(0));
}

#[test]
fn reinstalling_a_page_refreshes_its_entry() {
    let mut tlb = Tlb::new(3);
    tlb.install(1, 0, 0);
    tlb.install(2, 1, 1);
    assert_eq!(tlb.install(1, 2, 2), Some(0));
    assert_eq!(tlb.valid_entry_count(), 2);
    let entry = tlb.entries()[0];
    assert_eq!((entry.page_number, entry.frame_index, entry.last_used_at), (1, 2, 2));
}

#[test]
fn invalidated_slot_is_reused_first() {
    let mut tlb = Tlb::new(2);
    tlb.install(1, 0, 0);
    tlb.install(2, 1, 1);
    tlb.invalidate(1);
    assert_eq!(tlb.lookup(2), None);
    assert_eq!(tlb.install(3, 1, 2), Some(1));
}

#[test]
fn zero_capacity_never_hits() {
    let mut tlb = Tlb::new(0);
    assert_eq!(tlb.install(1, 0, 0), None);
    assert_eq!(tlb.lookup(1), None);
    assert_eq!(tlb.capacity(), 0);
}
