use std::error::Error;
use crate::address::{decode, AddressLayout};
use crate::error::MmuError;

#[test]
fn splits_page_and_offset() -> Result<(), Box<dyn Error>> {
    let address = decode(16916, 8, 8)?;
    assert_eq!((address.page_number, address.offset), (66, 20));
    let address = decode(62493, 8, 8)?;
    assert_eq!((address.page_number, address.offset), (244, 29));
    Ok(())
}

#[test]
fn bits_above_the_layout_are_ignored() -> Result<(), Box<dyn Error>> {
    let address = decode(0xABCD_1234, 8, 8)?;
    assert_eq!(address.raw, 0xABCD_1234);
    assert_eq!((address.page_number, address.offset), (0x12, 0x34));
    let address = decode(0x0000_FF80, 7, 8)?;
    assert_eq!((address.page_number, address.offset), (0x7F, 0x80));
    Ok(())
}

#[test]
fn round_trips_inside_the_layout() -> Result<(), Box<dyn Error>> {
    for (page_bits, offset_bits) in [(8, 8), (7, 8), (2, 2)] {
        let layout = AddressLayout::new(page_bits, offset_bits)?;
        let page_size = 1u32 << offset_bits;
        for raw in 0..(1u32 << (page_bits + offset_bits)) {
            let address = layout.decode(raw);
            assert!(address.offset < page_size);
            assert!(address.page_number < (1 << page_bits));
            assert_eq!(address.to_raw(page_size), raw);
        }
    }
    Ok(())
}

#[test]
fn full_width_layouts() -> Result<(), Box<dyn Error>> {
    let all_offset = decode(u32::MAX, 0, 32)?;
    assert_eq!((all_offset.page_number, all_offset.offset), (0, u32::MAX));
    let all_page = decode(u32::MAX, 32, 0)?;
    assert_eq!((all_page.page_number, all_page.offset), (u32::MAX, 0));
    Ok(())
}

#[test]
fn to_raw_with_a_mismatched_page_size_wraps() -> Result<(), Box<dyn Error>> {
    let all_page = decode(u32::MAX, 32, 0)?;
    assert_eq!(all_page.to_raw(256), u32::MAX.wrapping_mul(256));
    assert_eq!(all_page.to_raw(1), u32::MAX);
    let address = decode(0x1234, 8, 8)?;
    assert_eq!(address.to_raw(u32::MAX), 0x12u32.wrapping_mul(u32::MAX).wrapping_add(0x34));
    Ok(())
}

#[test]
fn layout_wider_than_an_address_is_rejected() {
    assert!(matches!(decode(1, 20, 16), Err(MmuError::InvalidAddress { .. })));
    assert!(matches!(AddressLayout::new(33, 0), Err(MmuError::InvalidAddress { .. })));
}
