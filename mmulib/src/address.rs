use serde::{Deserialize, Serialize};
use crate::error::MmuError;

/// Width of a raw virtual address
pub const ADDRESS_BITS: u32 = u32::BITS;

/// A virtual address split into its page number and page offset
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct VirtualAddress {
    pub raw: u32,
    pub page_number: u32,
    pub offset: u32,
}

impl VirtualAddress {
    /// Rebuilds the raw address from the page number and offset. Only equal to `raw` when
    /// `raw` fits inside the layout it was decoded with, as higher bits are discarded on decode.
    /// A page size that doesn't match that layout wraps around the 32 bit address space
    pub fn to_raw(&self, page_size: u32) -> u32 {
        self.page_number.wrapping_mul(page_size).wrapping_add(self.offset)
    }
}

/// The bit split used to decode raw addresses. Offset bits are the low bits, page bits sit
/// directly above them, anything higher is ignored
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct AddressLayout {
    page_bits: u32,
    offset_bits: u32,
    page_mask: u32,
    offset_mask: u32,
}

impl AddressLayout {
    pub fn new(page_bits: u32, offset_bits: u32) -> Result<Self, MmuError> {
        if page_bits.saturating_add(offset_bits) > ADDRESS_BITS {
            return Err(MmuError::invalid_address(
                format!("layout {page_bits}+{offset_bits}"),
                format!("needs more than {ADDRESS_BITS} bits"),
            ));
        }
        Ok(Self {
            page_bits,
            offset_bits,
            page_mask: low_bit_mask(page_bits),
            offset_mask: low_bit_mask(offset_bits),
        })
    }

    #[inline]
    pub fn decode(&self, raw: u32) -> VirtualAddress {
        // A shift by the full width is an overflow in Rust, checked_shr covers offset_bits == 32
        let page_number = raw.checked_shr(self.offset_bits).unwrap_or(0) & self.page_mask;
        VirtualAddress {
            raw,
            page_number,
            offset: raw & self.offset_mask,
        }
    }

    pub fn page_bits(&self) -> u32 {
        self.page_bits
    }

    pub fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    /// Number of distinct page numbers this layout can produce
    pub fn virtual_page_count(&self) -> u64 {
        1u64 << self.page_bits
    }
}

/// Decodes a raw address under the given bit widths
///
/// # Arguments
///
/// * `raw`: The raw virtual address
/// * `page_bits`: Width of the page number
/// * `offset_bits`: Width of the page offset, log2 of the page size
///
/// returns: Result<VirtualAddress, MmuError>
///
/// # Examples
///
/// ```
/// use mmulib::address::decode;
/// let address = decode(0x1234, 8, 8).unwrap();
/// assert_eq!((address.page_number, address.offset), (0x12, 0x34));
/// ```
pub fn decode(raw: u32, page_bits: u32, offset_bits: u32) -> Result<VirtualAddress, MmuError> {
    Ok(AddressLayout::new(page_bits, offset_bits)?.decode(raw))
}

fn low_bit_mask(bits: u32) -> u32 {
    if bits >= u32::BITS {
        u32::MAX
    } else {
        (1u32 << bits) - 1
    }
}
