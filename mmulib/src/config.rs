use std::fmt;
use std::io::Read;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::address::{AddressLayout, ADDRESS_BITS};
use crate::error::MmuError;

pub const DEFAULT_PAGE_SIZE: u32 = 256;
pub const DEFAULT_PAGE_BITS: u32 = 8;
pub const DEFAULT_FRAME_COUNT: usize = 128;
pub const DEFAULT_TLB_SIZE: usize = 16;

/// Geometry and policy of a simulated MMU. Every field is optional in JSON, missing fields take
/// the defaults (256 byte pages, 8 bit page numbers, 128 frames, 16 TLB entries, fifo)
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MmuConfig {
    pub page_size: u32,
    pub page_bits: u32,
    pub frame_count: usize,
    pub tlb_size: usize,
    pub replacement_policy: EvictionPolicyConfig,
}

impl Default for MmuConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_bits: DEFAULT_PAGE_BITS,
            frame_count: DEFAULT_FRAME_COUNT,
            tlb_size: DEFAULT_TLB_SIZE,
            replacement_policy: EvictionPolicyConfig::default(),
        }
    }
}

impl MmuConfig {
    /// Reads a configuration from JSON
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, MmuError> {
        serde_json::from_reader(reader)
            .map_err(|e| MmuError::InvalidConfig(format!("Couldn't parse the config file: {e}")))
    }

    /// Number of offset bits, only meaningful for a power of two page size
    pub fn offset_bits(&self) -> u32 {
        self.page_size.trailing_zeros()
    }

    /// Checks the geometry can be simulated, returning the address layout it implies
    ///
    /// Physical addresses are reported as u32, so the table can hold at most 2^32 bytes
    pub fn validate(&self) -> Result<AddressLayout, MmuError> {
        if !self.page_size.is_power_of_two() {
            return Err(MmuError::InvalidConfig(format!("page size {} is not a power of two", self.page_size)));
        }
        if self.page_bits.saturating_add(self.offset_bits()) > ADDRESS_BITS {
            return Err(MmuError::InvalidConfig(format!(
                "{} page bits and {} offset bits don't fit in a {ADDRESS_BITS} bit address",
                self.page_bits,
                self.offset_bits()
            )));
        }
        if self.frame_count == 0 {
            return Err(MmuError::InvalidConfig("the page table needs at least one frame".to_string()));
        }
        if self.tlb_size > self.frame_count {
            return Err(MmuError::InvalidConfig(format!(
                "TLB of {} entries is larger than the page table ({} frames)",
                self.tlb_size, self.frame_count
            )));
        }
        let table_bytes = (self.frame_count as u64).checked_mul(self.page_size as u64);
        if table_bytes.map_or(true, |bytes| bytes > 1u64 << ADDRESS_BITS) {
            return Err(MmuError::InvalidConfig(format!(
                "{} frames of {} bytes exceed the physical address space",
                self.frame_count, self.page_size
            )));
        }
        let layout = AddressLayout::new(self.page_bits, self.offset_bits())?;
        if self.replacement_policy == EvictionPolicyConfig::NoEviction
            && (self.frame_count as u64) < layout.virtual_page_count()
        {
            return Err(MmuError::InvalidConfig(format!(
                "policy none needs a frame for each of the {} virtual pages, only {} configured",
                layout.virtual_page_count(),
                self.frame_count
            )));
        }
        Ok(layout)
    }
}

/// The eviction policy of the page table - fifo, lru, or none. Defaults to fifo.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
pub enum EvictionPolicyConfig {
    #[default]
    #[serde(alias = "fifo")]
    Fifo,
    #[serde(alias = "lru")]
    LeastRecentlyUsed,
    /// Fill frames in order and never evict, the table must cover the whole virtual page space
    #[serde(alias = "none", alias = "fill")]
    NoEviction,
}

impl FromStr for EvictionPolicyConfig {
    type Err = MmuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fifo" => Ok(EvictionPolicyConfig::Fifo),
            "lru" => Ok(EvictionPolicyConfig::LeastRecentlyUsed),
            "none" | "fill" => Ok(EvictionPolicyConfig::NoEviction),
            other => Err(MmuError::UnknownPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for EvictionPolicyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EvictionPolicyConfig::Fifo => "fifo",
            EvictionPolicyConfig::LeastRecentlyUsed => "lru",
            EvictionPolicyConfig::NoEviction => "none",
        })
    }
}
