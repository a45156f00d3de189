use std::time::{Duration, Instant};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use crate::address::{AddressLayout, VirtualAddress};
use crate::backing_store::BackingStore;
use crate::config::{EvictionPolicyConfig, MmuConfig};
use crate::error::MmuError;
use crate::page_table::{GenericPageTable, PageTable, PageTableTrait};
use crate::replacement_policies::{Fifo, LeastRecentlyUsed, NoEviction};
use crate::tlb::Tlb;

/// How an access was resolved
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessKind {
    TlbHit,
    PageTableHit,
    PageFault,
}

/// The translation of a single virtual address
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub virtual_address: u32,
    pub physical_address: u32,
    pub value: i8,
    pub kind: AccessKind,
}

/// Counters for one run. Every access is exactly one of a TLB hit, a page table hit, or a fault
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_accesses: u64,
    pub fault_count: u64,
    pub tlb_hit_count: u64,
    pub page_table_hit_count: u64,
}

impl Statistics {
    pub fn fault_rate(&self) -> Result<f64, MmuError> {
        self.rate(self.fault_count)
    }

    pub fn tlb_hit_rate(&self) -> Result<f64, MmuError> {
        self.rate(self.tlb_hit_count)
    }

    fn rate(&self, count: u64) -> Result<f64, MmuError> {
        if self.total_accesses == 0 {
            return Err(MmuError::EmptyInput);
        }
        Ok(count as f64 / self.total_accesses as f64)
    }

    fn record(&mut self, kind: AccessKind) {
        self.total_accesses += 1;
        match kind {
            AccessKind::TlbHit => self.tlb_hit_count += 1,
            AccessKind::PageTableHit => self.page_table_hit_count += 1,
            AccessKind::PageFault => self.fault_count += 1,
        }
    }
}

/// The result of a simulation. Can be serialised to JSON
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub statistics: Statistics,
    pub results: Vec<TranslationResult>,
}

/// The simulator owns the TLB, page table, and backing store for one run, and resolves
/// addresses through them strictly in order.
///
/// It supports calling simulate multiple times, each call continues the same run: the sequence
/// clock, tables, and results carry over. Start a new simulator for an independent run
pub struct Simulator<S: BackingStore> {
    layout: AddressLayout,
    page_size: u32,
    page_table: GenericPageTable,
    tlb: Tlb,
    store: S,
    // Logical clock, one tick per translated address. Drives fifo ages and lru recency
    sequence: u64,
    result: SimulationResult,
    simulation_time: Duration,
}

impl<S: BackingStore> Simulator<S> {
    /// Creates a new simulator for a given configuration
    ///
    /// # Arguments
    ///
    /// * `config`: The MMU geometry and policy, validated here before anything is simulated
    /// * `store`: The backing store pages are loaded from on faults
    ///
    /// returns: Result<Simulator<S>, MmuError>
    pub fn new(config: &MmuConfig, store: S) -> Result<Self, MmuError> {
        let layout = config.validate()?;
        let page_size = config.page_size as usize;
        let page_table = match config.replacement_policy {
            EvictionPolicyConfig::Fifo => {
                GenericPageTable::from(PageTable::new(config.frame_count, page_size, Fifo)?)
            }
            EvictionPolicyConfig::LeastRecentlyUsed => {
                GenericPageTable::from(PageTable::new(config.frame_count, page_size, LeastRecentlyUsed)?)
            }
            EvictionPolicyConfig::NoEviction => {
                GenericPageTable::from(PageTable::new(config.frame_count, page_size, NoEviction)?)
            }
        };
        debug!(
            "Simulating {} frames of {} bytes, {} TLB entries, {} page bits, {} offset bits, policy {}",
            config.frame_count,
            config.page_size,
            config.tlb_size,
            layout.page_bits(),
            layout.offset_bits(),
            config.replacement_policy
        );
        Ok(Self {
            layout,
            page_size: config.page_size,
            page_table,
            tlb: Tlb::new(config.tlb_size),
            store,
            sequence: 0,
            result: SimulationResult::default(),
            simulation_time: Duration::new(0, 0),
        })
    }

    /// Translates one address, recording its result and updating the statistics
    ///
    /// returns: Result<TranslationResult, MmuError>, an error means the run can't continue
    pub fn translate(&mut self, raw: u32) -> Result<TranslationResult, MmuError> {
        let address = self.layout.decode(raw);
        let sequence = self.sequence;
        let (frame_index, kind) = self.resolve(&address, sequence)?;
        let translation = TranslationResult {
            virtual_address: raw,
            // Validated at construction: frame_count * page_size fits in the address space
            physical_address: frame_index as u32 * self.page_size + address.offset,
            value: self.page_table.read_byte(frame_index, address.offset as usize),
            kind,
        };
        trace!(
            "#{sequence} {raw} (page {}, offset {}) -> {} {:?}",
            address.page_number, address.offset, translation.physical_address, kind
        );
        self.sequence += 1;
        self.result.statistics.record(kind);
        self.result.results.push(translation);
        Ok(translation)
    }

    /// Finds (or loads) the frame for an address, TLB first, then the page table, then the
    /// backing store
    fn resolve(&mut self, address: &VirtualAddress, sequence: u64) -> Result<(usize, AccessKind), MmuError> {
        let page = address.page_number;
        if let Some(hit) = self.tlb.lookup(page) {
            if self.page_table.frame(hit.frame_index).resident_page() == Some(page) {
                self.tlb.touch(hit.entry_index, sequence);
                // TLB hits count as uses of the frame for lru
                self.page_table.touch(hit.frame_index, sequence);
                return Ok((hit.frame_index, AccessKind::TlbHit));
            }
            trace!("Stale TLB entry {} for page {page}, frame {} was reused", hit.entry_index, hit.frame_index);
            self.tlb.invalidate(hit.entry_index);
        }

        let (frame_index, kind) = match self.page_table.lookup(page) {
            Some(frame_index) => {
                self.page_table.touch(frame_index, sequence);
                (frame_index, AccessKind::PageTableHit)
            }
            None => (self.page_table.install(page, sequence, &mut self.store)?, AccessKind::PageFault),
        };
        self.tlb.install(page, frame_index, sequence);
        Ok((frame_index, kind))
    }

    /// Simulates a whole stream of addresses in order
    ///
    /// Stops at the first error; the partial results of an aborted run shouldn't be trusted
    ///
    /// # Arguments
    ///
    /// * `addresses`: The raw virtual addresses
    ///
    /// returns: Result<&SimulationResult, MmuError>
    pub fn simulate<I: IntoIterator<Item = u32>>(&mut self, addresses: I) -> Result<&SimulationResult, MmuError> {
        let start = Instant::now();
        let outcome = addresses
            .into_iter()
            .try_for_each(|raw| self.translate(raw).map(|_| ()));
        self.simulation_time += start.elapsed();
        outcome?;
        Ok(&self.result)
    }

    pub fn result(&self) -> &SimulationResult {
        &self.result
    }

    pub fn statistics(&self) -> &Statistics {
        &self.result.statistics
    }

    pub fn results(&self) -> &[TranslationResult] {
        &self.result.results
    }

    pub fn page_table(&self) -> &GenericPageTable {
        &self.page_table
    }

    pub fn tlb(&self) -> &Tlb {
        &self.tlb
    }

    pub fn layout(&self) -> &AddressLayout {
        &self.layout
    }

    /// Gets the wall-clock execution time spent in simulate
    pub fn get_execution_time(&self) -> &Duration {
        &self.simulation_time
    }

    /// Gets the number of frames which were never loaded
    pub fn get_empty_frame_count(&self) -> usize {
        self.page_table.get_empty_frame_count()
    }

    pub fn into_result(self) -> SimulationResult {
        self.result
    }
}
