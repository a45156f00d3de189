//! # MmuLib
//!
//! MmuLib is a library for simulating virtual address translation through a TLB and a page
//! table backed by a flat backing store file
//!
//! It resolves each address the way an MMU and a page-fault handler would, reporting the
//! physical address and the byte found there, and counts page faults and TLB hits along the way.
//! Page tables are parameterised by their eviction policy, and every run is deterministic

/// Splitting raw virtual addresses into page numbers and offsets
pub mod address;

/// The backing store trait, with file, memory-mapped, and in-memory implementations
pub mod backing_store;

/// Contains definitions for the JSON configuration format and the policy tokens
pub mod config;

/// The error type shared by the whole library
pub mod error;

/// Helpers for opening the backing store and reading address lists
pub mod io;

/// Contains the page table implementation, and a utility enum for the provided policies
pub mod page_table;

/// Contains the provided eviction policies, with a trait for implementing custom ones
pub mod replacement_policies;

/// Text and JSON output for simulation results
pub mod report;

/// Contains the simulator used to translate address streams with a given configuration
pub mod simulator;

/// The translation lookaside buffer
pub mod tlb;

#[cfg(test)]
mod test;

/// Contains utilities for checking runs against reference reports.
pub mod util;
