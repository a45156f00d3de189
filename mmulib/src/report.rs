use std::io::{self, Write};
use crate::simulator::{SimulationResult, TranslationResult};

/// Formats one translation the way the reference reports do
pub fn format_translation(translation: &TranslationResult) -> String {
    format!(
        "Virtual address: {} Physical address: {} Value: {}",
        translation.virtual_address, translation.physical_address, translation.value
    )
}

/// Writes the text report: one line per translation in input order, then the summary
///
/// Rates are printed to three decimal places. A run with no accesses has no rates, so those
/// lines are left out rather than failing the report
pub fn write_report<W: Write>(mut out: W, result: &SimulationResult) -> io::Result<()> {
    for translation in &result.results {
        writeln!(out, "{}", format_translation(translation))?;
    }
    let statistics = &result.statistics;
    writeln!(out, "Number of Translated Addresses = {}", statistics.total_accesses)?;
    writeln!(out, "Page Faults = {}", statistics.fault_count)?;
    if let Ok(rate) = statistics.fault_rate() {
        writeln!(out, "Page Fault Rate = {rate:.3}")?;
    }
    writeln!(out, "TLB Hits = {}", statistics.tlb_hit_count)?;
    if let Ok(rate) = statistics.tlb_hit_rate() {
        writeln!(out, "TLB Hit Rate = {rate:.3}")?;
    }
    out.flush()
}

/// Writes the whole result as pretty-printed JSON
pub fn write_json<W: Write>(mut out: W, result: &SimulationResult) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut out, result)?;
    writeln!(out)?;
    out.flush()
}
