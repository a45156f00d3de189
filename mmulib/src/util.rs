use lazy_static::lazy_static;
use regex::Regex;
use crate::error::MmuError;
use crate::simulator::{SimulationResult, TranslationResult};

lazy_static! {
    static ref TRANSLATION_LINE: Regex = Regex::new(
        r"^Virtual address: (?P<virtual>\d+) Physical address: (?P<physical>\d+) Value: (?P<value>-?\d+)$"
    ).unwrap();
    static ref SUMMARY_LINE: Regex = Regex::new(
        r"^(?P<name>Number of Translated Addresses|Page Faults|Page Fault Rate|TLB Hits|TLB Hit Rate) = (?P<value>[0-9.eE+-]+)$"
    ).unwrap();
}

/// One translation line from a reference report
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ReportedTranslation {
    pub line: usize,
    pub virtual_address: u32,
    pub physical_address: u32,
    pub value: i8,
}

/// A text report parsed back into records. Summary counters are optional, as reports cut
/// from a longer run may not have them
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ParsedReport {
    pub translations: Vec<ReportedTranslation>,
    /// Counters are kept with the line they were read from
    pub translated_addresses: Option<(u64, usize)>,
    pub page_faults: Option<(u64, usize)>,
    pub tlb_hits: Option<(u64, usize)>,
}

/// Parses a report in the format written by `report::write_report`
///
/// Rate lines are recognised but not kept; they're derived from the counters, and older
/// reports print them at varying precision
pub fn parse_report(text: &str) -> Result<ParsedReport, MmuError> {
    let mut report = ParsedReport::default();
    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let malformed = || MmuError::MalformedReport {
            line: line_number,
            content: trimmed.to_string(),
        };
        if let Some(tokens) = TRANSLATION_LINE.captures(trimmed) {
            report.translations.push(ReportedTranslation {
                line: line_number,
                virtual_address: tokens["virtual"].parse().map_err(|_| malformed())?,
                physical_address: tokens["physical"].parse().map_err(|_| malformed())?,
                value: tokens["value"].parse().map_err(|_| malformed())?,
            });
        } else if let Some(tokens) = SUMMARY_LINE.captures(trimmed) {
            let counter = match &tokens["name"] {
                "Number of Translated Addresses" => &mut report.translated_addresses,
                "Page Faults" => &mut report.page_faults,
                "TLB Hits" => &mut report.tlb_hits,
                _ => continue,
            };
            *counter = Some((tokens["value"].parse().map_err(|_| malformed())?, line_number));
        } else {
            return Err(malformed());
        }
    }
    Ok(report)
}

fn mismatch(line: usize, expected: impl ToString, actual: impl ToString) -> MmuError {
    MmuError::ReportMismatch {
        line,
        expected: expected.to_string(),
        actual: actual.to_string(),
    }
}

fn same_translation(expected: &ReportedTranslation, actual: &TranslationResult) -> bool {
    expected.virtual_address == actual.virtual_address
        && expected.physical_address == actual.physical_address
        && expected.value == actual.value
}

/// Checks a simulated run against a reference report, failing on the first difference
pub fn verify(expected: &ParsedReport, actual: &SimulationResult) -> Result<(), MmuError> {
    for (index, reported) in expected.translations.iter().enumerate() {
        let translation = actual.results.get(index).ok_or_else(|| {
            mismatch(reported.line, format!("translation #{}", index + 1), "end of run")
        })?;
        if !same_translation(reported, translation) {
            return Err(mismatch(
                reported.line,
                format!(
                    "Virtual address: {} Physical address: {} Value: {}",
                    reported.virtual_address, reported.physical_address, reported.value
                ),
                crate::report::format_translation(translation),
            ));
        }
    }
    if actual.results.len() > expected.translations.len() {
        return Err(mismatch(
            expected.translations.last().map_or(0, |t| t.line),
            format!("{} translations", expected.translations.len()),
            format!("{} translations", actual.results.len()),
        ));
    }

    let statistics = &actual.statistics;
    let counters = [
        ("Number of Translated Addresses", expected.translated_addresses, statistics.total_accesses),
        ("Page Faults", expected.page_faults, statistics.fault_count),
        ("TLB Hits", expected.tlb_hits, statistics.tlb_hit_count),
    ];
    for (name, reported, simulated) in counters {
        match reported {
            Some((value, line)) if value != simulated => {
                return Err(mismatch(line, format!("{name} = {value}"), format!("{name} = {simulated}")));
            }
            _ => {}
        }
    }
    Ok(())
}
