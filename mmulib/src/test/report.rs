use std::error::Error;
use crate::config::EvictionPolicyConfig;
use crate::error::MmuError;
use crate::report::{write_json, write_report};
use crate::simulator::{SimulationResult, Simulator};
use crate::util::{parse_report, verify};
use super::{patterned_store, small_config};

const FIFO_REPORT: &str = "\
Virtual address: 0 Physical address: 0 Value: 0
Virtual address: 5 Physical address: 5 Value: 5
Virtual address: 10 Physical address: 2 Value: 10
Virtual address: 3 Physical address: 7 Value: 3
Number of Translated Addresses = 4
Page Faults = 4
Page Fault Rate = 1.000
TLB Hits = 0
TLB Hit Rate = 0.000
";

fn fifo_run() -> Result<SimulationResult, MmuError> {
    let mut simulator = Simulator::new(&small_config(2, 1, EvictionPolicyConfig::Fifo), patterned_store(4, 4))?;
    simulator.simulate([0, 5, 10, 3])?;
    Ok(simulator.into_result())
}

#[test]
fn text_report_format() -> Result<(), Box<dyn Error>> {
    let mut out = Vec::new();
    write_report(&mut out, &fifo_run()?)?;
    assert_eq!(String::from_utf8(out)?, FIFO_REPORT);
    Ok(())
}

#[test]
fn empty_report_skips_rates() -> Result<(), Box<dyn Error>> {
    let mut out = Vec::new();
    write_report(&mut out, &SimulationResult::default())?;
    assert_eq!(String::from_utf8(out)?, "Number of Translated Addresses = 0\nPage Faults = 0\nTLB Hits = 0\n");
    Ok(())
}

#[test]
fn json_report_round_trips() -> Result<(), Box<dyn Error>> {
    let result = fifo_run()?;
    let mut out = Vec::new();
    write_json(&mut out, &result)?;
    let parsed: SimulationResult = serde_json::from_slice(&out)?;
    assert_eq!(parsed, result);
    assert!(String::from_utf8(out)?.contains("\"kind\": \"page_fault\""));
    Ok(())
}

#[test]
fn reference_report_verifies() -> Result<(), Box<dyn Error>> {
    let expected = parse_report(FIFO_REPORT)?;
    assert_eq!(expected.translations.len(), 4);
    assert_eq!(expected.translated_addresses, Some((4, 5)));
    assert_eq!(expected.page_faults, Some((4, 6)));
    assert_eq!(expected.tlb_hits, Some((0, 8)));
    verify(&expected, &fifo_run()?)?;
    Ok(())
}

#[test]
fn reference_report_mismatches() -> Result<(), Box<dyn Error>> {
    let result = fifo_run()?;

    let wrong_value = parse_report(&FIFO_REPORT.replace("Value: 10", "Value: -10"))?;
    match verify(&wrong_value, &result) {
        Err(MmuError::ReportMismatch { line, actual, .. }) => {
            assert_eq!(line, 3);
            assert_eq!(actual, "Virtual address: 10 Physical address: 2 Value: 10");
        }
        other => panic!("expected a mismatch, got {other:?}"),
    }

    let wrong_faults = parse_report(&FIFO_REPORT.replace("Page Faults = 4", "Page Faults = 3"))?;
    assert!(matches!(verify(&wrong_faults, &result), Err(MmuError::ReportMismatch { line: 6, .. })));

    let wrong_tlb_hits = parse_report(&FIFO_REPORT.replace("TLB Hits = 0", "TLB Hits = 7"))?;
    match verify(&wrong_tlb_hits, &result) {
        Err(MmuError::ReportMismatch { line, expected, actual }) => {
            assert_eq!(line, 8);
            assert_eq!(expected, "TLB Hits = 7");
            assert_eq!(actual, "TLB Hits = 0");
        }
        other => panic!("expected a mismatch, got {other:?}"),
    }

    // A report covering only a prefix of the run
    let prefix = parse_report("Virtual address: 0 Physical address: 0 Value: 0\n")?;
    assert!(matches!(verify(&prefix, &result), Err(MmuError::ReportMismatch { line: 1, .. })));
    Ok(())
}

#[test]
fn malformed_reference_report() {
    let text = "Virtual address: 0 Physical address: 0 Value: 0\n\nnot a report line\n";
    assert!(matches!(parse_report(text), Err(MmuError::MalformedReport { line: 3, .. })));
    let out_of_range = "Virtual address: 0 Physical address: 0 Value: 300\n";
    assert!(matches!(parse_report(out_of_range), Err(MmuError::MalformedReport { line: 1, .. })));
}
