use std::error::Error;
use std::io::{BufReader, Write};
use tempfile::NamedTempFile;
use crate::config::MmuConfig;
use crate::error::MmuError;
use crate::io::{open_backing_store, read_addresses};
use crate::simulator::{AccessKind, Simulator};
use super::patterned_store;

#[test]
fn reads_decimal_lines() -> Result<(), Box<dyn Error>> {
    let addresses = read_addresses("16916\n62493\n\n  30198 \r\n4294967295".as_bytes())?;
    assert_eq!(addresses, vec![16916, 62493, 30198, u32::MAX]);
    assert!(read_addresses("".as_bytes())?.is_empty());
    Ok(())
}

#[test]
fn malformed_line_names_its_position() {
    for text in ["1\nabc\n3", "1\n-4\n", "1\n4294967296\n"] {
        match read_addresses(text.as_bytes()) {
            Err(MmuError::InvalidAddress { input, .. }) => assert!(input.contains("line 2"), "{input}"),
            other => panic!("expected an invalid address, got {other:?}"),
        }
    }
}

#[test]
fn simulates_from_files() -> Result<(), Box<dyn Error>> {
    let mut store_file = NamedTempFile::new()?;
    store_file.write_all(&patterned_store(256, 256))?;
    store_file.flush()?;
    let mut address_file = NamedTempFile::new()?;
    writeln!(address_file, "16916\n62493\n16917")?;
    address_file.flush()?;

    let store = open_backing_store(store_file.reopen()?)?;
    let addresses = read_addresses(BufReader::new(address_file.reopen()?))?;
    let mut simulator = Simulator::new(&MmuConfig::default(), store)?;
    let result = simulator.simulate(addresses)?;

    let translated: Vec<_> = result.results.iter()
        .map(|r| (r.virtual_address, r.physical_address, r.value, r.kind))
        .collect();
    assert_eq!(translated, vec![
        (16916, 20, 20, AccessKind::PageFault),
        (62493, 285, 29, AccessKind::PageFault),
        (16917, 21, 21, AccessKind::TlbHit),
    ]);
    Ok(())
}
