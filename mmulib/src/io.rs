use std::fs::File;
use std::io::BufRead;
use crate::backing_store::BackingStore;
use crate::error::MmuError;

/// Opens the backing store file for page reads
pub fn open_backing_store(file: File) -> Result<impl BackingStore, MmuError> {
    // Compatibility on other systems
    #[cfg(not(unix))]
    {
        use std::io::BufReader;
        use crate::backing_store::SeekBackingStore;
        Ok(SeekBackingStore::new(BufReader::new(file)))
    }
    // Memory map the file on unix systems, page reads become copies out of the page cache
    #[cfg(unix)]
    {
        use crate::backing_store::MappedBackingStore;
        MappedBackingStore::open(&file)
    }
}

/// Parses an address list, one decimal address per line
///
/// Surrounding whitespace and blank lines are ignored. Anything else which isn't an unsigned 32
/// bit integer fails the whole list, naming the offending line
pub fn read_addresses<R: BufRead>(reader: R) -> Result<Vec<u32>, MmuError> {
    let mut addresses = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let raw = trimmed
            .parse::<u32>()
            .map_err(|e| MmuError::invalid_address(format!("'{trimmed}' on line {}", index + 1), e.to_string()))?;
        addresses.push(raw);
    }
    Ok(addresses)
}
