use thiserror::Error;

/// Errors produced while configuring or running a translation simulation
///
/// Page faults are not errors, they are the expected slow path and are counted in the
/// statistics. Everything here aborts the run it occurs in, except `EmptyInput` which callers
/// may choose to tolerate
#[derive(Debug, Error)]
pub enum MmuError {
    /// A raw value can't be decoded, or an address list line isn't a valid address
    #[error("Invalid address {input}: {reason}")]
    InvalidAddress { input: String, reason: String },

    /// The backing store couldn't supply a full page
    #[error("Couldn't read page {page} (byte offset {offset}) from the backing store: {source}")]
    StoreReadError {
        page: u32,
        offset: u64,
        #[source]
        source: std::io::Error,
    },

    /// Unrecognised eviction policy token
    #[error("Unknown eviction policy '{0}', expected one of fifo, lru, none")]
    UnknownPolicy(String),

    /// Rates were requested for a run with no accesses
    #[error("No addresses were translated, rates are undefined")]
    EmptyInput,

    /// The table geometry can't be simulated
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Opening, mapping, or reading an input file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A reference report line couldn't be parsed
    #[error("Malformed reference report at line {line}: '{content}'")]
    MalformedReport { line: usize, content: String },

    /// A reference report disagrees with the simulated run
    #[error("Reference report mismatch at line {line}: expected '{expected}', got '{actual}'")]
    ReportMismatch {
        line: usize,
        expected: String,
        actual: String,
    },
}

impl MmuError {
    pub(crate) fn invalid_address(input: impl ToString, reason: impl Into<String>) -> Self {
        MmuError::InvalidAddress {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
