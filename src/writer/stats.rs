use std::fmt;

/// Statistics from a write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterStats {
    /// Number of records written
    pub records_written: u32,
    /// Total bytes written, header included
    pub bytes_written: u64,
}

impl fmt::Display for WriterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} records ({} bytes)",
            self.records_written, self.bytes_written
        )
    }
}
