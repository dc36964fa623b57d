/// Default read buffer size in bytes
pub const DEFAULT_BUFFER_CAPACITY: usize = 64 * 1024;

/// Default limit on the byte length of a single record (1 GiB)
pub const DEFAULT_MAX_RECORD_BYTES: usize = 1 << 30;

/// Configuration for reading IDX files
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Minimum read buffer size; the buffer always holds at least one record
    pub buffer_capacity: usize,

    /// Reject headers whose records exceed this many bytes (None = no limit).
    /// Guards against huge allocations driven by a corrupt header.
    pub max_record_bytes: Option<usize>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            max_record_bytes: Some(DEFAULT_MAX_RECORD_BYTES),
        }
    }
}

impl ReaderConfig {
    /// Configuration without a record size limit
    pub fn unbounded() -> Self {
        Self {
            max_record_bytes: None,
            ..Default::default()
        }
    }

    /// Set the minimum buffer capacity
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Set the record size limit
    pub fn with_max_record_bytes(mut self, limit: Option<usize>) -> Self {
        self.max_record_bytes = limit;
        self
    }
}
