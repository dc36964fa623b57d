use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::debug;

use crate::error::IdxError;
use crate::header::Header;

use super::{IdxReader, ReaderConfig};

impl<R: Read> IdxReader<R> {
    /// Parse the header from `source` and position the reader at record 0
    pub fn open(source: R) -> Result<Self, IdxError> {
        Self::open_with_config(source, ReaderConfig::default())
    }

    /// Open a stream with custom configuration
    pub fn open_with_config(mut source: R, config: ReaderConfig) -> Result<Self, IdxError> {
        let header = Header::read_from(&mut source)?;

        let record_bytes = header.record_byte_len();
        if let Some(limit) = config.max_record_bytes {
            if record_bytes > limit {
                return Err(IdxError::RecordTooLarge {
                    bytes: record_bytes,
                    limit,
                });
            }
        }

        // Size the buffer to hold at least one whole record
        let capacity = record_bytes.max(config.buffer_capacity).max(1);
        debug!(
            "Opened IDX stream: {} x {:?} ({} bytes per record, buffer {} bytes)",
            header.element_type(),
            header.dimensions(),
            record_bytes,
            capacity
        );

        Ok(Self {
            header,
            reader: BufReader::with_capacity(capacity, source),
            position: 0,
        })
    }
}

impl IdxReader<File> {
    /// Open an IDX file on disk.
    ///
    /// The file handle is owned by the reader and closed when it is dropped,
    /// including when header parsing fails.
    pub fn open_file<P: AsRef<Path>>(path: P) -> Result<Self, IdxError> {
        Self::open_file_with_config(path, ReaderConfig::default())
    }

    /// Open an IDX file on disk with custom configuration
    pub fn open_file_with_config<P: AsRef<Path>>(
        path: P,
        config: ReaderConfig,
    ) -> Result<Self, IdxError> {
        let path = path.as_ref();
        debug!("Opening {}", path.display());
        let file = File::open(path)?;
        Self::open_with_config(file, config)
    }
}
