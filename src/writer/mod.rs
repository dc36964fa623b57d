//! # IDX Writer Module
//!
//! Encodes records in exactly the framing the reader expects: the header is
//! written up front, then each record is appended as big-endian elements with
//! no padding.
//!
//! The writer enforces the same invariants the reader relies on:
//!
//! 1. At least one dimension, each representable as a signed 32-bit value.
//! 2. Every record has exactly `record_element_count` elements of the declared type.
//! 3. Exactly `dimensions[0]` records are written before [`IdxWriter::finish`].

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{debug, warn};

use crate::element::{Element, ElementType};
use crate::error::IdxError;
use crate::header::Header;

mod stats;

#[cfg(test)]
mod tests;

pub use stats::WriterStats;

/// Sequential writer producing an IDX stream
pub struct IdxWriter<W: Write> {
    header: Header,
    writer: BufWriter<W>,
    progress: Progress,
    bytes_written: u64,
}

/// Record bookkeeping; warns when dropped before the writer is finished
struct Progress {
    written: u32,
    declared: u32,
    finished: bool,
}

impl Drop for Progress {
    fn drop(&mut self) {
        if !self.finished {
            warn!(
                "IdxWriter dropped without calling finish() after {} of {} records. \
                 Output may be incomplete.",
                self.written, self.declared
            );
        }
    }
}

impl<W: Write> IdxWriter<W> {
    /// Create a writer and emit the header for `element_type` and `dimensions`
    pub fn new(sink: W, element_type: ElementType, dimensions: Vec<u32>) -> Result<Self, IdxError> {
        let header = Header::new(element_type, dimensions)?;
        Self::with_header(sink, header)
    }

    /// Create a writer from an already validated header
    pub fn with_header(sink: W, header: Header) -> Result<Self, IdxError> {
        let capacity = header.record_byte_len().max(8 * 1024);
        let mut writer = BufWriter::with_capacity(capacity, sink);
        header.write_to(&mut writer)?;

        debug!(
            "Writing IDX stream: {} x {:?}",
            header.element_type(),
            header.dimensions()
        );

        Ok(Self {
            bytes_written: header.encoded_len() as u64,
            progress: Progress {
                written: 0,
                declared: header.record_count(),
                finished: false,
            },
            header,
            writer,
        })
    }

    /// Header being written
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Append one record of pre-encoded big-endian bytes.
    ///
    /// The slice must be exactly one record long. No element type check is
    /// performed.
    pub fn write_raw(&mut self, bytes: &[u8]) -> Result<(), IdxError> {
        self.check_remaining()?;
        let expected = self.header.record_byte_len();
        if bytes.len() != expected {
            return Err(IdxError::RecordLength {
                expected,
                actual: bytes.len(),
            });
        }
        self.append(bytes)
    }

    /// Encode and append one record.
    ///
    /// `T` must match the declared element type and `values` must hold exactly
    /// `record_element_count` elements.
    pub fn write<T: Element>(&mut self, values: &[T]) -> Result<(), IdxError> {
        self.check_remaining()?;
        let declared = self.header.element_type();
        if T::ELEMENT_TYPE != declared {
            return Err(IdxError::TypeMismatch {
                declared,
                requested: T::ELEMENT_TYPE,
            });
        }
        let expected = self.header.record_element_count();
        if values.len() != expected {
            return Err(IdxError::RecordLength {
                expected,
                actual: values.len(),
            });
        }

        let mut bytes = Vec::with_capacity(self.header.record_byte_len());
        T::encode_be(values, &mut bytes);
        self.append(&bytes)
    }

    /// Write every record yielded by `records`
    pub fn write_records<T, I>(&mut self, records: I) -> Result<(), IdxError>
    where
        T: Element,
        I: IntoIterator,
        I::Item: AsRef<[T]>,
    {
        for record in records {
            self.write(record.as_ref())?;
        }
        Ok(())
    }

    /// Get current statistics
    pub fn stats(&self) -> WriterStats {
        WriterStats {
            records_written: self.progress.written,
            bytes_written: self.bytes_written,
        }
    }

    /// Flush and finalize the stream.
    ///
    /// Fails with [`IdxError::IncompleteWrite`] if fewer records than declared
    /// were written; the bytes written so far are still flushed.
    pub fn finish(self) -> Result<WriterStats, IdxError> {
        self.finish_into_inner().map(|(_, stats)| stats)
    }

    /// Finalize the stream and return the underlying sink
    ///
    /// This is useful when the writer is backed by an in-memory buffer and you need
    /// to access the written data.
    pub fn finish_into_inner(self) -> Result<(W, WriterStats), IdxError> {
        let stats = self.stats();
        let Self {
            writer,
            mut progress,
            ..
        } = self;
        progress.finished = true;

        let inner = writer.into_inner().map_err(|e| IdxError::Io(e.into_error()))?;

        let declared = progress.declared;
        if stats.records_written < declared {
            return Err(IdxError::IncompleteWrite {
                written: stats.records_written,
                declared,
            });
        }

        debug!("Finished IDX stream: {}", stats);
        Ok((inner, stats))
    }

    fn check_remaining(&self) -> Result<(), IdxError> {
        if self.progress.written >= self.progress.declared {
            return Err(IdxError::Exhausted {
                count: self.header.record_count(),
            });
        }
        Ok(())
    }

    fn append(&mut self, bytes: &[u8]) -> Result<(), IdxError> {
        self.writer.write_all(bytes)?;
        self.progress.written += 1;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }
}

impl IdxWriter<File> {
    /// Create a new IDX file on disk
    pub fn create<P: AsRef<Path>>(
        path: P,
        element_type: ElementType,
        dimensions: Vec<u32>,
    ) -> Result<Self, IdxError> {
        let file = File::create(path.as_ref())?;
        Self::new(file, element_type, dimensions)
    }
}
