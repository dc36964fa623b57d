//! # IDX Reader Module
//!
//! Streaming, record-at-a-time access to IDX files.
//!
//! The reader parses the header once, then serves the payload one record at a
//! time (a record is one entry along the leading dimension). Nothing beyond a
//! single buffered record is held in memory.
//!
//! ## Example
//!
//! ```rust,no_run
//! use idxfile::reader::IdxReader;
//!
//! let mut reader = IdxReader::open_file("train-images-idx3-ubyte")?;
//! println!("{} records of shape {:?}", reader.header().record_count(), reader.header().record_shape());
//!
//! while !reader.is_exhausted() {
//!     let pixels = reader.read_u8()?;
//!     println!("record with {} pixels", pixels.len());
//! }
//! # Ok::<(), idxfile::IdxError>(())
//! ```
//!
//! ## Type checking
//!
//! Typed reads ([`IdxReader::read`] and the `read_*` helpers) require the
//! requested Rust type to match the element type declared in the header and
//! fail with [`IdxError::TypeMismatch`] otherwise, without consuming any bytes.
//! [`IdxReader::read_raw`] returns undecoded bytes and performs no type check.

use std::io::{BufReader, Read};

use crate::element::Element;
use crate::error::IdxError;
use crate::header::Header;

mod config;
mod open;
mod records;


pub use config::ReaderConfig;
pub use records::{RawRecords, Records};

/// Sequential reader over the records of an IDX stream
///
/// Not safe for concurrent use; every read takes `&mut self`. To hand records
/// to other threads, see [`crate::channel`].
pub struct IdxReader<R: Read> {
    header: Header,
    reader: BufReader<R>,
    position: u32,
}

impl<R: Read> IdxReader<R> {
    /// Parsed header
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Number of records read so far
    pub fn position(&self) -> u32 {
        self.position
    }

    /// Number of records left to read
    pub fn remaining(&self) -> u32 {
        self.header.record_count() - self.position
    }

    /// Whether every declared record has been read
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.header.record_count()
    }

    /// Read the next record as undecoded bytes.
    ///
    /// Returns exactly `record_element_count * element width` bytes. No element
    /// type check is performed.
    pub fn read_raw(&mut self) -> Result<Vec<u8>, IdxError> {
        self.check_remaining()?;
        let bytes = self.fill_record()?;
        self.position += 1;
        Ok(bytes)
    }

    /// Read and decode the next record.
    ///
    /// `T` must match the declared element type.
    pub fn read<T: Element>(&mut self) -> Result<Vec<T>, IdxError> {
        self.check_remaining()?;
        self.check_type::<T>()?;
        let bytes = self.fill_record()?;
        self.position += 1;
        Ok(T::decode_be(&bytes))
    }

    /// Read the next record of a `u8` file
    pub fn read_u8(&mut self) -> Result<Vec<u8>, IdxError> {
        self.read::<u8>()
    }

    /// Read the next record of an `i8` file
    pub fn read_i8(&mut self) -> Result<Vec<i8>, IdxError> {
        self.read::<i8>()
    }

    /// Read the next record of an `i16` file
    pub fn read_i16(&mut self) -> Result<Vec<i16>, IdxError> {
        self.read::<i16>()
    }

    /// Read the next record of an `i32` file
    pub fn read_i32(&mut self) -> Result<Vec<i32>, IdxError> {
        self.read::<i32>()
    }

    /// Read the next record of an `f32` file
    pub fn read_f32(&mut self) -> Result<Vec<f32>, IdxError> {
        self.read::<f32>()
    }

    /// Read the next record of an `f64` file
    pub fn read_f64(&mut self) -> Result<Vec<f64>, IdxError> {
        self.read::<f64>()
    }

    /// Consume the reader, returning the buffered source.
    ///
    /// The buffer may still hold bytes of unread records.
    pub fn into_inner(self) -> BufReader<R> {
        self.reader
    }

    fn check_remaining(&self) -> Result<(), IdxError> {
        if self.is_exhausted() {
            return Err(IdxError::Exhausted {
                count: self.header.record_count(),
            });
        }
        Ok(())
    }

    fn check_type<T: Element>(&self) -> Result<(), IdxError> {
        let declared = self.header.element_type();
        if T::ELEMENT_TYPE != declared {
            return Err(IdxError::TypeMismatch {
                declared,
                requested: T::ELEMENT_TYPE,
            });
        }
        Ok(())
    }

    fn fill_record(&mut self) -> Result<Vec<u8>, IdxError> {
        read_record(
            &mut self.reader,
            self.header.record_byte_len(),
            self.position,
        )
    }
}

/// Pull one full record of `len` bytes; short reads are an error
pub(crate) fn read_record<R: Read>(
    reader: &mut R,
    len: usize,
    index: u32,
) -> Result<Vec<u8>, IdxError> {
    let mut bytes = Vec::with_capacity(len);
    reader.by_ref().take(len as u64).read_to_end(&mut bytes)?;

    if bytes.len() < len {
        return Err(IdxError::TruncatedRecord {
            index,
            expected: len,
            actual: bytes.len(),
        });
    }
    Ok(bytes)
}
