use std::io::Read;
use std::marker::PhantomData;

use crate::element::Element;
use crate::error::IdxError;

use super::IdxReader;

/// Iterator over the remaining decoded records of a reader.
///
/// Stops after the last declared record or after the first error.
pub struct Records<'a, R: Read, T: Element> {
    reader: &'a mut IdxReader<R>,
    failed: bool,
    _marker: PhantomData<T>,
}

/// Iterator over the remaining records as undecoded bytes
pub struct RawRecords<'a, R: Read> {
    reader: &'a mut IdxReader<R>,
    failed: bool,
}

impl<R: Read> IdxReader<R> {
    /// Iterate over the remaining records, decoded as `T`
    ///
    /// ```rust,no_run
    /// use idxfile::reader::IdxReader;
    ///
    /// let mut reader = IdxReader::open_file("t10k-labels-idx1-ubyte")?;
    /// let labels: Vec<u8> = reader
    ///     .records::<u8>()
    ///     .map(|record| record.map(|r| r[0]))
    ///     .collect::<Result<_, _>>()?;
    /// # Ok::<(), idxfile::IdxError>(())
    /// ```
    pub fn records<T: Element>(&mut self) -> Records<'_, R, T> {
        Records {
            reader: self,
            failed: false,
            _marker: PhantomData,
        }
    }

    /// Iterate over the remaining records as raw bytes
    pub fn raw_records(&mut self) -> RawRecords<'_, R> {
        RawRecords {
            reader: self,
            failed: false,
        }
    }
}

impl<R: Read, T: Element> Iterator for Records<'_, R, T> {
    type Item = Result<Vec<T>, IdxError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.reader.is_exhausted() {
            return None;
        }
        let result = self.reader.read::<T>();
        self.failed = result.is_err();
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            (0, Some(self.reader.remaining() as usize))
        }
    }
}

impl<R: Read> Iterator for RawRecords<'_, R> {
    type Item = Result<Vec<u8>, IdxError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.reader.is_exhausted() {
            return None;
        }
        let result = self.reader.read_raw();
        self.failed = result.is_err();
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            (0, Some(self.reader.remaining() as usize))
        }
    }
}
