//! Legacy fixed-header image format
//!
//! An older sibling of IDX that stores only 2-D unsigned-byte images:
//!
//! ```text
//! offset  width  field
//! 0       4      magic, int32 = 2051
//! 4       4      image count
//! 8       4      rows
//! 12      4      cols
//! 16      ...    count * rows * cols pixels, one byte each
//! ```
//!
//! The magic 2051 (`00 00 08 03`) reads as the IDX prefix of a three-dimensional
//! `u8` file, but the legacy reader accepts nothing else: no other element
//! types, no other ranks. [`convert_legacy_to_idx`] rewrites a legacy file
//! through the generic writer.

use std::io::{BufReader, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use log::debug;

use crate::element::ElementType;
use crate::error::IdxError;
use crate::header::Header;
use crate::reader::{read_record, ReaderConfig};
use crate::writer::{IdxWriter, WriterStats};

/// Magic number opening a legacy image file
pub const LEGACY_IMAGE_MAGIC: i32 = 2051;

/// Length of the legacy header in bytes
pub const LEGACY_HEADER_LEN: usize = 16;

/// Reader for the legacy image format
pub struct LegacyImageReader<R: Read> {
    reader: BufReader<R>,
    count: u32,
    rows: u32,
    cols: u32,
    image_len: usize,
    position: u32,
}

impl<R: Read> LegacyImageReader<R> {
    /// Parse the 16-byte header and position the reader at image 0
    pub fn open(source: R) -> Result<Self, IdxError> {
        Self::open_with_config(source, &ReaderConfig::default())
    }

    /// Open with custom buffering and image size limit
    pub fn open_with_config(mut source: R, config: &ReaderConfig) -> Result<Self, IdxError> {
        let magic = source
            .read_i32::<BigEndian>()
            .map_err(|e| IdxError::header_io(e, "magic"))?;
        if magic != LEGACY_IMAGE_MAGIC {
            return Err(IdxError::InvalidMagic {
                expected: LEGACY_IMAGE_MAGIC as u32,
                found: magic as u32,
            });
        }

        let mut fields = [0u32; 3];
        for (i, (field, name)) in fields
            .iter_mut()
            .zip(["image count", "rows", "cols"])
            .enumerate()
        {
            let value = source
                .read_i32::<BigEndian>()
                .map_err(|e| IdxError::header_io(e, name))?;
            if value < 0 {
                return Err(IdxError::NegativeDimension { axis: i, value });
            }
            *field = value as u32;
        }
        let [count, rows, cols] = fields;

        let image_len = (rows as usize)
            .checked_mul(cols as usize)
            .ok_or_else(|| IdxError::Size(format!("{} x {} image overflows", rows, cols)))?;
        if let Some(limit) = config.max_record_bytes {
            if image_len > limit {
                return Err(IdxError::RecordTooLarge {
                    bytes: image_len,
                    limit,
                });
            }
        }

        debug!("Opened legacy image stream: {} images of {}x{}", count, rows, cols);

        Ok(Self {
            reader: BufReader::with_capacity(image_len.max(config.buffer_capacity).max(1), source),
            count,
            rows,
            cols,
            image_len,
            position: 0,
        })
    }

    /// Number of images declared in the header
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Image height
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Image width
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Images read so far
    pub fn position(&self) -> u32 {
        self.position
    }

    /// Whether every declared image has been read
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.count
    }

    /// Equivalent generic IDX header: `u8 [count, rows, cols]`
    pub fn to_idx_header(&self) -> Result<Header, IdxError> {
        Header::new(ElementType::U8, vec![self.count, self.rows, self.cols])
    }

    /// Read the next image as `rows * cols` pixels in row-major order
    pub fn read_image(&mut self) -> Result<Vec<u8>, IdxError> {
        if self.is_exhausted() {
            return Err(IdxError::Exhausted { count: self.count });
        }
        let pixels = read_record(&mut self.reader, self.image_len, self.position)?;
        self.position += 1;
        Ok(pixels)
    }

    /// Iterate over the remaining images, stopping after the first error
    pub fn images(&mut self) -> impl Iterator<Item = Result<Vec<u8>, IdxError>> + '_ {
        let mut failed = false;
        std::iter::from_fn(move || {
            if failed || self.is_exhausted() {
                return None;
            }
            let result = self.read_image();
            failed = result.is_err();
            Some(result)
        })
    }
}

/// Writer for the legacy image format
pub struct LegacyImageWriter<W: Write> {
    writer: W,
    count: u32,
    image_len: usize,
    written: u32,
}

impl<W: Write> LegacyImageWriter<W> {
    /// Write the legacy header for `count` images of `rows x cols`
    pub fn new(mut writer: W, count: u32, rows: u32, cols: u32) -> Result<Self, IdxError> {
        for (name, value) in [("image count", count), ("rows", rows), ("cols", cols)] {
            if value > i32::MAX as u32 {
                return Err(IdxError::Size(format!(
                    "{} = {} does not fit in a signed 32-bit field",
                    name, value
                )));
            }
        }
        let image_len = (rows as usize)
            .checked_mul(cols as usize)
            .ok_or_else(|| IdxError::Size(format!("{} x {} image overflows", rows, cols)))?;

        writer.write_i32::<BigEndian>(LEGACY_IMAGE_MAGIC)?;
        writer.write_i32::<BigEndian>(count as i32)?;
        writer.write_i32::<BigEndian>(rows as i32)?;
        writer.write_i32::<BigEndian>(cols as i32)?;

        Ok(Self {
            writer,
            count,
            image_len,
            written: 0,
        })
    }

    /// Append one image of exactly `rows * cols` pixels
    pub fn write_image(&mut self, pixels: &[u8]) -> Result<(), IdxError> {
        if self.written >= self.count {
            return Err(IdxError::Exhausted { count: self.count });
        }
        if pixels.len() != self.image_len {
            return Err(IdxError::RecordLength {
                expected: self.image_len,
                actual: pixels.len(),
            });
        }
        self.writer.write_all(pixels)?;
        self.written += 1;
        Ok(())
    }

    /// Flush and return the sink; every declared image must have been written
    pub fn finish(mut self) -> Result<W, IdxError> {
        self.writer.flush()?;
        if self.written < self.count {
            return Err(IdxError::IncompleteWrite {
                written: self.written,
                declared: self.count,
            });
        }
        Ok(self.writer)
    }
}

/// Stream a legacy image file into a generic IDX `u8` file
pub fn convert_legacy_to_idx<R: Read, W: Write>(
    source: R,
    sink: W,
) -> Result<WriterStats, IdxError> {
    let mut legacy = LegacyImageReader::open(source)?;
    let mut writer = IdxWriter::with_header(sink, legacy.to_idx_header()?)?;

    while !legacy.is_exhausted() {
        let image = legacy.read_image()?;
        writer.write_raw(&image)?;
    }

    writer.finish()
}
