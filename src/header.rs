//! IDX header parsing and encoding
//!
//! Layout (all integers big-endian):
//!
//! ```text
//! offset  width   field
//! 0       2       reserved, must be 0x0000
//! 2       1       element type tag
//! 3       1       dimension count n (n >= 1)
//! 4       4 * n   dimensions as int32, dimensions[0] = record count
//! 4 + 4n  ...     records
//! ```

use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use serde::Serialize;

use crate::element::ElementType;
use crate::error::IdxError;

/// Value required in the two reserved leading bytes
pub const RESERVED_PREFIX: u16 = 0x0000;

/// Largest number of dimensions the one-byte count field can declare
pub const MAX_DIMENSIONS: usize = u8::MAX as usize;

/// Parsed IDX header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    element_type: ElementType,
    dimensions: Vec<u32>,
    record_element_count: usize,
}

impl Header {
    /// Build a header for writing.
    ///
    /// Fails with [`IdxError::Size`] if `dimensions` is empty, longer than
    /// [`MAX_DIMENSIONS`], holds a value that does not fit the signed 32-bit wire
    /// field, or describes records too large to address.
    pub fn new(element_type: ElementType, dimensions: Vec<u32>) -> Result<Self, IdxError> {
        if dimensions.is_empty() {
            return Err(IdxError::Size(
                "at least one dimension is required".to_string(),
            ));
        }
        if dimensions.len() > MAX_DIMENSIONS {
            return Err(IdxError::Size(format!(
                "{} dimensions exceed the maximum of {}",
                dimensions.len(),
                MAX_DIMENSIONS
            )));
        }
        if let Some((axis, value)) = dimensions
            .iter()
            .enumerate()
            .find(|(_, d)| **d > i32::MAX as u32)
        {
            return Err(IdxError::Size(format!(
                "dimension {} = {} does not fit in a signed 32-bit field",
                axis, value
            )));
        }
        Self::from_parts(element_type, dimensions).map_err(|dimensions| {
            IdxError::Size(format!(
                "dimensions {:?} overflow the addressable payload size",
                dimensions
            ))
        })
    }

    /// Derive record sizes, handing the dimensions back if any size overflows
    fn from_parts(element_type: ElementType, dimensions: Vec<u32>) -> Result<Self, Vec<u32>> {
        let record_element_count = match dimensions[1..]
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d as usize))
        {
            Some(count) => count,
            None => return Err(dimensions),
        };

        let payload_fits = record_element_count
            .checked_mul(element_type.byte_width())
            .and_then(|len| (len as u64).checked_mul(dimensions[0] as u64))
            .is_some();
        if !payload_fits {
            return Err(dimensions);
        }

        Ok(Self {
            element_type,
            dimensions,
            record_element_count,
        })
    }

    /// Parse a header from the start of a stream.
    ///
    /// Reading stops at the first invalid field, so a bad reserved prefix
    /// consumes exactly two bytes.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, IdxError> {
        let reserved = reader
            .read_u16::<BigEndian>()
            .map_err(|e| IdxError::header_io(e, "reserved prefix"))?;
        if reserved != RESERVED_PREFIX {
            return Err(IdxError::InvalidMagic {
                expected: RESERVED_PREFIX as u32,
                found: reserved as u32,
            });
        }

        let tag = reader
            .read_u8()
            .map_err(|e| IdxError::header_io(e, "element type"))?;
        let element_type = ElementType::from_tag(tag)?;

        let num_dimensions = reader
            .read_u8()
            .map_err(|e| IdxError::header_io(e, "dimension count"))?;
        if num_dimensions == 0 {
            return Err(IdxError::NoDimensions);
        }

        let mut dimensions = Vec::with_capacity(num_dimensions as usize);
        for axis in 0..num_dimensions as usize {
            let value = reader
                .read_i32::<BigEndian>()
                .map_err(|e| IdxError::header_io(e, "dimensions"))?;
            if value < 0 {
                return Err(IdxError::NegativeDimension { axis, value });
            }
            dimensions.push(value as u32);
        }

        Self::from_parts(element_type, dimensions)
            .map_err(|dimensions| IdxError::DimensionsOverflow { dimensions })
    }

    /// Encode this header in wire format
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), IdxError> {
        writer.write_u16::<BigEndian>(RESERVED_PREFIX)?;
        writer.write_u8(self.element_type.tag())?;
        writer.write_u8(self.dimensions.len() as u8)?;
        for &d in &self.dimensions {
            writer.write_i32::<BigEndian>(d as i32)?;
        }
        Ok(())
    }

    /// Declared element type
    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// Full dimension vector, record count first
    pub fn dimensions(&self) -> &[u32] {
        &self.dimensions
    }

    /// Number of records (`dimensions[0]`)
    pub fn record_count(&self) -> u32 {
        self.dimensions[0]
    }

    /// Shape of a single record (`dimensions[1..]`, empty for scalar records)
    pub fn record_shape(&self) -> &[u32] {
        &self.dimensions[1..]
    }

    /// Elements per record: product of the record shape, 1 for scalar records
    pub fn record_element_count(&self) -> usize {
        self.record_element_count
    }

    /// Bytes per record
    pub fn record_byte_len(&self) -> usize {
        // Checked against overflow at construction
        self.record_element_count * self.element_type.byte_width()
    }

    /// Total payload bytes following the header
    pub fn payload_byte_len(&self) -> u64 {
        self.record_byte_len() as u64 * self.record_count() as u64
    }

    /// Length of the encoded header in bytes
    pub fn encoded_len(&self) -> usize {
        4 + 4 * self.dimensions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Cursor;

    const SCENARIO_A_HEADER: [u8; 16] = [
        0x00, 0x00, 0x08, 0x03, //
        0x00, 0x00, 0x00, 0x01, //
        0x00, 0x00, 0x00, 0x02, //
        0x00, 0x00, 0x00, 0x02,
    ];

    #[test]
    fn test_parse_scenario_a_header() {
        let header = Header::read_from(&mut Cursor::new(&SCENARIO_A_HEADER[..])).unwrap();
        assert_eq!(header.element_type(), ElementType::U8);
        assert_eq!(header.dimensions(), &[1, 2, 2]);
        assert_eq!(header.record_count(), 1);
        assert_eq!(header.record_shape(), &[2, 2]);
        assert_eq!(header.record_element_count(), 4);
        assert_eq!(header.record_byte_len(), 4);
        assert_eq!(header.payload_byte_len(), 4);
        assert_eq!(header.encoded_len(), 16);
    }

    #[test]
    fn test_single_dimension_is_scalar() {
        let bytes = [0x00, 0x00, 0x0C, 0x01, 0x00, 0x00, 0x00, 0x05];
        let header = Header::read_from(&mut Cursor::new(&bytes[..])).unwrap();
        assert_eq!(header.record_count(), 5);
        assert!(header.record_shape().is_empty());
        assert_eq!(header.record_element_count(), 1);
        assert_eq!(header.record_byte_len(), 4);
    }

    #[test]
    fn test_bad_prefix_consumes_two_bytes() {
        let mut cursor = Cursor::new(vec![0x00, 0x01, 0x08, 0x01, 0, 0, 0, 1]);
        let err = Header::read_from(&mut cursor).unwrap_err();
        assert!(matches!(
            err,
            IdxError::InvalidMagic {
                expected: 0,
                found: 1
            }
        ));
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_unknown_tag() {
        let bytes = [0x00, 0x00, 0x0A, 0x01, 0, 0, 0, 1];
        let err = Header::read_from(&mut Cursor::new(&bytes[..])).unwrap_err();
        assert!(matches!(err, IdxError::UnknownElementType(0x0A)));
    }

    #[test]
    fn test_zero_dimensions() {
        let bytes = [0x00, 0x00, 0x08, 0x00];
        let err = Header::read_from(&mut Cursor::new(&bytes[..])).unwrap_err();
        assert!(matches!(err, IdxError::NoDimensions));
    }

    #[test]
    fn test_negative_dimension() {
        let bytes = [0x00, 0x00, 0x08, 0x02, 0, 0, 0, 1, 0xFF, 0xFF, 0xFF, 0xFF];
        let err = Header::read_from(&mut Cursor::new(&bytes[..])).unwrap_err();
        assert!(matches!(
            err,
            IdxError::NegativeDimension { axis: 1, value: -1 }
        ));
    }

    #[test]
    fn test_truncated_header() {
        for len in 0..SCENARIO_A_HEADER.len() {
            let err = Header::read_from(&mut Cursor::new(&SCENARIO_A_HEADER[..len])).unwrap_err();
            assert!(
                matches!(err, IdxError::TruncatedHeader { .. }),
                "length {} gave {:?}",
                len,
                err
            );
        }
    }

    #[test]
    fn test_write_matches_wire_layout() {
        let header = Header::new(ElementType::U8, vec![1, 2, 2]).unwrap();
        let mut out = Vec::new();
        header.write_to(&mut out).unwrap();
        assert_eq!(out, SCENARIO_A_HEADER.to_vec());
        assert_eq!(out.len(), header.encoded_len());
    }

    #[test]
    fn test_new_rejects_invalid_dimensions() {
        assert!(matches!(
            Header::new(ElementType::U8, vec![]),
            Err(IdxError::Size(_))
        ));
        assert!(matches!(
            Header::new(ElementType::U8, vec![1; 256]),
            Err(IdxError::Size(_))
        ));
        assert!(matches!(
            Header::new(ElementType::U8, vec![1, u32::MAX]),
            Err(IdxError::Size(_))
        ));
    }

    #[test]
    fn test_overflowing_dimensions() {
        // u8 [1, i32::MAX, i32::MAX, i32::MAX]
        let mut bytes = vec![0x00, 0x00, 0x08, 0x04, 0, 0, 0, 1];
        for _ in 0..3 {
            bytes.extend_from_slice(&[0x7F, 0xFF, 0xFF, 0xFF]);
        }

        let err = Header::read_from(&mut Cursor::new(bytes)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(matches!(err, IdxError::DimensionsOverflow { ref dimensions } if dimensions.len() == 4));

        let max = i32::MAX as u32;
        assert!(matches!(
            Header::new(ElementType::U8, vec![1, max, max, max]),
            Err(IdxError::Size(_))
        ));
    }

    #[test]
    fn test_zero_sized_records() {
        let header = Header::new(ElementType::F32, vec![3, 0, 7]).unwrap();
        assert_eq!(header.record_element_count(), 0);
        assert_eq!(header.record_byte_len(), 0);
        assert_eq!(header.payload_byte_len(), 0);
    }
}
