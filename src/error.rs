//! Error types for reading and writing IDX data
//!
//! Every fallible operation returns [`IdxError`]. [`IdxError::kind`] groups the
//! variants into the broad categories callers usually branch on.

use crate::element::ElementType;

/// Broad category of an [`IdxError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or truncated header or payload
    Format,
    /// Read or write requested past the declared record count
    Index,
    /// Requested element type does not match the declared one
    Type,
    /// Dimensions or record lengths that cannot form valid records
    Size,
    /// Underlying I/O failure other than truncation
    Io,
    /// Failure of the background producer thread
    Pipeline,
}

/// Errors that can occur while reading or writing IDX data
#[derive(Debug, thiserror::Error)]
pub enum IdxError {
    /// I/O error from the underlying byte source or sink
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The reserved prefix (or legacy magic number) has the wrong value
    #[error("Invalid magic number: expected {expected:#06x}, found {found:#06x}")]
    InvalidMagic {
        /// Value required by the format
        expected: u32,
        /// Value found in the stream
        found: u32,
    },

    /// The element type tag is not part of the type table
    #[error("Unknown element type tag: {0:#04x}")]
    UnknownElementType(u8),

    /// The header declares zero dimensions
    #[error("Header declares zero dimensions")]
    NoDimensions,

    /// A dimension field holds a negative value
    #[error("Dimension {axis} is negative: {value}")]
    NegativeDimension {
        /// Position of the dimension in the header
        axis: usize,
        /// Raw signed value read from the stream
        value: i32,
    },

    /// A parsed header describes records or a payload too large to address
    #[error("Header dimensions {dimensions:?} overflow the addressable payload size")]
    DimensionsOverflow {
        /// Dimensions as read from the stream
        dimensions: Vec<u32>,
    },

    /// The stream ended inside the header
    #[error("Truncated header: stream ended while reading {field}")]
    TruncatedHeader {
        /// Header field that could not be read completely
        field: &'static str,
    },

    /// The stream ended inside a record
    #[error("Truncated record {index}: expected {expected} bytes, got {actual}")]
    TruncatedRecord {
        /// Zero-based index of the record being read
        index: u32,
        /// Byte length of a full record
        expected: usize,
        /// Bytes actually available
        actual: usize,
    },

    /// All declared records have already been read or written
    #[error("Index out of range: all {count} records consumed")]
    Exhausted {
        /// Declared record count
        count: u32,
    },

    /// Typed access with an element type other than the declared one
    #[error("Type mismatch: file declares {declared}, requested {requested}")]
    TypeMismatch {
        /// Element type declared in the header
        declared: ElementType,
        /// Element type requested by the caller
        requested: ElementType,
    },

    /// Dimensions that cannot describe a valid tensor
    #[error("Invalid dimensions: {0}")]
    Size(String),

    /// A record handed to a writer has the wrong length
    #[error("Record length mismatch: expected {expected}, got {actual}")]
    RecordLength {
        /// Required length (elements or bytes, depending on the call)
        expected: usize,
        /// Supplied length
        actual: usize,
    },

    /// A single record exceeds the configured allocation limit
    #[error("Record of {bytes} bytes exceeds the limit of {limit} bytes")]
    RecordTooLarge {
        /// Byte length of one record
        bytes: usize,
        /// Configured maximum
        limit: usize,
    },

    /// A writer was finished before every declared record was written
    #[error("Incomplete write: {written} of {declared} records written")]
    IncompleteWrite {
        /// Records written so far
        written: u32,
        /// Declared record count
        declared: u32,
    },

    /// The background producer thread panicked
    #[error("Record producer thread panicked")]
    ProducerPanicked,
}

impl IdxError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            IdxError::Io(_) => ErrorKind::Io,
            IdxError::InvalidMagic { .. }
            | IdxError::UnknownElementType(_)
            | IdxError::NoDimensions
            | IdxError::NegativeDimension { .. }
            | IdxError::DimensionsOverflow { .. }
            | IdxError::TruncatedHeader { .. }
            | IdxError::TruncatedRecord { .. } => ErrorKind::Format,
            IdxError::Exhausted { .. } => ErrorKind::Index,
            IdxError::TypeMismatch { .. } => ErrorKind::Type,
            IdxError::Size(_)
            | IdxError::RecordLength { .. }
            | IdxError::RecordTooLarge { .. }
            | IdxError::IncompleteWrite { .. } => ErrorKind::Size,
            IdxError::ProducerPanicked => ErrorKind::Pipeline,
        }
    }

    /// Map an I/O error raised while reading `field` of a header.
    ///
    /// End-of-stream becomes [`IdxError::TruncatedHeader`]; anything else stays an I/O error.
    pub(crate) fn header_io(err: std::io::Error, field: &'static str) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            IdxError::TruncatedHeader { field }
        } else {
            IdxError::Io(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_grouping() {
        assert_eq!(IdxError::NoDimensions.kind(), ErrorKind::Format);
        assert_eq!(IdxError::Exhausted { count: 1 }.kind(), ErrorKind::Index);
        assert_eq!(
            IdxError::TypeMismatch {
                declared: ElementType::U8,
                requested: ElementType::I16,
            }
            .kind(),
            ErrorKind::Type
        );
        assert_eq!(IdxError::Size("empty".into()).kind(), ErrorKind::Size);
        assert_eq!(
            IdxError::DimensionsOverflow {
                dimensions: vec![1, u32::MAX]
            }
            .kind(),
            ErrorKind::Format
        );
    }

    #[test]
    fn test_header_io_maps_eof() {
        let eof = std::io::Error::from(std::io::ErrorKind::UnexpectedEof);
        assert!(matches!(
            IdxError::header_io(eof, "dimensions"),
            IdxError::TruncatedHeader { field: "dimensions" }
        ));

        let other = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        assert_eq!(IdxError::header_io(other, "magic").kind(), ErrorKind::Io);
    }

    #[test]
    fn test_display_messages() {
        let err = IdxError::TruncatedRecord {
            index: 0,
            expected: 4,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "Truncated record 0: expected 4 bytes, got 3"
        );
        assert_eq!(
            IdxError::UnknownElementType(0x0a).to_string(),
            "Unknown element type tag: 0x0a"
        );
    }
}
