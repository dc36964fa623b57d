//! # idxfile - Streaming Reader and Writer for IDX Tensor Files
//!
//! `idxfile` reads and writes the IDX binary format: a small header describing
//! an element type and a list of dimensions, followed by a dense big-endian
//! payload. The leading dimension counts records; the remaining dimensions
//! give the shape of each record.
//!
//! ## Key Features
//!
//! - **Streaming**: records are served one at a time; nothing beyond a single
//!   record is buffered.
//!
//! - **Strict typing**: typed reads must match the element type declared in
//!   the header. [`reader::IdxReader::read_raw`] returns undecoded bytes.
//!
//! - **Symmetric writer**: [`writer::IdxWriter`] produces byte-identical
//!   framing and refuses short or oversized files.
//!
//! - **Record channel**: [`channel`] moves decoding onto a producer thread
//!   feeding a bounded crossbeam channel.
//!
//! - **Legacy images**: [`legacy`] handles the older fixed-header image layout.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use idxfile::prelude::*;
//!
//! let mut writer = IdxWriter::create("pixels.idx", ElementType::U8, vec![2, 2, 2])?;
//! writer.write(&[0u8, 64, 128, 255])?;
//! writer.write(&[255u8, 128, 64, 0])?;
//! let stats = writer.finish()?;
//! println!("{}", stats);
//!
//! let mut reader = IdxReader::open_file("pixels.idx")?;
//! while !reader.is_exhausted() {
//!     let pixels = reader.read_u8()?;
//!     println!("{:?}", pixels);
//! }
//! # Ok::<(), idxfile::IdxError>(())
//! ```
//!
//! ## Format
//!
//! | Offset | Width | Field |
//! |--------|-------|-------|
//! | 0 | 2 | reserved, `0x0000` |
//! | 2 | 1 | element type tag |
//! | 3 | 1 | dimension count `n` (at least 1) |
//! | 4 | 4n | dimensions, big-endian int32 |
//! | 4 + 4n | ... | records |
//!
//! ## Architecture
//!
//! - [`element`]: element type tags and big-endian decoding
//! - [`header`]: header parsing, validation and encoding
//! - [`reader`]: the sequential record reader
//! - [`writer`]: the symmetric record writer
//! - [`channel`]: producer thread plus bounded channel delivery
//! - [`legacy`]: legacy image reader, writer and converter
//! - [`normalize`]: post-processing helpers for decoded records
//! - [`validator`]: file integrity checks

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod channel;
pub mod element;
pub mod error;
pub mod header;
pub mod legacy;
pub mod normalize;
pub mod reader;
pub mod validator;
pub mod writer;

pub use element::{Element, ElementType};
pub use error::{ErrorKind, IdxError};
pub use header::Header;
pub use reader::IdxReader;
pub use writer::IdxWriter;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::channel::{
        spawn_raw_record_channel, spawn_record_channel, ChannelConfig, ChannelStats, RecordChannel,
    };
    pub use crate::element::{Element, ElementType};
    pub use crate::error::{ErrorKind, IdxError};
    pub use crate::header::Header;
    pub use crate::legacy::{convert_legacy_to_idx, LegacyImageReader, LegacyImageWriter};
    pub use crate::reader::{IdxReader, ReaderConfig};
    pub use crate::validator::{validate_idx_file, ValidationReport};
    pub use crate::writer::{IdxWriter, WriterStats};
}
