//! Element types of the IDX format
//!
//! The IDX header carries a one-byte type tag that selects how every element
//! of the payload is encoded. The set of tags is closed:
//!
//! | Tag    | Type      | Width |
//! |--------|-----------|-------|
//! | `0x08` | `u8`      | 1     |
//! | `0x09` | `i8`      | 1     |
//! | `0x0B` | `i16`     | 2     |
//! | `0x0C` | `i32`     | 4     |
//! | `0x0D` | `f32`     | 4     |
//! | `0x0E` | `f64`     | 8     |
//!
//! All multi-byte elements are big-endian.

use std::fmt;
use std::str::FromStr;

use byteorder::{BigEndian, ByteOrder};
use serde::Serialize;

use crate::error::IdxError;

/// Element type declared in an IDX header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// Unsigned byte (tag `0x08`)
    U8,
    /// Signed byte (tag `0x09`)
    I8,
    /// Big-endian signed 16-bit integer (tag `0x0B`)
    I16,
    /// Big-endian signed 32-bit integer (tag `0x0C`)
    I32,
    /// Big-endian IEEE-754 single precision (tag `0x0D`)
    F32,
    /// Big-endian IEEE-754 double precision (tag `0x0E`)
    F64,
}

impl ElementType {
    /// Every element type, in tag order
    pub const ALL: [ElementType; 6] = [
        ElementType::U8,
        ElementType::I8,
        ElementType::I16,
        ElementType::I32,
        ElementType::F32,
        ElementType::F64,
    ];

    /// Look up the element type for a header tag
    pub fn from_tag(tag: u8) -> Result<Self, IdxError> {
        match tag {
            0x08 => Ok(ElementType::U8),
            0x09 => Ok(ElementType::I8),
            0x0B => Ok(ElementType::I16),
            0x0C => Ok(ElementType::I32),
            0x0D => Ok(ElementType::F32),
            0x0E => Ok(ElementType::F64),
            other => Err(IdxError::UnknownElementType(other)),
        }
    }

    /// Header tag for this element type
    pub fn tag(&self) -> u8 {
        match self {
            ElementType::U8 => 0x08,
            ElementType::I8 => 0x09,
            ElementType::I16 => 0x0B,
            ElementType::I32 => 0x0C,
            ElementType::F32 => 0x0D,
            ElementType::F64 => 0x0E,
        }
    }

    /// Get the byte size per value
    pub fn byte_width(&self) -> usize {
        match self {
            ElementType::U8 | ElementType::I8 => 1,
            ElementType::I16 => 2,
            ElementType::I32 | ElementType::F32 => 4,
            ElementType::F64 => 8,
        }
    }

    /// Short lowercase name (`u8`, `i16`, ...)
    pub fn name(&self) -> &'static str {
        match self {
            ElementType::U8 => "u8",
            ElementType::I8 => "i8",
            ElementType::I16 => "i16",
            ElementType::I32 => "i32",
            ElementType::F32 => "f32",
            ElementType::F64 => "f64",
        }
    }

    /// Whether elements are floating point
    pub fn is_float(&self) -> bool {
        matches!(self, ElementType::F32 | ElementType::F64)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ElementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "u8" | "uint8" | "ubyte" => Ok(ElementType::U8),
            "i8" | "int8" | "byte" => Ok(ElementType::I8),
            "i16" | "int16" | "short" => Ok(ElementType::I16),
            "i32" | "int32" | "int" => Ok(ElementType::I32),
            "f32" | "float32" | "float" => Ok(ElementType::F32),
            "f64" | "float64" | "double" => Ok(ElementType::F64),
            other => Err(format!("unknown element type: {}", other)),
        }
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for u8 {}
    impl Sealed for i8 {}
    impl Sealed for i16 {}
    impl Sealed for i32 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// A Rust type that can be stored as an IDX element
///
/// Implemented for exactly the six types of the IDX type table. The trait is
/// sealed; the table cannot be extended from outside the crate.
pub trait Element: sealed::Sealed + Copy + Default + Send + fmt::Debug + 'static {
    /// Element type tag this Rust type corresponds to
    const ELEMENT_TYPE: ElementType;

    /// Decode big-endian bytes into values.
    ///
    /// `bytes.len()` must be a multiple of the element width.
    fn decode_be(bytes: &[u8]) -> Vec<Self>;

    /// Append the big-endian encoding of `values` to `out`
    fn encode_be(values: &[Self], out: &mut Vec<u8>);

    /// Widen to `f64`
    fn to_f64(self) -> f64;
}

impl Element for u8 {
    const ELEMENT_TYPE: ElementType = ElementType::U8;

    fn decode_be(bytes: &[u8]) -> Vec<Self> {
        bytes.to_vec()
    }

    fn encode_be(values: &[Self], out: &mut Vec<u8>) {
        out.extend_from_slice(values);
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Element for i8 {
    const ELEMENT_TYPE: ElementType = ElementType::I8;

    fn decode_be(bytes: &[u8]) -> Vec<Self> {
        bytes.iter().map(|&b| b as i8).collect()
    }

    fn encode_be(values: &[Self], out: &mut Vec<u8>) {
        out.extend(values.iter().map(|&v| v as u8));
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

macro_rules! multi_byte_element {
    ($ty:ty, $variant:ident, $read_into:ident, $write_into:ident) => {
        impl Element for $ty {
            const ELEMENT_TYPE: ElementType = ElementType::$variant;

            fn decode_be(bytes: &[u8]) -> Vec<Self> {
                debug_assert_eq!(bytes.len() % std::mem::size_of::<$ty>(), 0);
                let mut values = vec![<$ty>::default(); bytes.len() / std::mem::size_of::<$ty>()];
                BigEndian::$read_into(bytes, &mut values);
                values
            }

            fn encode_be(values: &[Self], out: &mut Vec<u8>) {
                let start = out.len();
                out.resize(start + values.len() * std::mem::size_of::<$ty>(), 0);
                BigEndian::$write_into(values, &mut out[start..]);
            }

            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    };
}

multi_byte_element!(i16, I16, read_i16_into, write_i16_into);
multi_byte_element!(i32, I32, read_i32_into, write_i32_into);
multi_byte_element!(f32, F32, read_f32_into, write_f32_into);
multi_byte_element!(f64, F64, read_f64_into, write_f64_into);
