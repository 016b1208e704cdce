//! Data type system for ndstride tensors
//!
//! The engine works over a closed set of primitive element types. `DType` is
//! the runtime tag for that set; [`Element`] is the compile-time side that maps
//! each Rust primitive to its tag and carries the per-type scalar semantics.

mod element;

pub use element::Element;

use std::fmt;

/// Data types supported by ndstride tensors
///
/// # Discriminant Values
///
/// Discriminants are stable so external persistence layers can store them:
/// floats 0-9 (F64=0, F32=1), signed ints 10-19 (I32=11, I8=13).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DType {
    /// 64-bit floating point ("double")
    F64 = 0,
    /// 32-bit floating point ("float")
    F32 = 1,
    /// 32-bit signed integer ("int")
    I32 = 11,
    /// 8-bit signed integer ("byte")
    I8 = 13,
}

impl DType {
    /// Size of one element in bytes
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            Self::F64 => 8,
            Self::F32 | Self::I32 => 4,
            Self::I8 => 1,
        }
    }

    /// Whether this is a floating point type
    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F64 | Self::F32)
    }

    /// Whether this is an integral type
    #[inline]
    pub const fn is_int(self) -> bool {
        !self.is_float()
    }

    /// Short lowercase name (`f64`, `i8`, ...)
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::F64 => "f64",
            Self::F32 => "f32",
            Self::I32 => "i32",
            Self::I8 => "i8",
        }
    }

    /// Decode a stable discriminant
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::F64),
            1 => Some(Self::F32),
            11 => Some(Self::I32),
            13 => Some(Self::I8),
            _ => None,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}
