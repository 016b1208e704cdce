//! Error types for ndstride

use crate::dtype::DType;
use thiserror::Error;

/// Result type alias using ndstride's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ndstride operations
///
/// Every failure is raised synchronously at the offending call. Operators
/// validate before they write, so a failed call leaves its target untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed dimensions (negative extent, size mismatch on reshape, ...)
    #[error("Invalid shape {shape:?}: {reason}")]
    InvalidShape {
        /// The offending dimensions
        shape: Vec<isize>,
        /// Reason for invalidity
        reason: String,
    },

    /// Multi-index or flat position outside the valid range
    #[error("Index {index:?} out of range for shape {shape:?}")]
    IndexOutOfRange {
        /// The invalid index
        index: Vec<usize>,
        /// Shape the index was checked against
        shape: Vec<usize>,
    },

    /// Operand shapes differ where exact equality is required
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// Operation cannot run on this dtype or storage
    #[error("Operation '{op}' not available for dtype {dtype}: {reason}")]
    OperationNotAvailable {
        /// The operation name
        op: &'static str,
        /// Element type of the target
        dtype: DType,
        /// Why the operation is unavailable
        reason: &'static str,
    },

    /// Invalid axis for a tensor of the given rank
    #[error("Invalid axis {axis} for tensor with {rank} dimensions")]
    InvalidAxis {
        /// The invalid axis
        axis: isize,
        /// Number of dimensions
        rank: usize,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },
}

impl Error {
    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }

    /// Create an invalid shape error
    pub fn invalid_shape(shape: &[usize], reason: impl Into<String>) -> Self {
        Self::InvalidShape {
            shape: shape.iter().map(|&d| d as isize).collect(),
            reason: reason.into(),
        }
    }

    /// Create an index out of range error
    pub fn out_of_range(index: &[usize], shape: &[usize]) -> Self {
        Self::IndexOutOfRange {
            index: index.to_vec(),
            shape: shape.to_vec(),
        }
    }

    /// Create an operation-not-available error
    pub fn not_available(op: &'static str, dtype: DType, reason: &'static str) -> Self {
        Self::OperationNotAvailable { op, dtype, reason }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }

    /// Create an invalid axis error
    pub fn invalid_axis(axis: isize, rank: usize) -> Self {
        Self::InvalidAxis { axis, rank }
    }
}
