//! # ndstride
//!
//! **N-dimensional strided arrays with shared-storage views and vectorized
//! operator dispatch.**
//!
//! ndstride models a tensor as an affine [`Layout`](tensor::Layout) (shape,
//! signed strides, offset) over a flat, reference-counted
//! [`Storage`](tensor::Storage). Shape transforms build new layouts over the
//! same storage; operators run in place and pick, per call, between SIMD,
//! gathered-lane and generic scalar execution.
//!
//! ## Features
//!
//! - **Views**: transpose, permute, narrow, squeeze, broadcast without copying
//! - **Reshape**: view when the elements are compact in the requested order,
//!   copy otherwise
//! - **Element-wise ops**: abs, sqrt, exp, trigonometry, clamp, min/max, ...
//! - **Reductions**: sum, prod, min, max, mean, variance and NaN-skipping
//!   variants, over all elements or an axis subset
//! - **Storage families**: aligned in-memory buffers, or external columns
//! - **Multiple dtypes**: f64, f32, i32, i8
//!
//! ## Quick Start
//!
//! ```rust
//! use ndstride::prelude::*;
//!
//! let engine = Engine::array();
//! let a = engine.seq::<f64>(&[3, 3], Order::C)?;
//! let b = engine.full(&[3, 3], 2.0, Order::F)?;
//!
//! a.binary_op(&b, BinaryOp::Mul)?;
//! assert_eq!(a.reduce(ReduceOp::Sum)?, 72.0);
//!
//! let row_max = a.reduce_axes(ReduceOp::Max, &[1], false)?;
//! assert_eq!(row_max.to_vec(Order::C), vec![4.0, 10.0, 16.0]);
//! # Ok::<(), ndstride::error::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `simd` (default): AVX2 kernels for `f32`/`f64` unit-stride runs,
//!   selected at runtime by CPU detection

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dtype;
pub mod engine;
pub mod error;
pub mod iter;
pub mod kernels;
pub mod ops;
pub mod tensor;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dtype::{DType, Element};
    pub use crate::engine::{Engine, EngineConfig, StorageFamily};
    pub use crate::error::{Error, Result};
    pub use crate::ops::{BinaryOp, ReduceOp, UnaryOp};
    pub use crate::tensor::{Layout, Order, Shape, Storage, Tensor};
}
