//! Tensor operators
//!
//! This module holds the operator catalogs and the code that runs them
//! in place against a layout and its storage.
//!
//! # Design
//!
//! Every call goes through one decision tree ([`select_path`]) before any
//! element is touched, then executes chunk by chunk:
//!
//! ```text
//! unary_op / binary_op / reduce
//!   ├── select_path          fp-only check, storage capability, run step
//!   ├── ExecPath::VectorUnit     kernels: SIMD (f32/f64) or lane kernels
//!   ├── ExecPath::VectorStride   kernels: gathered lane kernels
//!   └── ExecPath::Generic        storage get/set over the pointer iterator
//! ```
//!
//! Validation (dtype, shapes, divisors, writable target) precedes every
//! write, so a failed call leaves its target untouched.

pub(crate) mod arithmetic;
mod binary;
mod dispatch;
mod fold;
mod reduce;
mod unary;

pub use arithmetic::{BinaryOp, UnaryOp};
pub use dispatch::{ExecPath, select_path};
pub use reduce::{ReduceOp, normalize_axes, reduce_output_shape};

pub(crate) use binary::{binary_op, binary_scalar_op};
pub(crate) use fold::{reduce, reduce_axes};
pub(crate) use reduce::Fold;
pub(crate) use unary::unary_op;
