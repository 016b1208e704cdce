//! Tensor types and operations
//!
//! This module provides the core `Tensor` type: an n-dimensional strided
//! view binding a [`Layout`] to a shared, reference-counted [`Storage`].

mod core;
mod layout;
mod order;
mod shape;
mod storage;
mod strides;

pub use core::{Tensor, Values};
pub use layout::Layout;
pub use order::Order;
pub use shape::Shape;
pub use storage::{Storage, StorageFamily};
pub use strides::Strides;

pub(crate) use shape::STACK_DIMS;
