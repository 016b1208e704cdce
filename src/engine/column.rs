//! External column abstraction for the column storage family

use crate::dtype::DType;
use parking_lot::RwLock;
use std::fmt;

/// Element container owned outside the engine
///
/// Columns are f64-addressable: every read and write crosses the boundary
/// as `f64` and the column narrows to its native dtype on write. A column
/// synchronizes its own state, so `get`/`set` take `&self`.
///
/// Indices are always `< len()`; storage checks bounds before calling in.
pub trait Column: Send + Sync + fmt::Debug {
    /// Native element type of the column
    fn dtype(&self) -> DType;

    /// Number of elements
    fn len(&self) -> usize;

    /// Whether the column holds no elements
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read element `i`
    fn get(&self, i: usize) -> f64;

    /// Write element `i`, narrowing to the native dtype
    fn set(&self, i: usize, v: f64);
}

/// Vector-backed column guarded by a read-write lock
pub struct VecColumn {
    dtype: DType,
    values: RwLock<Vec<f64>>,
}

impl VecColumn {
    /// Column of `len` zeros
    pub fn zeros(dtype: DType, len: usize) -> Self {
        Self {
            dtype,
            values: RwLock::new(vec![0.0; len]),
        }
    }

    /// Column over existing values, narrowed to `dtype`
    pub fn from_values(dtype: DType, mut values: Vec<f64>) -> Self {
        values.iter_mut().for_each(|v| *v = narrow(dtype, *v));
        Self {
            dtype,
            values: RwLock::new(values),
        }
    }

    /// Snapshot of the stored values
    pub fn values(&self) -> Vec<f64> {
        self.values.read().clone()
    }
}

/// Round-trip a value through the native type of `dtype`
fn narrow(dtype: DType, v: f64) -> f64 {
    match dtype {
        DType::F64 => v,
        DType::F32 => v as f32 as f64,
        DType::I32 => v as i32 as f64,
        DType::I8 => v as i8 as f64,
    }
}

impl Column for VecColumn {
    fn dtype(&self) -> DType {
        self.dtype
    }

    fn len(&self) -> usize {
        self.values.read().len()
    }

    fn get(&self, i: usize) -> f64 {
        self.values.read()[i]
    }

    fn set(&self, i: usize, v: f64) {
        self.values.write()[i] = narrow(self.dtype, v);
    }
}

impl fmt::Debug for VecColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VecColumn")
            .field("dtype", &self.dtype)
            .field("len", &self.len())
            .finish()
    }
}
