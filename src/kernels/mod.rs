//! Execution bodies for the vectorized paths
//!
//! The entry points below run one constant-step run of an array storage.
//! Unit-stride runs try the architecture kernels first (behind the `simd`
//! feature and the engine's runtime switch) and fall back to the portable
//! lane kernels; gathered runs always use the lane kernels. The generic
//! scalar path never reaches this module.

mod lane;
#[cfg(feature = "simd")]
pub mod simd;

pub use lane::LANES;

use crate::dtype::Element;
use crate::error::Result;
use crate::iter::Chunk;
use crate::ops::{BinaryOp, ExecPath, Fold, UnaryOp};
use crate::tensor::Storage;

/// First element of a unit-stride run lying wholly inside `storage`
fn unit_run<T: Element>(storage: &Storage<T>, run: &Chunk) -> Option<*mut T> {
    let base = storage.as_mut_ptr()?;
    let end = run.start.checked_add(run.len)?;
    (run.step == 1 && end <= storage.len()).then(|| base.wrapping_add(run.start))
}

/// Apply `op` in place to one run
pub(crate) fn unary_chunk<T: Element>(
    op: UnaryOp,
    storage: &Storage<T>,
    run: Chunk,
    path: ExecPath,
    use_simd: bool,
) -> Result<()> {
    if path == ExecPath::VectorUnit && use_simd {
        if let Some(a) = unit_run(storage, &run) {
            // SAFETY: the run lies inside storage
            if unsafe { simd_unary(op, a, run.len) } {
                return Ok(());
            }
        }
    }
    lane::unary(op, storage, run)
}

/// `a = a op b` over two runs of equal length
pub(crate) fn binary_chunk<T: Element>(
    op: BinaryOp,
    a: &Storage<T>,
    ra: Chunk,
    b: &Storage<T>,
    rb: Chunk,
    path: ExecPath,
    use_simd: bool,
) -> Result<()> {
    debug_assert_eq!(ra.len, rb.len);
    if path == ExecPath::VectorUnit && use_simd && ra.len == rb.len {
        if let (Some(pa), Some(pb)) = (unit_run(a, &ra), unit_run(b, &rb)) {
            // SAFETY: both runs lie inside their storages
            if unsafe { simd_binary(op, pa, pb as *const T, ra.len) } {
                return Ok(());
            }
        }
    }
    lane::binary(op, a, ra, b, rb)
}

/// `a = a op s` over one run
pub(crate) fn binary_scalar_chunk<T: Element>(
    op: BinaryOp,
    storage: &Storage<T>,
    run: Chunk,
    s: T,
    path: ExecPath,
    use_simd: bool,
) -> Result<()> {
    if path == ExecPath::VectorUnit && use_simd {
        if let Some(a) = unit_run(storage, &run) {
            // SAFETY: the run lies inside storage
            if unsafe { simd_binary_scalar(op, a, s, run.len) } {
                return Ok(());
            }
        }
    }
    lane::binary_scalar(op, storage, run, s)
}

/// Fold one run
pub(crate) fn reduce_chunk<T: Element>(
    fold: Fold,
    storage: &Storage<T>,
    run: Chunk,
    path: ExecPath,
    use_simd: bool,
) -> Result<T> {
    if path == ExecPath::VectorUnit && use_simd {
        if let Some(a) = unit_run(storage, &run) {
            // SAFETY: the run lies inside storage
            if let Some(v) = unsafe { simd_reduce(fold, a as *const T, run.len) } {
                return Ok(v);
            }
        }
    }
    lane::reduce(fold, storage, run)
}

#[cfg(feature = "simd")]
use simd::{
    binary_scalar_unit as simd_binary_scalar, binary_unit as simd_binary,
    reduce_unit as simd_reduce, unary_unit as simd_unary,
};

#[cfg(not(feature = "simd"))]
unsafe fn simd_unary<T: Element>(_: UnaryOp, _: *mut T, _: usize) -> bool {
    false
}

#[cfg(not(feature = "simd"))]
unsafe fn simd_binary<T: Element>(_: BinaryOp, _: *mut T, _: *const T, _: usize) -> bool {
    false
}

#[cfg(not(feature = "simd"))]
unsafe fn simd_binary_scalar<T: Element>(_: BinaryOp, _: *mut T, _: T, _: usize) -> bool {
    false
}

#[cfg(not(feature = "simd"))]
unsafe fn simd_reduce<T: Element>(_: Fold, _: *const T, _: usize) -> Option<T> {
    None
}
