//! SIMD-accelerated unary operations
//!
//! Operations with direct AVX2 instructions:
//! - Neg, Abs (sign-bit masks, bit-identical to the scalar path)
//! - Sqr, Sqrt, Floor, Ceil, Rint
//!
//! Everything else (transcendentals, clamp, fills) runs on the lane kernels.

#[cfg(target_arch = "x86_64")]
mod avx2;

use super::{SIMD_THRESHOLD, detect_simd};
use crate::ops::UnaryOp;

/// Check if operation has SIMD support
#[inline]
const fn is_simd_supported(op: UnaryOp) -> bool {
    matches!(
        op,
        UnaryOp::Neg
            | UnaryOp::Abs
            | UnaryOp::Sqr
            | UnaryOp::Sqrt
            | UnaryOp::Floor
            | UnaryOp::Ceil
            | UnaryOp::Rint
    )
}

#[inline]
fn applies(op: UnaryOp, len: usize) -> bool {
    len >= SIMD_THRESHOLD && is_simd_supported(op) && detect_simd().has_avx2()
}

/// In-place SIMD unary operation for f32; `false` if not applicable
///
/// # Safety
/// - `a` must be valid for reads and writes of `len` elements
#[inline]
pub unsafe fn unary_f32(op: UnaryOp, a: *mut f32, len: usize) -> bool {
    if !applies(op, len) {
        return false;
    }
    #[cfg(target_arch = "x86_64")]
    unsafe {
        avx2::unary_f32(op, a, len);
    }
    cfg!(target_arch = "x86_64")
}

/// In-place SIMD unary operation for f64; `false` if not applicable
///
/// # Safety
/// - `a` must be valid for reads and writes of `len` elements
#[inline]
pub unsafe fn unary_f64(op: UnaryOp, a: *mut f64, len: usize) -> bool {
    if !applies(op, len) {
        return false;
    }
    #[cfg(target_arch = "x86_64")]
    unsafe {
        avx2::unary_f64(op, a, len);
    }
    cfg!(target_arch = "x86_64")
}
