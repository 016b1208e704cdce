//! SIMD-accelerated reductions over contiguous runs
//!
//! Only Sum and Prod: vector add/mul propagate NaN like the scalar fold,
//! vector min/max do not.

#[cfg(target_arch = "x86_64")]
mod avx2;

use super::{SIMD_THRESHOLD, detect_simd};
use crate::ops::Fold;

#[inline]
fn applies(fold: Fold, len: usize) -> bool {
    len >= SIMD_THRESHOLD && matches!(fold, Fold::Sum | Fold::Prod) && detect_simd().has_avx2()
}

/// Fold `len` contiguous f32 values; `None` if not applicable
///
/// # Safety
/// - `a` must be valid for reads of `len` elements
#[inline]
pub unsafe fn reduce_f32(fold: Fold, a: *const f32, len: usize) -> Option<f32> {
    if !applies(fold, len) {
        return None;
    }
    #[cfg(target_arch = "x86_64")]
    let folded = Some(unsafe { avx2::reduce_f32(fold, a, len) });
    #[cfg(not(target_arch = "x86_64"))]
    let folded = None;
    folded
}

/// Fold `len` contiguous f64 values; `None` if not applicable
///
/// # Safety
/// - `a` must be valid for reads of `len` elements
#[inline]
pub unsafe fn reduce_f64(fold: Fold, a: *const f64, len: usize) -> Option<f64> {
    if !applies(fold, len) {
        return None;
    }
    #[cfg(target_arch = "x86_64")]
    let folded = Some(unsafe { avx2::reduce_f64(fold, a, len) });
    #[cfg(not(target_arch = "x86_64"))]
    let folded = None;
    folded
}
