//! SIMD detection and architecture kernels
//!
//! Runtime CPU feature detection plus AVX2 kernels for `f32`/`f64`
//! contiguous runs. Each operation family has its own submodule whose
//! `mod.rs` decides whether the intrinsics path applies; a kernel that
//! declines returns `false` and the caller uses the portable lane kernels.
//!
//! ```text
//! simd/
//! ├── mod.rs          # This file: detection and typed entry points
//! ├── unary/          # Neg, Abs, Sqr, Sqrt, Floor, Ceil, Rint
//! ├── binary/         # Add, Sub, Mul, Div (tensor and scalar operand)
//! └── reduce/         # Sum, Prod
//! ```
//!
//! Min/Max have no intrinsics path: `_mm256_max_*` does not propagate NaN.

pub(crate) mod binary;
pub(crate) mod reduce;
pub(crate) mod unary;

use crate::dtype::{DType, Element};
use crate::ops::{BinaryOp, Fold, UnaryOp};
use std::sync::OnceLock;
use tracing::debug;

/// Minimum run length to justify SIMD setup
pub(crate) const SIMD_THRESHOLD: usize = 32;

/// SIMD capability level detected at runtime
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SimdLevel {
    /// Scalar fallback (no SIMD)
    Scalar = 0,
    /// NEON baseline for AArch64 (no kernels yet; lane kernels run)
    Neon = 1,
    /// AVX2 with FMA support (256-bit vectors, 8 f32s or 4 f64s)
    Avx2Fma = 2,
    /// AVX-512F with FMA support; runs the AVX2 kernels
    Avx512 = 3,
}

impl SimdLevel {
    /// Returns true if this level supports 256-bit operations
    #[inline]
    pub const fn has_avx2(self) -> bool {
        matches!(self, Self::Avx512 | Self::Avx2Fma)
    }

    /// Returns the name of this SIMD level as a string
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Avx512 => "AVX-512",
            Self::Avx2Fma => "AVX2+FMA",
            Self::Neon => "NEON",
            Self::Scalar => "Scalar",
        }
    }
}

impl std::fmt::Display for SimdLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cached SIMD level detection
static SIMD_LEVEL: OnceLock<SimdLevel> = OnceLock::new();

/// Detect the best available SIMD level for the current CPU
///
/// The first call performs detection; later calls read the cached value.
#[inline]
pub fn detect_simd() -> SimdLevel {
    *SIMD_LEVEL.get_or_init(|| {
        let level = detect_simd_uncached();
        debug!(level = %level, "detected SIMD level");
        level
    })
}

/// Perform actual CPU feature detection (called once)
#[cold]
fn detect_simd_uncached() -> SimdLevel {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx512f")
            && is_x86_feature_detected!("avx2")
            && is_x86_feature_detected!("fma")
        {
            return SimdLevel::Avx512;
        }

        if is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma") {
            return SimdLevel::Avx2Fma;
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        return SimdLevel::Neon;
    }

    SimdLevel::Scalar
}

/// In-place unary op over `len` contiguous elements; `false` if declined
///
/// # Safety
/// - `a` must be valid for reads and writes of `len` elements
#[inline]
pub(crate) unsafe fn unary_unit<T: Element>(op: UnaryOp, a: *mut T, len: usize) -> bool {
    unsafe {
        match T::DTYPE {
            DType::F32 => unary::unary_f32(op, a as *mut f32, len),
            DType::F64 => unary::unary_f64(op, a as *mut f64, len),
            _ => false,
        }
    }
}

/// In-place `a = a op b` over `len` contiguous elements; `false` if declined
///
/// # Safety
/// - `a` must be valid for reads and writes of `len` elements
/// - `b` must be valid for reads of `len` elements
#[inline]
pub(crate) unsafe fn binary_unit<T: Element>(
    op: BinaryOp,
    a: *mut T,
    b: *const T,
    len: usize,
) -> bool {
    unsafe {
        match T::DTYPE {
            DType::F32 => binary::binary_f32(op, a as *mut f32, b as *const f32, len),
            DType::F64 => binary::binary_f64(op, a as *mut f64, b as *const f64, len),
            _ => false,
        }
    }
}

/// In-place `a = a op s` over `len` contiguous elements; `false` if declined
///
/// # Safety
/// - `a` must be valid for reads and writes of `len` elements
#[inline]
pub(crate) unsafe fn binary_scalar_unit<T: Element>(
    op: BinaryOp,
    a: *mut T,
    s: T,
    len: usize,
) -> bool {
    unsafe {
        match T::DTYPE {
            DType::F32 => binary::binary_scalar_f32(op, a as *mut f32, s.to_f64() as f32, len),
            DType::F64 => binary::binary_scalar_f64(op, a as *mut f64, s.to_f64(), len),
            _ => false,
        }
    }
}

/// Fold `len` contiguous elements; `None` if declined
///
/// # Safety
/// - `a` must be valid for reads of `len` elements
#[inline]
pub(crate) unsafe fn reduce_unit<T: Element>(fold: Fold, a: *const T, len: usize) -> Option<T> {
    unsafe {
        match T::DTYPE {
            DType::F32 => reduce::reduce_f32(fold, a as *const f32, len).map(|v| T::from_f64(v as f64)),
            DType::F64 => reduce::reduce_f64(fold, a as *const f64, len).map(T::from_f64),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_is_cached() {
        assert_eq!(detect_simd(), detect_simd());
    }

    #[test]
    fn test_levels_are_ordered() {
        assert!(SimdLevel::Avx512 > SimdLevel::Avx2Fma);
        assert!(SimdLevel::Avx512.has_avx2());
        assert!(!SimdLevel::Neon.has_avx2());
        assert_eq!(SimdLevel::Avx2Fma.to_string(), "AVX2+FMA");
    }

    #[test]
    fn test_integer_dtypes_decline() {
        let mut data = vec![1i32; 64];
        assert!(!unsafe { unary_unit(UnaryOp::Neg, data.as_mut_ptr(), 64) });
    }
}
