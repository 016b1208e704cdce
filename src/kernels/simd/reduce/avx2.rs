//! AVX2 reduction kernels
//!
//! Manual horizontal reductions since AVX2 lacks _mm256_reduce_* intrinsics.
// Value-only intrinsics are safe calls inside `#[target_feature]` fns on
// newer toolchains; the unsafe blocks are still required on 1.85.
#![allow(unused_unsafe)]

use std::arch::x86_64::*;

use crate::ops::Fold;

const F32_LANES: usize = 8;
const F64_LANES: usize = 4;

/// AVX2 reduction for f32 (Sum or Prod)
#[target_feature(enable = "avx2")]
pub unsafe fn reduce_f32(fold: Fold, a: *const f32, len: usize) -> f32 {
    let chunks = len / F32_LANES;
    unsafe {
        let prod = matches!(fold, Fold::Prod);
        let mut acc = if prod { _mm256_set1_ps(1.0) } else { _mm256_setzero_ps() };
        for i in 0..chunks {
            let v = _mm256_loadu_ps(a.add(i * F32_LANES));
            acc = if prod { _mm256_mul_ps(acc, v) } else { _mm256_add_ps(acc, v) };
        }
        let mut result = if prod { hprod_f32(acc) } else { hsum_f32(acc) };
        for i in chunks * F32_LANES..len {
            result = fold.combine(result, *a.add(i));
        }
        result
    }
}

/// AVX2 reduction for f64 (Sum or Prod)
#[target_feature(enable = "avx2")]
pub unsafe fn reduce_f64(fold: Fold, a: *const f64, len: usize) -> f64 {
    let chunks = len / F64_LANES;
    unsafe {
        let prod = matches!(fold, Fold::Prod);
        let mut acc = if prod { _mm256_set1_pd(1.0) } else { _mm256_setzero_pd() };
        for i in 0..chunks {
            let v = _mm256_loadu_pd(a.add(i * F64_LANES));
            acc = if prod { _mm256_mul_pd(acc, v) } else { _mm256_add_pd(acc, v) };
        }
        let mut result = if prod { hprod_f64(acc) } else { hsum_f64(acc) };
        for i in chunks * F64_LANES..len {
            result = fold.combine(result, *a.add(i));
        }
        result
    }
}

// ============================================================================
// Horizontal reduction helpers
// ============================================================================

/// Horizontal sum of 8 f32s in __m256
#[target_feature(enable = "avx2")]
#[inline]
unsafe fn hsum_f32(v: __m256) -> f32 {
    unsafe {
        let high = _mm256_extractf128_ps(v, 1);
        let low = _mm256_castps256_ps128(v);
        let sum128 = _mm_add_ps(low, high);
        let shuf = _mm_movehdup_ps(sum128);
        let sum64 = _mm_add_ps(sum128, shuf);
        let shuf2 = _mm_movehl_ps(sum64, sum64);
        _mm_cvtss_f32(_mm_add_ss(sum64, shuf2))
    }
}

/// Horizontal product of 8 f32s in __m256
#[target_feature(enable = "avx2")]
#[inline]
unsafe fn hprod_f32(v: __m256) -> f32 {
    unsafe {
        let high = _mm256_extractf128_ps(v, 1);
        let low = _mm256_castps256_ps128(v);
        let prod128 = _mm_mul_ps(low, high);
        let shuf = _mm_movehdup_ps(prod128);
        let prod64 = _mm_mul_ps(prod128, shuf);
        let shuf2 = _mm_movehl_ps(prod64, prod64);
        _mm_cvtss_f32(_mm_mul_ss(prod64, shuf2))
    }
}

/// Horizontal sum of 4 f64s in __m256d
#[target_feature(enable = "avx2")]
#[inline]
unsafe fn hsum_f64(v: __m256d) -> f64 {
    unsafe {
        let high = _mm256_extractf128_pd(v, 1);
        let low = _mm256_castpd256_pd128(v);
        let sum128 = _mm_add_pd(low, high);
        let shuf = _mm_unpackhi_pd(sum128, sum128);
        _mm_cvtsd_f64(_mm_add_sd(sum128, shuf))
    }
}

/// Horizontal product of 4 f64s in __m256d
#[target_feature(enable = "avx2")]
#[inline]
unsafe fn hprod_f64(v: __m256d) -> f64 {
    unsafe {
        let high = _mm256_extractf128_pd(v, 1);
        let low = _mm256_castpd256_pd128(v);
        let prod128 = _mm_mul_pd(low, high);
        let shuf = _mm_unpackhi_pd(prod128, prod128);
        _mm_cvtsd_f64(_mm_mul_sd(prod128, shuf))
    }
}
