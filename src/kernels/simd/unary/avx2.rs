//! AVX2 unary operation kernels
//!
//! Processes 8 f32s or 4 f64s per iteration using 256-bit vectors, in place.
// Value-only intrinsics are safe calls inside `#[target_feature]` fns on
// newer toolchains; the unsafe blocks are still required on 1.85.
#![allow(unused_unsafe)]

use std::arch::x86_64::*;

use crate::dtype::Element;
use crate::ops::UnaryOp;

const F32_LANES: usize = 8;
const F64_LANES: usize = 4;

const RINT: i32 = _MM_FROUND_TO_NEAREST_INT | _MM_FROUND_NO_EXC;

// Per-vector bodies. Sign handling uses bit masks so -0.0 and NaN payloads
// match the scalar path exactly.
#[target_feature(enable = "avx2")]
#[inline]
unsafe fn neg_ps(v: __m256) -> __m256 {
    unsafe { _mm256_xor_ps(v, _mm256_set1_ps(-0.0)) }
}
#[target_feature(enable = "avx2")]
#[inline]
unsafe fn neg_pd(v: __m256d) -> __m256d {
    unsafe { _mm256_xor_pd(v, _mm256_set1_pd(-0.0)) }
}
#[target_feature(enable = "avx2")]
#[inline]
unsafe fn abs_ps(v: __m256) -> __m256 {
    unsafe { _mm256_andnot_ps(_mm256_set1_ps(-0.0), v) }
}
#[target_feature(enable = "avx2")]
#[inline]
unsafe fn abs_pd(v: __m256d) -> __m256d {
    unsafe { _mm256_andnot_pd(_mm256_set1_pd(-0.0), v) }
}
#[target_feature(enable = "avx2")]
#[inline]
unsafe fn sqr_ps(v: __m256) -> __m256 {
    unsafe { _mm256_mul_ps(v, v) }
}
#[target_feature(enable = "avx2")]
#[inline]
unsafe fn sqr_pd(v: __m256d) -> __m256d {
    unsafe { _mm256_mul_pd(v, v) }
}
#[target_feature(enable = "avx2")]
#[inline]
unsafe fn sqrt_ps(v: __m256) -> __m256 {
    unsafe { _mm256_sqrt_ps(v) }
}
#[target_feature(enable = "avx2")]
#[inline]
unsafe fn sqrt_pd(v: __m256d) -> __m256d {
    unsafe { _mm256_sqrt_pd(v) }
}
#[target_feature(enable = "avx2")]
#[inline]
unsafe fn floor_ps(v: __m256) -> __m256 {
    unsafe { _mm256_floor_ps(v) }
}
#[target_feature(enable = "avx2")]
#[inline]
unsafe fn floor_pd(v: __m256d) -> __m256d {
    unsafe { _mm256_floor_pd(v) }
}
#[target_feature(enable = "avx2")]
#[inline]
unsafe fn ceil_ps(v: __m256) -> __m256 {
    unsafe { _mm256_ceil_ps(v) }
}
#[target_feature(enable = "avx2")]
#[inline]
unsafe fn ceil_pd(v: __m256d) -> __m256d {
    unsafe { _mm256_ceil_pd(v) }
}
#[target_feature(enable = "avx2")]
#[inline]
unsafe fn rint_ps(v: __m256) -> __m256 {
    unsafe { _mm256_round_ps::<RINT>(v) }
}
#[target_feature(enable = "avx2")]
#[inline]
unsafe fn rint_pd(v: __m256d) -> __m256d {
    unsafe { _mm256_round_pd::<RINT>(v) }
}

/// Generates the f32 and f64 in-place loops for each listed op
macro_rules! impl_unary_avx2 {
    ($($name:ident),* $(,)?) => {
        paste::paste! {
            $(
                #[target_feature(enable = "avx2")]
                unsafe fn [<unary_ $name _f32>](a: *mut f32, chunks: usize) {
                    for i in 0..chunks {
                        unsafe {
                            let p = a.add(i * F32_LANES);
                            _mm256_storeu_ps(p, [<$name _ps>](_mm256_loadu_ps(p)));
                        }
                    }
                }

                #[target_feature(enable = "avx2")]
                unsafe fn [<unary_ $name _f64>](a: *mut f64, chunks: usize) {
                    for i in 0..chunks {
                        unsafe {
                            let p = a.add(i * F64_LANES);
                            _mm256_storeu_pd(p, [<$name _pd>](_mm256_loadu_pd(p)));
                        }
                    }
                }
            )*
        }
    };
}

impl_unary_avx2!(neg, abs, sqr, sqrt, floor, ceil, rint);

/// AVX2 unary operation for f32
#[target_feature(enable = "avx2")]
pub unsafe fn unary_f32(op: UnaryOp, a: *mut f32, len: usize) {
    let chunks = len / F32_LANES;
    unsafe {
        match op {
            UnaryOp::Neg => unary_neg_f32(a, chunks),
            UnaryOp::Abs => unary_abs_f32(a, chunks),
            UnaryOp::Sqr => unary_sqr_f32(a, chunks),
            UnaryOp::Sqrt => unary_sqrt_f32(a, chunks),
            UnaryOp::Floor => unary_floor_f32(a, chunks),
            UnaryOp::Ceil => unary_ceil_f32(a, chunks),
            UnaryOp::Rint => unary_rint_f32(a, chunks),
            _ => return,
        }
        for i in chunks * F32_LANES..len {
            let p = a.add(i);
            *p = (*p).apply_unary(op);
        }
    }
}

/// AVX2 unary operation for f64
#[target_feature(enable = "avx2")]
pub unsafe fn unary_f64(op: UnaryOp, a: *mut f64, len: usize) {
    let chunks = len / F64_LANES;
    unsafe {
        match op {
            UnaryOp::Neg => unary_neg_f64(a, chunks),
            UnaryOp::Abs => unary_abs_f64(a, chunks),
            UnaryOp::Sqr => unary_sqr_f64(a, chunks),
            UnaryOp::Sqrt => unary_sqrt_f64(a, chunks),
            UnaryOp::Floor => unary_floor_f64(a, chunks),
            UnaryOp::Ceil => unary_ceil_f64(a, chunks),
            UnaryOp::Rint => unary_rint_f64(a, chunks),
            _ => return,
        }
        for i in chunks * F64_LANES..len {
            let p = a.add(i);
            *p = (*p).apply_unary(op);
        }
    }
}
