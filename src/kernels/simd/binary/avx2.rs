//! AVX2 binary operation kernels
//!
//! Processes 8 f32s or 4 f64s per iteration using 256-bit vectors.
// Value-only intrinsics are safe calls inside `#[target_feature]` fns on
// newer toolchains; the unsafe blocks are still required on 1.85.
#![allow(unused_unsafe)]

use std::arch::x86_64::*;

use crate::ops::BinaryOp;

const F32_LANES: usize = 8;
const F64_LANES: usize = 4;

/// Generates tensor-operand and scalar-operand loops for one vector op
macro_rules! impl_binary_avx2 {
    ($name:ident, $t:ident, $lanes:expr, $vec_op:ident, $load:ident, $store:ident, $splat:ident) => {
        paste::paste! {
            #[target_feature(enable = "avx2")]
            unsafe fn [<binary_ $name _ $t>](a: *mut $t, b: *const $t, chunks: usize) {
                for i in 0..chunks {
                    unsafe {
                        let offset = i * $lanes;
                        let va = $load(a.add(offset));
                        let vb = $load(b.add(offset));
                        $store(a.add(offset), $vec_op(va, vb));
                    }
                }
            }

            #[target_feature(enable = "avx2")]
            unsafe fn [<binary_scalar_ $name _ $t>](a: *mut $t, s: $t, chunks: usize) {
                let vs = $splat(s);
                for i in 0..chunks {
                    unsafe {
                        let offset = i * $lanes;
                        let va = $load(a.add(offset));
                        $store(a.add(offset), $vec_op(va, vs));
                    }
                }
            }
        }
    };
}

impl_binary_avx2!(add, f32, F32_LANES, _mm256_add_ps, _mm256_loadu_ps, _mm256_storeu_ps, _mm256_set1_ps);
impl_binary_avx2!(sub, f32, F32_LANES, _mm256_sub_ps, _mm256_loadu_ps, _mm256_storeu_ps, _mm256_set1_ps);
impl_binary_avx2!(mul, f32, F32_LANES, _mm256_mul_ps, _mm256_loadu_ps, _mm256_storeu_ps, _mm256_set1_ps);
impl_binary_avx2!(div, f32, F32_LANES, _mm256_div_ps, _mm256_loadu_ps, _mm256_storeu_ps, _mm256_set1_ps);
impl_binary_avx2!(add, f64, F64_LANES, _mm256_add_pd, _mm256_loadu_pd, _mm256_storeu_pd, _mm256_set1_pd);
impl_binary_avx2!(sub, f64, F64_LANES, _mm256_sub_pd, _mm256_loadu_pd, _mm256_storeu_pd, _mm256_set1_pd);
impl_binary_avx2!(mul, f64, F64_LANES, _mm256_mul_pd, _mm256_loadu_pd, _mm256_storeu_pd, _mm256_set1_pd);
impl_binary_avx2!(div, f64, F64_LANES, _mm256_div_pd, _mm256_loadu_pd, _mm256_storeu_pd, _mm256_set1_pd);

/// Generates the per-type entry points with a scalar tail
macro_rules! impl_binary_entry {
    ($t:ident, $lanes:expr) => {
        paste::paste! {
            /// AVX2 binary operation
            #[target_feature(enable = "avx2")]
            pub unsafe fn [<binary_ $t>](op: BinaryOp, a: *mut $t, b: *const $t, len: usize) {
                let chunks = len / $lanes;
                unsafe {
                    match op {
                        BinaryOp::Add => [<binary_add_ $t>](a, b, chunks),
                        BinaryOp::Sub => [<binary_sub_ $t>](a, b, chunks),
                        BinaryOp::Mul => [<binary_mul_ $t>](a, b, chunks),
                        BinaryOp::Div => [<binary_div_ $t>](a, b, chunks),
                        BinaryOp::Min | BinaryOp::Max => return,
                    }
                    for i in chunks * $lanes..len {
                        *a.add(i) = op.apply(*a.add(i), *b.add(i));
                    }
                }
            }

            /// AVX2 binary operation with a scalar operand
            #[target_feature(enable = "avx2")]
            pub unsafe fn [<binary_scalar_ $t>](op: BinaryOp, a: *mut $t, s: $t, len: usize) {
                let chunks = len / $lanes;
                unsafe {
                    match op {
                        BinaryOp::Add => [<binary_scalar_add_ $t>](a, s, chunks),
                        BinaryOp::Sub => [<binary_scalar_sub_ $t>](a, s, chunks),
                        BinaryOp::Mul => [<binary_scalar_mul_ $t>](a, s, chunks),
                        BinaryOp::Div => [<binary_scalar_div_ $t>](a, s, chunks),
                        BinaryOp::Min | BinaryOp::Max => return,
                    }
                    for i in chunks * $lanes..len {
                        *a.add(i) = op.apply(*a.add(i), s);
                    }
                }
            }
        }
    };
}

impl_binary_entry!(f32, F32_LANES);
impl_binary_entry!(f64, F64_LANES);
