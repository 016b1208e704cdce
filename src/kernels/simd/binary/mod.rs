//! SIMD-accelerated binary operations
//!
//! In-place `a = a op b` for a tensor operand and `a = a op s` for a scalar
//! operand. Add, Sub, Mul and Div are IEEE-exact per element, so results
//! match the scalar path bit for bit.

#[cfg(target_arch = "x86_64")]
mod avx2;

use super::{SIMD_THRESHOLD, detect_simd};
use crate::ops::BinaryOp;

#[inline]
const fn is_simd_supported(op: BinaryOp) -> bool {
    matches!(
        op,
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div
    )
}

#[inline]
fn applies(op: BinaryOp, len: usize) -> bool {
    len >= SIMD_THRESHOLD && is_simd_supported(op) && detect_simd().has_avx2()
}

macro_rules! impl_binary_dispatch {
    ($t:ident) => {
        paste::paste! {
            /// In-place SIMD binary operation; `false` if not applicable
            ///
            /// # Safety
            /// - `a` must be valid for reads and writes of `len` elements
            /// - `b` must be valid for reads of `len` elements
            #[inline]
            pub unsafe fn [<binary_ $t>](op: BinaryOp, a: *mut $t, b: *const $t, len: usize) -> bool {
                if !applies(op, len) {
                    return false;
                }
                #[cfg(target_arch = "x86_64")]
                unsafe {
                    avx2::[<binary_ $t>](op, a, b, len);
                }
                cfg!(target_arch = "x86_64")
            }

            /// In-place SIMD binary operation with a scalar operand; `false` if not applicable
            ///
            /// # Safety
            /// - `a` must be valid for reads and writes of `len` elements
            #[inline]
            pub unsafe fn [<binary_scalar_ $t>](op: BinaryOp, a: *mut $t, s: $t, len: usize) -> bool {
                if !applies(op, len) {
                    return false;
                }
                #[cfg(target_arch = "x86_64")]
                unsafe {
                    avx2::[<binary_scalar_ $t>](op, a, s, len);
                }
                cfg!(target_arch = "x86_64")
            }
        }
    };
}

impl_binary_dispatch!(f32);
impl_binary_dispatch!(f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_f32_matches_scalar() {
        let b: Vec<f32> = (0..100).map(|x| x as f32 * 0.5 + 1.0).collect();
        for op in [BinaryOp::Add, BinaryOp::Sub, BinaryOp::Mul, BinaryOp::Div] {
            let orig: Vec<f32> = (0..100).map(|x| x as f32 - 50.0).collect();
            let mut a = orig.clone();
            if unsafe { binary_f32(op, a.as_mut_ptr(), b.as_ptr(), a.len()) } {
                for i in 0..a.len() {
                    assert_eq!(a[i], op.apply(orig[i], b[i]), "{op:?} at {i}");
                }
            }
        }
    }

    #[test]
    fn test_binary_scalar_f64() {
        let mut a: Vec<f64> = (0..37).map(|x| x as f64).collect();
        if unsafe { binary_scalar_f64(BinaryOp::Mul, a.as_mut_ptr(), 2.0, a.len()) } {
            assert_eq!(a[36], 72.0);
        }
    }

    #[test]
    fn test_min_max_decline() {
        let mut a = vec![0.0f64; 64];
        let b = vec![1.0f64; 64];
        assert!(!unsafe { binary_f64(BinaryOp::Max, a.as_mut_ptr(), b.as_ptr(), 64) });
    }
}
