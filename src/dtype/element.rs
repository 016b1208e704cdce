//! Element trait for mapping Rust types to DType

use super::DType;
use crate::ops::UnaryOp;
use crate::ops::arithmetic::{float_unary, int_unary};
use bytemuck::Pod;
use std::fmt::{Debug, Display};

mod private {
    pub trait Sealed {}

    impl Sealed for f64 {}
    impl Sealed for f32 {}
    impl Sealed for i32 {}
    impl Sealed for i8 {}
}

/// Trait for types that can be elements of a tensor
///
/// Sealed over the closed primitive set `f64`, `f32`, `i32`, `i8`. Every
/// operator body is written once, generically over `Element`; this trait
/// supplies the per-type scalar semantics those bodies need.
///
/// # Numeric policy
///
/// - Integer arithmetic wraps (`i32::MAX + 1 == i32::MIN`).
/// - `min_elem`/`max_elem` propagate NaN for floating point types.
/// - `to_f64`/`from_f64` are native `as` casts: lossy, saturating for
///   integers, with no additional rounding guarantee.
pub trait Element:
    private::Sealed + Copy + Send + Sync + Pod + PartialOrd + Default + Debug + Display + 'static
{
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Convert to f64
    fn to_f64(self) -> f64;

    /// Convert from f64 with a native cast
    fn from_f64(v: f64) -> Self;

    /// Convert a flat counter value (used by sequence factories)
    fn from_usize(v: usize) -> Self;

    /// Zero value
    fn zero() -> Self;

    /// One value
    fn one() -> Self;

    /// Identity of `max`: negative infinity for floats, `MIN` for integers
    fn lowest() -> Self;

    /// Identity of `min`: positive infinity for floats, `MAX` for integers
    fn highest() -> Self;

    /// Addition (wrapping for integers)
    fn add_elem(self, rhs: Self) -> Self;

    /// Subtraction (wrapping for integers)
    fn sub_elem(self, rhs: Self) -> Self;

    /// Multiplication (wrapping for integers)
    fn mul_elem(self, rhs: Self) -> Self;

    /// Division. Integer callers must rule out a zero divisor first.
    fn div_elem(self, rhs: Self) -> Self;

    /// Minimum of two values, NaN-propagating
    fn min_elem(self, rhs: Self) -> Self;

    /// Maximum of two values, NaN-propagating
    fn max_elem(self, rhs: Self) -> Self;

    /// Whether this value is NaN (always false for integers)
    fn is_nan(self) -> bool;

    /// Apply a unary operator to a single value
    fn apply_unary(self, op: UnaryOp) -> Self;
}

macro_rules! impl_float_element {
    ($t:ty, $dtype:expr) => {
        impl Element for $t {
            const DTYPE: DType = $dtype;

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $t
            }

            #[inline]
            fn from_usize(v: usize) -> Self {
                v as $t
            }

            #[inline]
            fn zero() -> Self {
                0.0
            }

            #[inline]
            fn one() -> Self {
                1.0
            }

            #[inline]
            fn lowest() -> Self {
                <$t>::NEG_INFINITY
            }

            #[inline]
            fn highest() -> Self {
                <$t>::INFINITY
            }

            #[inline]
            fn add_elem(self, rhs: Self) -> Self {
                self + rhs
            }

            #[inline]
            fn sub_elem(self, rhs: Self) -> Self {
                self - rhs
            }

            #[inline]
            fn mul_elem(self, rhs: Self) -> Self {
                self * rhs
            }

            #[inline]
            fn div_elem(self, rhs: Self) -> Self {
                self / rhs
            }

            #[inline]
            fn min_elem(self, rhs: Self) -> Self {
                if self.is_nan() || rhs.is_nan() {
                    <$t>::NAN
                } else if rhs < self {
                    rhs
                } else {
                    self
                }
            }

            #[inline]
            fn max_elem(self, rhs: Self) -> Self {
                if self.is_nan() || rhs.is_nan() {
                    <$t>::NAN
                } else if rhs > self {
                    rhs
                } else {
                    self
                }
            }

            #[inline]
            fn is_nan(self) -> bool {
                <$t>::is_nan(self)
            }

            #[inline]
            fn apply_unary(self, op: UnaryOp) -> Self {
                float_unary(op, self)
            }
        }
    };
}

macro_rules! impl_int_element {
    ($t:ty, $dtype:expr) => {
        impl Element for $t {
            const DTYPE: DType = $dtype;

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $t
            }

            #[inline]
            fn from_usize(v: usize) -> Self {
                v as $t
            }

            #[inline]
            fn zero() -> Self {
                0
            }

            #[inline]
            fn one() -> Self {
                1
            }

            #[inline]
            fn lowest() -> Self {
                <$t>::MIN
            }

            #[inline]
            fn highest() -> Self {
                <$t>::MAX
            }

            #[inline]
            fn add_elem(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }

            #[inline]
            fn sub_elem(self, rhs: Self) -> Self {
                self.wrapping_sub(rhs)
            }

            #[inline]
            fn mul_elem(self, rhs: Self) -> Self {
                self.wrapping_mul(rhs)
            }

            #[inline]
            fn div_elem(self, rhs: Self) -> Self {
                self.wrapping_div(rhs)
            }

            #[inline]
            fn min_elem(self, rhs: Self) -> Self {
                Ord::min(self, rhs)
            }

            #[inline]
            fn max_elem(self, rhs: Self) -> Self {
                Ord::max(self, rhs)
            }

            #[inline]
            fn is_nan(self) -> bool {
                false
            }

            #[inline]
            fn apply_unary(self, op: UnaryOp) -> Self {
                int_unary(op, self)
            }
        }
    };
}

impl_float_element!(f64, DType::F64);
impl_float_element!(f32, DType::F32);
impl_int_element!(i32, DType::I32);
impl_int_element!(i8, DType::I8);
