//! Element-wise operator catalogs
//!
//! Operators are plain values executed in place by the tensor methods. The
//! scalar semantics of every operator on every element type are defined
//! here, once.

use crate::dtype::Element;
use num_traits::{Float, PrimInt, WrappingMul, WrappingNeg};

/// Unary operation kind
///
/// Payloads are `f64` and are cast to the element type with a native cast.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum UnaryOp {
    /// Absolute value: |a| (wrapping for integers)
    Abs,
    /// Negation: -a (wrapping for integers)
    Neg,
    /// Square: a^2 (wrapping for integers)
    Sqr,
    /// Square root
    Sqrt,
    /// Exponential: e^a
    Exp,
    /// e^a - 1, accurate near zero
    Expm1,
    /// Natural log
    Log,
    /// ln(1 + a), accurate near zero
    Log1p,
    /// Sine
    Sin,
    /// Arcsine
    Asin,
    /// Hyperbolic sine
    Sinh,
    /// Cosine
    Cos,
    /// Arccosine
    Acos,
    /// Hyperbolic cosine
    Cosh,
    /// Tangent
    Tan,
    /// Arctangent
    Atan,
    /// Hyperbolic tangent
    Tanh,
    /// Logistic function: 1 / (1 + e^-a)
    Sigmoid,
    /// Floor (identity on integers)
    Floor,
    /// Ceiling (identity on integers)
    Ceil,
    /// Round half to even (identity on integers)
    Rint,
    /// Clamp into `[min, max]`; NaN passes through
    Clamp {
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },
    /// Overwrite with a constant
    Fill(f64),
    /// Replace NaN with a constant
    FillNan(f64),
    /// Replace NaN and infinities with finite values
    NanToNum {
        /// Replacement for NaN
        nan: f64,
        /// Replacement for +inf
        pos_inf: f64,
        /// Replacement for -inf
        neg_inf: f64,
    },
}

impl UnaryOp {
    /// Whether the operator is defined only for floating point elements
    pub const fn is_fp_only(self) -> bool {
        matches!(
            self,
            UnaryOp::Sqrt
                | UnaryOp::Exp
                | UnaryOp::Expm1
                | UnaryOp::Log
                | UnaryOp::Log1p
                | UnaryOp::Sin
                | UnaryOp::Asin
                | UnaryOp::Sinh
                | UnaryOp::Cos
                | UnaryOp::Acos
                | UnaryOp::Cosh
                | UnaryOp::Tan
                | UnaryOp::Atan
                | UnaryOp::Tanh
                | UnaryOp::Sigmoid
                | UnaryOp::FillNan(_)
                | UnaryOp::NanToNum { .. }
        )
    }

    /// Operator name for errors and tracing
    pub const fn name(self) -> &'static str {
        match self {
            UnaryOp::Abs => "abs",
            UnaryOp::Neg => "neg",
            UnaryOp::Sqr => "sqr",
            UnaryOp::Sqrt => "sqrt",
            UnaryOp::Exp => "exp",
            UnaryOp::Expm1 => "expm1",
            UnaryOp::Log => "log",
            UnaryOp::Log1p => "log1p",
            UnaryOp::Sin => "sin",
            UnaryOp::Asin => "asin",
            UnaryOp::Sinh => "sinh",
            UnaryOp::Cos => "cos",
            UnaryOp::Acos => "acos",
            UnaryOp::Cosh => "cosh",
            UnaryOp::Tan => "tan",
            UnaryOp::Atan => "atan",
            UnaryOp::Tanh => "tanh",
            UnaryOp::Sigmoid => "sigmoid",
            UnaryOp::Floor => "floor",
            UnaryOp::Ceil => "ceil",
            UnaryOp::Rint => "rint",
            UnaryOp::Clamp { .. } => "clamp",
            UnaryOp::Fill(_) => "fill",
            UnaryOp::FillNan(_) => "fill_nan",
            UnaryOp::NanToNum { .. } => "nan_to_num",
        }
    }
}

/// Binary operation kind
///
/// Operands must have equal shapes; there is no implicit broadcasting.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// Addition: a + b
    Add,
    /// Subtraction: a - b
    Sub,
    /// Multiplication: a * b
    Mul,
    /// Division: a / b
    Div,
    /// Minimum: min(a, b), NaN-propagating
    Min,
    /// Maximum: max(a, b), NaN-propagating
    Max,
}

impl BinaryOp {
    /// Operator name for errors and tracing
    pub const fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::Div => "div",
            BinaryOp::Min => "min",
            BinaryOp::Max => "max",
        }
    }

    /// Apply to one pair of elements
    #[inline]
    pub fn apply<T: Element>(self, a: T, b: T) -> T {
        match self {
            BinaryOp::Add => a.add_elem(b),
            BinaryOp::Sub => a.sub_elem(b),
            BinaryOp::Mul => a.mul_elem(b),
            BinaryOp::Div => a.div_elem(b),
            BinaryOp::Min => a.min_elem(b),
            BinaryOp::Max => a.max_elem(b),
        }
    }
}

/// Round half to even, which `num_traits::Float` does not expose
pub(crate) trait RoundTiesEven {
    fn round_ties_even(self) -> Self;
}

impl RoundTiesEven for f64 {
    #[inline]
    fn round_ties_even(self) -> Self {
        f64::round_ties_even(self)
    }
}

impl RoundTiesEven for f32 {
    #[inline]
    fn round_ties_even(self) -> Self {
        f32::round_ties_even(self)
    }
}

/// Scalar semantics of a unary operator on floating point elements
#[inline]
pub(crate) fn float_unary<F: Float + Element + RoundTiesEven>(op: UnaryOp, x: F) -> F {
    match op {
        UnaryOp::Abs => x.abs(),
        UnaryOp::Neg => -x,
        UnaryOp::Sqr => x * x,
        UnaryOp::Sqrt => x.sqrt(),
        UnaryOp::Exp => x.exp(),
        UnaryOp::Expm1 => x.exp_m1(),
        UnaryOp::Log => x.ln(),
        UnaryOp::Log1p => x.ln_1p(),
        UnaryOp::Sin => x.sin(),
        UnaryOp::Asin => x.asin(),
        UnaryOp::Sinh => x.sinh(),
        UnaryOp::Cos => x.cos(),
        UnaryOp::Acos => x.acos(),
        UnaryOp::Cosh => x.cosh(),
        UnaryOp::Tan => x.tan(),
        UnaryOp::Atan => x.atan(),
        UnaryOp::Tanh => x.tanh(),
        UnaryOp::Sigmoid => <F as Element>::one() / (<F as Element>::one() + (-x).exp()),
        UnaryOp::Floor => x.floor(),
        UnaryOp::Ceil => x.ceil(),
        UnaryOp::Rint => RoundTiesEven::round_ties_even(x),
        UnaryOp::Clamp { min, max } => clamp(x, F::from_f64(min), F::from_f64(max)),
        UnaryOp::Fill(v) => F::from_f64(v),
        UnaryOp::FillNan(v) => {
            if Float::is_nan(x) {
                F::from_f64(v)
            } else {
                x
            }
        }
        UnaryOp::NanToNum {
            nan,
            pos_inf,
            neg_inf,
        } => {
            if Float::is_nan(x) {
                F::from_f64(nan)
            } else if x == F::infinity() {
                F::from_f64(pos_inf)
            } else if x == F::neg_infinity() {
                F::from_f64(neg_inf)
            } else {
                x
            }
        }
    }
}

/// Scalar semantics of a unary operator on integer elements
///
/// Floating-point-only operators are rejected before execution and leave
/// the value unchanged here.
#[inline]
pub(crate) fn int_unary<I: PrimInt + WrappingNeg + WrappingMul + Element>(op: UnaryOp, x: I) -> I {
    match op {
        UnaryOp::Abs => {
            if x < <I as Element>::zero() {
                x.wrapping_neg()
            } else {
                x
            }
        }
        UnaryOp::Neg => x.wrapping_neg(),
        UnaryOp::Sqr => x.wrapping_mul(&x),
        UnaryOp::Clamp { min, max } => clamp(x, I::from_f64(min), I::from_f64(max)),
        UnaryOp::Fill(v) => I::from_f64(v),
        _ => x,
    }
}

#[inline]
fn clamp<T: PartialOrd>(x: T, min: T, max: T) -> T {
    if x < min {
        min
    } else if x > max {
        max
    } else {
        x
    }
}
