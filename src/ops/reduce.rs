//! Reduction operator catalog and shape helpers

use crate::dtype::Element;
use crate::error::{Error, Result};

/// Reduction operation kind
///
/// Plain variants propagate NaN through the fold; `Nan*` variants skip NaN
/// elements and return the identity when every element is skipped. On
/// integer elements the `Nan*` variants behave like the plain ones.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ReduceOp {
    /// Sum of elements (identity 0)
    Sum,
    /// Product of elements (identity 1)
    Prod,
    /// Minimum element (identity +inf / type max)
    Min,
    /// Maximum element (identity -inf / type min)
    Max,
    /// Arithmetic mean; NaN for an empty set
    Mean,
    /// Variance with `ddof` delta degrees of freedom; NaN when `n <= ddof`
    Var {
        /// Delta degrees of freedom (0 population, 1 sample)
        ddof: usize,
    },
    /// Sum skipping NaN
    NanSum,
    /// Product skipping NaN
    NanProd,
    /// Minimum skipping NaN
    NanMin,
    /// Maximum skipping NaN
    NanMax,
    /// Mean of the non-NaN elements
    NanMean,
}

impl ReduceOp {
    /// Whether the reduction is defined only for floating point elements
    pub const fn is_fp_only(self) -> bool {
        matches!(self, ReduceOp::Mean | ReduceOp::Var { .. } | ReduceOp::NanMean)
    }

    /// Whether NaN elements are skipped
    pub const fn skips_nan(self) -> bool {
        matches!(
            self,
            ReduceOp::NanSum
                | ReduceOp::NanProd
                | ReduceOp::NanMin
                | ReduceOp::NanMax
                | ReduceOp::NanMean
        )
    }

    /// Operator name for errors and tracing
    pub const fn name(self) -> &'static str {
        match self {
            ReduceOp::Sum => "sum",
            ReduceOp::Prod => "prod",
            ReduceOp::Min => "min",
            ReduceOp::Max => "max",
            ReduceOp::Mean => "mean",
            ReduceOp::Var { .. } => "var",
            ReduceOp::NanSum => "nansum",
            ReduceOp::NanProd => "nanprod",
            ReduceOp::NanMin => "nanmin",
            ReduceOp::NanMax => "nanmax",
            ReduceOp::NanMean => "nanmean",
        }
    }

    /// The associative fold underneath this reduction
    ///
    /// Mean and variance are built from sums; the rest fold directly.
    pub(crate) const fn fold(self) -> Fold {
        match self {
            ReduceOp::Sum | ReduceOp::Mean | ReduceOp::Var { .. } => Fold::Sum,
            ReduceOp::NanSum | ReduceOp::NanMean => Fold::NanSum,
            ReduceOp::Prod => Fold::Prod,
            ReduceOp::NanProd => Fold::NanProd,
            ReduceOp::Min => Fold::Min,
            ReduceOp::NanMin => Fold::NanMin,
            ReduceOp::Max => Fold::Max,
            ReduceOp::NanMax => Fold::NanMax,
        }
    }

    /// Value of the reduction over an empty set
    pub fn identity<T: Element>(self) -> T {
        match self {
            ReduceOp::Mean | ReduceOp::Var { .. } | ReduceOp::NanMean => T::from_f64(f64::NAN),
            _ => self.fold().identity(),
        }
    }
}

/// Associative, commutative combine with an identity
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Fold {
    Sum,
    NanSum,
    Prod,
    NanProd,
    Min,
    NanMin,
    Max,
    NanMax,
}

impl Fold {
    #[inline]
    pub(crate) fn identity<T: Element>(self) -> T {
        match self {
            Fold::Sum | Fold::NanSum => T::zero(),
            Fold::Prod | Fold::NanProd => T::one(),
            Fold::Min | Fold::NanMin => T::highest(),
            Fold::Max | Fold::NanMax => T::lowest(),
        }
    }

    #[inline]
    pub(crate) fn skips_nan(self) -> bool {
        matches!(
            self,
            Fold::NanSum | Fold::NanProd | Fold::NanMin | Fold::NanMax
        )
    }

    /// Fold one element into the accumulator
    #[inline]
    pub(crate) fn step<T: Element>(self, acc: T, x: T) -> T {
        if self.skips_nan() && x.is_nan() {
            return acc;
        }
        self.combine(acc, x)
    }

    /// Merge two partial results
    #[inline]
    pub(crate) fn combine<T: Element>(self, a: T, b: T) -> T {
        match self {
            Fold::Sum | Fold::NanSum => a.add_elem(b),
            Fold::Prod | Fold::NanProd => a.mul_elem(b),
            Fold::Min | Fold::NanMin => a.min_elem(b),
            Fold::Max | Fold::NanMax => a.max_elem(b),
        }
    }
}

/// Compute output shape for reduction
///
/// # Arguments
/// * `input_shape` - Shape of input tensor
/// * `axes` - Axes to reduce over
/// * `keep_dims` - If true, keep reduced axes as size 1
pub fn reduce_output_shape(input_shape: &[usize], axes: &[usize], keep_dims: bool) -> Vec<usize> {
    if keep_dims {
        input_shape
            .iter()
            .enumerate()
            .map(|(i, &s)| if axes.contains(&i) { 1 } else { s })
            .collect()
    } else {
        input_shape
            .iter()
            .enumerate()
            .filter(|(i, _)| !axes.contains(i))
            .map(|(_, &s)| s)
            .collect()
    }
}

/// Validate reduction axes, returning them sorted and deduplicated
pub fn normalize_axes(rank: usize, axes: &[usize]) -> Result<Vec<usize>> {
    let mut out = axes.to_vec();
    if let Some(&bad) = out.iter().find(|&&a| a >= rank) {
        return Err(Error::invalid_axis(bad as isize, rank));
    }
    out.sort_unstable();
    out.dedup();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduce_output_shape() {
        assert_eq!(reduce_output_shape(&[2, 3, 4], &[1], false), vec![2, 4]);
        assert_eq!(reduce_output_shape(&[2, 3, 4], &[1], true), vec![2, 1, 4]);
        assert_eq!(reduce_output_shape(&[2, 3, 4], &[0, 1, 2], false), Vec::<usize>::new());
    }

    #[test]
    fn test_normalize_axes() {
        assert_eq!(normalize_axes(3, &[2, 0, 2]).unwrap(), vec![0, 2]);
        assert!(matches!(
            normalize_axes(2, &[2]),
            Err(Error::InvalidAxis { axis: 2, rank: 2 })
        ));
    }

    #[test]
    fn test_identities() {
        assert_eq!(ReduceOp::Sum.identity::<f64>(), 0.0);
        assert_eq!(ReduceOp::Prod.identity::<i32>(), 1);
        assert_eq!(ReduceOp::Min.identity::<f32>(), f32::INFINITY);
        assert_eq!(ReduceOp::Max.identity::<i8>(), i8::MIN);
        assert!(ReduceOp::Mean.identity::<f64>().is_nan());
    }

    #[test]
    fn test_fold_step_skips_nan() {
        assert_eq!(Fold::NanSum.step(1.0f64, f64::NAN), 1.0);
        assert!(Fold::Sum.step(1.0f64, f64::NAN).is_nan());
        assert!(Fold::Max.step(1.0f32, f32::NAN).is_nan());
        assert_eq!(Fold::NanMax.step(1.0f32, f32::NAN), 1.0);
    }

    #[test]
    fn test_fp_only() {
        assert!(ReduceOp::Mean.is_fp_only());
        assert!(ReduceOp::Var { ddof: 1 }.is_fp_only());
        assert!(!ReduceOp::NanSum.is_fp_only());
    }
}
