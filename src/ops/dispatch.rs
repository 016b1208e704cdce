//! Execution path selection for element-wise and reduction operators
//!
//! Every operator call walks the same decision tree before touching data:
//!
//! 1. floating-point-only operator on an integer dtype: fail
//! 2. storage without lane access: generic scalar path
//! 3. unit step: vectorized unit-stride path
//! 4. positive non-unit step: vectorized gather/scatter path
//! 5. anything else (zero or negative step): generic scalar path

use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::tensor::{Layout, Storage};
use tracing::trace;

/// Execution strategy for one operator call
///
/// Ordered from least to most specialized, so the path shared by two
/// operands is their minimum.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExecPath {
    /// One element at a time through storage accessors
    Generic,
    /// Lane kernels over gathered constant-step runs
    VectorStride,
    /// Lane kernels over contiguous runs plus a scalar tail
    VectorUnit,
}

/// Pick the execution path for `storage` traversed with run step `step`
pub fn select_path<T: Element>(
    op: &'static str,
    fp_only: bool,
    storage: &Storage<T>,
    step: isize,
) -> Result<ExecPath> {
    if fp_only && !T::DTYPE.is_float() {
        return Err(Error::not_available(
            op,
            T::DTYPE,
            "defined only for floating point elements",
        ));
    }
    let path = if !storage.supports_vectorization() {
        ExecPath::Generic
    } else if step == 1 {
        ExecPath::VectorUnit
    } else if step > 1 {
        ExecPath::VectorStride
    } else {
        ExecPath::Generic
    };
    trace!(op, dtype = %T::DTYPE, step, ?path, "selected execution path");
    Ok(path)
}

/// Reject in-place writes through a layout whose indices share pointers
///
/// A stride-0 axis would apply a non-idempotent operator several times to
/// the same element.
pub(crate) fn check_writable(op: &'static str, layout: &Layout) -> Result<()> {
    if layout.is_broadcast() {
        return Err(Error::invalid_argument(
            "target",
            format!("'{op}' cannot write through a broadcast view {:?}", layout.shape().as_slice()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::DType;
    use crate::engine::VecColumn;

    #[test]
    fn test_fp_only_on_integers_fails() {
        let s = Storage::<i32>::zeros(4).unwrap();
        let err = select_path("exp", true, &s, 1).unwrap_err();
        assert!(matches!(
            err,
            Error::OperationNotAvailable {
                op: "exp",
                dtype: DType::I32,
                ..
            }
        ));
        assert_eq!(select_path("abs", false, &s, 1).unwrap(), ExecPath::VectorUnit);
    }

    #[test]
    fn test_step_decides_vector_path() {
        let s = Storage::<f64>::zeros(4).unwrap();
        assert_eq!(select_path("abs", false, &s, 1).unwrap(), ExecPath::VectorUnit);
        assert_eq!(select_path("abs", false, &s, 3).unwrap(), ExecPath::VectorStride);
        assert_eq!(select_path("abs", false, &s, 0).unwrap(), ExecPath::Generic);
        assert_eq!(select_path("abs", false, &s, -1).unwrap(), ExecPath::Generic);
    }

    #[test]
    fn test_column_storage_is_generic() {
        let s = Storage::<f64>::from_column(Box::new(VecColumn::zeros(DType::F64, 4)));
        assert_eq!(select_path("abs", false, &s, 1).unwrap(), ExecPath::Generic);
    }

    #[test]
    fn test_shared_path_is_minimum() {
        assert_eq!(
            ExecPath::VectorUnit.min(ExecPath::VectorStride),
            ExecPath::VectorStride
        );
        assert_eq!(ExecPath::Generic.min(ExecPath::VectorUnit), ExecPath::Generic);
    }
}
