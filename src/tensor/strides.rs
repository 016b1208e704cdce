//! Strides type: element offsets for tensor memory layout

use super::Order;
use super::shape::STACK_DIMS;
use smallvec::SmallVec;
use std::fmt;
use std::iter::FromIterator;
use std::ops::Deref;

/// Strides type: element offsets between consecutive elements along each dimension
/// Signed to support negative strides (reversed views) and zero strides
/// (broadcast axes).
/// NOTE: Strides are in ELEMENTS, not bytes
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Strides(SmallVec<[isize; STACK_DIMS]>);

impl Strides {
    /// Canonical dense strides for `dims` in C or F order
    ///
    /// `Any` and `Storage` have no canonical pattern of their own and are
    /// treated as C.
    pub fn dense(dims: &[usize], order: Order) -> Self {
        let mut strides: SmallVec<[isize; STACK_DIMS]> = SmallVec::from_elem(0, dims.len());
        let mut stride = 1isize;
        if order.is_f() {
            for (s, &d) in strides.iter_mut().zip(dims.iter()) {
                *s = stride;
                stride = stride.saturating_mul(d as isize);
            }
        } else {
            for (s, &d) in strides.iter_mut().zip(dims.iter()).rev() {
                *s = stride;
                stride = stride.saturating_mul(d as isize);
            }
        }
        Self(strides)
    }

    /// View strides as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[isize] {
        self.0.as_slice()
    }

    /// Number of stride entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this stride vector is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Deref for Strides {
    type Target = [isize];

    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

impl fmt::Debug for Strides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<[isize]> for Strides {
    fn as_ref(&self) -> &[isize] {
        self.0.as_slice()
    }
}

impl From<Vec<isize>> for Strides {
    fn from(value: Vec<isize>) -> Self {
        Self(value.into_iter().collect())
    }
}

impl From<&[isize]> for Strides {
    fn from(value: &[isize]) -> Self {
        Self(value.iter().copied().collect())
    }
}

impl<const N: usize> From<[isize; N]> for Strides {
    fn from(value: [isize; N]) -> Self {
        Self(value.into_iter().collect())
    }
}

impl FromIterator<isize> for Strides {
    fn from_iter<T: IntoIterator<Item = isize>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
