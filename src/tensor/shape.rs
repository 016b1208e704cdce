//! Shape type: dimensions of a tensor

use super::Order;
use crate::error::{Error, Result};
use smallvec::SmallVec;
use std::fmt;
use std::iter::FromIterator;
use std::ops::Deref;

/// Stack allocation threshold for dimensions
/// Most tensors have 4 or fewer dimensions, so we stack-allocate up to 4
pub(crate) const STACK_DIMS: usize = 4;

/// Shape type: immutable dimensions of a tensor
///
/// `size()` is the product of all extents (1 for rank 0). A shape never
/// changes after construction; shape transforms build a new one.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Shape(SmallVec<[usize; STACK_DIMS]>);

impl Shape {
    /// Create a shape from signed extents, rejecting negative ones
    pub fn new(dims: &[isize]) -> Result<Self> {
        if dims.iter().any(|&d| d < 0) {
            return Err(Error::InvalidShape {
                shape: dims.to_vec(),
                reason: "extents must be non-negative".into(),
            });
        }
        Ok(Self(dims.iter().map(|&d| d as usize).collect()))
    }

    /// Rank-0 shape
    pub fn scalar() -> Self {
        Self(SmallVec::new())
    }

    /// View shape as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        self.0.as_slice()
    }

    /// Number of dimensions in this shape.
    #[inline]
    pub fn rank(&self) -> usize {
        self.0.len()
    }

    /// Total number of elements
    ///
    /// Saturates at `usize::MAX` for extents whose product does not fit;
    /// [`Shape::checked_size`] reports that case as an error instead.
    #[inline]
    pub fn size(&self) -> usize {
        self.0.iter().fold(1usize, |acc, &d| acc.saturating_mul(d))
    }

    /// Total number of elements, failing when the product overflows `usize`
    pub fn checked_size(&self) -> Result<usize> {
        if self.0.contains(&0) {
            return Ok(0);
        }
        self.0
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .ok_or_else(|| Error::invalid_shape(self.as_slice(), "element count overflows usize"))
    }

    /// Extent of one axis
    #[inline]
    pub fn dim(&self, axis: usize) -> usize {
        self.0[axis]
    }

    /// Number of axes with extent 1
    pub fn unit_dim_count(&self) -> usize {
        self.0.iter().filter(|&&d| d == 1).count()
    }

    /// Dimensions with one axis removed
    pub fn narrow_dims(&self, axis: usize) -> Shape {
        self.0
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != axis)
            .map(|(_, &d)| d)
            .collect()
    }

    /// Multi-index of the element at flat position `pos` in the given order
    ///
    /// Bare shapes have no strides, so `Any` and `Storage` resolve to C.
    pub fn index(&self, order: Order, pos: usize) -> Result<Vec<usize>> {
        if pos >= self.size() {
            return Err(Error::out_of_range(&[pos], self.as_slice()));
        }
        let mut idx = vec![0; self.rank()];
        let mut rem = pos;
        if order.is_f() {
            for (i, &d) in self.0.iter().enumerate() {
                idx[i] = rem % d;
                rem /= d;
            }
        } else {
            for (i, &d) in self.0.iter().enumerate().rev() {
                idx[i] = rem % d;
                rem /= d;
            }
        }
        Ok(idx)
    }

    /// Flat position of a multi-index in the given order
    ///
    /// Inverse of [`Shape::index`].
    pub fn position(&self, order: Order, idx: &[usize]) -> Result<usize> {
        if idx.len() != self.rank() || idx.iter().zip(self.0.iter()).any(|(&i, &d)| i >= d) {
            return Err(Error::out_of_range(idx, self.as_slice()));
        }
        let mut pos = 0;
        if order.is_f() {
            for (&i, &d) in idx.iter().zip(self.0.iter()).rev() {
                pos = pos * d + i;
            }
        } else {
            for (&i, &d) in idx.iter().zip(self.0.iter()) {
                pos = pos * d + i;
            }
        }
        Ok(pos)
    }
}

impl Deref for Shape {
    type Target = [usize];

    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0.as_slice())
    }
}

impl AsRef<[usize]> for Shape {
    fn as_ref(&self) -> &[usize] {
        self.0.as_slice()
    }
}

impl From<Vec<usize>> for Shape {
    fn from(value: Vec<usize>) -> Self {
        Self(value.into_iter().collect())
    }
}

impl From<&[usize]> for Shape {
    fn from(value: &[usize]) -> Self {
        Self(value.iter().copied().collect())
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(value: [usize; N]) -> Self {
        Self(value.into_iter().collect())
    }
}

impl FromIterator<usize> for Shape {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
