//! Pointer iterators: flat storage pointers in a traversal order

use crate::tensor::{Layout, Order, STACK_DIMS};
use smallvec::SmallVec;
use std::iter::FusedIterator;

/// Single-pass cursor over the storage pointers of a layout
///
/// Every pointer of the layout is produced exactly once. `position()` is the
/// number of pointers already yielded, i.e. the flat index (in the
/// iterator's traversal order) of the next pointer.
pub trait PointerIterator: Iterator<Item = usize> {
    /// Number of pointers already yielded
    fn position(&self) -> usize;
}

/// Iterator for rank-0 layouts: one pointer
#[derive(Debug, Clone)]
pub struct ScalarPointerIterator {
    offset: usize,
    done: bool,
}

impl ScalarPointerIterator {
    /// Create over a scalar at `offset`
    pub fn new(offset: usize) -> Self {
        Self {
            offset,
            done: false,
        }
    }
}

impl Iterator for ScalarPointerIterator {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.done {
            return None;
        }
        self.done = true;
        Some(self.offset)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = usize::from(!self.done);
        (n, Some(n))
    }
}

impl PointerIterator for ScalarPointerIterator {
    fn position(&self) -> usize {
        usize::from(self.done)
    }
}

/// Arithmetic sequence `offset, offset + step, ...` of `size` pointers
///
/// Valid when the requested order matches the layout's dense order, in which
/// case the whole tensor is one constant-step run.
#[derive(Debug, Clone)]
pub struct DensePointerIterator {
    pointer: isize,
    step: isize,
    size: usize,
    position: usize,
}

impl DensePointerIterator {
    /// Create a dense walk of `size` pointers
    pub fn new(offset: usize, step: isize, size: usize) -> Self {
        Self {
            pointer: offset as isize,
            step,
            size,
            position: 0,
        }
    }
}

impl Iterator for DensePointerIterator {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.position >= self.size {
            return None;
        }
        let p = self.pointer;
        self.position += 1;
        self.pointer += self.step;
        Some(p as usize)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.size - self.position;
        (n, Some(n))
    }
}

impl PointerIterator for DensePointerIterator {
    fn position(&self) -> usize {
        self.position
    }
}

/// Odometer over fastest-first axes
///
/// Axis 0 turns every step; a wrap resets it and carries into axis 1.
#[derive(Debug, Clone)]
pub(crate) struct Odometer {
    dims: SmallVec<[usize; STACK_DIMS]>,
    strides: SmallVec<[isize; STACK_DIMS]>,
    counters: SmallVec<[usize; STACK_DIMS]>,
    pointer: isize,
    size: usize,
    position: usize,
}

impl Odometer {
    /// `compact` must be in fastest-first form
    pub(crate) fn new(compact: &Layout) -> Self {
        let rank = compact.rank();
        Self {
            dims: compact.shape().iter().copied().collect(),
            strides: compact.strides().iter().copied().collect(),
            counters: smallvec::smallvec![0; rank],
            pointer: compact.offset() as isize,
            size: compact.size(),
            position: 0,
        }
    }

    /// Walk only the axes after the first, starting from `compact.offset()`
    pub(crate) fn outer(compact: &Layout) -> Self {
        let mut odo = Self::new(compact);
        if !odo.dims.is_empty() {
            odo.dims.remove(0);
            odo.strides.remove(0);
            odo.counters.remove(0);
            odo.size = if compact.size() == 0 {
                0
            } else {
                odo.dims.iter().product()
            };
        }
        odo
    }

    #[inline]
    pub(crate) fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.size - self.position
    }

    #[inline]
    fn advance(&mut self) {
        for k in 0..self.dims.len() {
            self.counters[k] += 1;
            self.pointer += self.strides[k];
            if self.counters[k] < self.dims[k] {
                return;
            }
            self.pointer -= self.dims[k] as isize * self.strides[k];
            self.counters[k] = 0;
        }
    }
}

impl Iterator for Odometer {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.position >= self.size {
            return None;
        }
        let p = self.pointer;
        self.position += 1;
        if self.position < self.size {
            self.advance();
        }
        Some(p as usize)
    }
}

/// General walk for any layout and any explicit order
///
/// Axes are reordered fastest-first for the requested order and chained
/// axes merged, then walked as an odometer: amortized O(1) per pointer,
/// O(rank) on a full carry cascade.
#[derive(Debug, Clone)]
pub struct StridePointerIterator {
    odometer: Odometer,
}

impl StridePointerIterator {
    /// Walk `layout` in `order` (`Any` falls back to storage order)
    pub fn new(layout: &Layout, order: Order) -> Self {
        let order = layout.resolve_order(order, Order::Storage);
        Self {
            odometer: Odometer::new(&layout.compute_compact_layout(order, true)),
        }
    }
}

impl Iterator for StridePointerIterator {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        self.odometer.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.odometer.remaining();
        (n, Some(n))
    }
}

impl PointerIterator for StridePointerIterator {
    fn position(&self) -> usize {
        self.odometer.position()
    }
}

/// The pointer iterator chosen for a layout and order
#[derive(Debug, Clone)]
pub enum PointerIter {
    /// Rank-0 layout
    Scalar(ScalarPointerIterator),
    /// Requested order matches the dense order of the layout
    Dense(DensePointerIterator),
    /// Everything else
    Stride(StridePointerIterator),
}

impl PointerIter {
    /// Pick the cheapest iterator that visits `layout` in `order`
    ///
    /// `order` is resolved first (`Any` becomes the layout's fast order, or
    /// `irregular` when the layout is neither C nor F). A C-ordered layout
    /// walked in anything but F, and an F-ordered layout walked in anything
    /// but C, is a single constant-step sequence.
    pub fn new(layout: &Layout, order: Order, irregular: Order) -> Self {
        let rank = layout.rank();
        if rank == 0 {
            return PointerIter::Scalar(ScalarPointerIterator::new(layout.offset()));
        }
        let order = layout.resolve_order(order, irregular);
        if layout.is_c_ordered() && order != Order::F {
            return PointerIter::Dense(DensePointerIterator::new(
                layout.offset(),
                layout.stride(rank - 1),
                layout.size(),
            ));
        }
        if layout.is_f_ordered() && order != Order::C {
            return PointerIter::Dense(DensePointerIterator::new(
                layout.offset(),
                layout.stride(0),
                layout.size(),
            ));
        }
        PointerIter::Stride(StridePointerIterator::new(layout, order))
    }

    /// Whether the dense fast path was selected
    pub fn is_dense(&self) -> bool {
        !matches!(self, PointerIter::Stride(_))
    }
}

impl Iterator for PointerIter {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        match self {
            PointerIter::Scalar(it) => it.next(),
            PointerIter::Dense(it) => it.next(),
            PointerIter::Stride(it) => it.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            PointerIter::Scalar(it) => it.size_hint(),
            PointerIter::Dense(it) => it.size_hint(),
            PointerIter::Stride(it) => it.size_hint(),
        }
    }
}

impl PointerIterator for PointerIter {
    fn position(&self) -> usize {
        match self {
            PointerIter::Scalar(it) => it.position(),
            PointerIter::Dense(it) => it.position(),
            PointerIter::Stride(it) => it.position(),
        }
    }
}

impl ExactSizeIterator for ScalarPointerIterator {}
impl ExactSizeIterator for DensePointerIterator {}
impl ExactSizeIterator for StridePointerIterator {}
impl ExactSizeIterator for PointerIter {}
impl FusedIterator for ScalarPointerIterator {}
impl FusedIterator for DensePointerIterator {}
impl FusedIterator for StridePointerIterator {}
impl FusedIterator for PointerIter {}
