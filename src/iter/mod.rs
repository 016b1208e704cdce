//! Single-pass cursors over tensor layouts
//!
//! - [`PointerIter`] yields flat storage pointers in a traversal order and
//!   picks the dense fast path when the order matches the layout.
//! - [`ChunkIterator`] yields maximal constant-step runs for batched kernels.
//! - [`IndexIterator`] yields multi-indices.
//!
//! All cursors are single-pass and are not meant to be shared across threads.

mod chunk;
mod pointer;

pub use chunk::{Chunk, ChunkIterator};
pub use pointer::{
    DensePointerIterator, PointerIter, PointerIterator, ScalarPointerIterator,
    StridePointerIterator,
};

use crate::tensor::{Layout, Order, Shape};
use std::iter::FusedIterator;

impl Layout {
    /// Pointer iterator for this layout (see [`PointerIter::new`])
    pub fn ptr_iter(&self, order: Order, irregular: Order) -> PointerIter {
        PointerIter::new(self, order, irregular)
    }

    /// Chunk iterator for this layout (see [`ChunkIterator::new`])
    pub fn chunk_iter(&self, order: Order, irregular: Order) -> ChunkIterator {
        ChunkIterator::new(self, order, irregular)
    }
}

/// Multi-indices of a shape in C or F order
#[derive(Debug, Clone)]
pub struct IndexIterator {
    dims: Vec<usize>,
    current: Vec<usize>,
    f_order: bool,
    remaining: usize,
}

impl IndexIterator {
    /// `Any` and `Storage` walk in C order: a bare shape has no strides
    pub fn new(shape: &Shape, order: Order) -> Self {
        Self {
            dims: shape.to_vec(),
            current: vec![0; shape.rank()],
            f_order: order.is_f(),
            remaining: shape.size(),
        }
    }

    fn advance(&mut self) {
        let rank = self.dims.len();
        for k in 0..rank {
            let axis = if self.f_order { k } else { rank - 1 - k };
            self.current[axis] += 1;
            if self.current[axis] < self.dims[axis] {
                return;
            }
            self.current[axis] = 0;
        }
    }
}

impl Iterator for IndexIterator {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.remaining == 0 {
            return None;
        }
        let idx = self.current.clone();
        self.remaining -= 1;
        if self.remaining > 0 {
            self.advance();
        }
        Some(idx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for IndexIterator {}
impl FusedIterator for IndexIterator {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_iterator_orders() {
        let shape = Shape::from([2, 2]);
        let c: Vec<_> = IndexIterator::new(&shape, Order::C).collect();
        assert_eq!(c, vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]);
        let f: Vec<_> = IndexIterator::new(&shape, Order::F).collect();
        assert_eq!(f, vec![vec![0, 0], vec![1, 0], vec![0, 1], vec![1, 1]]);
    }

    #[test]
    fn test_index_iterator_agrees_with_shape_index() {
        let shape = Shape::from([3, 1, 4]);
        for order in [Order::C, Order::F] {
            for (pos, idx) in IndexIterator::new(&shape, order).enumerate() {
                assert_eq!(shape.index(order, pos).unwrap(), idx);
            }
        }
    }

    #[test]
    fn test_index_iterator_scalar_and_empty() {
        let scalar: Vec<_> = IndexIterator::new(&Shape::scalar(), Order::C).collect();
        assert_eq!(scalar, vec![Vec::<usize>::new()]);
        assert_eq!(IndexIterator::new(&Shape::from([2, 0]), Order::C).count(), 0);
    }
}
