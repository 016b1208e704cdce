//! Chunk iterator: maximal constant-step runs of storage pointers

use super::pointer::Odometer;
use crate::tensor::{Layout, Order};
use std::iter::FusedIterator;

/// A run of `len` pointers `start, start + step, ...`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// First pointer of the run
    pub start: usize,
    /// Number of elements in the run
    pub len: usize,
    /// Pointer delta between consecutive elements
    pub step: isize,
}

impl Chunk {
    /// Pointer of the `k`-th element of the run
    #[inline]
    pub fn pointer(&self, k: usize) -> usize {
        (self.start as isize + k as isize * self.step) as usize
    }

    /// Iterate the pointers of this run
    pub fn pointers(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).map(move |k| self.pointer(k))
    }
}

/// Single-pass cursor over the runs of a layout
///
/// The layout is reordered fastest-first for the requested order and its
/// chained axes merged; the fastest merged axis becomes the run and the
/// remaining axes are walked as an odometer over run starts. Concatenating
/// the runs in emission order visits every element once, in the same order
/// as the pointer iterator for that order.
#[derive(Debug, Clone)]
pub struct ChunkIterator {
    starts: Odometer,
    len: usize,
    step: isize,
}

impl ChunkIterator {
    /// Chunk `layout` in `order` (`Any` resolves against the layout,
    /// irregular layouts fall back to `irregular`)
    pub fn new(layout: &Layout, order: Order, irregular: Order) -> Self {
        if layout.rank() == 0 {
            return Self {
                starts: Odometer::new(layout),
                len: 1,
                step: 1,
            };
        }
        let order = layout.resolve_order(order, irregular);
        let compact = layout.compute_compact_layout(order, true);
        Self {
            starts: Odometer::outer(&compact),
            len: compact.dim(0),
            step: compact.stride(0),
        }
    }

    /// Length of every run
    #[inline]
    pub fn chunk_len(&self) -> usize {
        self.len
    }

    /// Step shared by every run
    #[inline]
    pub fn chunk_step(&self) -> isize {
        self.step
    }

    /// Number of runs not yet emitted
    #[inline]
    pub fn remaining(&self) -> usize {
        if self.len == 0 {
            0
        } else {
            self.starts.remaining()
        }
    }
}

impl Iterator for ChunkIterator {
    type Item = Chunk;

    #[inline]
    fn next(&mut self) -> Option<Chunk> {
        if self.len == 0 {
            return None;
        }
        self.starts.next().map(|start| Chunk {
            start,
            len: self.len,
            step: self.step,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for ChunkIterator {}
impl FusedIterator for ChunkIterator {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iter::PointerIter;
    use crate::tensor::{Shape, Strides};

    fn flatten(it: ChunkIterator) -> Vec<usize> {
        it.flat_map(|c| c.pointers().collect::<Vec<_>>()).collect()
    }

    #[test]
    fn test_scalar_chunk() {
        let chunks: Vec<_> = ChunkIterator::new(&Layout::scalar(4), Order::C, Order::C).collect();
        assert_eq!(
            chunks,
            vec![Chunk {
                start: 4,
                len: 1,
                step: 1
            }]
        );
    }

    #[test]
    fn test_dense_is_one_chunk() {
        let l = Layout::dense(Shape::from([2, 3, 4]), 5, Order::C);
        let chunks: Vec<_> = ChunkIterator::new(&l, Order::C, Order::C).collect();
        assert_eq!(chunks.len(), 1);
        assert_eq!(
            chunks[0],
            Chunk {
                start: 5,
                len: 24,
                step: 1
            }
        );
    }

    #[test]
    fn test_transposed_chunks() {
        let l = Layout::dense(Shape::from([2, 3]), 0, Order::C).revert();
        let it = ChunkIterator::new(&l, Order::C, Order::C);
        assert_eq!(it.chunk_len(), 2);
        assert_eq!(it.chunk_step(), 3);
        assert_eq!(it.len(), 3);
        assert_eq!(flatten(it), vec![0, 3, 1, 4, 2, 5]);
    }

    #[test]
    fn test_matches_pointer_iterator() {
        let l = Layout::new(Shape::from([3, 2, 4]), 2, Strides::from([1, 30, 3])).unwrap();
        for order in [Order::C, Order::F, Order::Storage, Order::Any] {
            let chunks = flatten(ChunkIterator::new(&l, order, Order::Storage));
            let ptrs: Vec<_> = PointerIter::new(&l, order, Order::Storage).collect();
            assert_eq!(chunks, ptrs, "order {order}");
        }
    }

    #[test]
    fn test_negative_stride_chunks() {
        let l = Layout::new(Shape::from([2, 5]), 9, Strides::from([-5, -1])).unwrap();
        let chunks: Vec<_> = ChunkIterator::new(&l, Order::C, Order::C).collect();
        assert!(chunks.iter().all(|c| c.step < 0));
        let mut ptrs: Vec<_> = chunks.iter().flat_map(|c| c.pointers().collect::<Vec<_>>()).collect();
        assert_eq!(ptrs.len(), 10);
        ptrs.sort_unstable();
        assert_eq!(ptrs, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_zero_size_has_no_chunks() {
        let l = Layout::dense(Shape::from([3, 0]), 0, Order::C);
        assert_eq!(ChunkIterator::new(&l, Order::C, Order::C).count(), 0);
        let l = Layout::dense(Shape::from([0, 3]), 0, Order::C);
        assert_eq!(ChunkIterator::new(&l, Order::C, Order::C).count(), 0);
    }
}
