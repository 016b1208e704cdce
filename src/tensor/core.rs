//! Core Tensor type

use super::{Layout, Order, Shape, Storage};
use crate::dtype::{DType, Element};
use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::iter::{ChunkIterator, PointerIter};
use crate::ops::{self, BinaryOp, ReduceOp, UnaryOp};
use std::fmt;
use std::iter::FusedIterator;
use tracing::trace;

/// N-dimensional strided view over a shared storage
///
/// `Tensor` is the fundamental data structure in ndstride. It consists of:
/// - **Engine**: the factory that created it, with its configuration
/// - **Layout**: shape, strides and offset defining the view into storage
/// - **Storage**: reference-counted flat buffer of `T`
///
/// # Zero-Copy Views
///
/// `transpose`, `move_axis`, `swap_axis`, `permute`, `squeeze`, `narrow`,
/// `expand`, `broadcast_to` and `Clone` only build a new layout over the
/// same storage. Writes through one view are visible through every other
/// view of that storage. Mutating methods take `&self` for that reason;
/// the engine does no locking, so concurrent writes into one storage must
/// target disjoint elements.
///
/// # Example
///
/// ```
/// use ndstride::prelude::*;
///
/// let t = Engine::array().seq::<i32>(&[2, 3], Order::C)?;
/// let v = t.transpose();
/// v.set(10, &[2, 0])?;
/// assert_eq!(t.get(&[0, 2])?, 10);
/// assert!(v.shares_storage(&t));
/// # Ok::<(), ndstride::error::Error>(())
/// ```
pub struct Tensor<T: Element> {
    engine: Engine,
    layout: Layout,
    storage: Storage<T>,
}

impl<T: Element> Tensor<T> {
    /// Bind a layout to a storage; every layout pointer must be in bounds
    pub(crate) fn from_parts(engine: Engine, layout: Layout, storage: Storage<T>) -> Self {
        debug_assert!(layout
            .pointer_range()
            .is_none_or(|(lo, hi)| lo >= 0 && (hi as usize) < storage.len()));
        Self {
            engine,
            layout,
            storage,
        }
    }

    fn view(&self, layout: Layout) -> Self {
        Self {
            engine: self.engine,
            layout,
            storage: self.storage.clone(),
        }
    }

    // ===== Accessors =====

    /// Engine that created this tensor
    #[inline]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &Shape {
        self.layout.shape()
    }

    /// Get the layout
    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Get the underlying storage
    #[inline]
    pub fn storage(&self) -> &Storage<T> {
        &self.storage
    }

    /// Element type
    #[inline]
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    /// Total number of elements
    #[inline]
    pub fn size(&self) -> usize {
        self.layout.size()
    }

    /// Number of dimensions
    #[inline]
    pub fn rank(&self) -> usize {
        self.layout.rank()
    }

    /// Extent of one axis
    pub fn dim(&self, axis: usize) -> Result<usize> {
        if axis >= self.rank() {
            return Err(Error::invalid_axis(axis as isize, self.rank()));
        }
        Ok(self.layout.dim(axis))
    }

    fn irregular(&self) -> Order {
        self.engine.config().irregular_order
    }

    // ===== Element access =====

    /// Read the element at a multi-index
    pub fn get(&self, idx: &[usize]) -> Result<T> {
        Ok(self.storage.get(self.layout.pointer(idx)?))
    }

    /// Write the element at a multi-index
    pub fn set(&self, value: T, idx: &[usize]) -> Result<()> {
        self.storage.set(self.layout.pointer(idx)?, value);
        Ok(())
    }

    /// Add `value` to the element at a multi-index
    pub fn inc(&self, value: T, idx: &[usize]) -> Result<()> {
        self.storage.inc(self.layout.pointer(idx)?, value);
        Ok(())
    }

    /// Read by raw storage pointer (as yielded by [`Tensor::ptr_iter`])
    pub fn ptr_get(&self, p: usize) -> Result<T> {
        self.check_ptr(p)?;
        Ok(self.storage.get(p))
    }

    /// Write by raw storage pointer
    pub fn ptr_set(&self, p: usize, value: T) -> Result<()> {
        self.check_ptr(p)?;
        self.storage.set(p, value);
        Ok(())
    }

    fn check_ptr(&self, p: usize) -> Result<()> {
        if p >= self.storage.len() {
            return Err(Error::out_of_range(&[p], &[self.storage.len()]));
        }
        Ok(())
    }

    // ===== Iteration =====

    /// Element values in `order`
    pub fn iter(&self, order: Order) -> Values<'_, T> {
        Values {
            pointers: self.ptr_iter(order),
            storage: &self.storage,
        }
    }

    /// Storage pointers in `order`
    pub fn ptr_iter(&self, order: Order) -> PointerIter {
        self.layout.ptr_iter(order, self.irregular())
    }

    /// Constant-step runs of storage pointers in `order`
    pub fn chunk_iter(&self, order: Order) -> ChunkIterator {
        self.layout.chunk_iter(order, self.irregular())
    }

    /// Copy the elements out in `order`
    pub fn to_vec(&self, order: Order) -> Vec<T> {
        self.iter(order).collect()
    }

    // ===== In-place operators =====

    /// Apply a unary operator to every element
    pub fn unary_op(&self, op: UnaryOp) -> Result<()> {
        ops::unary_op(op, &self.layout, &self.storage, self.engine.config())
    }

    /// `self = self op other`, element-wise over equal shapes
    pub fn binary_op(&self, other: &Tensor<T>, op: BinaryOp) -> Result<()> {
        ops::binary_op(
            op,
            &self.layout,
            &self.storage,
            &other.layout,
            &other.storage,
            self.engine.config(),
        )
    }

    /// `self = self op s` for every element
    pub fn binary_scalar_op(&self, s: T, op: BinaryOp) -> Result<()> {
        ops::binary_scalar_op(op, &self.layout, &self.storage, s, self.engine.config())
    }

    /// Set every element to `value`
    ///
    /// Broadcast views are allowed: every shared element receives the same
    /// value.
    pub fn fill(&self, value: T) {
        let order = self.layout.resolve_order(Order::Any, self.irregular());
        match self.layout.pointer_range() {
            Some((lo, hi)) if self.layout.is_compact(order) => {
                self.storage.fill(lo as usize, hi as usize + 1, value)
            }
            _ => self.ptr_iter(Order::Any).for_each(|p| self.storage.set(p, value)),
        }
    }

    // ===== Reductions =====

    /// Reduce every element to one value
    pub fn reduce(&self, op: ReduceOp) -> Result<T> {
        ops::reduce(op, &self.layout, &self.storage, self.engine.config())
    }

    /// Reduce over `axes` into a new C-ordered tensor
    ///
    /// With `keep_dims` the reduced axes stay as extent 1.
    pub fn reduce_axes(&self, op: ReduceOp, axes: &[usize], keep_dims: bool) -> Result<Tensor<T>> {
        let axes = ops::normalize_axes(self.rank(), axes)?;
        let values = ops::reduce_axes(op, &self.layout, &self.storage, &axes, self.engine.config())?;
        let shape = ops::reduce_output_shape(self.shape(), &axes, keep_dims);
        self.engine.wrap(values, &shape, Order::C)
    }

    /// Position in `order` of the first largest element
    ///
    /// NaN elements are skipped. `None` when no element is comparable. Pass
    /// `C` or `F` to map the position back with [`Shape::index`].
    pub fn argmax(&self, order: Order) -> Option<usize> {
        self.arg_extreme(order, |v, best| v > best)
    }

    /// Position in `order` of the first smallest element, see [`Tensor::argmax`]
    pub fn argmin(&self, order: Order) -> Option<usize> {
        self.arg_extreme(order, |v, best| v < best)
    }

    fn arg_extreme(&self, order: Order, better: impl Fn(T, T) -> bool) -> Option<usize> {
        let mut best: Option<(usize, T)> = None;
        for (i, v) in self.iter(order).enumerate() {
            if v.is_nan() {
                continue;
            }
            match best {
                Some((_, b)) if !better(v, b) => {}
                _ => best = Some((i, v)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Number of NaN elements; always zero for integer tensors
    pub fn nan_count(&self) -> usize {
        self.iter(Order::Any).filter(|v| v.is_nan()).count()
    }

    /// Number of elements equal to zero
    pub fn zero_count(&self) -> usize {
        self.iter(Order::Any).filter(|&v| v == T::zero()).count()
    }

    // ===== Shape transforms =====

    /// Reshape, reading and writing elements in `order`
    ///
    /// At most one extent may be `-1`; it is inferred from the size. The
    /// result is a view when the elements already form one unit-stride
    /// block in `order`, otherwise a copy into fresh storage.
    pub fn reshape(&self, dims: &[isize], order: Order) -> Result<Tensor<T>> {
        let shape = infer_shape(dims, self.size())?;
        let order = self.layout.resolve_order(order, Order::C).auto_fc(Order::C);
        if self.layout.is_compact(order) {
            return Ok(self.view(Layout::dense(shape, self.layout.offset(), order)));
        }
        trace!(from = ?self.shape().as_slice(), to = ?shape.as_slice(), %order, "reshape copies");
        self.engine.wrap(self.to_vec(order), &shape, order)
    }

    /// One-dimensional view in `order`, or a flattened copy when the
    /// elements cannot be walked with a single stride
    pub fn ravel(&self, order: Order) -> Result<Tensor<T>> {
        let order = self.layout.resolve_order(order, Order::C).auto_fc(Order::C);
        let n = self.size();
        if n <= 1 {
            return Ok(self.view(Layout::dense(Shape::from([n]), self.layout.offset(), order)));
        }
        let compact = self.layout.compute_compact_layout(order, true);
        if compact.rank() == 1 {
            let layout = Layout::new(
                Shape::from([n]),
                self.layout.offset(),
                [compact.stride(0)].into(),
            )?;
            return Ok(self.view(layout));
        }
        trace!(shape = ?self.shape().as_slice(), %order, "ravel copies");
        self.flatten(order)
    }

    /// One-dimensional copy of the elements in `order`
    pub fn flatten(&self, order: Order) -> Result<Tensor<T>> {
        self.engine.wrap(self.to_vec(order), &[self.size()], Order::C)
    }

    /// Reverse the axes (view)
    pub fn transpose(&self) -> Tensor<T> {
        self.view(self.layout.revert())
    }

    /// Move axis `src` to position `dst` (view)
    pub fn move_axis(&self, src: usize, dst: usize) -> Result<Tensor<T>> {
        Ok(self.view(self.layout.move_axis(src, dst)?))
    }

    /// Swap two axes (view)
    pub fn swap_axis(&self, a: usize, b: usize) -> Result<Tensor<T>> {
        Ok(self.view(self.layout.swap_axis(a, b)?))
    }

    /// Reorder axes so that axis `k` of the result is axis `perm[k]` (view)
    pub fn permute(&self, perm: &[usize]) -> Result<Tensor<T>> {
        Ok(self.view(self.layout.permute(perm)?))
    }

    /// Drop every extent-1 axis (view)
    pub fn squeeze(&self) -> Tensor<T> {
        self.view(self.layout.squeeze())
    }

    /// Drop the listed extent-1 axes (view)
    pub fn squeeze_axes(&self, axes: &[usize]) -> Result<Tensor<T>> {
        Ok(self.view(self.layout.squeeze_axes(axes)?))
    }

    /// Insert extent-1 axes at the listed positions of the result (view)
    pub fn stretch(&self, axes: &[usize]) -> Result<Tensor<T>> {
        Ok(self.view(self.layout.stretch(axes)?))
    }

    /// Keep indices `start..end` of one axis (view)
    pub fn narrow(&self, axis: usize, start: usize, end: usize) -> Result<Tensor<T>> {
        Ok(self.view(self.layout.narrow(axis, start, end)?))
    }

    /// Repeat an extent-1 axis `size` times with stride 0 (read-only view)
    pub fn expand(&self, axis: usize, size: usize) -> Result<Tensor<T>> {
        Ok(self.view(self.layout.expand(axis, size)?))
    }

    /// Broadcast to `shape` with numpy rules (read-only view)
    pub fn broadcast_to(&self, shape: &[usize]) -> Result<Tensor<T>> {
        Ok(self.view(self.layout.broadcast_to(shape)?))
    }

    // ===== Copies =====

    /// Dense copy into fresh storage laid out in `order`
    ///
    /// `Any` keeps the natural order of this layout (C for irregular ones).
    pub fn copy(&self, order: Order) -> Result<Tensor<T>> {
        let order = self.layout.resolve_order(order, Order::C).auto_fc(Order::C);
        self.engine.wrap(self.to_vec(order), self.shape(), order)
    }

    /// Copy the elements of this tensor into `dst`, which must have the
    /// same shape
    pub fn copy_to(&self, dst: &Tensor<T>) -> Result<()> {
        if self.shape() != dst.shape() {
            return Err(Error::shape_mismatch(dst.shape(), self.shape()));
        }
        if dst.layout.is_broadcast() {
            return Err(Error::invalid_argument(
                "dst",
                "cannot copy into a broadcast view",
            ));
        }
        let src = self.to_vec(Order::C);
        for (p, v) in dst.ptr_iter(Order::C).zip(src) {
            dst.storage.set(p, v);
        }
        Ok(())
    }

    /// Element-wise conversion into fresh storage of another element type
    ///
    /// Values go through `f64` with native `as` semantics, so float to
    /// integer casts truncate toward zero and saturate.
    pub fn cast<U: Element>(&self, order: Order) -> Result<Tensor<U>> {
        let order = self.layout.resolve_order(order, Order::C).auto_fc(Order::C);
        let out = self.engine.zeros::<U>(self.shape(), order)?;
        let src = self.ptr_iter(Order::C);
        for (dst, p) in out.ptr_iter(Order::C).zip(src) {
            out.storage.set_as(dst, self.storage.get(p));
        }
        trace!(from = %T::DTYPE, to = %U::DTYPE, size = self.size(), "cast");
        Ok(out)
    }

    // ===== Selection and joins =====

    /// Copy the entries at `indices` of `axis`, in the listed order
    ///
    /// Indices may repeat. The result has the extent of `axis` replaced by
    /// `indices.len()` and is laid out in `order`.
    pub fn take(&self, axis: usize, indices: &[usize], order: Order) -> Result<Tensor<T>> {
        let dim = self.dim(axis)?;
        if let Some(&bad) = indices.iter().find(|&&i| i >= dim) {
            return Err(Error::out_of_range(&[bad], &[dim]));
        }
        let mut dims = self.shape().as_slice().to_vec();
        dims[axis] = indices.len();
        let out = self.engine.zeros::<T>(&dims, order)?;
        for (k, &i) in indices.iter().enumerate() {
            self.narrow(axis, i, i + 1)?.copy_to(&out.narrow(axis, k, k + 1)?)?;
        }
        Ok(out)
    }

    /// Views cutting `axis` into pieces that begin at each of `starts`
    ///
    /// Piece `k` covers `starts[k]..starts[k + 1]`, the last one runs to the
    /// end of the axis. Starts must be strictly increasing and inside the
    /// axis; entries before `starts[0]` belong to no piece.
    pub fn split(&self, axis: usize, starts: &[usize]) -> Result<Vec<Tensor<T>>> {
        let dim = self.dim(axis)?;
        if starts.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::invalid_argument("starts", "must be strictly increasing"));
        }
        if let Some(&last) = starts.last().filter(|&&s| s >= dim) {
            return Err(Error::out_of_range(&[last], &[dim]));
        }
        let ends = starts.iter().skip(1).copied().chain(std::iter::once(dim));
        starts
            .iter()
            .zip(ends)
            .map(|(&start, end)| self.narrow(axis, start, end))
            .collect()
    }

    /// Views of `step` consecutive entries of `axis`; the last may be shorter
    pub fn split_every(&self, axis: usize, step: usize) -> Result<Vec<Tensor<T>>> {
        if step == 0 {
            return Err(Error::invalid_argument("step", "must be positive"));
        }
        let starts: Vec<usize> = (0..self.dim(axis)?).step_by(step).collect();
        self.split(axis, &starts)
    }

    /// Whether both tensors view the same storage
    #[inline]
    pub fn shares_storage(&self, other: &Tensor<T>) -> bool {
        self.storage.ptr_eq(&other.storage)
    }
}

/// Resolve reshape extents, inferring at most one `-1`
fn infer_shape(dims: &[isize], size: usize) -> Result<Shape> {
    let bad = |reason: String| Error::InvalidShape {
        shape: dims.to_vec(),
        reason,
    };
    let mut inferred = None;
    for (axis, &d) in dims.iter().enumerate() {
        match d {
            -1 if inferred.is_none() => inferred = Some(axis),
            -1 => return Err(bad("more than one inferred extent".into())),
            d if d < 0 => return Err(bad(format!("negative extent {d}"))),
            _ => {}
        }
    }
    let mut out: Vec<usize> = dims.iter().map(|&d| d.max(0) as usize).collect();
    let known = out
        .iter()
        .enumerate()
        .filter(|&(axis, _)| Some(axis) != inferred)
        .map(|(_, &d)| d)
        .collect::<Shape>()
        .checked_size()?;
    if let Some(axis) = inferred {
        if known == 0 || size % known != 0 {
            return Err(bad(format!("cannot infer an extent for {size} elements")));
        }
        out[axis] = size / known;
    } else if known != size {
        return Err(bad(format!("{known} elements do not match {size}")));
    }
    Ok(Shape::from(out))
}

/// Element values of a tensor in one traversal order
pub struct Values<'a, T: Element> {
    pointers: PointerIter,
    storage: &'a Storage<T>,
}

impl<T: Element> Iterator for Values<'_, T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.pointers.next().map(|p| self.storage.get(p))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.pointers.size_hint()
    }
}

impl<T: Element> ExactSizeIterator for Values<'_, T> {}

impl<T: Element> FusedIterator for Values<'_, T> {}

impl<T: Element> Clone for Tensor<T> {
    /// Clone creates a new view sharing the same storage (zero-copy)
    fn clone(&self) -> Self {
        self.view(self.layout.clone())
    }
}

impl<T: Element> fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape().as_slice())
            .field("strides", &self.layout.strides())
            .field("offset", &self.layout.offset())
            .field("dtype", &self.dtype())
            .field("family", &self.storage.family())
            .finish()
    }
}

impl<T: Element> fmt::Display for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tensor({:?}, dtype={})", self.shape().as_slice(), self.dtype())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(dims: &[usize]) -> Tensor<f64> {
        Engine::array().seq(dims, Order::C).unwrap()
    }

    #[test]
    fn test_transposed_c_walk() {
        let t = seq(&[2, 3]).transpose();
        assert_eq!(t.to_vec(Order::C), vec![0.0, 3.0, 1.0, 4.0, 2.0, 5.0]);
        assert_eq!(t.transpose().layout(), seq(&[2, 3]).layout());
    }

    #[test]
    fn test_get_set_bounds() {
        let t = seq(&[2, 3]);
        assert_eq!(t.get(&[1, 2]).unwrap(), 5.0);
        assert!(matches!(t.get(&[2, 0]), Err(Error::IndexOutOfRange { .. })));
        assert!(matches!(t.get(&[0]), Err(Error::IndexOutOfRange { .. })));
        t.inc(0.5, &[0, 0]).unwrap();
        assert_eq!(t.get(&[0, 0]).unwrap(), 0.5);
        assert!(t.ptr_set(6, 1.0).is_err());
        assert_eq!(t.ptr_get(5).unwrap(), 5.0);
    }

    #[test]
    fn test_reshape_view_and_copy() {
        let t = seq(&[2, 3]);
        let v = t.reshape(&[3, -1], Order::C).unwrap();
        assert_eq!(v.shape().as_slice(), &[3, 2]);
        assert!(v.shares_storage(&t));

        let tt = t.transpose();
        let c = tt.reshape(&[6], Order::C).unwrap();
        assert!(!c.shares_storage(&t));
        assert_eq!(c.to_vec(Order::C), tt.to_vec(Order::C));

        // the transpose is compact in F order
        let f = tt.reshape(&[6], Order::F).unwrap();
        assert!(f.shares_storage(&t));
        assert_eq!(f.to_vec(Order::C), (0..6).map(|v| v as f64).collect::<Vec<_>>());
    }

    #[test]
    fn test_reshape_rejects_bad_extents() {
        let t = seq(&[2, 3]);
        assert!(matches!(t.reshape(&[4, 2], Order::C), Err(Error::InvalidShape { .. })));
        assert!(matches!(t.reshape(&[-1, -1], Order::C), Err(Error::InvalidShape { .. })));
        assert!(matches!(t.reshape(&[-2, 3], Order::C), Err(Error::InvalidShape { .. })));
        assert!(matches!(t.reshape(&[4, -1], Order::C), Err(Error::InvalidShape { .. })));
        assert!(matches!(
            t.reshape(&[1 << 40, 1 << 40, -1], Order::C),
            Err(Error::InvalidShape { .. })
        ));
    }

    #[test]
    fn test_ravel_strided_view() {
        let t = seq(&[10]);
        let every_other = t.narrow(0, 0, 10).unwrap().reshape(&[5, 2], Order::C).unwrap();
        let col = every_other.narrow(1, 0, 1).unwrap();
        let r = col.ravel(Order::C).unwrap();
        assert!(r.shares_storage(&t));
        assert_eq!(r.layout().strides(), &[2]);
        assert_eq!(r.to_vec(Order::C), vec![0.0, 2.0, 4.0, 6.0, 8.0]);

        let block = seq(&[3, 4]).narrow(1, 1, 3).unwrap();
        let flat = block.ravel(Order::C).unwrap();
        assert!(!flat.shares_storage(&block));
        assert_eq!(flat.to_vec(Order::C), vec![1.0, 2.0, 5.0, 6.0, 9.0, 10.0]);
    }

    #[test]
    fn test_copy_and_copy_to() {
        let t = seq(&[2, 3]).transpose();
        let c = t.copy(Order::C).unwrap();
        assert!(!c.shares_storage(&t));
        assert!(c.layout().is_c_ordered());
        assert_eq!(c.to_vec(Order::F), t.to_vec(Order::F));

        let dst = Engine::array().zeros::<f64>(&[3, 2], Order::F).unwrap();
        t.copy_to(&dst).unwrap();
        assert_eq!(dst.to_vec(Order::C), t.to_vec(Order::C));
        assert!(matches!(
            seq(&[2, 3]).copy_to(&dst),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_fill_view_only() {
        let t = seq(&[3, 4]);
        t.narrow(1, 1, 3).unwrap().fill(-1.0);
        assert_eq!(
            t.to_vec(Order::C),
            vec![0.0, -1.0, -1.0, 3.0, 4.0, -1.0, -1.0, 7.0, 8.0, -1.0, -1.0, 11.0]
        );
        t.narrow(0, 2, 3).unwrap().fill(0.0);
        assert_eq!(t.reduce(ReduceOp::Sum).unwrap(), 10.0);
    }

    #[test]
    fn test_reduce_axes_shape() {
        let t = seq(&[2, 3, 4]);
        let r = t.reduce_axes(ReduceOp::Sum, &[0, 2], false).unwrap();
        assert_eq!(r.shape().as_slice(), &[3]);
        assert_eq!(r.to_vec(Order::C), vec![60.0, 92.0, 124.0]);
        let k = t.reduce_axes(ReduceOp::Max, &[1], true).unwrap();
        assert_eq!(k.shape().as_slice(), &[2, 1, 4]);
        assert_eq!(k.get(&[1, 0, 3]).unwrap(), 23.0);
    }

    #[test]
    fn test_binary_through_views() {
        let a = seq(&[2, 3]);
        let b = seq(&[3, 2]).transpose();
        a.binary_op(&b, BinaryOp::Sub).unwrap();
        // b = [[0, 2, 4], [1, 3, 5]]
        assert_eq!(a.to_vec(Order::C), vec![0.0, -1.0, -2.0, 2.0, 1.0, 0.0]);
        a.binary_scalar_op(2.0, BinaryOp::Mul).unwrap();
        assert_eq!(a.get(&[1, 0]).unwrap(), 4.0);
    }

    #[test]
    fn test_clone_is_view() {
        let t = seq(&[4]);
        let c = t.clone();
        c.set(9.0, &[0]).unwrap();
        assert_eq!(t.get(&[0]).unwrap(), 9.0);
        assert_eq!(t.storage().ref_count(), 2);
    }

    #[test]
    fn test_argmax_argmin_skip_nan_and_keep_first() {
        let t = Engine::array()
            .wrap(vec![3.0, f64::NAN, 7.0, 7.0, -2.0, -2.0], &[2, 3], Order::C)
            .unwrap();
        assert_eq!(t.argmax(Order::C), Some(2));
        assert_eq!(t.argmin(Order::C), Some(4));
        // F order walks 3, 7, NaN, -2, 7, -2
        assert_eq!(t.argmax(Order::F), Some(1));
        assert_eq!(t.argmin(Order::F), Some(3));

        let nan = Engine::array().full(&[3], f64::NAN, Order::C).unwrap();
        assert_eq!(nan.argmax(Order::C), None);
        assert_eq!(seq(&[0]).argmin(Order::C), None);
    }

    #[test]
    fn test_nan_and_zero_counts() {
        let t = Engine::array()
            .wrap(vec![0.0f32, f32::NAN, -0.0, 1.0, f32::NAN], &[5], Order::C)
            .unwrap();
        assert_eq!(t.nan_count(), 2);
        assert_eq!(t.zero_count(), 2);
        let i = Engine::array().seq::<i32>(&[2, 2], Order::C).unwrap();
        assert_eq!(i.nan_count(), 0);
        assert_eq!(i.zero_count(), 1);
    }

    #[test]
    fn test_cast_keeps_shape_and_order() {
        let t = Engine::array()
            .wrap(vec![1.9f64, -1.9, 300.0, f64::NAN], &[2, 2], Order::C)
            .unwrap()
            .transpose();
        let c = t.cast::<i8>(Order::Any).unwrap();
        assert_eq!(c.shape().as_slice(), &[2, 2]);
        assert!(c.layout().is_f_ordered());
        assert_eq!(c.to_vec(Order::C), vec![1, 127, -1, 0]);

        let back = c.cast::<f32>(Order::C).unwrap();
        assert_eq!(back.to_vec(Order::C), vec![1.0, 127.0, -1.0, 0.0]);
    }

    #[test]
    fn test_take_repeats_and_bounds() {
        let t = seq(&[3, 2]);
        let r = t.take(0, &[2, 0, 2], Order::C).unwrap();
        assert_eq!(r.shape().as_slice(), &[3, 2]);
        assert_eq!(r.to_vec(Order::C), vec![4.0, 5.0, 0.0, 1.0, 4.0, 5.0]);
        assert!(!r.shares_storage(&t));

        let cols = t.take(1, &[1], Order::F).unwrap();
        assert_eq!(cols.to_vec(Order::C), vec![1.0, 3.0, 5.0]);
        assert_eq!(t.take(0, &[], Order::C).unwrap().size(), 0);

        assert!(matches!(
            t.take(0, &[3], Order::C),
            Err(Error::IndexOutOfRange { .. })
        ));
        assert!(matches!(t.take(2, &[0], Order::C), Err(Error::InvalidAxis { .. })));
    }

    #[test]
    fn test_split_views() {
        let t = seq(&[2, 5]);
        let parts = t.split(1, &[0, 2, 3]).unwrap();
        let dims: Vec<usize> = parts.iter().map(|p| p.shape()[1]).collect();
        assert_eq!(dims, vec![2, 1, 2]);
        assert!(parts.iter().all(|p| p.shares_storage(&t)));
        assert_eq!(parts[2].to_vec(Order::C), vec![3.0, 4.0, 8.0, 9.0]);

        let tail = t.split(1, &[4]).unwrap();
        assert_eq!(tail.len(), 1);
        assert_eq!(tail[0].to_vec(Order::C), vec![4.0, 9.0]);

        assert!(matches!(t.split(1, &[2, 2]), Err(Error::InvalidArgument { .. })));
        assert!(matches!(t.split(1, &[5]), Err(Error::IndexOutOfRange { .. })));

        let every = t.split_every(1, 2).unwrap();
        assert_eq!(every.len(), 3);
        assert_eq!(every[2].shape().as_slice(), &[2, 1]);
        assert!(t.split_every(1, 0).is_err());
    }

    #[test]
    fn test_dim_and_display() {
        let t = seq(&[2, 3]);
        assert_eq!(t.dim(1).unwrap(), 3);
        assert!(matches!(t.dim(2), Err(Error::InvalidAxis { axis: 2, rank: 2 })));
        assert_eq!(t.to_string(), "Tensor([2, 3], dtype=f64)");
    }
}
