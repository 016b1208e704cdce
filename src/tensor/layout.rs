//! Layout: shape, strides, and offset for tensor memory layout

use super::{Order, Shape, Strides};
use crate::error::{Error, Result};
use std::fmt;

/// Layout describes how a tensor's logical elements map onto storage
///
/// Address of element at indices [i0, i1, ..., in]:
///   offset + i0 * strides[0] + i1 * strides[1] + ... + in * strides[n]
///
/// The map is only meaningful for `0 <= ik < shape[k]`. A layout never owns
/// data; every shape transform below produces a fresh layout over the same
/// storage.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Layout {
    /// Shape: size along each dimension
    shape: Shape,
    /// Strides: offset (in elements) between consecutive elements along each dimension
    strides: Strides,
    /// Offset: starting element index in the underlying storage
    offset: usize,
    c_ordered: bool,
    f_ordered: bool,
}

impl Layout {
    /// Create a layout with explicit shape, offset and strides
    ///
    /// Fails with `InvalidShape` when the element count overflows and with
    /// `InvalidArgument` when some reachable pointer does not fit `isize`.
    pub fn new(shape: Shape, offset: usize, strides: Strides) -> Result<Self> {
        if shape.rank() != strides.len() {
            return Err(Error::invalid_argument(
                "strides",
                format!(
                    "rank {} does not match {} stride values",
                    shape.rank(),
                    strides.len()
                ),
            ));
        }
        shape.checked_size()?;
        let layout = Self::from_parts(shape, offset, strides);
        layout.checked_pointer_range()?;
        Ok(layout)
    }

    /// Build a layout whose rank agreement is already guaranteed
    pub(crate) fn from_parts(shape: Shape, offset: usize, strides: Strides) -> Self {
        debug_assert_eq!(shape.rank(), strides.len());
        let (c_ordered, f_ordered) = classify(&shape, &strides);
        Self {
            shape,
            strides,
            offset,
            c_ordered,
            f_ordered,
        }
    }

    /// Create a dense layout in C or F order
    ///
    /// # Example
    /// ```
    /// use ndstride::tensor::{Layout, Order, Shape};
    /// let layout = Layout::dense(Shape::from([2, 3, 4]), 0, Order::C);
    /// assert_eq!(layout.strides(), &[12, 4, 1]);
    /// ```
    pub fn dense(shape: Shape, offset: usize, order: Order) -> Self {
        let strides = Strides::dense(&shape, order);
        Self::from_parts(shape, offset, strides)
    }

    /// Create a scalar (0-dimensional) layout
    pub fn scalar(offset: usize) -> Self {
        Self::from_parts(Shape::scalar(), offset, Strides::default())
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Get the strides
    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    /// Get the offset
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of dimensions (rank)
    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    /// Total number of elements
    #[inline]
    pub fn size(&self) -> usize {
        self.shape.size()
    }

    /// Extent of one axis
    #[inline]
    pub fn dim(&self, axis: usize) -> usize {
        self.shape[axis]
    }

    /// Stride of one axis
    #[inline]
    pub fn stride(&self, axis: usize) -> isize {
        self.strides[axis]
    }

    /// Whether strides follow the row-major pattern for this shape
    ///
    /// Layouts of rank below two are both C- and F-ordered.
    #[inline]
    pub fn is_c_ordered(&self) -> bool {
        self.c_ordered
    }

    /// Whether strides follow the column-major pattern for this shape
    #[inline]
    pub fn is_f_ordered(&self) -> bool {
        self.f_ordered
    }

    /// Ordered and unit-stride along the fastest axis
    pub fn is_dense(&self) -> bool {
        match self.rank() {
            0 => true,
            r => {
                (self.c_ordered && self.strides[r - 1] == 1)
                    || (self.f_ordered && self.strides[0] == 1)
            }
        }
    }

    /// Whether distinct indices share a pointer through a stride-0 axis
    pub fn is_broadcast(&self) -> bool {
        self.shape
            .iter()
            .zip(self.strides.iter())
            .any(|(&d, &s)| d > 1 && s == 0)
    }

    /// Natural fast order of this layout: C, F, or `Storage` when irregular
    pub fn storage_fast_order(&self) -> Order {
        if self.rank() < 2 || self.c_ordered {
            Order::C
        } else if self.f_ordered {
            Order::F
        } else {
            Order::Storage
        }
    }

    /// Resolve `Any` to the natural fast order, using `irregular` when the
    /// layout is neither C nor F. Explicit orders pass through unchanged.
    pub fn resolve_order(&self, order: Order, irregular: Order) -> Order {
        match order {
            Order::Any => match self.storage_fast_order() {
                Order::Storage => irregular,
                fast => fast,
            },
            other => other,
        }
    }

    /// Bounds-checked storage pointer for a multi-index
    pub fn pointer(&self, idx: &[usize]) -> Result<usize> {
        if idx.len() != self.rank() || idx.iter().zip(self.shape.iter()).any(|(&i, &d)| i >= d) {
            return Err(Error::out_of_range(idx, &self.shape));
        }
        Ok(self.pointer_unchecked(idx))
    }

    /// Storage pointer for a multi-index known to be in bounds
    #[inline]
    pub(crate) fn pointer_unchecked(&self, idx: &[usize]) -> usize {
        let mut p = self.offset as isize;
        for (&i, &s) in idx.iter().zip(self.strides.iter()) {
            p += i as isize * s;
        }
        p as usize
    }

    /// Smallest and largest pointer reachable through this layout
    ///
    /// Returns `None` for layouts with zero elements. Layouts built by
    /// [`Layout::new`] always have a representable range; for any other
    /// layout whose range overflows this also returns `None`.
    pub fn pointer_range(&self) -> Option<(isize, isize)> {
        self.checked_pointer_range().ok().flatten()
    }

    /// [`Layout::pointer_range`] with overflow reported as `InvalidArgument`
    pub fn checked_pointer_range(&self) -> Result<Option<(isize, isize)>> {
        if self.size() == 0 {
            return Ok(None);
        }
        let overflow = || {
            Error::invalid_argument(
                "strides",
                format!(
                    "pointers of shape {:?} with strides {:?} from offset {} overflow isize",
                    self.shape, self.strides, self.offset
                ),
            )
        };
        let start = isize::try_from(self.offset).map_err(|_| overflow())?;
        let (mut lo, mut hi) = (start, start);
        for (&d, &s) in self.shape.iter().zip(self.strides.iter()) {
            let span = isize::try_from(d - 1)
                .ok()
                .and_then(|n| n.checked_mul(s))
                .ok_or_else(overflow)?;
            if span < 0 {
                lo = lo.checked_add(span).ok_or_else(overflow)?;
            } else {
                hi = hi.checked_add(span).ok_or_else(overflow)?;
            }
        }
        Ok(Some((lo, hi)))
    }

    /// Multi-index addressed by a storage pointer
    ///
    /// Defined for layouts with positive strides whose elements do not
    /// overlap in storage.
    pub fn index_of(&self, pointer: usize) -> Result<Vec<usize>> {
        if self.strides.iter().any(|&s| s <= 0) {
            return Err(Error::invalid_argument(
                "pointer",
                "index lookup needs strictly positive strides",
            ));
        }
        let mut axes: Vec<usize> = (0..self.rank()).collect();
        axes.sort_by(|&a, &b| {
            self.strides[b]
                .cmp(&self.strides[a])
                .then(self.shape[b].cmp(&self.shape[a]))
        });
        let mut rem = pointer as isize - self.offset as isize;
        if rem < 0 {
            return Err(Error::out_of_range(&[pointer], &self.shape));
        }
        let mut idx = vec![0; self.rank()];
        for axis in axes {
            let p = rem / self.strides[axis];
            if p as usize >= self.shape[axis] {
                return Err(Error::out_of_range(&[pointer], &self.shape));
            }
            idx[axis] = p as usize;
            rem -= p * self.strides[axis];
        }
        if rem != 0 {
            return Err(Error::out_of_range(&[pointer], &self.shape));
        }
        Ok(idx)
    }

    /// Reorder axes fastest-first for `order` and optionally merge axes that
    /// chain into a single constant-stride run.
    ///
    /// For `F` the axes keep their order, for `C` they are reversed, for
    /// `Storage` they are sorted by ascending stride (zero strides last).
    /// `Any` is resolved against this layout first, with `Storage` as the
    /// irregular fallback. With `compact`, unit axes are dropped and each axis
    /// whose stride equals `dim * stride` of the previous merged axis is folded
    /// into it. The returned layout is always in fastest-first (F) form.
    pub fn compute_compact_layout(&self, order: Order, compact: bool) -> Layout {
        let order = self.resolve_order(order, Order::Storage);
        let mut axes: Vec<usize> = (0..self.rank()).collect();
        match order {
            Order::F | Order::Any => {}
            Order::C => axes.reverse(),
            Order::Storage => axes.sort_by(|&a, &b| {
                let (sa, sb) = (self.strides[a].unsigned_abs(), self.strides[b].unsigned_abs());
                match (sa == 0, sb == 0) {
                    (true, true) => self.shape[a].cmp(&self.shape[b]),
                    (true, false) => std::cmp::Ordering::Greater,
                    (false, true) => std::cmp::Ordering::Less,
                    _ => sa.cmp(&sb).then(self.shape[a].cmp(&self.shape[b])),
                }
            }),
        }

        if !compact {
            let dims: Shape = axes.iter().map(|&a| self.shape[a]).collect();
            let strides: Strides = axes.iter().map(|&a| self.strides[a]).collect();
            return Layout::from_parts(dims, self.offset, strides);
        }

        let mut dims: Vec<usize> = Vec::with_capacity(axes.len());
        let mut strides: Vec<isize> = Vec::with_capacity(axes.len());
        for &a in &axes {
            let (d, s) = (self.shape[a], self.strides[a]);
            if d == 1 {
                continue;
            }
            if let (Some(ld), Some(ls)) = (dims.last_mut(), strides.last()) {
                if *ld as isize * *ls == s {
                    *ld *= d;
                    continue;
                }
            }
            dims.push(d);
            strides.push(s);
        }
        if dims.is_empty() && self.rank() > 0 {
            // every axis had extent 1
            dims.push(1);
            strides.push(1);
        }
        Layout::from_parts(Shape::from(dims), self.offset, Strides::from(strides))
    }

    /// Whether the elements form one unit-stride block when walked in `order`
    ///
    /// This is the condition under which a reshape in `order` is a pure view.
    pub fn is_compact(&self, order: Order) -> bool {
        if self.size() <= 1 {
            return true;
        }
        let compact = self.compute_compact_layout(order, true);
        compact.rank() == 1 && compact.strides[0] == 1
    }

    /// Reverse the order of all axes
    pub fn revert(&self) -> Layout {
        let dims: Shape = self.shape.iter().rev().copied().collect();
        let strides: Strides = self.strides.iter().rev().copied().collect();
        Layout::from_parts(dims, self.offset, strides)
    }

    /// Move axis `src` to position `dst`, shifting the axes in between
    pub fn move_axis(&self, src: usize, dst: usize) -> Result<Layout> {
        self.check_axis(src)?;
        self.check_axis(dst)?;
        let mut dims: Vec<usize> = self.shape.to_vec();
        let mut strides: Vec<isize> = self.strides.to_vec();
        let d = dims.remove(src);
        let s = strides.remove(src);
        dims.insert(dst, d);
        strides.insert(dst, s);
        Ok(Layout::from_parts(dims.into(), self.offset, strides.into()))
    }

    /// Swap two axes
    pub fn swap_axis(&self, a: usize, b: usize) -> Result<Layout> {
        self.check_axis(a)?;
        self.check_axis(b)?;
        let mut dims: Vec<usize> = self.shape.to_vec();
        let mut strides: Vec<isize> = self.strides.to_vec();
        dims.swap(a, b);
        strides.swap(a, b);
        Ok(Layout::from_parts(dims.into(), self.offset, strides.into()))
    }

    /// Reorder axes: axis `k` of the result is axis `perm[k]` of this layout
    pub fn permute(&self, perm: &[usize]) -> Result<Layout> {
        if perm.len() != self.rank() {
            return Err(Error::invalid_argument(
                "perm",
                format!("expected {} axes, got {}", self.rank(), perm.len()),
            ));
        }
        let mut seen = vec![false; self.rank()];
        for &p in perm {
            self.check_axis(p)?;
            if std::mem::replace(&mut seen[p], true) {
                return Err(Error::invalid_argument(
                    "perm",
                    format!("axis {p} appears more than once"),
                ));
            }
        }
        let dims: Shape = perm.iter().map(|&p| self.shape[p]).collect();
        let strides: Strides = perm.iter().map(|&p| self.strides[p]).collect();
        Ok(Layout::from_parts(dims, self.offset, strides))
    }

    /// Remove every axis of extent 1
    pub fn squeeze(&self) -> Layout {
        if self.shape.unit_dim_count() == 0 {
            return self.clone();
        }
        let (dims, strides): (Vec<usize>, Vec<isize>) = self
            .shape
            .iter()
            .zip(self.strides.iter())
            .filter(|&(&d, _)| d != 1)
            .map(|(&d, &s)| (d, s))
            .unzip();
        Layout::from_parts(dims.into(), self.offset, strides.into())
    }

    /// Remove the listed axes, each of which must have extent 1
    pub fn squeeze_axes(&self, axes: &[usize]) -> Result<Layout> {
        for &a in axes {
            self.check_axis(a)?;
            if self.shape[a] != 1 {
                return Err(Error::invalid_argument(
                    "axes",
                    format!("axis {a} has extent {}, not 1", self.shape[a]),
                ));
            }
        }
        let (dims, strides): (Vec<usize>, Vec<isize>) = (0..self.rank())
            .filter(|i| !axes.contains(i))
            .map(|i| (self.shape[i], self.strides[i]))
            .unzip();
        Ok(Layout::from_parts(dims.into(), self.offset, strides.into()))
    }

    /// Restrict one axis to the half-open range `start..end`
    pub fn narrow(&self, axis: usize, start: usize, end: usize) -> Result<Layout> {
        self.check_axis(axis)?;
        if start > end || end > self.shape[axis] {
            return Err(Error::out_of_range(&[start, end], &self.shape));
        }
        let mut dims: Vec<usize> = self.shape.to_vec();
        dims[axis] = end - start;
        let offset = self.offset as isize + start as isize * self.strides[axis];
        Ok(Layout::from_parts(
            dims.into(),
            offset as usize,
            self.strides.clone(),
        ))
    }

    /// Repeat a unit axis `size` times with stride 0
    pub fn expand(&self, axis: usize, size: usize) -> Result<Layout> {
        self.check_axis(axis)?;
        if self.shape[axis] != 1 {
            return Err(Error::invalid_argument(
                "axis",
                format!("axis {axis} must have extent 1, has {}", self.shape[axis]),
            ));
        }
        let mut dims: Vec<usize> = self.shape.to_vec();
        let mut strides: Vec<isize> = self.strides.to_vec();
        dims[axis] = size;
        strides[axis] = 0;
        let shape = Shape::from(dims);
        shape.checked_size()?;
        Ok(Layout::from_parts(shape, self.offset, strides.into()))
    }

    /// Insert unit axes at the listed positions of the result
    pub fn stretch(&self, axes: &[usize]) -> Result<Layout> {
        let rank = self.rank() + axes.len();
        let mut dims = Vec::with_capacity(rank);
        let mut strides = Vec::with_capacity(rank);
        let mut next = 0;
        for &a in axes {
            if a >= rank {
                return Err(Error::invalid_axis(a as isize, rank));
            }
        }
        for i in 0..rank {
            if axes.contains(&i) {
                dims.push(1);
                strides.push(0);
            } else {
                if next >= self.rank() {
                    return Err(Error::invalid_argument("axes", "duplicate axis"));
                }
                dims.push(self.shape[next]);
                strides.push(self.strides[next]);
                next += 1;
            }
        }
        if next != self.rank() {
            return Err(Error::invalid_argument("axes", "duplicate axis"));
        }
        Ok(Layout::from_parts(dims.into(), self.offset, strides.into()))
    }

    /// Broadcast to a target shape using numpy rules (stride 0 on repeated axes)
    pub fn broadcast_to(&self, target: &[usize]) -> Result<Layout> {
        if target.len() < self.rank() {
            return Err(Error::shape_mismatch(target, &self.shape));
        }
        let pad = target.len() - self.rank();
        let mut strides: Vec<isize> = vec![0; pad];
        for ((&s, &st), &t) in self
            .shape
            .iter()
            .zip(self.strides.iter())
            .zip(&target[pad..])
        {
            if s == t {
                strides.push(st);
            } else if s == 1 {
                strides.push(0);
            } else {
                return Err(Error::shape_mismatch(target, &self.shape));
            }
        }
        let shape = Shape::from(target);
        shape.checked_size()?;
        Ok(Layout::from_parts(shape, self.offset, strides.into()))
    }

    fn check_axis(&self, axis: usize) -> Result<()> {
        if axis >= self.rank() {
            return Err(Error::invalid_axis(axis as isize, self.rank()));
        }
        Ok(())
    }
}

/// Compare strides against the canonical dense patterns for `shape`
fn classify(shape: &Shape, strides: &Strides) -> (bool, bool) {
    let rank = shape.rank();
    if rank < 2 {
        return (true, true);
    }
    let c = (0..rank - 1).all(|i| strides[i] == strides[i + 1] * shape[i + 1] as isize);
    let f = (1..rank).all(|i| strides[i] == strides[i - 1] * shape[i - 1] as isize);
    (c, f)
}

impl fmt::Debug for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Layout {{ shape: {:?}, strides: {:?}, offset: {} }}",
            self.shape.as_slice(),
            self.strides.as_slice(),
            self.offset
        )
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stride({:?},{},{:?})",
            self.shape.as_slice(),
            self.offset,
            self.strides.as_slice()
        )
    }
}
