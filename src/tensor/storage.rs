//! Storage: flat element buffers with Arc-based sharing

use crate::dtype::{DType, Element};
use crate::engine::Column;
use crate::error::{Error, Result};
use crate::kernels::LANES;
use std::alloc::{Layout as AllocLayout, alloc_zeroed, dealloc, handle_alloc_error};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Alignment of array-family buffers (AVX-512 width)
const ALIGN: usize = 64;

/// Backing families a storage can belong to
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StorageFamily {
    /// Plain contiguous in-memory buffer; supports lane access
    Array,
    /// Delegates every access to an external [`Column`]
    Column,
}

/// Flat buffer of `T` elements shared by every view over it
///
/// Cloning a `Storage` increments the reference count; the buffer is freed
/// when the last handle drops. Storage performs no locking: writes through
/// one handle are visible through all others, and concurrent writes to the
/// same element from different threads are a data race the caller must
/// prevent (partition writes into disjoint ranges).
///
/// Scalar accessors panic on out-of-bounds pointers, like slice indexing.
pub struct Storage<T: Element> {
    inner: Arc<StorageInner<T>>,
}

struct StorageInner<T: Element> {
    buffer: Buffer,
    /// Number of elements (not bytes)
    len: usize,
    _marker: PhantomData<T>,
}

enum Buffer {
    /// 64-byte aligned allocation owned by this storage
    Aligned { ptr: u64, size_bytes: usize },
    /// Allocation adopted from a `Vec`, released with its original capacity
    Adopted { ptr: u64, capacity: usize },
    Column(Box<dyn Column>),
}

impl<T: Element> Storage<T> {
    /// Allocate `len` zeroed elements in a 64-byte aligned buffer
    pub fn zeros(len: usize) -> Result<Self> {
        let size_bytes = len.checked_mul(T::DTYPE.size_in_bytes()).ok_or_else(|| {
            Error::invalid_argument("len", format!("{len} elements overflow the address space"))
        })?;
        let ptr = allocate(size_bytes)?;
        Ok(Self::from_buffer(Buffer::Aligned { ptr, size_bytes }, len))
    }

    /// Copy a slice into a fresh aligned buffer
    pub fn from_slice(data: &[T]) -> Result<Self> {
        let storage = Self::zeros(data.len())?;
        if let Some(dst) = storage.as_mut_ptr().filter(|_| !data.is_empty()) {
            // SAFETY: freshly allocated for exactly data.len() elements
            unsafe { std::ptr::copy_nonoverlapping(data.as_ptr(), dst, data.len()) };
        }
        Ok(storage)
    }

    /// Take ownership of a vector's allocation without copying
    pub fn from_vec(data: Vec<T>) -> Self {
        let mut data = std::mem::ManuallyDrop::new(data);
        let len = data.len();
        let capacity = data.capacity();
        let ptr = data.as_mut_ptr() as u64;
        Self::from_buffer(Buffer::Adopted { ptr, capacity }, len)
    }

    /// Wrap an external column; every access goes through the column
    pub fn from_column(column: Box<dyn Column>) -> Self {
        let len = column.len();
        Self::from_buffer(Buffer::Column(column), len)
    }

    /// Create array storage from raw native-endian bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let size = T::DTYPE.size_in_bytes();
        if data.len() % size != 0 {
            return Err(Error::invalid_argument(
                "data",
                format!(
                    "{} bytes is not a multiple of the {} element size",
                    data.len(),
                    T::DTYPE
                ),
            ));
        }
        let storage = Self::zeros(data.len() / size)?;
        if let Some(dst) = storage.as_mut_ptr().filter(|_| !data.is_empty()) {
            // SAFETY: destination holds exactly data.len() bytes
            unsafe {
                std::ptr::copy_nonoverlapping(data.as_ptr(), dst as *mut u8, data.len())
            };
        }
        Ok(storage)
    }

    fn from_buffer(buffer: Buffer, len: usize) -> Self {
        Self {
            inner: Arc::new(StorageInner {
                buffer,
                len,
                _marker: PhantomData,
            }),
        }
    }

    /// Get the number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len
    }

    /// Check if storage is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.len == 0
    }

    /// Get the element type
    #[inline]
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    /// Get the backing family
    #[inline]
    pub fn family(&self) -> StorageFamily {
        match self.inner.buffer {
            Buffer::Column(_) => StorageFamily::Column,
            _ => StorageFamily::Array,
        }
    }

    /// Whether lane (batched) access is available
    #[inline]
    pub fn supports_vectorization(&self) -> bool {
        self.family() == StorageFamily::Array
    }

    /// Get the reference count
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Whether two handles share one buffer
    #[inline]
    pub fn ptr_eq(&self, other: &Storage<T>) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Raw element pointer for array storages, `None` for columns
    #[inline]
    pub(crate) fn as_mut_ptr(&self) -> Option<*mut T> {
        match self.inner.buffer {
            Buffer::Aligned { ptr, .. } | Buffer::Adopted { ptr, .. } => Some(ptr as *mut T),
            Buffer::Column(_) => None,
        }
    }

    #[inline]
    fn check(&self, p: usize) {
        assert!(
            p < self.inner.len,
            "storage pointer {p} out of bounds for length {}",
            self.inner.len
        );
    }

    /// Read the element at pointer `p`
    #[inline]
    pub fn get(&self, p: usize) -> T {
        self.check(p);
        match &self.inner.buffer {
            Buffer::Column(c) => T::from_f64(c.get(p)),
            // SAFETY: bounds checked above
            _ => unsafe { self.raw_ptr().add(p).read() },
        }
    }

    /// Write the element at pointer `p`
    #[inline]
    pub fn set(&self, p: usize, v: T) {
        self.check(p);
        match &self.inner.buffer {
            Buffer::Column(c) => c.set(p, v.to_f64()),
            // SAFETY: bounds checked above
            _ => unsafe { self.raw_ptr().add(p).write(v) },
        }
    }

    /// Add `v` to the element at pointer `p`
    #[inline]
    pub fn inc(&self, p: usize, v: T) {
        self.set(p, self.get(p).add_elem(v));
    }

    /// Read with a native cast into another element type
    #[inline]
    pub fn get_as<U: Element>(&self, p: usize) -> U {
        U::from_f64(self.get(p).to_f64())
    }

    /// Write a value of another element type with a native cast
    #[inline]
    pub fn set_as<U: Element>(&self, p: usize, v: U) {
        self.set(p, T::from_f64(v.to_f64()));
    }

    /// Set every element in `start..end` to `v`
    pub fn fill(&self, start: usize, end: usize, v: T) {
        assert!(
            start <= end && end <= self.inner.len,
            "fill range {start}..{end} out of bounds for length {}",
            self.inner.len
        );
        match &self.inner.buffer {
            Buffer::Column(c) => (start..end).for_each(|p| c.set(p, v.to_f64())),
            _ => {
                let ptr = self.raw_ptr();
                for p in start..end {
                    // SAFETY: range checked above
                    unsafe { ptr.add(p).write(v) };
                }
            }
        }
    }

    /// Load `LANES` consecutive elements starting at `p`
    ///
    /// Lane access backs the portable vector kernels. Column storages fail
    /// with `OperationNotAvailable` and lanes reaching past either end of
    /// the buffer with `IndexOutOfRange`.
    pub fn load_lane(&self, p: usize) -> Result<[T; LANES]> {
        self.gather_lane(p, 1)
    }

    /// Store `LANES` consecutive elements starting at `p`
    pub fn store_lane(&self, p: usize, lane: &[T; LANES]) -> Result<()> {
        self.scatter_lane(p, 1, lane)
    }

    /// Load `LANES` elements at `start + k * step`
    pub fn gather_lane(&self, start: usize, step: isize) -> Result<[T; LANES]> {
        let ptr = self.lane_ptr("gather_lane", start, step)?;
        let mut lane = [T::zero(); LANES];
        for (k, slot) in lane.iter_mut().enumerate() {
            // SAFETY: every lane pointer validated by lane_ptr
            *slot = unsafe { ptr.offset(start as isize + k as isize * step).read() };
        }
        Ok(lane)
    }

    /// Store `LANES` elements at `start + k * step`
    pub fn scatter_lane(&self, start: usize, step: isize, lane: &[T; LANES]) -> Result<()> {
        let ptr = self.lane_ptr("scatter_lane", start, step)?;
        for (k, &v) in lane.iter().enumerate() {
            // SAFETY: every lane pointer validated by lane_ptr
            unsafe { ptr.offset(start as isize + k as isize * step).write(v) };
        }
        Ok(())
    }

    fn lane_ptr(&self, op: &'static str, start: usize, step: isize) -> Result<*mut T> {
        let ptr = self
            .as_mut_ptr()
            .ok_or_else(|| Error::not_available(op, T::DTYPE, "storage is not vectorizable"))?;
        let last = start as isize + (LANES as isize - 1) * step;
        if start >= self.inner.len || last < 0 || last as usize >= self.inner.len {
            return Err(Error::out_of_range(&[start, last.max(0) as usize], &[self.inner.len]));
        }
        Ok(ptr)
    }

    #[inline]
    fn raw_ptr(&self) -> *mut T {
        match self.inner.buffer {
            Buffer::Aligned { ptr, .. } | Buffer::Adopted { ptr, .. } => ptr as *mut T,
            Buffer::Column(_) => std::ptr::null_mut(),
        }
    }

    /// Copy all elements out in storage order
    pub fn to_vec(&self) -> Vec<T> {
        match &self.inner.buffer {
            Buffer::Column(c) => (0..self.inner.len).map(|p| T::from_f64(c.get(p))).collect(),
            _ => {
                let mut out = vec![T::zero(); self.inner.len];
                if !out.is_empty() {
                    // SAFETY: buffer holds len elements
                    unsafe {
                        std::ptr::copy_nonoverlapping(self.raw_ptr(), out.as_mut_ptr(), out.len())
                    };
                }
                out
            }
        }
    }

    /// Raw native-endian bytes of all elements in storage order
    pub fn to_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.to_vec()).to_vec()
    }
}

/// Allocate zeroed memory aligned for SIMD loads
fn allocate(size_bytes: usize) -> Result<u64> {
    if size_bytes == 0 {
        return Ok(0);
    }
    let layout = AllocLayout::from_size_align(size_bytes, ALIGN)
        .map_err(|e| Error::invalid_argument("len", e.to_string()))?;
    // SAFETY: layout has non-zero size
    let ptr = unsafe { alloc_zeroed(layout) };
    if ptr.is_null() {
        handle_alloc_error(layout);
    }
    Ok(ptr as u64)
}

impl<T: Element> Clone for Storage<T> {
    /// Clone increments the reference count (zero-copy)
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Element> Drop for StorageInner<T> {
    fn drop(&mut self) {
        match self.buffer {
            Buffer::Aligned { ptr, size_bytes } if ptr != 0 && size_bytes != 0 => {
                if let Ok(layout) = AllocLayout::from_size_align(size_bytes, ALIGN) {
                    // SAFETY: allocated by `allocate` with this exact layout
                    unsafe { dealloc(ptr as *mut u8, layout) };
                }
            }
            Buffer::Adopted { ptr, capacity } => {
                // SAFETY: parts taken from a Vec<T> in `from_vec`
                drop(unsafe { Vec::from_raw_parts(ptr as *mut T, self.len, capacity) });
            }
            _ => {}
        }
    }
}

impl<T: Element> fmt::Debug for Storage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage")
            .field("family", &self.family())
            .field("len", &self.inner.len)
            .field("dtype", &T::DTYPE)
            .field("refs", &Arc::strong_count(&self.inner))
            .finish()
    }
}
