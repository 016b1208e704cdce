//! Engine: tensor factories bound to one storage family
//!
//! An [`Engine`] decides which [`StorageFamily`] backs the tensors it
//! creates and carries the [`EngineConfig`] every operator on those tensors
//! consults. Engines are small `Copy` values; each tensor keeps the engine
//! that created it.
//!
//! ```
//! use ndstride::prelude::*;
//!
//! let engine = Engine::array();
//! let t = engine.seq::<f64>(&[2, 3], Order::C)?;
//! assert_eq!(t.transpose().to_vec(Order::C), vec![0.0, 3.0, 1.0, 4.0, 2.0, 5.0]);
//! # Ok::<(), ndstride::error::Error>(())
//! ```

mod column;
mod config;

pub use crate::tensor::StorageFamily;
pub use column::{Column, VecColumn};
pub use config::EngineConfig;

use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::tensor::{Layout, Order, Shape, Storage, Strides, Tensor};
use rand::Rng;
use rand::distr::{Distribution, StandardUniform};

/// Tensor factory for one storage family
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Engine {
    family: StorageFamily,
    config: EngineConfig,
}

impl Default for Engine {
    fn default() -> Self {
        Self::array()
    }
}

impl Engine {
    /// Engine over aligned in-memory buffers (vectorizable)
    pub fn array() -> Self {
        Self::with_config(StorageFamily::Array, EngineConfig::default())
    }

    /// Engine over [`VecColumn`] storages (generic scalar paths only)
    pub fn column() -> Self {
        Self::with_config(StorageFamily::Column, EngineConfig::default())
    }

    /// Engine with an explicit family and configuration
    pub fn with_config(family: StorageFamily, config: EngineConfig) -> Self {
        Self { family, config }
    }

    /// Storage family of every tensor this engine creates
    #[inline]
    pub fn family(&self) -> StorageFamily {
        self.family
    }

    /// Configuration shared by tensors of this engine
    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Zero-filled storage of `len` elements in this engine's family
    pub fn storage<T: Element>(&self, len: usize) -> Result<Storage<T>> {
        match self.family {
            StorageFamily::Array => Storage::zeros(len),
            StorageFamily::Column => Ok(Storage::from_column(Box::new(VecColumn::zeros(
                T::DTYPE,
                len,
            )))),
        }
    }

    /// Dense tensor of zeros
    pub fn zeros<T: Element>(&self, shape: &[usize], order: Order) -> Result<Tensor<T>> {
        let order = self.dense_order(order)?;
        let shape = Shape::from(shape);
        let storage = self.storage(shape.checked_size()?)?;
        Ok(Tensor::from_parts(*self, Layout::dense(shape, 0, order), storage))
    }

    /// Dense tensor with every element set to `value`
    pub fn full<T: Element>(&self, shape: &[usize], value: T, order: Order) -> Result<Tensor<T>> {
        let t = self.zeros(shape, order)?;
        t.fill(value);
        Ok(t)
    }

    /// Rank-0 tensor holding `value`
    pub fn scalar<T: Element>(&self, value: T) -> Result<Tensor<T>> {
        self.full(&[], value, Order::C)
    }

    /// Dense tensor whose elements read `0, 1, 2, ...` when iterated in `order`
    pub fn seq<T: Element>(&self, shape: &[usize], order: Order) -> Result<Tensor<T>> {
        let n = Shape::from(shape).checked_size()?;
        self.wrap((0..n).map(T::from_usize).collect(), shape, order)
    }

    /// Dense tensor of samples from the standard distribution of `T`
    ///
    /// Floating point samples lie in `[0, 1)`; integer samples span the
    /// whole type range. Values are drawn in `order`.
    pub fn random<T, R>(&self, shape: &[usize], rng: &mut R, order: Order) -> Result<Tensor<T>>
    where
        T: Element,
        R: Rng,
        StandardUniform: Distribution<T>,
    {
        let n = Shape::from(shape).checked_size()?;
        let values: Vec<T> = (0..n).map(|_| rng.random()).collect();
        self.wrap(values, shape, order)
    }

    /// Dense tensor over an existing buffer laid out in `order`
    ///
    /// Array engines adopt the allocation without copying; column engines
    /// move the values into a new column.
    pub fn wrap<T: Element>(&self, data: Vec<T>, shape: &[usize], order: Order) -> Result<Tensor<T>> {
        let order = self.dense_order(order)?;
        let shape = Shape::from(shape);
        if data.len() != shape.checked_size()? {
            return Err(Error::invalid_shape(
                &shape,
                format!("buffer holds {} elements, shape needs {}", data.len(), shape.size()),
            ));
        }
        let storage = match self.family {
            StorageFamily::Array => Storage::from_vec(data),
            StorageFamily::Column => Storage::from_column(Box::new(VecColumn::from_values(
                T::DTYPE,
                data.into_iter().map(Element::to_f64).collect(),
            ))),
        };
        Ok(Tensor::from_parts(*self, Layout::dense(shape, 0, order), storage))
    }

    /// Tensor over `storage` with an explicit offset and strides
    ///
    /// The general escape hatch: any affine view is expressible, including
    /// negative and zero strides. Fails with `InvalidArgument` when the
    /// storage belongs to another family or when some element of the view
    /// would fall outside the storage.
    pub fn stride<T: Element>(
        &self,
        shape: &[usize],
        offset: usize,
        strides: &[isize],
        storage: Storage<T>,
    ) -> Result<Tensor<T>> {
        if storage.family() != self.family {
            return Err(Error::invalid_argument(
                "storage",
                format!(
                    "{:?} storage passed to a {:?} engine",
                    storage.family(),
                    self.family
                ),
            ));
        }
        let layout = Layout::new(Shape::from(shape), offset, Strides::from(strides))?;
        if let Some((lo, hi)) = layout.pointer_range() {
            if lo < 0 || hi as usize >= storage.len() {
                return Err(Error::invalid_argument(
                    "strides",
                    format!(
                        "view spans pointers {lo}..={hi}, storage holds {} elements",
                        storage.len()
                    ),
                ));
            }
        }
        Ok(Tensor::from_parts(*self, layout, storage))
    }

    /// Join tensors along the existing `axis` into fresh storage
    ///
    /// Every tensor must have the rank and the extents of the first one,
    /// except along `axis`.
    pub fn concat<T: Element>(
        &self,
        axis: usize,
        tensors: &[Tensor<T>],
        order: Order,
    ) -> Result<Tensor<T>> {
        let first = tensors
            .first()
            .ok_or_else(|| Error::invalid_argument("tensors", "nothing to join"))?;
        let rank = first.rank();
        if axis >= rank {
            return Err(Error::invalid_axis(axis as isize, rank));
        }
        let mut dims = first.shape().as_slice().to_vec();
        dims[axis] = 0;
        for t in tensors {
            let fits = t.rank() == rank
                && (0..rank).all(|k| k == axis || t.shape()[k] == first.shape()[k]);
            if !fits {
                return Err(Error::shape_mismatch(first.shape(), t.shape()));
            }
            let joined = dims[axis]
                .checked_add(t.shape()[axis])
                .ok_or_else(|| Error::invalid_shape(&dims, "joined extent overflows usize"))?;
            dims[axis] = joined;
        }
        let out = self.zeros::<T>(&dims, order)?;
        let mut at = 0;
        for t in tensors {
            let d = t.shape()[axis];
            t.copy_to(&out.narrow(axis, at, at + d)?)?;
            at += d;
        }
        Ok(out)
    }

    /// Join tensors of one shape along a new axis inserted at `axis`
    pub fn stack<T: Element>(
        &self,
        axis: usize,
        tensors: &[Tensor<T>],
        order: Order,
    ) -> Result<Tensor<T>> {
        let first = tensors
            .first()
            .ok_or_else(|| Error::invalid_argument("tensors", "nothing to join"))?;
        if axis > first.rank() {
            return Err(Error::invalid_axis(axis as isize, first.rank() + 1));
        }
        let lifted = tensors
            .iter()
            .map(|t| {
                if t.shape() != first.shape() {
                    return Err(Error::shape_mismatch(first.shape(), t.shape()));
                }
                t.stretch(&[axis])
            })
            .collect::<Result<Vec<_>>>()?;
        self.concat(axis, &lifted, order)
    }

    /// Resolve a factory order to C or F
    fn dense_order(&self, order: Order) -> Result<Order> {
        match order {
            Order::C | Order::F => Ok(order),
            Order::Any => Ok(self.config.default_order),
            Order::Storage => Err(Error::invalid_argument(
                "order",
                "dense creation needs C, F or Any",
            )),
        }
    }
}
