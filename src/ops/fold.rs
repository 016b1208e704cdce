//! Reduction execution over whole layouts and axis subsets

use super::dispatch::{ExecPath, select_path};
use super::reduce::{Fold, normalize_axes};
use super::ReduceOp;
use crate::dtype::Element;
use crate::engine::EngineConfig;
use crate::error::Result;
use crate::kernels;
use crate::tensor::{Layout, Order, Shape, Storage, Strides};

/// Reduce every element addressed by `layout` to one value
///
/// Empty layouts return [`ReduceOp::identity`].
pub(crate) fn reduce<T: Element>(
    op: ReduceOp,
    layout: &Layout,
    storage: &Storage<T>,
    cfg: &EngineConfig,
) -> Result<T> {
    let chunks = layout.chunk_iter(Order::Any, cfg.irregular_order);
    let path = select_path(op.name(), op.is_fp_only(), storage, chunks.chunk_step())?;
    reduce_with(op, layout, storage, path, cfg)
}

/// Reduce over `axes`, one value per index of the kept axes in C order
pub(crate) fn reduce_axes<T: Element>(
    op: ReduceOp,
    layout: &Layout,
    storage: &Storage<T>,
    axes: &[usize],
    cfg: &EngineConfig,
) -> Result<Vec<T>> {
    let axes = normalize_axes(layout.rank(), axes)?;

    let mut kept = (Vec::new(), Vec::new());
    let mut reduced = (Vec::new(), Vec::new());
    for axis in 0..layout.rank() {
        let side = if axes.contains(&axis) { &mut reduced } else { &mut kept };
        side.0.push(layout.dim(axis));
        side.1.push(layout.stride(axis));
    }
    let outer = Layout::from_parts(Shape::from(kept.0), layout.offset(), Strides::from(kept.1));
    let inner = |offset| {
        Layout::from_parts(
            Shape::from(reduced.0.clone()),
            offset,
            Strides::from(reduced.1.clone()),
        )
    };

    // Every sub-layout shares the run step of the first one
    let first = inner(layout.offset());
    let step = first.chunk_iter(Order::Any, cfg.irregular_order).chunk_step();
    let path = select_path(op.name(), op.is_fp_only(), storage, step)?;

    outer
        .ptr_iter(Order::C, cfg.irregular_order)
        .map(|p| reduce_with(op, &inner(p), storage, path, cfg))
        .collect()
}

fn reduce_with<T: Element>(
    op: ReduceOp,
    layout: &Layout,
    storage: &Storage<T>,
    path: ExecPath,
    cfg: &EngineConfig,
) -> Result<T> {
    let n = layout.size();
    match op {
        ReduceOp::Mean => {
            Ok(fold(Fold::Sum, layout, storage, path, cfg)?.div_elem(T::from_usize(n)))
        }
        ReduceOp::NanMean => {
            let count = layout
                .ptr_iter(Order::Any, cfg.irregular_order)
                .filter(|&p| !storage.get(p).is_nan())
                .count();
            Ok(fold(Fold::NanSum, layout, storage, path, cfg)?.div_elem(T::from_usize(count)))
        }
        ReduceOp::Var { ddof } => variance(layout, storage, ddof, path, cfg),
        _ => fold(op.fold(), layout, storage, path, cfg),
    }
}

fn fold<T: Element>(
    fold: Fold,
    layout: &Layout,
    storage: &Storage<T>,
    path: ExecPath,
    cfg: &EngineConfig,
) -> Result<T> {
    if path == ExecPath::Generic {
        return Ok(layout
            .ptr_iter(Order::Any, cfg.irregular_order)
            .fold(fold.identity(), |acc, p| fold.step(acc, storage.get(p))));
    }
    layout
        .chunk_iter(Order::Any, cfg.irregular_order)
        .try_fold(fold.identity(), |acc, chunk| {
            let part = kernels::reduce_chunk(fold, storage, chunk, path, cfg.simd)?;
            Ok(fold.combine(acc, part))
        })
}

/// Two-pass centred variance: `(Σc² - (Σc)²/d) / d` with `c = x - mean`,
/// `d = n - ddof`
fn variance<T: Element>(
    layout: &Layout,
    storage: &Storage<T>,
    ddof: usize,
    path: ExecPath,
    cfg: &EngineConfig,
) -> Result<T> {
    let n = layout.size();
    if n <= ddof {
        return Ok(T::from_f64(f64::NAN));
    }
    let mean = fold(Fold::Sum, layout, storage, path, cfg)?.div_elem(T::from_usize(n));
    let (s1, s2) = layout
        .ptr_iter(Order::Any, cfg.irregular_order)
        .fold((T::zero(), T::zero()), |(s1, s2), p| {
            let c = storage.get(p).sub_elem(mean);
            (s1.add_elem(c), s2.add_elem(c.mul_elem(c)))
        });
    let d = T::from_usize(n - ddof);
    Ok(s2.sub_elem(s1.mul_elem(s1).div_elem(d)).div_elem(d))
}
