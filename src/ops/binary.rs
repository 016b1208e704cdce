//! In-place binary operator execution
//!
//! Operands must have identical shapes; broadcasting happens above this
//! layer by expanding a layout before the call. Both operands are chunked
//! in the same logical order, so when their runs have the same length the
//! k-th run of `a` pairs with the k-th run of `b`. Otherwise the pointer
//! iterators are zipped element by element on the generic path.

use super::dispatch::{ExecPath, check_writable, select_path};
use super::BinaryOp;
use crate::dtype::Element;
use crate::engine::EngineConfig;
use crate::error::{Error, Result};
use crate::kernels;
use crate::tensor::{Layout, Order, Storage};
use tracing::trace;

/// `a = a op b` element-wise over two equal-shape layouts
pub(crate) fn binary_op<T: Element>(
    op: BinaryOp,
    a_layout: &Layout,
    a: &Storage<T>,
    b_layout: &Layout,
    b: &Storage<T>,
    cfg: &EngineConfig,
) -> Result<()> {
    if a_layout.shape() != b_layout.shape() {
        return Err(Error::shape_mismatch(a_layout.shape(), b_layout.shape()));
    }
    check_writable(op.name(), a_layout)?;
    if op == BinaryOp::Div && T::DTYPE.is_int() {
        let zero = b_layout
            .ptr_iter(Order::Any, cfg.irregular_order)
            .any(|p| b.get(p) == T::zero());
        if zero {
            return Err(Error::invalid_argument("divisor", "integer division by zero"));
        }
    }

    // Storage order is per-layout, so pair the operands in C or F
    let order = a_layout
        .resolve_order(Order::Any, cfg.irregular_order)
        .auto_fc(Order::C);
    let ca = a_layout.chunk_iter(order, cfg.irregular_order);
    let cb = b_layout.chunk_iter(order, cfg.irregular_order);

    if ca.chunk_len() == cb.chunk_len() {
        let path = select_path(op.name(), false, a, ca.chunk_step())?
            .min(select_path(op.name(), false, b, cb.chunk_step())?);
        if path != ExecPath::Generic {
            for (x, y) in ca.zip(cb) {
                kernels::binary_chunk(op, a, x, b, y, path, cfg.simd)?;
            }
            return Ok(());
        }
    } else {
        trace!(
            op = op.name(),
            a_run = ca.chunk_len(),
            b_run = cb.chunk_len(),
            "run lengths differ, pairing pointers"
        );
    }

    let pairs = a_layout
        .ptr_iter(order, cfg.irregular_order)
        .zip(b_layout.ptr_iter(order, cfg.irregular_order));
    for (pa, pb) in pairs {
        a.set(pa, op.apply(a.get(pa), b.get(pb)));
    }
    Ok(())
}

/// `a = a op s` for every element addressed by `layout`
pub(crate) fn binary_scalar_op<T: Element>(
    op: BinaryOp,
    layout: &Layout,
    a: &Storage<T>,
    s: T,
    cfg: &EngineConfig,
) -> Result<()> {
    check_writable(op.name(), layout)?;
    if op == BinaryOp::Div && T::DTYPE.is_int() && s == T::zero() {
        return Err(Error::invalid_argument("divisor", "integer division by zero"));
    }
    let chunks = layout.chunk_iter(Order::Any, cfg.irregular_order);
    let path = select_path(op.name(), false, a, chunks.chunk_step())?;
    if path != ExecPath::Generic {
        for chunk in chunks {
            kernels::binary_scalar_chunk(op, a, chunk, s, path, cfg.simd)?;
        }
    } else {
        for p in layout.ptr_iter(Order::Any, cfg.irregular_order) {
            a.set(p, op.apply(a.get(p), s));
        }
    }
    Ok(())
}
