//! In-place unary operator execution

use super::dispatch::{ExecPath, check_writable, select_path};
use super::UnaryOp;
use crate::dtype::Element;
use crate::engine::EngineConfig;
use crate::error::Result;
use crate::kernels;
use crate::tensor::{Layout, Order, Storage};

/// Apply `op` to every element addressed by `layout`
///
/// The caller guarantees every pointer of `layout` lies inside `storage`.
pub(crate) fn unary_op<T: Element>(
    op: UnaryOp,
    layout: &Layout,
    storage: &Storage<T>,
    cfg: &EngineConfig,
) -> Result<()> {
    let chunks = layout.chunk_iter(Order::Any, cfg.irregular_order);
    let path = select_path(op.name(), op.is_fp_only(), storage, chunks.chunk_step())?;
    check_writable(op.name(), layout)?;

    if path != ExecPath::Generic {
        for chunk in chunks {
            kernels::unary_chunk(op, storage, chunk, path, cfg.simd)?;
        }
    } else {
        for p in layout.ptr_iter(Order::Any, cfg.irregular_order) {
            storage.set(p, storage.get(p).apply_unary(op));
        }
    }
    Ok(())
}
