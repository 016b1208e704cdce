//! Portable lane kernels, generic over every element type
//!
//! Runs are processed `LANES` elements at a time through the storage's
//! checked lane access, then a scalar tail. The same bodies serve unit-stride
//! runs (step 1) and gathered runs (any other step). Per-element results are
//! identical to the scalar definitions in [`crate::ops::arithmetic`].

use crate::dtype::Element;
use crate::error::Result;
use crate::iter::Chunk;
use crate::ops::{BinaryOp, Fold, UnaryOp};
use crate::tensor::Storage;

/// Number of elements processed together
pub const LANES: usize = 8;

#[inline(always)]
fn load<T: Element>(storage: &Storage<T>, p: usize, step: isize) -> Result<[T; LANES]> {
    if step == 1 {
        storage.load_lane(p)
    } else {
        storage.gather_lane(p, step)
    }
}

#[inline(always)]
fn store<T: Element>(
    storage: &Storage<T>,
    p: usize,
    step: isize,
    lane: &[T; LANES],
) -> Result<()> {
    if step == 1 {
        storage.store_lane(p, lane)
    } else {
        storage.scatter_lane(p, step, lane)
    }
}

/// `a[k] = op(a[k])` over one run
pub(crate) fn unary<T: Element>(op: UnaryOp, a: &Storage<T>, run: Chunk) -> Result<()> {
    let full = run.len / LANES;
    for i in 0..full {
        let p = run.pointer(i * LANES);
        let mut lane = load(a, p, run.step)?;
        for v in lane.iter_mut() {
            *v = v.apply_unary(op);
        }
        store(a, p, run.step, &lane)?;
    }
    for k in full * LANES..run.len {
        let p = run.pointer(k);
        a.set(p, a.get(p).apply_unary(op));
    }
    Ok(())
}

/// `a[k] = op(a[k], b[k])` over two runs of equal length
pub(crate) fn binary<T: Element>(
    op: BinaryOp,
    a: &Storage<T>,
    ra: Chunk,
    b: &Storage<T>,
    rb: Chunk,
) -> Result<()> {
    let full = ra.len / LANES;
    for i in 0..full {
        let pa = ra.pointer(i * LANES);
        let mut lane = load(a, pa, ra.step)?;
        let rhs = load(b, rb.pointer(i * LANES), rb.step)?;
        for (x, &y) in lane.iter_mut().zip(rhs.iter()) {
            *x = op.apply(*x, y);
        }
        store(a, pa, ra.step, &lane)?;
    }
    for k in full * LANES..ra.len {
        let pa = ra.pointer(k);
        a.set(pa, op.apply(a.get(pa), b.get(rb.pointer(k))));
    }
    Ok(())
}

/// `a[k] = op(a[k], s)` over one run
pub(crate) fn binary_scalar<T: Element>(
    op: BinaryOp,
    a: &Storage<T>,
    run: Chunk,
    s: T,
) -> Result<()> {
    let full = run.len / LANES;
    for i in 0..full {
        let p = run.pointer(i * LANES);
        let mut lane = load(a, p, run.step)?;
        for x in lane.iter_mut() {
            *x = op.apply(*x, s);
        }
        store(a, p, run.step, &lane)?;
    }
    for k in full * LANES..run.len {
        let p = run.pointer(k);
        a.set(p, op.apply(a.get(p), s));
    }
    Ok(())
}

/// Fold one run with one accumulator per lane
pub(crate) fn reduce<T: Element>(fold: Fold, a: &Storage<T>, run: Chunk) -> Result<T> {
    let full = run.len / LANES;
    let mut acc = [fold.identity::<T>(); LANES];
    let mut tail = fold.identity::<T>();
    for i in 0..full {
        let lane = load(a, run.pointer(i * LANES), run.step)?;
        for (s, &x) in acc.iter_mut().zip(lane.iter()) {
            *s = fold.step(*s, x);
        }
    }
    for k in full * LANES..run.len {
        tail = fold.step(tail, a.get(run.pointer(k)));
    }
    Ok(acc.iter().fold(tail, |r, &s| fold.combine(r, s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::DType;
    use crate::engine::VecColumn;
    use crate::error::Error;

    fn run(start: usize, len: usize, step: isize) -> Chunk {
        Chunk { start, len, step }
    }

    #[test]
    fn test_unary_unit_and_tail() {
        let a = Storage::from_vec((-10..11).collect::<Vec<i32>>());
        unary(UnaryOp::Abs, &a, run(0, 21, 1)).unwrap();
        let expected: Vec<i32> = (-10i32..11).map(|v| v.abs()).collect();
        assert_eq!(a.to_vec(), expected);
    }

    #[test]
    fn test_unary_strided_touches_only_run() {
        let a = Storage::from_vec((0..40).map(|v| v as f64).collect::<Vec<_>>());
        unary(UnaryOp::Neg, &a, run(0, 12, 3)).unwrap();
        for (i, v) in a.to_vec().into_iter().enumerate() {
            if i % 3 == 0 && i / 3 < 12 {
                assert_eq!(v, -(i as f64));
            } else {
                assert_eq!(v, i as f64);
            }
        }
    }

    #[test]
    fn test_binary_mixed_steps() {
        let a = Storage::from_vec(vec![1.0f32; 20]);
        let b = Storage::from_vec((0..40).map(|v| v as f32).collect::<Vec<_>>());
        binary(BinaryOp::Add, &a, run(0, 20, 1), &b, run(0, 20, 2)).unwrap();
        for (i, v) in a.to_vec().into_iter().enumerate() {
            assert_eq!(v, 1.0 + 2.0 * i as f32);
        }
    }

    #[test]
    fn test_binary_negative_step() {
        let a = Storage::from_vec(vec![0i32; 20]);
        let b = Storage::from_vec((0..10).collect::<Vec<i32>>());
        binary(BinaryOp::Add, &a, run(19, 10, -2), &b, run(0, 10, 1)).unwrap();
        let got = a.to_vec();
        for k in 0..10 {
            assert_eq!(got[19 - 2 * k], k as i32);
            assert_eq!(got[18 - 2 * k], 0);
        }
    }

    #[test]
    fn test_binary_scalar() {
        let a = Storage::from_vec(vec![7i8; 11]);
        binary_scalar(BinaryOp::Sub, &a, run(0, 11, 1), 10).unwrap();
        assert!(a.to_vec().iter().all(|&v| v == -3));
    }

    #[test]
    fn test_reduce_folds() {
        let a = Storage::from_vec((1..=20).collect::<Vec<i32>>());
        assert_eq!(reduce(Fold::Sum, &a, run(0, 20, 1)).unwrap(), 210);
        assert_eq!(reduce(Fold::Max, &a, run(0, 20, 1)).unwrap(), 20);
        assert_eq!(reduce(Fold::Min, &a, run(0, 10, 2)).unwrap(), 1);
        assert_eq!(reduce(Fold::Sum, &a, run(0, 0, 1)).unwrap(), 0);
    }

    #[test]
    fn test_reduce_nan_variants() {
        let mut v = vec![1.0f64; 19];
        v[4] = f64::NAN;
        let a = Storage::from_vec(v);
        assert!(reduce(Fold::Sum, &a, run(0, 19, 1)).unwrap().is_nan());
        assert_eq!(reduce(Fold::NanSum, &a, run(0, 19, 1)).unwrap(), 18.0);
        assert!(reduce(Fold::Max, &a, run(0, 19, 1)).unwrap().is_nan());
        assert_eq!(reduce(Fold::NanMax, &a, run(0, 19, 1)).unwrap(), 1.0);
    }

    #[test]
    fn test_run_past_storage_end_is_rejected() {
        let a = Storage::from_vec(vec![1i32; 10]);
        let err = unary(UnaryOp::Neg, &a, run(4, 8, 1)).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { .. }));
    }

    #[test]
    fn test_column_storage_is_rejected() {
        let c = Storage::<f64>::from_column(Box::new(VecColumn::from_values(
            DType::F64,
            vec![1.0; 16],
        )));
        let err = reduce(Fold::Sum, &c, run(0, 16, 1)).unwrap_err();
        assert!(matches!(err, Error::OperationNotAvailable { .. }));
    }
}
