//! Property tests over random shapes, orders and strided views

mod common;

use common::assert_allclose_f64;
use ndstride::prelude::*;
use proptest::prelude::*;

fn order_strategy() -> impl Strategy<Value = Order> {
    prop_oneof![Just(Order::C), Just(Order::F)]
}

/// Shape, creation order, per-axis flips and a transpose switch
fn view_strategy() -> impl Strategy<Value = (Vec<usize>, Order, Vec<bool>, bool)> {
    prop::collection::vec(0usize..5, 0..=4).prop_flat_map(|dims| {
        let rank = dims.len();
        (
            Just(dims),
            order_strategy(),
            prop::collection::vec(any::<bool>(), rank),
            any::<bool>(),
        )
    })
}

/// Sequence tensor seen through reversed axes and an optional transpose
fn strided_view<T: Element>(
    engine: &Engine,
    dims: &[usize],
    order: Order,
    flips: &[bool],
    transpose: bool,
) -> Tensor<T> {
    let base = engine.seq::<T>(dims, order).unwrap();
    let mut offset = base.layout().offset() as isize;
    let mut strides = base.layout().strides().to_vec();
    for (axis, &flip) in flips.iter().enumerate() {
        if flip && dims[axis] > 0 {
            offset += (dims[axis] as isize - 1) * strides[axis];
            strides[axis] = -strides[axis];
        }
    }
    let view = engine
        .stride(dims, offset as usize, &strides, base.storage().clone())
        .unwrap();
    if transpose { view.transpose() } else { view }
}

proptest! {
    #[test]
    fn prop_reshape_is_view_iff_compact((dims, order, flips, tr) in view_strategy(), ask in order_strategy()) {
        let t = strided_view::<f64>(&Engine::array(), &dims, order, &flips, tr);
        let target: Vec<isize> = t.shape().iter().rev().map(|&d| d as isize).collect();
        let r = t.reshape(&target, ask).unwrap();
        prop_assert_eq!(r.shares_storage(&t), t.layout().is_compact(ask));
        prop_assert_eq!(r.to_vec(ask), t.to_vec(ask));
    }

    #[test]
    fn prop_copy_preserves_iteration((dims, order, flips, tr) in view_strategy(), ask in order_strategy()) {
        for engine in [Engine::array(), Engine::column()] {
            let t = strided_view::<i32>(&engine, &dims, order, &flips, tr);
            let c = t.copy(ask).unwrap();
            prop_assert!(!c.shares_storage(&t));
            prop_assert_eq!(c.to_vec(ask), t.to_vec(ask));
        }
    }

    #[test]
    fn prop_transpose_is_involution((dims, order, flips, tr) in view_strategy()) {
        let t = strided_view::<f32>(&Engine::array(), &dims, order, &flips, tr);
        let tt = t.transpose().transpose();
        prop_assert_eq!(tt.layout(), t.layout());
    }

    #[test]
    fn prop_chunks_cover_every_element_once((dims, order, flips, tr) in view_strategy(), ask in prop_oneof![Just(Order::Any), Just(Order::C), Just(Order::F)]) {
        let t = strided_view::<f64>(&Engine::array(), &dims, order, &flips, tr);
        let from_chunks: Vec<usize> = t
            .chunk_iter(ask)
            .flat_map(|c| c.pointers().collect::<Vec<_>>())
            .collect();
        let pointers: Vec<usize> = t.ptr_iter(ask).collect();
        prop_assert_eq!(&from_chunks, &pointers);

        let mut sorted = pointers.clone();
        sorted.sort_unstable();
        sorted.dedup();
        prop_assert_eq!(sorted.len(), t.size());
    }

    #[test]
    fn prop_add_sub_restores_integers(
        (dims, order, flips, tr) in view_strategy(),
        other in order_strategy(),
        seed in any::<i32>(),
    ) {
        let engine = Engine::array();
        let a = strided_view::<i32>(&engine, &dims, order, &flips, tr);
        let b = engine.full(a.shape(), seed, other).unwrap();
        b.binary_op(&a, BinaryOp::Mul).unwrap();
        let before = a.to_vec(Order::C);
        a.binary_op(&b, BinaryOp::Add).unwrap();
        a.binary_op(&b, BinaryOp::Sub).unwrap();
        prop_assert_eq!(a.to_vec(Order::C), before);
    }

    #[test]
    fn prop_add_sub_restores_floats(
        values in prop::collection::vec(-1e3f64..1e3, 1..200),
        shift in prop::collection::vec(-1e3f64..1e3, 200),
    ) {
        let n = values.len();
        for engine in [Engine::array(), Engine::column()] {
            let a = engine.wrap(values.clone(), &[n], Order::C).unwrap();
            let b = engine.wrap(shift[..n].to_vec(), &[n], Order::C).unwrap();
            a.binary_op(&b, BinaryOp::Add).unwrap();
            a.binary_op(&b, BinaryOp::Sub).unwrap();
            assert_allclose_f64(&a.to_vec(Order::C), &values, 1e-12, 1e-12, "add/sub");
        }
    }

    #[test]
    fn prop_abs_paths_agree(values in prop::collection::vec(-1e6f64..1e6, 0..100)) {
        let n = values.len();
        let array = Engine::array().wrap(values.clone(), &[n], Order::C).unwrap();
        let column = Engine::column().wrap(values, &[n], Order::C).unwrap();
        array.unary_op(UnaryOp::Abs).unwrap();
        column.unary_op(UnaryOp::Abs).unwrap();
        let a: Vec<u64> = array.iter(Order::C).map(f64::to_bits).collect();
        let c: Vec<u64> = column.iter(Order::C).map(f64::to_bits).collect();
        prop_assert_eq!(a, c);
    }

    #[test]
    fn prop_index_position_roundtrip(dims in prop::collection::vec(1usize..5, 0..=4), order in order_strategy()) {
        let shape = Shape::from(dims);
        for pos in 0..shape.size() {
            let idx = shape.index(order, pos).unwrap();
            prop_assert_eq!(shape.position(order, &idx).unwrap(), pos);
        }
        prop_assert!(shape.index(order, shape.size()).is_err());
    }

    #[test]
    fn prop_reduce_sum_independent_of_layout((dims, order, flips, tr) in view_strategy()) {
        let t = strided_view::<f64>(&Engine::array(), &dims, order, &flips, tr);
        let n = t.size();
        let expected = (n * n.saturating_sub(1) / 2) as f64;
        prop_assert_eq!(t.reduce(ReduceOp::Sum).unwrap(), expected);
        let column = strided_view::<f64>(&Engine::column(), &dims, order, &flips, tr);
        prop_assert_eq!(column.reduce(ReduceOp::Sum).unwrap(), expected);
    }
}
