//! Integration tests for selection, joins, casts and arg-reductions
//!
//! Tests verify:
//! - Split pieces are views that concatenate back to the source
//! - Take and stack copy into fresh storage on every engine family
//! - Arg-reductions report positions readable through the shape

mod common;

use common::{engines, tensor_c};
use ndstride::prelude::*;

// ============================================================================
// Split and join
// ============================================================================

#[test]
fn test_split_then_concat_restores() {
    for engine in engines() {
        let t = engine.seq::<i32>(&[3, 4, 2], Order::F).unwrap();
        for axis in 0..3 {
            let parts = t.split_every(axis, 2).unwrap();
            assert!(parts.iter().all(|p| p.shares_storage(&t)));
            let joined = engine.concat(axis, &parts, Order::C).unwrap();
            assert_eq!(joined.shape(), t.shape());
            assert_eq!(joined.to_vec(Order::C), t.to_vec(Order::C));
        }
    }
}

#[test]
fn test_split_writes_reach_source() {
    let t = Engine::array().zeros::<f32>(&[4, 3], Order::C).unwrap();
    let parts = t.split(0, &[0, 1]).unwrap();
    parts[1].fill(2.0);
    assert_eq!(t.reduce(ReduceOp::Sum).unwrap(), 18.0);
    assert_eq!(t.get(&[0, 2]).unwrap(), 0.0);
}

#[test]
fn test_stack_of_strided_views() {
    for engine in engines() {
        let t = engine.seq::<f64>(&[2, 3], Order::C).unwrap();
        let rows = t.split_every(0, 1).unwrap();
        let cols: Vec<_> = rows.iter().map(|r| r.squeeze()).collect();
        let s = engine.stack(1, &cols, Order::Any).unwrap();
        assert_eq!(s.shape().as_slice(), &[3, 2]);
        assert_eq!(s.to_vec(Order::C), t.transpose().to_vec(Order::C));
    }
}

// ============================================================================
// Take and cast
// ============================================================================

#[test]
fn test_take_reorders_transposed_view() {
    for engine in engines() {
        let t = tensor_c(&engine, &[1i8, 2, 3, 4, 5, 6], &[2, 3]).transpose();
        let r = t.take(0, &[2, 2, 0], Order::C).unwrap();
        assert_eq!(r.shape().as_slice(), &[3, 2]);
        assert_eq!(r.to_vec(Order::C), vec![3, 6, 3, 6, 1, 4]);
    }
}

#[test]
fn test_cast_between_families() {
    let t = tensor_c(&Engine::column(), &[0.25f64, 1.5, -2.75, 1e10], &[4]);
    let f = t.cast::<f32>(Order::C).unwrap();
    assert_eq!(f.to_vec(Order::C), vec![0.25, 1.5, -2.75, 1e10]);
    let i = t.cast::<i32>(Order::C).unwrap();
    assert_eq!(i.to_vec(Order::C), vec![0, 1, -2, i32::MAX]);
    assert_eq!(i.engine().family(), StorageFamily::Column);
}

// ============================================================================
// Arg-reductions and counts
// ============================================================================

#[test]
fn test_argmax_position_maps_to_index() {
    let engine = Engine::array();
    let t = engine.seq::<f64>(&[3, 4], Order::C).unwrap();
    t.set(50.0, &[1, 2]).unwrap();
    t.set(-5.0, &[2, 1]).unwrap();
    for order in [Order::C, Order::F] {
        let hi = t.argmax(order).unwrap();
        assert_eq!(t.shape().index(order, hi).unwrap().as_slice(), &[1, 2]);
        let lo = t.argmin(order).unwrap();
        assert_eq!(t.shape().index(order, lo).unwrap().as_slice(), &[2, 1]);
    }
}

#[test]
fn test_counts_through_views() {
    let t = tensor_c(&Engine::array(), &[0.0, f64::NAN, 0.0, 4.0, f64::NAN, 0.0], &[2, 3]);
    assert_eq!(t.nan_count(), 2);
    assert_eq!(t.zero_count(), 3);
    let col = t.narrow(1, 1, 2).unwrap();
    assert_eq!(col.nan_count(), 2);
    assert_eq!(col.zero_count(), 0);
}
