#![allow(dead_code)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use ndstride::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn rand_vec_f64(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| ((i * 17 + 3) % 1000) as f64 / 1000.0)
        .collect()
}

/// Contiguous, gathered (every other element) and column-backed inputs
fn layouts(n: usize) -> Vec<(&'static str, Tensor<f64>)> {
    let data = rand_vec_f64(2 * n);
    let array = Engine::array();
    let contiguous = array.wrap(data[..n].to_vec(), &[n], Order::C).unwrap();
    let wide = array.wrap(data.clone(), &[2 * n], Order::C).unwrap();
    let strided = array.stride(&[n], 0, &[2], wide.storage().clone()).unwrap();
    let column = Engine::column()
        .wrap(data[..n].to_vec(), &[n], Order::C)
        .unwrap();
    vec![
        ("contiguous", contiguous),
        ("strided", strided),
        ("column", column),
    ]
}

// ---------------------------------------------------------------------------
// Unary
// ---------------------------------------------------------------------------

fn bench_unary(c: &mut Criterion) {
    let mut group = c.benchmark_group("unary_abs_f64");
    for n in [1_000, 100_000] {
        for (name, t) in layouts(n) {
            group.bench_with_input(BenchmarkId::new(name, n), &t, |b, t| {
                b.iter(|| black_box(t.unary_op(UnaryOp::Abs).unwrap()));
            });
        }
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Binary
// ---------------------------------------------------------------------------

fn bench_binary(c: &mut Criterion) {
    let mut group = c.benchmark_group("binary_add_f64");
    for n in [1_000, 100_000] {
        for (name, t) in layouts(n) {
            let other = t.copy(Order::C).unwrap();
            group.bench_with_input(BenchmarkId::new(name, n), &t, |b, t| {
                b.iter(|| black_box(t.binary_op(&other, BinaryOp::Add).unwrap()));
            });
        }
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Reduce
// ---------------------------------------------------------------------------

fn bench_reduce(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce_sum_f64");
    for n in [1_000, 100_000] {
        for (name, t) in layouts(n) {
            group.bench_with_input(BenchmarkId::new(name, n), &t, |b, t| {
                b.iter(|| black_box(t.reduce(ReduceOp::Sum).unwrap()));
            });
        }
    }

    let m = Engine::array().seq::<f64>(&[512, 512], Order::C).unwrap();
    for axis in [0, 1] {
        group.bench_with_input(BenchmarkId::new("axis_512x512", axis), &axis, |b, &axis| {
            b.iter(|| black_box(m.reduce_axes(ReduceOp::Sum, &[axis], false).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_unary, bench_binary, bench_reduce);
criterion_main!(benches);
