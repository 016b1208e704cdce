//! Common test utilities
#![allow(dead_code)]

use ndstride::prelude::*;

/// Array engine and column engine with the default configuration
pub fn engines() -> [Engine; 2] {
    [Engine::array(), Engine::column()]
}

/// Array engine with architecture SIMD kernels switched off
pub fn portable_engine() -> Engine {
    Engine::with_config(
        StorageFamily::Array,
        EngineConfig::default().with_simd(false),
    )
}

/// Tensor over `data` laid out in C order
pub fn tensor_c<T: Element>(engine: &Engine, data: &[T], shape: &[usize]) -> Tensor<T> {
    engine.wrap(data.to_vec(), shape, Order::C).unwrap()
}

/// Assert two f64 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f64(a: &[f64], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        if x.is_nan() && y.is_nan() {
            continue;
        }
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Assert two f32 slices are close within tolerance
pub fn assert_allclose_f32(a: &[f32], b: &[f32], rtol: f32, atol: f32, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        if x.is_nan() && y.is_nan() {
            continue;
        }
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Assert two f64 slices hold the same bit patterns
///
/// NaN payloads are not compared: two NaNs are equal.
pub fn assert_bits_eq(a: &[f64], b: &[f64], msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        if x.is_nan() && y.is_nan() {
            continue;
        }
        assert_eq!(
            x.to_bits(),
            y.to_bits(),
            "{}: element {} differs: {} vs {}",
            msg,
            i,
            x,
            y
        );
    }
}
