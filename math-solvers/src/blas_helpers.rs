//! Vector kernels shared by the solvers
//!
//! Plain Rust implementations of inner products, norms and axpy updates on
//! `ndarray` vectors.

use crate::traits::RealField;
use ndarray::{Array1, ArrayView1};

/// Compute inner product (x, y) = Σ x_i * y_i
#[inline]
pub fn inner_product<T: RealField>(x: &Array1<T>, y: &Array1<T>) -> T {
    assert_eq!(
        x.len(),
        y.len(),
        "Vector lengths must match for inner product"
    );
    let mut sum = T::zero();
    for (xi, yi) in x.iter().zip(y.iter()) {
        sum += *xi * *yi;
    }
    sum
}

/// Compute vector 2-norm: ||x||_2 = sqrt(Σ x_i^2)
#[inline]
pub fn vector_norm<T: RealField>(x: &Array1<T>) -> T {
    view_norm(x.view())
}

/// 2-norm of an array view (used on matrix columns)
///
/// Scales by the largest entry first so that very large or very small
/// entries do not overflow or underflow the sum of squares.
#[inline]
pub fn view_norm<T: RealField>(x: ArrayView1<T>) -> T {
    let scale = max_abs(x);
    if scale == T::zero() {
        return T::zero();
    }
    let mut sum = T::zero();
    for xi in x.iter() {
        let s = *xi / scale;
        sum += s * s;
    }
    scale * sum.sqrt()
}

/// Largest absolute entry of a view
#[inline]
pub fn max_abs<T: RealField>(x: ArrayView1<T>) -> T {
    x.iter().fold(T::zero(), |acc, v| acc.max(v.abs()))
}

/// Compute axpy: y = α * x + y
#[inline]
pub fn axpy<T: RealField>(alpha: T, x: &Array1<T>, y: &mut Array1<T>) {
    for (xi, yi) in x.iter().zip(y.iter_mut()) {
        *yi += alpha * *xi;
    }
}

/// Check that every entry of a vector is finite
#[inline]
pub fn all_finite<T: RealField>(x: &Array1<T>) -> bool {
    x.iter().all(|v| v.is_finite())
}
