//! LU decomposition solver
//!
//! Provides LU factorization with partial pivoting for solving dense square
//! systems, with a cheap reciprocal condition estimate taken from the pivots.
//! [`lu_solve`] uses LAPACK when the `ndarray-linalg` feature is enabled, with
//! a pure-Rust fallback.

use crate::traits::{DenseField, RealField};
use ndarray::{Array1, Array2};
use thiserror::Error;

#[cfg(feature = "ndarray-linalg")]
use ndarray_linalg::Solve;

/// Errors that can occur during LU factorization
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LuError {
    #[error("Matrix is singular or nearly singular (pivot {pivot} at column {column})")]
    SingularMatrix { column: usize, pivot: f64 },
    #[error("Matrix dimensions mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

/// LU factorization result
///
/// Stores L and U factors along with pivot information, so that several
/// right-hand sides can be solved against the same matrix.
#[derive(Debug, Clone)]
pub struct LuFactorization<T: RealField> {
    /// Combined L and U matrices (L is unit lower triangular, stored below diagonal)
    pub lu: Array2<T>,
    /// Row permutation: row `i` of the factorization is row `pivots[i]` of A
    pub pivots: Vec<usize>,
    /// Matrix dimension
    pub n: usize,
}

impl<T: RealField> LuFactorization<T> {
    /// Solve Ax = b using the pre-computed LU factorization
    pub fn solve(&self, b: &Array1<T>) -> Result<Array1<T>, LuError> {
        if b.len() != self.n {
            return Err(LuError::DimensionMismatch {
                expected: self.n,
                got: b.len(),
            });
        }

        // Apply row permutation
        let mut x = Array1::from_shape_fn(self.n, |i| b[self.pivots[i]]);

        // Forward substitution: Ly = Pb
        for i in 0..self.n {
            for j in 0..i {
                let l_ij = self.lu[[i, j]];
                let x_j = x[j];
                x[i] -= l_ij * x_j;
            }
        }

        // Backward substitution: Ux = y
        for i in (0..self.n).rev() {
            for j in (i + 1)..self.n {
                let u_ij = self.lu[[i, j]];
                let x_j = x[j];
                x[i] -= u_ij * x_j;
            }
            let u_ii = self.lu[[i, i]];
            if u_ii == T::zero() {
                return Err(LuError::SingularMatrix {
                    column: i,
                    pivot: 0.0,
                });
            }
            x[i] /= u_ii;
        }

        Ok(x)
    }

    /// Reciprocal condition estimate from the pivots: min |u_kk| / max |u_kk|
    ///
    /// This is a lower-quality estimate than a LAPACK `gecon`, but it is free
    /// once the factorization exists and reliably flags near-singular influence
    /// matrices (coincident panels, zero-length wakes).
    pub fn rcond_estimate(&self) -> T {
        let mut min_pivot = T::max_value();
        let mut max_pivot = T::zero();
        for k in 0..self.n {
            let p = self.lu[[k, k]].abs();
            min_pivot = min_pivot.min(p);
            max_pivot = max_pivot.max(p);
        }
        if max_pivot == T::zero() {
            T::zero()
        } else {
            min_pivot / max_pivot
        }
    }
}

/// Compute LU factorization with partial pivoting
///
/// A pivot is considered zero when it falls below `n * eps * max|A_ij|`.
pub fn lu_factorize<T: RealField>(a: &Array2<T>) -> Result<LuFactorization<T>, LuError> {
    let n = a.nrows();
    if n != a.ncols() {
        return Err(LuError::DimensionMismatch {
            expected: n,
            got: a.ncols(),
        });
    }

    let scale = a.iter().fold(T::zero(), |acc, v| acc.max(v.abs()));
    let threshold = T::from_count(n.max(1)) * T::epsilon() * scale;

    let mut lu = a.clone();
    let mut pivots: Vec<usize> = (0..n).collect();

    for k in 0..n {
        // Find pivot
        let mut max_val = lu[[k, k]].abs();
        let mut max_row = k;

        for i in (k + 1)..n {
            let val = lu[[i, k]].abs();
            if val > max_val {
                max_val = val;
                max_row = i;
            }
        }

        // Check for singularity
        if max_val <= threshold || !max_val.is_finite() {
            return Err(LuError::SingularMatrix {
                column: k,
                pivot: max_val.to_f64().unwrap_or(f64::NAN),
            });
        }

        // Swap rows if needed
        if max_row != k {
            for j in 0..n {
                lu.swap([k, j], [max_row, j]);
            }
            pivots.swap(k, max_row);
        }

        // Compute multipliers and eliminate
        let pivot = lu[[k, k]];
        for i in (k + 1)..n {
            let mult = lu[[i, k]] / pivot;
            lu[[i, k]] = mult;

            if mult != T::zero() {
                for j in (k + 1)..n {
                    let update = mult * lu[[k, j]];
                    lu[[i, j]] -= update;
                }
            }
        }
    }

    Ok(LuFactorization { lu, pivots, n })
}

/// Solve Ax = b using LU decomposition
///
/// This is a convenience function that combines factorization and solve.
pub fn lu_solve<T: DenseField>(a: &Array2<T>, b: &Array1<T>) -> Result<Array1<T>, LuError> {
    #[cfg(feature = "ndarray-linalg")]
    {
        let n = a.nrows();
        if n != a.ncols() || b.len() != n {
            return Err(LuError::DimensionMismatch {
                expected: n,
                got: if n != a.ncols() { a.ncols() } else { b.len() },
            });
        }
        a.solve_into(b.clone())
            .map_err(|_| LuError::SingularMatrix {
                column: 0,
                pivot: 0.0,
            })
    }

    #[cfg(not(feature = "ndarray-linalg"))]
    {
        let factorization = lu_factorize(a)?;
        factorization.solve(b)
    }
}
