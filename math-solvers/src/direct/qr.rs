//! Householder QR least-squares solver
//!
//! Solves min ||Ax - b||_2 for tall (m >= n) systems. Used when the boundary
//! conditions over-determine the unknowns, e.g. a Neumann doublet system with
//! an additional closure row. With the `ndarray-linalg` feature the problem
//! is handed to LAPACK's SVD least squares instead.

use crate::blas_helpers::view_norm;
use crate::traits::{DenseField, RealField};
use ndarray::{Array1, Array2, s};
use thiserror::Error;

#[cfg(feature = "ndarray-linalg")]
use ndarray_linalg::LeastSquaresSvd;
#[cfg(feature = "ndarray-linalg")]
use num_traits::Float;

/// Errors that can occur during a least-squares solve
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QrError {
    #[error("Matrix is rank deficient (|R[{column},{column}]| = {diagonal:.3e})")]
    RankDeficient { column: usize, diagonal: f64 },
    #[error("System is under-determined: {rows} rows for {cols} unknowns")]
    Underdetermined { rows: usize, cols: usize },
    #[error("Right-hand side length mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

/// Result of a least-squares solve
#[derive(Debug, Clone)]
pub struct LeastSquaresSolution<T: RealField> {
    /// Minimizer x
    pub x: Array1<T>,
    /// Norm of the residual ||Ax - b||_2
    pub residual_norm: T,
    /// Reciprocal condition estimate min |r_kk| / max |r_kk|
    pub rcond: T,
}

/// Solve the least-squares problem min ||Ax - b||_2
///
/// Square systems are accepted as well; the result is then the ordinary
/// solution of Ax = b. The reciprocal condition estimate is the ratio of the
/// extreme singular values on the LAPACK path and of the extreme diagonal
/// entries of R on the Householder path.
pub fn lstsq<T: DenseField>(
    a: &Array2<T>,
    b: &Array1<T>,
) -> Result<LeastSquaresSolution<T>, QrError> {
    let (m, n) = a.dim();
    if m < n {
        return Err(QrError::Underdetermined { rows: m, cols: n });
    }
    if b.len() != m {
        return Err(QrError::DimensionMismatch {
            expected: m,
            got: b.len(),
        });
    }

    #[cfg(feature = "ndarray-linalg")]
    {
        svd_lstsq(a, b)
    }

    #[cfg(not(feature = "ndarray-linalg"))]
    {
        householder_lstsq(a, b)
    }
}

#[cfg(feature = "ndarray-linalg")]
fn svd_lstsq<T: DenseField>(
    a: &Array2<T>,
    b: &Array1<T>,
) -> Result<LeastSquaresSolution<T>, QrError> {
    let n = a.ncols();
    let result = a.least_squares(b).map_err(|_| QrError::RankDeficient {
        column: 0,
        diagonal: 0.0,
    })?;

    let sigma = &result.singular_values;
    let max_sv = sigma.iter().fold(T::zero(), |acc, v| Float::max(acc, *v));
    let min_sv = sigma
        .iter()
        .fold(T::max_value(), |acc, v| Float::min(acc, *v));
    let rank = usize::try_from(result.rank).unwrap_or(0);
    if rank < n {
        return Err(QrError::RankDeficient {
            column: rank,
            diagonal: sigma
                .get(rank)
                .and_then(|v| v.to_f64())
                .unwrap_or(0.0),
        });
    }

    let x = result.solution;
    let residual = a.dot(&x) - b;
    Ok(LeastSquaresSolution {
        residual_norm: view_norm(residual.view()),
        rcond: if max_sv > T::zero() {
            min_sv / max_sv
        } else {
            T::zero()
        },
        x,
    })
}

/// Householder QR least squares; `a` is tall or square and `b` matches its rows
#[cfg_attr(feature = "ndarray-linalg", allow(dead_code))]
pub(crate) fn householder_lstsq<T: RealField>(
    a: &Array2<T>,
    b: &Array1<T>,
) -> Result<LeastSquaresSolution<T>, QrError> {
    let (m, n) = a.dim();
    let mut r = a.clone();
    let mut qtb = b.clone();
    let scale = a.iter().fold(T::zero(), |acc, v| acc.max(v.abs()));
    let threshold = T::from_count(m.max(1)) * T::epsilon() * scale;

    for k in 0..n {
        let alpha = view_norm(r.slice(s![k.., k]));
        if alpha <= threshold {
            return Err(QrError::RankDeficient {
                column: k,
                diagonal: alpha.to_f64().unwrap_or(f64::NAN),
            });
        }

        // Householder vector v = x + sign(x_0) ||x|| e_0
        let sign = if r[[k, k]] >= T::zero() {
            T::one()
        } else {
            -T::one()
        };
        let mut v: Array1<T> = r.slice(s![k.., k]).to_owned();
        v[0] += sign * alpha;
        let v_norm_sq = v.iter().fold(T::zero(), |acc, x| acc + *x * *x);
        let two = T::one() + T::one();

        // Apply H = I - 2 v v^T / (v^T v) to the trailing columns
        for j in k..n {
            let mut dot = T::zero();
            for (i, vi) in v.iter().enumerate() {
                dot += *vi * r[[k + i, j]];
            }
            let factor = two * dot / v_norm_sq;
            for (i, vi) in v.iter().enumerate() {
                r[[k + i, j]] -= factor * *vi;
            }
        }

        let mut dot = T::zero();
        for (i, vi) in v.iter().enumerate() {
            dot += *vi * qtb[k + i];
        }
        let factor = two * dot / v_norm_sq;
        for (i, vi) in v.iter().enumerate() {
            qtb[k + i] -= factor * *vi;
        }
    }

    // Back substitution with the upper triangle of R
    let mut x = Array1::from_elem(n, T::zero());
    for i in (0..n).rev() {
        let mut sum = qtb[i];
        for j in (i + 1)..n {
            sum -= r[[i, j]] * x[j];
        }
        x[i] = sum / r[[i, i]];
    }

    let residual_norm = if m > n {
        view_norm(qtb.slice(s![n..]))
    } else {
        T::zero()
    };

    let mut min_diag = T::max_value();
    let mut max_diag = T::zero();
    for k in 0..n {
        let d = r[[k, k]].abs();
        min_diag = min_diag.min(d);
        max_diag = max_diag.max(d);
    }
    let rcond = if max_diag > T::zero() {
        min_diag / max_diag
    } else {
        T::zero()
    };

    Ok(LeastSquaresSolution {
        x,
        residual_norm,
        rcond,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_square_system_matches_exact_solution() {
        let a = array![[4.0_f64, 1.0], [1.0, 3.0]];
        let b = array![1.0_f64, 2.0];
        let sol = lstsq(&a, &b).expect("QR solve should succeed");

        let ax = a.dot(&sol.x);
        assert_relative_eq!(ax[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(ax[1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(sol.residual_norm, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_line_fit() {
        // Fit y = c0 + c1 t through (0, 1), (1, 3), (2, 5), (3, 7): exact line
        let a = array![[1.0_f64, 0.0], [1.0, 1.0], [1.0, 2.0], [1.0, 3.0]];
        let b = array![1.0_f64, 3.0, 5.0, 7.0];
        let sol = lstsq(&a, &b).expect("QR solve should succeed");
        assert_relative_eq!(sol.x[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(sol.x[1], 2.0, epsilon = 1e-12);
        assert!(sol.residual_norm < 1e-12);
    }

    #[test]
    fn test_inconsistent_system_residual() {
        // x = 1 and x = 3: best fit is x = 2 with residual sqrt(2)
        let a = array![[1.0_f64], [1.0]];
        let b = array![1.0_f64, 3.0];
        let sol = lstsq(&a, &b).expect("QR solve should succeed");
        assert_relative_eq!(sol.x[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(sol.residual_norm, 2.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_rank_deficient() {
        let a = array![[1.0_f64, 2.0], [2.0, 4.0], [3.0, 6.0]];
        let b = array![1.0_f64, 2.0, 3.0];
        assert!(matches!(lstsq(&a, &b), Err(QrError::RankDeficient { .. })));
    }

    #[test]
    fn test_tall_system_matches_householder() {
        let a = array![[1.0_f64, 0.5], [0.0, 2.0], [1.0, 1.0], [3.0, -1.0]];
        let b = array![1.0_f64, -1.0, 2.0, 0.5];
        let sol = lstsq(&a, &b).expect("least squares should succeed");
        let reference = householder_lstsq(&a, &b).expect("QR solve should succeed");

        assert_relative_eq!(sol.x[0], reference.x[0], epsilon = 1e-12);
        assert_relative_eq!(sol.x[1], reference.x[1], epsilon = 1e-12);
        assert_relative_eq!(sol.residual_norm, reference.residual_norm, epsilon = 1e-12);
        assert!(sol.rcond > 0.0 && sol.rcond <= 1.0);
    }

    #[test]
    fn test_underdetermined() {
        let a = Array2::<f64>::ones((2, 3));
        let b = Array1::<f64>::ones(2);
        assert!(matches!(
            lstsq(&a, &b),
            Err(QrError::Underdetermined { rows: 2, cols: 3 })
        ));
    }
}
