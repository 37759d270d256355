//! Jacobi (diagonal) preconditioner
//!
//! Influence matrices of panel methods carry the self-influence terms on the
//! diagonal, which makes plain diagonal scaling an effective preconditioner.

use crate::traits::{Preconditioner, RealField};
use ndarray::{Array1, Array2};

/// Diagonal (Jacobi) preconditioner: M = diag(A)⁻¹
#[derive(Debug, Clone)]
pub struct DiagonalPreconditioner<T: RealField> {
    inv_diag: Array1<T>,
}

impl<T: RealField> DiagonalPreconditioner<T> {
    /// Build from the diagonal of a dense square matrix
    ///
    /// Zero diagonal entries are left unscaled.
    pub fn from_matrix(matrix: &Array2<T>) -> Self {
        let n = matrix.nrows().min(matrix.ncols());
        let inv_diag = Array1::from_shape_fn(n, |i| {
            let d = matrix[[i, i]];
            if d.abs() > T::min_positive_value() {
                T::one() / d
            } else {
                T::one()
            }
        });
        Self { inv_diag }
    }

    /// Number of rows the preconditioner acts on
    pub fn len(&self) -> usize {
        self.inv_diag.len()
    }

    /// Whether the preconditioner is empty
    pub fn is_empty(&self) -> bool {
        self.inv_diag.is_empty()
    }
}

impl<T: RealField> Preconditioner<T> for DiagonalPreconditioner<T> {
    fn apply(&self, r: &Array1<T>) -> Array1<T> {
        r * &self.inv_diag
    }
}
