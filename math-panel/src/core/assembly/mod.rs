//! Influence matrix assembly
//!
//! Dense aerodynamic influence coefficient (AIC) matrices built from the
//! singularity kernels:
//!
//! - [`dirichlet`] - 2D doublet, source and wake potential influences
//! - [`neumann`] - 3D doublet velocity (tangency) and potential influences
//! - [`lattice`] - vortex-lattice horseshoe normal-wash influences
//!
//! Entry `A[i, j]` is the influence of unit singularity `j` at collocation
//! point `i`. Self-influence is selected by index, never by comparing
//! coordinates. Rows are independent and assembled in parallel with the
//! `parallel` feature.

pub mod dirichlet;
pub mod lattice;
pub mod neumann;

pub use dirichlet::*;
pub use lattice::*;
pub use neumann::*;

use ndarray::Array2;

use crate::core::parallel::parallel_map_indexed;

/// Assemble a dense matrix row by row
///
/// `row_fn(i, row)` fills row `i`; rows are computed independently.
pub(crate) fn assemble_rows<F>(n_rows: usize, n_cols: usize, row_fn: F) -> Array2<f64>
where
    F: Fn(usize, &mut [f64]) + Sync + Send,
{
    let rows: Vec<Vec<f64>> = parallel_map_indexed(n_rows, |i| {
        let mut row = vec![0.0; n_cols];
        row_fn(i, &mut row);
        row
    });
    let mut matrix = Array2::zeros((n_rows, n_cols));
    for (i, row) in rows.into_iter().enumerate() {
        for (j, value) in row.into_iter().enumerate() {
            matrix[[i, j]] = value;
        }
    }
    matrix
}
