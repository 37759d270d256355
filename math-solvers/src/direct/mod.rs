//! Direct solvers for linear systems
//!
//! This module provides direct (non-iterative) solvers:
//! - [`lu_solve`]: LU decomposition with partial pivoting for square systems
//! - [`lstsq`]: least squares for tall systems (Householder QR, or LAPACK SVD
//!   with the `ndarray-linalg` feature)

mod lu;
mod qr;

pub use lu::{LuError, LuFactorization, lu_factorize, lu_solve};
pub use qr::{LeastSquaresSolution, QrError, lstsq};
