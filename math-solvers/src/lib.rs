//! Dense linear solvers for aerodynamic influence systems
//!
//! This crate provides the direct, least-squares and iterative solvers used by
//! the panel and vortex-lattice methods of `math-aero-panel`.
//!
//! # Features
//!
//! - **Direct Solvers**: LU decomposition with partial pivoting and a pivot
//!   based condition estimate
//! - **Least Squares**: Householder QR for over-determined systems
//! - **Iterative Solvers**: Restarted GMRES with optional Jacobi preconditioning
//! - **Generic Scalar Types**: Works with any `num_traits::Float` type (f64, f32)
//! - **LAPACK backend**: the `ndarray-linalg` feature routes [`lu_solve`] and
//!   [`lstsq`] through `ndarray-linalg`; the pure-Rust code is the fallback
//!
//! # Example
//!
//! ```
//! use math_aero_solvers::lu_solve;
//! use ndarray::array;
//!
//! let a = array![[4.0_f64, 1.0], [1.0, 3.0]];
//! let b = array![1.0_f64, 2.0];
//! let x = lu_solve(&a, &b).unwrap();
//! assert!((a.dot(&x)[0] - 1.0).abs() < 1e-12);
//! ```

pub mod blas_helpers;
pub mod direct;
pub mod iterative;
pub mod preconditioners;
pub mod traits;

// Re-export main types
pub use traits::{DenseField, LinearOperator, Preconditioner, RealField};

// Re-export direct solvers
pub use direct::{
    LeastSquaresSolution, LuError, LuFactorization, QrError, lstsq, lu_factorize, lu_solve,
};

// Re-export iterative solvers
pub use iterative::{GmresConfig, GmresSolution, gmres, gmres_preconditioned};

// Re-export preconditioners
pub use preconditioners::{DiagonalPreconditioner, IdentityPreconditioner};
