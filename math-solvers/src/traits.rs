//! Core traits for linear algebra operations
//!
//! This module defines the abstractions shared by the direct and iterative solvers:
//! - [`RealField`]: Trait for real scalar types
//! - [`DenseField`]: Scalars accepted by the direct solvers (LAPACK-backed with `ndarray-linalg`)
//! - [`LinearOperator`]: Trait for matrix-like objects that can perform matrix-vector products
//! - [`Preconditioner`]: Trait for preconditioning operations

use ndarray::{Array1, Array2};
use num_traits::{Float, FromPrimitive, NumAssign, ToPrimitive};
use std::fmt::Debug;

/// Trait for real scalar types that can be used in linear algebra operations.
///
/// Influence coefficients are real, so the solvers only need an ordered
/// floating-point field. Any type implementing `num_traits::Float` qualifies,
/// which leaves room for a forward-mode dual number in place of `f64`.
///
/// # Implementations
///
/// Blanket-implemented for every type satisfying the bounds, in particular:
/// - `f64` (default for aerodynamic influence matrices)
/// - `f32` (for memory-constrained applications)
pub trait RealField:
    Float + NumAssign + FromPrimitive + ToPrimitive + Send + Sync + Debug + 'static
{
    /// Convert a count into the scalar type, saturating at the largest value
    fn from_count(n: usize) -> Self {
        Self::from_usize(n).unwrap_or_else(Self::max_value)
    }

    /// Convert an `f64` constant into the scalar type
    fn from_const(x: f64) -> Self {
        Self::from_f64(x).unwrap_or_else(Self::epsilon)
    }
}

impl<T> RealField for T where
    T: Float + NumAssign + FromPrimitive + ToPrimitive + Send + Sync + Debug + 'static
{
}

/// Scalar types accepted by the dense direct solvers.
///
/// With the `ndarray-linalg` feature the LU and least-squares solves are
/// delegated to LAPACK, which adds the `Lapack` bound; otherwise this is
/// exactly [`RealField`].
#[cfg(feature = "ndarray-linalg")]
pub trait DenseField: RealField + ndarray_linalg::Lapack + ndarray_linalg::Scalar<Real = Self> {}

#[cfg(feature = "ndarray-linalg")]
impl<T> DenseField for T where
    T: RealField + ndarray_linalg::Lapack + ndarray_linalg::Scalar<Real = T>
{
}

#[cfg(not(feature = "ndarray-linalg"))]
pub trait DenseField: RealField {}

#[cfg(not(feature = "ndarray-linalg"))]
impl<T: RealField> DenseField for T {}

/// Trait for linear operators (matrices or matrix-free representations).
///
/// This abstraction allows solvers to work with dense influence matrices as
/// well as matrix-free (e.g. fast multipole) representations of the same
/// operator without changing the solver contract.
pub trait LinearOperator<T: RealField>: Send + Sync {
    /// Number of rows in the operator
    fn num_rows(&self) -> usize;

    /// Number of columns in the operator
    fn num_cols(&self) -> usize;

    /// Apply the operator: y = A * x
    fn apply(&self, x: &Array1<T>) -> Array1<T>;

    /// Apply the transpose: y = A^T * x
    fn apply_transpose(&self, x: &Array1<T>) -> Array1<T>;

    /// Check if the operator is square
    fn is_square(&self) -> bool {
        self.num_rows() == self.num_cols()
    }
}

impl<T: RealField> LinearOperator<T> for Array2<T> {
    fn num_rows(&self) -> usize {
        self.nrows()
    }

    fn num_cols(&self) -> usize {
        self.ncols()
    }

    fn apply(&self, x: &Array1<T>) -> Array1<T> {
        self.dot(x)
    }

    fn apply_transpose(&self, x: &Array1<T>) -> Array1<T> {
        self.t().dot(x)
    }
}

/// Trait for preconditioners used in iterative solvers.
///
/// A preconditioner M approximates A^(-1), so that M*A is better conditioned
/// than A alone. This accelerates convergence of iterative methods.
pub trait Preconditioner<T: RealField>: Send + Sync {
    /// Apply the preconditioner: y = M * r
    fn apply(&self, r: &Array1<T>) -> Array1<T>;
}

/// Identity preconditioner (no preconditioning)
#[derive(Clone, Debug, Default)]
pub struct IdentityPreconditioner;

impl<T: RealField> Preconditioner<T> for IdentityPreconditioner {
    fn apply(&self, r: &Array1<T>) -> Array1<T> {
        r.clone()
    }
}
