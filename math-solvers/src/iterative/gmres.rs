//! GMRES (Generalized Minimal Residual) solver
//!
//! Implementation of the restarted GMRES algorithm based on Saad & Schultz (1986).
//!
//! GMRES is often the best choice for large non-symmetric systems such as
//! aerodynamic influence matrices. It minimizes the residual in a Krylov
//! subspace and has smooth, monotonic convergence behavior.

use crate::blas_helpers::{axpy, inner_product, vector_norm};
use crate::traits::{IdentityPreconditioner, LinearOperator, Preconditioner, RealField};
use ndarray::{Array1, Array2};

/// GMRES solver configuration
#[derive(Debug, Clone)]
pub struct GmresConfig<R> {
    /// Maximum number of restart cycles
    pub max_iterations: usize,
    /// Krylov subspace dimension of one cycle
    pub restart: usize,
    /// Relative tolerance on the preconditioned residual
    pub tolerance: R,
}

impl Default for GmresConfig<f64> {
    fn default() -> Self {
        Self::new(100, 30, 1e-10)
    }
}

impl<R: RealField> GmresConfig<R> {
    pub fn new(max_iterations: usize, restart: usize, tolerance: R) -> Self {
        Self {
            max_iterations,
            restart: restart.max(1),
            tolerance,
        }
    }
}

/// GMRES solver result
#[derive(Debug)]
pub struct GmresSolution<T: RealField> {
    /// Solution vector
    pub x: Array1<T>,
    /// Total number of matrix-vector products
    pub iterations: usize,
    /// Final relative residual
    pub residual: T,
    /// Whether convergence was achieved
    pub converged: bool,
}

/// Solve Ax = b using the restarted GMRES method
pub fn gmres<T, A>(operator: &A, b: &Array1<T>, config: &GmresConfig<T>) -> GmresSolution<T>
where
    T: RealField,
    A: LinearOperator<T>,
{
    gmres_preconditioned(operator, &IdentityPreconditioner, b, config)
}

/// GMRES solver with preconditioner
///
/// Solves Ax = b using left preconditioning: M⁻¹Ax = M⁻¹b. Each cycle builds
/// an Arnoldi basis of at most `restart` vectors and stops early on
/// convergence or on a happy breakdown of the basis.
pub fn gmres_preconditioned<T, A, P>(
    operator: &A,
    precond: &P,
    b: &Array1<T>,
    config: &GmresConfig<T>,
) -> GmresSolution<T>
where
    T: RealField,
    A: LinearOperator<T>,
    P: Preconditioner<T>,
{
    let n = b.len();
    let mut x = Array1::from_elem(n, T::zero());

    let b_norm = vector_norm(&precond.apply(b));
    if b_norm <= T::min_positive_value() {
        return GmresSolution {
            x,
            iterations: 0,
            residual: T::zero(),
            converged: true,
        };
    }

    let cycle = Cycle {
        dimension: config.restart.max(1).min(n.max(1)),
        tolerance: config.tolerance,
        b_norm,
        breakdown_tol: T::from_const(1e-14) * b_norm,
    };
    let mut iterations = 0;

    for _ in 0..config.max_iterations {
        let r = precond.apply(&(b - &operator.apply(&x)));
        let beta = vector_norm(&r);
        if beta / b_norm < config.tolerance {
            return GmresSolution {
                x,
                iterations,
                residual: beta / b_norm,
                converged: true,
            };
        }

        let outcome = cycle.run(operator, precond, r, beta, &mut x);
        iterations += outcome.steps;
        log::trace!(
            "GMRES cycle: {} steps, relative residual {:.6e}",
            outcome.steps,
            outcome.residual.to_f64().unwrap_or(f64::NAN)
        );
        if outcome.residual < config.tolerance || outcome.breakdown {
            return GmresSolution {
                x,
                iterations,
                residual: outcome.residual,
                converged: outcome.residual < config.tolerance,
            };
        }
    }

    let r = precond.apply(&(b - &operator.apply(&x)));
    let residual = vector_norm(&r) / b_norm;
    GmresSolution {
        x,
        iterations,
        residual,
        converged: residual < config.tolerance,
    }
}

/// Parameters shared by every restart cycle
struct Cycle<T> {
    dimension: usize,
    tolerance: T,
    b_norm: T,
    breakdown_tol: T,
}

struct CycleOutcome<T> {
    steps: usize,
    residual: T,
    breakdown: bool,
}

impl<T: RealField> Cycle<T> {
    /// One Arnoldi cycle from the preconditioned residual `r` (norm `beta`);
    /// the minimizing correction is added to `x`
    fn run<A, P>(
        &self,
        operator: &A,
        precond: &P,
        r: Array1<T>,
        beta: T,
        x: &mut Array1<T>,
    ) -> CycleOutcome<T>
    where
        A: LinearOperator<T>,
        P: Preconditioner<T>,
    {
        let m = self.dimension;
        let mut basis: Vec<Array1<T>> = Vec::with_capacity(m + 1);
        basis.push(r.mapv(|ri| ri / beta));

        // Hessenberg matrix, reduced to upper triangular by Givens rotations
        let mut h: Array2<T> = Array2::from_elem((m + 1, m), T::zero());
        let mut rotations: Vec<(T, T)> = Vec::with_capacity(m);
        let mut g: Array1<T> = Array1::from_elem(m + 1, T::zero());
        g[0] = beta;

        let mut outcome = CycleOutcome {
            steps: 0,
            residual: beta / self.b_norm,
            breakdown: false,
        };

        for j in 0..m {
            let mut w = precond.apply(&operator.apply(&basis[j]));
            for (i, v) in basis.iter().enumerate() {
                let h_ij = inner_product(v, &w);
                h[[i, j]] = h_ij;
                axpy(-h_ij, v, &mut w);
            }
            let w_norm = vector_norm(&w);
            h[[j + 1, j]] = w_norm;
            outcome.breakdown = w_norm < self.breakdown_tol;
            if !outcome.breakdown {
                basis.push(w.mapv(|wi| wi / w_norm));
            }

            for (i, &(c, s)) in rotations.iter().enumerate() {
                let (upper, lower) = (h[[i, j]], h[[i + 1, j]]);
                h[[i, j]] = c * upper + s * lower;
                h[[i + 1, j]] = c * lower - s * upper;
            }
            let (c, s) = givens_rotation(h[[j, j]], h[[j + 1, j]]);
            rotations.push((c, s));
            h[[j, j]] = c * h[[j, j]] + s * h[[j + 1, j]];
            h[[j + 1, j]] = T::zero();
            let (upper, lower) = (g[j], g[j + 1]);
            g[j] = c * upper + s * lower;
            g[j + 1] = c * lower - s * upper;

            outcome.steps = j + 1;
            outcome.residual = g[j + 1].abs() / self.b_norm;
            if outcome.residual < self.tolerance || outcome.breakdown {
                break;
            }
        }

        let y = solve_upper_triangular(&h, &g, outcome.steps);
        for (v, &yi) in basis.iter().zip(y.iter()) {
            axpy(yi, v, x);
        }
        outcome
    }
}

/// Compute a Givens rotation (c, s) zeroing `b` in the vector (a, b)
#[inline]
fn givens_rotation<T: RealField>(a: T, b: T) -> (T, T) {
    if b == T::zero() {
        return (T::one(), T::zero());
    }
    let r = a.hypot(b);
    (a / r, b / r)
}

/// Solve the leading k×k upper triangular block of H against g
fn solve_upper_triangular<T: RealField>(h: &Array2<T>, g: &Array1<T>, k: usize) -> Array1<T> {
    let mut y = Array1::from_elem(k, T::zero());
    for i in (0..k).rev() {
        let mut sum = g[i];
        for j in (i + 1)..k {
            sum -= h[[i, j]] * y[j];
        }
        let diag = h[[i, i]];
        y[i] = if diag.abs() > T::min_positive_value() {
            sum / diag
        } else {
            T::zero()
        };
    }
    y
}
