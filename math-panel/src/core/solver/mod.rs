//! Linear solve of the influence systems
//!
//! Dispatches to the dense solvers of `math-aero-solvers`:
//!
//! - `Direct` - LU with partial pivoting (square systems)
//! - `LeastSquares` - Householder QR (square or tall systems)
//! - `Gmres` - Jacobi-preconditioned restarted GMRES (square systems)
//!
//! Every failure is mapped to an [`AeroError`]; a solution is only returned
//! when it is finite and the condition estimate clears the configured limit.

use std::time::{Duration, Instant};

use ndarray::{Array1, Array2};

use math_aero_solvers::blas_helpers::{all_finite, vector_norm};
use math_aero_solvers::{
    DiagonalPreconditioner, GmresConfig, LuError, QrError, gmres_preconditioned, lstsq,
    lu_factorize,
};

use crate::core::config::{AnalysisConfig, LinearSolver};
use crate::core::error::{AeroError, Result};

/// Solution of one influence system
#[derive(Debug, Clone)]
pub struct LinearSolution {
    /// Singularity strengths or circulations
    pub strengths: Array1<f64>,
    /// Reciprocal condition estimate (`NaN` for iterative solves)
    pub rcond: f64,
    /// Norm of the residual `A x - b`
    pub residual_norm: f64,
    /// Iterations used (zero for direct solves)
    pub iterations: usize,
}

/// Wall-clock budget of one analysis
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    limit: Option<Duration>,
}

impl Deadline {
    /// Start the clock for an analysis
    pub fn start(config: &AnalysisConfig) -> Self {
        Self {
            start: Instant::now(),
            limit: config.max_solve_time(),
        }
    }

    /// Time elapsed since the start
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Fail with [`AeroError::Timeout`] once the budget is spent
    pub fn check(&self) -> Result<()> {
        match self.limit {
            Some(limit) if self.elapsed() > limit => Err(AeroError::Timeout {
                elapsed: self.elapsed(),
                limit,
            }),
            _ => Ok(()),
        }
    }
}

/// Check that the selected solver can handle an `rows x cols` system
pub fn check_solver_shape(rows: usize, cols: usize, solver: LinearSolver) -> Result<()> {
    if rows == cols || (solver == LinearSolver::LeastSquares && rows > cols) {
        return Ok(());
    }
    Err(AeroError::Configuration(format!(
        "{:?} solver cannot handle a {}x{} system{}",
        solver,
        rows,
        cols,
        if rows > cols {
            "; select the least-squares solver"
        } else {
            ""
        }
    )))
}

fn singular(matrix: &Array2<f64>, rcond: f64) -> AeroError {
    AeroError::SingularMatrix {
        rows: matrix.nrows(),
        cols: matrix.ncols(),
        rcond,
    }
}

fn residual_norm(matrix: &Array2<f64>, x: &Array1<f64>, rhs: &Array1<f64>) -> f64 {
    let r: Array1<f64> = matrix.dot(x) - rhs;
    vector_norm(&r)
}

/// Solve `A x = b` (or min ||A x - b|| for tall systems)
pub fn solve_influence_system(
    matrix: &Array2<f64>,
    rhs: &Array1<f64>,
    config: &AnalysisConfig,
) -> Result<LinearSolution> {
    let (rows, cols) = matrix.dim();
    if rhs.len() != rows {
        return Err(AeroError::PanelCountMismatch {
            expected: rows,
            got: rhs.len(),
        });
    }
    check_solver_shape(rows, cols, config.linear_solver)?;

    let solution = match config.linear_solver {
        LinearSolver::Direct => solve_direct(matrix, rhs, config)?,
        LinearSolver::LeastSquares => solve_least_squares(matrix, rhs, config)?,
        LinearSolver::Gmres => solve_gmres(matrix, rhs, config)?,
    };

    if !all_finite(&solution.strengths) {
        return Err(singular(matrix, solution.rcond));
    }
    if config.verbose {
        log::debug!(
            "solved {}x{} system ({:?}): rcond {:.3e}, residual {:.3e}, {} iterations",
            rows,
            cols,
            config.linear_solver,
            solution.rcond,
            solution.residual_norm,
            solution.iterations
        );
    }
    Ok(solution)
}

fn solve_direct(
    matrix: &Array2<f64>,
    rhs: &Array1<f64>,
    config: &AnalysisConfig,
) -> Result<LinearSolution> {
    let factorization = lu_factorize(matrix).map_err(|e| match e {
        LuError::SingularMatrix { .. } => singular(matrix, 0.0),
        LuError::DimensionMismatch { expected, got } => {
            AeroError::PanelCountMismatch { expected, got }
        }
    })?;
    let rcond = factorization.rcond_estimate();
    if rcond < config.condition_limit {
        return Err(singular(matrix, rcond));
    }
    let strengths = factorization
        .solve(rhs)
        .map_err(|_| singular(matrix, rcond))?;
    Ok(LinearSolution {
        residual_norm: residual_norm(matrix, &strengths, rhs),
        strengths,
        rcond,
        iterations: 0,
    })
}

fn solve_least_squares(
    matrix: &Array2<f64>,
    rhs: &Array1<f64>,
    config: &AnalysisConfig,
) -> Result<LinearSolution> {
    let solution = lstsq(matrix, rhs).map_err(|e| match e {
        QrError::RankDeficient { .. } => singular(matrix, 0.0),
        QrError::Underdetermined { rows, cols } => AeroError::Configuration(format!(
            "least-squares solve of an under-determined {}x{} system",
            rows, cols
        )),
        QrError::DimensionMismatch { expected, got } => {
            AeroError::PanelCountMismatch { expected, got }
        }
    })?;
    if solution.rcond < config.condition_limit {
        return Err(singular(matrix, solution.rcond));
    }
    Ok(LinearSolution {
        strengths: solution.x,
        rcond: solution.rcond,
        residual_norm: solution.residual_norm,
        iterations: 0,
    })
}

fn solve_gmres(
    matrix: &Array2<f64>,
    rhs: &Array1<f64>,
    config: &AnalysisConfig,
) -> Result<LinearSolution> {
    let gmres_config = GmresConfig::new(
        config.gmres_max_iterations,
        config.gmres_restart,
        config.gmres_tolerance,
    );
    let precond = DiagonalPreconditioner::from_matrix(matrix);
    let solution = gmres_preconditioned(matrix, &precond, rhs, &gmres_config);
    if !solution.converged {
        log::warn!(
            "GMRES did not converge after {} iterations (relative residual {:.3e})",
            solution.iterations,
            solution.residual
        );
        return Err(singular(matrix, f64::NAN));
    }
    Ok(LinearSolution {
        residual_norm: residual_norm(matrix, &solution.x, rhs),
        strengths: solution.x,
        rcond: f64::NAN,
        iterations: solution.iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_direct_and_gmres_agree() {
        let a = array![[4.0, 1.0, 0.5], [1.0, 3.0, 0.2], [0.3, 0.1, 2.0]];
        let b = array![1.0, 2.0, 3.0];
        let direct = solve_influence_system(&a, &b, &AnalysisConfig::default()).unwrap();
        let config = AnalysisConfig::default().with_linear_solver(LinearSolver::Gmres);
        let iterative = solve_influence_system(&a, &b, &config).unwrap();
        for i in 0..3 {
            assert_relative_eq!(direct.strengths[i], iterative.strengths[i], epsilon = 1e-8);
        }
        assert!(direct.rcond > 0.1);
        assert!(direct.residual_norm < 1e-12);
    }

    #[test]
    fn test_singular_matrix_reported() {
        let a = array![[1.0, 2.0], [2.0, 4.0]];
        let b = array![1.0, 2.0];
        let err = solve_influence_system(&a, &b, &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, AeroError::SingularMatrix { rows: 2, cols: 2, .. }));
    }

    #[test]
    fn test_tall_system_needs_least_squares() {
        let a = array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
        let b = array![1.0, 1.0, 2.0];
        let err = solve_influence_system(&a, &b, &AnalysisConfig::default()).unwrap_err();
        assert!(err.is_configuration_error());

        let config = AnalysisConfig::default().with_linear_solver(LinearSolver::LeastSquares);
        let x = solve_influence_system(&a, &b, &config).unwrap();
        assert_relative_eq!(x.strengths[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(x.strengths[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_rhs_gives_zero_strengths() {
        let a = array![[2.0, 1.0], [1.0, 2.0]];
        let b = Array1::zeros(2);
        let x = solve_influence_system(&a, &b, &AnalysisConfig::default()).unwrap();
        assert!(x.strengths.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_deadline() {
        let config = AnalysisConfig::default().with_max_solve_time(Duration::ZERO);
        let deadline = Deadline::start(&config);
        std::thread::sleep(Duration::from_millis(2));
        assert!(matches!(deadline.check(), Err(AeroError::Timeout { .. })));
        assert!(Deadline::start(&AnalysisConfig::default()).check().is_ok());
    }
}
