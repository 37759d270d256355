//! Boundary conditions and Kutta closure
//!
//! Right-hand sides for the three formulations and the trailing-edge rows
//! that couple wake unknowns to the body:
//!
//! - 2D Dirichlet: zero interior perturbation potential (sources carry the
//!   freestream) or zero interior total potential (doublets only), plus one
//!   Kutta row `μ_1 - μ_N + μ_w = rhs`.
//! - 3D vortex lattice: zero normal velocity at each collocation point.
//! - 3D Neumann doublet panels: zero normal velocity, one Kutta row per
//!   spanwise wake strip and an optional doublet closure row.
//!
//! Body rotation enters through the onset velocity `V∞ - Ω × r` of the 3D
//! paths only.

use ndarray::{Array1, Array2, s};

use crate::core::assembly::DirichletMatrices;
use crate::core::config::{DirichletRhs, WakeDirection};
use crate::core::error::{AeroError, Result};
use crate::core::geometry::{Horseshoe, Panel2D, Panel3D, PanelGrid, trailing_edge_bisector};
use crate::core::types::{Freestream, Point2D, Point3D};

/// Shedding direction of the 2D wake panel
pub fn wake_direction_2d(
    panels: &[Panel2D],
    freestream: &Freestream,
    direction: WakeDirection,
) -> Result<Point2D> {
    match direction {
        WakeDirection::Freestream => {
            let (sa, ca) = freestream.alpha.sin_cos();
            Ok(Point2D::new(ca, sa))
        }
        WakeDirection::Bisector => trailing_edge_bisector(panels).ok_or_else(|| {
            AeroError::Configuration("trailing-edge bisector is undefined".to_string())
        }),
        WakeDirection::BodyX => Ok(Point2D::new(1.0, 0.0)),
    }
}

/// Direction of the 3D trailing legs and wake panels
pub fn trailing_direction_3d(freestream: &Freestream, direction: WakeDirection) -> Result<Point3D> {
    match direction {
        WakeDirection::Freestream => Ok(freestream.direction()),
        WakeDirection::BodyX => Ok(Point3D::unit_x()),
        WakeDirection::Bisector => Err(AeroError::Configuration(
            "bisector wake direction only applies to 2D airfoils".to_string(),
        )),
    }
}

/// Source strengths `σ_j = -U·n_j`
pub fn source_strengths(panels: &[Panel2D], velocity: &Point2D) -> Array1<f64> {
    panels.iter().map(|p| -velocity.dot(&p.normal())).collect()
}

/// `(N+1) x (N+1)` Dirichlet matrix: doublet block, wake column and Kutta row
pub fn dirichlet_matrix_with_kutta(matrices: &DirichletMatrices) -> Array2<f64> {
    let n = matrices.doublet.nrows();
    let mut a = Array2::zeros((n + 1, n + 1));
    a.slice_mut(s![..n, ..n]).assign(&matrices.doublet);
    a.slice_mut(s![..n, n]).assign(&matrices.wake);
    if n > 0 {
        a[[n, 0]] += 1.0;
        a[[n, n - 1]] -= 1.0;
    }
    a[[n, n]] = 1.0;
    a
}

/// Dirichlet right-hand side, Kutta entry last
///
/// `sources` must be the strengths of [`source_strengths`] when the source
/// formulation is selected; it is ignored otherwise.
pub fn dirichlet_rhs(
    panels: &[Panel2D],
    matrices: &DirichletMatrices,
    velocity: &Point2D,
    formulation: DirichletRhs,
    sources: &Array1<f64>,
) -> Array1<f64> {
    let n = panels.len();
    let mut rhs = Array1::zeros(n + 1);
    match formulation {
        DirichletRhs::SourceProjection => {
            let induced = matrices.source.dot(sources);
            rhs.slice_mut(s![..n]).assign(&induced.mapv(|v| -v));
        }
        DirichletRhs::FreestreamPotential => {
            for (i, panel) in panels.iter().enumerate() {
                rhs[i] = -velocity.dot(&panel.collocation_point());
            }
            if let (Some(first), Some(last)) = (panels.first(), panels.last()) {
                rhs[n] = velocity.dot(&(last.collocation_point() - first.collocation_point()));
            }
        }
    }
    rhs
}

/// Vortex-lattice right-hand side `-(V∞ - Ω × c_i)·n_i`
pub fn lattice_rhs(horseshoes: &[Horseshoe], freestream: &Freestream) -> Array1<f64> {
    horseshoes
        .iter()
        .map(|h| -freestream.onset_velocity(&h.collocation).dot(&h.normal))
        .collect()
}

/// Neumann tangency right-hand side `-(V∞ - Ω × c_i)·n_i`
pub fn neumann_rhs(body: &[Panel3D], freestream: &Freestream) -> Array1<f64> {
    body.iter()
        .map(|p| {
            -freestream
                .onset_velocity(&p.collocation_point())
                .dot(&p.normal())
        })
        .collect()
}

/// Stack the Neumann tangency rows with the strip Kutta rows and, if
/// requested, the closure row
///
/// Unknowns are the body doublets (grid order) followed by one wake doublet
/// per spanwise strip. Strip `j` gets `μ_w - μ_upper + μ_lower = 0`, with the
/// upper and lower trailing-edge panels at the two ends of the wrapped
/// chordwise index. The closure row sets the area-weighted mean body doublet
/// to zero.
pub fn neumann_system(
    velocity_matrix: &Array2<f64>,
    tangency_rhs: &Array1<f64>,
    grid: &PanelGrid,
    closure_row: bool,
) -> Result<(Array2<f64>, Array1<f64>)> {
    let n_body = grid.len();
    let n_cols = n_body + grid.n_span;
    if velocity_matrix.dim() != (n_body, n_cols) {
        return Err(AeroError::PanelCountMismatch {
            expected: n_body * n_cols,
            got: velocity_matrix.len(),
        });
    }
    let n_rows = n_body + grid.n_span + usize::from(closure_row);

    let mut a = Array2::zeros((n_rows, n_cols));
    let mut rhs = Array1::zeros(n_rows);
    a.slice_mut(s![..n_body, ..]).assign(velocity_matrix);
    rhs.slice_mut(s![..n_body]).assign(tangency_rhs);

    for j in 0..grid.n_span {
        let row = n_body + j;
        a[[row, n_body + j]] = 1.0;
        a[[row, grid.index(0, j)]] -= 1.0;
        a[[row, grid.index(grid.n_chord - 1, j)]] += 1.0;
    }

    if closure_row {
        let total: f64 = grid.panels.iter().map(Panel3D::area).sum();
        let row = n_rows - 1;
        for (j, panel) in grid.panels.iter().enumerate() {
            a[[row, j]] = panel.area() / total;
        }
    }
    Ok((a, rhs))
}
