//! 2D Dirichlet (potential) influence matrices
//!
//! The doublet and source matrices give the perturbation potential at each
//! collocation point, evaluated on the interior side of the surface: the
//! self-induced doublet coefficient is the interior limit +1/2.

use ndarray::{Array1, Array2};

use crate::core::assembly::assemble_rows;
use crate::core::constants::DOUBLET_SELF_INFLUENCE;
use crate::core::geometry::{Panel2D, WakePanel2D};
use crate::core::kernels::{doublet_potential_local, source_potential_local};

/// Geometry-only potential influence matrices of an airfoil
#[derive(Debug, Clone)]
pub struct DirichletMatrices {
    /// Doublet potential influence (N x N)
    pub doublet: Array2<f64>,
    /// Source potential influence (N x N)
    pub source: Array2<f64>,
    /// Wake doublet potential at each collocation point (N)
    pub wake: Array1<f64>,
}

/// Doublet potential influence matrix with the +1/2 self term on the diagonal
pub fn doublet_potential_matrix_2d(panels: &[Panel2D]) -> Array2<f64> {
    let n = panels.len();
    let collocation: Vec<_> = panels.iter().map(Panel2D::collocation_point).collect();
    assemble_rows(n, n, |i, row| {
        for (j, panel) in panels.iter().enumerate() {
            row[j] = if i == j {
                DOUBLET_SELF_INFLUENCE
            } else {
                let (x, z) = panel.to_local(&collocation[i]);
                doublet_potential_local(x, z, panel.length())
            };
        }
    })
}

/// Source potential influence matrix
///
/// The self term is the closed-form value at the panel midpoint.
pub fn source_potential_matrix_2d(panels: &[Panel2D]) -> Array2<f64> {
    let n = panels.len();
    let collocation: Vec<_> = panels.iter().map(Panel2D::collocation_point).collect();
    assemble_rows(n, n, |i, row| {
        for (j, panel) in panels.iter().enumerate() {
            let length = panel.length();
            row[j] = if i == j {
                source_potential_local(0.5 * length, 0.0, length)
            } else {
                let (x, z) = panel.to_local(&collocation[i]);
                source_potential_local(x, z, length)
            };
        }
    })
}

/// Wake doublet potential at each collocation point
pub fn wake_potential_column(panels: &[Panel2D], wake: &WakePanel2D) -> Array1<f64> {
    let length = wake.length();
    panels
        .iter()
        .map(|p| {
            let (x, z) = wake.panel.to_local(&p.collocation_point());
            doublet_potential_local(x, z, length)
        })
        .collect()
}

/// Assemble all geometry-only matrices of an airfoil
pub fn assemble_dirichlet(panels: &[Panel2D], wake: &WakePanel2D) -> DirichletMatrices {
    DirichletMatrices {
        doublet: doublet_potential_matrix_2d(panels),
        source: source_potential_matrix_2d(panels),
        wake: wake_potential_column(panels, wake),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::naca4_panels;
    use crate::core::types::Point2D;
    use approx::assert_relative_eq;

    #[test]
    fn test_isolated_panel_self_influence() {
        for (p1, p2) in [
            (Point2D::new(0.0, 0.0), Point2D::new(1.0, 0.0)),
            (Point2D::new(-3.0, 7.0), Point2D::new(-2.5, 6.1)),
        ] {
            let m = doublet_potential_matrix_2d(&[Panel2D::new(p1, p2)]);
            assert_eq!(m[[0, 0]], 0.5);
        }
    }

    #[test]
    fn test_closed_body_row_sums() {
        // a closed body seen from its own surface (interior side) has
        // doublet row sums of one
        let panels = naca4_panels("0012", 40).unwrap();
        let m = doublet_potential_matrix_2d(&panels);
        for i in 0..panels.len() {
            let sum: f64 = m.row(i).sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_wake_column_is_small_far_from_wake() {
        let panels = naca4_panels("0012", 20).unwrap();
        let wake = WakePanel2D::new(Point2D::new(1.0, 0.0), Point2D::new(1.0, 0.0), 100.0).unwrap();
        let column = wake_potential_column(&panels, &wake);
        // leading-edge panels see the wake under a small angle
        assert!(column[10].abs() < 0.05);
        // trailing-edge panels on either side see opposite halves
        assert!(column[0] * column[19] < 0.0);
    }
}
