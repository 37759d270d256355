//! 3D doublet-panel influence matrices
//!
//! The Neumann matrix holds the normal velocity induced at each body
//! collocation point by unit doublets on every body and wake panel (one
//! column per unknown, body panels first). The potential matrix is its
//! Dirichlet counterpart, used to evaluate the interior potential.

use ndarray::Array2;

use crate::core::assembly::assemble_rows;
use crate::core::constants::DOUBLET_SELF_INFLUENCE;
use crate::core::geometry::{Panel3D, WakePanel3D};
use crate::core::kernels::{doublet_potential, doublet_velocity};

/// Doublet normal-velocity influence matrix, `N_body x (N_body + N_wake)`
pub fn doublet_velocity_matrix(body: &[Panel3D], wakes: &[WakePanel3D]) -> Array2<f64> {
    let n_body = body.len();
    let n_cols = n_body + wakes.len();
    assemble_rows(n_body, n_cols, |i, row| {
        let c = body[i].collocation_point();
        let n = body[i].normal();
        for (j, panel) in body.iter().enumerate() {
            row[j] = doublet_velocity(panel, &c).dot(&n);
        }
        for (k, wake) in wakes.iter().enumerate() {
            row[n_body + k] = doublet_velocity(&wake.panel, &c).dot(&n);
        }
    })
}

/// Doublet potential influence matrix, `N_body x (N_body + N_wake)`, with
/// the +1/2 self term (interior limit) on the diagonal
pub fn doublet_potential_matrix_3d(body: &[Panel3D], wakes: &[WakePanel3D]) -> Array2<f64> {
    let n_body = body.len();
    let n_cols = n_body + wakes.len();
    assemble_rows(n_body, n_cols, |i, row| {
        let c = body[i].collocation_point();
        for (j, panel) in body.iter().enumerate() {
            row[j] = if i == j {
                DOUBLET_SELF_INFLUENCE
            } else {
                doublet_potential(panel, &c)
            };
        }
        for (k, wake) in wakes.iter().enumerate() {
            row[n_body + k] = doublet_potential(&wake.panel, &c);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Point3D;
    use approx::assert_relative_eq;

    /// Unit cube with outward normals
    fn cube() -> Vec<Panel3D> {
        let p = |x: f64, y: f64, z: f64| Point3D::new(x, y, z);
        vec![
            // bottom (-z), top (+z)
            Panel3D::new(p(0., 0., 0.), p(0., 1., 0.), p(1., 1., 0.), p(1., 0., 0.)),
            Panel3D::new(p(0., 0., 1.), p(1., 0., 1.), p(1., 1., 1.), p(0., 1., 1.)),
            // front (-x), back (+x)
            Panel3D::new(p(0., 0., 0.), p(0., 0., 1.), p(0., 1., 1.), p(0., 1., 0.)),
            Panel3D::new(p(1., 0., 0.), p(1., 1., 0.), p(1., 1., 1.), p(1., 0., 1.)),
            // left (-y), right (+y)
            Panel3D::new(p(0., 0., 0.), p(1., 0., 0.), p(1., 0., 1.), p(0., 0., 1.)),
            Panel3D::new(p(0., 1., 0.), p(0., 1., 1.), p(1., 1., 1.), p(1., 1., 0.)),
        ]
    }

    #[test]
    fn test_cube_normals_outward() {
        let centre = Point3D::new(0.5, 0.5, 0.5);
        for panel in cube() {
            let out = panel.collocation_point() - centre;
            assert_relative_eq!(panel.normal().dot(&out), 0.5, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_closed_body_potential_row_sums() {
        let m = doublet_potential_matrix_3d(&cube(), &[]);
        for i in 0..6 {
            assert_eq!(m[[i, i]], 0.5);
            assert_relative_eq!(m.row(i).sum(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_constant_doublet_induces_no_velocity_on_closed_body() {
        // a uniform doublet sheet on a closed surface is a set of cancelling
        // vortex rings
        let m = doublet_velocity_matrix(&cube(), &[]);
        for i in 0..6 {
            assert_relative_eq!(m.row(i).sum(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_wake_columns_appended() {
        let body = cube();
        let wake = WakePanel3D::new(
            Point3D::new(1.0, 0.0, 0.5),
            Point3D::new(1.0, 1.0, 0.5),
            Point3D::unit_x(),
            10.0,
            0,
        )
        .unwrap();
        let m = doublet_velocity_matrix(&body, &[wake]);
        assert_eq!(m.dim(), (6, 7));
        assert!(m.column(6).iter().all(|v| v.is_finite()));
    }
}
