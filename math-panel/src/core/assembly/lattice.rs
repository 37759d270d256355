//! Vortex-lattice influence matrix

use ndarray::Array2;

use crate::core::assembly::assemble_rows;
use crate::core::geometry::{Horseshoe, TrailingLegs};
use crate::core::kernels::horseshoe_velocity;

/// Normal-wash influence matrix: `A[i, j]` is the velocity induced by a unit
/// horseshoe `j` at collocation point `i`, projected on normal `i`
pub fn lattice_influence_matrix(horseshoes: &[Horseshoe], legs: &TrailingLegs) -> Array2<f64> {
    let n = horseshoes.len();
    assemble_rows(n, n, |i, row| {
        let target = &horseshoes[i];
        for (j, source) in horseshoes.iter().enumerate() {
            row[j] = horseshoe_velocity(source, legs, &target.collocation, 1.0).dot(&target.normal);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::rectangular_lattice;
    use crate::core::types::Point3D;
    use approx::assert_relative_eq;

    fn legs() -> TrailingLegs {
        TrailingLegs {
            direction: Point3D::unit_x(),
            length: 1e5,
        }
    }

    #[test]
    fn test_diagonal_is_downwash() {
        let grid = rectangular_lattice(4.0, 1.0, 4, 1, false).unwrap();
        let hs: Vec<_> = grid.panels.iter().map(Horseshoe::from_panel).collect();
        let a = lattice_influence_matrix(&hs, &legs());
        for i in 0..4 {
            assert!(a[[i, i]] < 0.0);
        }
    }

    #[test]
    fn test_symmetric_planform_symmetric_matrix_entries() {
        let grid = rectangular_lattice(6.0, 1.0, 6, 1, false).unwrap();
        let hs: Vec<_> = grid.panels.iter().map(Horseshoe::from_panel).collect();
        let a = lattice_influence_matrix(&hs, &legs());
        // mirror images across the root influence each other alike
        assert_relative_eq!(a[[0, 1]], a[[5, 4]], max_relative = 1e-8);
        assert_relative_eq!(a[[2, 0]], a[[3, 5]], max_relative = 1e-8);
    }
}
