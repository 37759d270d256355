//! Thick-wing doublet-panel validation
//!
//! The doublet-panel wing is compared with a vortex lattice of the same
//! planform; both are thin-wing models of the same lift.

use approx::assert_relative_eq;
use math_aero_panel::core::{
    AnalysisConfig, DoubletSolver, Freestream, LatticeSolver, LinearSolver, Naca4, PanelGrid,
    Point3D, ReferenceGeometry, lattice_horseshoes, rectangular_lattice, thick_rectangular_wing,
};

const SPAN: f64 = 8.0;

fn thick_wing_with(section_points: usize, n_span: usize) -> PanelGrid {
    let section = Naca4::parse("0012").unwrap().points(section_points).unwrap();
    thick_rectangular_wing(&section, SPAN, n_span, true).unwrap()
}

fn thick_wing() -> PanelGrid {
    thick_wing_with(24, 8)
}

fn lattice_lift(alpha_deg: f64) -> f64 {
    let grid = rectangular_lattice(SPAN, 1.0, 16, 4, true).unwrap();
    let horseshoes = lattice_horseshoes(&grid);
    LatticeSolver::new()
        .assemble(
            &grid,
            &horseshoes,
            Freestream::from_degrees(1.0, alpha_deg),
            ReferenceGeometry::rectangular(SPAN, 1.0),
        )
        .unwrap()
        .solve()
        .unwrap()
        .coefficients()
        .lift
}

#[test]
fn test_thick_wing_lift_close_to_lattice() {
    let _ = env_logger::builder().is_test(true).try_init();
    let grid = thick_wing_with(80, 12);
    let solution = DoubletSolver::new()
        .with_config(
            AnalysisConfig::default()
                .with_linear_solver(LinearSolver::LeastSquares)
                .with_verbose(true),
        )
        .solve(
            &grid,
            Freestream::from_degrees(1.0, 5.0),
            ReferenceGeometry::rectangular(SPAN, 1.0),
        )
        .unwrap();
    let reference = lattice_lift(5.0);

    let kutta = solution.lift_kutta();
    assert!(kutta > 0.0, "wake lift = {}", kutta);
    let ratio = kutta / reference;
    assert!(ratio > 0.7 && ratio < 1.3, "wake lift ratio = {}", ratio);

    // surface pressures and wake circulation describe the same lift
    let c = solution.coefficients();
    assert_relative_eq!(c.lift, kutta, max_relative = 0.04);
    // inviscid pressure drag is induced drag only
    assert!(c.drag >= 0.0, "pressure drag = {}", c.drag);

    assert!(solution.residual_norm().is_finite());
    assert_eq!(solution.surface().len(), grid.len());
}

#[test]
fn test_zero_freestream_gives_zero_strengths() {
    let grid = thick_wing();
    let solution = DoubletSolver::new()
        .solve(
            &grid,
            Freestream::new(0.0, 0.1),
            ReferenceGeometry::rectangular(SPAN, 1.0),
        )
        .unwrap();
    assert!(solution.strengths().iter().all(|mu| *mu == 0.0));
    assert!(solution.surface().iter().all(|p| p.cp == 0.0));
    assert_eq!(solution.coefficients().force, Point3D::zero());
    assert_eq!(solution.lift_kutta(), 0.0);
}

#[test]
fn test_symmetric_wing_has_no_lateral_loads() {
    let grid = thick_wing();
    let solution = DoubletSolver::new()
        .solve(
            &grid,
            Freestream::from_degrees(1.0, 4.0),
            ReferenceGeometry::rectangular(SPAN, 1.0),
        )
        .unwrap();
    let c = solution.coefficients();
    assert!(c.side.abs() < 1e-8, "side = {}", c.side);
    assert!(c.roll.abs() < 1e-8, "roll = {}", c.roll);
    assert!(c.yaw.abs() < 1e-8, "yaw = {}", c.yaw);

    let wake = solution.wake_strengths();
    for j in 0..4 {
        assert_relative_eq!(wake[j], wake[7 - j], max_relative = 1e-8);
    }
}

#[test]
fn test_far_field_recovers_freestream() {
    let grid = thick_wing();
    let fs = Freestream::from_degrees(1.0, 4.0);
    let solution = DoubletSolver::new()
        .solve(&grid, fs, ReferenceGeometry::rectangular(SPAN, 1.0))
        .unwrap();
    let far = Point3D::new(-40.0, 0.0, 0.0);
    let v = solution.velocity_at(&far);
    assert!((v - fs.velocity()).length() < 1e-2, "far velocity = {:?}", v);
    assert!(solution.potential_at(&far).abs() < 1e-1);

    let interior = solution.interior_potential();
    assert_eq!(interior.len(), grid.len());
    assert!(interior.iter().all(|phi| phi.is_finite()));
}
