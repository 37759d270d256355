//! 2D airfoil validation
//!
//! Compares the doublet-source panel method with thin-airfoil theory and
//! checks the internal consistency of its lift estimates.

use approx::assert_relative_eq;
use math_aero_panel::core::{
    AeroError, AirfoilSolver, AnalysisConfig, DirichletRhs, Freestream, LinearSolver, Point2D,
    StreamlineConfig, WakeDirection, naca4_panels,
};
use std::f64::consts::PI;
use std::time::Duration;

fn thin_airfoil_cl(alpha_deg: f64) -> f64 {
    2.0 * PI * alpha_deg.to_radians().sin()
}

#[test]
fn test_naca0012_lift_near_thin_airfoil_theory() {
    let _ = env_logger::builder().is_test(true).try_init();
    let panels = naca4_panels("0012", 40).unwrap();
    let solver =
        AirfoilSolver::new().with_config(AnalysisConfig::default().with_verbose(true));
    let solution = solver
        .solve(&panels, Freestream::from_degrees(1.0, 5.0))
        .unwrap();
    let c = solution.coefficients();
    let expected = thin_airfoil_cl(5.0);

    // 12% thickness lifts slightly more than the thin plate
    assert!(c.cl > expected, "cl = {}", c.cl);
    assert_relative_eq!(c.cl, expected, max_relative = 0.06);
    // pressure integration and wake circulation agree
    assert_relative_eq!(c.cl, c.cl_kutta, max_relative = 0.01);
    assert_relative_eq!(c.circulation, -0.5 * c.cl_kutta, epsilon = 1e-12);
    assert!(c.cd.abs() < 0.02);
}

#[test]
fn test_thin_section_matches_thin_airfoil_theory() {
    let panels = naca4_panels("0003", 80).unwrap();
    let solution = AirfoilSolver::new()
        .solve(&panels, Freestream::from_degrees(1.0, 5.0))
        .unwrap();
    assert_relative_eq!(
        solution.coefficients().cl,
        thin_airfoil_cl(5.0),
        max_relative = 0.05
    );
}

#[test]
fn test_formulations_agree() {
    let panels = naca4_panels("2412", 80).unwrap();
    let fs = Freestream::from_degrees(1.0, 4.0);
    let sources = AirfoilSolver::new().solve(&panels, fs).unwrap();
    let doublets = AirfoilSolver::new()
        .with_config(AnalysisConfig::default().with_dirichlet_rhs(DirichletRhs::FreestreamPotential))
        .solve(&panels, fs)
        .unwrap();
    assert!(doublets.source_strengths().iter().all(|s| *s == 0.0));
    assert_relative_eq!(
        sources.coefficients().cl_kutta,
        doublets.coefficients().cl_kutta,
        max_relative = 0.05
    );
    assert_relative_eq!(
        sources.coefficients().cl,
        doublets.coefficients().cl,
        max_relative = 0.05
    );
}

#[test]
fn test_symmetric_airfoil_zero_lift() {
    let panels = naca4_panels("0012", 40).unwrap();
    let solution = AirfoilSolver::new()
        .solve(&panels, Freestream::new(1.0, 0.0))
        .unwrap();
    assert!(solution.coefficients().cl.abs() < 1e-6);
    assert!(solution.coefficients().cm.abs() < 1e-6);
    // leading-edge stagnation
    let cp_max = solution
        .pressure_coefficients()
        .iter()
        .cloned()
        .fold(f64::MIN, f64::max);
    assert!(cp_max > 0.4 && cp_max <= 1.0, "cp max = {}", cp_max);
}

#[test]
fn test_cambered_airfoil() {
    let panels = naca4_panels("2412", 80).unwrap();
    let solution = AirfoilSolver::new()
        .solve(&panels, Freestream::new(1.0, 0.0))
        .unwrap();
    let c = solution.coefficients();
    // positive zero-incidence lift, nose-down moment
    assert!(c.cl > 0.15 && c.cl < 0.4, "cl = {}", c.cl);
    assert!(c.cm < 0.0, "cm = {}", c.cm);
}

#[test]
fn test_zero_freestream_gives_zero_solution() {
    let panels = naca4_panels("2412", 40).unwrap();
    for rhs in [DirichletRhs::SourceProjection, DirichletRhs::FreestreamPotential] {
        let solution = AirfoilSolver::new()
            .with_config(AnalysisConfig::default().with_dirichlet_rhs(rhs))
            .solve(&panels, Freestream::new(0.0, 0.1))
            .unwrap();
        assert!(solution.strengths().iter().all(|mu| *mu == 0.0));
        assert!(solution.pressure_coefficients().iter().all(|cp| *cp == 0.0));
        let c = solution.coefficients();
        assert_eq!((c.cl, c.cd, c.cm, c.cl_kutta), (0.0, 0.0, 0.0, 0.0));
    }
}

#[test]
fn test_alpha_sweep_matches_single_solves() {
    let panels = naca4_panels("0012", 40).unwrap();
    let alphas: Vec<f64> = [-2.0_f64, 0.0, 2.0, 4.0]
        .iter()
        .map(|a| a.to_radians())
        .collect();
    let solver = AirfoilSolver::new();
    let sweep = solver
        .solve_alpha_sweep(&panels, Freestream::new(1.0, 0.0), &alphas)
        .unwrap();
    assert_eq!(sweep.len(), 4);
    for (solution, &alpha) in sweep.iter().zip(&alphas) {
        let single = solver.solve(&panels, Freestream::new(1.0, alpha)).unwrap();
        assert_relative_eq!(
            solution.coefficients().cl,
            single.coefficients().cl,
            epsilon = 1e-10
        );
        assert_relative_eq!(solution.coefficients().alpha, alpha);
    }
    // lift grows with incidence, antisymmetric for a symmetric section
    assert!(sweep[3].coefficients().cl > sweep[2].coefficients().cl);
    assert_relative_eq!(
        sweep[0].coefficients().cl,
        -sweep[2].coefficients().cl,
        epsilon = 1e-8
    );
}

#[test]
fn test_wake_direction_has_small_effect() {
    let panels = naca4_panels("0012", 60).unwrap();
    let fs = Freestream::from_degrees(1.0, 4.0);
    let freestream_wake = AirfoilSolver::new().solve(&panels, fs).unwrap();
    for direction in [WakeDirection::Bisector, WakeDirection::BodyX] {
        let other = AirfoilSolver::new()
            .with_config(AnalysisConfig::default().with_wake_direction(direction))
            .solve(&panels, fs)
            .unwrap();
        assert_relative_eq!(
            freestream_wake.coefficients().cl_kutta,
            other.coefficients().cl_kutta,
            max_relative = 0.05
        );
    }
}

#[test]
fn test_gmres_matches_direct() {
    let panels = naca4_panels("2412", 40).unwrap();
    let fs = Freestream::from_degrees(1.0, 3.0);
    let direct = AirfoilSolver::new().solve(&panels, fs).unwrap();
    let config = AnalysisConfig::default().with_linear_solver(LinearSolver::Gmres);
    let iterative = AirfoilSolver::new().with_config(config).solve(&panels, fs).unwrap();
    assert_relative_eq!(
        direct.coefficients().cl,
        iterative.coefficients().cl,
        max_relative = 1e-6
    );
}

#[test]
fn test_time_limit_reported() {
    let panels = naca4_panels("0012", 40).unwrap();
    let config = AnalysisConfig::default().with_max_solve_time(Duration::ZERO);
    let err = AirfoilSolver::new()
        .with_config(config)
        .solve(&panels, Freestream::default())
        .unwrap_err();
    assert!(matches!(err, AeroError::Timeout { .. }));
}

#[test]
fn test_streamline_passes_over_airfoil() {
    let panels = naca4_panels("0012", 60).unwrap();
    let solution = AirfoilSolver::new()
        .solve(&panels, Freestream::new(1.0, 0.0))
        .unwrap();
    let line = solution.streamline(Point2D::new(-1.0, 0.3), &StreamlineConfig::new(0.05, 60));
    assert!(line.is_complete());
    assert_eq!(line.points.len(), 61);
    let end = line.points[60];
    assert!(end.x > 1.5);
    // stays above the upper surface
    for p in line.points.iter().filter(|p| p.x > 0.0 && p.x < 1.0) {
        assert!(p.y > 0.1, "streamline dips to {:?}", p);
    }
    let distribution = solution.surface_distribution();
    assert_eq!(distribution.points.len(), 60);
    assert_eq!(distribution.arc_length[0], 0.0);
}
