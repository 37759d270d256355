//! 2D airfoil analysis (doublet-source panel method)
//!
//! The analysis runs in two stages. [`AirfoilSolver::assemble`] validates the
//! panels, sheds the wake panel and builds the `(N+1) x (N+1)` Dirichlet
//! system with its Kutta row. [`AssembledAirfoil::solve`] consumes the
//! assembled system and returns an immutable [`AirfoilSolution`]; a new
//! flow condition needs a new assembly.
//!
//! # Example
//!
//! ```ignore
//! use math_aero_panel::core::{AirfoilSolver, Freestream, naca4_panels};
//!
//! let panels = naca4_panels("0012", 80)?;
//! let solution = AirfoilSolver::new()
//!     .assemble(&panels, Freestream::from_degrees(1.0, 4.0))?
//!     .solve()?;
//! println!("cl = {:.4}", solution.coefficients().cl);
//! ```

use ndarray::{Array1, Array2, s};

use crate::core::assembly::{
    DirichletMatrices, doublet_potential_matrix_2d, source_potential_matrix_2d,
    wake_potential_column,
};
use crate::core::boundary::{
    dirichlet_matrix_with_kutta, dirichlet_rhs, source_strengths, wake_direction_2d,
};
use crate::core::config::AnalysisConfig;
use crate::core::error::{AeroError, Result};
use crate::core::geometry::{Panel2D, WakePanel2D, enclosed_area, trailing_edge_point};
use crate::core::kernels::{doublet_influence, source_influence};
use crate::core::parallel::{is_parallel_available, parallel_map};
use crate::core::postprocess::{
    AirfoilCoefficients, Streamline, StreamlineConfig, SurfaceDistribution2D, chord_line,
    collocation_arc_length, integrate_pressure, pressure_coefficients, surface_velocity_2d,
    trace_streamline,
};
use crate::core::solver::{Deadline, solve_influence_system};
use crate::core::types::{Freestream, Point2D};

/// 2D airfoil solver configuration
#[derive(Debug, Clone, Default)]
pub struct AirfoilSolver {
    /// Analysis settings
    pub config: AnalysisConfig,
}

impl AirfoilSolver {
    /// Create a solver with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the analysis settings
    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    fn check_inputs(&self, panels: &[Panel2D], freestream: &Freestream) -> Result<()> {
        self.config.validate()?;
        if panels.len() < 2 {
            return Err(AeroError::geometry(
                panels.len(),
                "an airfoil needs at least two panels",
            ));
        }
        for (i, panel) in panels.iter().enumerate() {
            panel.validate(i)?;
        }
        if enclosed_area(panels) <= 0.0 {
            return Err(AeroError::geometry(
                0,
                "panels must run counter-clockwise around the airfoil",
            ));
        }
        if freestream.is_rotating() {
            return Err(AeroError::Configuration(
                "body rates are not supported by the 2D airfoil solver".to_string(),
            ));
        }
        if !(freestream.speed.is_finite() && freestream.alpha.is_finite()) {
            return Err(AeroError::Configuration(format!(
                "freestream speed and angle must be finite, got {:?}",
                freestream
            )));
        }
        Ok(())
    }

    /// Validate the inputs and build the Dirichlet system
    pub fn assemble<'a>(
        &self,
        panels: &'a [Panel2D],
        freestream: Freestream,
    ) -> Result<AssembledAirfoil<'a>> {
        self.check_inputs(panels, &freestream)?;
        let deadline = Deadline::start(&self.config);
        if self.config.verbose {
            log::info!(
                "Assembling airfoil system: {} panels, alpha = {:.3} deg",
                panels.len(),
                freestream.alpha.to_degrees()
            );
        }
        let doublet = doublet_potential_matrix_2d(panels);
        let source = source_potential_matrix_2d(panels);
        self.assemble_with(panels, freestream, doublet, source, deadline)
    }

    fn assemble_with<'a>(
        &self,
        panels: &'a [Panel2D],
        freestream: Freestream,
        doublet: Array2<f64>,
        source: Array2<f64>,
        deadline: Deadline,
    ) -> Result<AssembledAirfoil<'a>> {
        let te = trailing_edge_point(panels)
            .ok_or_else(|| AeroError::geometry(0, "no trailing edge"))?;
        let direction = wake_direction_2d(panels, &freestream, self.config.wake_direction)?;
        let wake = WakePanel2D::new(te, direction, self.config.wake_length)?;

        let matrices = DirichletMatrices {
            wake: wake_potential_column(panels, &wake),
            doublet,
            source,
        };
        let velocity = freestream.velocity_2d();
        let sources = if self.config.sources_enabled() {
            source_strengths(panels, &velocity)
        } else {
            Array1::zeros(panels.len())
        };
        let rhs = dirichlet_rhs(
            panels,
            &matrices,
            &velocity,
            self.config.dirichlet_rhs,
            &sources,
        );
        let matrix = dirichlet_matrix_with_kutta(&matrices);
        deadline.check()?;

        Ok(AssembledAirfoil {
            panels,
            freestream,
            config: self.config.clone(),
            wake,
            matrix,
            rhs,
            sources,
            deadline,
        })
    }

    /// Assemble and solve in one call
    pub fn solve<'a>(
        &self,
        panels: &'a [Panel2D],
        freestream: Freestream,
    ) -> Result<AirfoilSolution<'a>> {
        self.assemble(panels, freestream)?.solve()
    }

    /// Solve one independent system per angle of attack
    ///
    /// The geometry-only doublet and source matrices are built once and
    /// shared; wake, right-hand side and solve run per case in parallel.
    /// `freestream.alpha` is ignored in favour of `alphas`.
    pub fn solve_alpha_sweep<'a>(
        &self,
        panels: &'a [Panel2D],
        freestream: Freestream,
        alphas: &[f64],
    ) -> Result<Vec<AirfoilSolution<'a>>> {
        self.check_inputs(panels, &freestream)?;
        if self.config.verbose {
            log::info!(
                "Airfoil sweep: {} panels, {} angles of attack (parallel: {})",
                panels.len(),
                alphas.len(),
                is_parallel_available()
            );
        }
        let doublet = doublet_potential_matrix_2d(panels);
        let source = source_potential_matrix_2d(panels);
        parallel_map(alphas, |&alpha| {
            let case = Freestream { alpha, ..freestream };
            let deadline = Deadline::start(&self.config);
            self.assemble_with(panels, case, doublet.clone(), source.clone(), deadline)?
                .solve()
        })
        .into_iter()
        .collect()
    }
}

/// Assembled, not yet solved, airfoil system
#[derive(Debug, Clone)]
pub struct AssembledAirfoil<'a> {
    panels: &'a [Panel2D],
    freestream: Freestream,
    config: AnalysisConfig,
    wake: WakePanel2D,
    matrix: Array2<f64>,
    rhs: Array1<f64>,
    sources: Array1<f64>,
    deadline: Deadline,
}

impl<'a> AssembledAirfoil<'a> {
    /// Influence matrix with the Kutta row and wake column, `(N+1) x (N+1)`
    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// Right-hand side, Kutta entry last
    pub fn rhs(&self) -> &Array1<f64> {
        &self.rhs
    }

    /// Wake panel
    pub fn wake(&self) -> &WakePanel2D {
        &self.wake
    }

    /// Source strengths (zero when sources are disabled)
    pub fn source_strengths(&self) -> &Array1<f64> {
        &self.sources
    }

    /// Solve for the doublet strengths and recover the surface solution
    pub fn solve(self) -> Result<AirfoilSolution<'a>> {
        self.deadline.check()?;
        let linear = solve_influence_system(&self.matrix, &self.rhs, &self.config)?;
        self.deadline.check()?;

        let n = self.panels.len();
        let doublets = linear.strengths.slice(s![..n]).to_owned();
        let wake_strength = linear.strengths[n];

        let velocity = self.freestream.velocity_2d();
        let onset = self.config.sources_enabled().then_some(&velocity);
        let surface_velocity = surface_velocity_2d(self.panels, &doublets, onset);
        let pressure = pressure_coefficients(&surface_velocity, self.freestream.speed);

        let (cl, cd, cm) = integrate_pressure(self.panels, &pressure, self.freestream.alpha);
        let chord = chord_line(self.panels).map_or(0.0, |(_, _, c)| c);
        let uc = self.freestream.speed * chord;
        let coefficients = AirfoilCoefficients {
            alpha: self.freestream.alpha,
            cl,
            cd,
            cm,
            cl_kutta: if uc > 0.0 { 2.0 * wake_strength / uc } else { 0.0 },
            circulation: -wake_strength,
        };

        if self.config.verbose {
            log::info!(
                "Airfoil solved in {:.2?}: cl = {:.5}, cl (Kutta) = {:.5}, cm = {:.5}",
                self.deadline.elapsed(),
                coefficients.cl,
                coefficients.cl_kutta,
                coefficients.cm
            );
        }

        Ok(AirfoilSolution {
            panels: self.panels,
            freestream: self.freestream,
            wake: self.wake,
            matrix: self.matrix,
            rhs: self.rhs,
            sources: self.sources,
            strengths: linear.strengths,
            doublets,
            wake_strength,
            surface_velocity,
            pressure,
            coefficients,
            rcond: linear.rcond,
        })
    }
}

/// Solved airfoil system
#[derive(Debug, Clone)]
pub struct AirfoilSolution<'a> {
    panels: &'a [Panel2D],
    freestream: Freestream,
    wake: WakePanel2D,
    matrix: Array2<f64>,
    rhs: Array1<f64>,
    sources: Array1<f64>,
    strengths: Array1<f64>,
    doublets: Array1<f64>,
    wake_strength: f64,
    surface_velocity: Array1<f64>,
    pressure: Array1<f64>,
    coefficients: AirfoilCoefficients,
    rcond: f64,
}

impl<'a> AirfoilSolution<'a> {
    /// Panels the system was built on
    pub fn panels(&self) -> &'a [Panel2D] {
        self.panels
    }

    /// Freestream of the analysis
    pub fn freestream(&self) -> &Freestream {
        &self.freestream
    }

    /// Wake panel
    pub fn wake(&self) -> &WakePanel2D {
        &self.wake
    }

    /// Influence matrix with the Kutta row and wake column
    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// Right-hand side, Kutta entry last
    pub fn rhs(&self) -> &Array1<f64> {
        &self.rhs
    }

    /// Full solution vector: panel doublets then the wake doublet
    pub fn strengths(&self) -> &Array1<f64> {
        &self.strengths
    }

    /// Panel doublet strengths
    pub fn doublet_strengths(&self) -> &Array1<f64> {
        &self.doublets
    }

    /// Wake doublet strength
    pub fn wake_strength(&self) -> f64 {
        self.wake_strength
    }

    /// Panel source strengths
    pub fn source_strengths(&self) -> &Array1<f64> {
        &self.sources
    }

    /// Tangential surface velocity per panel
    pub fn surface_velocity(&self) -> &Array1<f64> {
        &self.surface_velocity
    }

    /// Pressure coefficient per panel
    pub fn pressure_coefficients(&self) -> &Array1<f64> {
        &self.pressure
    }

    /// Integrated coefficients
    pub fn coefficients(&self) -> &AirfoilCoefficients {
        &self.coefficients
    }

    /// Counter-clockwise circulation
    pub fn circulation(&self) -> f64 {
        self.coefficients.circulation
    }

    /// Reciprocal condition estimate of the solve
    pub fn rcond(&self) -> f64 {
        self.rcond
    }

    /// Surface distribution along the arc length
    pub fn surface_distribution(&self) -> SurfaceDistribution2D {
        SurfaceDistribution2D {
            arc_length: collocation_arc_length(self.panels),
            points: self.panels.iter().map(Panel2D::collocation_point).collect(),
            tangential_velocity: self.surface_velocity.to_vec(),
            pressure_coefficient: self.pressure.to_vec(),
        }
    }

    /// Total velocity at an off-body point
    pub fn velocity_at(&self, point: &Point2D) -> Point2D {
        let mut v = self.freestream.velocity_2d();
        for ((panel, &mu), &sigma) in self
            .panels
            .iter()
            .zip(self.doublets.iter())
            .zip(self.sources.iter())
        {
            v += doublet_influence(panel, point).velocity * mu;
            if sigma != 0.0 {
                v += source_influence(panel, point).velocity * sigma;
            }
        }
        v + doublet_influence(&self.wake.panel, point).velocity * self.wake_strength
    }

    /// Trace a streamline from `seed`
    pub fn streamline(&self, seed: Point2D, config: &StreamlineConfig) -> Streamline<Point2D> {
        trace_streamline(seed, config, |p| self.velocity_at(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::naca4_panels;
    use approx::assert_relative_eq;

    #[test]
    fn test_assembled_system_shape() {
        let panels = naca4_panels("0012", 20).unwrap();
        let assembled = AirfoilSolver::new()
            .assemble(&panels, Freestream::from_degrees(1.0, 3.0))
            .unwrap();
        assert_eq!(assembled.matrix().dim(), (21, 21));
        assert_eq!(assembled.rhs().len(), 21);
        assert_eq!(assembled.matrix()[[20, 0]], 1.0);
        assert_eq!(assembled.matrix()[[20, 19]], -1.0);
    }

    #[test]
    fn test_symmetric_airfoil_at_zero_incidence() {
        let panels = naca4_panels("0012", 40).unwrap();
        let solution = AirfoilSolver::new()
            .solve(&panels, Freestream::new(1.0, 0.0))
            .unwrap();
        assert!(solution.coefficients().cl.abs() < 1e-6);
        assert!(solution.coefficients().cl_kutta.abs() < 1e-6);
        assert!(solution.wake_strength().abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_panel_rejected() {
        let mut panels = naca4_panels("0012", 20).unwrap();
        panels[4].p2 = panels[4].p1;
        let err = AirfoilSolver::new()
            .assemble(&panels, Freestream::default())
            .unwrap_err();
        assert!(matches!(err, AeroError::Geometry { index: 4, .. }));
        assert!(AirfoilSolver::new().assemble(&[], Freestream::default()).is_err());
    }

    #[test]
    fn test_clockwise_loop_rejected() {
        let panels: Vec<Panel2D> = naca4_panels("2412", 20)
            .unwrap()
            .iter()
            .rev()
            .map(|p| Panel2D::new(p.p2, p.p1))
            .collect();
        let err = AirfoilSolver::new()
            .assemble(&panels, Freestream::default())
            .unwrap_err();
        assert!(err.is_geometry_error());
    }

    #[test]
    fn test_rotation_rejected() {
        let panels = naca4_panels("0012", 20).unwrap();
        let fs = Freestream::default().with_rates(crate::core::types::Point3D::new(0.0, 0.1, 0.0));
        let err = AirfoilSolver::new().assemble(&panels, fs).unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_far_field_velocity_is_freestream() {
        let panels = naca4_panels("2412", 40).unwrap();
        let fs = Freestream::from_degrees(1.0, 2.0);
        let solution = AirfoilSolver::new().solve(&panels, fs).unwrap();
        let v = solution.velocity_at(&Point2D::new(0.5, -500.0));
        let u = fs.velocity_2d();
        assert_relative_eq!(v.x, u.x, epsilon = 1e-3);
        assert_relative_eq!(v.y, u.y, epsilon = 1e-3);
    }
}
