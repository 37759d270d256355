//! 3D vortex-lattice analysis
//!
//! One horseshoe vortex per lifting-surface panel, bound leg on the quarter
//! chord and tangency enforced at the three-quarter chord. Circulations come
//! from the square normal-wash system; loads from the nearfield
//! Kutta-Joukowski law at the bound-leg midpoints.
//!
//! # Example
//!
//! ```ignore
//! use math_aero_panel::core::*;
//!
//! let grid = rectangular_lattice(8.0, 1.0, 16, 4, true)?;
//! let horseshoes = lattice_horseshoes(&grid);
//! let solution = LatticeSolver::new()
//!     .assemble(&grid, &horseshoes, Freestream::from_degrees(10.0, 4.0),
//!               ReferenceGeometry::rectangular(8.0, 1.0))?
//!     .solve()?;
//! println!("CL = {:.4}", solution.coefficients().lift);
//! ```

use ndarray::{Array1, Array2};

use crate::core::assembly::lattice_influence_matrix;
use crate::core::boundary::{lattice_rhs, trailing_direction_3d};
use crate::core::config::{AnalysisConfig, WakeDirection};
use crate::core::constants::GEOMETRY_EPS;
use crate::core::error::{AeroError, Result};
use crate::core::geometry::{Horseshoe, PanelGrid, ReferenceGeometry, TrailingLegs};
use crate::core::kernels::horseshoe_velocity;
use crate::core::parallel::{is_parallel_available, parallel_map};
use crate::core::postprocess::{
    ForceCoefficients, HorseshoeLoad, SpanLoad, Streamline, StreamlineConfig, nearfield_loads,
    span_loading, trace_streamline,
};
use crate::core::solver::{Deadline, solve_influence_system};
use crate::core::types::{Freestream, Point3D};

/// Horseshoe vortices of every panel of a lifting-surface grid, grid order
pub fn lattice_horseshoes(grid: &PanelGrid) -> Vec<Horseshoe> {
    grid.panels.iter().map(Horseshoe::from_panel).collect()
}

/// Vortex-lattice solver configuration
#[derive(Debug, Clone, Default)]
pub struct LatticeSolver {
    /// Analysis settings
    pub config: AnalysisConfig,
}

impl LatticeSolver {
    /// Create a solver with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the analysis settings
    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    fn check_inputs(
        &self,
        grid: &PanelGrid,
        horseshoes: &[Horseshoe],
        reference: &ReferenceGeometry,
    ) -> Result<()> {
        self.config.validate()?;
        reference.validate()?;
        grid.validate()?;
        if horseshoes.len() != grid.len() {
            return Err(AeroError::PanelCountMismatch {
                expected: grid.len(),
                got: horseshoes.len(),
            });
        }
        for (i, hs) in horseshoes.iter().enumerate() {
            let finite = hs.r1.is_finite() && hs.r2.is_finite() && hs.collocation.is_finite();
            if !finite {
                return Err(AeroError::geometry(i, "non-finite horseshoe point"));
            }
            if hs.bound_vector().length() <= GEOMETRY_EPS {
                return Err(AeroError::geometry(i, "zero-length bound leg"));
            }
        }
        Ok(())
    }

    fn legs(&self, freestream: &Freestream) -> Result<TrailingLegs> {
        Ok(TrailingLegs {
            direction: trailing_direction_3d(freestream, self.config.wake_direction)?,
            length: self.config.wake_length,
        })
    }

    /// Validate the inputs and build the lattice system
    pub fn assemble<'a>(
        &self,
        grid: &PanelGrid,
        horseshoes: &'a [Horseshoe],
        freestream: Freestream,
        reference: ReferenceGeometry,
    ) -> Result<AssembledLattice<'a>> {
        self.check_inputs(grid, horseshoes, &reference)?;
        let deadline = Deadline::start(&self.config);
        if self.config.verbose {
            log::info!(
                "Assembling vortex lattice: {} x {} horseshoes, alpha = {:.3} deg, beta = {:.3} deg",
                grid.n_chord,
                grid.n_span,
                freestream.alpha.to_degrees(),
                freestream.beta.to_degrees()
            );
        }
        let legs = self.legs(&freestream)?;
        let matrix = lattice_influence_matrix(horseshoes, &legs);
        self.finish_assembly(grid, horseshoes, freestream, reference, legs, matrix, deadline)
    }

    fn finish_assembly<'a>(
        &self,
        grid: &PanelGrid,
        horseshoes: &'a [Horseshoe],
        freestream: Freestream,
        reference: ReferenceGeometry,
        legs: TrailingLegs,
        matrix: Array2<f64>,
        deadline: Deadline,
    ) -> Result<AssembledLattice<'a>> {
        let rhs = lattice_rhs(horseshoes, &freestream);
        deadline.check()?;
        Ok(AssembledLattice {
            horseshoes,
            n_chord: grid.n_chord,
            freestream,
            reference,
            config: self.config.clone(),
            legs,
            matrix,
            rhs,
            deadline,
        })
    }

    /// Solve one independent lattice per angle of attack
    ///
    /// With body-fixed trailing legs the influence matrix does not depend on
    /// the flow and is built once for all cases.
    pub fn solve_alpha_sweep<'a>(
        &self,
        grid: &PanelGrid,
        horseshoes: &'a [Horseshoe],
        freestream: Freestream,
        reference: ReferenceGeometry,
        alphas: &[f64],
    ) -> Result<Vec<LatticeSolution<'a>>> {
        self.check_inputs(grid, horseshoes, &reference)?;
        if self.config.verbose {
            log::info!(
                "Lattice sweep: {} horseshoes, {} angles of attack (parallel: {})",
                horseshoes.len(),
                alphas.len(),
                is_parallel_available()
            );
        }
        let shared = match self.config.wake_direction {
            WakeDirection::BodyX => {
                let legs = self.legs(&freestream)?;
                Some((legs, lattice_influence_matrix(horseshoes, &legs)))
            }
            _ => None,
        };
        parallel_map(alphas, |&alpha| {
            let case = Freestream { alpha, ..freestream };
            let deadline = Deadline::start(&self.config);
            let (legs, matrix) = match &shared {
                Some((legs, matrix)) => (*legs, matrix.clone()),
                None => {
                    let legs = self.legs(&case)?;
                    (legs, lattice_influence_matrix(horseshoes, &legs))
                }
            };
            self.finish_assembly(grid, horseshoes, case, reference, legs, matrix, deadline)?
                .solve()
        })
        .into_iter()
        .collect()
    }
}

/// Assembled, not yet solved, vortex lattice
#[derive(Debug, Clone)]
pub struct AssembledLattice<'a> {
    horseshoes: &'a [Horseshoe],
    n_chord: usize,
    freestream: Freestream,
    reference: ReferenceGeometry,
    config: AnalysisConfig,
    legs: TrailingLegs,
    matrix: Array2<f64>,
    rhs: Array1<f64>,
    deadline: Deadline,
}

impl<'a> AssembledLattice<'a> {
    /// Normal-wash influence matrix
    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// Right-hand side `-(V∞ - Ω × r)·n`
    pub fn rhs(&self) -> &Array1<f64> {
        &self.rhs
    }

    /// Trailing legs shared by all horseshoes
    pub fn legs(&self) -> &TrailingLegs {
        &self.legs
    }

    /// Solve for the circulations and compute the nearfield loads
    pub fn solve(self) -> Result<LatticeSolution<'a>> {
        self.deadline.check()?;
        let linear = solve_influence_system(&self.matrix, &self.rhs, &self.config)?;
        self.deadline.check()?;

        let circulations = linear.strengths;
        let gammas = circulations.to_vec();
        let loads = nearfield_loads(
            self.horseshoes,
            &self.legs,
            &gammas,
            &self.freestream,
            &self.reference.moment_point,
        );
        let coefficients = ForceCoefficients::from_loads(&loads, &self.freestream, &self.reference);
        let span_load = span_loading(self.horseshoes, &loads, &self.freestream, self.n_chord);

        if self.config.verbose {
            log::info!(
                "Lattice solved in {:.2?}: CL = {:.5}, CDi = {:.6}, Cm = {:.5}",
                self.deadline.elapsed(),
                coefficients.lift,
                coefficients.drag,
                coefficients.pitch
            );
        }

        Ok(LatticeSolution {
            horseshoes: self.horseshoes,
            freestream: self.freestream,
            reference: self.reference,
            legs: self.legs,
            matrix: self.matrix,
            rhs: self.rhs,
            circulations,
            loads,
            coefficients,
            span_load,
            rcond: linear.rcond,
        })
    }
}

/// Solved vortex lattice
#[derive(Debug, Clone)]
pub struct LatticeSolution<'a> {
    horseshoes: &'a [Horseshoe],
    freestream: Freestream,
    reference: ReferenceGeometry,
    legs: TrailingLegs,
    matrix: Array2<f64>,
    rhs: Array1<f64>,
    circulations: Array1<f64>,
    loads: Vec<HorseshoeLoad>,
    coefficients: ForceCoefficients,
    span_load: Vec<SpanLoad>,
    rcond: f64,
}

impl<'a> LatticeSolution<'a> {
    /// Horseshoes the system was built on
    pub fn horseshoes(&self) -> &'a [Horseshoe] {
        self.horseshoes
    }

    /// Freestream of the analysis
    pub fn freestream(&self) -> &Freestream {
        &self.freestream
    }

    /// Reference geometry of the coefficients
    pub fn reference(&self) -> &ReferenceGeometry {
        &self.reference
    }

    /// Normal-wash influence matrix
    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// Right-hand side
    pub fn rhs(&self) -> &Array1<f64> {
        &self.rhs
    }

    /// Circulation of every horseshoe, grid order
    pub fn circulations(&self) -> &Array1<f64> {
        &self.circulations
    }

    /// Per-horseshoe loads
    pub fn loads(&self) -> &[HorseshoeLoad] {
        &self.loads
    }

    /// Aggregate force and moment coefficients
    pub fn coefficients(&self) -> &ForceCoefficients {
        &self.coefficients
    }

    /// Spanwise loading, one entry per strip
    pub fn span_load(&self) -> &[SpanLoad] {
        &self.span_load
    }

    /// Reciprocal condition estimate of the solve
    pub fn rcond(&self) -> f64 {
        self.rcond
    }

    /// Velocity relative to the body at a point: onset flow plus the
    /// velocity induced by every horseshoe
    pub fn velocity_at(&self, point: &Point3D) -> Point3D {
        self.horseshoes
            .iter()
            .zip(self.circulations.iter())
            .fold(self.freestream.onset_velocity(point), |v, (hs, &gamma)| {
                v + horseshoe_velocity(hs, &self.legs, point, gamma)
            })
    }

    /// Trace a streamline from `seed`
    pub fn streamline(&self, seed: Point3D, config: &StreamlineConfig) -> Streamline<Point3D> {
        trace_streamline(seed, config, |p| self.velocity_at(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::rectangular_lattice;
    use approx::assert_relative_eq;

    #[test]
    fn test_horseshoe_count_mismatch() {
        let grid = rectangular_lattice(4.0, 1.0, 4, 2, false).unwrap();
        let horseshoes = lattice_horseshoes(&grid);
        let err = LatticeSolver::new()
            .assemble(
                &grid,
                &horseshoes[..7],
                Freestream::default(),
                ReferenceGeometry::rectangular(4.0, 1.0),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            AeroError::PanelCountMismatch {
                expected: 8,
                got: 7
            }
        ));
    }

    #[test]
    fn test_single_horseshoe_at_rest() {
        let grid = rectangular_lattice(5.0, 1.0, 1, 1, false).unwrap();
        let horseshoes = lattice_horseshoes(&grid);
        let solution = LatticeSolver::new()
            .assemble(
                &grid,
                &horseshoes,
                Freestream::new(0.0, 0.0),
                ReferenceGeometry::rectangular(5.0, 1.0),
            )
            .unwrap()
            .solve()
            .unwrap();
        assert_eq!(solution.circulations()[0], 0.0);
        assert_eq!(solution.coefficients().force, Point3D::zero());
        assert_eq!(solution.coefficients().lift, 0.0);
    }

    #[test]
    fn test_tangency_met_at_collocation_points() {
        let grid = rectangular_lattice(6.0, 1.0, 6, 2, false).unwrap();
        let horseshoes = lattice_horseshoes(&grid);
        let solution = LatticeSolver::new()
            .assemble(
                &grid,
                &horseshoes,
                Freestream::from_degrees(1.0, 5.0),
                ReferenceGeometry::rectangular(6.0, 1.0),
            )
            .unwrap()
            .solve()
            .unwrap();
        for hs in &horseshoes {
            let v = solution.velocity_at(&hs.collocation);
            assert_relative_eq!(v.dot(&hs.normal), 0.0, epsilon = 1e-10);
        }
    }
}
