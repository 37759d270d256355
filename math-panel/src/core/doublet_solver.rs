//! 3D doublet-panel analysis (Neumann formulation)
//!
//! Constant-strength doublet quadrilaterals on a wrapped wing grid, one wake
//! panel per spanwise strip. The system stacks
//!
//! - one tangency row per body panel (normal velocity from the vortex-ring
//!   equivalent of each doublet panel),
//! - one Kutta row per strip coupling the wake to the trailing-edge panels,
//! - optionally one closure row fixing the free constant of the doublet
//!   distribution.
//!
//! With the closure row the system is tall and is solved in the
//! least-squares sense, which is the default here.

use ndarray::{Array1, Array2, ArrayView1, s};

use crate::core::assembly::doublet_velocity_matrix;
use crate::core::boundary::{neumann_rhs, neumann_system, trailing_direction_3d};
use crate::core::config::{AnalysisConfig, LinearSolver};
use crate::core::error::{AeroError, Result};
use crate::core::geometry::{Panel, PanelGrid, ReferenceGeometry, WakePanel3D, influence};
use crate::core::postprocess::{
    ForceCoefficients, PanelSurfacePoint, Streamline, StreamlineConfig, interior_potential,
    pressure_coefficients_3d, surface_distribution, trace_streamline, wake_lift_coefficient,
};
use crate::core::solver::{Deadline, check_solver_shape, solve_influence_system};
use crate::core::types::{Freestream, Point3D};

/// Doublet-panel solver configuration
#[derive(Debug, Clone)]
pub struct DoubletSolver {
    /// Analysis settings
    pub config: AnalysisConfig,
}

impl Default for DoubletSolver {
    fn default() -> Self {
        Self {
            config: AnalysisConfig::default().with_linear_solver(LinearSolver::LeastSquares),
        }
    }
}

impl DoubletSolver {
    /// Create a solver with default settings (closure row, least squares)
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the analysis settings
    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate the inputs and build the Neumann system
    pub fn assemble<'a>(
        &self,
        grid: &'a PanelGrid,
        freestream: Freestream,
        reference: ReferenceGeometry,
    ) -> Result<AssembledDoublet<'a>> {
        self.config.validate()?;
        reference.validate()?;
        grid.validate()?;
        if grid.n_chord < 2 || grid.is_empty() {
            return Err(AeroError::Configuration(format!(
                "a wrapped wing grid needs at least two chordwise panels, got {}",
                grid.n_chord
            )));
        }
        let n_cols = grid.len() + grid.n_span;
        let n_rows = n_cols + usize::from(self.config.closure_row);
        check_solver_shape(n_rows, n_cols, self.config.linear_solver)?;

        let deadline = Deadline::start(&self.config);
        if self.config.verbose {
            log::info!(
                "Assembling doublet panels: {} x {} body panels, {} wake strips, {}x{} system",
                grid.n_chord,
                grid.n_span,
                grid.n_span,
                n_rows,
                n_cols
            );
        }

        let direction = trailing_direction_3d(&freestream, self.config.wake_direction)?;
        let wakes = (0..grid.n_span)
            .map(|j| {
                let (left, right) = grid.wrapped_trailing_edge(j);
                WakePanel3D::new(left, right, direction, self.config.wake_length, j)
            })
            .collect::<Result<Vec<_>>>()?;

        let velocity = doublet_velocity_matrix(&grid.panels, &wakes);
        let tangency = neumann_rhs(&grid.panels, &freestream);
        let (matrix, rhs) = neumann_system(&velocity, &tangency, grid, self.config.closure_row)?;
        deadline.check()?;

        let elements = grid
            .panels
            .iter()
            .copied()
            .map(Panel::Panel3D)
            .chain(wakes.iter().copied().map(Panel::WakePanel3D))
            .collect();

        Ok(AssembledDoublet {
            grid,
            freestream,
            reference,
            config: self.config.clone(),
            wakes,
            elements,
            matrix,
            rhs,
            deadline,
        })
    }

    /// Assemble and solve in one call
    pub fn solve<'a>(
        &self,
        grid: &'a PanelGrid,
        freestream: Freestream,
        reference: ReferenceGeometry,
    ) -> Result<DoubletSolution<'a>> {
        self.assemble(grid, freestream, reference)?.solve()
    }
}

/// Assembled, not yet solved, doublet-panel system
#[derive(Debug, Clone)]
pub struct AssembledDoublet<'a> {
    grid: &'a PanelGrid,
    freestream: Freestream,
    reference: ReferenceGeometry,
    config: AnalysisConfig,
    wakes: Vec<WakePanel3D>,
    elements: Vec<Panel>,
    matrix: Array2<f64>,
    rhs: Array1<f64>,
    deadline: Deadline,
}

impl<'a> AssembledDoublet<'a> {
    /// Stacked system matrix (tangency, Kutta and closure rows)
    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// Right-hand side
    pub fn rhs(&self) -> &Array1<f64> {
        &self.rhs
    }

    /// Wake panels, one per strip
    pub fn wakes(&self) -> &[WakePanel3D] {
        &self.wakes
    }

    /// Solve for the doublet strengths and recover surface pressures
    pub fn solve(self) -> Result<DoubletSolution<'a>> {
        self.deadline.check()?;
        let linear = solve_influence_system(&self.matrix, &self.rhs, &self.config)?;
        self.deadline.check()?;

        let n_body = self.grid.len();
        let strengths = linear.strengths;
        let surface = surface_distribution(
            self.grid,
            &self.wakes,
            strengths.view(),
            &self.freestream,
        );
        let coefficients =
            pressure_coefficients_3d(self.grid, &surface, &self.freestream, &self.reference);
        let lift_kutta = wake_lift_coefficient(
            &self.wakes,
            strengths.slice(s![n_body..]),
            &self.freestream,
            &self.reference,
        );

        if self.config.verbose {
            log::info!(
                "Doublet panels solved in {:.2?}: CL = {:.5} (pressure), {:.5} (wake), residual {:.3e}",
                self.deadline.elapsed(),
                coefficients.lift,
                lift_kutta,
                linear.residual_norm
            );
        }

        Ok(DoubletSolution {
            grid: self.grid,
            freestream: self.freestream,
            reference: self.reference,
            wakes: self.wakes,
            elements: self.elements,
            matrix: self.matrix,
            rhs: self.rhs,
            strengths,
            surface,
            coefficients,
            lift_kutta,
            rcond: linear.rcond,
            residual_norm: linear.residual_norm,
        })
    }
}

/// Solved doublet-panel system
#[derive(Debug, Clone)]
pub struct DoubletSolution<'a> {
    grid: &'a PanelGrid,
    freestream: Freestream,
    reference: ReferenceGeometry,
    wakes: Vec<WakePanel3D>,
    elements: Vec<Panel>,
    matrix: Array2<f64>,
    rhs: Array1<f64>,
    strengths: Array1<f64>,
    surface: Vec<PanelSurfacePoint>,
    coefficients: ForceCoefficients,
    lift_kutta: f64,
    rcond: f64,
    residual_norm: f64,
}

impl<'a> DoubletSolution<'a> {
    /// Body grid
    pub fn grid(&self) -> &'a PanelGrid {
        self.grid
    }

    /// Freestream of the analysis
    pub fn freestream(&self) -> &Freestream {
        &self.freestream
    }

    /// Reference geometry of the coefficients
    pub fn reference(&self) -> &ReferenceGeometry {
        &self.reference
    }

    /// Wake panels, one per strip
    pub fn wakes(&self) -> &[WakePanel3D] {
        &self.wakes
    }

    /// All doublet elements: body panels then wake panels
    pub fn elements(&self) -> &[Panel] {
        &self.elements
    }

    /// Stacked system matrix
    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// Right-hand side
    pub fn rhs(&self) -> &Array1<f64> {
        &self.rhs
    }

    /// Full solution vector: body doublets then wake doublets
    pub fn strengths(&self) -> &Array1<f64> {
        &self.strengths
    }

    /// Body panel doublet strengths
    pub fn body_strengths(&self) -> ArrayView1<'_, f64> {
        self.strengths.slice(s![..self.grid.len()])
    }

    /// Wake doublet strengths, one per strip
    pub fn wake_strengths(&self) -> ArrayView1<'_, f64> {
        self.strengths.slice(s![self.grid.len()..])
    }

    /// Surface velocity and pressure per body panel
    pub fn surface(&self) -> &[PanelSurfacePoint] {
        &self.surface
    }

    /// Pressure-integrated force and moment coefficients
    pub fn coefficients(&self) -> &ForceCoefficients {
        &self.coefficients
    }

    /// Lift coefficient from the wake strip strengths
    pub fn lift_kutta(&self) -> f64 {
        self.lift_kutta
    }

    /// Reciprocal condition estimate of the solve
    pub fn rcond(&self) -> f64 {
        self.rcond
    }

    /// Residual norm of the (least-squares) solve
    pub fn residual_norm(&self) -> f64 {
        self.residual_norm
    }

    /// Perturbation potential at an off-body point
    pub fn potential_at(&self, point: &Point3D) -> f64 {
        self.elements
            .iter()
            .zip(self.strengths.iter())
            .map(|(element, &mu)| mu * influence(element, point).potential)
            .sum()
    }

    /// Velocity relative to the body at an off-body point
    pub fn velocity_at(&self, point: &Point3D) -> Point3D {
        self.elements.iter().zip(self.strengths.iter()).fold(
            self.freestream.onset_velocity(point),
            |v, (element, &mu)| v + influence(element, point).velocity * mu,
        )
    }

    /// Perturbation potential just inside the body at each collocation point
    pub fn interior_potential(&self) -> Array1<f64> {
        interior_potential(self.grid, &self.wakes, self.strengths.view())
    }

    /// Trace a streamline from `seed`
    pub fn streamline(&self, seed: Point3D, config: &StreamlineConfig) -> Streamline<Point3D> {
        trace_streamline(seed, config, |p| self.velocity_at(p))
    }
}
