//! Potential-flow aerodynamic influence solver
//!
//! Steady, inviscid, incompressible flow over lifting bodies with three
//! discretizations sharing one pipeline (geometry -> influence assembly +
//! boundary closure -> linear solve -> nearfield evaluation):
//!
//! - 2D doublet-source panels for airfoils ([`AirfoilSolver`])
//! - 3D horseshoe vortex lattice for lifting surfaces ([`LatticeSolver`])
//! - 3D doublet quadrilaterals for thick wings ([`DoubletSolver`])
//!
//! ## Architecture
//!
//! - `types`: Points, vectors and the freestream description
//! - `constants`: Numerical constants and defaults
//! - `error`: Error taxonomy (geometry, singular system, configuration)
//! - `config`: Analysis configuration (JSON loadable)
//! - `geometry`: Panels, wakes, horseshoes, grids and test geometry generators
//! - `kernels`: Closed-form singularity potentials and velocities
//! - `assembly`: Dense influence matrix assembly
//! - `boundary`: Right-hand sides, Kutta rows and closure
//! - `solver`: Linear solve dispatch and time budget
//! - `postprocess`: Surface velocities, pressures, loads and streamlines
//! - `airfoil_solver`, `lattice_solver`, `doublet_solver`: High-level API
//! - `parallel`: Portable parallel iteration (rayon or sequential)

pub mod airfoil_solver;
pub mod assembly;
pub mod boundary;
pub mod config;
pub mod constants;
pub mod doublet_solver;
pub mod error;
pub mod geometry;
pub mod kernels;
pub mod lattice_solver;
pub mod parallel;
pub mod postprocess;
pub mod solver;
pub mod types;

// Re-exports for convenience
pub use airfoil_solver::{AirfoilSolution, AirfoilSolver, AssembledAirfoil};
pub use config::{AnalysisConfig, DirichletRhs, LinearSolver, WakeDirection};
pub use doublet_solver::{AssembledDoublet, DoubletSolution, DoubletSolver};
pub use error::{AeroError, Result};
pub use geometry::*;
pub use lattice_solver::{AssembledLattice, LatticeSolution, LatticeSolver, lattice_horseshoes};
pub use postprocess::{
    AirfoilCoefficients, ForceCoefficients, HorseshoeLoad, PanelSurfacePoint, SpanLoad,
    StagnationWarning, Streamline, StreamlineConfig, SurfaceDistribution2D,
};
pub use types::*;
