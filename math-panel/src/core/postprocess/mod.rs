//! Post-processing of solved singularity distributions
//!
//! - [`surface`]: 2D surface velocity, pressure and airfoil coefficients
//! - [`nearfield`]: Kutta-Joukowski loads of a vortex lattice
//! - [`pressure`]: 3D doublet-panel surface velocity and pressure forces
//! - [`streamlines`]: streamline tracing through any velocity field

pub mod nearfield;
pub mod pressure;
pub mod streamlines;
pub mod surface;

pub use nearfield::*;
pub use pressure::*;
pub use streamlines::*;
pub use surface::*;
