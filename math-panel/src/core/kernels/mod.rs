//! Singularity kernels
//!
//! Pure functions returning the potential and/or velocity of unit-strength
//! singularity elements:
//!
//! - `singularity2d`: constant source and doublet line panels
//! - `singularity3d`: constant doublet and source quadrilaterals, vortex rings
//! - `vortex`: Biot-Savart segments and horseshoe vortices

pub mod singularity2d;
pub mod singularity3d;
pub mod vortex;

pub use singularity2d::*;
pub use singularity3d::*;
pub use vortex::*;
