//! Panel and horseshoe geometry
//!
//! Read-only geometric records consumed by assembly: 2D line panels, 3D
//! quadrilaterals, wake panels, horseshoe vortices, structured grids and the
//! validation-case generators.

pub mod element;
pub mod generators;
pub mod grid;
pub mod horseshoe;
pub mod panel2d;
pub mod panel3d;

pub use element::*;
pub use generators::*;
pub use grid::*;
pub use horseshoe::*;
pub use panel2d::*;
pub use panel3d::*;
