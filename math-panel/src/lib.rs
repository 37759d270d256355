//! # Panel: potential-flow aerodynamics
//!
//! Panel-method and vortex-lattice solver for steady, inviscid,
//! incompressible flow over airfoils and wings.
//!
//! ## Features
//!
//! - 2D doublet-source panel method with Kutta closure
//! - 3D vortex lattice with nearfield Kutta-Joukowski loads
//! - 3D doublet-panel (Neumann) method with least-squares closure
//! - Parallel influence assembly and case sweeps with Rayon
//!

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::too_many_arguments)] // Scientific code often has many parameters

pub mod core;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
