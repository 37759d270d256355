//! Iterative solvers for linear systems
//!
//! - [`gmres`]: Restarted GMRES, optionally left-preconditioned

mod gmres;

pub use gmres::{GmresConfig, GmresSolution, gmres, gmres_preconditioned};
