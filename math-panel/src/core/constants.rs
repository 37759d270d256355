//! Numerical and physical constants

use std::f64::consts::PI;

/// 2π
pub const PI2: f64 = 2.0 * PI;

/// 4π
pub const PI4: f64 = 4.0 * PI;

/// Self-induced doublet potential coefficient (interior limit)
pub const DOUBLET_SELF_INFLUENCE: f64 = 0.5;

/// Default truncation length of wake panels and trailing legs
pub const DEFAULT_WAKE_LENGTH: f64 = 1.0e5;

/// Default reference density (kg/m³), sea-level standard atmosphere
pub const DEFAULT_DENSITY: f64 = 1.225;

/// Squared distance below which a filament is treated as passing through
/// the evaluation point (induced velocity set to zero)
pub const VORTEX_CORE_SQ: f64 = 1.0e-20;

/// Small epsilon for geometric comparisons
pub const GEOMETRY_EPS: f64 = 1.0e-12;

/// Default reciprocal condition threshold of the linear solve
pub const DEFAULT_CONDITION_LIMIT: f64 = 1.0e-13;

/// Speed below which a streamline is considered stagnated
pub const STAGNATION_SPEED: f64 = 1.0e-10;
