//! Constant-strength 2D line singularities
//!
//! Closed-form potential and velocity of a unit source or doublet distributed
//! along a straight panel, evaluated in the panel frame (x along the
//! tangent from the start point, z along the outward normal) with the panel
//! spanning `0 <= x <= length`. Velocities are exact derivatives of the
//! potentials.
//!
//! The expressions are singular only at the panel endpoints. Near an endpoint
//! the terms of that endpoint take their analytic limit where one exists
//! (`r ln r -> 0`) and are dropped otherwise.

use crate::core::constants::{PI2, PI4, VORTEX_CORE_SQ};
use crate::core::geometry::Panel2D;
use crate::core::types::Point2D;

/// Potential and velocity induced by a unit-strength element
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Influence2D {
    /// Potential
    pub potential: f64,
    /// Velocity in global axes
    pub velocity: Point2D,
}

/// Endpoint distances and angles seen from a local point
struct Geometry {
    dx1: f64,
    dx2: f64,
    r1_sq: f64,
    r2_sq: f64,
    dtheta: f64,
}

#[inline]
fn geometry(x: f64, z: f64, length: f64) -> Geometry {
    let dx1 = x;
    let dx2 = x - length;
    let theta1 = z.atan2(dx1);
    let theta2 = z.atan2(dx2);
    Geometry {
        dx1,
        dx2,
        r1_sq: dx1 * dx1 + z * z,
        r2_sq: dx2 * dx2 + z * z,
        dtheta: theta2 - theta1,
    }
}

#[inline]
fn x_log_r_sq(dx: f64, r_sq: f64) -> f64 {
    if r_sq > VORTEX_CORE_SQ {
        dx * r_sq.ln()
    } else {
        0.0
    }
}

/// Unit source potential in the panel frame
pub fn source_potential_local(x: f64, z: f64, length: f64) -> f64 {
    let g = geometry(x, z, length);
    (x_log_r_sq(g.dx1, g.r1_sq) - x_log_r_sq(g.dx2, g.r2_sq) + 2.0 * z * g.dtheta) / PI4
}

/// Unit source velocity `(u, w)` in the panel frame
pub fn source_velocity_local(x: f64, z: f64, length: f64) -> (f64, f64) {
    let g = geometry(x, z, length);
    let r1_sq = g.r1_sq.max(VORTEX_CORE_SQ);
    let r2_sq = g.r2_sq.max(VORTEX_CORE_SQ);
    ((r1_sq / r2_sq).ln() / PI4, g.dtheta / PI2)
}

/// Unit doublet potential in the panel frame
///
/// Tends to -1/2 just outside the panel and +1/2 just inside.
pub fn doublet_potential_local(x: f64, z: f64, length: f64) -> f64 {
    -geometry(x, z, length).dtheta / PI2
}

/// Unit doublet velocity `(u, w)` in the panel frame
pub fn doublet_velocity_local(x: f64, z: f64, length: f64) -> (f64, f64) {
    let g = geometry(x, z, length);
    let inv1 = if g.r1_sq > VORTEX_CORE_SQ { 1.0 / g.r1_sq } else { 0.0 };
    let inv2 = if g.r2_sq > VORTEX_CORE_SQ { 1.0 / g.r2_sq } else { 0.0 };
    let u = -(z * inv1 - z * inv2) / PI2;
    let w = (g.dx1 * inv1 - g.dx2 * inv2) / PI2;
    (u, w)
}

/// Unit source influence of `panel` at a global point
pub fn source_influence(panel: &Panel2D, point: &Point2D) -> Influence2D {
    let (x, z) = panel.to_local(point);
    let length = panel.length();
    let (u, w) = source_velocity_local(x, z, length);
    Influence2D {
        potential: source_potential_local(x, z, length),
        velocity: panel.to_global(u, w),
    }
}

/// Unit doublet influence of `panel` at a global point
pub fn doublet_influence(panel: &Panel2D, point: &Point2D) -> Influence2D {
    let (x, z) = panel.to_local(point);
    let length = panel.length();
    let (u, w) = doublet_velocity_local(x, z, length);
    Influence2D {
        potential: doublet_potential_local(x, z, length),
        velocity: panel.to_global(u, w),
    }
}
