//! 2D surface velocities, pressures and airfoil coefficients
//!
//! The tangential surface velocity follows from the doublet strengths:
//! outside the body the perturbation potential is `-μ` (plus the interior
//! potential, zero or `-U·r` depending on the formulation), so
//!
//! - source formulation: `V_t = U·t - dμ/ds`
//! - doublet-only formulation: `V_t = -dμ/ds`
//!
//! with `dμ/ds` a finite difference over the arc length between collocation
//! points (central inside, one-sided at the trailing-edge panels).

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::core::geometry::Panel2D;
use crate::core::types::Point2D;

/// Per-panel surface solution of an airfoil
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceDistribution2D {
    /// Arc length of each collocation point, measured from the first one
    pub arc_length: Vec<f64>,
    /// Collocation points
    pub points: Vec<Point2D>,
    /// Tangential velocity along the panel tangent
    pub tangential_velocity: Vec<f64>,
    /// Pressure coefficient
    pub pressure_coefficient: Vec<f64>,
}

/// Integrated airfoil coefficients at one angle of attack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AirfoilCoefficients {
    /// Angle of attack (rad)
    pub alpha: f64,
    /// Lift coefficient from pressure integration
    pub cl: f64,
    /// Pressure drag coefficient (zero in exact 2D potential flow)
    pub cd: f64,
    /// Pitching moment coefficient about the quarter chord, nose up positive
    pub cm: f64,
    /// Lift coefficient from the wake doublet jump (Kutta-Joukowski)
    pub cl_kutta: f64,
    /// Counter-clockwise circulation
    pub circulation: f64,
}

/// Arc length of the collocation points along the panel loop
pub fn collocation_arc_length(panels: &[Panel2D]) -> Vec<f64> {
    let mut s = Vec::with_capacity(panels.len());
    let mut acc = 0.0;
    for (i, panel) in panels.iter().enumerate() {
        if i > 0 {
            acc += 0.5 * (panels[i - 1].length() + panel.length());
        }
        s.push(acc);
    }
    s
}

/// Derivative of nodal values with respect to arc length
pub fn arc_derivative(values: &Array1<f64>, arc_length: &[f64]) -> Array1<f64> {
    let n = values.len();
    Array1::from_shape_fn(n, |i| {
        if n < 2 {
            return 0.0;
        }
        let (lo, hi) = match i {
            0 => (0, 1),
            _ if i == n - 1 => (n - 2, n - 1),
            _ => (i - 1, i + 1),
        };
        (values[hi] - values[lo]) / (arc_length[hi] - arc_length[lo])
    })
}

/// Tangential surface velocity from the solved doublet strengths
///
/// `onset` is the freestream velocity when the sources carry it, `None` for
/// the doublet-only formulation.
pub fn surface_velocity_2d(
    panels: &[Panel2D],
    doublets: &Array1<f64>,
    onset: Option<&Point2D>,
) -> Array1<f64> {
    let s = collocation_arc_length(panels);
    let dmu = arc_derivative(doublets, &s);
    Array1::from_shape_fn(panels.len(), |i| {
        let freestream = onset.map_or(0.0, |u| u.dot(&panels[i].tangent()));
        freestream - dmu[i]
    })
}

/// Pressure coefficients `1 - (V/U)²`; all zero for a body at rest
pub fn pressure_coefficients(velocity: &Array1<f64>, speed: f64) -> Array1<f64> {
    if speed == 0.0 {
        return Array1::zeros(velocity.len());
    }
    velocity.mapv(|v| 1.0 - (v / speed).powi(2))
}

/// Trailing-edge point, leading-edge point (farthest from the trailing edge)
/// and chord of a panel loop
pub fn chord_line(panels: &[Panel2D]) -> Option<(Point2D, Point2D, f64)> {
    let first = panels.first()?;
    let last = panels.last()?;
    let te = first.p1.midpoint(&last.p2);
    let le = panels
        .iter()
        .map(|p| p.p1)
        .max_by(|a, b| a.distance_to(&te).total_cmp(&b.distance_to(&te)))?;
    Some((te, le, le.distance_to(&te)))
}

/// Integrate surface pressures into (cl, cd, cm)
///
/// Forces are resolved in wind axes of angle `alpha`; the moment is taken
/// about the quarter chord.
pub fn integrate_pressure(panels: &[Panel2D], cp: &Array1<f64>, alpha: f64) -> (f64, f64, f64) {
    let Some((te, le, chord)) = chord_line(panels) else {
        return (0.0, 0.0, 0.0);
    };
    let reference = le + (te - le) * 0.25;
    let mut force = Point2D::zero();
    let mut moment = 0.0;
    for (panel, &c) in panels.iter().zip(cp.iter()) {
        let f = panel.normal() * (-c * panel.length() / chord);
        let arm = panel.collocation_point() - reference;
        force += f;
        // nose-up positive
        moment -= arm.cross(&f) / chord;
    }
    let (sa, ca) = alpha.sin_cos();
    let lift_axis = Point2D::new(-sa, ca);
    let drag_axis = Point2D::new(ca, sa);
    (force.dot(&lift_axis), force.dot(&drag_axis), moment)
}
