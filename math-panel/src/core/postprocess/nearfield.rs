//! Nearfield Kutta-Joukowski loads of a vortex lattice
//!
//! Each horseshoe carries force `ρ Γ (V × ℓ)` at the midpoint of its bound
//! leg, where `V` is the onset velocity plus the velocity induced there by
//! the trailing legs of every horseshoe. Bound legs are left out of `V`:
//! they are colinear with the load point of their own horseshoe and, on a
//! lattice without sweep, parallel to `ℓ` for all the others.

use serde::{Deserialize, Serialize};

use crate::core::geometry::{Horseshoe, ReferenceGeometry, TrailingLegs};
use crate::core::kernels::trailing_legs_velocity;
use crate::core::parallel::parallel_map_indexed;
use crate::core::types::{Freestream, Point3D};

/// Load carried by one horseshoe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorseshoeLoad {
    /// Load application point (bound leg midpoint)
    pub point: Point3D,
    /// Circulation
    pub circulation: f64,
    /// Local velocity at the load point
    pub local_velocity: Point3D,
    /// Force (N)
    pub force: Point3D,
    /// Moment about the reference point (N m)
    pub moment: Point3D,
}

/// Aggregate force and moment coefficients
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ForceCoefficients {
    /// Total force (N)
    pub force: Point3D,
    /// Total moment about the reference point (N m)
    pub moment: Point3D,
    /// Body-axis force coefficients (CX, CY, CZ)
    pub body: Point3D,
    /// Lift coefficient
    pub lift: f64,
    /// Drag coefficient (positive downstream)
    pub drag: f64,
    /// Wind-axis side force coefficient
    pub side: f64,
    /// Rolling moment coefficient (about x, per span)
    pub roll: f64,
    /// Pitching moment coefficient (about y, per chord)
    pub pitch: f64,
    /// Yawing moment coefficient (about z, per span)
    pub yaw: f64,
}

impl ForceCoefficients {
    /// Non-dimensionalize a total force and moment
    ///
    /// A zero dynamic pressure yields zero coefficients.
    pub fn from_totals(
        force: Point3D,
        moment: Point3D,
        freestream: &Freestream,
        reference: &ReferenceGeometry,
    ) -> Self {
        let qs = freestream.dynamic_pressure() * reference.area;
        if qs == 0.0 {
            return Self {
                force,
                moment,
                ..Self::default()
            };
        }
        let [drag_axis, side_axis, lift_axis] = freestream.wind_axes();
        Self {
            force,
            moment,
            body: force * (1.0 / qs),
            lift: force.dot(&lift_axis) / qs,
            drag: force.dot(&drag_axis) / qs,
            side: force.dot(&side_axis) / qs,
            roll: moment.x / (qs * reference.span),
            pitch: moment.y / (qs * reference.chord),
            yaw: moment.z / (qs * reference.span),
        }
    }

    /// Sum per-element loads into coefficients
    pub fn from_loads(
        loads: &[HorseshoeLoad],
        freestream: &Freestream,
        reference: &ReferenceGeometry,
    ) -> Self {
        let (force, moment) = loads
            .iter()
            .fold((Point3D::zero(), Point3D::zero()), |(f, m), l| {
                (f + l.force, m + l.moment)
            });
        Self::from_totals(force, moment, freestream, reference)
    }
}

/// Spanwise loading of one lattice strip
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpanLoad {
    /// Spanwise station (bound leg midpoint y)
    pub y: f64,
    /// Strip circulation (sum over its chordwise horseshoes)
    pub circulation: f64,
    /// Lift per unit span (N/m)
    pub lift_per_span: f64,
    /// Sectional lift coefficient times local chord
    pub cl_chord: f64,
}

/// Local velocity at every bound midpoint: onset flow plus trailing legs
pub fn bound_velocities(
    horseshoes: &[Horseshoe],
    legs: &TrailingLegs,
    circulations: &[f64],
    freestream: &Freestream,
) -> Vec<Point3D> {
    parallel_map_indexed(horseshoes.len(), |i| {
        let point = horseshoes[i].bound_midpoint();
        horseshoes
            .iter()
            .zip(circulations)
            .fold(freestream.onset_velocity(&point), |v, (hs, &gamma)| {
                v + trailing_legs_velocity(hs, legs, &point, gamma)
            })
    })
}

/// Kutta-Joukowski load of every horseshoe
pub fn nearfield_loads(
    horseshoes: &[Horseshoe],
    legs: &TrailingLegs,
    circulations: &[f64],
    freestream: &Freestream,
    moment_point: &Point3D,
) -> Vec<HorseshoeLoad> {
    let velocities = bound_velocities(horseshoes, legs, circulations, freestream);
    horseshoes
        .iter()
        .zip(circulations)
        .zip(velocities)
        .map(|((hs, &gamma), local_velocity)| {
            let point = hs.bound_midpoint();
            let force = local_velocity.cross(&hs.bound_vector()) * (freestream.density * gamma);
            HorseshoeLoad {
                point,
                circulation: gamma,
                local_velocity,
                force,
                moment: (point - *moment_point).cross(&force),
            }
        })
        .collect()
}

/// Spanwise loading of an `n_chord x n_span` lattice (strip-major order)
pub fn span_loading(
    horseshoes: &[Horseshoe],
    loads: &[HorseshoeLoad],
    freestream: &Freestream,
    n_chord: usize,
) -> Vec<SpanLoad> {
    let [_, _, lift_axis] = freestream.wind_axes();
    let q = freestream.dynamic_pressure();
    horseshoes
        .chunks(n_chord)
        .zip(loads.chunks(n_chord))
        .map(|(strip, strip_loads)| {
            let width = strip[0].span();
            let lift: f64 = strip_loads.iter().map(|l| l.force.dot(&lift_axis)).sum();
            let lift_per_span = if width > 0.0 { lift / width } else { 0.0 };
            SpanLoad {
                y: strip[0].bound_midpoint().y,
                circulation: strip_loads.iter().map(|l| l.circulation).sum(),
                lift_per_span,
                cl_chord: if q > 0.0 { lift_per_span / q } else { 0.0 },
            }
        })
        .collect()
}
