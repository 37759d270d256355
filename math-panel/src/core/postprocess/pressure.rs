//! Surface velocity and pressure of 3D doublet panels
//!
//! The velocity just outside a body panel is the onset flow plus the
//! tangential velocity induced by every doublet (body and wake, evaluated as
//! vortex rings at the collocation point), minus half the local doublet
//! gradient for the jump across the sheet. This holds whether or not the
//! flow inside the body is at rest, so open wing tips are handled too.
//!
//! `∇μ` is recovered on the structured grid from three-point differences in
//! grid index: central in the interior, one-sided second order at the
//! trailing edge and at the tips.

use serde::{Deserialize, Serialize};

use crate::core::assembly::doublet_potential_matrix_3d;
use crate::core::geometry::{PanelGrid, ReferenceGeometry, WakePanel3D};
use crate::core::kernels::doublet_velocity;
use crate::core::parallel::parallel_map_indexed;
use crate::core::postprocess::nearfield::ForceCoefficients;
use crate::core::types::{Freestream, Point3D};
use ndarray::{Array1, ArrayView1, s};

/// Surface state of one body panel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelSurfacePoint {
    /// Collocation point
    pub point: Point3D,
    /// Tangential surface velocity
    pub velocity: Point3D,
    /// Pressure coefficient, referenced to the local onset speed
    pub cp: f64,
}

/// Weights of the first derivative with respect to grid index
fn index_stencil(index: usize, count: usize) -> [(usize, f64); 3] {
    match count {
        0 | 1 => [(index, 0.0); 3],
        2 => [(0, -1.0), (1, 1.0), (index, 0.0)],
        _ if index == 0 => [(0, -1.5), (1, 2.0), (2, -0.5)],
        _ if index == count - 1 => [(count - 1, 1.5), (count - 2, -2.0), (count - 3, 0.5)],
        _ => [(index - 1, -0.5), (index + 1, 0.5), (index, 0.0)],
    }
}

/// Tangential gradient of the doublet strength at panel `(i, j)`
///
/// `μ` and the collocation points are differentiated with the same stencil,
/// so a field linear in space is recovered exactly.
pub fn doublet_gradient(grid: &PanelGrid, mu: ArrayView1<f64>, i: usize, j: usize) -> Point3D {
    let n = grid.panel(i, j).normal();
    let (d_c, dmu_c) = index_stencil(i, grid.n_chord).iter().fold(
        (Point3D::zero(), 0.0),
        |(d, m), &(k, w)| {
            (
                d + grid.panel(k, j).collocation_point() * w,
                m + mu[grid.index(k, j)] * w,
            )
        },
    );

    let chordwise_only = || {
        let t = d_c - n * d_c.dot(&n);
        let t2 = t.length_squared();
        if t2 > 0.0 {
            t * (dmu_c / t2)
        } else {
            Point3D::zero()
        }
    };
    if grid.n_span < 2 {
        return chordwise_only();
    }

    let (d_s, dmu_s) = index_stencil(j, grid.n_span).iter().fold(
        (Point3D::zero(), 0.0),
        |(d, m), &(k, w)| {
            (
                d + grid.panel(i, k).collocation_point() * w,
                m + mu[grid.index(i, k)] * w,
            )
        },
    );

    let ds_n = d_s.cross(&n);
    let det = d_c.dot(&ds_n);
    if det.abs() <= f64::EPSILON * d_c.length() * d_s.length() {
        return chordwise_only();
    }
    (ds_n * dmu_c + n.cross(&d_c) * dmu_s) * (1.0 / det)
}

/// Tangential velocity and pressure coefficient of every body panel
///
/// `strengths` holds the body doublets in grid order followed by one
/// strength per wake strip.
pub fn surface_distribution(
    grid: &PanelGrid,
    wakes: &[WakePanel3D],
    strengths: ArrayView1<f64>,
    freestream: &Freestream,
) -> Vec<PanelSurfacePoint> {
    let n_body = grid.len();
    let mu = strengths.slice(s![..n_body]);
    let wake_mu = strengths.slice(s![n_body..]);

    parallel_map_indexed(n_body, |index| {
        let (i, j) = (index % grid.n_chord, index / grid.n_chord);
        let panel = grid.panel(i, j);
        let point = panel.collocation_point();
        let n = panel.normal();

        let onset = freestream.onset_velocity(&point);
        let induced = grid
            .panels
            .iter()
            .zip(mu.iter())
            .map(|(p, &m)| doublet_velocity(p, &point) * m)
            .chain(
                wakes
                    .iter()
                    .zip(wake_mu.iter())
                    .map(|(w, &m)| doublet_velocity(&w.panel, &point) * m),
            )
            .fold(onset, |v, dv| v + dv);
        let mean = induced - n * induced.dot(&n);
        let velocity = mean - doublet_gradient(grid, mu, i, j) * 0.5;

        let v2 = onset.length_squared();
        let cp = if v2 > 0.0 {
            1.0 - velocity.length_squared() / v2
        } else {
            0.0
        };
        PanelSurfacePoint {
            point,
            velocity,
            cp,
        }
    })
}

/// Integrate panel pressures into force and moment coefficients
pub fn pressure_coefficients_3d(
    grid: &PanelGrid,
    surface: &[PanelSurfacePoint],
    freestream: &Freestream,
    reference: &ReferenceGeometry,
) -> ForceCoefficients {
    let mut force = Point3D::zero();
    let mut moment = Point3D::zero();
    for (panel, s) in grid.panels.iter().zip(surface) {
        // local dynamic pressure of the onset flow
        let q = 0.5 * freestream.density * freestream.onset_velocity(&s.point).length_squared();
        let f = panel.normal() * (-s.cp * q * panel.area());
        force += f;
        moment += (s.point - reference.moment_point).cross(&f);
    }
    ForceCoefficients::from_totals(force, moment, freestream, reference)
}

/// Kutta-Joukowski lift coefficient from the wake strip strengths
///
/// A wake strip of doublet strength `μ_w` is a horseshoe of circulation
/// `-μ_w` bound along the trailing edge.
pub fn wake_lift_coefficient(
    wakes: &[WakePanel3D],
    wake_strengths: ArrayView1<f64>,
    freestream: &Freestream,
    reference: &ReferenceGeometry,
) -> f64 {
    let vs = freestream.speed * reference.area;
    if vs == 0.0 {
        return 0.0;
    }
    wakes
        .iter()
        .zip(wake_strengths.iter())
        .map(|(wake, &mu)| {
            let c = wake.panel.corners();
            let dy = c[3].y - c[0].y;
            -2.0 * mu * dy / vs
        })
        .sum()
}

/// Perturbation potential just inside the body at each collocation point
pub fn interior_potential(
    grid: &PanelGrid,
    wakes: &[WakePanel3D],
    strengths: ArrayView1<f64>,
) -> Array1<f64> {
    doublet_potential_matrix_3d(&grid.panels, wakes).dot(&strengths)
}
