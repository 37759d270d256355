//! Constant-strength quadrilateral singularities in 3D
//!
//! The doublet potential is the signed solid angle of the panel divided by
//! 4π, evaluated on the two triangles (p1, p2, p3) and (p1, p3, p4) with the
//! Van Oosterom-Strackee formula. It tends to -1/2 just outside the panel
//! (on the normal side) and +1/2 just inside. The doublet velocity is that of
//! a vortex ring of unit circulation running p1 -> p2 -> p3 -> p4.
//!
//! The source potential integrates `-1/(4π r)` over the panel projected onto
//! its mean plane.

use crate::core::constants::{GEOMETRY_EPS, PI4};
use crate::core::geometry::{LocalFrame, Panel3D};
use crate::core::kernels::vortex::segment_velocity;
use crate::core::types::Point3D;

/// Signed solid angle subtended by triangle `(a, b, c)` at `point`
///
/// Negative when the point lies on the side the triangle's right-hand normal
/// points to.
pub fn triangle_solid_angle(point: &Point3D, a: &Point3D, b: &Point3D, c: &Point3D) -> f64 {
    let r1 = *a - *point;
    let r2 = *b - *point;
    let r3 = *c - *point;
    let (l1, l2, l3) = (r1.length(), r2.length(), r3.length());
    if l1.min(l2).min(l3) <= GEOMETRY_EPS {
        // point on a vertex
        return 0.0;
    }
    let numerator = r1.dot(&r2.cross(&r3));
    let denominator = l1 * l2 * l3 + r1.dot(&r2) * l3 + r1.dot(&r3) * l2 + r2.dot(&r3) * l1;
    2.0 * numerator.atan2(denominator)
}

/// Signed solid angle subtended by a quadrilateral panel
pub fn panel_solid_angle(panel: &Panel3D, point: &Point3D) -> f64 {
    let [p1, p2, p3, p4] = panel.corners();
    triangle_solid_angle(point, p1, p2, p3) + triangle_solid_angle(point, p1, p3, p4)
}

/// Unit doublet potential of a panel at a point off the panel
pub fn doublet_potential(panel: &Panel3D, point: &Point3D) -> f64 {
    panel_solid_angle(panel, point) / PI4
}

/// Unit doublet velocity of a panel (equivalent unit vortex ring)
pub fn doublet_velocity(panel: &Panel3D, point: &Point3D) -> Point3D {
    vortex_ring_velocity(panel.corners(), point, 1.0)
}

/// Velocity of a closed quadrilateral vortex ring `c0 -> c1 -> c2 -> c3 -> c0`
pub fn vortex_ring_velocity(corners: &[Point3D; 4], point: &Point3D, gamma: f64) -> Point3D {
    let mut v = Point3D::zero();
    for k in 0..4 {
        v += segment_velocity(point, &corners[k], &corners[(k + 1) % 4], gamma);
    }
    v
}

/// Unit source potential of a panel, using a precomputed panel frame
pub fn source_potential_in_frame(panel: &Panel3D, frame: &LocalFrame, point: &Point3D) -> f64 {
    let local = frame.to_local(point);
    let corners = panel.local_corners(frame);
    let (x, y, z) = (local.x, local.y, local.z);

    let dist = |(cx, cy): (f64, f64)| ((x - cx).powi(2) + (y - cy).powi(2) + z * z).sqrt();

    let mut edge_sum = 0.0;
    for k in 0..4 {
        let (a, b) = (corners[k], corners[(k + 1) % 4]);
        let d = (b.0 - a.0).hypot(b.1 - a.1);
        if d <= GEOMETRY_EPS {
            continue;
        }
        let h = ((b.0 - a.0) * (y - a.1) - (b.1 - a.1) * (x - a.0)) / d;
        let (ra, rb) = (dist(a), dist(b));
        let below = ra + rb - d;
        if below > GEOMETRY_EPS * d {
            edge_sum += h * ((ra + rb + d) / below).ln();
        }
    }

    // solid angle of the projected panel, evaluated in the panel frame
    let omega = if z.abs() > GEOMETRY_EPS {
        let v = corners.map(|(cx, cy)| Point3D::new(cx, cy, 0.0));
        triangle_solid_angle(&local, &v[0], &v[1], &v[2])
            + triangle_solid_angle(&local, &v[0], &v[2], &v[3])
    } else {
        0.0
    };

    -(edge_sum + z * omega) / PI4
}

/// Unit source potential of a panel at a point
pub fn source_potential(panel: &Panel3D, point: &Point3D) -> f64 {
    source_potential_in_frame(panel, &panel.local_frame(), point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(size: f64) -> Panel3D {
        Panel3D::new(
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(size, 0.0, 0.0),
            Point3D::new(size, size, 0.0),
            Point3D::new(0.0, size, 0.0),
        )
    }

    #[test]
    fn test_doublet_potential_jump() {
        let panel = square(1.0);
        let above = doublet_potential(&panel, &Point3D::new(0.3, 0.6, 1e-9));
        let below = doublet_potential(&panel, &Point3D::new(0.3, 0.6, -1e-9));
        assert_relative_eq!(above, -0.5, epsilon = 1e-6);
        assert_relative_eq!(below, 0.5, epsilon = 1e-6);
        // in plane, outside the panel
        assert_relative_eq!(
            doublet_potential(&panel, &Point3D::new(3.0, 0.5, 0.0)),
            0.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_doublet_far_field() {
        // point doublet: -A z / (4π r³) for a point on the normal axis
        let panel = square(0.1);
        let z = 10.0;
        let phi = doublet_potential(&panel, &Point3D::new(0.05, 0.05, z));
        assert_relative_eq!(phi, -0.01 / (PI4 * z * z), max_relative = 1e-3);
    }

    #[test]
    fn test_doublet_velocity_matches_potential_gradient() {
        let panel = square(1.0);
        let p = Point3D::new(0.2, 1.4, 0.7);
        let v = doublet_velocity(&panel, &p);
        let h = 1e-6;
        let grad = |e: Point3D| {
            (doublet_potential(&panel, &(p + e * h)) - doublet_potential(&panel, &(p - e * h)))
                / (2.0 * h)
        };
        assert_relative_eq!(v.x, grad(Point3D::new(1.0, 0.0, 0.0)), epsilon = 1e-7);
        assert_relative_eq!(v.y, grad(Point3D::new(0.0, 1.0, 0.0)), epsilon = 1e-7);
        assert_relative_eq!(v.z, grad(Point3D::new(0.0, 0.0, 1.0)), epsilon = 1e-7);
    }

    #[test]
    fn test_source_far_field() {
        let panel = square(0.2);
        let p = Point3D::new(0.1, 0.1, 20.0);
        assert_relative_eq!(source_potential(&panel, &p), -0.04 / (PI4 * 20.0), max_relative = 1e-3);
        let q = Point3D::new(25.0, -3.0, 4.0);
        let r = q.distance_to(&panel.collocation_point());
        assert_relative_eq!(source_potential(&panel, &q), -0.04 / (PI4 * r), max_relative = 1e-3);
    }

    #[test]
    fn test_source_potential_at_centre() {
        // ∫dS/r over a unit square from its centre is 4 ln(1 + √2)
        let panel = square(1.0);
        let phi = source_potential(&panel, &Point3D::new(0.5, 0.5, 0.0));
        let expected = -4.0 * (1.0 + 2.0_f64.sqrt()).ln() / PI4;
        assert_relative_eq!(phi, expected, epsilon = 1e-12);
        // continuous across the panel
        let above = source_potential(&panel, &Point3D::new(0.5, 0.5, 1e-8));
        assert_relative_eq!(above, expected, epsilon = 1e-7);
    }
}
