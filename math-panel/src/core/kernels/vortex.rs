//! Vortex filament kernels (Biot-Savart law)

use crate::core::constants::{PI4, VORTEX_CORE_SQ};
use crate::core::geometry::{Horseshoe, TrailingLegs};
use crate::core::types::Point3D;

/// Velocity induced at `point` by a straight vortex segment from `a` to `b`
/// with circulation `gamma`
///
/// Returns zero when the point lies on the segment's line (within the
/// vortex core radius).
pub fn segment_velocity(point: &Point3D, a: &Point3D, b: &Point3D, gamma: f64) -> Point3D {
    let r1 = *point - *a;
    let r2 = *point - *b;
    let r0 = *b - *a;
    let cross = r1.cross(&r2);
    let cross_sq = cross.length_squared();
    let (l1, l2) = (r1.length(), r2.length());
    if cross_sq <= VORTEX_CORE_SQ * r0.length_squared().max(1.0)
        || l1 * l1 <= VORTEX_CORE_SQ
        || l2 * l2 <= VORTEX_CORE_SQ
    {
        return Point3D::zero();
    }
    let k = gamma / (PI4 * cross_sq) * r0.dot(&(r1 * (1.0 / l1) - r2 * (1.0 / l2)));
    cross * k
}

/// Velocity induced by a complete horseshoe vortex
pub fn horseshoe_velocity(
    horseshoe: &Horseshoe,
    legs: &TrailingLegs,
    point: &Point3D,
    gamma: f64,
) -> Point3D {
    let bound = segment_velocity(point, &horseshoe.r1, &horseshoe.r2, gamma);
    bound + trailing_legs_velocity(horseshoe, legs, point, gamma)
}

/// Velocity induced by the two trailing legs of a horseshoe only
pub fn trailing_legs_velocity(
    horseshoe: &Horseshoe,
    legs: &TrailingLegs,
    point: &Point3D,
    gamma: f64,
) -> Point3D {
    let far_left = legs.far_point(&horseshoe.r1);
    let far_right = legs.far_point(&horseshoe.r2);
    segment_velocity(point, &far_left, &horseshoe.r1, gamma)
        + segment_velocity(point, &horseshoe.r2, &far_right, gamma)
}
