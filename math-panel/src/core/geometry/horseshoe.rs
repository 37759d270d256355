//! Horseshoe vortices of the vortex lattice

use serde::{Deserialize, Serialize};

use crate::core::geometry::panel3d::Panel3D;
use crate::core::types::Point3D;

/// Horseshoe vortex: bound leg plus two trailing legs
///
/// The trailing legs are not stored; their direction and length come from
/// the analysis (see [`TrailingLegs`]). The filament runs in from the far
/// end of the left leg, along the bound leg from `r1` to `r2`, and out along
/// the right leg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Horseshoe {
    /// Left end of the bound leg
    pub r1: Point3D,
    /// Right end of the bound leg
    pub r2: Point3D,
    /// Collocation point (three-quarter chord)
    pub collocation: Point3D,
    /// Unit normal at the collocation point
    pub normal: Point3D,
}

impl Horseshoe {
    /// Build the horseshoe of a lattice panel: bound leg on the quarter-chord
    /// line, collocation point at three-quarter chord mid-span
    pub fn from_panel(panel: &Panel3D) -> Self {
        let [p1, p2, p3, p4] = *panel.corners();
        let r1 = p1.lerp(&p2, 0.25);
        let r2 = p4.lerp(&p3, 0.25);
        let left = p1.lerp(&p2, 0.75);
        let right = p4.lerp(&p3, 0.75);
        Self {
            r1,
            r2,
            collocation: left.midpoint(&right),
            normal: panel.normal(),
        }
    }

    /// Midpoint of the bound leg (force application point)
    #[inline]
    pub fn bound_midpoint(&self) -> Point3D {
        self.r1.midpoint(&self.r2)
    }

    /// Bound leg vector from `r1` to `r2`
    #[inline]
    pub fn bound_vector(&self) -> Point3D {
        self.r2 - self.r1
    }

    /// Spanwise extent of the bound leg projected on the y-z plane
    pub fn span(&self) -> f64 {
        let d = self.bound_vector();
        d.y.hypot(d.z)
    }
}

/// Direction and truncation length shared by all trailing legs of a lattice
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailingLegs {
    /// Unit direction of the trailing legs
    pub direction: Point3D,
    /// Length of each trailing leg
    pub length: f64,
}

impl TrailingLegs {
    /// Far end of a trailing leg starting at `root`
    #[inline]
    pub fn far_point(&self, root: &Point3D) -> Point3D {
        *root + self.direction * self.length
    }
}
