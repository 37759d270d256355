//! Tagged panel variants and their free-function capabilities
//!
//! Unknowns of a system are stored in one flat array of [`Panel`] values
//! (body panels first, then wake panels); the free functions below dispatch
//! on the variant with a `match`, keeping the inner loops monomorphic.
//!
//! 2D elements live in the x-z plane of the 3D frame: a 2D point `(x, y)`
//! maps to `(x, 0, y)`.

use serde::{Deserialize, Serialize};

use crate::core::geometry::panel2d::{Panel2D, WakePanel2D};
use crate::core::geometry::panel3d::{Panel3D, WakePanel3D};
use crate::core::kernels::{doublet_influence, doublet_potential, doublet_velocity};
use crate::core::types::{Point2D, Point3D};

/// Any panel carrying a doublet unknown
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Panel {
    /// Airfoil surface panel
    Panel2D(Panel2D),
    /// Airfoil wake panel
    WakePanel2D(WakePanel2D),
    /// Quadrilateral body panel
    Panel3D(Panel3D),
    /// Quadrilateral wake panel
    WakePanel3D(WakePanel3D),
}

/// Potential and velocity of a unit-strength doublet element
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Influence {
    /// Induced potential
    pub potential: f64,
    /// Induced velocity (3D frame)
    pub velocity: Point3D,
}

/// Map an airfoil-plane point into the 3D frame
#[inline]
pub fn plane_to_space(p: &Point2D) -> Point3D {
    Point3D::new(p.x, 0.0, p.y)
}

/// Project a 3D point onto the airfoil plane
#[inline]
pub fn space_to_plane(p: &Point3D) -> Point2D {
    Point2D::new(p.x, p.z)
}

/// Collocation point of a panel
pub fn collocation_point(panel: &Panel) -> Point3D {
    match panel {
        Panel::Panel2D(p) => plane_to_space(&p.collocation_point()),
        Panel::WakePanel2D(w) => plane_to_space(&w.panel.collocation_point()),
        Panel::Panel3D(p) => p.collocation_point(),
        Panel::WakePanel3D(w) => w.panel.collocation_point(),
    }
}

/// Unit normal of a panel
pub fn normal(panel: &Panel) -> Point3D {
    match panel {
        Panel::Panel2D(p) => plane_to_space(&p.normal()),
        Panel::WakePanel2D(w) => plane_to_space(&w.panel.normal()),
        Panel::Panel3D(p) => p.normal(),
        Panel::WakePanel3D(w) => w.panel.normal(),
    }
}

/// Unit doublet influence of a panel at a point off the panel
///
/// Self-influence is not handled here; assembly routines special-case it by
/// index.
pub fn influence(panel: &Panel, point: &Point3D) -> Influence {
    let planar = |p: &Panel2D| {
        let inf = doublet_influence(p, &space_to_plane(point));
        Influence {
            potential: inf.potential,
            velocity: plane_to_space(&inf.velocity),
        }
    };
    let spatial = |p: &Panel3D| Influence {
        potential: doublet_potential(p, point),
        velocity: doublet_velocity(p, point),
    };
    match panel {
        Panel::Panel2D(p) => planar(p),
        Panel::WakePanel2D(w) => planar(&w.panel),
        Panel::Panel3D(p) => spatial(p),
        Panel::WakePanel3D(w) => spatial(&w.panel),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_variant_dispatch() {
        let p2 = Panel::Panel2D(Panel2D::new(Point2D::new(1.0, 0.0), Point2D::new(0.0, 0.0)));
        assert_relative_eq!(normal(&p2).z, 1.0);
        assert_relative_eq!(collocation_point(&p2).x, 0.5);

        let p3 = Panel::Panel3D(Panel3D::new(
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(1.0, 0.0, 0.0),
            Point3D::new(1.0, 1.0, 0.0),
            Point3D::new(0.0, 1.0, 0.0),
        ));
        assert_relative_eq!(normal(&p3).z, 1.0);

        // both variants approach -1/2 just outside the panel
        let above2 = influence(&p2, &Point3D::new(0.5, 0.0, 1e-10));
        let above3 = influence(&p3, &Point3D::new(0.5, 0.5, 1e-10));
        assert_relative_eq!(above2.potential, -0.5, epsilon = 1e-8);
        assert_relative_eq!(above3.potential, -0.5, epsilon = 1e-8);
    }

    #[test]
    fn test_plane_mapping() {
        let p = Point2D::new(0.3, -0.2);
        assert_eq!(space_to_plane(&plane_to_space(&p)), p);
    }
}
