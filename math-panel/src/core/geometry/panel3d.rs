//! Quadrilateral 3D panels
//!
//! Corner order is `p1` front-left, `p2` back-left, `p3` back-right,
//! `p4` front-right, which is counter-clockwise seen from the side the normal
//! points to. Corners need not be coplanar; the normal is taken from the
//! cross product of the diagonals.

use serde::{Deserialize, Serialize};

use crate::core::constants::GEOMETRY_EPS;
use crate::core::error::{AeroError, Result};
use crate::core::types::Point3D;

/// Orthonormal frame attached to a panel centroid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalFrame {
    /// Frame origin
    pub origin: Point3D,
    /// In-plane chordwise axis
    pub ex: Point3D,
    /// In-plane spanwise axis
    pub ey: Point3D,
    /// Normal axis
    pub ez: Point3D,
}

impl LocalFrame {
    /// Express a global point in the frame
    #[inline]
    pub fn to_local(&self, point: &Point3D) -> Point3D {
        let d = *point - self.origin;
        Point3D::new(d.dot(&self.ex), d.dot(&self.ey), d.dot(&self.ez))
    }

    /// Rotate a frame vector back to global axes
    #[inline]
    pub fn to_global(&self, v: &Point3D) -> Point3D {
        self.ex * v.x + self.ey * v.y + self.ez * v.z
    }
}

/// Quadrilateral surface panel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Panel3D {
    corners: [Point3D; 4],
    centroid: Point3D,
    normal: Point3D,
    area: f64,
}

impl Panel3D {
    /// Create a panel from its four corners
    pub fn new(p1: Point3D, p2: Point3D, p3: Point3D, p4: Point3D) -> Self {
        let diag = (p3 - p1).cross(&(p4 - p2));
        let area = 0.5 * diag.length();
        let normal = diag.normalize().unwrap_or_else(Point3D::zero);
        let centroid = (p1 + p2 + p3 + p4) * 0.25;
        Self {
            corners: [p1, p2, p3, p4],
            centroid,
            normal,
            area,
        }
    }

    /// Corner points
    #[inline]
    pub fn corners(&self) -> &[Point3D; 4] {
        &self.corners
    }

    /// Collocation point (corner average)
    #[inline]
    pub fn collocation_point(&self) -> Point3D {
        self.centroid
    }

    /// Unit normal
    #[inline]
    pub fn normal(&self) -> Point3D {
        self.normal
    }

    /// Projected area
    #[inline]
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Midpoint of the leading edge (`p1`-`p4`)
    pub fn leading_edge_midpoint(&self) -> Point3D {
        self.corners[0].midpoint(&self.corners[3])
    }

    /// Midpoint of the trailing edge (`p2`-`p3`)
    pub fn trailing_edge_midpoint(&self) -> Point3D {
        self.corners[1].midpoint(&self.corners[2])
    }

    /// Panel frame: x chordwise, z along the normal
    pub fn local_frame(&self) -> LocalFrame {
        let ez = self.normal;
        let chord = self.trailing_edge_midpoint() - self.leading_edge_midpoint();
        let in_plane = chord - ez * chord.dot(&ez);
        let ex = in_plane
            .normalize()
            .or_else(|| {
                let edge = self.corners[1] - self.corners[0];
                (edge - ez * edge.dot(&ez)).normalize()
            })
            .unwrap_or_else(Point3D::unit_x);
        let ey = ez.cross(&ex);
        LocalFrame {
            origin: self.centroid,
            ex,
            ey,
            ez,
        }
    }

    /// Corners projected onto the panel plane, in frame coordinates
    pub fn local_corners(&self, frame: &LocalFrame) -> [(f64, f64); 4] {
        self.corners.map(|c| {
            let l = frame.to_local(&c);
            (l.x, l.y)
        })
    }

    /// Check the panel for degeneracy
    pub fn validate(&self, index: usize) -> Result<()> {
        if !self.corners.iter().all(Point3D::is_finite) {
            return Err(AeroError::geometry(index, "non-finite panel corner"));
        }
        if self.area <= GEOMETRY_EPS {
            return Err(AeroError::geometry(index, "zero-area panel"));
        }
        Ok(())
    }
}

/// Wake panel shed from one spanwise strip of a trailing edge
///
/// Corners are (TE left, far left, far right, TE right) so that the wake
/// inherits the orientation convention of the body panels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WakePanel3D {
    /// Underlying quadrilateral
    pub panel: Panel3D,
    /// Index of the spanwise strip the wake belongs to
    pub strip: usize,
}

impl WakePanel3D {
    /// Create a wake panel from a trailing-edge segment
    pub fn new(
        te_left: Point3D,
        te_right: Point3D,
        direction: Point3D,
        length: f64,
        strip: usize,
    ) -> Result<Self> {
        let dir = direction.normalize().ok_or_else(|| {
            AeroError::Configuration("wake direction must be non-zero".to_string())
        })?;
        let offset = dir * length;
        let panel = Panel3D::new(te_left, te_left + offset, te_right + offset, te_right);
        panel.validate(strip)?;
        Ok(Self { panel, strip })
    }
}
