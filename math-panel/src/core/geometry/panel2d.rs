//! 2D straight panels and wake panels
//!
//! Panels are ordered counter-clockwise around the body, so that the outward
//! normal is the tangent rotated clockwise by 90°.

use serde::{Deserialize, Serialize};

use crate::core::constants::GEOMETRY_EPS;
use crate::core::error::{AeroError, Result};
use crate::core::types::Point2D;

/// Straight 2D panel between two endpoints
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Panel2D {
    /// Start point
    pub p1: Point2D,
    /// End point
    pub p2: Point2D,
}

impl Panel2D {
    /// Create a panel from its endpoints
    pub fn new(p1: Point2D, p2: Point2D) -> Self {
        Self { p1, p2 }
    }

    /// Panel length
    #[inline]
    pub fn length(&self) -> f64 {
        self.p1.distance_to(&self.p2)
    }

    /// Collocation point (midpoint)
    #[inline]
    pub fn collocation_point(&self) -> Point2D {
        self.p1.midpoint(&self.p2)
    }

    /// Unit tangent from `p1` to `p2`
    #[inline]
    pub fn tangent(&self) -> Point2D {
        let d = self.p2 - self.p1;
        d * (1.0 / self.length())
    }

    /// Outward unit normal (tangent rotated clockwise)
    #[inline]
    pub fn normal(&self) -> Point2D {
        let t = self.tangent();
        Point2D::new(t.y, -t.x)
    }

    /// Inclination of the panel tangent with respect to the x axis (rad)
    #[inline]
    pub fn angle(&self) -> f64 {
        let d = self.p2 - self.p1;
        d.y.atan2(d.x)
    }

    /// Express a point in the panel frame: x along the tangent from `p1`,
    /// z along the outward normal.
    #[inline]
    pub fn to_local(&self, point: &Point2D) -> (f64, f64) {
        let d = *point - self.p1;
        (d.dot(&self.tangent()), d.dot(&self.normal()))
    }

    /// Rotate a panel-frame vector (u along tangent, w along normal) to global axes
    #[inline]
    pub fn to_global(&self, u: f64, w: f64) -> Point2D {
        self.tangent() * u + self.normal() * w
    }

    /// Check the panel for degeneracy
    pub fn validate(&self, index: usize) -> Result<()> {
        if !(self.p1.is_finite() && self.p2.is_finite()) {
            return Err(AeroError::geometry(index, "non-finite panel endpoint"));
        }
        if self.length() <= GEOMETRY_EPS {
            return Err(AeroError::geometry(index, "zero-length panel"));
        }
        Ok(())
    }
}

/// Wake panel trailing from the trailing edge
///
/// A long straight panel of fixed length (the wake truncation constant)
/// carrying the doublet jump imposed by the Kutta condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WakePanel2D {
    /// Underlying straight panel, starting at the trailing edge
    pub panel: Panel2D,
}

impl WakePanel2D {
    /// Create a wake panel from the trailing edge along `direction`
    pub fn new(trailing_edge: Point2D, direction: Point2D, length: f64) -> Result<Self> {
        let dir = direction.normalize().ok_or_else(|| {
            AeroError::Configuration("wake direction must be non-zero".to_string())
        })?;
        let panel = Panel2D::new(trailing_edge, trailing_edge + dir * length);
        panel.validate(0)?;
        Ok(Self { panel })
    }

    /// Trailing-edge point
    pub fn trailing_edge(&self) -> Point2D {
        self.panel.p1
    }

    /// Wake length
    pub fn length(&self) -> f64 {
        self.panel.length()
    }
}

/// Build panels from consecutive points of a counter-clockwise polyline
pub fn panels_from_points(points: &[Point2D]) -> Vec<Panel2D> {
    points
        .windows(2)
        .map(|w| Panel2D::new(w[0], w[1]))
        .collect()
}

/// Signed area enclosed by a panel loop (shoelace formula, closed through
/// the trailing-edge gap); positive for counter-clockwise ordering
pub fn enclosed_area(panels: &[Panel2D]) -> f64 {
    let closing = match (panels.first(), panels.last()) {
        (Some(first), Some(last)) => last.p2.cross(&first.p1),
        _ => return 0.0,
    };
    0.5 * panels
        .iter()
        .fold(closing, |acc, p| acc + p.p1.cross(&p.p2))
}

/// Trailing-edge point of a panel loop: midpoint of the first panel's start
/// and the last panel's end
pub fn trailing_edge_point(panels: &[Panel2D]) -> Option<Point2D> {
    let first = panels.first()?;
    let last = panels.last()?;
    Some(first.p1.midpoint(&last.p2))
}

/// Trailing-edge bisector: the direction halfway between the upper and lower
/// surface tangents leaving the trailing edge
pub fn trailing_edge_bisector(panels: &[Panel2D]) -> Option<Point2D> {
    let first = panels.first()?;
    let last = panels.last()?;
    // first panel leaves the TE forward along the upper surface, last panel
    // arrives at the TE along the lower surface
    let upper = -first.tangent();
    let lower = last.tangent();
    (upper + lower).normalize()
}
