//! Structured panel grids and reference geometry

use serde::{Deserialize, Serialize};

use crate::core::error::{AeroError, Result};
use crate::core::geometry::panel3d::Panel3D;
use crate::core::types::Point3D;

/// Structured chordwise x spanwise grid of quadrilateral panels
///
/// Panels are stored strip by strip: panel `(i, j)` (chordwise `i`,
/// spanwise `j`) lives at `j * n_chord + i`. For a thick wing the chordwise
/// index wraps around the section, starting at the upper trailing edge and
/// ending at the lower trailing edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelGrid {
    /// Panels in strip-major order
    pub panels: Vec<Panel3D>,
    /// Number of chordwise panels per strip
    pub n_chord: usize,
    /// Number of spanwise strips
    pub n_span: usize,
}

impl PanelGrid {
    /// Create a grid, checking that the panel count matches its dimensions
    pub fn new(panels: Vec<Panel3D>, n_chord: usize, n_span: usize) -> Result<Self> {
        let expected = n_chord * n_span;
        if panels.len() != expected {
            return Err(AeroError::PanelCountMismatch {
                expected,
                got: panels.len(),
            });
        }
        Ok(Self {
            panels,
            n_chord,
            n_span,
        })
    }

    /// Total number of panels
    #[inline]
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    /// Whether the grid is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Flat index of panel `(i, j)`
    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        j * self.n_chord + i
    }

    /// Panel `(i, j)`
    #[inline]
    pub fn panel(&self, i: usize, j: usize) -> &Panel3D {
        &self.panels[self.index(i, j)]
    }

    /// Panels of spanwise strip `j`
    pub fn strip(&self, j: usize) -> &[Panel3D] {
        let start = j * self.n_chord;
        &self.panels[start..start + self.n_chord]
    }

    /// Check every panel for degeneracy
    pub fn validate(&self) -> Result<()> {
        self.panels
            .iter()
            .enumerate()
            .try_for_each(|(idx, p)| p.validate(idx))
    }

    /// Trailing-edge segment (left, right) of strip `j` of a wrapped grid
    ///
    /// Averages the upper (first chordwise) and lower (last chordwise) panel
    /// edges, which coincide for a closed trailing edge.
    pub fn wrapped_trailing_edge(&self, j: usize) -> (Point3D, Point3D) {
        let upper = self.panel(0, j).corners();
        let lower = self.panel(self.n_chord - 1, j).corners();
        (upper[0].midpoint(&lower[3]), upper[1].midpoint(&lower[2]))
    }

    /// Trailing-edge segment (left, right) of strip `j` of a lifting-surface grid
    pub fn lifting_trailing_edge(&self, j: usize) -> (Point3D, Point3D) {
        let last = self.panel(self.n_chord - 1, j).corners();
        (last[1], last[2])
    }
}

/// Reference quantities for force and moment coefficients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceGeometry {
    /// Reference area
    pub area: f64,
    /// Reference span (roll and yaw moments)
    pub span: f64,
    /// Reference chord (pitching moment)
    pub chord: f64,
    /// Moment reference point
    pub moment_point: Point3D,
}

impl ReferenceGeometry {
    /// Reference geometry of a rectangular planform, moments about the
    /// quarter chord
    pub fn rectangular(span: f64, chord: f64) -> Self {
        Self {
            area: span * chord,
            span,
            chord,
            moment_point: Point3D::new(0.25 * chord, 0.0, 0.0),
        }
    }

    /// Check the reference lengths
    pub fn validate(&self) -> Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if positive(self.area) && positive(self.span) && positive(self.chord) {
            Ok(())
        } else {
            Err(AeroError::Configuration(format!(
                "reference area, span and chord must be positive, got {:?}",
                self
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_count_mismatch() {
        let err = PanelGrid::new(Vec::new(), 2, 3).unwrap_err();
        assert!(matches!(
            err,
            AeroError::PanelCountMismatch {
                expected: 6,
                got: 0
            }
        ));
    }

    #[test]
    fn test_reference_geometry() {
        let reference = ReferenceGeometry::rectangular(5.0, 1.0);
        assert_eq!(reference.area, 5.0);
        assert!(reference.validate().is_ok());
        let bad = ReferenceGeometry {
            area: 0.0,
            ..reference
        };
        assert!(bad.validate().unwrap_err().is_configuration_error());
    }
}
