//! Geometry generators for validation cases
//!
//! Provides NACA 4-digit airfoils, flat rectangular lattice wings and thick
//! rectangular wings built from an airfoil section. These exist to exercise
//! the solvers; general wing parametrization belongs to the caller.

use std::f64::consts::PI;

use crate::core::error::{AeroError, Result};
use crate::core::geometry::grid::PanelGrid;
use crate::core::geometry::panel2d::{Panel2D, panels_from_points};
use crate::core::geometry::panel3d::Panel3D;
use crate::core::types::{Point2D, Point3D};

/// NACA 4-digit section parameters (fractions of chord)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Naca4 {
    /// Maximum camber
    pub camber: f64,
    /// Chordwise position of maximum camber
    pub camber_position: f64,
    /// Maximum thickness
    pub thickness: f64,
}

impl Naca4 {
    /// Parse a designation such as `"0012"` or `"2412"`
    pub fn parse(code: &str) -> Result<Self> {
        let digits: Vec<u32> = code.trim().chars().filter_map(|c| c.to_digit(10)).collect();
        if digits.len() != 4 || code.trim().len() != 4 {
            return Err(AeroError::Configuration(format!(
                "invalid NACA 4-digit designation '{}'",
                code
            )));
        }
        let camber = digits[0] as f64 / 100.0;
        let camber_position = digits[1] as f64 / 10.0;
        let thickness = (digits[2] * 10 + digits[3]) as f64 / 100.0;
        if thickness <= 0.0 || (camber > 0.0 && camber_position <= 0.0) {
            return Err(AeroError::Configuration(format!(
                "degenerate NACA 4-digit designation '{}'",
                code
            )));
        }
        Ok(Self {
            camber,
            camber_position,
            thickness,
        })
    }

    /// Half thickness at chord fraction `x` (closed trailing edge)
    pub fn half_thickness(&self, x: f64) -> f64 {
        5.0 * self.thickness
            * (0.2969 * x.sqrt() - 0.1260 * x - 0.3516 * x.powi(2) + 0.2843 * x.powi(3)
                - 0.1036 * x.powi(4))
    }

    /// Camber line ordinate and slope at chord fraction `x`
    pub fn camber_line(&self, x: f64) -> (f64, f64) {
        let (m, p) = (self.camber, self.camber_position);
        if m == 0.0 {
            return (0.0, 0.0);
        }
        if x < p {
            let yc = m / (p * p) * (2.0 * p * x - x * x);
            let dyc = 2.0 * m / (p * p) * (p - x);
            (yc, dyc)
        } else {
            let q = (1.0 - p) * (1.0 - p);
            let yc = m / q * (1.0 - 2.0 * p + 2.0 * p * x - x * x);
            let dyc = 2.0 * m / q * (p - x);
            (yc, dyc)
        }
    }

    /// Surface points with cosine spacing, unit chord
    ///
    /// Points run counter-clockwise from the trailing edge over the upper
    /// surface to the leading edge and back along the lower surface.
    /// `n_panels` must be even; `n_panels + 1` points are returned, the first
    /// and last coinciding at the closed trailing edge.
    pub fn points(&self, n_panels: usize) -> Result<Vec<Point2D>> {
        if n_panels < 4 || n_panels % 2 != 0 {
            return Err(AeroError::Configuration(format!(
                "airfoil panel count must be even and at least 4, got {}",
                n_panels
            )));
        }
        let n_half = n_panels / 2;
        let surface = |k: usize, upper: bool| {
            let beta = PI * k as f64 / n_half as f64;
            let x = 0.5 * (1.0 - beta.cos());
            let yt = self.half_thickness(x);
            let (yc, dyc) = self.camber_line(x);
            let theta = dyc.atan();
            let sign = if upper { 1.0 } else { -1.0 };
            Point2D::new(x - sign * yt * theta.sin(), yc + sign * yt * theta.cos())
        };

        let mut points = Vec::with_capacity(n_panels + 1);
        points.extend((0..=n_half).rev().map(|k| surface(k, true)));
        points.extend((1..=n_half).map(|k| surface(k, false)));

        // close the trailing edge exactly
        let te = points[0].midpoint(&points[n_panels]);
        points[0] = te;
        points[n_panels] = te;
        Ok(points)
    }
}

/// Panels of a NACA 4-digit airfoil with unit chord
///
/// # Example
/// ```ignore
/// let panels = naca4_panels("0012", 40)?;
/// assert_eq!(panels.len(), 40);
/// ```
pub fn naca4_panels(code: &str, n_panels: usize) -> Result<Vec<Panel2D>> {
    let points = Naca4::parse(code)?.points(n_panels)?;
    Ok(panels_from_points(&points))
}

/// Spanwise stations from `-span/2` to `span/2`
fn span_stations(span: f64, n_span: usize, cosine: bool) -> Vec<f64> {
    (0..=n_span)
        .map(|j| {
            let s = j as f64 / n_span as f64;
            let eta = if cosine {
                0.5 * (1.0 - (PI * s).cos())
            } else {
                s
            };
            span * (eta - 0.5)
        })
        .collect()
}

fn check_counts(n_chord: usize, n_span: usize) -> Result<()> {
    if n_chord == 0 || n_span == 0 {
        return Err(AeroError::Configuration(format!(
            "grid needs at least one panel per direction, got {}x{}",
            n_chord, n_span
        )));
    }
    Ok(())
}

/// Flat rectangular lifting surface in the z = 0 plane
///
/// Leading edge on the y axis, chord along +x, span centred on the root.
/// With `cosine_span` the strips cluster towards the tips.
pub fn rectangular_lattice(
    span: f64,
    chord: f64,
    n_span: usize,
    n_chord: usize,
    cosine_span: bool,
) -> Result<PanelGrid> {
    check_counts(n_chord, n_span)?;
    let ys = span_stations(span, n_span, cosine_span);
    let xs: Vec<f64> = (0..=n_chord)
        .map(|i| chord * i as f64 / n_chord as f64)
        .collect();

    let mut panels = Vec::with_capacity(n_chord * n_span);
    for j in 0..n_span {
        for i in 0..n_chord {
            panels.push(Panel3D::new(
                Point3D::new(xs[i], ys[j], 0.0),
                Point3D::new(xs[i + 1], ys[j], 0.0),
                Point3D::new(xs[i + 1], ys[j + 1], 0.0),
                Point3D::new(xs[i], ys[j + 1], 0.0),
            ));
        }
    }
    PanelGrid::new(panels, n_chord, n_span)
}

/// Thick rectangular wing extruded from an airfoil section
///
/// `section` holds counter-clockwise points in the (x, z) plane as produced
/// by [`Naca4::points`]. The grid wraps around the section with outward
/// normals; the wing tips are left open.
pub fn thick_rectangular_wing(
    section: &[Point2D],
    span: f64,
    n_span: usize,
    cosine_span: bool,
) -> Result<PanelGrid> {
    if section.len() < 3 {
        return Err(AeroError::Configuration(format!(
            "wing section needs at least 3 points, got {}",
            section.len()
        )));
    }
    let n_chord = section.len() - 1;
    check_counts(n_chord, n_span)?;
    let ys = span_stations(span, n_span, cosine_span);
    let at = |s: &Point2D, y: f64| Point3D::new(s.x, y, s.y);

    let mut panels = Vec::with_capacity(n_chord * n_span);
    for j in 0..n_span {
        for i in 0..n_chord {
            let (a, b) = (&section[i], &section[i + 1]);
            panels.push(Panel3D::new(
                at(a, ys[j]),
                at(a, ys[j + 1]),
                at(b, ys[j + 1]),
                at(b, ys[j]),
            ));
        }
    }
    PanelGrid::new(panels, n_chord, n_span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_naca_parse() {
        let naca = Naca4::parse("2412").expect("valid code");
        assert_relative_eq!(naca.camber, 0.02);
        assert_relative_eq!(naca.camber_position, 0.4);
        assert_relative_eq!(naca.thickness, 0.12);
        assert!(Naca4::parse("12").is_err());
        assert!(Naca4::parse("0000").is_err());
    }

    #[test]
    fn test_naca0012_points() {
        let points = Naca4::parse("0012").unwrap().points(40).unwrap();
        assert_eq!(points.len(), 41);
        // trailing edge closed, leading edge at origin
        assert_eq!(points[0], points[40]);
        assert_relative_eq!(points[20].x, 0.0, epsilon = 1e-15);
        // upper surface first, symmetric lower surface
        assert!(points[10].y > 0.0);
        assert_relative_eq!(points[10].y, -points[30].y, epsilon = 1e-14);
        // max thickness of 12%
        let t = points.iter().map(|p| p.y).fold(0.0_f64, f64::max);
        assert_relative_eq!(t, 0.06, epsilon = 2e-3);
    }

    #[test]
    fn test_naca_panels_point_outward() {
        let panels = naca4_panels("2412", 60).unwrap();
        assert_eq!(panels.len(), 60);
        // upper surface panel near mid chord has an upward normal
        assert!(panels[15].normal().y > 0.0);
        assert!(panels[45].normal().y < 0.0);
    }

    #[test]
    fn test_odd_panel_count_rejected() {
        assert!(naca4_panels("0012", 41).is_err());
    }

    #[test]
    fn test_rectangular_lattice() {
        let grid = rectangular_lattice(5.0, 1.0, 4, 2, false).unwrap();
        assert_eq!(grid.len(), 8);
        let p = grid.panel(1, 3);
        assert_relative_eq!(p.corners()[2].y, 2.5);
        assert_relative_eq!(p.corners()[2].x, 1.0);
        assert_relative_eq!(p.normal().z, 1.0);
        let area: f64 = grid.panels.iter().map(Panel3D::area).sum();
        assert_relative_eq!(area, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_thick_wing_normals_outward() {
        let section = Naca4::parse("0012").unwrap().points(20).unwrap();
        let grid = thick_rectangular_wing(&section, 4.0, 3, false).unwrap();
        assert_eq!(grid.n_chord, 20);
        // upper mid-chord panel points up, lower one points down
        assert!(grid.panel(5, 1).normal().z > 0.9);
        assert!(grid.panel(14, 1).normal().z < -0.9);
        let (left, right) = grid.wrapped_trailing_edge(1);
        assert_relative_eq!(left.x, 1.0);
        assert_relative_eq!(right.y - left.y, 4.0 / 3.0, epsilon = 1e-12);
    }
}
