//! Core value types for the potential-flow solvers
//!
//! Points/vectors in two and three dimensions and the freestream description.
//! Geometry uses the aircraft-geometry convention: x points aft (downstream),
//! y along the right span, z up.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

// ============================================================================
// 2D points
// ============================================================================

/// 2D point or vector in the airfoil plane (x chordwise, y normal to chord)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Point2D {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point2D {
    /// Create a new 2D point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Origin
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Dot product
    #[inline]
    pub fn dot(&self, other: &Point2D) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Scalar (z-component) cross product
    #[inline]
    pub fn cross(&self, other: &Point2D) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Euclidean length
    #[inline]
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Distance to another point
    #[inline]
    pub fn distance_to(&self, other: &Point2D) -> f64 {
        (*self - *other).length()
    }

    /// Unit vector, or `None` for a (near) zero vector
    pub fn normalize(&self) -> Option<Point2D> {
        let len = self.length();
        if len > f64::MIN_POSITIVE {
            Some(*self * (1.0 / len))
        } else {
            None
        }
    }

    /// Rotate counter-clockwise by `angle` radians
    pub fn rotate(&self, angle: f64) -> Point2D {
        let (s, c) = angle.sin_cos();
        Point2D::new(c * self.x - s * self.y, s * self.x + c * self.y)
    }

    /// Midpoint between two points
    pub fn midpoint(&self, other: &Point2D) -> Point2D {
        Point2D::new(0.5 * (self.x + other.x), 0.5 * (self.y + other.y))
    }

    /// Check that both coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point2D {
    type Output = Point2D;
    fn add(self, other: Point2D) -> Point2D {
        Point2D::new(self.x + other.x, self.y + other.y)
    }
}

impl AddAssign for Point2D {
    fn add_assign(&mut self, other: Point2D) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Point2D {
    type Output = Point2D;
    fn sub(self, other: Point2D) -> Point2D {
        Point2D::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Point2D {
    type Output = Point2D;
    fn mul(self, s: f64) -> Point2D {
        Point2D::new(self.x * s, self.y * s)
    }
}

impl Neg for Point2D {
    type Output = Point2D;
    fn neg(self) -> Point2D {
        Point2D::new(-self.x, -self.y)
    }
}

// ============================================================================
// 3D points
// ============================================================================

/// 3D point or vector
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Point3D {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate
    pub z: f64,
}

impl Point3D {
    /// Create a new 3D point
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Origin
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Unit x vector
    pub const fn unit_x() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    /// Dot product
    #[inline]
    pub fn dot(&self, other: &Point3D) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product
    #[inline]
    pub fn cross(&self, other: &Point3D) -> Point3D {
        Point3D {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Squared length
    #[inline]
    pub fn length_squared(&self) -> f64 {
        self.dot(self)
    }

    /// Euclidean length
    #[inline]
    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Distance to another point
    #[inline]
    pub fn distance_to(&self, other: &Point3D) -> f64 {
        (*self - *other).length()
    }

    /// Unit vector, or `None` for a (near) zero vector
    pub fn normalize(&self) -> Option<Point3D> {
        let len = self.length();
        if len > f64::MIN_POSITIVE {
            Some(*self * (1.0 / len))
        } else {
            None
        }
    }

    /// Midpoint between two points
    pub fn midpoint(&self, other: &Point3D) -> Point3D {
        (*self + *other) * 0.5
    }

    /// Linear interpolation `self + t (other - self)`
    pub fn lerp(&self, other: &Point3D, t: f64) -> Point3D {
        *self + (*other - *self) * t
    }

    /// Check that all coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Components as an array
    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl Add for Point3D {
    type Output = Point3D;
    fn add(self, other: Point3D) -> Point3D {
        Point3D::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl AddAssign for Point3D {
    fn add_assign(&mut self, other: Point3D) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl Sub for Point3D {
    type Output = Point3D;
    fn sub(self, other: Point3D) -> Point3D {
        Point3D::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<f64> for Point3D {
    type Output = Point3D;
    fn mul(self, s: f64) -> Point3D {
        Point3D::new(self.x * s, self.y * s, self.z * s)
    }
}

impl Neg for Point3D {
    type Output = Point3D;
    fn neg(self) -> Point3D {
        Point3D::new(-self.x, -self.y, -self.z)
    }
}

impl From<[f64; 3]> for Point3D {
    fn from(p: [f64; 3]) -> Self {
        Point3D::new(p[0], p[1], p[2])
    }
}

// ============================================================================
// Freestream
// ============================================================================

/// Freestream (uniform onset flow) description, immutable per analysis
///
/// Angles are in radians. The freestream velocity vector in geometry axes is
/// `speed * (cos α cos β, -sin β, sin α cos β)`, so positive α blows from below
/// and positive β blows from the right. Body rates `(p, q, r)` are the
/// angular velocity of the body about the geometry axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Freestream {
    /// Velocity magnitude (m/s)
    pub speed: f64,
    /// Angle of attack (rad)
    pub alpha: f64,
    /// Sideslip angle (rad)
    #[serde(default)]
    pub beta: f64,
    /// Body angular rates (rad/s) about x, y, z
    #[serde(default)]
    pub omega: Point3D,
    /// Reference density (kg/m³)
    #[serde(default = "default_density")]
    pub density: f64,
}

fn default_density() -> f64 {
    crate::core::constants::DEFAULT_DENSITY
}

impl Freestream {
    /// Uniform flow with the given speed and angle of attack
    pub fn new(speed: f64, alpha: f64) -> Self {
        Self {
            speed,
            alpha,
            beta: 0.0,
            omega: Point3D::zero(),
            density: default_density(),
        }
    }

    /// Uniform flow with the angle of attack given in degrees
    pub fn from_degrees(speed: f64, alpha_deg: f64) -> Self {
        Self::new(speed, alpha_deg.to_radians())
    }

    /// Set the sideslip angle (rad)
    pub fn with_sideslip(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Set the body angular rates (rad/s)
    pub fn with_rates(mut self, omega: Point3D) -> Self {
        self.omega = omega;
        self
    }

    /// Set the reference density (kg/m³)
    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    /// Unit vector of the onset flow direction in geometry axes
    pub fn direction(&self) -> Point3D {
        let (sa, ca) = self.alpha.sin_cos();
        let (sb, cb) = self.beta.sin_cos();
        Point3D::new(ca * cb, -sb, sa * cb)
    }

    /// Freestream velocity vector in geometry axes
    pub fn velocity(&self) -> Point3D {
        self.direction() * self.speed
    }

    /// Freestream velocity in the airfoil plane (x, z of the 3D convention)
    pub fn velocity_2d(&self) -> Point2D {
        let (sa, ca) = self.alpha.sin_cos();
        Point2D::new(self.speed * ca, self.speed * sa)
    }

    /// Onset velocity seen at body point `r`: `V∞ - Ω × r`
    pub fn onset_velocity(&self, r: &Point3D) -> Point3D {
        self.velocity() - self.omega.cross(r)
    }

    /// Whether the body rotates
    pub fn is_rotating(&self) -> bool {
        self.omega.length_squared() > 0.0
    }

    /// Dynamic pressure q = ½ ρ V²
    pub fn dynamic_pressure(&self) -> f64 {
        0.5 * self.density * self.speed * self.speed
    }

    /// Wind axes (drag, side, lift) unit vectors expressed in geometry axes
    pub fn wind_axes(&self) -> [Point3D; 3] {
        let drag = self.direction();
        let (sa, ca) = self.alpha.sin_cos();
        let lift = Point3D::new(-sa, 0.0, ca);
        let side = lift.cross(&drag);
        [drag, side, lift]
    }
}

impl Default for Freestream {
    fn default() -> Self {
        Self::new(1.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_point3d_algebra() {
        let a = Point3D::new(1.0, 0.0, 0.0);
        let b = Point3D::new(0.0, 1.0, 0.0);
        let c = a.cross(&b);
        assert_eq!(c, Point3D::new(0.0, 0.0, 1.0));
        assert_relative_eq!((a + b).length(), 2.0_f64.sqrt());
        assert_relative_eq!(a.lerp(&b, 0.25).x, 0.75);
        assert!(Point3D::zero().normalize().is_none());
    }

    #[test]
    fn test_point2d_rotation() {
        let p = Point2D::new(1.0, 0.0).rotate(std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-15);
        assert_relative_eq!(p.y, 1.0);
        assert_relative_eq!(Point2D::new(1.0, 0.0).cross(&Point2D::new(0.0, 1.0)), 1.0);
    }

    #[test]
    fn test_freestream_direction() {
        let fs = Freestream::from_degrees(10.0, 5.0);
        let v = fs.velocity();
        assert_relative_eq!(v.length(), 10.0, epsilon = 1e-12);
        assert!(v.z > 0.0);
        let v2 = fs.velocity_2d();
        assert_relative_eq!(v2.x, v.x, epsilon = 1e-12);
        assert_relative_eq!(v2.y, v.z, epsilon = 1e-12);
    }

    #[test]
    fn test_wind_axes_are_orthonormal() {
        let fs = Freestream::new(1.0, 0.1).with_sideslip(0.05);
        let [d, s, l] = fs.wind_axes();
        assert_relative_eq!(d.dot(&l), 0.0, epsilon = 1e-14);
        assert_relative_eq!(l.length(), 1.0, epsilon = 1e-14);
        assert_relative_eq!(s.dot(&d), 0.0, epsilon = 1e-14);
        assert_relative_eq!(s.dot(&l), 0.0, epsilon = 1e-14);
        // zero angles: side axis is +y
        let [_, s0, _] = Freestream::default().wind_axes();
        assert_relative_eq!(s0.y, 1.0);
    }

    #[test]
    fn test_onset_velocity_with_roll_rate() {
        let fs = Freestream::new(1.0, 0.0).with_rates(Point3D::new(0.2, 0.0, 0.0));
        // right wing moves up under positive roll: relative wind from above
        let v = fs.onset_velocity(&Point3D::new(0.0, 2.0, 0.0));
        assert_relative_eq!(v.z, -0.4);
        assert!(fs.is_rotating());
    }
}
