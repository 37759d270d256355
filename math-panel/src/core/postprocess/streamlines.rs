//! Streamline tracing
//!
//! Explicit Euler integration of `dx/ds = V / |V|` with a fixed step length
//! and a fixed number of steps. Tracing stops early, with a
//! [`StagnationWarning`], when the local speed drops below
//! [`STAGNATION_SPEED`].

use std::fmt;
use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

use crate::core::constants::STAGNATION_SPEED;
use crate::core::types::{Point2D, Point3D};

/// Vector space the tracer integrates in
pub trait FlowVector: Copy + Add<Output = Self> + Mul<f64, Output = Self> {
    /// Euclidean length
    fn magnitude(&self) -> f64;
}

impl FlowVector for Point2D {
    fn magnitude(&self) -> f64 {
        self.length()
    }
}

impl FlowVector for Point3D {
    fn magnitude(&self) -> f64 {
        self.length()
    }
}

/// Step length and number of steps
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreamlineConfig {
    /// Distance advanced per step
    pub step: f64,
    /// Number of steps
    pub n_steps: usize,
}

impl StreamlineConfig {
    /// Create a tracing configuration
    pub fn new(step: f64, n_steps: usize) -> Self {
        Self { step, n_steps }
    }
}

impl Default for StreamlineConfig {
    fn default() -> Self {
        Self::new(0.01, 200)
    }
}

/// Tracing ran into a stagnation point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StagnationWarning {
    /// Step at which the speed vanished
    pub step: usize,
    /// Speed found there
    pub speed: f64,
}

impl fmt::Display for StagnationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "streamline truncated at step {}: near-stagnation speed {:.3e}",
            self.step, self.speed
        )
    }
}

/// Traced streamline, seed point first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Streamline<P> {
    /// Positions along the streamline
    pub points: Vec<P>,
    /// Set when tracing stopped at a stagnation point
    pub stagnation: Option<StagnationWarning>,
}

impl<P> Streamline<P> {
    /// Whether all requested steps were taken
    pub fn is_complete(&self) -> bool {
        self.stagnation.is_none()
    }
}

/// Upper bound on the points reserved ahead of tracing
const PREALLOCATED_POINTS: usize = 4096;

/// Trace a streamline from `seed` through the velocity field `velocity`
pub fn trace_streamline<P, F>(seed: P, config: &StreamlineConfig, velocity: F) -> Streamline<P>
where
    P: FlowVector,
    F: Fn(&P) -> P,
{
    let mut points = Vec::with_capacity(config.n_steps.saturating_add(1).min(PREALLOCATED_POINTS));
    points.push(seed);
    let mut current = seed;
    for step in 0..config.n_steps {
        let v = velocity(&current);
        let speed = v.magnitude();
        if !(speed >= STAGNATION_SPEED) {
            let warning = StagnationWarning { step, speed };
            log::warn!("{}", warning);
            return Streamline {
                points,
                stagnation: Some(warning),
            };
        }
        current = current + v * (config.step / speed);
        points.push(current);
    }
    Streamline {
        points,
        stagnation: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_uniform_flow_is_straight() {
        let line = trace_streamline(
            Point3D::zero(),
            &StreamlineConfig::new(0.5, 4),
            |_| Point3D::new(3.0, 0.0, 4.0),
        );
        assert!(line.is_complete());
        assert_eq!(line.points.len(), 5);
        let end = line.points[4];
        assert_relative_eq!(end.x, 1.2, epsilon = 1e-14);
        assert_relative_eq!(end.z, 1.6, epsilon = 1e-14);
    }

    #[test]
    fn test_stagnation_truncates() {
        // flow towards the origin, with a dead zone around it
        let line = trace_streamline(Point2D::new(-1.0, 0.0), &StreamlineConfig::new(0.3, 10), |p| {
            if p.x.abs() < 0.2 {
                Point2D::zero()
            } else {
                Point2D::new(-p.x, 0.0)
            }
        });
        let warning = line.stagnation.expect("stagnation reported");
        assert_eq!(warning.step, 3);
        assert_eq!(line.points.len(), 4);
        assert!(warning.to_string().contains("step 3"));
    }

    #[test]
    fn test_unbounded_step_count() {
        let line = trace_streamline(
            Point3D::zero(),
            &StreamlineConfig::new(0.1, usize::MAX),
            |_| Point3D::zero(),
        );
        assert_eq!(line.points.len(), 1);
        assert_eq!(line.stagnation.map(|w| w.step), Some(0));
    }
}
