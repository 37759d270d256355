//! Error types for the aerodynamic influence solvers.
//!
//! Three failure families are distinguished: invalid geometry (detected before
//! assembly), numerically singular systems (detected by the linear solve) and
//! inconsistent configuration. All of them surface synchronously from
//! `assemble`/`solve`; none is converted into NaN results.

use std::time::Duration;
use thiserror::Error;

/// Errors raised while assembling or solving an aerodynamic system.
#[derive(Debug, Error)]
pub enum AeroError {
    /// A panel or horseshoe is degenerate (zero length/area, non-finite coordinates).
    #[error("degenerate geometry at element {index}: {reason}")]
    Geometry {
        /// Index of the offending element
        index: usize,
        /// Human readable cause
        reason: String,
    },

    /// Element counts do not match the expected mesh dimensions.
    #[error("panel count mismatch: expected {expected}, got {got}")]
    PanelCountMismatch {
        /// Expected number of elements
        expected: usize,
        /// Number of elements provided
        got: usize,
    },

    /// The influence matrix is singular or too ill-conditioned to solve.
    #[error("singular {rows}x{cols} influence matrix (reciprocal condition estimate {rcond:.3e})")]
    SingularMatrix {
        /// Number of rows of the system
        rows: usize,
        /// Number of columns of the system
        cols: usize,
        /// Reciprocal condition estimate (0 when the factorization broke down)
        rcond: f64,
    },

    /// Inconsistent combination of options.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The wall-clock budget of the solve was exceeded.
    #[error("solve exceeded its time limit ({elapsed:?} > {limit:?})")]
    Timeout {
        /// Elapsed time when the limit was detected
        elapsed: Duration,
        /// Configured limit
        limit: Duration,
    },

    /// Reading or writing a configuration file failed.
    #[error("configuration file error: {0}")]
    ConfigFile(String),
}

/// A specialized `Result` type for aerodynamic operations.
pub type Result<T> = std::result::Result<T, AeroError>;

impl AeroError {
    /// Returns `true` for geometry failures (`Geometry`, `PanelCountMismatch`).
    pub fn is_geometry_error(&self) -> bool {
        matches!(
            self,
            AeroError::Geometry { .. } | AeroError::PanelCountMismatch { .. }
        )
    }

    /// Returns `true` if the linear system could not be solved.
    pub fn is_singular(&self) -> bool {
        matches!(self, AeroError::SingularMatrix { .. })
    }

    /// Returns `true` for configuration failures.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            AeroError::Configuration(_) | AeroError::ConfigFile(_)
        )
    }

    pub(crate) fn geometry(index: usize, reason: impl Into<String>) -> Self {
        AeroError::Geometry {
            index,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AeroError::PanelCountMismatch {
            expected: 12,
            got: 10,
        };
        assert_eq!(err.to_string(), "panel count mismatch: expected 12, got 10");

        let err = AeroError::geometry(3, "zero length");
        assert_eq!(
            err.to_string(),
            "degenerate geometry at element 3: zero length"
        );
    }

    #[test]
    fn test_error_categories() {
        let geometry = AeroError::geometry(0, "zero area");
        let singular = AeroError::SingularMatrix {
            rows: 4,
            cols: 4,
            rcond: 0.0,
        };
        let config = AeroError::Configuration("direct solve of a tall system".into());

        assert!(geometry.is_geometry_error());
        assert!(!geometry.is_singular());
        assert!(singular.is_singular());
        assert!(!singular.is_configuration_error());
        assert!(config.is_configuration_error());
    }
}
