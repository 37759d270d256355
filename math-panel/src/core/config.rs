//! Analysis configuration
//!
//! An explicit configuration record passed into `assemble`. Every field has a
//! default, so a JSON file only needs to list what it overrides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::core::constants::{DEFAULT_CONDITION_LIMIT, DEFAULT_WAKE_LENGTH};
use crate::core::error::{AeroError, Result};

/// Direction along which wakes and trailing legs are shed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WakeDirection {
    /// Along the freestream direction
    #[default]
    Freestream,
    /// Along the trailing-edge bisector (2D airfoils)
    Bisector,
    /// Along the geometry x axis (3D)
    BodyX,
}

/// Right-hand side formulation of the 2D Dirichlet problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirichletRhs {
    /// Sources σ = -U·n carry the freestream, interior perturbation potential is zero
    #[default]
    SourceProjection,
    /// Doublets only, interior total potential is zero (RHS = -U·r)
    FreestreamPotential,
}

/// Linear solver used for the influence system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinearSolver {
    /// LU factorization with partial pivoting (square systems only)
    #[default]
    Direct,
    /// Householder QR least squares (square or tall systems)
    LeastSquares,
    /// Jacobi-preconditioned restarted GMRES (square systems only)
    Gmres,
}

/// Configuration of one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Truncation length of wake panels and trailing legs
    pub wake_length: f64,
    /// Wake shedding direction
    pub wake_direction: WakeDirection,
    /// 2D Dirichlet right-hand side formulation
    pub dirichlet_rhs: DirichletRhs,
    /// Linear solver selection
    pub linear_solver: LinearSolver,
    /// Append the doublet closure row to the 3D Neumann system
    pub closure_row: bool,
    /// GMRES relative tolerance
    pub gmres_tolerance: f64,
    /// GMRES maximum number of restart cycles
    pub gmres_max_iterations: usize,
    /// GMRES restart length
    pub gmres_restart: usize,
    /// Reciprocal condition estimate below which the system is rejected
    pub condition_limit: f64,
    /// Optional wall-clock limit of a whole solve, in milliseconds
    pub max_solve_time_ms: Option<u64>,
    /// Log progress messages
    pub verbose: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            wake_length: DEFAULT_WAKE_LENGTH,
            wake_direction: WakeDirection::Freestream,
            dirichlet_rhs: DirichletRhs::SourceProjection,
            linear_solver: LinearSolver::Direct,
            closure_row: true,
            gmres_tolerance: 1e-10,
            gmres_max_iterations: 100,
            gmres_restart: 50,
            condition_limit: DEFAULT_CONDITION_LIMIT,
            max_solve_time_ms: None,
            verbose: false,
        }
    }
}

impl AnalysisConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the wake truncation length
    pub fn with_wake_length(mut self, length: f64) -> Self {
        self.wake_length = length;
        self
    }

    /// Set the wake shedding direction
    pub fn with_wake_direction(mut self, direction: WakeDirection) -> Self {
        self.wake_direction = direction;
        self
    }

    /// Set the 2D Dirichlet right-hand side formulation
    pub fn with_dirichlet_rhs(mut self, rhs: DirichletRhs) -> Self {
        self.dirichlet_rhs = rhs;
        self
    }

    /// Enable or disable the 2D source terms
    pub fn with_sources(self, enabled: bool) -> Self {
        self.with_dirichlet_rhs(if enabled {
            DirichletRhs::SourceProjection
        } else {
            DirichletRhs::FreestreamPotential
        })
    }

    /// Set the linear solver
    pub fn with_linear_solver(mut self, solver: LinearSolver) -> Self {
        self.linear_solver = solver;
        self
    }

    /// Enable or disable the Neumann closure row
    pub fn with_closure_row(mut self, enabled: bool) -> Self {
        self.closure_row = enabled;
        self
    }

    /// Set the wall-clock limit of a solve
    pub fn with_max_solve_time(mut self, limit: Duration) -> Self {
        self.max_solve_time_ms = Some(u64::try_from(limit.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Enable verbose output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Whether the 2D source terms are active
    pub fn sources_enabled(&self) -> bool {
        self.dirichlet_rhs == DirichletRhs::SourceProjection
    }

    /// Wall-clock limit as a `Duration`
    pub fn max_solve_time(&self) -> Option<Duration> {
        self.max_solve_time_ms.map(Duration::from_millis)
    }

    /// Check the scalar settings
    pub fn validate(&self) -> Result<()> {
        if !(self.wake_length.is_finite() && self.wake_length > 0.0) {
            return Err(AeroError::Configuration(format!(
                "wake length must be positive and finite, got {}",
                self.wake_length
            )));
        }
        if !(self.condition_limit >= 0.0 && self.condition_limit < 1.0) {
            return Err(AeroError::Configuration(format!(
                "condition limit must lie in [0, 1), got {}",
                self.condition_limit
            )));
        }
        if self.linear_solver == LinearSolver::Gmres
            && (self.gmres_restart == 0 || self.gmres_tolerance <= 0.0)
        {
            return Err(AeroError::Configuration(
                "GMRES needs a positive restart length and tolerance".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse a configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| AeroError::ConfigFile(format!("Failed to parse JSON: {}", e)))
    }

    /// Load configuration from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| AeroError::ConfigFile(format!("Failed to read config file: {}", e)))?;
        Self::from_json_str(&contents)
    }

    /// Save configuration to JSON file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AeroError::ConfigFile(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, json)
            .map_err(|e| AeroError::ConfigFile(format!("Failed to write config file: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.linear_solver, LinearSolver::Direct);
        assert!(config.sources_enabled());
        assert!(config.closure_row);
        assert!(config.validate().is_ok());
        assert!(config.max_solve_time().is_none());
    }

    #[test]
    fn test_partial_json() {
        let config = AnalysisConfig::from_json_str(
            r#"{ "wake_length": 50.0, "dirichlet_rhs": "freestream_potential", "linear_solver": "least_squares" }"#,
        )
        .expect("valid config");
        assert_eq!(config.wake_length, 50.0);
        assert!(!config.sources_enabled());
        assert_eq!(config.linear_solver, LinearSolver::LeastSquares);
        assert_eq!(config.gmres_restart, 50);
    }

    #[test]
    fn test_invalid_json() {
        let err = AnalysisConfig::from_json_str("{ not json").unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_validate_rejects_zero_wake() {
        let config = AnalysisConfig::new().with_wake_length(0.0);
        assert!(matches!(
            config.validate(),
            Err(AeroError::Configuration(_))
        ));
    }

    #[test]
    fn test_huge_time_limit_saturates() {
        let config = AnalysisConfig::new().with_max_solve_time(Duration::MAX);
        assert_eq!(config.max_solve_time_ms, Some(u64::MAX));
        let config = AnalysisConfig::new().with_max_solve_time(Duration::from_secs(2));
        assert_eq!(config.max_solve_time_ms, Some(2000));
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("analysis.json");
        let config = AnalysisConfig::new()
            .with_wake_direction(WakeDirection::Bisector)
            .with_max_solve_time(Duration::from_millis(250));
        config.to_file(&path).expect("write config");
        let loaded = AnalysisConfig::from_file(&path).expect("read config");
        assert_eq!(loaded, config);
    }
}
