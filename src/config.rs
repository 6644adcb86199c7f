use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::boundary::bc2d::BoundaryConditions2D;
use crate::error::{ConfigError, SolverError};
use crate::poisson::Relaxation;
use crate::solver::driver::Simulation;
use crate::solver::NonConvergencePolicy;

/// Every input of a run. Missing JSON keys fall back to the lid-driven cavity defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub nx: usize,
    pub ny: usize,
    pub lx: f64,
    pub ly: f64,
    pub dt: f64,
    pub t_start: f64,
    pub t_final: f64,
    pub rho: f64,
    pub nu: f64,
    /// Residual norm the pressure solve must reach.
    pub tol: f64,
    pub max_iterations: usize,
    pub relaxation: Relaxation,
    /// Output frames after the initial one.
    pub frames: usize,
    pub on_non_convergence: NonConvergencePolicy,
    pub boundaries: BoundaryConditions2D,
    /// Where the JSON snapshot writer puts its file, if anywhere.
    pub output: Option<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            nx: 41,
            ny: 41,
            lx: 1.0,
            ly: 1.0,
            dt: 0.001,
            t_start: 0.0,
            t_final: 0.5,
            rho: 1.0,
            nu: 0.1,
            tol: 1e-3,
            max_iterations: 20_000,
            relaxation: Relaxation::Optimal,
            frames: 50,
            on_non_convergence: NonConvergencePolicy::Continue,
            boundaries: BoundaryConditions2D::lid_driven_cavity(1.0),
            output: None,
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Reports the first configuration error without stepping anything.
    pub fn validate(&self) -> Result<(), SolverError> {
        Simulation::new(self).map(|_| ())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::bc2d::BoundaryCondition;
    use tempfile::tempdir;

    #[test]
    fn test_default_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimulationConfig::from_json_str(r#"{ "nx": 10, "ny": 12, "nu": 0.05 }"#).unwrap();
        assert_eq!(config.nx, 10);
        assert_eq!(config.ny, 12);
        assert_eq!(config.nu, 0.05);
        assert_eq!(config.dt, SimulationConfig::default().dt);
        assert_eq!(config.relaxation, Relaxation::Optimal);
    }

    #[test]
    fn test_json_enums() {
        let json = r#"{
            "relaxation": { "fixed": 1.7 },
            "on_non_convergence": "abort",
            "boundaries": {
                "u": { "x": [{ "dirichlet": 0.0 }, { "dirichlet": 0.0 }], "y": [{ "dirichlet": 0.0 }, { "dirichlet": 2.0 }] },
                "v": { "x": [{ "dirichlet": 0.0 }, { "dirichlet": 0.0 }], "y": [{ "dirichlet": 0.0 }, { "dirichlet": 0.0 }] },
                "p": { "x": ["neumann", "neumann"], "y": ["neumann", { "dirichlet": 0.0 }] }
            }
        }"#;
        let config = SimulationConfig::from_json_str(json).unwrap();
        assert_eq!(config.relaxation, Relaxation::Fixed(1.7));
        assert_eq!(config.on_non_convergence, NonConvergencePolicy::Abort);
        assert_eq!(config.boundaries.u.y.1, BoundaryCondition::Dirichlet(2.0));
        assert_eq!(config.boundaries, BoundaryConditions2D::lid_driven_cavity(2.0));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(SimulationConfig::from_json_str("{ nx: 3 "), Err(ConfigError::Parse(_))));
        assert!(matches!(
            SimulationConfig::from_json_str(r#"{ "nx": "ten" }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_from_json_file() -> Result<(), ConfigError> {
        let dir = tempdir()?;
        let path = dir.path().join("cavity.json");
        fs::write(&path, r#"{ "frames": 4, "t_final": 0.01 }"#)?;
        let config = SimulationConfig::from_json_file(&path)?;
        assert_eq!(config.frames, 4);
        assert!(matches!(
            SimulationConfig::from_json_file(dir.path().join("missing.json")),
            Err(ConfigError::Io(_))
        ));
        Ok(())
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = |edit: fn(&mut SimulationConfig)| {
            let mut config = SimulationConfig::default();
            edit(&mut config);
            config.validate()
        };
        assert!(matches!(bad(|c| c.nx = 2), Err(SolverError::Grid(_))));
        assert!(matches!(bad(|c| c.ly = 0.0), Err(SolverError::Grid(_))));
        assert!(matches!(bad(|c| c.dt = 0.0), Err(SolverError::InvalidParameter(_))));
        assert!(matches!(bad(|c| c.relaxation = Relaxation::Fixed(2.5)), Err(SolverError::InvalidParameter(_))));
        assert!(matches!(bad(|c| c.tol = -1.0), Err(SolverError::InvalidParameter(_))));
        assert!(matches!(bad(|c| c.frames = 0), Err(SolverError::InvalidParameter(_))));
        assert!(matches!(bad(|c| c.t_final = c.t_start), Err(SolverError::InvalidParameter(_))));
        // 500 steps cannot fill 1000 frames
        assert!(matches!(bad(|c| c.frames = 1000), Err(SolverError::InvalidParameter(_))));
    }
}
