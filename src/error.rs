use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("Invalid grid size: {0}")]
    InvalidGridSize(String),

    #[error("Invalid grid spacing: {0}")]
    InvalidSpacing(String),
}

/// Which prognostic field a numerical failure was detected in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    U,
    V,
    Pressure,
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKind::U => write!(f, "u"),
            FieldKind::V => write!(f, "v"),
            FieldKind::Pressure => write!(f, "p"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    #[error("Poisson solver did not converge after {iterations} iterations (residual {residual:.3e})")]
    PoissonNotConverged { iterations: usize, residual: f64 },

    #[error("Non-finite values in field {field} after step {step}")]
    NumericalBlowUp { step: usize, field: FieldKind },

    #[error("I/O error: {0}")]
    Io(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
