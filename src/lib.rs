//! Lid-driven cavity flow on a collocated grid: explicit projection stepping with a
//! red-black SOR pressure solve.

pub mod boundary;
pub mod config;
pub mod domain;
pub mod error;
pub mod json_io;
pub mod numerical;
pub mod poisson;
pub mod solver;

pub use config::SimulationConfig;
pub use domain::state::{Snapshot, SnapshotSequence};
pub use error::SolverError;
pub use json_io::{JsonSnapshotWriter, SnapshotSink};
pub use solver::driver::{RunSummary, Simulation, Termination};
