use tracing::{info, info_span, warn};

use crate::config::SimulationConfig;
use crate::domain::grid2d::{Grid2D, GridDimensions2D};
use crate::domain::state::{SimulationState, SnapshotSequence};
use crate::error::SolverError;
use crate::poisson::PoissonSolver;
use crate::solver::{FlowParameters, ProjectionSolver};

/// Steps per output frame: the run's step count split evenly over `frames`.
pub fn frame_interval(t_start: f64, t_final: f64, dt: f64, frames: usize) -> Result<usize, SolverError> {
    if !(dt.is_finite() && dt > 0.0) {
        return Err(SolverError::InvalidParameter("Time step dt must be positive".to_string()));
    }
    if !(t_start.is_finite() && t_final.is_finite() && t_final > t_start) {
        return Err(SolverError::InvalidParameter(format!(
            "Final time {} must be after start time {}",
            t_final, t_start
        )));
    }
    if frames == 0 {
        return Err(SolverError::InvalidParameter("Frame count must be at least 1".to_string()));
    }
    let total_steps = ((t_final - t_start) / dt).round() as usize;
    let interval = total_steps / frames;
    if interval < 1 {
        return Err(SolverError::InvalidParameter(format!(
            "{} steps cannot fill {} frames (dt = {})",
            total_steps, frames, dt
        )));
    }
    Ok(interval)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Termination {
    Completed,
    /// Stepping stopped early; snapshots up to `last_valid_frame` are intact.
    Halted { last_valid_frame: usize, error: SolverError },
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub snapshots: SnapshotSequence,
    pub steps_taken: usize,
    pub termination: Termination,
}

impl RunSummary {
    pub fn is_completed(&self) -> bool {
        self.termination == Termination::Completed
    }
}

/// Owns the live state, steps it frame by frame and records a snapshot after each frame.
/// Frame 0 is the rest state before any step.
#[derive(Debug)]
pub struct Simulation {
    stepper: ProjectionSolver,
    state: SimulationState,
    snapshots: SnapshotSequence,
    frames: usize,
    interval: usize,
}

impl Simulation {
    pub fn new(config: &SimulationConfig) -> Result<Self, SolverError> {
        let grid = Grid2D::from_extent(GridDimensions2D(config.nx, config.ny), config.lx, config.ly)?;
        let interval = frame_interval(config.t_start, config.t_final, config.dt, config.frames)?;
        let poisson = PoissonSolver::new(
            &grid,
            config.relaxation,
            config.tol,
            config.max_iterations,
            config.boundaries.p,
        )?;
        let params = FlowParameters {
            dt: config.dt,
            rho: config.rho,
            nu: config.nu,
        };
        let state = SimulationState::at_rest(&grid, config.t_start);
        let stepper = ProjectionSolver::new(grid, params, config.boundaries, poisson, config.on_non_convergence)?;

        let mut snapshots = SnapshotSequence::new();
        snapshots.capture(&state);
        Ok(Self {
            stepper,
            state,
            snapshots,
            frames: config.frames,
            interval,
        })
    }

    pub fn grid(&self) -> &Grid2D {
        self.stepper.grid()
    }

    pub fn interval(&self) -> usize {
        self.interval
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Frames captured after the initial one.
    pub fn frames_completed(&self) -> usize {
        self.snapshots.len() - 1
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    pub fn snapshots(&self) -> &SnapshotSequence {
        &self.snapshots
    }

    pub fn steps_taken(&self) -> usize {
        self.stepper.steps_taken()
    }

    /// Runs `interval` steps, then captures the state. Returns the new frame index.
    pub fn advance_frame(&mut self) -> Result<usize, SolverError> {
        let frame = self.snapshots.len();
        let _frame_span = info_span!("frame", frame).entered();
        let mut iterations = 0;
        let mut last_divergence = 0.0;
        for _ in 0..self.interval {
            let report = self.stepper.step(&mut self.state)?;
            iterations += report.poisson.iterations();
            last_divergence = report.divergence;
        }
        // copy before the next frame touches the state
        let captured = self.snapshots.capture(&self.state);
        info!(
            "Frame {}: t={:.4}, poisson iterations={}, div={:.3e}",
            captured, self.state.time, iterations, last_divergence
        );
        Ok(captured)
    }

    /// Advances through the remaining frames. A failing step halts the run and is
    /// reported in the summary together with the last intact frame.
    pub fn run(mut self) -> RunSummary {
        let _run_span = info_span!("simulation_run", frames = self.frames, interval = self.interval).entered();
        info!(
            "Starting simulation: {} frames x {} steps on a {}x{} grid",
            self.frames,
            self.interval,
            self.grid().nx(),
            self.grid().ny()
        );
        let start_time = std::time::Instant::now();

        let mut termination = Termination::Completed;
        while self.frames_completed() < self.frames {
            if let Err(error) = self.advance_frame() {
                let last_valid_frame = self.snapshots.len() - 1;
                warn!(%error, last_valid_frame, "Simulation halted");
                termination = Termination::Halted { last_valid_frame, error };
                break;
            }
        }

        info!(
            "Simulation finished in {:.2}s after {} steps",
            start_time.elapsed().as_secs_f64(),
            self.stepper.steps_taken()
        );
        RunSummary {
            steps_taken: self.stepper.steps_taken(),
            snapshots: self.snapshots,
            termination,
        }
    }
}
