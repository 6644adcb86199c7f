pub mod driver;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::boundary::bc2d::BoundaryConditions2D;
use crate::domain::grid2d::{Grid2D, ScalarField};
use crate::domain::state::SimulationState;
use crate::error::{FieldKind, SolverError};
use crate::numerical::derive::{advection, gradient, laplacian};
use crate::numerical::{divergence, divergence_norm, interior_norm};
use crate::poisson::{PoissonOutcome, PoissonSolver};

/// What a step does when the pressure solve hits its iteration cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonConvergencePolicy {
    /// Fail the step with `SolverError::PoissonNotConverged`.
    Abort,
    /// Log a warning and correct with the best-effort pressure.
    #[default]
    Continue,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowParameters {
    pub dt: f64,
    pub rho: f64, // density
    pub nu: f64,  // kinematic viscosity
}

/// Diagnostics of one completed step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    pub poisson: PoissonOutcome,
    /// Interior divergence norm of the predictor velocity.
    pub predictor_divergence: f64,
    /// Interior divergence norm after correction and boundary enforcement.
    pub divergence: f64,
}

/// Projection-method stepper: explicit advection-diffusion predictor, pressure Poisson
/// solve, pressure-gradient corrector, velocity boundary rule.
#[derive(Debug, Clone)]
pub struct ProjectionSolver {
    grid: Grid2D,
    params: FlowParameters,
    bcs: BoundaryConditions2D,
    poisson: PoissonSolver,
    policy: NonConvergencePolicy,
    steps_taken: usize,
}

impl ProjectionSolver {
    pub fn new(
        grid: Grid2D,
        params: FlowParameters,
        bcs: BoundaryConditions2D,
        poisson: PoissonSolver,
        policy: NonConvergencePolicy,
    ) -> Result<Self, SolverError> {
        if !(params.dt.is_finite() && params.dt > 0.0) {
            return Err(SolverError::InvalidParameter("Time step dt must be positive".to_string()));
        }
        if !(params.rho.is_finite() && params.rho > 0.0) {
            return Err(SolverError::InvalidParameter("Density rho must be positive".to_string()));
        }
        if !(params.nu.is_finite() && params.nu >= 0.0) {
            return Err(SolverError::InvalidParameter("Viscosity nu must be non-negative".to_string()));
        }
        Ok(Self {
            grid,
            params,
            bcs,
            poisson,
            policy,
            steps_taken: 0,
        })
    }

    pub fn grid(&self) -> &Grid2D {
        &self.grid
    }

    pub fn params(&self) -> FlowParameters {
        self.params
    }

    pub fn boundaries(&self) -> &BoundaryConditions2D {
        &self.bcs
    }

    pub fn poisson(&self) -> &PoissonSolver {
        &self.poisson
    }

    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    /// Forward-Euler advection-diffusion update of the interior, reading only the old
    /// fields. Boundary values are carried over unchanged.
    pub fn predict(&self, u: &ScalarField, v: &ScalarField) -> (ScalarField, ScalarField) {
        let FlowParameters { dt, nu, .. } = self.params;
        let adv_u = advection(u, v, u, &self.grid);
        let adv_v = advection(u, v, v, &self.grid);
        let lap_u = laplacian(u, &self.grid);
        let lap_v = laplacian(v, &self.grid);

        let u_star = u + (lap_u * nu - adv_u) * dt;
        let v_star = v + (lap_v * nu - adv_v) * dt;
        (u_star, v_star)
    }

    /// `b = rho/dt * (du/dx + dv/dy)` of the predictor velocity.
    pub fn pressure_rhs(&self, u_star: &ScalarField, v_star: &ScalarField) -> ScalarField {
        divergence(u_star, v_star, &self.grid) * (self.params.rho / self.params.dt)
    }

    /// Advances `state` by one `dt` in place.
    pub fn step(&mut self, state: &mut SimulationState) -> Result<StepReport, SolverError> {
        let step = self.steps_taken + 1;
        let FlowParameters { dt, rho, .. } = self.params;

        let (u_star, v_star) = self.predict(&state.u, &state.v);
        let b = self.pressure_rhs(&u_star, &v_star);

        // p carries over from the previous step as the initial guess
        let outcome = self.poisson.solve(&mut state.p, &b);
        match outcome {
            PoissonOutcome::Converged { .. } => {}
            PoissonOutcome::Diverged { .. } => {
                return Err(SolverError::NumericalBlowUp { step, field: FieldKind::Pressure });
            }
            PoissonOutcome::CappedOut { iterations, residual } => match self.policy {
                NonConvergencePolicy::Abort => {
                    return Err(SolverError::PoissonNotConverged { iterations, residual });
                }
                NonConvergencePolicy::Continue => {
                    warn!(step, iterations, residual, "Pressure solve hit its iteration cap, continuing");
                }
            },
        }

        let (dp_dx, dp_dy) = gradient(&state.p, &self.grid);
        state.u = u_star - dp_dx * (dt / rho);
        state.v = v_star - dp_dy * (dt / rho);
        self.bcs.apply_velocity(&mut state.u, &mut state.v);

        state.time += dt;
        self.steps_taken = step;

        if let Some(field) = state.first_non_finite() {
            return Err(SolverError::NumericalBlowUp { step, field });
        }

        let report = StepReport {
            poisson: outcome,
            predictor_divergence: interior_norm(&b) * dt / rho,
            divergence: divergence_norm(&state.u, &state.v, &self.grid),
        };
        debug!(
            step,
            time = state.time,
            iterations = outcome.iterations(),
            residual = outcome.residual(),
            divergence = report.divergence,
            "Step complete"
        );
        Ok(report)
    }
}
