pub mod red_black;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::boundary::bc2d::SquareBoundary;
use crate::domain::grid2d::{Grid2D, ScalarField};
use crate::error::SolverError;
use crate::numerical::{interior_norm, laplacian};
use red_black::SWEEP_ORDER;

/// How the over-relaxation factor is chosen when the solver is built.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relaxation {
    /// `2 / (1 + sin(pi * dx))`. Only uses `dx`, so it is a heuristic on non-square cells.
    #[default]
    Optimal,
    Fixed(f64),
}

impl Relaxation {
    pub fn factor(&self, grid: &Grid2D) -> f64 {
        match *self {
            Relaxation::Optimal => 2.0 / (1.0 + (std::f64::consts::PI * grid.dx()).sin()),
            Relaxation::Fixed(omega) => omega,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PoissonOutcome {
    /// Residual norm reached the tolerance.
    Converged { iterations: usize, residual: f64 },
    /// Iteration cap hit first; `p` holds the best-effort field.
    CappedOut { iterations: usize, residual: f64 },
    /// Residual became NaN or infinite, iteration stopped there.
    Diverged { iterations: usize },
}

impl PoissonOutcome {
    pub fn iterations(&self) -> usize {
        match *self {
            PoissonOutcome::Converged { iterations, .. }
            | PoissonOutcome::CappedOut { iterations, .. }
            | PoissonOutcome::Diverged { iterations } => iterations,
        }
    }

    pub fn residual(&self) -> f64 {
        match *self {
            PoissonOutcome::Converged { residual, .. } | PoissonOutcome::CappedOut { residual, .. } => residual,
            PoissonOutcome::Diverged { .. } => f64::NAN,
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, PoissonOutcome::Converged { .. })
    }
}

/// Red-black SOR solver for `lap(p) = b` on the interior, with the pressure boundary
/// rule reapplied after every iteration.
#[derive(Debug, Clone)]
pub struct PoissonSolver {
    grid: Grid2D,
    omega: f64,
    tolerance: f64,
    max_iterations: usize,
    boundary: SquareBoundary,
}

impl PoissonSolver {
    pub fn new(
        grid: &Grid2D,
        relaxation: Relaxation,
        tolerance: f64,
        max_iterations: usize,
        boundary: SquareBoundary,
    ) -> Result<Self, SolverError> {
        let omega = relaxation.factor(grid);
        if !(omega > 0.0 && omega < 2.0) {
            return Err(SolverError::InvalidParameter(format!(
                "Relaxation factor omega must lie in (0, 2), got {}",
                omega
            )));
        }
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(SolverError::InvalidParameter(format!(
                "Poisson tolerance must be positive, got {}",
                tolerance
            )));
        }
        if max_iterations == 0 {
            return Err(SolverError::InvalidParameter(
                "Poisson iteration cap must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            grid: grid.clone(),
            omega,
            tolerance,
            max_iterations,
            boundary,
        })
    }

    pub fn omega(&self) -> f64 {
        self.omega
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// One full SOR iteration: the four checkerboard passes in `SWEEP_ORDER`, then the
    /// boundary rule.
    pub fn sweep(&self, p: &mut ScalarField, b: &ScalarField) {
        let (nrows, ncols) = p.shape();
        let inv_dx2 = 1.0 / (self.grid.dx() * self.grid.dx());
        let inv_dy2 = 1.0 / (self.grid.dy() * self.grid.dy());
        let a = -2.0 * (inv_dx2 + inv_dy2);

        for phase in SWEEP_ORDER.iter() {
            for (i, j) in phase.points(nrows, ncols) {
                let sigma = (p[(i, j - 1)] + p[(i, j + 1)]) * inv_dx2
                    + (p[(i - 1, j)] + p[(i + 1, j)]) * inv_dy2;
                let current = p[(i, j)];
                p[(i, j)] = current + self.omega * ((b[(i, j)] - sigma) / a - current);
            }
        }
        self.boundary.apply(p);
    }

    /// Interior norm of `lap(p) - b`.
    pub fn residual_norm(&self, p: &ScalarField, b: &ScalarField) -> f64 {
        interior_norm(&(laplacian(p, &self.grid) - b))
    }

    /// Iterates `p` in place from its current values (warm start) until the residual
    /// norm drops to the tolerance or the cap is reached.
    pub fn solve(&self, p: &mut ScalarField, b: &ScalarField) -> PoissonOutcome {
        let mut residual = f64::INFINITY;
        for iteration in 1..=self.max_iterations {
            self.sweep(p, b);
            residual = self.residual_norm(p, b);
            if !residual.is_finite() {
                trace!(iteration, "Poisson residual is not finite");
                return PoissonOutcome::Diverged { iterations: iteration };
            }
            if residual <= self.tolerance {
                trace!(iteration, residual, "Poisson solve converged");
                return PoissonOutcome::Converged { iterations: iteration, residual };
            }
        }
        PoissonOutcome::CappedOut {
            iterations: self.max_iterations,
            residual,
        }
    }
}
