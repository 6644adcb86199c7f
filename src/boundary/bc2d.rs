use serde::{Deserialize, Serialize};
use crate::domain::grid2d::ScalarField;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryCondition {
    /// Boundary line forced to a fixed value.
    Dirichlet(f64),
    /// Zero normal gradient: boundary line copied from its interior neighbour.
    Neumann,
}

/// Conditions on the low and high end of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceBoundary(pub BoundaryCondition, pub BoundaryCondition);

/// `x` acts on columns `0` and `nx-1`, `y` on rows `0` and `ny-1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SquareBoundary {
    pub x: FaceBoundary,
    pub y: FaceBoundary,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryConditions2D {
    pub u: SquareBoundary,
    pub v: SquareBoundary,
    pub p: SquareBoundary,
}

impl SquareBoundary {
    pub fn new(x: FaceBoundary, y: FaceBoundary) -> Self {
        Self { x, y }
    }

    pub fn uniform(condition: BoundaryCondition) -> Self {
        Self {
            x: FaceBoundary(condition, condition),
            y: FaceBoundary(condition, condition),
        }
    }

    /// Writes the boundary lines of `field`. Columns go first and rows second, so the
    /// row conditions decide the four corners.
    pub fn apply(&self, field: &mut ScalarField) {
        let (nrows, ncols) = field.shape();
        if nrows < 2 || ncols < 2 {
            return;
        }

        let FaceBoundary(left, right) = self.x;
        for i in 0..nrows {
            field[(i, 0)] = match left {
                BoundaryCondition::Dirichlet(value) => value,
                BoundaryCondition::Neumann => field[(i, 1)],
            };
            field[(i, ncols - 1)] = match right {
                BoundaryCondition::Dirichlet(value) => value,
                BoundaryCondition::Neumann => field[(i, ncols - 2)],
            };
        }

        let FaceBoundary(low, high) = self.y;
        for j in 0..ncols {
            field[(0, j)] = match low {
                BoundaryCondition::Dirichlet(value) => value,
                BoundaryCondition::Neumann => field[(1, j)],
            };
            field[(nrows - 1, j)] = match high {
                BoundaryCondition::Dirichlet(value) => value,
                BoundaryCondition::Neumann => field[(nrows - 2, j)],
            };
        }
    }
}

impl BoundaryConditions2D {
    pub fn new(u: SquareBoundary, v: SquareBoundary, p: SquareBoundary) -> Self {
        Self { u, v, p }
    }

    /// Lid-driven cavity: no-slip walls, the lid (row `ny-1`) sliding with `lid_velocity`
    /// in x. Pressure is zero-gradient on the walls and pinned to 0 along the lid.
    pub fn lid_driven_cavity(lid_velocity: f64) -> Self {
        let wall = BoundaryCondition::Dirichlet(0.0);
        Self {
            u: SquareBoundary {
                x: FaceBoundary(wall, wall),
                y: FaceBoundary(wall, BoundaryCondition::Dirichlet(lid_velocity)),
            },
            v: SquareBoundary::uniform(wall),
            p: SquareBoundary {
                x: FaceBoundary(BoundaryCondition::Neumann, BoundaryCondition::Neumann),
                y: FaceBoundary(BoundaryCondition::Neumann, BoundaryCondition::Dirichlet(0.0)),
            },
        }
    }

    /// Velocity part of the rule, applied after every corrector step.
    pub fn apply_velocity(&self, u: &mut ScalarField, v: &mut ScalarField) {
        self.u.apply(u);
        self.v.apply(v);
    }
}

impl Default for BoundaryConditions2D {
    fn default() -> Self {
        Self::lid_driven_cavity(1.0)
    }
}
