use std::iter::StepBy;
use std::ops::Range;

/// Checkerboard colour of a node. Nodes of one colour never neighbour each other in
/// the five-point stencil, so a pass over a single colour is order independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black,
    Red,
}

impl Color {
    pub fn of(row: usize, col: usize) -> Color {
        if (row + col) % 2 == 0 {
            Color::Black
        } else {
            Color::Red
        }
    }
}

/// Stride-2 sub-lattice of interior nodes starting at `(row_start, col_start)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubLattice {
    pub row_start: usize,
    pub col_start: usize,
}

/// Pass order inside one SOR iteration: both black phases, then both red phases.
/// Red passes read black values already updated in the same iteration.
pub const SWEEP_ORDER: [SubLattice; 4] = [
    SubLattice { row_start: 1, col_start: 1 },
    SubLattice { row_start: 2, col_start: 2 },
    SubLattice { row_start: 1, col_start: 2 },
    SubLattice { row_start: 2, col_start: 1 },
];

/// Last index hit by a stride-2 walk from `start` over interior indices `1..=n-2`.
/// Lands on `n-2` or `n-3` depending on the parity of `n - start`.
fn last_on_axis(start: usize, n: usize) -> Option<usize> {
    let last_interior = n.checked_sub(2)?;
    if start > last_interior || start == 0 {
        return None;
    }
    Some(last_interior - (last_interior - start) % 2)
}

impl SubLattice {
    pub fn color(&self) -> Color {
        Color::of(self.row_start, self.col_start)
    }

    pub fn rows(&self, nrows: usize) -> StepBy<Range<usize>> {
        (self.row_start..nrows.saturating_sub(1).max(self.row_start)).step_by(2)
    }

    pub fn cols(&self, ncols: usize) -> StepBy<Range<usize>> {
        (self.col_start..ncols.saturating_sub(1).max(self.col_start)).step_by(2)
    }

    /// First and last node visited on a `nrows x ncols` field, or `None` when the
    /// phase has no interior node (e.g. the `(2, 2)` phase on a 3x3 grid).
    pub fn extent(&self, nrows: usize, ncols: usize) -> Option<((usize, usize), (usize, usize))> {
        let last_row = last_on_axis(self.row_start, nrows)?;
        let last_col = last_on_axis(self.col_start, ncols)?;
        Some(((self.row_start, self.col_start), (last_row, last_col)))
    }

    pub fn points(&self, nrows: usize, ncols: usize) -> impl Iterator<Item = (usize, usize)> {
        let cols = self.cols(ncols);
        self.rows(nrows).flat_map(move |i| cols.clone().map(move |j| (i, j)))
    }
}
