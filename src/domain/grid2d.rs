use nalgebra::DMatrix;
use crate::error::GridError;

/// A 2D array of reals indexed `[(i, j)]` with row `i` = y-index, column `j` = x-index.
pub type ScalarField = DMatrix<f64>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridDimensions2D(pub usize, pub usize); // nx, ny (nodes, boundaries included)

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSize2D(pub f64, pub f64); // dx, dy

#[derive(Debug, Clone, PartialEq)]
pub struct Grid2D {
    pub dimensions: GridDimensions2D,
    pub cell_size: CellSize2D,
}

impl Grid2D {
    /// Collocated node layout for nx = 5, ny = 4. u, v and p all store every node.
    /// Stencils update the interior `•`; boundary nodes `◦` are written by boundary rules only.
    ///
    /// ```text
    ///  row ny-1   ◦ ─ ◦ ─ ◦ ─ ◦ ─ ◦
    ///             │   │   │   │   │
    ///  row 2      ◦ ─ • ─ • ─ • ─ ◦
    ///             │   │   │   │   │
    ///  row 1      ◦ ─ • ─ • ─ • ─ ◦
    ///             │   │   │   │   │
    ///  row 0      ◦ ─ ◦ ─ ◦ ─ ◦ ─ ◦
    ///           col 0            col nx-1
    /// ```
    pub fn new(dimensions: GridDimensions2D, cell_size: CellSize2D) -> Result<Self, GridError> {
        let GridDimensions2D(nx, ny) = dimensions;
        if nx < 3 || ny < 3 {
            return Err(GridError::InvalidGridSize(format!(
                "Grid dimensions (nx, ny) must be at least 3x3 to have interior points, got {}x{}.",
                nx, ny
            )));
        }
        let CellSize2D(dx, dy) = cell_size;
        if !(dx.is_finite() && dx > 0.0) || !(dy.is_finite() && dy > 0.0) {
            return Err(GridError::InvalidSpacing(format!(
                "Cell size (dx, dy) must be positive and finite, got ({}, {}).",
                dx, dy
            )));
        }
        Ok(Self { dimensions, cell_size })
    }

    /// Builds the grid covering `[0, lx] x [0, ly]` with `dx = lx/(nx-1)`, `dy = ly/(ny-1)`.
    pub fn from_extent(dimensions: GridDimensions2D, lx: f64, ly: f64) -> Result<Self, GridError> {
        let GridDimensions2D(nx, ny) = dimensions;
        if nx < 3 || ny < 3 {
            return Err(GridError::InvalidGridSize(format!(
                "Grid dimensions (nx, ny) must be at least 3x3 to have interior points, got {}x{}.",
                nx, ny
            )));
        }
        if !(lx.is_finite() && lx > 0.0) || !(ly.is_finite() && ly > 0.0) {
            return Err(GridError::InvalidSpacing(format!(
                "Domain extent (lx, ly) must be positive and finite, got ({}, {}).",
                lx, ly
            )));
        }
        let dx = lx / (nx - 1) as f64;
        let dy = ly / (ny - 1) as f64;
        Self::new(dimensions, CellSize2D(dx, dy))
    }

    pub fn nx(&self) -> usize {
        self.dimensions.0
    }

    pub fn ny(&self) -> usize {
        self.dimensions.1
    }

    pub fn dx(&self) -> f64 {
        self.cell_size.0
    }

    pub fn dy(&self) -> f64 {
        self.cell_size.1
    }

    /// A zeroed field of shape `(ny, nx)`.
    pub fn zeros(&self) -> ScalarField {
        ScalarField::zeros(self.ny(), self.nx())
    }

    /// Samples `f(x, y)` at every node, with `x = j*dx` and `y = i*dy`.
    pub fn sample<F: Fn(f64, f64) -> f64>(&self, f: F) -> ScalarField {
        let (dx, dy) = (self.dx(), self.dy());
        ScalarField::from_fn(self.ny(), self.nx(), |i, j| f(j as f64 * dx, i as f64 * dy))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_grid_creation() {
        let dims = GridDimensions2D(5, 4);
        let cell_size = CellSize2D(0.1, 0.2);
        let grid = Grid2D::new(dims, cell_size).unwrap();
        assert_eq!(grid.dimensions, dims);
        assert_eq!(grid.cell_size, cell_size);
        let field = grid.zeros();
        assert_eq!(field.nrows(), 4); assert_eq!(field.ncols(), 5); // (ny, nx)
    }

    #[test]
    fn test_grid_creation_invalid_size() {
        let cell_size = CellSize2D(0.1, 0.1);
        assert!(matches!(
            Grid2D::new(GridDimensions2D(2, 5), cell_size),
            Err(GridError::InvalidGridSize(_))
        ));
        assert!(matches!(
            Grid2D::new(GridDimensions2D(5, 2), cell_size),
            Err(GridError::InvalidGridSize(_))
        ));
    }

    #[test]
    fn test_grid_creation_invalid_spacing() {
        let dims = GridDimensions2D(5, 5);
        assert!(matches!(Grid2D::new(dims, CellSize2D(0.0, 0.1)), Err(GridError::InvalidSpacing(_))));
        assert!(matches!(Grid2D::new(dims, CellSize2D(0.1, -1.0)), Err(GridError::InvalidSpacing(_))));
        assert!(matches!(Grid2D::new(dims, CellSize2D(f64::NAN, 0.1)), Err(GridError::InvalidSpacing(_))));
        assert!(Grid2D::from_extent(dims, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_from_extent_spacing() {
        let grid = Grid2D::from_extent(GridDimensions2D(11, 21), 2.0, 1.0).unwrap();
        assert_relative_eq!(grid.dx(), 0.2, epsilon = 1e-12);
        assert_relative_eq!(grid.dy(), 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_sample_orientation() {
        let grid = Grid2D::from_extent(GridDimensions2D(4, 3), 3.0, 2.0).unwrap();
        let x = grid.sample(|x, _| x);
        let y = grid.sample(|_, y| y);
        // columns advance in x, rows advance in y
        assert_relative_eq!(x[(0, 3)], 3.0, epsilon = 1e-12);
        assert_relative_eq!(x[(2, 0)], 0.0, epsilon = 1e-12);
        assert_relative_eq!(y[(2, 0)], 2.0, epsilon = 1e-12);
        assert_relative_eq!(y[(0, 3)], 0.0, epsilon = 1e-12);
    }
}
