pub mod derive;

use crate::domain::grid2d::{Grid2D, ScalarField};
use derive::gradient;

pub use derive::{advection, laplacian};

/// Euclidean (Frobenius) norm of the interior entries of `field`.
pub fn interior_norm(field: &ScalarField) -> f64 {
    let (nrows, ncols) = field.shape();
    if nrows < 3 || ncols < 3 {
        return 0.0;
    }
    field.view((1, 1), (nrows - 2, ncols - 2)).norm()
}

/// `du/dx + dv/dy` on interior points via centered differences; boundaries stay zero.
pub fn divergence(u: &ScalarField, v: &ScalarField, grid: &Grid2D) -> ScalarField {
    let (du_dx, _) = gradient(u, grid);
    let (_, dv_dy) = gradient(v, grid);
    du_dx + dv_dy
}

/// Interior norm of the velocity divergence, the mass-conservation monitor.
pub fn divergence_norm(u: &ScalarField, v: &ScalarField, grid: &Grid2D) -> f64 {
    interior_norm(&divergence(u, v, grid))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid2d::GridDimensions2D;
    use nalgebra::dmatrix;
    use approx::assert_relative_eq;

    #[test]
    fn test_interior_norm_ignores_boundary() {
        let f = dmatrix![
            100.0, 100.0, 100.0, 100.0;
            100.0,   3.0,   4.0, 100.0;
            100.0, 100.0, 100.0, 100.0
        ];
        assert_relative_eq!(interior_norm(&f), 5.0, epsilon = 1e-12);
        assert_eq!(interior_norm(&dmatrix![1.0, 2.0; 3.0, 4.0]), 0.0);
    }

    #[test]
    fn test_divergence_of_solenoidal_field() {
        // u = x, v = -y is divergence free
        let grid = Grid2D::from_extent(GridDimensions2D(7, 6), 1.0, 2.0).unwrap();
        let u = grid.sample(|x, _| x);
        let v = grid.sample(|_, y| -y);
        assert!(divergence_norm(&u, &v, &grid) < 1e-12);
    }

    #[test]
    fn test_divergence_of_expanding_field() {
        // u = x, v = y has divergence 2 everywhere
        let grid = Grid2D::from_extent(GridDimensions2D(5, 5), 1.0, 1.0).unwrap();
        let div = divergence(&grid.sample(|x, _| x), &grid.sample(|_, y| y), &grid);
        assert_relative_eq!(div[(2, 2)], 2.0, epsilon = 1e-12);
        assert_relative_eq!(interior_norm(&div), 2.0 * 3.0, epsilon = 1e-12); // sqrt(9 * 4)
    }
}
