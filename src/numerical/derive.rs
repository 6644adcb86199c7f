use crate::domain::grid2d::{Grid2D, ScalarField};

/// Interior rows and columns of a field. Empty when the field is thinner than 3 along an axis.
fn interior(field: &ScalarField) -> (std::ops::Range<usize>, std::ops::Range<usize>) {
    let (nrows, ncols) = field.shape();
    (1..nrows.saturating_sub(1), 1..ncols.saturating_sub(1))
}

/// Centered second-order gradient `(df/dx, df/dy)` on interior points.
///
/// ```text
/// df/dx[i,j] = (f[i,j+1] - f[i,j-1]) / (2 dx)
/// df/dy[i,j] = (f[i+1,j] - f[i-1,j]) / (2 dy)
/// ```
///
/// Boundary rows and columns of both results stay zero and carry no meaning.
pub fn gradient(field: &ScalarField, grid: &Grid2D) -> (ScalarField, ScalarField) {
    let (nrows, ncols) = field.shape();
    let mut df_dx = ScalarField::zeros(nrows, ncols);
    let mut df_dy = ScalarField::zeros(nrows, ncols);
    let two_dx = 2.0 * grid.dx();
    let two_dy = 2.0 * grid.dy();

    let (rows, cols) = interior(field);
    for i in rows {
        for j in cols.clone() {
            df_dx[(i, j)] = (field[(i, j + 1)] - field[(i, j - 1)]) / two_dx;
            df_dy[(i, j)] = (field[(i + 1, j)] - field[(i - 1, j)]) / two_dy;
        }
    }
    (df_dx, df_dy)
}

/// Five-point Laplacian on interior points; boundary entries stay zero.
///
/// ```text
/// lap[i,j] = (f[i,j-1] - 2 f[i,j] + f[i,j+1]) / dx^2 + (f[i-1,j] - 2 f[i,j] + f[i+1,j]) / dy^2
/// ```
pub fn laplacian(field: &ScalarField, grid: &Grid2D) -> ScalarField {
    let (nrows, ncols) = field.shape();
    let mut lap = ScalarField::zeros(nrows, ncols);
    let dx2 = grid.dx() * grid.dx();
    let dy2 = grid.dy() * grid.dy();

    let (rows, cols) = interior(field);
    for i in rows {
        for j in cols.clone() {
            let center = 2.0 * field[(i, j)];
            lap[(i, j)] = (field[(i, j - 1)] - center + field[(i, j + 1)]) / dx2
                + (field[(i - 1, j)] - center + field[(i + 1, j)]) / dy2;
        }
    }
    lap
}

/// First-order upwind advection `u df/dx + v df/dy` on interior points.
///
/// The stencil direction follows the sign of the transporting component at the point:
/// backward difference where it is positive, forward difference otherwise.
pub fn advection(u: &ScalarField, v: &ScalarField, field: &ScalarField, grid: &Grid2D) -> ScalarField {
    let (nrows, ncols) = field.shape();
    let mut adv = ScalarField::zeros(nrows, ncols);
    let dx = grid.dx();
    let dy = grid.dy();

    let (rows, cols) = interior(field);
    for i in rows {
        for j in cols.clone() {
            let uij = u[(i, j)];
            let vij = v[(i, j)];
            let x_term = if uij > 0.0 {
                uij * (field[(i, j)] - field[(i, j - 1)]) / dx
            } else {
                uij * (field[(i, j + 1)] - field[(i, j)]) / dx
            };
            let y_term = if vij > 0.0 {
                vij * (field[(i, j)] - field[(i - 1, j)]) / dy
            } else {
                vij * (field[(i + 1, j)] - field[(i, j)]) / dy
            };
            adv[(i, j)] = x_term + y_term;
        }
    }
    adv
}
