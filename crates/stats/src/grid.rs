//! Conversion between gridded and cell-major layouts.
//!
//! Cells are numbered row-major: cell `r * cols + c` holds grid point
//! `(r, c)`. The time axis stays last in both layouts.

use ndarray::{Array2, Array3, ArrayView3};

/// Flattens a `(rows, cols, time)` grid into `(rows * cols, time)`.
pub fn flatten_cells(data: ArrayView3<'_, f64>) -> Array2<f64> {
    let (rows, cols, n_times) = data.dim();
    Array2::from_shape_fn((rows * cols, n_times), |(cell, t)| {
        data[[cell / cols, cell % cols, t]]
    })
}

/// Restores a `(rows * cols, time)` array to `(rows, cols, time)`.
///
/// # Panics
///
/// Panics if `cells` does not have `rows * cols` rows.
pub fn unflatten_cells(cells: &Array2<f64>, rows: usize, cols: usize) -> Array3<f64> {
    assert_eq!(
        cells.nrows(),
        rows * cols,
        "unflatten_cells: expected {} cells, got {}",
        rows * cols,
        cells.nrows()
    );
    let n_times = cells.ncols();
    Array3::from_shape_fn((rows, cols, n_times), |(r, c, t)| cells[[r * cols + c, t]])
}
