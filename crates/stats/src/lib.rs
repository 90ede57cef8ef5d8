//! Numerical helper functions shared by the hydronorm transforms.
//!
//! | Module | Description |
//! |--------|-------------|
//! | `normal` | Standard normal CDF and quantile function |
//! | `interp` | Piecewise-linear interpolation with fill/extrapolate bounds |
//! | `moments` | Sample mean and variance |
//! | `months` | Grouping of time steps by calendar month |
//! | `grid` | Flattening of `(rows, cols, time)` grids to `(cells, time)` |

mod error;
mod grid;
mod interp;
mod moments;
mod months;
mod normal;

pub use error::InvalidMonth;
pub use grid::{flatten_cells, unflatten_cells};
pub use interp::{Bounds, interp_linear};
pub use moments::{mean, variance};
pub use months::MonthGroups;
pub use normal::{norm_cdf, norm_ppf};
