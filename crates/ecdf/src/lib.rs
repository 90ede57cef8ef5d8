//! Monthly empirical CDF tables and the quantile-normal transform.
//!
//! Positive observations are ranked per calendar month (pooled over all
//! stations, or per station with optional neighbor pooling for sparse
//! records) and mapped to standard normal scores through those tables.
//! The inverse maps scores back by interpolating the tables with
//! extrapolation.
//!
//! | Module | Description |
//! |--------|-------------|
//! | `config` | Builder configs for table construction and the transforms |
//! | `table` | Single-stratum [`EmpiricalCdf`] |
//! | `tables` | [`MonthlyCdfs`] and the station-level [`CdfTables`] |
//! | `neighbors` | [`NeighborRanking`] used for sparse-station pooling |
//! | `build` | [`build_monthly_cdfs`] |
//! | `transform` | Forward and inverse transforms for station and grid data |

mod build;
mod config;
mod error;
mod neighbors;
mod table;
mod tables;
mod transform;

pub use build::build_monthly_cdfs;
pub use config::{CdfConfig, InterpMethod, QuantileConfig};
pub use error::EcdfError;
pub use neighbors::NeighborRanking;
pub use table::EmpiricalCdf;
pub use tables::{CdfTables, MonthlyCdfs, Underfilled};
pub use transform::{
    inverse_quantile_transform, inverse_quantile_transform_grid, quantile_transform,
    quantile_transform_grid,
};
