//! Monthly gamma distributions and the parametric normal-score transform.
//!
//! Each unit (a station, or a grid cell numbered row-major) carries up to
//! twelve gamma distributions, one per calendar month. Positive values are
//! mapped to standard normal scores through the gamma CDF, and scores are
//! mapped back through the gamma quantile function.
//!
//! # Pipeline
//!
//! 1. **Fit** or **load** a [`GammaTable`] (method of moments, or external
//!    shape/scale arrays)
//! 2. **Forward**: pgamma → qnorm (upper tail via the survival function),
//!    floor the undefined
//! 3. **Inverse**: pnorm → qgamma, zero below `min_est_value`; the gridded
//!    inverse clips at `max_probability` first
//!
//! # Glossary
//!
//! - **MME**: Method of Moments Estimation (shape = mean²/var, scale = var/mean)
//! - **pgamma** / **qgamma**: gamma CDF and quantile function
//! - **qnorm** / **pnorm**: standard normal quantile function and CDF

mod config;
mod error;
mod fit;
mod params;
mod table;
mod transform;

pub use config::GammaConfig;
pub use error::GammaError;
pub use fit::{fit_gamma_table, fit_gamma_table_grid};
pub use params::GammaParams;
pub use table::{GammaTable, SkipReason, SkippedFit};
pub use transform::{
    gamma_back_transform, gamma_back_transform_grid, gamma_transform, gamma_transform_grid,
};
