//! Normal-score transforms for zero-inflated precipitation.
//!
//! Maps skewed, zero-heavy observations onto a standard normal scale for
//! interpolation or regression, and maps results back. Three methods are
//! available behind one entry point, [`data_transformation`]:
//!
//! | Tag | Method | Tables |
//! |-----|--------|--------|
//! | `boxcox` | Power transform | none (needs `exponent`) |
//! | `ecdf` | Monthly empirical CDF, pooled or per station | [`CdfTables`] |
//! | `gamma_monthly` | Monthly gamma distribution per station or cell | [`GammaTable`] |
//!
//! Station data is `(station, time)`, gridded data `(row, col, time)`, and
//! every call takes one calendar month (1..=12) per time step.
//!
//! # Quick Start
//!
//! ```
//! use hydronorm::{Tables, TransformSettings, build_monthly_cdfs, data_transformation};
//! use ndarray::array;
//!
//! let history = array![[0.0, 0.0, 2.0, 4.0, 4.0, 6.0]];
//! let months = [1u8; 6];
//! let settings = TransformSettings::default();
//!
//! let cdfs = build_monthly_cdfs(history.view(), &months, &settings.cdf_config()?, None)?;
//! let z = data_transformation(
//!     history.view().into_dyn(),
//!     "ecdf",
//!     "transform",
//!     &settings,
//!     &months,
//!     Tables::new().with_ecdf(&cdfs),
//! )?;
//! assert_eq!(z.shape(), &[1, 6]);
//! # Ok::<(), hydronorm::TransformError>(())
//! ```

mod config;
mod dispatch;
mod error;
pub mod logging;
mod prepare;

pub use config::TransformSettings;
pub use dispatch::{
    EcdfTransform, GammaMonthlyTransform, Method, Mode, NormalScoreTransform, Tables,
    Transformer, data_transformation,
};
pub use error::TransformError;
pub use prepare::{ArithmeticOp, DerivedVariable, constrain_range};

pub use hydronorm_boxcox::{BoxCoxError, PowerTransform};
pub use hydronorm_ecdf::{
    CdfConfig, CdfTables, EcdfError, EmpiricalCdf, InterpMethod, MonthlyCdfs, NeighborRanking,
    QuantileConfig, Underfilled, build_monthly_cdfs,
};
pub use hydronorm_gamma::{
    GammaConfig, GammaError, GammaParams, GammaTable, SkipReason, SkippedFit, fit_gamma_table,
    fit_gamma_table_grid,
};
