//! Per-unit monthly gamma parameter tables.

use hydronorm_stats::flatten_cells;
use ndarray::{ArrayView2, ArrayView3};

use crate::error::GammaError;
use crate::params::GammaParams;

/// Why a unit-month has no parameters after fitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Fewer positive values than `min_events`.
    TooFewEvents {
        /// Number of positive values found.
        n_events: usize,
    },
    /// Fewer than 3 distinct values or near-zero variance.
    Degenerate,
}

/// A unit-month left without parameters by [`fit_gamma_table`](crate::fit_gamma_table).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedFit {
    /// Station or cell index.
    pub unit: usize,
    /// Calendar month (1..=12).
    pub month: u8,
    /// Cause of the skip.
    pub reason: SkipReason,
}

/// Monthly gamma parameters for each unit (station or grid cell).
///
/// Grid cells are numbered row-major, `r * cols + c`. A month without
/// parameters is `None`; the transforms floor (forward) or zero (inverse)
/// every value that falls in it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GammaTable {
    params: Vec<[Option<GammaParams>; 12]>,
    skipped: Vec<SkippedFit>,
}

impl GammaTable {
    /// Creates a table from per-unit monthly parameters.
    pub fn new(params: Vec<[Option<GammaParams>; 12]>) -> Self {
        Self {
            params,
            skipped: Vec::new(),
        }
    }

    pub(crate) fn with_skipped(mut self, skipped: Vec<SkippedFit>) -> Self {
        self.skipped = skipped;
        self
    }

    /// Loads a station table from `(units, 12)` shape and scale arrays.
    ///
    /// Entries that are non-finite or non-positive mean "no parameters".
    ///
    /// # Errors
    ///
    /// Returns [`GammaError::TableShape`] if the arrays differ in shape or
    /// the second axis is not 12 months long.
    pub fn from_shape_scale(
        shape: ArrayView2<'_, f64>,
        scale: ArrayView2<'_, f64>,
    ) -> Result<Self, GammaError> {
        if shape.dim() != scale.dim() || shape.ncols() != 12 {
            return Err(GammaError::TableShape {
                shape: shape.shape().to_vec(),
                scale: scale.shape().to_vec(),
            });
        }
        let params = shape
            .outer_iter()
            .zip(scale.outer_iter())
            .map(|(k, theta)| std::array::from_fn(|m| GammaParams::new(k[m], theta[m])))
            .collect();
        Ok(Self::new(params))
    }

    /// Loads a grid table from `(rows, cols, 12)` shape and scale arrays.
    ///
    /// # Errors
    ///
    /// Same conditions as [`GammaTable::from_shape_scale`].
    pub fn from_grid(
        shape: ArrayView3<'_, f64>,
        scale: ArrayView3<'_, f64>,
    ) -> Result<Self, GammaError> {
        if shape.dim() != scale.dim() {
            return Err(GammaError::TableShape {
                shape: shape.shape().to_vec(),
                scale: scale.shape().to_vec(),
            });
        }
        Self::from_shape_scale(flatten_cells(shape).view(), flatten_cells(scale).view())
            .map_err(|_| GammaError::TableShape {
                shape: shape.shape().to_vec(),
                scale: scale.shape().to_vec(),
            })
    }

    /// Number of units covered.
    pub fn n_units(&self) -> usize {
        self.params.len()
    }

    /// Parameters for a unit and 1-indexed month.
    ///
    /// # Panics
    ///
    /// Panics if `unit` is out of range or `month` is outside 1..=12.
    pub fn params(&self, unit: usize, month: u8) -> Option<GammaParams> {
        assert!(
            (1..=12).contains(&month),
            "month must be in 1..=12, got {month}"
        );
        self.params[unit][(month - 1) as usize]
    }

    /// All twelve months of one unit (0-indexed).
    pub fn unit(&self, unit: usize) -> &[Option<GammaParams>; 12] {
        &self.params[unit]
    }

    /// Unit-months skipped during fitting. Empty for loaded tables.
    pub fn skipped(&self) -> &[SkippedFit] {
        &self.skipped
    }

    /// Number of unit-months that have parameters.
    pub fn n_fitted(&self) -> usize {
        self.params.iter().flatten().filter(|p| p.is_some()).count()
    }

    pub(crate) fn check_units(&self, n_units: usize) -> Result<(), GammaError> {
        if self.n_units() != n_units {
            return Err(GammaError::UnitCountMismatch {
                table: self.n_units(),
                data: n_units,
            });
        }
        Ok(())
    }
}
