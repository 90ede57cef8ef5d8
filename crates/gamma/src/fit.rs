//! Method-of-moments fitting of monthly gamma tables.

use hydronorm_stats::{MonthGroups, flatten_cells, mean, variance};
use ndarray::{ArrayView1, ArrayView2, ArrayView3};
use rayon::prelude::*;
use tracing::debug;

use crate::config::GammaConfig;
use crate::error::GammaError;
use crate::params::GammaParams;
use crate::table::{GammaTable, SkipReason, SkippedFit};

/// Fits a gamma distribution to positive values by method of moments.
///
/// Returns `None` if there are fewer than 3 distinct values, the sample
/// variance is near zero, or the moment estimates are invalid.
pub(crate) fn fit_gamma_mme(values: &[f64]) -> Option<GammaParams> {
    if values.len() < 2 || count_unique(values) < 3 {
        return None;
    }
    let var = variance(values);
    if var <= 1e-10 {
        return None;
    }
    GammaParams::from_moments(mean(values), var)
}

/// Number of distinct values, treating differences up to 1e-10 as equal.
fn count_unique(values: &[f64]) -> usize {
    if values.is_empty() {
        return 0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.windows(2).filter(|w| (w[1] - w[0]).abs() > 1e-10).count() + 1
}

/// Fits the twelve months of one unit.
fn fit_unit(
    unit: usize,
    row: ArrayView1<'_, f64>,
    groups: &MonthGroups,
    min_events: usize,
) -> ([Option<GammaParams>; 12], Vec<SkippedFit>) {
    let mut params = [None; 12];
    let mut skipped = Vec::new();

    for (month, steps) in groups.iter() {
        let values: Vec<f64> = steps
            .iter()
            .map(|&t| row[t])
            .filter(|v| v.is_finite() && *v > 0.0)
            .collect();

        let reason = if values.len() < min_events {
            SkipReason::TooFewEvents {
                n_events: values.len(),
            }
        } else if let Some(p) = fit_gamma_mme(&values) {
            params[(month - 1) as usize] = Some(p);
            continue;
        } else {
            SkipReason::Degenerate
        };
        skipped.push(SkippedFit {
            unit,
            month,
            reason,
        });
    }

    (params, skipped)
}

/// Fits monthly gamma parameters for every station.
///
/// `data` has shape `(n_stations, n_times)`. Each station-month uses the
/// positive, finite values that fall in that month. Months with fewer than
/// `config.min_events()` values, or too little spread, are left without
/// parameters and listed in [`GammaTable::skipped`]. Stations are fitted
/// in parallel.
///
/// # Errors
///
/// Returns [`GammaError`] on an invalid configuration, a months slice that
/// does not match the time axis, or an invalid month.
#[tracing::instrument(skip_all, fields(n_units = data.nrows(), n_times = data.ncols()))]
pub fn fit_gamma_table(
    data: ArrayView2<'_, f64>,
    months: &[u8],
    config: &GammaConfig,
) -> Result<GammaTable, GammaError> {
    config.validate()?;
    if months.len() != data.ncols() {
        return Err(GammaError::LengthMismatch {
            expected: data.ncols(),
            got: months.len(),
        });
    }
    let groups = MonthGroups::new(months)?;
    let min_events = config.min_events();

    let fits: Vec<([Option<GammaParams>; 12], Vec<SkippedFit>)> = (0..data.nrows())
        .into_par_iter()
        .map(|u| fit_unit(u, data.row(u), &groups, min_events))
        .collect();

    let mut params = Vec::with_capacity(fits.len());
    let mut skipped = Vec::new();
    for (p, s) in fits {
        params.push(p);
        skipped.extend(s);
    }

    debug!(n_skipped = skipped.len(), "fitted gamma table");
    Ok(GammaTable::new(params).with_skipped(skipped))
}

/// Gridded variant of [`fit_gamma_table`] for `(rows, cols, n_times)`.
///
/// # Errors
///
/// Same conditions as [`fit_gamma_table`].
pub fn fit_gamma_table_grid(
    data: ArrayView3<'_, f64>,
    months: &[u8],
    config: &GammaConfig,
) -> Result<GammaTable, GammaError> {
    fit_gamma_table(flatten_cells(data).view(), months, config)
}
