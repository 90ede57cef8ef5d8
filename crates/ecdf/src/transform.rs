//! Quantile-normal transform and its inverse.
//!
//! Station data is laid out `(n_stations, n_times)`; gridded data
//! `(rows, cols, n_times)` is processed cell by cell after row-major
//! flattening and returned in its original shape.

use hydronorm_stats::{InvalidMonth, flatten_cells, norm_cdf, norm_ppf, unflatten_cells};
use ndarray::{Array2, Array3, ArrayView2, ArrayView3};
use tracing::debug;

use crate::config::{InterpMethod, QuantileConfig};
use crate::error::EcdfError;
use crate::table::EmpiricalCdf;
use crate::tables::CdfTables;

/// Checks the months slice against the time axis.
fn check_months(months: &[u8], n_times: usize) -> Result<(), EcdfError> {
    if months.len() != n_times {
        return Err(EcdfError::LengthMismatch {
            expected: n_times,
            got: months.len(),
        });
    }
    if let Some(&month) = months.iter().find(|m| !(1..=12).contains(*m)) {
        return Err(InvalidMonth { month }.into());
    }
    Ok(())
}

/// Table lookup value → probability under `method`.
fn lookup_probability(method: InterpMethod, cdf: &EmpiricalCdf, value: f64) -> f64 {
    match method {
        InterpMethod::Linear => cdf.probability(value),
    }
}

/// Table lookup probability → value under `method`.
fn lookup_quantile(method: InterpMethod, cdf: &EmpiricalCdf, p: f64) -> f64 {
    match method {
        InterpMethod::Linear => cdf.quantile(p),
    }
}

/// Normal score of a single value, or `None` when it must be floored.
fn normal_score(
    value: f64,
    cdf: &EmpiricalCdf,
    method: InterpMethod,
    max_probability: f64,
) -> Option<f64> {
    if !(value > 0.0) {
        return None;
    }
    let p = lookup_probability(method, cdf, value);
    if p.is_nan() {
        return None;
    }
    let z = norm_ppf(p.min(max_probability));
    z.is_finite().then_some(z)
}

/// Maps positive observations to standard normal scores.
///
/// Each value is converted to a cumulative probability through the table
/// of its station and month (no extrapolation beyond the table), capped at
/// `config.max_probability()`, and mapped through the standard normal
/// quantile function. Missing, non-positive, and out-of-table values get
/// `config.min_z_value()`. Stations whose row is entirely missing come out
/// as `NaN`.
///
/// # Errors
///
/// Returns [`EcdfError`] on an invalid configuration, a months slice that
/// does not match the time axis, an invalid month, or per-station tables
/// that do not cover every station.
#[tracing::instrument(skip_all, fields(n_stations = data.nrows(), n_times = data.ncols()))]
pub fn quantile_transform(
    data: ArrayView2<'_, f64>,
    months: &[u8],
    tables: &CdfTables,
    config: &QuantileConfig,
) -> Result<Array2<f64>, EcdfError> {
    config.validate()?;
    check_months(months, data.ncols())?;
    tables.check_units(data.nrows())?;

    let method = config.interp_method();
    let max_probability = config.max_probability();
    let floor = config.min_z_value();
    let mut out = Array2::from_elem(data.dim(), f64::NAN);
    let mut n_missing = 0usize;

    for (s, (row, mut out_row)) in data.outer_iter().zip(out.outer_iter_mut()).enumerate() {
        if row.iter().all(|v| v.is_nan()) {
            n_missing += 1;
            continue;
        }
        let monthly = tables.station(s);
        for ((&v, &m), z) in row.iter().zip(months).zip(out_row.iter_mut()) {
            *z = normal_score(v, monthly.month(m), method, max_probability).unwrap_or(floor);
        }
    }

    if n_missing > 0 {
        debug!(n_missing, "stations without observations left missing");
    }
    Ok(out)
}

/// Gridded variant of [`quantile_transform`] for `(rows, cols, n_times)`.
///
/// Per-station tables are indexed by cell `r * cols + c`.
///
/// # Errors
///
/// Same conditions as [`quantile_transform`].
pub fn quantile_transform_grid(
    data: ArrayView3<'_, f64>,
    months: &[u8],
    tables: &CdfTables,
    config: &QuantileConfig,
) -> Result<Array3<f64>, EcdfError> {
    let (rows, cols, _) = data.dim();
    let cells = flatten_cells(data);
    let z = quantile_transform(cells.view(), months, tables, config)?;
    Ok(unflatten_cells(&z, rows, cols))
}

/// Maps normal scores back to the observation scale.
///
/// Scores become probabilities through the standard normal CDF, which are
/// then inverted through the station-month table with linear
/// extrapolation beyond its range. Results below
/// `config.min_est_value()`, missing scores, and empty tables produce `0`.
///
/// # Errors
///
/// Same conditions as [`quantile_transform`].
#[tracing::instrument(skip_all, fields(n_stations = data.nrows(), n_times = data.ncols()))]
pub fn inverse_quantile_transform(
    data: ArrayView2<'_, f64>,
    months: &[u8],
    tables: &CdfTables,
    config: &QuantileConfig,
) -> Result<Array2<f64>, EcdfError> {
    config.validate()?;
    check_months(months, data.ncols())?;
    tables.check_units(data.nrows())?;

    let method = config.interp_method();
    let min_est_value = config.min_est_value();
    let mut out = Array2::zeros(data.dim());

    for (s, (row, mut out_row)) in data.outer_iter().zip(out.outer_iter_mut()).enumerate() {
        let monthly = tables.station(s);
        for ((&z, &m), x) in row.iter().zip(months).zip(out_row.iter_mut()) {
            let value = lookup_quantile(method, monthly.month(m), norm_cdf(z));
            if value >= min_est_value {
                *x = value;
            }
        }
    }
    Ok(out)
}

/// Gridded variant of [`inverse_quantile_transform`].
///
/// The output has exactly the shape of `data`.
///
/// # Errors
///
/// Same conditions as [`quantile_transform`].
pub fn inverse_quantile_transform_grid(
    data: ArrayView3<'_, f64>,
    months: &[u8],
    tables: &CdfTables,
    config: &QuantileConfig,
) -> Result<Array3<f64>, EcdfError> {
    let (rows, cols, _) = data.dim();
    let cells = flatten_cells(data);
    let values = inverse_quantile_transform(cells.view(), months, tables, config)?;
    Ok(unflatten_cells(&values, rows, cols))
}
