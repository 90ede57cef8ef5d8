//! Gamma normal-score transform and its inverse.

use hydronorm_stats::{InvalidMonth, flatten_cells, norm_cdf, norm_ppf, unflatten_cells};
use ndarray::{Array2, Array3, ArrayView1, ArrayView2, ArrayView3};
use rayon::prelude::*;
use statrs::distribution::{ContinuousCDF, Gamma};
use tracing::debug;

use crate::config::GammaConfig;
use crate::error::GammaError;
use crate::params::{GammaParams, gamma_dist};
use crate::table::GammaTable;

/// Checks inputs shared by every transform entry point.
fn check_inputs(
    data: ArrayView2<'_, f64>,
    months: &[u8],
    table: &GammaTable,
    config: &GammaConfig,
) -> Result<(), GammaError> {
    config.validate()?;
    if months.len() != data.ncols() {
        return Err(GammaError::LengthMismatch {
            expected: data.ncols(),
            got: months.len(),
        });
    }
    if let Some(&month) = months.iter().find(|m| !(1..=12).contains(*m)) {
        return Err(InvalidMonth { month }.into());
    }
    table.check_units(data.nrows())
}

/// statrs distributions for one unit's twelve months.
fn unit_dists(params: &[Option<GammaParams>; 12]) -> Result<[Option<Gamma>; 12], GammaError> {
    let mut dists: [Option<Gamma>; 12] = Default::default();
    for (slot, p) in dists.iter_mut().zip(params) {
        if let Some(p) = p {
            *slot = Some(gamma_dist(p)?);
        }
    }
    Ok(dists)
}

/// Runs `f` over every unit in parallel and assembles the rows.
fn map_units<F>(data: ArrayView2<'_, f64>, f: F) -> Result<Array2<f64>, GammaError>
where
    F: Fn(usize, ArrayView1<'_, f64>) -> Result<Vec<f64>, GammaError> + Sync,
{
    let rows: Vec<Vec<f64>> = (0..data.nrows())
        .into_par_iter()
        .map(|u| f(u, data.row(u)))
        .collect::<Result<_, _>>()?;
    Ok(Array2::from_shape_fn(data.dim(), |(u, t)| rows[u][t]))
}

/// Normal score of `v` under `dist`.
///
/// Upper-tail values go through the survival function so that values far
/// above the fitted range keep a finite, increasing score instead of
/// collapsing at CDF = 1. Returns `None` when the score is undefined.
fn normal_score(dist: &Gamma, v: f64) -> Option<f64> {
    let p = dist.cdf(v);
    let z = if p > 0.5 {
        -norm_ppf(dist.sf(v).max(f64::MIN_POSITIVE))
    } else {
        norm_ppf(p)
    };
    z.is_finite().then_some(z)
}

/// Maps positive values to normal scores through each unit's monthly gamma.
///
/// Missing and non-positive values, months without parameters, and
/// undefined scores get `config.min_z_value()`. Units whose row is
/// entirely missing come out as `NaN`. Units are processed in parallel.
///
/// # Errors
///
/// Returns [`GammaError`] on an invalid configuration, a months slice that
/// does not match the time axis, an invalid month, or a table that does
/// not cover every unit.
#[tracing::instrument(skip_all, fields(n_units = data.nrows(), n_times = data.ncols()))]
pub fn gamma_transform(
    data: ArrayView2<'_, f64>,
    months: &[u8],
    table: &GammaTable,
    config: &GammaConfig,
) -> Result<Array2<f64>, GammaError> {
    check_inputs(data, months, table, config)?;
    let floor = config.min_z_value();

    let out = map_units(data, |u, row| {
        if row.iter().all(|v| v.is_nan()) {
            return Ok(vec![f64::NAN; row.len()]);
        }
        let dists = unit_dists(table.unit(u))?;
        Ok(row
            .iter()
            .zip(months)
            .map(|(&v, &m)| match &dists[(m - 1) as usize] {
                Some(dist) if v > 0.0 => normal_score(dist, v).unwrap_or(floor),
                _ => floor,
            })
            .collect())
    })?;

    debug!(n_fitted = table.n_fitted(), "gamma forward transform done");
    Ok(out)
}

/// Gridded variant of [`gamma_transform`] for `(rows, cols, n_times)`.
///
/// # Errors
///
/// Same conditions as [`gamma_transform`].
pub fn gamma_transform_grid(
    data: ArrayView3<'_, f64>,
    months: &[u8],
    table: &GammaTable,
    config: &GammaConfig,
) -> Result<Array3<f64>, GammaError> {
    let (rows, cols, _) = data.dim();
    let z = gamma_transform(flatten_cells(data).view(), months, table, config)?;
    Ok(unflatten_cells(&z, rows, cols))
}

/// Shared inverse over `(units, n_times)`; `cap` clips probabilities.
fn back_transform_units(
    data: ArrayView2<'_, f64>,
    months: &[u8],
    table: &GammaTable,
    config: &GammaConfig,
    cap: Option<f64>,
) -> Result<Array2<f64>, GammaError> {
    check_inputs(data, months, table, config)?;
    let min_est_value = config.min_est_value();
    let cap = cap.unwrap_or(1.0);

    map_units(data, |u, row| {
        let dists = unit_dists(table.unit(u))?;
        Ok(row
            .iter()
            .zip(months)
            .map(|(&z, &m)| {
                let p = norm_cdf(z);
                match &dists[(m - 1) as usize] {
                    Some(dist) if !p.is_nan() => {
                        let x = dist.inverse_cdf(p.clamp(0.0, cap));
                        if x >= min_est_value { x } else { 0.0 }
                    }
                    _ => 0.0,
                }
            })
            .collect())
    })
}

/// Maps station normal scores back to values through each unit's monthly
/// gamma.
///
/// Scores become probabilities through the standard normal CDF, then go
/// through the gamma quantile function. Results below
/// `config.min_est_value()`, missing scores, and months without parameters
/// produce `0`. Units are processed in parallel.
///
/// # Errors
///
/// Same conditions as [`gamma_transform`].
#[tracing::instrument(skip_all, fields(n_units = data.nrows(), n_times = data.ncols()))]
pub fn gamma_back_transform(
    data: ArrayView2<'_, f64>,
    months: &[u8],
    table: &GammaTable,
    config: &GammaConfig,
) -> Result<Array2<f64>, GammaError> {
    back_transform_units(data, months, table, config, None)
}

/// Gridded variant of [`gamma_back_transform`].
///
/// Probabilities are clipped at `config.max_probability()` before the
/// gamma quantile. The output has exactly the shape of `data`.
///
/// # Errors
///
/// Same conditions as [`gamma_transform`].
#[tracing::instrument(skip_all, fields(shape = ?data.shape()))]
pub fn gamma_back_transform_grid(
    data: ArrayView3<'_, f64>,
    months: &[u8],
    table: &GammaTable,
    config: &GammaConfig,
) -> Result<Array3<f64>, GammaError> {
    let (rows, cols, _) = data.dim();
    let x = back_transform_units(
        flatten_cells(data).view(),
        months,
        table,
        config,
        Some(config.max_probability()),
    )?;
    Ok(unflatten_cells(&x, rows, cols))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn uniform_table(n_units: usize, shape: f64, scale: f64) -> GammaTable {
        GammaTable::new(vec![[GammaParams::new(shape, scale); 12]; n_units])
    }

    #[test]
    fn median_maps_to_zero() {
        // Exponential with scale 2 has median 2 ln 2.
        let table = uniform_table(1, 1.0, 2.0);
        let data = array![[2.0 * 2f64.ln()]];
        let z = gamma_transform(data.view(), &[1], &table, &GammaConfig::new()).unwrap();
        assert_relative_eq!(z[[0, 0]], 0.0, epsilon = 1e-8);
    }

    #[test]
    fn floors_zero_missing_and_unfitted() {
        let mut params = [GammaParams::new(2.0, 1.0); 12];
        params[1] = None;
        let table = GammaTable::new(vec![params]);
        let data = array![[0.0, f64::NAN, 3.0, -1.0]];
        let z = gamma_transform(data.view(), &[1, 1, 2, 1], &table, &GammaConfig::new()).unwrap();
        for &v in &z {
            assert_relative_eq!(v, -4.0);
        }
    }

    #[test]
    fn upper_tail_keeps_increasing() {
        let table = uniform_table(1, 2.0, 3.0);
        let data = array![[30.0, 45.0, 60.0, 1e6]];
        let z = gamma_transform(data.view(), &[9; 4], &table, &GammaConfig::new()).unwrap();
        assert!(z[[0, 1]] > norm_ppf(0.99999));
        assert!(z.windows((1, 2)).into_iter().all(|w| w[[0, 0]] < w[[0, 1]]));
        assert!(z.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn station_tail_round_trips() {
        let table = uniform_table(1, 2.0, 3.0);
        let config = GammaConfig::new();
        let data = array![[30.0, 45.0, 60.0]];
        let months = [5; 3];
        let z = gamma_transform(data.view(), &months, &table, &config).unwrap();
        let x = gamma_back_transform(z.view(), &months, &table, &config).unwrap();
        for (&got, &want) in x.iter().zip(data.iter()) {
            assert_relative_eq!(got, want, max_relative = 1e-6);
        }
    }

    #[test]
    fn back_transform_floors() {
        let table = uniform_table(1, 2.0, 3.0);
        let data = array![[f64::NAN, -10.0]];
        let x = gamma_back_transform(data.view(), &[1; 2], &table, &GammaConfig::new()).unwrap();
        assert_eq!(x, array![[0.0, 0.0]]);
    }

    #[test]
    fn grid_back_transform_clips() {
        let table = uniform_table(2, 2.0, 3.0);
        let config = GammaConfig::new();
        let data = Array3::from_elem((1, 2, 1), 50.0);
        let x = gamma_back_transform_grid(data.view(), &[1], &table, &config).unwrap();

        let dist = gamma_dist(&GammaParams::new(2.0, 3.0).unwrap()).unwrap();
        let cap = dist.inverse_cdf(config.max_probability());
        for &v in &x {
            assert_relative_eq!(v, cap, max_relative = 1e-12);
        }
    }

    #[test]
    fn back_transform_without_params_is_zero() {
        let table = GammaTable::new(vec![[None; 12]]);
        let data = array![[0.0, 1.0]];
        let x = gamma_back_transform(data.view(), &[4, 4], &table, &GammaConfig::new()).unwrap();
        assert_eq!(x, array![[0.0, 0.0]]);
    }

    #[test]
    fn unit_count_checked() {
        let table = uniform_table(3, 2.0, 3.0);
        let data = array![[1.0], [2.0]];
        assert_eq!(
            gamma_transform(data.view(), &[1], &table, &GammaConfig::new()).unwrap_err(),
            GammaError::UnitCountMismatch { table: 3, data: 2 }
        );
    }

    #[test]
    fn invalid_month_rejected() {
        let table = uniform_table(1, 2.0, 3.0);
        let data = array![[1.0]];
        assert_eq!(
            gamma_back_transform(data.view(), &[13], &table, &GammaConfig::new()).unwrap_err(),
            GammaError::InvalidMonth(InvalidMonth { month: 13 })
        );
    }
}
