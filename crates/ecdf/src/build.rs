//! Construction of monthly empirical CDF tables from historical data.

use hydronorm_stats::MonthGroups;
use ndarray::{ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::config::CdfConfig;
use crate::error::EcdfError;
use crate::neighbors::NeighborRanking;
use crate::table::{EmpiricalCdf, positive_values};
use crate::tables::{CdfTables, MonthlyCdfs, Underfilled};

/// Builds a seeded or OS-sourced RNG.
fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Indices of rows that contain no non-missing value.
fn all_missing_rows(data: ArrayView2<'_, f64>) -> Vec<usize> {
    data.outer_iter()
        .enumerate()
        .filter(|(_, row)| row.iter().all(|v| v.is_nan()))
        .map(|(s, _)| s)
        .collect()
}

/// Positive values of one station at the given time steps.
fn station_values(row: ArrayView1<'_, f64>, steps: &[usize]) -> Vec<f64> {
    positive_values(steps.iter().map(|&t| row[t]))
}

/// Perturbs each value by independent uniform noise in `[-level, level]`.
fn jitter(values: &mut [f64], level: f64, rng: &mut StdRng) {
    for v in values.iter_mut() {
        *v += rng.random_range(-level..=level);
    }
}

/// Builds monthly empirical CDF tables from station-major observations.
///
/// `data` has shape `(n_stations, n_times)` and `months` gives the calendar
/// month (1..=12) of each time step. With `config.pooled()` one table per
/// month is built from every station; otherwise one table per station and
/// month, optionally jittered to break ties.
///
/// When `neighbors` is given (per-station mode only), a station-month with
/// fewer than `config.min_num_obs()` values borrows the values of its
/// nearest neighbors, in ranking order, until the threshold is reached or
/// `config.max_neighbors()` neighbors have been used. Neighbor values come
/// from the tables as they were before any pooling. Strata still short
/// afterwards are kept and listed in [`CdfTables::underfilled`].
///
/// # Errors
///
/// Returns [`EcdfError`] on an invalid configuration, a months slice that
/// does not match the time axis, or a month outside 1..=12.
#[tracing::instrument(
    skip_all,
    fields(n_stations = data.nrows(), n_times = data.ncols(), pooled = config.pooled())
)]
pub fn build_monthly_cdfs(
    data: ArrayView2<'_, f64>,
    months: &[u8],
    config: &CdfConfig,
    neighbors: Option<&NeighborRanking>,
) -> Result<CdfTables, EcdfError> {
    config.validate()?;

    let n_times = data.ncols();
    if months.len() != n_times {
        return Err(EcdfError::LengthMismatch {
            expected: n_times,
            got: months.len(),
        });
    }
    let groups = MonthGroups::new(months)?;

    let missing_stations = all_missing_rows(data);
    if !missing_stations.is_empty() {
        debug!(
            n_missing = missing_stations.len(),
            "stations without any observation"
        );
    }

    if config.pooled() {
        let monthly = MonthlyCdfs::new(std::array::from_fn(|i| {
            let steps = groups.indices((i + 1) as u8);
            let mut values = Vec::new();
            for row in data.outer_iter() {
                values.extend(station_values(row, steps));
            }
            EmpiricalCdf::from_unsorted(values)
        }));
        debug!(empty_months = ?monthly.empty_months(), "built pooled tables");
        return Ok(CdfTables::pooled(monthly).with_diagnostics(Vec::new(), missing_stations));
    }

    let mut rng = make_rng(config.seed());
    let jitter_level = if config.add_noise() {
        config.noise_level()
    } else {
        0.0
    };

    let base: Vec<MonthlyCdfs> = data
        .outer_iter()
        .map(|row| {
            MonthlyCdfs::new(std::array::from_fn(|i| {
                let mut values = station_values(row, groups.indices((i + 1) as u8));
                if jitter_level > 0.0 {
                    jitter(&mut values, jitter_level, &mut rng);
                }
                EmpiricalCdf::from_unsorted(values)
            }))
        })
        .collect();

    let (stations, underfilled) = match neighbors {
        Some(ranking) if config.min_num_obs() > 0 => {
            pool_sparse_stations(&base, ranking, &missing_stations, config)
        }
        _ => (base, Vec::new()),
    };

    Ok(CdfTables::per_station(stations).with_diagnostics(underfilled, missing_stations))
}

/// Replaces sparse station-month tables with neighbor-pooled ones.
fn pool_sparse_stations(
    base: &[MonthlyCdfs],
    ranking: &NeighborRanking,
    missing_stations: &[usize],
    config: &CdfConfig,
) -> (Vec<MonthlyCdfs>, Vec<Underfilled>) {
    let min_num_obs = config.min_num_obs();
    let mut underfilled = Vec::new();

    let stations = base
        .iter()
        .enumerate()
        .map(|(s, own)| {
            if missing_stations.contains(&s) {
                return own.clone();
            }
            MonthlyCdfs::new(std::array::from_fn(|i| {
                let month = (i + 1) as u8;
                let cdf = own.month(month);
                if cdf.len() >= min_num_obs {
                    return cdf.clone();
                }

                let pooled = pool_from_neighbors(s, month, base, ranking, config);
                if pooled.len() < min_num_obs {
                    warn!(
                        station = s,
                        month,
                        n_obs = pooled.len(),
                        min_num_obs,
                        "table below min_num_obs after neighbor pooling"
                    );
                    underfilled.push(Underfilled {
                        station: s,
                        month,
                        n_obs: pooled.len(),
                    });
                }
                pooled
            }))
        })
        .collect();

    (stations, underfilled)
}

/// Combines a station's values with those of its nearest neighbors.
///
/// Self-references and unknown stations in the ranking are skipped and do
/// not count toward `config.max_neighbors()`.
fn pool_from_neighbors(
    station: usize,
    month: u8,
    base: &[MonthlyCdfs],
    ranking: &NeighborRanking,
    config: &CdfConfig,
) -> EmpiricalCdf {
    let mut values = base[station].month(month).values().to_vec();

    let candidates = ranking
        .neighbors(station)
        .iter()
        .copied()
        .filter(|&nb| nb != station && nb < base.len())
        .take(config.max_neighbors());

    for nb in candidates {
        if values.len() >= config.min_num_obs() {
            break;
        }
        values.extend_from_slice(base[nb].month(month).values());
    }

    EmpiricalCdf::from_unsorted(values)
}
