use approx::assert_relative_eq;
use hydronorm_ecdf::{
    CdfConfig, NeighborRanking, QuantileConfig, build_monthly_cdfs, inverse_quantile_transform,
    quantile_transform,
};
use hydronorm_stats::norm_ppf;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Gamma as GammaDist};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generates gamma-distributed daily precipitation for several stations with
/// 30 days/month. Each station and month has its own shape and scale; with
/// probability `dry_prob` a day is dry (0.0).
///
/// Returns `(data, months)` with `data` shaped `(n_stations, n_times)`.
fn synthetic_stations(
    n_stations: usize,
    n_years: usize,
    dry_prob: f64,
    seed: u64,
) -> (Array2<f64>, Vec<u8>) {
    let days_per_month = 30;
    let n_times = n_years * 12 * days_per_month;
    let mut rng = StdRng::seed_from_u64(seed);

    let months: Vec<u8> = (0..n_times)
        .map(|t| ((t / days_per_month) % 12 + 1) as u8)
        .collect();

    let mut data = Array2::zeros((n_stations, n_times));
    for s in 0..n_stations {
        for (t, &m) in months.iter().enumerate() {
            let shape = 0.8 + m as f64 * 0.1;
            let scale = 2.0 + s as f64 * 0.5;
            let dist = GammaDist::new(shape, scale).expect("valid gamma params");
            data[[s, t]] = if rng.random_bool(dry_prob) {
                0.0
            } else {
                dist.sample(&mut rng)
            };
        }
    }
    (data, months)
}

/// Asserts that every value strictly inside its table's range and above the
/// reconstruction floor survives a forward and inverse pass.
fn assert_round_trip(
    data: &Array2<f64>,
    back: &Array2<f64>,
    months: &[u8],
    tables: &hydronorm_ecdf::CdfTables,
    min_est_value: f64,
) -> usize {
    let mut checked = 0;
    for ((s, t), &x) in data.indexed_iter() {
        let cdf = tables.get(s, months[t]);
        let Some(&max) = cdf.values().last() else {
            continue;
        };
        if x <= 0.0 || x >= max || x < min_est_value {
            continue;
        }
        assert_relative_eq!(back[[s, t]], x, max_relative = 1e-6);
        checked += 1;
    }
    checked
}

// ---------------------------------------------------------------------------
// 1. per_station_round_trip
// ---------------------------------------------------------------------------
#[test]
fn per_station_round_trip() {
    let (data, months) = synthetic_stations(3, 5, 0.4, 7);
    let cdf_config = CdfConfig::new().with_pooled(false).with_add_noise(false);
    let q_config = QuantileConfig::new();

    let tables = build_monthly_cdfs(data.view(), &months, &cdf_config, None).unwrap();
    let z = quantile_transform(data.view(), &months, &tables, &q_config).unwrap();
    let back = inverse_quantile_transform(z.view(), &months, &tables, &q_config).unwrap();

    assert_eq!(back.dim(), data.dim());
    let checked = assert_round_trip(&data, &back, &months, &tables, q_config.min_est_value());
    assert!(checked > 1000, "only {checked} values checked");
}

// ---------------------------------------------------------------------------
// 2. pooled_round_trip
// ---------------------------------------------------------------------------
#[test]
fn pooled_round_trip() {
    let (data, months) = synthetic_stations(4, 3, 0.5, 11);
    let q_config = QuantileConfig::new();

    let tables = build_monthly_cdfs(data.view(), &months, &CdfConfig::new(), None).unwrap();
    assert!(tables.is_pooled());
    let z = quantile_transform(data.view(), &months, &tables, &q_config).unwrap();
    let back = inverse_quantile_transform(z.view(), &months, &tables, &q_config).unwrap();

    let checked = assert_round_trip(&data, &back, &months, &tables, q_config.min_est_value());
    assert!(checked > 500, "only {checked} values checked");
}

// ---------------------------------------------------------------------------
// 3. forward_scores_are_bounded
// ---------------------------------------------------------------------------
#[test]
fn forward_scores_are_bounded() {
    let (data, months) = synthetic_stations(2, 4, 0.3, 3);
    let cdf_config = CdfConfig::new().with_pooled(false).with_seed(1);
    let q_config = QuantileConfig::new();

    let tables = build_monthly_cdfs(data.view(), &months, &cdf_config, None).unwrap();
    let z = quantile_transform(data.view(), &months, &tables, &q_config).unwrap();

    let z_max = norm_ppf(q_config.max_probability());
    for &v in &z {
        assert!(v.is_finite(), "forward produced {v}");
        assert!(v >= q_config.min_z_value() && v <= z_max + 1e-12);
    }
}

// ---------------------------------------------------------------------------
// 4. neighbor_pooled_round_trip
// ---------------------------------------------------------------------------
#[test]
fn neighbor_pooled_round_trip() {
    // One year of data gives at most 30 values per station-month, below the
    // 35-value threshold, so every stratum borrows from neighbors.
    let (data, months) = synthetic_stations(4, 1, 0.1, 21);
    let ranking = NeighborRanking::new(vec![
        vec![1, 2, 3],
        vec![0, 2, 3],
        vec![3, 1, 0],
        vec![2, 1, 0],
    ]);
    let cdf_config = CdfConfig::new()
        .with_pooled(false)
        .with_add_noise(false)
        .with_min_num_obs(35);
    let q_config = QuantileConfig::new();

    let tables = build_monthly_cdfs(data.view(), &months, &cdf_config, Some(&ranking)).unwrap();
    for s in 0..4 {
        for m in 1..=12u8 {
            assert!(tables.get(s, m).len() >= 35, "station {s} month {m} not pooled");
        }
    }
    assert!(tables.underfilled().is_empty());

    let z = quantile_transform(data.view(), &months, &tables, &q_config).unwrap();
    let back = inverse_quantile_transform(z.view(), &months, &tables, &q_config).unwrap();
    let checked = assert_round_trip(&data, &back, &months, &tables, q_config.min_est_value());
    assert!(checked > 0);
}
