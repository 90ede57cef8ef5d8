use approx::assert_relative_eq;
use hydronorm_gamma::{
    GammaConfig, GammaParams, GammaTable, fit_gamma_table, fit_gamma_table_grid,
    gamma_back_transform, gamma_back_transform_grid, gamma_transform, gamma_transform_grid,
};
use ndarray::{Array2, Array3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Gamma as GammaDist};
use statrs::distribution::{ContinuousCDF, Gamma};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Samples `(n_units, n_times)` gamma(shape, scale) values with a dry
/// fraction, plus a months slice cycling through 1..=12.
fn synthetic(
    n_units: usize,
    n_times: usize,
    shape: f64,
    scale: f64,
    dry_prob: f64,
    seed: u64,
) -> (Array2<f64>, Vec<u8>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let dist = GammaDist::new(shape, scale).expect("valid gamma params");
    let data = Array2::from_shape_simple_fn((n_units, n_times), || {
        if rng.random_bool(dry_prob) {
            0.0
        } else {
            dist.sample(&mut rng)
        }
    });
    let months = (0..n_times).map(|t| (t % 12 + 1) as u8).collect();
    (data, months)
}

// ---------------------------------------------------------------------------
// 1. known_params_round_trip
// ---------------------------------------------------------------------------
#[test]
fn known_params_round_trip() {
    let (data, months) = synthetic(3, 240, 2.0, 3.0, 0.3, 42);
    let table = GammaTable::new(vec![[GammaParams::new(2.0, 3.0); 12]; 3]);
    let config = GammaConfig::new();

    let z = gamma_transform(data.view(), &months, &table, &config).unwrap();
    let back = gamma_back_transform(z.view(), &months, &table, &config).unwrap();

    let mut checked = 0;
    for (&x, &y) in data.iter().zip(back.iter()) {
        if x >= config.min_est_value() {
            assert_relative_eq!(y, x, max_relative = 1e-6);
            checked += 1;
        }
    }
    assert!(checked > 300);
}

// ---------------------------------------------------------------------------
// 2. fitted_table_round_trip
// ---------------------------------------------------------------------------
#[test]
fn fitted_table_round_trip() {
    let (data, months) = synthetic(2, 1200, 2.0, 3.0, 0.2, 7);
    let config = GammaConfig::new();

    let table = fit_gamma_table(data.view(), &months, &config).unwrap();
    assert_eq!(table.n_fitted(), 24);
    for m in 1..=12u8 {
        let p = table.params(0, m).unwrap();
        assert_relative_eq!(p.mean(), 6.0, max_relative = 0.3);
    }

    let z = gamma_transform(data.view(), &months, &table, &config).unwrap();
    let back = gamma_back_transform(z.view(), &months, &table, &config).unwrap();
    for ((u, t), &x) in data.indexed_iter() {
        if x >= config.min_est_value() {
            assert_relative_eq!(back[[u, t]], x, max_relative = 1e-6);
        }
    }
}

// ---------------------------------------------------------------------------
// 3. station_tail_values_round_trip
// ---------------------------------------------------------------------------
#[test]
fn station_tail_values_round_trip() {
    let table = GammaTable::new(vec![[GammaParams::new(2.0, 3.0); 12]; 2]);
    let config = GammaConfig::new();
    let data = Array2::from_shape_vec((2, 3), vec![30.0, 45.0, 60.0, 5.0, 12.0, 70.0]).unwrap();
    let months = [1, 6, 12];

    let cap = Gamma::new(2.0, 1.0 / 3.0)
        .unwrap()
        .inverse_cdf(config.max_probability());
    assert!(cap < 45.0);

    let z = gamma_transform(data.view(), &months, &table, &config).unwrap();
    let back = gamma_back_transform(z.view(), &months, &table, &config).unwrap();
    for (&x, &y) in data.iter().zip(back.iter()) {
        assert_relative_eq!(y, x, max_relative = 1e-6);
    }
}

// ---------------------------------------------------------------------------
// 4. grid_shape_preserved
// ---------------------------------------------------------------------------
#[test]
fn grid_shape_preserved() {
    let mut rng = StdRng::seed_from_u64(3);
    let z = Array3::from_shape_simple_fn((4, 5, 100), || rng.random_range(-3.0..3.0));
    let months: Vec<u8> = (0..100).map(|t| (t % 12 + 1) as u8).collect();
    let shape = Array3::from_shape_fn((4, 5, 12), |(r, c, m)| 1.0 + (r + c + m) as f64 * 0.1);
    let scale = Array3::from_elem((4, 5, 12), 2.5);
    let table = GammaTable::from_grid(shape.view(), scale.view()).unwrap();

    let x = gamma_back_transform_grid(z.view(), &months, &table, &GammaConfig::new()).unwrap();
    assert_eq!(x.dim(), (4, 5, 100));
    assert!(x.iter().all(|v| v.is_finite() && *v >= 0.0));
}

// ---------------------------------------------------------------------------
// 5. grid_round_trip_per_cell
// ---------------------------------------------------------------------------
#[test]
fn grid_round_trip_per_cell() {
    let (flat, months) = synthetic(6, 600, 1.5, 4.0, 0.25, 19);
    let grid = Array3::from_shape_fn((2, 3, 600), |(r, c, t)| flat[[r * 3 + c, t]]);
    let config = GammaConfig::new();

    let table = fit_gamma_table_grid(grid.view(), &months, &config).unwrap();
    assert_eq!(table.n_units(), 6);

    let z = gamma_transform_grid(grid.view(), &months, &table, &config).unwrap();
    assert_eq!(z.dim(), grid.dim());
    let back = gamma_back_transform_grid(z.view(), &months, &table, &config).unwrap();

    for ((r, c, t), &x) in grid.indexed_iter() {
        if x >= 1.0 && x < 20.0 {
            assert_relative_eq!(back[[r, c, t]], x, max_relative = 1e-6);
        }
    }
}
