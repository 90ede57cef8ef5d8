//! Standard normal distribution helpers.
//!
//! Both functions go through the complementary error function so that
//! out-of-domain input propagates `NaN` instead of panicking.

use std::f64::consts::SQRT_2;

use statrs::function::erf::{erfc, erfc_inv};

/// Standard normal cumulative distribution function Φ(z).
///
/// Returns `NaN` for `NaN` input.
pub fn norm_cdf(z: f64) -> f64 {
    if z.is_nan() {
        return f64::NAN;
    }
    0.5 * erfc(-z / SQRT_2)
}

/// Standard normal quantile function Φ⁻¹(p).
///
/// Returns `NaN` if `p` is `NaN` or outside `[0, 1]`. `p = 0` and `p = 1`
/// map to negative and positive infinity.
pub fn norm_ppf(p: f64) -> f64 {
    if !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    -SQRT_2 * erfc_inv(2.0 * p)
}
