//! Single-stratum empirical CDF table.

use hydronorm_stats::{Bounds, interp_linear};

use crate::error::EcdfError;

/// Empirical CDF of one stratum (a month, optionally a station).
///
/// Holds the sorted positive observations and their rank-based cumulative
/// probabilities `rank / n`, rank starting at 1. Values are non-decreasing
/// and probabilities strictly increasing in `(0, 1]`. An empty table means
/// the stratum had no positive observations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmpiricalCdf {
    values: Vec<f64>,
    probabilities: Vec<f64>,
}

impl EmpiricalCdf {
    /// Builds a table from raw observations.
    ///
    /// Missing, infinite, and non-positive values are dropped.
    pub fn from_observations(observations: &[f64]) -> Self {
        Self::from_unsorted(positive_values(observations.iter().copied()))
    }

    /// Sorts `values` and assigns `rank / n`. Callers filter first.
    pub(crate) fn from_unsorted(mut values: Vec<f64>) -> Self {
        values.sort_by(f64::total_cmp);
        let n = values.len() as f64;
        let probabilities = (1..=values.len()).map(|rank| rank as f64 / n).collect();
        Self {
            values,
            probabilities,
        }
    }

    /// Creates a table from precomputed columns.
    ///
    /// # Errors
    ///
    /// Returns [`EcdfError::InvalidTable`] if the columns differ in length,
    /// a value is non-finite, values decrease, or probabilities are not
    /// strictly increasing within `(0, 1]`.
    pub fn from_parts(values: Vec<f64>, probabilities: Vec<f64>) -> Result<Self, EcdfError> {
        if values.len() != probabilities.len() {
            return Err(EcdfError::InvalidTable {
                reason: format!(
                    "values has {} entries, probabilities has {}",
                    values.len(),
                    probabilities.len()
                ),
            });
        }
        if let Some(v) = values.iter().find(|v| !v.is_finite()) {
            return Err(EcdfError::InvalidTable {
                reason: format!("non-finite value {v}"),
            });
        }
        if values.windows(2).any(|w| w[1] < w[0]) {
            return Err(EcdfError::InvalidTable {
                reason: "values must be sorted ascending".to_string(),
            });
        }
        if probabilities.iter().any(|&p| !(p > 0.0 && p <= 1.0)) {
            return Err(EcdfError::InvalidTable {
                reason: "probabilities must lie in (0, 1]".to_string(),
            });
        }
        if probabilities.windows(2).any(|w| w[1] <= w[0]) {
            return Err(EcdfError::InvalidTable {
                reason: "probabilities must be strictly increasing".to_string(),
            });
        }
        Ok(Self {
            values,
            probabilities,
        })
    }

    /// Sorted observation values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Cumulative probability of each value.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the stratum had no positive observations.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Cumulative probability of `value` by linear interpolation.
    ///
    /// Does not extrapolate: values outside the observed range (and `NaN`)
    /// return `NaN`.
    pub fn probability(&self, value: f64) -> f64 {
        interp_linear(&self.values, &self.probabilities, value, Bounds::Fill)
    }

    /// Value at cumulative probability `p` by linear interpolation.
    ///
    /// Extrapolates linearly beyond the table's first and last entries.
    /// Returns `NaN` for an empty table or `NaN` input.
    pub fn quantile(&self, p: f64) -> f64 {
        interp_linear(&self.probabilities, &self.values, p, Bounds::Extrapolate)
    }
}

/// Keeps finite values strictly greater than zero.
pub(crate) fn positive_values(values: impl Iterator<Item = f64>) -> Vec<f64> {
    values.filter(|v| v.is_finite() && *v > 0.0).collect()
}
