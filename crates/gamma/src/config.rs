//! Configuration for gamma fitting and the gamma normal-score transform.

use crate::error::GammaError;

/// Configuration for [`fit_gamma_table`](crate::fit_gamma_table) and the
/// gamma transforms.
#[derive(Clone, Debug)]
pub struct GammaConfig {
    min_z_value: f64,
    min_est_value: f64,
    max_probability: f64,
    min_events: usize,
}

impl GammaConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: `min_z_value = -4`, `min_est_value = 0.01`,
    /// `max_probability = 0.99999`, `min_events = 10`.
    pub fn new() -> Self {
        Self {
            min_z_value: -4.0,
            min_est_value: 0.01,
            max_probability: 0.99999,
            min_events: 10,
        }
    }

    /// Sets the z-score assigned to missing or undefined values.
    pub fn with_min_z_value(mut self, v: f64) -> Self {
        self.min_z_value = v;
        self
    }

    /// Sets the reconstruction floor below which values become zero.
    pub fn with_min_est_value(mut self, v: f64) -> Self {
        self.min_est_value = v;
        self
    }

    /// Sets the probability clip applied by the gridded inverse.
    pub fn with_max_probability(mut self, p: f64) -> Self {
        self.max_probability = p;
        self
    }

    /// Sets the minimum number of positive values needed to fit a month.
    pub fn with_min_events(mut self, n: usize) -> Self {
        self.min_events = n;
        self
    }

    pub fn min_z_value(&self) -> f64 {
        self.min_z_value
    }

    pub fn min_est_value(&self) -> f64 {
        self.min_est_value
    }

    pub fn max_probability(&self) -> f64 {
        self.max_probability
    }

    pub fn min_events(&self) -> usize {
        self.min_events
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), GammaError> {
        if !self.min_z_value.is_finite() {
            return Err(GammaError::InvalidConfig {
                reason: format!("min_z_value must be finite, got {}", self.min_z_value),
            });
        }
        if !self.min_est_value.is_finite() || self.min_est_value < 0.0 {
            return Err(GammaError::InvalidConfig {
                reason: format!(
                    "min_est_value must be finite and >= 0, got {}",
                    self.min_est_value
                ),
            });
        }
        if !(self.max_probability > 0.0 && self.max_probability < 1.0) {
            return Err(GammaError::InvalidConfig {
                reason: format!(
                    "max_probability must be in (0, 1), got {}",
                    self.max_probability
                ),
            });
        }
        if self.min_events < 2 {
            return Err(GammaError::InvalidConfig {
                reason: format!("min_events must be >= 2, got {}", self.min_events),
            });
        }
        Ok(())
    }
}

impl Default for GammaConfig {
    fn default() -> Self {
        Self::new()
    }
}
