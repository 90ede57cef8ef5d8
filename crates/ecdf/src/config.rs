//! Configuration for building empirical CDF tables and transforming with
//! them.

use crate::error::EcdfError;

/// Interpolation scheme used to evaluate and invert a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpMethod {
    /// Piecewise-linear interpolation between table entries.
    #[default]
    Linear,
}

impl InterpMethod {
    /// Parses a settings tag. Accepts `"interp1d"` and `"linear"`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "interp1d" | "linear" => Some(Self::Linear),
            _ => None,
        }
    }
}

/// Configuration for [`build_monthly_cdfs`](crate::build_monthly_cdfs).
///
/// # Example
///
/// ```
/// use hydronorm_ecdf::CdfConfig;
///
/// let config = CdfConfig::new()
///     .with_pooled(false)
///     .with_min_num_obs(30)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct CdfConfig {
    pooled: bool,
    min_num_obs: usize,
    add_noise: bool,
    noise_level: f64,
    max_neighbors: usize,
    seed: Option<u64>,
}

impl CdfConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: `pooled = true`, `min_num_obs = 20`, `add_noise = true`,
    /// `noise_level = 1e-6`, `max_neighbors = 5`, `seed = None`.
    pub fn new() -> Self {
        Self {
            pooled: true,
            min_num_obs: 20,
            add_noise: true,
            noise_level: 1e-6,
            max_neighbors: 5,
            seed: None,
        }
    }

    /// Sets whether one table per month is shared by all stations.
    pub fn with_pooled(mut self, b: bool) -> Self {
        self.pooled = b;
        self
    }

    /// Sets the observation count below which neighbor pooling kicks in.
    pub fn with_min_num_obs(mut self, n: usize) -> Self {
        self.min_num_obs = n;
        self
    }

    /// Sets whether per-station values are jittered to break ties.
    pub fn with_add_noise(mut self, b: bool) -> Self {
        self.add_noise = b;
        self
    }

    /// Sets the half-width of the uniform tie-breaking noise.
    pub fn with_noise_level(mut self, v: f64) -> Self {
        self.noise_level = v;
        self
    }

    /// Sets how many neighbors are consulted at most when pooling.
    pub fn with_max_neighbors(mut self, n: usize) -> Self {
        self.max_neighbors = n;
        self
    }

    /// Sets the RNG seed for the tie-breaking noise.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns whether tables are pooled across stations.
    pub fn pooled(&self) -> bool {
        self.pooled
    }

    /// Returns the pooling threshold.
    pub fn min_num_obs(&self) -> usize {
        self.min_num_obs
    }

    /// Returns whether tie-breaking noise is added.
    pub fn add_noise(&self) -> bool {
        self.add_noise
    }

    /// Returns the noise half-width.
    pub fn noise_level(&self) -> f64 {
        self.noise_level
    }

    /// Returns the neighbor cap.
    pub fn max_neighbors(&self) -> usize {
        self.max_neighbors
    }

    /// Returns the RNG seed, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Validates this configuration.
    ///
    /// `noise_level` must be finite and non-negative.
    pub fn validate(&self) -> Result<(), EcdfError> {
        if !self.noise_level.is_finite() || self.noise_level < 0.0 {
            return Err(EcdfError::InvalidConfig {
                reason: format!(
                    "noise_level must be finite and >= 0, got {}",
                    self.noise_level
                ),
            });
        }
        Ok(())
    }
}

impl Default for CdfConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for the quantile-normal transform and its inverse.
#[derive(Clone, Debug)]
pub struct QuantileConfig {
    min_z_value: f64,
    min_est_value: f64,
    max_probability: f64,
    interp_method: InterpMethod,
}

impl QuantileConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: `min_z_value = -4`, `min_est_value = 0.01`,
    /// `max_probability = 0.99999`, `interp_method = Linear`.
    pub fn new() -> Self {
        Self {
            min_z_value: -4.0,
            min_est_value: 0.01,
            max_probability: 0.99999,
            interp_method: InterpMethod::Linear,
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

    /// Sets the upper clamp applied to forward probabilities.
    pub fn with_max_probability(mut self, p: f64) -> Self {
        self.max_probability = p;
        self
    }

    /// Sets the interpolation scheme.
    pub fn with_interp_method(mut self, m: InterpMethod) -> Self {
        self.interp_method = m;
        self
    }

    /// Returns the floor z-score.
    pub fn min_z_value(&self) -> f64 {
        self.min_z_value
    }

    /// Returns the reconstruction floor.
    pub fn min_est_value(&self) -> f64 {
        self.min_est_value
    }

    /// Returns the forward probability clamp.
    pub fn max_probability(&self) -> f64 {
        self.max_probability
    }

    /// Returns the interpolation scheme.
    pub fn interp_method(&self) -> InterpMethod {
        self.interp_method
    }

    /// Validates this configuration.
    ///
    /// Checks that `min_z_value` is finite, `min_est_value` is finite and
    /// non-negative, and `max_probability` lies in (0, 1).
    pub fn validate(&self) -> Result<(), EcdfError> {
        if !self.min_z_value.is_finite() {
            return Err(EcdfError::InvalidConfig {
                reason: format!("min_z_value must be finite, got {}", self.min_z_value),
            });
        }

        if !self.min_est_value.is_finite() || self.min_est_value < 0.0 {
            return Err(EcdfError::InvalidConfig {
                reason: format!(
                    "min_est_value must be finite and >= 0, got {}",
                    self.min_est_value
                ),
            });
        }

        if !(self.max_probability > 0.0 && self.max_probability < 1.0) {
            return Err(EcdfError::InvalidConfig {
                reason: format!(
                    "max_probability must be in (0, 1), got {}",
                    self.max_probability
                ),
            });
        }

        Ok(())
    }
}

impl Default for QuantileConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cdf_defaults() {
        let cfg = CdfConfig::new();
        assert!(cfg.pooled());
        assert_eq!(cfg.min_num_obs(), 20);
        assert!(cfg.add_noise());
        assert!((cfg.noise_level() - 1e-6).abs() < f64::EPSILON);
        assert_eq!(cfg.max_neighbors(), 5);
        assert_eq!(cfg.seed(), None);
    }

    #[test]
    fn cdf_builder_chaining() {
        let cfg = CdfConfig::new()
            .with_pooled(false)
            .with_min_num_obs(8)
            .with_add_noise(false)
            .with_noise_level(1e-4)
            .with_max_neighbors(3)
            .with_seed(11);
        assert!(!cfg.pooled());
        assert_eq!(cfg.min_num_obs(), 8);
        assert!(!cfg.add_noise());
        assert!((cfg.noise_level() - 1e-4).abs() < f64::EPSILON);
        assert_eq!(cfg.max_neighbors(), 3);
        assert_eq!(cfg.seed(), Some(11));
    }

    #[test]
    fn cdf_validate_bad_noise() {
        assert!(CdfConfig::new().with_noise_level(-1.0).validate().is_err());
        assert!(CdfConfig::new().with_noise_level(f64::NAN).validate().is_err());
        assert!(CdfConfig::new().with_noise_level(0.0).validate().is_ok());
    }

    #[test]
    fn quantile_defaults() {
        let cfg = QuantileConfig::default();
        assert!((cfg.min_z_value() + 4.0).abs() < f64::EPSILON);
        assert!((cfg.min_est_value() - 0.01).abs() < f64::EPSILON);
        assert!((cfg.max_probability() - 0.99999).abs() < f64::EPSILON);
        assert_eq!(cfg.interp_method(), InterpMethod::Linear);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn quantile_validate_bad_values() {
        assert!(
            QuantileConfig::new()
                .with_min_z_value(f64::NEG_INFINITY)
                .validate()
                .is_err()
        );
        assert!(
            QuantileConfig::new()
                .with_min_est_value(-0.5)
                .validate()
                .is_err()
        );
        assert!(
            QuantileConfig::new()
                .with_max_probability(1.0)
                .validate()
                .is_err()
        );
        assert!(
            QuantileConfig::new()
                .with_max_probability(f64::NAN)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn interp_tags() {
        assert_eq!(InterpMethod::from_tag("interp1d"), Some(InterpMethod::Linear));
        assert_eq!(InterpMethod::from_tag("linear"), Some(InterpMethod::Linear));
        assert_eq!(InterpMethod::from_tag("cubic"), None);
    }
}
