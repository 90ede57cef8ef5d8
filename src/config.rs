//! Transform settings and their conversion into per-crate configs.

use hydronorm_boxcox::PowerTransform;
use hydronorm_ecdf::{CdfConfig, InterpMethod, QuantileConfig};
use hydronorm_gamma::GammaConfig;
use serde::Deserialize;

use crate::error::TransformError;

/// Settings shared by every transform method.
///
/// Deserializes from any serde format; unknown keys are rejected and
/// absent keys take their defaults. `exponent` has no default and is only
/// required by the power transform.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformSettings {
    /// One table set for all stations (`true`) or one per station.
    #[serde(default = "default_true")]
    pub pooled: bool,

    /// Minimum values per station-month before neighbor pooling kicks in.
    #[serde(default = "default_min_num_obs")]
    pub min_num_obs: usize,

    /// Jitter per-station values to break ties.
    #[serde(default = "default_true")]
    pub add_noise: bool,

    /// Half-width of the tie-breaking noise.
    #[serde(default = "default_noise_level")]
    pub noise_level: f64,

    /// Maximum neighbors consulted for a sparse station.
    #[serde(default = "default_max_neighbors")]
    pub max_neighbors: usize,

    /// Score given to missing, zero, and undefined values.
    #[serde(default = "default_min_z_value")]
    pub min_z_value: f64,

    /// Reconstructed values below this become zero.
    #[serde(default = "default_min_est_value")]
    pub min_est_value: f64,

    /// Upper probability clip for the empirical forward transform and the
    /// gridded gamma inverse.
    #[serde(default = "default_max_probability")]
    pub max_probability: f64,

    /// Power transform exponent.
    #[serde(default)]
    pub exponent: Option<f64>,

    /// Interpolation scheme tag.
    #[serde(default = "default_interp_method")]
    pub interp_method: String,

    /// Minimum positive values for a gamma fit.
    #[serde(default = "default_min_events")]
    pub min_events: usize,

    /// Seed for the tie-breaking noise.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_true() -> bool {
    true
}
fn default_min_num_obs() -> usize {
    20
}
fn default_noise_level() -> f64 {
    1e-6
}
fn default_max_neighbors() -> usize {
    5
}
fn default_min_z_value() -> f64 {
    -4.0
}
fn default_min_est_value() -> f64 {
    0.01
}
fn default_max_probability() -> f64 {
    0.99999
}
fn default_interp_method() -> String {
    "interp1d".to_string()
}
fn default_min_events() -> usize {
    10
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            pooled: true,
            min_num_obs: default_min_num_obs(),
            add_noise: true,
            noise_level: default_noise_level(),
            max_neighbors: default_max_neighbors(),
            min_z_value: default_min_z_value(),
            min_est_value: default_min_est_value(),
            max_probability: default_max_probability(),
            exponent: None,
            interp_method: default_interp_method(),
            min_events: default_min_events(),
            seed: None,
        }
    }
}

impl TransformSettings {
    /// Sets the power transform exponent.
    pub fn with_exponent(mut self, exponent: f64) -> Self {
        self.exponent = Some(exponent);
        self
    }

    /// Builds the empirical CDF table configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Ecdf`] if the values are invalid.
    pub fn cdf_config(&self) -> Result<CdfConfig, TransformError> {
        let mut cfg = CdfConfig::new()
            .with_pooled(self.pooled)
            .with_min_num_obs(self.min_num_obs)
            .with_add_noise(self.add_noise)
            .with_noise_level(self.noise_level)
            .with_max_neighbors(self.max_neighbors);
        if let Some(seed) = self.seed {
            cfg = cfg.with_seed(seed);
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Builds the quantile-normal transform configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidSettings`] for an unknown
    /// `interp_method` and [`TransformError::Ecdf`] for invalid values.
    pub fn quantile_config(&self) -> Result<QuantileConfig, TransformError> {
        let method = InterpMethod::from_tag(&self.interp_method).ok_or_else(|| {
            TransformError::InvalidSettings {
                reason: format!("unknown interp_method: {:?}", self.interp_method),
            }
        })?;
        let cfg = QuantileConfig::new()
            .with_min_z_value(self.min_z_value)
            .with_min_est_value(self.min_est_value)
            .with_max_probability(self.max_probability)
            .with_interp_method(method);
        cfg.validate()?;
        Ok(cfg)
    }

    /// Builds the gamma fitting and transform configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Gamma`] if the values are invalid.
    pub fn gamma_config(&self) -> Result<GammaConfig, TransformError> {
        let cfg = GammaConfig::new()
            .with_min_z_value(self.min_z_value)
            .with_min_est_value(self.min_est_value)
            .with_max_probability(self.max_probability)
            .with_min_events(self.min_events);
        cfg.validate()?;
        Ok(cfg)
    }

    /// Builds the power transform.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::MissingSetting`] without an exponent and
    /// [`TransformError::BoxCox`] for an invalid one.
    pub fn power_transform(&self) -> Result<PowerTransform, TransformError> {
        let exponent = self.exponent.ok_or(TransformError::MissingSetting {
            name: "exponent",
            method: "boxcox",
        })?;
        Ok(PowerTransform::new(exponent)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = TransformSettings::default();
        assert!(s.pooled);
        assert_eq!(s.min_num_obs, 20);
        assert!(s.add_noise);
        assert_eq!(s.min_z_value, -4.0);
        assert_eq!(s.min_est_value, 0.01);
        assert_eq!(s.exponent, None);
        assert_eq!(s.interp_method, "interp1d");
    }

    #[test]
    fn configs_carry_values() {
        let s = TransformSettings {
            pooled: false,
            min_num_obs: 7,
            seed: Some(3),
            min_z_value: -5.0,
            min_events: 4,
            ..TransformSettings::default()
        };
        let cdf = s.cdf_config().unwrap();
        assert!(!cdf.pooled());
        assert_eq!(cdf.min_num_obs(), 7);
        assert_eq!(cdf.seed(), Some(3));
        assert_eq!(s.quantile_config().unwrap().min_z_value(), -5.0);
        assert_eq!(s.gamma_config().unwrap().min_events(), 4);
    }

    #[test]
    fn unknown_interp_method() {
        let s = TransformSettings {
            interp_method: "cubic".to_string(),
            ..TransformSettings::default()
        };
        assert!(matches!(
            s.quantile_config(),
            Err(TransformError::InvalidSettings { .. })
        ));
    }

    #[test]
    fn power_transform_needs_exponent() {
        let s = TransformSettings::default();
        assert_eq!(
            s.power_transform().unwrap_err(),
            TransformError::MissingSetting {
                name: "exponent",
                method: "boxcox"
            }
        );
        let pt = s.with_exponent(2.0).power_transform().unwrap();
        assert_eq!(pt.exponent(), 2.0);
    }

    #[test]
    fn invalid_exponent_is_boxcox_error() {
        let s = TransformSettings::default().with_exponent(0.0);
        assert!(matches!(
            s.power_transform(),
            Err(TransformError::BoxCox(_))
        ));
    }
}
