//! Gamma distribution parameters and the statrs bridge.

use statrs::distribution::Gamma;

use crate::error::GammaError;

/// Parameters of a two-parameter gamma distribution, location fixed at 0.
///
/// Both `shape` (k) and `scale` (theta) are finite and positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GammaParams {
    shape: f64,
    scale: f64,
}

impl GammaParams {
    /// Returns `None` unless both parameters are finite and positive.
    pub fn new(shape: f64, scale: f64) -> Option<Self> {
        (shape.is_finite() && shape > 0.0 && scale.is_finite() && scale > 0.0)
            .then_some(Self { shape, scale })
    }

    /// Method-of-moments estimate: `shape = mean² / var`, `scale = var / mean`.
    pub fn from_moments(mean: f64, var: f64) -> Option<Self> {
        if !(mean.is_finite() && mean > 0.0 && var.is_finite() && var > 0.0) {
            return None;
        }
        Self::new(mean * mean / var, var / mean)
    }

    /// Shape parameter (k).
    pub fn shape(&self) -> f64 {
        self.shape
    }

    /// Scale parameter (theta).
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Distribution mean.
    pub fn mean(&self) -> f64 {
        self.shape * self.scale
    }

    /// statrs parameterises the gamma by rate, `1 / scale`.
    pub(crate) fn rate(&self) -> f64 {
        1.0 / self.scale
    }
}

/// Builds a statrs [`Gamma`] from validated parameters.
pub(crate) fn gamma_dist(params: &GammaParams) -> Result<Gamma, GammaError> {
    Gamma::new(params.shape(), params.rate()).map_err(|e| GammaError::GammaConstruction {
        shape: params.shape(),
        scale: params.scale(),
        message: e.to_string(),
    })
}
