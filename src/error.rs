//! Unified error type for the hydronorm facade.

use hydronorm_boxcox::BoxCoxError;
use hydronorm_ecdf::EcdfError;
use hydronorm_gamma::GammaError;

/// Error type for all fallible operations in the hydronorm crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransformError {
    /// Returned when a method tag is not recognized.
    #[error("unknown transform method: {tag:?} (expected boxcox, ecdf or gamma_monthly)")]
    InvalidMethod {
        /// The rejected tag.
        tag: String,
    },

    /// Returned when a mode tag is not recognized.
    #[error("unknown transform mode: {tag:?} (expected transform or back_transform)")]
    InvalidMode {
        /// The rejected tag.
        tag: String,
    },

    /// Returned when an array does not have the expected shape.
    #[error("shape mismatch: got {shape:?}, expected {expected}")]
    ShapeMismatch {
        /// Shape of the offending array.
        shape: Vec<usize>,
        /// Description of the accepted shape.
        expected: String,
    },

    /// Returned when a setting required by the chosen method is absent.
    #[error("missing setting {name:?} required by {method}")]
    MissingSetting {
        /// Setting name.
        name: &'static str,
        /// Method that needs it.
        method: &'static str,
    },

    /// Returned when the chosen method has no precomputed tables.
    #[error("no precomputed tables supplied for {method}")]
    MissingTable {
        /// Method that needs them.
        method: &'static str,
    },

    /// Returned when a setting has an unusable value.
    #[error("invalid settings: {reason}")]
    InvalidSettings {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a derived-variable expression cannot be parsed.
    #[error("invalid derivation {expr:?}: {reason}")]
    InvalidDerivation {
        /// The rejected expression.
        expr: String,
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a derivation references an unknown variable.
    #[error("unknown variable: {name:?}")]
    UnknownVariable {
        /// The missing variable name.
        name: String,
    },

    #[error(transparent)]
    BoxCox(#[from] BoxCoxError),

    #[error(transparent)]
    Ecdf(#[from] EcdfError),

    #[error(transparent)]
    Gamma(#[from] GammaError),
}
